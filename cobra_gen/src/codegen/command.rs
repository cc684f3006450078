/* Command assembly: turns a method plus its initializer and flags into a
 * subcommand, and a service's subcommands into the units of a file. */

use cobra_types::{Method, Service, camel_case};
use std::collections::HashSet;

use super::ir::{CommandUnit, ConnectionDefaults, FlagFragment, InitExpr, ServiceGroup, StreamingMode, Subcommand};
use crate::config::GeneratorConfig;
use crate::error::{GenError, GenResult};

/* Go identifiers: a letter or underscore, then letters, digits or underscores */
pub fn is_go_identifier(name: &str) -> bool {
  let mut chars = name.chars();
  match chars.next() {
    Some(first) if first.is_ascii_alphabetic() || first == '_' => {
      chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
    }
    _ => false,
  }
}

/* Go name for a service or method, validated */
fn go_name(what: &'static str, parent: &str, proto_name: &str) -> GenResult<String> {
  if proto_name.is_empty() {
    return Err(GenError::EmptyName {
      what,
      parent: parent.to_string(),
    });
  }
  let name = camel_case(proto_name);
  if !is_go_identifier(&name) {
    return Err(GenError::InvalidIdentifier { what, name });
  }
  Ok(name)
}

/* Assemble one subcommand.
 *
 * The request's Go type is taken from the initializer, which is always a
 * constructor for a usable input type. */
pub fn assemble(
  service_name: &str,
  method: &Method,
  init: InitExpr,
  flags: Vec<FlagFragment>,
) -> GenResult<Subcommand> {
  let service = go_name("service", "file", service_name)?;
  let method_name = go_name("method", service_name, &method.name)?;

  let input_type = match &init {
    InitExpr::Construct { type_name, .. } => type_name.clone(),
    _ => {
      return Err(GenError::MissingInputType {
        service: service_name.to_string(),
        method: method.name.clone(),
      });
    }
  };

  let mode = StreamingMode::of(method);
  Ok(Subcommand {
    constructor: format!("_{service}{method_name}ClientCommand"),
    use_name: method_name.to_lowercase(),
    long: format!(
      "{method_name} client; call by piping a request in to stdin (--stdin), reading a file (--file), or via flags per field"
    ),
    service,
    method: method_name,
    input_type,
    init,
    flags,
    mode,
    steps: mode.dispatch(),
  })
}

/* Group a service's subcommands: the service command first, then each
 * subcommand in method order, then the list that registers them. */
pub fn assemble_service(
  service: &Service,
  subcommands: Vec<Subcommand>,
  config: &GeneratorConfig,
) -> GenResult<Vec<CommandUnit>> {
  let name = go_name("service", "file", &service.name)?;

  let mut seen = HashSet::new();
  for subcommand in &subcommands {
    if !seen.insert(subcommand.use_name.as_str()) {
      return Err(GenError::DuplicateSubcommand {
        service: service.name.clone(),
        use_name: subcommand.use_name.clone(),
      });
    }
  }

  let constructors = subcommands.iter().map(|s| s.constructor.clone()).collect();
  let mut units = Vec::with_capacity(subcommands.len() + 2);
  units.push(CommandUnit::ServiceGroup(ServiceGroup {
    use_name: name.to_lowercase(),
    name: name.clone(),
    defaults: ConnectionDefaults {
      server_addr: config.server_addr.clone(),
      response_format: config.response_format.clone(),
      timeout_secs: config.timeout_secs,
      auth_token_type: config.auth_token_type.clone(),
    },
  }));
  units.extend(subcommands.into_iter().map(CommandUnit::Subcommand));
  units.push(CommandUnit::SubcommandList {
    service: name,
    constructors,
  });
  Ok(units)
}

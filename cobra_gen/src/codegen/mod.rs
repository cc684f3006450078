//! Cobra client generation.
//!
//! One pass per proto file: every method of every service is resolved,
//! translated into flags, given a request skeleton and assembled into a
//! subcommand; the result is rendered as a single `<stem>.cobra.pb.go`.

pub mod command;
pub mod flags;
pub mod init;
pub mod ir;
pub mod render;

use cobra_types::{FileDescriptor, Method, Service, relative_type_path, split_type_name};
use std::collections::{BTreeSet, HashMap};
use tracing::{info, warn};

use crate::config::GeneratorConfig;
use crate::error::{GenError, GenResult};
use crate::resolve::PassContext;
use command::{assemble, assemble_service};
use ir::{GoFile, GoImport, InitExpr, StreamingMode, Subcommand};

/// Nesting ceiling shared by the flag translator and the request initializer.
pub const MAX_RECURSION_DEPTH: usize = 10;

/* Imports every generated file needs; `io` is added when a method streams */
const BASE_IMPORTS: &[(&str, &str)] = &[
  ("tls", "crypto/tls"),
  ("x509", "crypto/x509"),
  ("fmt", "fmt"),
  ("ioutil", "io/ioutil"),
  ("log", "log"),
  ("net", "net"),
  ("os", "os"),
  ("filepath", "path/filepath"),
  ("time", "time"),
  ("proto", "github.com/golang/protobuf/proto"),
  ("cobra", "github.com/spf13/cobra"),
  ("pflag", "github.com/spf13/pflag"),
  ("iocodec", "github.com/tetratelabs/protoc-gen-cobra/iocodec"),
  ("context", "golang.org/x/net/context"),
  ("oauth2", "golang.org/x/oauth2"),
  ("grpc", "google.golang.org/grpc"),
  ("credentials", "google.golang.org/grpc/credentials"),
  ("oauth", "google.golang.org/grpc/credentials/oauth"),
];

/// A rendered output file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedFile {
  pub name: String,
  pub content: String,
}

/// Result of generating one requested file.
#[derive(Debug)]
pub struct FileOutcome {
  pub source: String,
  pub result: GenResult<Option<GeneratedFile>>,
}

/// Go import paths of every known proto package, for cross-package request types.
#[derive(Debug, Default, Clone)]
pub struct ImportMap {
  packages: HashMap<String, String>,
}

impl ImportMap {
  pub fn from_files(files: &[FileDescriptor], config: &GeneratorConfig) -> Self {
    let mut packages = HashMap::new();
    for file in files {
      if let Some(path) = config.go_import_path(file) {
        packages.entry(file.package.clone()).or_insert(path);
      }
    }
    Self { packages }
  }

  pub fn get(&self, package: &str) -> Option<&str> {
    self.packages.get(package).map(String::as_str)
  }
}

/// Builds the IR for `file`; `None` when it declares no services.
pub fn build_file(
  file: &FileDescriptor,
  imports: &ImportMap,
  config: &GeneratorConfig,
) -> GenResult<Option<GoFile>> {
  if !file.has_services() {
    info!(file = %file.name, "no services; nothing to generate");
    return Ok(None);
  }

  let mut extra_imports = BTreeSet::new();
  let mut units = Vec::new();
  let mut streaming = false;

  for service in &file.services {
    let mut subcommands = Vec::with_capacity(service.methods.len());
    for method in &service.methods {
      let subcommand = build_subcommand(file, service, method, imports, config, &mut extra_imports)?;
      streaming |= subcommand.mode.is_streaming();
      subcommands.push(subcommand);
    }
    units.extend(assemble_service(service, subcommands, config)?);
  }

  let mut go_imports: Vec<GoImport> = BASE_IMPORTS
    .iter()
    .map(|(alias, path)| GoImport::new(alias, path))
    .collect();
  if streaming {
    go_imports.push(GoImport::new("io", "io"));
  }
  go_imports.extend(extra_imports);
  for import in &mut go_imports {
    if !import.is_std() {
      import.path = config.prefixed_import(&import.path);
    }
  }

  Ok(Some(GoFile {
    source: file.name.clone(),
    output_name: config.output_name(file),
    package: file.go_package_name(),
    imports: go_imports,
    units,
  }))
}

/* One method: a fresh type cache, flags, skeleton, then assembly */
fn build_subcommand(
  file: &FileDescriptor,
  service: &Service,
  method: &Method,
  imports: &ImportMap,
  config: &GeneratorConfig,
  extra_imports: &mut BTreeSet<GoImport>,
) -> GenResult<Subcommand> {
  let mut ctx = PassContext::new(&file.messages, &file.package);

  let (init, flags) = match relative_type_path(&method.input_type, &file.package) {
    Some(path) => {
      let resolution = ctx.resolve_reference(&method.input_type);
      match resolution.descriptor {
        Some(input) => {
          let flags = flags::translate(&mut ctx, "reqArgs", "", input, &config.help_text);
          let init = init::initialize(&mut ctx, input, &resolution.type_prefix(), 0);
          (init, flags)
        }
        None => {
          warn!(
            method = %method.name,
            input_type = %method.input_type,
            "input type is not declared in this file; generating without flags"
          );
          (opaque(path.join("_")), Vec::new())
        }
      }
    }
    None => {
      let qualified = split_type_name(&method.input_type);
      let type_name = match (qualified.import_alias(), imports.get(&qualified.package)) {
        (Some(alias), Some(import_path)) => {
          extra_imports.insert(GoImport::new(&alias, import_path));
          format!("{alias}.{}", qualified.type_name)
        }
        _ => {
          warn!(package = %qualified.package, "no Go import path known for package");
          qualified.type_name.clone()
        }
      };
      warn!(
        method = %method.name,
        input_type = %method.input_type,
        "input type is in another package; generating without flags"
      );
      (opaque(type_name), Vec::new())
    }
  };

  let subcommand = assemble(&service.name, method, init, flags)?;
  if subcommand.mode == StreamingMode::Bidirectional {
    info!(method = %method.name, "bidirectional streaming method");
  }
  Ok(subcommand)
}

fn opaque(type_name: String) -> InitExpr {
  InitExpr::Construct {
    type_name,
    fields: Default::default(),
  }
}

/// Builds and renders `file`.
pub fn generate_file(
  file: &FileDescriptor,
  imports: &ImportMap,
  config: &GeneratorConfig,
) -> GenResult<Option<GeneratedFile>> {
  let Some(go_file) = build_file(file, imports, config)? else {
    return Ok(None);
  };
  let content = render::render_file(&go_file)?;
  info!(file = %file.name, output = %go_file.output_name, "generated cobra client");
  Ok(Some(GeneratedFile {
    name: go_file.output_name,
    content,
  }))
}

/// Generates every target; a failure in one file does not stop the others.
pub fn generate_files(
  files: &[FileDescriptor],
  targets: &[String],
  config: &GeneratorConfig,
) -> Vec<FileOutcome> {
  let imports = ImportMap::from_files(files, config);
  targets
    .iter()
    .map(|target| {
      let result = match files.iter().find(|f| &f.name == target) {
        Some(file) => generate_file(file, &imports, config),
        None => Err(GenError::UnknownFile(target.clone())),
      };
      if let Err(err) = &result {
        warn!(file = %target, error = %err, "generation failed");
      }
      FileOutcome {
        source: target.clone(),
        result,
      }
    })
    .collect()
}

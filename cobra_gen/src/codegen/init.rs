/* Request skeleton construction.
 *
 * Flags bind to addresses inside the request (`&reqArgs.Inner.Value`), so
 * every singular message on the way to a scalar leaf has to be allocated up
 * front. Repeated message fields get an empty slice; map, enum, oneof and
 * scalar fields are left at their zero value. */

use cobra_types::{MessageType, go_field_name};
use indexmap::IndexMap;
use tracing::debug;

use super::MAX_RECURSION_DEPTH;
use super::ir::InitExpr;
use crate::resolve::PassContext;

/* Build the initializer for `message`, whose Go type is `type_prefix` plus
 * its name. Returns `InitExpr::Empty` beyond the depth ceiling. Messages
 * already being built on the current path are not allocated again, matching
 * the flag translator, which binds nothing under a recursive field. */
pub fn initialize<'a>(
  ctx: &mut PassContext<'a>,
  message: &'a MessageType,
  type_prefix: &str,
  depth: usize,
) -> InitExpr {
  let mut active = vec![message];
  initialize_message(ctx, message, type_prefix, depth, &mut active)
}

fn initialize_message<'a>(
  ctx: &mut PassContext<'a>,
  message: &'a MessageType,
  type_prefix: &str,
  depth: usize,
  active: &mut Vec<&'a MessageType>,
) -> InitExpr {
  if depth > MAX_RECURSION_DEPTH {
    debug!(owner = %message.name, depth, "initializer depth limit reached");
    return InitExpr::Empty;
  }

  let mut fields = IndexMap::new();
  for field in message.fields.iter().filter(|f| f.wire_type.is_message() && !f.in_oneof()) {
    let resolution = ctx.resolve_field(field);
    let Some(target) = resolution.descriptor else {
      continue;
    };
    if target.map_entry {
      continue;
    }

    let child_prefix = resolution.type_prefix();
    let child = if field.is_repeated() {
      InitExpr::EmptyList {
        type_name: format!("{child_prefix}{}", target.name),
      }
    } else if active.iter().any(|seen| std::ptr::eq(*seen, target)) {
      debug!(field = %field.name, target = %target.name, "recursive message field left nil");
      InitExpr::Empty
    } else {
      active.push(target);
      let child = initialize_message(ctx, target, &child_prefix, depth + 1, active);
      active.pop();
      child
    };

    if !child.is_empty() {
      fields.insert(go_field_name(field), child);
    }
  }

  InitExpr::Construct {
    type_name: format!("{type_prefix}{}", message.name),
    fields,
  }
}

#[cfg(test)]
#[path = "init_tests.rs"]
mod init_tests;

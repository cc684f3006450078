/* Field-to-flag translation.
 *
 * Walks a request message and produces one flag binding per scalar leaf,
 * descending into singular message fields. Nested flag names are joined with
 * `-` and nested Go paths with `.`: `reqArgs.L0.L1.L2.L3` is bound as
 * `l0-l1-l2-l3`. */

use cobra_types::{Field, MessageType, go_field_name};
use tracing::debug;

use super::MAX_RECURSION_DEPTH;
use super::ir::{FlagFragment, FlagKind};
use crate::resolve::PassContext;

/* Translate every field of `message` into flag fragments.
 *
 * `object_path` is the Go expression holding the message (`reqArgs`) and
 * `flag_prefix` is prepended to every flag name (empty at the top level). */
pub fn translate<'a>(
  ctx: &mut PassContext<'a>,
  object_path: &str,
  flag_prefix: &str,
  message: &'a MessageType,
  help: &str,
) -> Vec<FlagFragment> {
  let mut fragments = Vec::new();
  let mut active = vec![message];
  translate_message(ctx, object_path, flag_prefix, message, help, &mut active, &mut fragments);
  fragments
}

fn translate_message<'a>(
  ctx: &mut PassContext<'a>,
  object_path: &str,
  flag_prefix: &str,
  message: &'a MessageType,
  help: &str,
  active: &mut Vec<&'a MessageType>,
  out: &mut Vec<FlagFragment>,
) {
  let start = out.len();
  for field in &message.fields {
    let field_name = go_field_name(field);
    let flag_name = field_name.to_lowercase();

    if field.in_oneof() {
      out.push(FlagFragment::Unsupported {
        note: format!("oneof flags are not yet supported (field {:?})", field.name),
      });
      continue;
    }

    if field.wire_type.is_message() {
      let resolution = ctx.resolve_field(field);

      /* Map fields are repeated entries of a synthetic message, so this has
       * to be checked before the repeated case. The note replaces every
       * fragment of the owning message, earlier fields included. */
      if resolution.descriptor.is_some_and(|target| target.map_entry) {
        debug!(owner = %message.name, field = %field.name, "map field; dropping the message's flags");
        out.truncate(start);
        out.push(FlagFragment::Unsupported {
          note: format!("map flags are not yet supported (message {:?})", message.name),
        });
        return;
      }

      if field.is_repeated() {
        out.push(list_placeholder(field));
        continue;
      }

      let Some(target) = resolution.descriptor else {
        debug!(field = %field.name, type_name = ?field.type_name, "unresolved message field; no flags");
        continue;
      };

      if active.iter().any(|seen| std::ptr::eq(*seen, target)) {
        debug!(field = %field.name, target = %target.name, "recursive message field; no flags");
        continue;
      }
      if active.len() > MAX_RECURSION_DEPTH {
        debug!(field = %field.name, depth = active.len(), "nesting too deep; no flags");
        continue;
      }

      active.push(target);
      translate_message(
        ctx,
        &format!("{object_path}.{field_name}"),
        &format!("{flag_prefix}{flag_name}-"),
        target,
        help,
        active,
        out,
      );
      active.pop();
      continue;
    }

    if field.is_repeated() {
      out.push(list_placeholder(field));
      continue;
    }

    match FlagKind::for_wire_type(field.wire_type) {
      /* Go holds optional scalars as pointers, which the flag binders can't take */
      Some(_) if field.proto3_optional => out.push(FlagFragment::Unsupported {
        note: format!("optional flags are not yet supported (field {:?})", field.name),
      }),
      Some(binding) => out.push(FlagFragment::Bind {
        binding,
        target: format!("{object_path}.{field_name}"),
        flag_name: format!("{flag_prefix}{flag_name}"),
        help: help.to_string(),
      }),
      None => debug!(field = %field.name, wire_type = ?field.wire_type, "no flag for field"),
    }
  }
}

fn list_placeholder(field: &Field) -> FlagFragment {
  FlagFragment::Unsupported {
    note: format!("list flags are not yet supported (field {:?})", field.name),
  }
}

#[cfg(test)]
#[path = "flags_tests.rs"]
mod flags_tests;

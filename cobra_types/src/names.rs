/* Naming helpers shared by the loader and the generator */

use crate::types::Field;

/* protoc's JSON name: drop underscores and upper-case the letter that follows */
pub fn json_name(proto_name: &str) -> String {
    let mut out = String::with_capacity(proto_name.len());
    let mut capitalize_next = false;
    for c in proto_name.chars() {
        if c == '_' {
            capitalize_next = true;
        } else if capitalize_next {
            out.extend(c.to_uppercase());
            capitalize_next = false;
        } else {
            out.push(c);
        }
    }
    out
}

/* Go struct field name: the JSON name with its first letter upper-cased */
pub fn go_field_name(field: &Field) -> String {
    let json = match field.json_name.as_deref() {
        Some(name) if !name.is_empty() => name.to_string(),
        _ => json_name(&field.name),
    };
    upper_first(&json)
}

fn upper_first(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/* Go identifier for a proto service or method name: `foo_bar` -> `FooBar` */
pub fn camel_case(name: &str) -> String {
    let mut out = String::with_capacity(name.len());
    let mut chars = name.chars().peekable();

    /* A leading underscore becomes `X` so the identifier stays exported */
    if chars.peek() == Some(&'_') {
        out.push('X');
        chars.next();
    }

    let mut upper_next = true;
    while let Some(c) = chars.next() {
        if c == '_' && chars.peek().is_some_and(|n| n.is_ascii_lowercase()) {
            upper_next = true;
            continue;
        }
        if c.is_ascii_digit() {
            out.push(c);
            upper_next = true;
            continue;
        }
        if upper_next && c.is_ascii_lowercase() {
            out.push(c.to_ascii_uppercase());
        } else {
            out.push(c);
        }
        upper_next = false;
    }
    out
}

/* A fully-qualified type name split into package and bare type name */
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QualifiedName {
    /* `pkg.subpkg`; empty when the name has no package component */
    pub package: String,
    /* Last segment, e.g. `Type` */
    pub type_name: String,
}

impl QualifiedName {
    /* Go import alias used for types of another package: `pkg.subpkg` -> `pkg_subpkg_pb` */
    pub fn import_alias(&self) -> Option<String> {
        if self.package.is_empty() {
            None
        } else {
            Some(format!("{}_pb", self.package.replace('.', "_")))
        }
    }
}

/* Split `.pkg.subpkg.Type` into (`pkg.subpkg`, `Type`) */
pub fn split_type_name(full_name: &str) -> QualifiedName {
    let trimmed = full_name.trim_start_matches('.');
    match trimmed.rsplit_once('.') {
        Some((package, type_name)) => QualifiedName {
            package: package.to_string(),
            type_name: type_name.to_string(),
        },
        None => QualifiedName {
            package: String::new(),
            type_name: trimmed.to_string(),
        },
    }
}

/* Path of a type reference relative to `package`.
 *
 * `.pkg.Outer.Inner` with package `pkg` gives `["Outer", "Inner"]`. A name
 * without a leading dot is already relative. Returns `None` when the name is
 * qualified with a different package. */
pub fn relative_type_path<'a>(type_name: &'a str, package: &str) -> Option<Vec<&'a str>> {
    let relative = match type_name.strip_prefix('.') {
        Some(qualified) if package.is_empty() => qualified,
        Some(qualified) => qualified.strip_prefix(package)?.strip_prefix('.')?,
        None => type_name,
    };
    if relative.is_empty() {
        return None;
    }
    Some(relative.split('.').collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Label, WireType};

    fn field(name: &str, json_name: Option<&str>) -> Field {
        Field {
            name: name.to_string(),
            json_name: json_name.map(str::to_string),
            wire_type: WireType::String,
            label: Label::Singular,
            type_name: None,
            proto3_optional: false,
            oneof_index: None,
        }
    }

    #[test]
    fn go_field_name_prefers_json_name() {
        assert_eq!(go_field_name(&field("top_level", Some("topLevel"))), "TopLevel");
        assert_eq!(go_field_name(&field("top_level", None)), "TopLevel");
        assert_eq!(go_field_name(&field("l0", None)), "L0");
        assert_eq!(go_field_name(&field("value", Some(""))), "Value");
    }

    #[test]
    fn camel_case_matches_go_generator() {
        assert_eq!(camel_case("nested_messages"), "NestedMessages");
        assert_eq!(camel_case("GetDeeplyNested"), "GetDeeplyNested");
        assert_eq!(camel_case("CRUD"), "CRUD");
        assert_eq!(camel_case("_hidden"), "XHidden");
        assert_eq!(camel_case("v2_api"), "V2Api");
    }

    #[test]
    fn splits_qualified_names() {
        let name = split_type_name(".pkg.subpkg.Type");
        assert_eq!(name.package, "pkg.subpkg");
        assert_eq!(name.type_name, "Type");
        assert_eq!(name.import_alias().as_deref(), Some("pkg_subpkg_pb"));

        let bare = split_type_name("Type");
        assert!(bare.package.is_empty());
        assert_eq!(bare.import_alias(), None);
    }

    #[test]
    fn relative_paths_respect_package() {
        assert_eq!(relative_type_path(".pb.Outer.Inner", "pb"), Some(vec!["Outer", "Inner"]));
        assert_eq!(relative_type_path("Outer.Inner", "pb"), Some(vec!["Outer", "Inner"]));
        assert_eq!(relative_type_path(".Outer", ""), Some(vec!["Outer"]));
        assert_eq!(relative_type_path(".other.Type", "pb"), None);
        assert_eq!(relative_type_path(".pbx.Type", "pb"), None);
    }
}

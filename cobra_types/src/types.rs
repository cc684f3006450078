use serde_derive::{Deserialize, Serialize};

/// Wire type tag of a field, mirroring `FieldDescriptorProto.Type`.
#[derive(Serialize, Deserialize, Debug, PartialEq, Eq, Clone, Copy, Hash)]
#[serde(rename_all = "kebab-case")]
pub enum WireType {
    Double,
    Float,
    Int64,
    Uint64,
    Int32,
    Fixed64,
    Fixed32,
    Bool,
    String,
    Group,
    Message,
    Bytes,
    Uint32,
    Enum,
    Sfixed32,
    Sfixed64,
    Sint32,
    Sint64,
}

impl WireType {
    /// Maps the numeric `FieldDescriptorProto.Type` value used on the wire.
    pub fn from_proto(value: i32) -> Option<Self> {
        let wire_type = match value {
            1 => WireType::Double,
            2 => WireType::Float,
            3 => WireType::Int64,
            4 => WireType::Uint64,
            5 => WireType::Int32,
            6 => WireType::Fixed64,
            7 => WireType::Fixed32,
            8 => WireType::Bool,
            9 => WireType::String,
            10 => WireType::Group,
            11 => WireType::Message,
            12 => WireType::Bytes,
            13 => WireType::Uint32,
            14 => WireType::Enum,
            15 => WireType::Sfixed32,
            16 => WireType::Sfixed64,
            17 => WireType::Sint32,
            18 => WireType::Sint64,
            _ => return None,
        };
        Some(wire_type)
    }

    pub fn is_message(&self) -> bool {
        matches!(self, WireType::Message)
    }
}

#[derive(Serialize, Deserialize, Debug, PartialEq, Eq, Clone, Copy, Default)]
#[serde(rename_all = "kebab-case")]
pub enum Label {
    #[default]
    Singular,
    Repeated,
}

#[derive(Serialize, Deserialize, Debug, PartialEq, Eq, Clone)]
#[serde(rename_all = "kebab-case")]
pub struct Field {
    pub name: String,
    /// JSON name as reported by protoc; derived from `name` when absent.
    #[serde(default)]
    pub json_name: Option<String>,
    pub wire_type: WireType,
    #[serde(default)]
    pub label: Label,
    /// Referenced type for message, enum and group fields. A leading dot marks a
    /// fully-qualified name (`.pkg.Outer.Inner`), otherwise the name is
    /// relative to the file's package.
    #[serde(default)]
    pub type_name: Option<String>,
    /// Declared `optional` in a proto3 file. Go holds the value behind a pointer.
    #[serde(default)]
    pub proto3_optional: bool,
    /// Index of the enclosing `oneof`, synthetic proto3-optional ones included.
    #[serde(default)]
    pub oneof_index: Option<i32>,
}

impl Field {
    pub fn is_repeated(&self) -> bool {
        self.label == Label::Repeated
    }

    /// Member of a declared `oneof`. Go stores these behind an interface
    /// field named after the oneof, not under the field's own name.
    pub fn in_oneof(&self) -> bool {
        self.oneof_index.is_some() && !self.proto3_optional
    }
}

#[derive(Serialize, Deserialize, Debug, PartialEq, Eq, Clone, Default)]
#[serde(rename_all = "kebab-case")]
pub struct MessageType {
    pub name: String,
    #[serde(default)]
    pub fields: Vec<Field>,
    #[serde(default)]
    pub nested_types: Vec<MessageType>,
    /// Synthetic key/value type generated by protoc for a `map<K, V>` field.
    #[serde(default)]
    pub map_entry: bool,
}

#[derive(Serialize, Deserialize, Debug, PartialEq, Eq, Clone)]
#[serde(rename_all = "kebab-case")]
pub struct Method {
    pub name: String,
    pub input_type: String,
    pub output_type: String,
    #[serde(default)]
    pub client_streaming: bool,
    #[serde(default)]
    pub server_streaming: bool,
}

#[derive(Serialize, Deserialize, Debug, PartialEq, Eq, Clone, Default)]
#[serde(rename_all = "kebab-case")]
pub struct Service {
    pub name: String,
    #[serde(default)]
    pub methods: Vec<Method>,
}

#[derive(Serialize, Deserialize, Debug, PartialEq, Eq, Clone, Default)]
#[serde(rename_all = "kebab-case")]
pub struct FileDescriptor {
    /// Path of the `.proto` file relative to the include root.
    pub name: String,
    #[serde(default)]
    pub package: String,
    #[serde(default)]
    pub go_package: Option<String>,
    #[serde(default)]
    pub dependencies: Vec<String>,
    #[serde(default)]
    pub messages: Vec<MessageType>,
    #[serde(default)]
    pub services: Vec<Service>,
}

impl FileDescriptor {
    /// Go package clause for code generated next to this file.
    ///
    /// `go_package` wins (`path;name` or the last path element), then the proto
    /// package, then the file stem.
    pub fn go_package_name(&self) -> String {
        if let Some(go_package) = self.go_package.as_deref().filter(|p| !p.is_empty()) {
            if let Some((_, name)) = go_package.split_once(';') {
                return sanitize_package_name(name);
            }
            let last = go_package.rsplit('/').next().unwrap_or(go_package);
            return sanitize_package_name(last);
        }
        if !self.package.is_empty() {
            return sanitize_package_name(&self.package);
        }
        let stem = self.name.rsplit('/').next().unwrap_or(&self.name);
        sanitize_package_name(stem.strip_suffix(".proto").unwrap_or(stem))
    }

    /// Go import path for this file's generated package, if one is declared.
    pub fn go_import_path(&self) -> Option<String> {
        let go_package = self.go_package.as_deref().filter(|p| !p.is_empty())?;
        let path = go_package.split_once(';').map(|(path, _)| path).unwrap_or(go_package);
        Some(path.to_string())
    }

    pub fn has_services(&self) -> bool {
        !self.services.is_empty()
    }
}

fn sanitize_package_name(name: &str) -> String {
    name.chars()
        .map(|c| if c.is_ascii_alphanumeric() || c == '_' { c } else { '_' })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn file(name: &str, package: &str, go_package: Option<&str>) -> FileDescriptor {
        FileDescriptor {
            name: name.to_string(),
            package: package.to_string(),
            go_package: go_package.map(str::to_string),
            ..Default::default()
        }
    }

    #[test]
    fn go_package_name_precedence() {
        assert_eq!(file("a.proto", "pb", Some("example.com/x/v1;xv1")).go_package_name(), "xv1");
        assert_eq!(file("a.proto", "pb", Some("example.com/x/v1")).go_package_name(), "v1");
        assert_eq!(file("a.proto", "acme.bank", None).go_package_name(), "acme_bank");
        assert_eq!(file("dir/my-api.proto", "", None).go_package_name(), "my_api");
    }

    #[test]
    fn go_import_path_drops_package_suffix() {
        let f = file("a.proto", "pb", Some("example.com/x/v1;xv1"));
        assert_eq!(f.go_import_path().as_deref(), Some("example.com/x/v1"));
        assert_eq!(file("a.proto", "pb", Some("")).go_import_path(), None);
    }

    #[test]
    fn wire_types_follow_descriptor_numbering() {
        assert_eq!(WireType::from_proto(9), Some(WireType::String));
        assert_eq!(WireType::from_proto(11), Some(WireType::Message));
        assert_eq!(WireType::from_proto(0), None);
        assert_eq!(WireType::from_proto(19), None);
    }

    #[test]
    fn parses_kebab_case_yaml() {
        let yaml = r#"
name: Request
fields:
  - name: page_size
    wire-type: sfixed32
  - name: labels
    wire-type: message
    label: repeated
    type-name: .pb.Request.LabelsEntry
  - name: nick
    wire-type: string
    proto3-optional: true
    oneof-index: 0
  - name: seconds
    wire-type: int32
    oneof-index: 1
nested-types:
  - name: LabelsEntry
    map-entry: true
"#;
        let message: MessageType = serde_yml::from_str(yaml).expect("message should parse");
        assert_eq!(message.fields[0].wire_type, WireType::Sfixed32);
        assert!(message.fields[1].is_repeated());
        assert!(message.nested_types[0].map_entry);
        assert_eq!(message.fields[0].json_name, None);
        assert!(!message.fields[0].in_oneof());
        assert!(message.fields[2].proto3_optional && !message.fields[2].in_oneof());
        assert!(message.fields[3].in_oneof());
    }
}

//! Conversion from protoc's descriptor protos into the generator's data model.

use cobra_types::{Field, FileDescriptor, Label, MessageType, Method, Service, WireType};
use prost_types::field_descriptor_proto;
use prost_types::{
    DescriptorProto, FieldDescriptorProto, FileDescriptorProto, MethodDescriptorProto,
    ServiceDescriptorProto,
};
use tracing::warn;

pub fn convert_file(proto: &FileDescriptorProto) -> FileDescriptor {
    FileDescriptor {
        name: proto.name().to_string(),
        package: proto.package().to_string(),
        go_package: proto
            .options
            .as_ref()
            .and_then(|options| options.go_package.clone()),
        dependencies: proto.dependency.clone(),
        messages: proto.message_type.iter().map(convert_message).collect(),
        services: proto.service.iter().map(convert_service).collect(),
    }
}

pub fn convert_message(proto: &DescriptorProto) -> MessageType {
    MessageType {
        name: proto.name().to_string(),
        fields: proto
            .field
            .iter()
            .filter_map(|field| convert_field(proto.name(), field))
            .collect(),
        nested_types: proto.nested_type.iter().map(convert_message).collect(),
        map_entry: proto
            .options
            .as_ref()
            .map(|options| options.map_entry())
            .unwrap_or(false),
    }
}

fn convert_field(owner: &str, proto: &FieldDescriptorProto) -> Option<Field> {
    let Some(wire_type) = proto.r#type.and_then(WireType::from_proto) else {
        /* protoc always fills the type; a missing one means a malformed request */
        warn!(
            owner,
            field = proto.name(),
            "skipping field with unknown wire type {:?}",
            proto.r#type
        );
        return None;
    };

    let label = if proto.label() == field_descriptor_proto::Label::Repeated {
        Label::Repeated
    } else {
        Label::Singular
    };

    Some(Field {
        name: proto.name().to_string(),
        json_name: proto.json_name.clone(),
        wire_type,
        label,
        type_name: proto.type_name.clone().filter(|name| !name.is_empty()),
        proto3_optional: proto.proto3_optional(),
        oneof_index: proto.oneof_index,
    })
}

fn convert_service(proto: &ServiceDescriptorProto) -> Service {
    Service {
        name: proto.name().to_string(),
        methods: proto.method.iter().map(convert_method).collect(),
    }
}

fn convert_method(proto: &MethodDescriptorProto) -> Method {
    Method {
        name: proto.name().to_string(),
        input_type: proto.input_type().to_string(),
        output_type: proto.output_type().to_string(),
        client_streaming: proto.client_streaming(),
        server_streaming: proto.server_streaming(),
    }
}

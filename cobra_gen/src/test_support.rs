/* Descriptor builders shared by the unit tests */

use cobra_types::{Field, FileDescriptor, Label, MessageType, Method, Service, WireType};

pub fn scalar(name: &str, wire_type: WireType) -> Field {
    Field {
        name: name.to_string(),
        json_name: None,
        wire_type,
        label: Label::Singular,
        type_name: None,
        proto3_optional: false,
        oneof_index: None,
    }
}

pub fn message_field(name: &str, type_name: &str) -> Field {
    Field {
        type_name: Some(type_name.to_string()),
        ..scalar(name, WireType::Message)
    }
}

pub fn repeated(field: Field) -> Field {
    Field {
        label: Label::Repeated,
        ..field
    }
}

pub fn message(name: &str, fields: Vec<Field>, nested_types: Vec<MessageType>) -> MessageType {
    MessageType {
        name: name.to_string(),
        fields,
        nested_types,
        map_entry: false,
    }
}

pub fn map_entry(name: &str) -> MessageType {
    MessageType {
        map_entry: true,
        ..message(
            name,
            vec![scalar("key", WireType::String), scalar("value", WireType::String)],
            vec![],
        )
    }
}

pub fn unary(name: &str, input_type: &str) -> Method {
    Method {
        name: name.to_string(),
        input_type: input_type.to_string(),
        output_type: ".pb.NestedResponse".to_string(),
        client_streaming: false,
        server_streaming: false,
    }
}

/* Messages of `nested.proto`: a request with a nested and a top-level
 * message field, and a four-level chain of nested declarations */
pub fn nested_messages() -> Vec<MessageType> {
    vec![
        message("TopLevelNestedType", vec![scalar("value", WireType::String)], vec![]),
        message(
            "NestedRequest",
            vec![
                message_field("inner", ".pb.NestedRequest.InnerNestedType"),
                message_field("top_level", ".pb.TopLevelNestedType"),
            ],
            vec![message("InnerNestedType", vec![scalar("value", WireType::String)], vec![])],
        ),
        message("NestedResponse", vec![scalar("return", WireType::String)], vec![]),
        message(
            "DeeplyNested",
            vec![message_field("l0", ".pb.DeeplyNested.DeeplyNestedOuter")],
            vec![message(
                "DeeplyNestedOuter",
                vec![message_field(
                    "l1",
                    ".pb.DeeplyNested.DeeplyNestedOuter.DeeplyNestedInner",
                )],
                vec![message(
                    "DeeplyNestedInner",
                    vec![message_field(
                        "l2",
                        ".pb.DeeplyNested.DeeplyNestedOuter.DeeplyNestedInner.DeeplyNestedInnermost",
                    )],
                    vec![message(
                        "DeeplyNestedInnermost",
                        vec![scalar("l3", WireType::String)],
                        vec![],
                    )],
                )],
            )],
        ),
    ]
}

pub fn nested_file() -> FileDescriptor {
    FileDescriptor {
        name: "nested.proto".to_string(),
        package: "pb".to_string(),
        go_package: None,
        dependencies: vec![],
        messages: nested_messages(),
        services: vec![Service {
            name: "NestedMessages".to_string(),
            methods: vec![
                unary("Get", ".pb.NestedRequest"),
                unary("GetDeeplyNested", ".pb.DeeplyNested"),
            ],
        }],
    }
}

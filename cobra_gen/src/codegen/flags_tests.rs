use super::*;
use crate::test_support::*;
use cobra_types::{Field, WireType};

#[cfg(test)]
mod flags_tests {
    use super::*;

    fn binds(fragments: &[FlagFragment]) -> Vec<(String, String)> {
        fragments
            .iter()
            .filter_map(|fragment| match fragment {
                FlagFragment::Bind {
                    target, flag_name, ..
                } => Some((target.clone(), flag_name.clone())),
                FlagFragment::Unsupported { .. } => None,
            })
            .collect()
    }

    fn pair(target: &str, flag: &str) -> (String, String) {
        (target.to_string(), flag.to_string())
    }

    #[test]
    fn test_nested_request_flags() {
        let roots = nested_messages();
        let mut ctx = PassContext::new(&roots, "pb");
        let request = ctx.resolve("NestedRequest").descriptor.unwrap();

        let fragments = translate(&mut ctx, "reqArgs", "", request, "get-comment-from-proto");
        assert_eq!(
            binds(&fragments),
            vec![
                pair("reqArgs.Inner.Value", "inner-value"),
                pair("reqArgs.TopLevel.Value", "toplevel-value"),
            ]
        );
        assert!(matches!(
            &fragments[0],
            FlagFragment::Bind { binding: FlagKind::String, help, .. } if help == "get-comment-from-proto"
        ));
    }

    #[test]
    fn test_deep_chain_joins_names() {
        let roots = nested_messages();
        let mut ctx = PassContext::new(&roots, "pb");
        let request = ctx.resolve("DeeplyNested").descriptor.unwrap();

        let fragments = translate(&mut ctx, "reqArgs", "", request, "help");
        assert_eq!(binds(&fragments), vec![pair("reqArgs.L0.L1.L2.L3", "l0-l1-l2-l3")]);
    }

    #[test]
    fn test_scalar_kinds() {
        let roots = vec![message(
            "Scalars",
            vec![
                scalar("name", WireType::String),
                scalar("blob", WireType::Bytes),
                scalar("on", WireType::Bool),
                scalar("ratio", WireType::Float),
                scalar("precise", WireType::Double),
                scalar("small", WireType::Sint32),
                scalar("big", WireType::Sfixed64),
                scalar("count", WireType::Uint32),
                scalar("total", WireType::Uint64),
                scalar("status", WireType::Enum),
            ],
            vec![],
        )];
        let mut ctx = PassContext::new(&roots, "pb");

        let fragments = translate(&mut ctx, "reqArgs", "", &roots[0], "h");
        let kinds: Vec<FlagKind> = fragments
            .iter()
            .filter_map(|fragment| match fragment {
                FlagFragment::Bind { binding, .. } => Some(*binding),
                FlagFragment::Unsupported { .. } => None,
            })
            .collect();
        assert_eq!(
            kinds,
            vec![
                FlagKind::String,
                FlagKind::BytesBase64,
                FlagKind::Bool,
                FlagKind::Float32,
                FlagKind::Float64,
                FlagKind::Int32,
                FlagKind::Int64,
                FlagKind::Uint32,
                FlagKind::Uint64,
            ]
        );
        /* The enum field contributes nothing */
        assert_eq!(fragments.len(), 9);
    }

    #[test]
    fn test_repeated_fields_get_placeholders() {
        let roots = vec![
            message("Item", vec![scalar("id", WireType::Int64)], vec![]),
            message(
                "Order",
                vec![
                    repeated(scalar("tags", WireType::String)),
                    repeated(message_field("items", ".pb.Item")),
                    scalar("note", WireType::String),
                ],
                vec![],
            ),
        ];
        let mut ctx = PassContext::new(&roots, "pb");

        let fragments = translate(&mut ctx, "reqArgs", "", &roots[1], "h");
        assert_eq!(
            fragments[0],
            FlagFragment::Unsupported {
                note: "list flags are not yet supported (field \"tags\")".to_string()
            }
        );
        assert_eq!(
            fragments[1],
            FlagFragment::Unsupported {
                note: "list flags are not yet supported (field \"items\")".to_string()
            }
        );
        assert_eq!(binds(&fragments), vec![pair("reqArgs.Note", "note")]);
    }

    #[test]
    fn test_map_field_replaces_the_messages_flags() {
        let roots = vec![message(
            "Owner",
            vec![
                scalar("before", WireType::String),
                repeated(message_field("labels", ".pb.Owner.LabelsEntry")),
                scalar("after", WireType::String),
            ],
            vec![map_entry("LabelsEntry")],
        )];
        let mut ctx = PassContext::new(&roots, "pb");

        let fragments = translate(&mut ctx, "reqArgs", "", &roots[0], "h");
        assert_eq!(fragments.len(), 1);
        assert!(binds(&fragments).is_empty());
        assert_eq!(
            fragments[0],
            FlagFragment::Unsupported {
                note: "map flags are not yet supported (message \"Owner\")".to_string()
            }
        );
    }

    #[test]
    fn test_map_in_nested_message_keeps_parent_siblings() {
        let roots = vec![message(
            "Request",
            vec![
                message_field("meta", ".pb.Request.Meta"),
                scalar("name", WireType::String),
            ],
            vec![message(
                "Meta",
                vec![repeated(message_field("labels", ".pb.Request.Meta.LabelsEntry"))],
                vec![map_entry("LabelsEntry")],
            )],
        )];
        let mut ctx = PassContext::new(&roots, "pb");

        let fragments = translate(&mut ctx, "reqArgs", "", &roots[0], "h");
        assert!(matches!(&fragments[0], FlagFragment::Unsupported { note } if note.contains("\"Meta\"")));
        assert_eq!(binds(&fragments), vec![pair("reqArgs.Name", "name")]);
    }

    #[test]
    fn test_map_in_nested_message_drops_only_that_messages_flags() {
        let roots = vec![message(
            "Request",
            vec![
                scalar("id", WireType::Int64),
                message_field("meta", ".pb.Request.Meta"),
                scalar("name", WireType::String),
            ],
            vec![message(
                "Meta",
                vec![
                    scalar("origin", WireType::String),
                    repeated(message_field("labels", ".pb.Request.Meta.LabelsEntry")),
                ],
                vec![map_entry("LabelsEntry")],
            )],
        )];
        let mut ctx = PassContext::new(&roots, "pb");

        let fragments = translate(&mut ctx, "reqArgs", "", &roots[0], "h");
        assert_eq!(fragments.len(), 3);
        assert!(matches!(&fragments[1], FlagFragment::Unsupported { note } if note.contains("\"Meta\"")));
        assert_eq!(
            binds(&fragments),
            vec![pair("reqArgs.Id", "id"), pair("reqArgs.Name", "name")]
        );
    }

    #[test]
    fn test_recursive_message_terminates() {
        let roots = vec![message(
            "Node",
            vec![
                scalar("label", WireType::String),
                message_field("next", ".pb.Node"),
            ],
            vec![],
        )];
        let mut ctx = PassContext::new(&roots, "pb");

        let fragments = translate(&mut ctx, "reqArgs", "", &roots[0], "h");
        assert_eq!(binds(&fragments), vec![pair("reqArgs.Label", "label")]);
    }

    #[test]
    fn test_mutual_recursion_terminates() {
        let roots = vec![
            message(
                "Ping",
                vec![scalar("id", WireType::Int32), message_field("pong", ".pb.Pong")],
                vec![],
            ),
            message(
                "Pong",
                vec![scalar("id", WireType::Int32), message_field("ping", ".pb.Ping")],
                vec![],
            ),
        ];
        let mut ctx = PassContext::new(&roots, "pb");

        let fragments = translate(&mut ctx, "reqArgs", "", &roots[0], "h");
        assert_eq!(
            binds(&fragments),
            vec![pair("reqArgs.Id", "id"), pair("reqArgs.Pong.Id", "pong-id")]
        );
    }

    #[test]
    fn test_unresolved_and_foreign_fields_are_skipped() {
        let roots = vec![message(
            "Request",
            vec![
                message_field("missing", ".pb.DoesNotExist"),
                message_field("when", ".google.protobuf.Timestamp"),
                scalar("name", WireType::String),
            ],
            vec![],
        )];
        let mut ctx = PassContext::new(&roots, "pb");

        let fragments = translate(&mut ctx, "reqArgs", "", &roots[0], "h");
        assert_eq!(fragments.len(), 1);
        assert_eq!(binds(&fragments), vec![pair("reqArgs.Name", "name")]);
    }

    #[test]
    fn test_optional_and_oneof_fields_are_not_bound() {
        let roots = vec![
            message("Window", vec![scalar("width", WireType::Int32)], vec![]),
            message(
                "Profile",
                vec![
                    Field {
                        proto3_optional: true,
                        oneof_index: Some(0),
                        ..scalar("nick", WireType::String)
                    },
                    Field {
                        oneof_index: Some(1),
                        ..scalar("seconds", WireType::Int32)
                    },
                    Field {
                        oneof_index: Some(1),
                        ..message_field("window", ".pb.Window")
                    },
                    Field {
                        proto3_optional: true,
                        oneof_index: Some(2),
                        ..message_field("frame", ".pb.Window")
                    },
                    scalar("plain", WireType::Bool),
                ],
                vec![],
            ),
        ];
        let mut ctx = PassContext::new(&roots, "pb");

        let fragments = translate(&mut ctx, "reqArgs", "", &roots[1], "h");
        assert_eq!(
            fragments[0],
            FlagFragment::Unsupported {
                note: "optional flags are not yet supported (field \"nick\")".to_string()
            }
        );
        assert_eq!(
            fragments[1],
            FlagFragment::Unsupported {
                note: "oneof flags are not yet supported (field \"seconds\")".to_string()
            }
        );
        assert_eq!(
            fragments[2],
            FlagFragment::Unsupported {
                note: "oneof flags are not yet supported (field \"window\")".to_string()
            }
        );
        /* An optional message is still a plain pointer field */
        assert_eq!(
            binds(&fragments),
            vec![pair("reqArgs.Frame.Width", "frame-width"), pair("reqArgs.Plain", "plain")]
        );
    }

    #[test]
    fn test_prefix_is_applied() {
        let roots = nested_messages();
        let mut ctx = PassContext::new(&roots, "pb");
        let top = ctx.resolve("TopLevelNestedType").descriptor.unwrap();

        let fragments = translate(&mut ctx, "reqArgs.TopLevel", "toplevel-", top, "h");
        assert_eq!(fragments[0].flag_name(), Some("toplevel-value"));
    }
}

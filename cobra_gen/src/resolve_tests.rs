use super::*;
use crate::test_support::*;
use cobra_types::WireType;

#[cfg(test)]
mod resolve_tests {
    use super::*;

    #[test]
    fn test_top_level_lookup() {
        let roots = nested_messages();
        let mut cache = TypeCache::new();

        let resolution = cache.resolve(&roots, "TopLevelNestedType");
        assert!(resolution.found());
        assert!(!resolution.nested);
        assert_eq!(resolution.type_prefix(), "");
    }

    #[test]
    fn test_bare_name_finds_nested_type() {
        let roots = nested_messages();
        let mut cache = TypeCache::new();

        let resolution = cache.resolve(&roots, "InnerNestedType");
        assert!(resolution.found());
        assert!(resolution.nested);
        assert_eq!(resolution.scope, vec!["NestedRequest".to_string()]);
        assert_eq!(resolution.type_prefix(), "NestedRequest_");
    }

    #[test]
    fn test_dotted_path_walks_declarations() {
        let roots = nested_messages();
        let mut cache = TypeCache::new();

        let resolution = cache.resolve(
            &roots,
            "DeeplyNested.DeeplyNestedOuter.DeeplyNestedInner.DeeplyNestedInnermost",
        );
        assert!(resolution.nested);
        assert_eq!(
            resolution.type_prefix(),
            "DeeplyNested_DeeplyNestedOuter_DeeplyNestedInner_"
        );
        assert_eq!(resolution.descriptor.map(|m| m.name.as_str()), Some("DeeplyNestedInnermost"));
    }

    #[test]
    fn test_unknown_name_is_not_found_and_cached() {
        let roots = nested_messages();
        let mut cache = TypeCache::new();

        let miss = cache.resolve(&roots, "Nope");
        assert!(!miss.found());
        assert!(!miss.nested);
        assert_eq!(cache.resolve(&roots, "Nope"), miss);
        assert_eq!(cache.searches(), 1);
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn test_repeated_lookup_uses_cache() {
        let roots = nested_messages();
        let mut cache = TypeCache::new();

        let first = cache.resolve(&roots, "InnerNestedType");
        let second = cache.resolve(&roots, "InnerNestedType");
        assert_eq!(first, second);
        assert_eq!(cache.searches(), 1);
        assert!(cache.get("InnerNestedType").is_some());
    }

    #[test]
    fn test_first_match_in_declaration_order_wins() {
        /* Two messages each declare a nested `Item`; the earlier one wins */
        let roots = vec![
            message("First", vec![], vec![message("Item", vec![scalar("a", WireType::Bool)], vec![])]),
            message("Second", vec![], vec![message("Item", vec![scalar("b", WireType::Bool)], vec![])]),
        ];
        let mut cache = TypeCache::new();

        let resolution = cache.resolve(&roots, "Item");
        assert_eq!(resolution.scope, vec!["First".to_string()]);
        assert_eq!(resolution.descriptor.map(|m| m.fields[0].name.as_str()), Some("a"));

        /* An exact path still reaches the later declaration */
        let exact = cache.resolve(&roots, "Second.Item");
        assert_eq!(exact.scope, vec!["Second".to_string()]);
        assert_eq!(exact.descriptor.map(|m| m.fields[0].name.as_str()), Some("b"));
    }

    #[test]
    fn test_broken_path_is_not_found() {
        let roots = nested_messages();
        let mut cache = TypeCache::new();

        let resolution = cache.resolve(&roots, "Elsewhere.InnerNestedType");
        assert!(!resolution.found());
    }

    #[test]
    fn test_qualified_name_does_not_match_nested_namesake() {
        /* Only `Holder.Item` exists; `.pb.Item` names a top-level type */
        let roots = vec![
            message(
                "Holder",
                vec![],
                vec![message("Item", vec![scalar("secret", WireType::String)], vec![])],
            ),
            message("Req", vec![message_field("ref", ".pb.Item")], vec![]),
        ];
        let mut ctx = PassContext::new(&roots, "pb");

        assert!(!ctx.resolve_field(&roots[1].fields[0]).found());
        assert!(!ctx.resolve(".Item").found());

        /* The bare name still finds it */
        assert!(ctx.resolve("Item").found());
        assert!(ctx.resolve_reference(".pb.Holder.Item").found());
    }

    #[test]
    fn test_empty_name_is_not_found() {
        let roots = nested_messages();
        let mut cache = TypeCache::new();
        assert!(!cache.resolve(&roots, "").found());
    }

    #[test]
    fn test_field_resolution_strips_package() {
        let roots = nested_messages();
        let mut ctx = PassContext::new(&roots, "pb");

        let inner = ctx.resolve_field(&message_field("inner", ".pb.NestedRequest.InnerNestedType"));
        assert_eq!(inner.type_prefix(), "NestedRequest_");
        assert_eq!(inner.descriptor.map(|m| m.name.as_str()), Some("InnerNestedType"));

        let relative = ctx.resolve_field(&message_field("top", "TopLevelNestedType"));
        assert!(relative.found());

        let foreign = ctx.resolve_field(&message_field("ts", ".google.protobuf.Timestamp"));
        assert!(!foreign.found());

        let untyped = ctx.resolve_field(&scalar("value", WireType::String));
        assert!(!untyped.found());
    }
}

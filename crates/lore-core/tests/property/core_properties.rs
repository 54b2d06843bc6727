use proptest::prelude::*;

use lore_core::models::{ConceptNode, ConceptType, MatchTier};
use lore_core::text;

proptest! {
    #[test]
    fn slugify_is_idempotent(s in "[A-Za-z0-9 _!?-]{0,40}") {
        let once = text::slugify(&s);
        prop_assert_eq!(text::slugify(&once), once.clone());
        prop_assert!(!once.starts_with('_'));
        prop_assert!(!once.ends_with('_'));
        prop_assert!(!once.contains("__"));
    }

    #[test]
    fn cache_key_is_case_and_padding_insensitive(s in "[a-zA-Z ]{1,40}") {
        let padded = format!("  {}  ", s.to_uppercase());
        prop_assert_eq!(text::cache_key(&s), text::cache_key(&padded));
    }

    #[test]
    fn fingerprint_has_fixed_width(s in ".{0,400}") {
        prop_assert_eq!(text::fingerprint(&s).len(), 16);
    }

    #[test]
    fn keywords_are_unique_and_long_enough(s in "[a-zA-Z ,.?']{0,80}") {
        let kws = text::extract_keywords(&s);
        let mut sorted = kws.clone();
        sorted.sort();
        sorted.dedup();
        prop_assert_eq!(sorted.len(), kws.len());
        for k in &kws {
            prop_assert!(k.chars().count() >= 3);
            prop_assert!(!text::is_stopword(k));
        }
    }

    #[test]
    fn merge_never_shrinks_documents(
        a in proptest::collection::btree_set("ep[0-9]", 0..6),
        b in proptest::collection::btree_set("ep[0-9]", 0..6),
    ) {
        let mut node = ConceptNode::new("Sleep", ConceptType::Outcome).with_documents(a.clone());
        let other = ConceptNode::new("Sleep", ConceptType::Outcome).with_documents(b.clone());
        node.merge(&other);
        prop_assert!(node.source_document_ids.is_superset(&a));
        prop_assert!(node.source_document_ids.is_superset(&b));
    }

    #[test]
    fn exact_name_always_wins(name in "[a-z]{3,12}", extra in "[a-z]{1,6}") {
        let exact = MatchTier::of_name(&name, &name);
        let longer = MatchTier::of_name(&format!("{name} {extra}"), &name);
        prop_assert_eq!(exact, Some(MatchTier::Exact));
        prop_assert!(longer.is_some());
        prop_assert!(exact < longer);
    }
}

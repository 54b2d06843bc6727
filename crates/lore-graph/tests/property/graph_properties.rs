//! Property tests for entity linking, the linker, and path search.

use std::sync::Arc;

use proptest::prelude::*;

use lore_core::config::{GraphConfig, LinkerConfig};
use lore_core::models::{ConceptType, RelationshipEdge, RelationshipType};
use lore_core::traits::{GraphWrite, IGraphStore};
use lore_graph::entity_linking::extract_mentions;
use lore_graph::{CrossEpisodeLinker, LinkOptions, PathReasoner};
use lore_storage::InMemoryGraphStore;

const DOCS: [&str; 6] = ["d0", "d1", "d2", "d3", "d4", "d5"];

/// Nodes `n0..nN` each present in a subset of six documents, plus random
/// RELATES_TO edges between them.
fn random_graph() -> impl Strategy<Value = (Vec<Vec<bool>>, Vec<(usize, usize)>)> {
    (2usize..8).prop_flat_map(|n| {
        (
            prop::collection::vec(prop::collection::vec(any::<bool>(), DOCS.len()), n),
            prop::collection::vec((0..n, 0..n), 0..12),
        )
    })
}

fn seed(docs: &[Vec<bool>], edges: &[(usize, usize)]) -> Arc<InMemoryGraphStore> {
    let mut writes: Vec<GraphWrite> = docs
        .iter()
        .enumerate()
        .map(|(i, present)| {
            let in_docs: Vec<&str> = DOCS
                .iter()
                .zip(present)
                .filter(|(_, p)| **p)
                .map(|(d, _)| *d)
                .collect();
            GraphWrite::UpsertNode(test_fixtures::node(
                &format!("n{i}"),
                ConceptType::Concept,
                &in_docs,
            ))
        })
        .collect();
    for (a, b) in edges {
        if a != b {
            writes.push(GraphWrite::UpsertEdge(RelationshipEdge::new(
                &format!("concept:n{a}"),
                &format!("concept:n{b}"),
                RelationshipType::RelatesTo,
            )));
        }
    }
    let store = Arc::new(InMemoryGraphStore::new());
    store
        .write_batch(&test_fixtures::workspace("prop"), &writes)
        .unwrap();
    store
}

proptest! {
    #[test]
    fn mentions_are_trimmed_and_unique(query in "[A-Za-z\"' ]{0,60}") {
        let mentions = extract_mentions(&query);
        for (i, m) in mentions.iter().enumerate() {
            prop_assert!(!m.is_empty());
            prop_assert_eq!(m.trim(), m.as_str());
            for other in &mentions[i + 1..] {
                prop_assert!(!m.eq_ignore_ascii_case(other));
            }
        }
    }

    #[test]
    fn confidence_is_bounded_and_monotonic(a in 0usize..50, b in 0usize..50) {
        let options = LinkOptions::default();
        let (lo, hi) = (a.min(b), a.max(b));
        prop_assert!((0.0..=1.0).contains(&options.confidence(a)));
        prop_assert!(options.confidence(lo) <= options.confidence(hi));
    }

    #[test]
    fn linker_reaches_a_fixed_point(
        (docs, edges) in random_graph(),
        min_confidence in 0.0f64..0.6,
    ) {
        let store = seed(&docs, &edges);
        let ws = test_fixtures::workspace("prop");
        let linker = CrossEpisodeLinker::new(store.clone(), LinkerConfig::default());
        let options = LinkOptions { min_confidence, ..LinkOptions::default() };

        let first = linker.create_links(&ws, &options).unwrap();
        prop_assert_eq!(first.pairs_considered, first.created + first.skipped);

        let second = linker.create_links(&ws, &options).unwrap();
        prop_assert_eq!(second.created, 0);
        prop_assert_eq!(second.pairs_considered, first.pairs_considered);

        for edge in store.edges(&ws).unwrap() {
            if edge.relationship == RelationshipType::CrossEpisode {
                prop_assert!(edge.confidence >= min_confidence);
            }
        }
    }

    #[test]
    fn one_hop_paths_are_direct_edges(
        (docs, edges) in random_graph(),
        from in 0usize..8,
        to in 0usize..8,
    ) {
        let n = docs.len();
        let (from, to) = (from % n, to % n);
        let store = seed(&docs, &edges);
        let ws = test_fixtures::workspace("prop");
        let reasoner = PathReasoner::new(store, GraphConfig::default());
        let source = format!("concept:n{from}");
        let target = format!("concept:n{to}");

        let paths = reasoner.find_paths(&ws, &source, &target, 1, &[]).unwrap();
        for path in &paths {
            prop_assert_eq!(path.hops, 1);
        }
        let direct = from != to && edges.contains(&(from, to));
        prop_assert_eq!(!paths.is_empty(), direct);
        prop_assert!(reasoner.find_paths(&ws, &source, &target, 0, &[]).unwrap().is_empty());
    }
}

use proptest::prelude::*;

use lore_core::models::{ConceptNode, ConceptType, RelationshipEdge, RelationshipType};
use lore_core::traits::{GraphQuery, GraphRow, GraphWrite, IGraphStore};
use lore_storage::InMemoryGraphStore;
use test_fixtures::workspace;

const TYPES: [RelationshipType; 3] = [
    RelationshipType::Causes,
    RelationshipType::Enables,
    RelationshipType::RelatesTo,
];

fn build(edges: &[(usize, usize, usize)], nodes: usize) -> InMemoryGraphStore {
    let store = InMemoryGraphStore::new();
    let mut writes: Vec<GraphWrite> = (0..nodes)
        .map(|i| GraphWrite::UpsertNode(ConceptNode::new(&format!("n{i}"), ConceptType::Concept)))
        .collect();
    for (s, t, ty) in edges {
        writes.push(GraphWrite::UpsertEdge(RelationshipEdge::new(
            &format!("concept:n{s}"),
            &format!("concept:n{t}"),
            TYPES[*ty],
        )));
    }
    store.write_batch(&workspace("prop"), &writes).unwrap();
    store
}

proptest! {
    #[test]
    fn paths_are_bounded_simple_and_typed(
        edges in proptest::collection::vec((0usize..6, 0usize..6, 0usize..3), 0..20),
        max_hops in 0usize..5,
        ty in 0usize..3,
    ) {
        let store = build(&edges, 6);
        let rows = store.read(&workspace("prop"), &GraphQuery::PathsBetween {
            source_id: "concept:n0".into(),
            target_id: "concept:n5".into(),
            max_hops,
            relationship_types: vec![TYPES[ty]],
            limit: 25,
        }).unwrap();
        let paths = GraphRow::paths(rows);
        prop_assert!(paths.len() <= 25);
        let mut last_hops = 0;
        for p in &paths {
            prop_assert!(p.hops >= 1 && p.hops <= max_hops);
            prop_assert!(p.hops >= last_hops);
            last_hops = p.hops;
            prop_assert_eq!(p.node_ids.len(), p.hops + 1);
            prop_assert!(p.edge_types.iter().all(|t| *t == TYPES[ty]));
            let mut ids = p.node_ids.clone();
            ids.sort();
            ids.dedup();
            prop_assert_eq!(ids.len(), p.node_ids.len());
            prop_assert_eq!(p.source_id(), Some("concept:n0"));
            prop_assert_eq!(p.target_id(), Some("concept:n5"));
        }
    }

    #[test]
    fn pairs_meet_thresholds(
        docs in proptest::collection::vec(proptest::collection::btree_set("ep[0-5]", 0..5), 2..8),
        min_shared in 1usize..4,
    ) {
        let store = InMemoryGraphStore::new();
        let writes: Vec<GraphWrite> = docs.iter().enumerate().map(|(i, d)| {
            GraphWrite::UpsertNode(
                ConceptNode::new(&format!("n{i}"), ConceptType::Concept).with_documents(d.iter().cloned()),
            )
        }).collect();
        let ws = workspace("pairs");
        store.write_batch(&ws, &writes).unwrap();
        let pairs = GraphRow::pairs(store.read(&ws, &GraphQuery::CoOccurringPairs {
            min_episodes: 2,
            min_shared,
            limit: 1000,
        }).unwrap());
        for p in &pairs {
            prop_assert!(p.first.id < p.second.id);
            prop_assert!(p.first.episode_count() >= 2 && p.second.episode_count() >= 2);
            prop_assert!(p.shared_count() >= min_shared);
            let expected: std::collections::BTreeSet<_> = p.first.source_document_ids
                .intersection(&p.second.source_document_ids).cloned().collect();
            prop_assert_eq!(&p.shared_documents, &expected);
        }
    }
}

use lore_core::constants::{INFLUENCE_TYPES, LEADS_TO_TYPES};
use lore_core::models::{ConceptType, EdgeDirection, RelationshipEdge, RelationshipType};
use lore_core::traits::{GraphQuery, GraphRow, GraphWrite, IGraphStore, WriteOutcome};
use lore_storage::InMemoryGraphStore;
use test_fixtures::{corpus, workspace};

fn seeded() -> (InMemoryGraphStore, lore_core::WorkspaceId) {
    let store = InMemoryGraphStore::new();
    let ws = corpus().seed_graph(&store);
    (store, ws)
}

#[test]
fn seeding_creates_every_node_and_edge() {
    let (store, ws) = seeded();
    let c = corpus();
    assert_eq!(store.node_count(&ws).unwrap(), c.concepts.len());
    assert_eq!(store.edge_count(&ws).unwrap(), c.relationships.len());
}

#[test]
fn reseeding_is_unchanged() {
    let (store, ws) = seeded();
    let outcomes = store.write_batch(&ws, &corpus().graph_writes()).unwrap();
    assert!(outcomes.iter().all(|o| *o == WriteOutcome::Unchanged));
}

#[test]
fn match_nodes_ranks_exact_names_first_with_preview() {
    let (store, ws) = seeded();
    let rows = store
        .read(
            &ws,
            &GraphQuery::MatchNodes {
                terms: vec!["Meditation".into()],
                limit: 10,
            },
        )
        .unwrap();
    let nodes = GraphRow::nodes(rows);
    assert_eq!(nodes[0].node.id, "practice:meditation");
    let preview = &nodes[0].preview;
    assert!(preview.iter().any(|p| p.relationship == RelationshipType::Optimizes
        && p.neighbor_name == "Clarity"
        && p.direction == EdgeDirection::Outgoing));
}

#[test]
fn workspaces_are_isolated() {
    let (store, _) = seeded();
    let other = workspace("someone-else");
    let rows = store
        .read(
            &other,
            &GraphQuery::MatchNodes {
                terms: vec!["meditation".into()],
                limit: 10,
            },
        )
        .unwrap();
    assert!(rows.is_empty());
}

#[test]
fn paths_between_respect_hop_bound() {
    let (store, ws) = seeded();
    let query = |max_hops| GraphQuery::PathsBetween {
        source_id: "practice:morning_sunlight".into(),
        target_id: "outcome:sleep_quality".into(),
        max_hops,
        relationship_types: vec![],
        limit: 10,
    };
    assert!(store.read(&ws, &query(1)).unwrap().is_empty());
    let paths = GraphRow::paths(store.read(&ws, &query(2)).unwrap());
    assert_eq!(paths.len(), 1);
    assert_eq!(paths[0].hops, 2);
    assert_eq!(
        paths[0].edge_types,
        vec![RelationshipType::Influences, RelationshipType::LeadsTo]
    );
}

#[test]
fn paths_between_terms_link_different_terms() {
    let (store, ws) = seeded();
    let rows = store
        .read(
            &ws,
            &GraphQuery::PathsBetweenTerms {
                terms: vec!["cold exposure".into(), "focus".into()],
                max_hops: 3,
                relationship_type: None,
                limit: 10,
            },
        )
        .unwrap();
    let paths = GraphRow::paths(rows);
    assert_eq!(paths.len(), 1);
    assert_eq!(paths[0].node_names, vec!["Cold Exposure", "Dopamine", "Focus"]);
}

#[test]
fn paths_into_filters_source_type_and_edge_types() {
    let (store, ws) = seeded();
    let rows = store
        .read(
            &ws,
            &GraphQuery::PathsInto {
                target: "clarity".into(),
                max_hops: 3,
                relationship_types: LEADS_TO_TYPES.to_vec(),
                source_type: Some(ConceptType::Practice),
                limit: 10,
            },
        )
        .unwrap();
    let paths = GraphRow::paths(rows);
    assert_eq!(paths.len(), 1);
    assert_eq!(paths[0].source_name(), Some("Meditation"));
    assert_eq!(paths[0].hops, 1);

    let influencers = GraphRow::paths(
        store
            .read(
                &ws,
                &GraphQuery::PathsInto {
                    target: "focus".into(),
                    max_hops: 2,
                    relationship_types: INFLUENCE_TYPES.to_vec(),
                    source_type: None,
                    limit: 10,
                },
            )
            .unwrap(),
    );
    let sources: Vec<_> = influencers.iter().filter_map(|p| p.source_name()).collect();
    assert_eq!(sources, vec!["Dopamine", "Cold Exposure"]);
}

#[test]
fn co_occurring_pairs_are_ranked_by_shared_documents() {
    let (store, ws) = seeded();
    let pairs = GraphRow::pairs(
        store
            .read(
                &ws,
                &GraphQuery::CoOccurringPairs {
                    min_episodes: 2,
                    min_shared: 2,
                    limit: 100,
                },
            )
            .unwrap(),
    );
    assert_eq!(pairs.len(), 13);
    assert_eq!(pairs[0].shared_count(), 3);
    assert_eq!(pairs[0].first.id, "outcome:sleep_quality");
    assert_eq!(pairs[0].second.id, "person:andrew_huberman");
    assert!(pairs.windows(2).all(|w| w[0].shared_count() >= w[1].shared_count()));
}

#[test]
fn cross_episode_edges_are_not_traversed_by_default() {
    let (store, ws) = seeded();
    let link = lore_core::traits::CrossEpisodeLink {
        source_id: "practice:meditation".into(),
        target_id: "concept:dopamine".into(),
        shared_episodes: ["ep2".to_string()].into_iter().collect(),
        co_occurrence_count: 1,
        confidence: 0.1,
        description: "test".into(),
    };
    store
        .write_batch(&ws, &[GraphWrite::UpsertCrossEpisode(link)])
        .unwrap();
    let any_type = GraphRow::paths(
        store
            .read(
                &ws,
                &GraphQuery::PathsBetween {
                    source_id: "practice:meditation".into(),
                    target_id: "concept:dopamine".into(),
                    max_hops: 1,
                    relationship_types: vec![],
                    limit: 10,
                },
            )
            .unwrap(),
    );
    assert!(any_type.is_empty());
    let explicit = store
        .read(
            &ws,
            &GraphQuery::PathsBetween {
                source_id: "practice:meditation".into(),
                target_id: "concept:dopamine".into(),
                max_hops: 1,
                relationship_types: vec![RelationshipType::CrossEpisode],
                limit: 10,
            },
        )
        .unwrap();
    assert_eq!(explicit.len(), 1);
}

#[test]
fn generic_cross_episode_edge_is_rejected() {
    let (store, ws) = seeded();
    let edge = RelationshipEdge::new(
        "practice:meditation",
        "outcome:clarity",
        RelationshipType::CrossEpisode,
    );
    let outcomes = store.write_batch(&ws, &[GraphWrite::UpsertEdge(edge)]).unwrap();
    assert_eq!(outcomes, vec![WriteOutcome::Rejected]);
}

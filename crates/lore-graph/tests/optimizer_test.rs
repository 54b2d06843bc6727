//! Graph query optimizer against the in-memory graph seeded with the
//! wellness corpus.

use std::sync::Arc;
use std::time::{Duration, Instant};

use lore_core::config::GraphConfig;
use lore_core::models::{
    ConceptType, GraphHit, MatchTier, RelationshipEdge, RelationshipType, WorkspaceId,
};
use lore_core::traits::{GraphWrite, IGraphStore};
use lore_graph::{GraphQueryOptimizer, GraphQueryType, GraphSearchOptions};
use lore_storage::InMemoryGraphStore;
use test_fixtures::doubles::{ScriptedEntityAssist, UnavailableGraphStore};

fn seeded() -> (Arc<InMemoryGraphStore>, WorkspaceId) {
    let store = Arc::new(InMemoryGraphStore::new());
    let ws = test_fixtures::corpus().seed_graph(store.as_ref());
    (store, ws)
}

fn optimizer() -> (GraphQueryOptimizer, WorkspaceId) {
    let (store, ws) = seeded();
    (GraphQueryOptimizer::new(store, GraphConfig::default()), ws)
}

fn node_names(hits: &[GraphHit]) -> Vec<String> {
    hits.iter()
        .filter_map(GraphHit::as_node)
        .map(|n| n.node.name.clone())
        .collect()
}

// ---------------------------------------------------------------------------
// Entity-centric and entity linking
// ---------------------------------------------------------------------------

#[test]
fn entity_centric_ranks_exact_name_first() {
    let (opt, ws) = optimizer();
    let hits = opt.search(&ws, "meditation", &GraphSearchOptions::default());
    let first = hits[0].as_node().unwrap();
    assert_eq!(first.node.name, "Meditation");
    assert_eq!(first.match_tier, Some(MatchTier::Exact));
    assert_eq!(first.episode_count, 2);
    assert!(!first.preview.is_empty());
}

#[test]
fn nickname_resolves_to_canonical_person() {
    let (opt, ws) = optimizer();
    let hits = opt.search(&ws, "What did Huberman recommend?", &GraphSearchOptions::default());
    let first = hits[0].as_node().unwrap();
    assert_eq!(first.node.id, "person:andrew_huberman");
    assert_eq!(first.match_tier, Some(MatchTier::Exact));
    assert_eq!(first.matched_term.as_deref(), Some("Andrew Huberman"));
}

#[test]
fn exact_candidate_outranks_substring_candidate() {
    let store = Arc::new(InMemoryGraphStore::new());
    let ws = test_fixtures::workspace("precedence");
    let writes = vec![
        GraphWrite::UpsertNode(test_fixtures::node("Sleep", ConceptType::Outcome, &["d1"])),
        GraphWrite::UpsertNode(test_fixtures::node(
            "Sleep Hygiene Routine",
            ConceptType::Practice,
            &["d1", "d2", "d3"],
        )),
    ];
    store.write_batch(&ws, &writes).unwrap();

    let opt = GraphQueryOptimizer::new(store, GraphConfig::default());
    let hits = opt.search(
        &ws,
        "What did they say about \"Sleep\" and \"Hygiene\"?",
        &GraphSearchOptions::default().with_type(GraphQueryType::EntityLinking),
    );
    let nodes: Vec<_> = hits.iter().filter_map(GraphHit::as_node).collect();
    assert_eq!(nodes.len(), 2);
    assert_eq!(nodes[0].node.name, "Sleep");
    assert_eq!(nodes[0].match_tier, Some(MatchTier::Exact));
    assert_eq!(nodes[1].node.name, "Sleep Hygiene Routine");
    // The substring match covers both mentions and still ranks second.
    assert!(nodes[1].score > nodes[0].score);
}

#[test]
fn entity_assist_suggestions_join_the_candidates() {
    let (store, ws) = seeded();
    let opt = GraphQueryOptimizer::new(store, GraphConfig::default()).with_entity_assist(
        Arc::new(ScriptedEntityAssist {
            suggestions: vec!["Morning Sunlight".to_string()],
            fail: false,
            delay: None,
        }),
    );
    let hits = opt.search(
        &ws,
        "what did the host recommend first thing",
        &GraphSearchOptions::default(),
    );
    assert_eq!(node_names(&hits)[0], "Morning Sunlight");
}

#[test]
fn failing_entity_assist_is_ignored() {
    let (store, ws) = seeded();
    let plain = GraphQueryOptimizer::new(store.clone(), GraphConfig::default());
    let assisted = GraphQueryOptimizer::new(store, GraphConfig::default()).with_entity_assist(
        Arc::new(ScriptedEntityAssist {
            suggestions: vec![],
            fail: true,
            delay: None,
        }),
    );
    let q = "What did Huberman recommend?";
    let options = GraphSearchOptions::default();
    assert_eq!(plain.search(&ws, q, &options), assisted.search(&ws, q, &options));
}

#[test]
fn slow_entity_assist_does_not_block_results() {
    let (store, ws) = seeded();
    let config = GraphConfig {
        entity_assist_budget_ms: 50,
        ..GraphConfig::default()
    };
    let opt = GraphQueryOptimizer::new(store, config).with_entity_assist(Arc::new(
        ScriptedEntityAssist {
            suggestions: vec!["Focus".to_string()],
            fail: false,
            delay: Some(Duration::from_millis(800)),
        },
    ));
    let started = Instant::now();
    let hits = opt.search(&ws, "What did Huberman recommend?", &GraphSearchOptions::default());
    assert!(started.elapsed() < Duration::from_millis(600));
    assert_eq!(node_names(&hits), vec!["Andrew Huberman".to_string()]);
}

// ---------------------------------------------------------------------------
// Multi-hop
// ---------------------------------------------------------------------------

#[test]
fn multi_hop_follows_the_verb_relationship() {
    let (opt, ws) = optimizer();
    let hits = opt.search(
        &ws,
        "How does circadian rhythm lead to sleep quality?",
        &GraphSearchOptions::default(),
    );
    assert_eq!(hits.len(), 1);
    let path = hits[0].as_path().unwrap();
    assert_eq!(path.path.hops, 1);
    assert_eq!(path.path.edge_types, vec![RelationshipType::LeadsTo]);
    assert_eq!(path.endpoint_tier, MatchTier::Prefix);
    assert!(!path.widened);
}

#[test]
fn multi_hop_widens_when_no_typed_path_exists() {
    let (opt, ws) = optimizer();
    let hits = opt.search(
        &ws,
        "Does morning sunlight lead to sleep quality?",
        &GraphSearchOptions::default(),
    );
    let path = hits[0].as_path().unwrap();
    assert_eq!(
        path.path.describe(),
        "Morning Sunlight -[INFLUENCES]-> Circadian Rhythm -[LEADS_TO]-> Sleep Quality"
    );
    assert_eq!(path.path.hops, 2);
    assert!(path.widened);
}

fn gratitude_graph() -> (GraphQueryOptimizer, WorkspaceId) {
    let store = Arc::new(InMemoryGraphStore::new());
    let ws = test_fixtures::workspace("gratitude");
    let gratitude = test_fixtures::node("Gratitude", ConceptType::Practice, &["d1", "d2"]);
    let relationships = test_fixtures::node("Relationships", ConceptType::Outcome, &["d1", "d2", "d3"]);
    let edge = RelationshipEdge::new(&gratitude.id, &relationships.id, RelationshipType::Optimizes);
    let writes = vec![
        GraphWrite::UpsertNode(gratitude),
        GraphWrite::UpsertNode(relationships),
        GraphWrite::UpsertEdge(edge),
    ];
    store.write_batch(&ws, &writes).unwrap();
    (GraphQueryOptimizer::new(store, GraphConfig::default()), ws)
}

#[test]
fn multi_hop_keeps_nouns_that_share_a_verb_stem() {
    let (opt, ws) = gratitude_graph();
    let hits = opt.search(
        &ws,
        "Does gratitude improve relationships?",
        &GraphSearchOptions::default().with_type(GraphQueryType::MultiHop),
    );
    assert_eq!(hits.len(), 1);
    let path = hits[0].as_path().unwrap();
    assert_eq!(path.path.describe(), "Gratitude -[OPTIMIZES]-> Relationships");
    assert_eq!(path.endpoint_tier, MatchTier::Exact);
    assert!(!path.widened);
}

#[test]
fn hop_bound_is_clamped_to_at_least_one() {
    let (opt, ws) = optimizer();
    let hits = opt.search(
        &ws,
        "meditation clarity",
        &GraphSearchOptions::default()
            .with_type(GraphQueryType::MultiHop)
            .with_max_hops(0),
    );
    assert_eq!(hits.len(), 1);
    assert_eq!(
        hits[0].as_path().unwrap().path.describe(),
        "Meditation -[OPTIMIZES]-> Clarity"
    );
}

#[test]
fn two_hop_path_is_out_of_reach_with_one_hop() {
    let (opt, ws) = optimizer();
    let hits = opt.search(
        &ws,
        "morning sunlight sleep quality",
        &GraphSearchOptions::default()
            .with_type(GraphQueryType::MultiHop)
            .with_max_hops(1),
    );
    assert!(hits.is_empty());
}

// ---------------------------------------------------------------------------
// Cross-episode
// ---------------------------------------------------------------------------

#[test]
fn cross_episode_lists_recurring_concepts() {
    let (opt, ws) = optimizer();
    let hits = opt.search(
        &ws,
        "Which concepts appear across multiple episodes?",
        &GraphSearchOptions::default(),
    );
    let nodes: Vec<_> = hits.iter().filter_map(GraphHit::as_node).collect();
    assert_eq!(nodes.len(), 9);
    assert_eq!(nodes[0].node.name, "Andrew Huberman");
    assert_eq!(nodes[0].episode_count, 4);
    assert_eq!(nodes[0].match_tier, None);
    assert!((nodes[0].score - 1.0).abs() < 1e-12);
    assert!(nodes.iter().all(|n| n.node.source_document_ids.len() >= 2));
    assert!(nodes.windows(2).all(|w| w[0].episode_count >= w[1].episode_count));
}

#[test]
fn cross_episode_with_topic_filters_by_text() {
    let (opt, ws) = optimizer();
    let hits = opt.search(
        &ws,
        "Which recurring topics relate to sleep?",
        &GraphSearchOptions::default(),
    );
    assert_eq!(node_names(&hits), vec!["Sleep Quality".to_string()]);
    let hit = hits[0].as_node().unwrap();
    assert_eq!(hit.match_tier, Some(MatchTier::Prefix));
    assert_eq!(hit.node.source_document_ids.len(), 3);
}

#[test]
fn cross_episode_topic_may_share_a_verb_stem() {
    let (opt, ws) = gratitude_graph();
    let hits = opt.search(
        &ws,
        "Which relationships recur across episodes?",
        &GraphSearchOptions::default(),
    );
    assert_eq!(node_names(&hits), vec!["Relationships".to_string()]);
    assert_eq!(hits[0].as_node().unwrap().match_tier, Some(MatchTier::Exact));
}

// ---------------------------------------------------------------------------
// Degradation
// ---------------------------------------------------------------------------

#[test]
fn zero_limit_is_empty() {
    let (opt, ws) = optimizer();
    assert!(opt
        .search(&ws, "meditation", &GraphSearchOptions::default().with_limit(0))
        .is_empty());
}

#[test]
fn unavailable_store_degrades_to_empty() {
    let opt = GraphQueryOptimizer::new(Arc::new(UnavailableGraphStore), GraphConfig::default());
    let ws = test_fixtures::workspace("down");
    for t in GraphQueryType::ALL {
        let hits = opt.search(
            &ws,
            "meditation and clarity",
            &GraphSearchOptions::default().with_type(t),
        );
        assert!(hits.is_empty(), "{t}");
    }
}

//! Write application for the in-memory graph.

use chrono::Utc;
use petgraph::visit::EdgeRef;
use petgraph::Direction;

use lore_core::models::{RelationshipEdge, RelationshipType};
use lore_core::traits::{CrossEpisodeLink, GraphWrite, WriteOutcome};

use super::concept_graph::ConceptGraph;

pub fn apply(graph: &mut ConceptGraph, write: &GraphWrite) -> WriteOutcome {
    match write {
        GraphWrite::UpsertNode(node) => match graph.get_node(&node.id) {
            Some(idx) => match graph.graph.node_weight_mut(idx) {
                Some(existing) => {
                    if existing.merge(node) {
                        WriteOutcome::Updated
                    } else {
                        WriteOutcome::Unchanged
                    }
                }
                None => WriteOutcome::MissingEndpoint,
            },
            None => {
                graph.add_node(node.clone());
                WriteOutcome::Created
            }
        },
        GraphWrite::UpsertEdge(edge) => upsert_edge(graph, edge),
        GraphWrite::UpsertCrossEpisode(link) => upsert_cross_episode(graph, link),
    }
}

fn upsert_edge(graph: &mut ConceptGraph, edge: &RelationshipEdge) -> WriteOutcome {
    if edge.relationship == RelationshipType::CrossEpisode {
        return WriteOutcome::Rejected;
    }
    let (Some(source), Some(target)) = (graph.get_node(&edge.source_id), graph.get_node(&edge.target_id))
    else {
        return WriteOutcome::MissingEndpoint;
    };
    let Some(existing) = graph
        .find_edge(source, target, edge.relationship)
        .and_then(|idx| graph.graph.edge_weight_mut(idx))
    else {
        graph.graph.add_edge(source, target, edge.clone());
        return WriteOutcome::Created;
    };

    let before = (
        existing.source_document_ids.len(),
        existing.description.clone(),
        existing.confidence,
    );
    existing
        .source_document_ids
        .extend(edge.source_document_ids.iter().cloned());
    if !edge.description.is_empty() {
        existing.description = edge.description.clone();
    }
    existing.confidence = existing.confidence.max(edge.confidence);
    let after = (
        existing.source_document_ids.len(),
        existing.description.clone(),
        existing.confidence,
    );
    if before == after {
        WriteOutcome::Unchanged
    } else {
        existing.updated_at = Utc::now();
        WriteOutcome::Updated
    }
}

fn upsert_cross_episode(graph: &mut ConceptGraph, link: &CrossEpisodeLink) -> WriteOutcome {
    let (Some(source), Some(target)) = (graph.get_node(&link.source_id), graph.get_node(&link.target_id))
    else {
        return WriteOutcome::MissingEndpoint;
    };

    // At most one CROSS_EPISODE edge per pair, whichever direction it was
    // first written in.
    let existing = graph
        .graph
        .edges_directed(source, Direction::Outgoing)
        .chain(graph.graph.edges_directed(source, Direction::Incoming))
        .find(|e| {
            e.weight().relationship == RelationshipType::CrossEpisode
                && (e.target() == target || e.source() == target)
        })
        .map(|e| e.id());

    let Some(existing) = existing.and_then(|idx| graph.graph.edge_weight_mut(idx)) else {
        let mut edge = RelationshipEdge::new(
            &link.source_id,
            &link.target_id,
            RelationshipType::CrossEpisode,
        )
        .with_description(&link.description)
        .with_documents(link.shared_episodes.iter().cloned())
        .with_confidence(link.confidence);
        edge.co_occurrence_count = Some(link.co_occurrence_count);
        graph.graph.add_edge(source, target, edge);
        return WriteOutcome::Created;
    };

    let before = (
        existing.source_document_ids.len(),
        existing.co_occurrence_count,
        existing.confidence,
        existing.description.clone(),
    );
    existing
        .source_document_ids
        .extend(link.shared_episodes.iter().cloned());
    existing.co_occurrence_count = Some(link.co_occurrence_count);
    existing.confidence = link.confidence;
    existing.description = link.description.clone();
    let after = (
        existing.source_document_ids.len(),
        existing.co_occurrence_count,
        existing.confidence,
        existing.description.clone(),
    );
    if before == after {
        WriteOutcome::Unchanged
    } else {
        existing.updated_at = Utc::now();
        WriteOutcome::Updated
    }
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeSet;

    use lore_core::models::{ConceptNode, ConceptType};

    use super::*;

    fn graph() -> ConceptGraph {
        let mut g = ConceptGraph::new();
        for name in ["Meditation", "Clarity"] {
            let t = if name == "Meditation" {
                ConceptType::Practice
            } else {
                ConceptType::Outcome
            };
            apply(&mut g, &GraphWrite::UpsertNode(ConceptNode::new(name, t)));
        }
        g
    }

    fn link(count: usize, episodes: &[&str]) -> CrossEpisodeLink {
        CrossEpisodeLink {
            source_id: "practice:meditation".into(),
            target_id: "outcome:clarity".into(),
            shared_episodes: episodes.iter().map(|s| s.to_string()).collect::<BTreeSet<_>>(),
            co_occurrence_count: count,
            confidence: count as f64 / 10.0,
            description: format!("co-occur in {count} episodes"),
        }
    }

    #[test]
    fn generic_edge_cannot_carry_cross_episode() {
        let mut g = graph();
        let edge = RelationshipEdge::new(
            "practice:meditation",
            "outcome:clarity",
            RelationshipType::CrossEpisode,
        );
        assert_eq!(apply(&mut g, &GraphWrite::UpsertEdge(edge)), WriteOutcome::Rejected);
        assert_eq!(g.edge_count(), 0);
    }

    #[test]
    fn edge_to_missing_node_is_reported() {
        let mut g = graph();
        let edge = RelationshipEdge::new("practice:meditation", "outcome:focus", RelationshipType::Causes);
        assert_eq!(
            apply(&mut g, &GraphWrite::UpsertEdge(edge)),
            WriteOutcome::MissingEndpoint
        );
    }

    #[test]
    fn cross_episode_upsert_is_idempotent() {
        let mut g = graph();
        let w = GraphWrite::UpsertCrossEpisode(link(2, &["ep1", "ep2"]));
        assert_eq!(apply(&mut g, &w), WriteOutcome::Created);
        assert_eq!(apply(&mut g, &w), WriteOutcome::Unchanged);
        let wider = GraphWrite::UpsertCrossEpisode(link(3, &["ep1", "ep3"]));
        assert_eq!(apply(&mut g, &wider), WriteOutcome::Updated);
        assert_eq!(g.edge_count(), 1);
        let edge = g.graph.edge_weights().next().unwrap();
        assert_eq!(edge.source_document_ids.len(), 3);
        assert_eq!(edge.co_occurrence_count, Some(3));
    }

    #[test]
    fn node_upsert_merges_documents() {
        let mut g = graph();
        let again = ConceptNode::new("Meditation", ConceptType::Practice).with_documents(["ep4"]);
        assert_eq!(apply(&mut g, &GraphWrite::UpsertNode(again.clone())), WriteOutcome::Updated);
        assert_eq!(apply(&mut g, &GraphWrite::UpsertNode(again)), WriteOutcome::Unchanged);
    }
}

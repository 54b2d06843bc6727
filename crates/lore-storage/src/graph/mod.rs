//! In-memory property graph, one petgraph `StableGraph` per workspace.

mod co_occurrence;
mod concept_graph;
mod matching;
mod paths;
mod writes;

use std::sync::{Arc, RwLock};

use dashmap::DashMap;
use tracing::debug;

use lore_core::errors::{LoreError, LoreResult};
use lore_core::models::{ConceptNode, RelationshipEdge, WorkspaceId};
use lore_core::traits::{GraphQuery, GraphRow, GraphWrite, IGraphStore, NodeRecord, WriteOutcome};

pub use concept_graph::ConceptGraph;
pub use paths::EdgeFilter;

const STORE_NAME: &str = "in-memory-graph";

/// Reference graph adapter.
#[derive(Default)]
pub struct InMemoryGraphStore {
    workspaces: DashMap<WorkspaceId, Arc<RwLock<ConceptGraph>>>,
}

impl InMemoryGraphStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn existing(&self, workspace: &WorkspaceId) -> Option<Arc<RwLock<ConceptGraph>>> {
        self.workspaces.get(workspace).map(|g| Arc::clone(&g))
    }

    fn ensure(&self, workspace: &WorkspaceId) -> Arc<RwLock<ConceptGraph>> {
        Arc::clone(&self.workspaces.entry(workspace.clone()).or_default())
    }

    fn with_graph<T>(
        &self,
        workspace: &WorkspaceId,
        empty: T,
        f: impl FnOnce(&ConceptGraph) -> T,
    ) -> LoreResult<T> {
        let Some(shared) = self.existing(workspace) else {
            return Ok(empty);
        };
        let guard = shared
            .read()
            .map_err(|e| LoreError::ConcurrencyError(e.to_string()))?;
        Ok(f(&guard))
    }

    pub fn node(&self, workspace: &WorkspaceId, id: &str) -> LoreResult<Option<ConceptNode>> {
        self.with_graph(workspace, None, |g| {
            g.get_node(id).and_then(|idx| g.node(idx)).cloned()
        })
    }

    /// Every edge in the workspace.
    pub fn edges(&self, workspace: &WorkspaceId) -> LoreResult<Vec<RelationshipEdge>> {
        self.with_graph(workspace, Vec::new(), |g| {
            g.graph.edge_weights().cloned().collect()
        })
    }

    pub fn node_count(&self, workspace: &WorkspaceId) -> LoreResult<usize> {
        self.with_graph(workspace, 0, ConceptGraph::node_count)
    }

    pub fn edge_count(&self, workspace: &WorkspaceId) -> LoreResult<usize> {
        self.with_graph(workspace, 0, ConceptGraph::edge_count)
    }
}

fn lowered(terms: &[String]) -> Vec<String> {
    terms
        .iter()
        .map(|t| t.trim().to_lowercase())
        .filter(|t| !t.is_empty())
        .collect()
}

fn run_query(graph: &ConceptGraph, query: &GraphQuery) -> Vec<GraphRow> {
    match query {
        GraphQuery::MatchNodes { terms, limit } => {
            let terms = lowered(terms);
            if terms.is_empty() {
                return Vec::new();
            }
            let mut hits: Vec<_> = graph
                .sorted_indices()
                .into_iter()
                .filter_map(|idx| {
                    let node = graph.node(idx)?;
                    matching::best_tier(node, &terms).map(|tier| (tier, idx))
                })
                .collect();
            // Stable: ties keep id order.
            hits.sort_by_key(|(tier, _)| *tier);
            hits.into_iter()
                .take(*limit)
                .filter_map(|(_, idx)| node_row(graph, idx))
                .collect()
        }
        GraphQuery::MultiEpisodeNodes {
            min_episodes,
            terms,
            limit,
        } => {
            let terms = terms.as_deref().map(lowered);
            let mut hits: Vec<_> = graph
                .sorted_indices()
                .into_iter()
                .filter_map(|idx| {
                    let node = graph.node(idx)?;
                    if node.episode_count() < *min_episodes {
                        return None;
                    }
                    let tier = match &terms {
                        Some(t) => Some(matching::best_tier(node, t)?),
                        None => None,
                    };
                    Some((node.episode_count(), tier, idx))
                })
                .collect();
            hits.sort_by(|a, b| b.0.cmp(&a.0).then_with(|| a.1.cmp(&b.1)));
            hits.into_iter()
                .take(*limit)
                .filter_map(|(_, _, idx)| node_row(graph, idx))
                .collect()
        }
        GraphQuery::PathsBetween {
            source_id,
            target_id,
            max_hops,
            relationship_types,
            limit,
        } => {
            let (Some(source), Some(target)) = (graph.get_node(source_id), graph.get_node(target_id))
            else {
                return Vec::new();
            };
            paths::forward(
                graph,
                &[source],
                *max_hops,
                &EdgeFilter(relationship_types),
                *limit,
                |_, candidate| candidate == target,
            )
            .into_iter()
            .map(GraphRow::Path)
            .collect()
        }
        GraphQuery::PathsBetweenTerms {
            terms,
            max_hops,
            relationship_type,
            limit,
        } => {
            let terms = lowered(terms);
            let matched: std::collections::HashMap<_, Vec<usize>> = graph
                .sorted_indices()
                .into_iter()
                .filter_map(|idx| {
                    let m = matching::matched_terms(graph.node(idx)?, &terms);
                    (!m.is_empty()).then_some((idx, m))
                })
                .collect();
            let starts: Vec<_> = graph
                .sorted_indices()
                .into_iter()
                .filter(|idx| matched.contains_key(idx))
                .collect();
            let types: Vec<_> = relationship_type.iter().copied().collect();
            paths::forward(
                graph,
                &starts,
                *max_hops,
                &EdgeFilter(&types),
                *limit,
                |start, candidate| match (matched.get(&start), matched.get(&candidate)) {
                    (Some(a), Some(b)) => matching::distinct_terms(a, b),
                    _ => false,
                },
            )
            .into_iter()
            .map(GraphRow::Path)
            .collect()
        }
        GraphQuery::PathsInto {
            target,
            max_hops,
            relationship_types,
            source_type,
            limit,
        } => {
            let targets = graph.resolve(target);
            paths::into_targets(
                graph,
                &targets,
                *max_hops,
                &EdgeFilter(relationship_types),
                *source_type,
                *limit,
            )
            .into_iter()
            .map(GraphRow::Path)
            .collect()
        }
        GraphQuery::CoOccurringPairs {
            min_episodes,
            min_shared,
            limit,
        } => co_occurrence::pairs(graph, *min_episodes, *min_shared, *limit)
            .into_iter()
            .map(GraphRow::Pair)
            .collect(),
    }
}

fn node_row(graph: &ConceptGraph, idx: petgraph::stable_graph::NodeIndex) -> Option<GraphRow> {
    graph.node(idx).map(|node| {
        GraphRow::Node(NodeRecord {
            node: node.clone(),
            preview: graph.preview(idx),
        })
    })
}

impl IGraphStore for InMemoryGraphStore {
    fn read(&self, workspace: &WorkspaceId, query: &GraphQuery) -> LoreResult<Vec<GraphRow>> {
        let rows = self.with_graph(workspace, Vec::new(), |g| run_query(g, query))?;
        debug!(
            store = STORE_NAME,
            workspace = %workspace,
            pattern = query.pattern(),
            rows = rows.len(),
            "graph read"
        );
        Ok(rows)
    }

    fn write_batch(
        &self,
        workspace: &WorkspaceId,
        batch: &[GraphWrite],
    ) -> LoreResult<Vec<WriteOutcome>> {
        let shared = self.ensure(workspace);
        let mut guard = shared
            .write()
            .map_err(|e| LoreError::ConcurrencyError(e.to_string()))?;
        let outcomes: Vec<WriteOutcome> =
            batch.iter().map(|w| writes::apply(&mut guard, w)).collect();
        debug!(
            store = STORE_NAME,
            workspace = %workspace,
            writes = batch.len(),
            "graph write batch"
        );
        Ok(outcomes)
    }

    fn name(&self) -> &str {
        STORE_NAME
    }
}

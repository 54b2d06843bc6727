//! Bounded multi-hop path reasoning over typed relationships.
//!
//! All three operations are one store traversal each. Transient store
//! failures are logged and produce empty results; configuration errors are
//! returned.

use std::collections::BTreeMap;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::{debug, info_span, warn};

use lore_core::config::GraphConfig;
use lore_core::constants::{INFLUENCE_TYPES, LEADS_TO_TYPES};
use lore_core::errors::LoreResult;
use lore_core::models::{ConceptType, Path, RelationshipType, WorkspaceId};
use lore_core::traits::{GraphQuery, GraphRow, IGraphStore};

/// One source reaching a target, with its shortest path.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PathResult {
    pub source_id: String,
    pub source_name: String,
    pub path_length: usize,
    pub path: Path,
}

impl PathResult {
    fn from_path(path: Path) -> Option<Self> {
        Some(Self {
            source_id: path.source_id()?.to_string(),
            source_name: path.source_name()?.to_string(),
            path_length: path.hops,
            path,
        })
    }
}

/// Bounded directed path search over typed relationships.
pub struct PathReasoner {
    store: Arc<dyn IGraphStore>,
    config: GraphConfig,
}

impl PathReasoner {
    pub fn new(store: Arc<dyn IGraphStore>, config: GraphConfig) -> Self {
        Self { store, config }
    }

    /// Directed paths from `source_id` to `target_id`, shortest first, at most
    /// `graph.path_limit`. An empty type list follows every typed relationship.
    pub fn find_paths(
        &self,
        workspace: &WorkspaceId,
        source_id: &str,
        target_id: &str,
        max_hops: usize,
        relationship_types: &[RelationshipType],
    ) -> LoreResult<Vec<Path>> {
        if max_hops == 0 || self.config.path_limit == 0 {
            return Ok(Vec::new());
        }
        let max_hops = self.clamp(max_hops);
        let span = info_span!("lore.paths", op = "find_paths", source_id, target_id, max_hops);
        let _entered = span.enter();

        let query = GraphQuery::PathsBetween {
            source_id: source_id.to_string(),
            target_id: target_id.to_string(),
            max_hops,
            relationship_types: relationship_types.to_vec(),
            limit: self.config.path_limit,
        };
        let mut paths = self.read_degrading(workspace, &query, GraphRow::paths)?;
        paths.truncate(self.config.path_limit);
        debug!(paths = paths.len(), "paths found");
        Ok(paths)
    }

    /// [`find_paths`](Self::find_paths) with relationship names such as
    /// `"LEADS_TO"` or `"leads to"`. Any unknown name is a configuration error.
    pub fn find_paths_named<S: AsRef<str>>(
        &self,
        workspace: &WorkspaceId,
        source_id: &str,
        target_id: &str,
        max_hops: usize,
        relationship_names: &[S],
    ) -> LoreResult<Vec<Path>> {
        let types = RelationshipType::parse_filter(relationship_names)?;
        self.find_paths(workspace, source_id, target_id, max_hops, &types)
    }

    /// Concepts that reach `target` (id or name) through influence-like edges.
    pub fn find_influencers(
        &self,
        workspace: &WorkspaceId,
        target: &str,
        max_hops: usize,
    ) -> LoreResult<Vec<PathResult>> {
        self.sources_into(workspace, "find_influencers", target, max_hops, &INFLUENCE_TYPES, None)
    }

    /// Practices that lead to `outcome` (id or name).
    pub fn find_practices_for_outcome(
        &self,
        workspace: &WorkspaceId,
        outcome: &str,
        max_hops: usize,
    ) -> LoreResult<Vec<PathResult>> {
        self.sources_into(
            workspace,
            "find_practices_for_outcome",
            outcome,
            max_hops,
            &LEADS_TO_TYPES,
            Some(ConceptType::Practice),
        )
    }

    fn sources_into(
        &self,
        workspace: &WorkspaceId,
        op: &'static str,
        target: &str,
        max_hops: usize,
        relationship_types: &[RelationshipType],
        source_type: Option<ConceptType>,
    ) -> LoreResult<Vec<PathResult>> {
        if max_hops == 0 || target.trim().is_empty() {
            return Ok(Vec::new());
        }
        let max_hops = self.clamp(max_hops);
        let span = info_span!("lore.paths", op, concept = target, max_hops);
        let _entered = span.enter();

        let query = GraphQuery::PathsInto {
            target: target.trim().to_string(),
            max_hops,
            relationship_types: relationship_types.to_vec(),
            source_type,
            limit: self.config.path_limit,
        };
        let paths = self.read_degrading(workspace, &query, GraphRow::paths)?;

        // One entry per source: its shortest path.
        let mut by_source: BTreeMap<String, PathResult> = BTreeMap::new();
        for result in paths.into_iter().filter_map(PathResult::from_path) {
            match by_source.get(&result.source_id) {
                Some(existing) if existing.path_length <= result.path_length => {}
                _ => {
                    by_source.insert(result.source_id.clone(), result);
                }
            }
        }
        let mut results: Vec<PathResult> = by_source.into_values().collect();
        results.sort_by(|a, b| {
            a.path_length
                .cmp(&b.path_length)
                .then_with(|| a.source_name.cmp(&b.source_name))
        });
        debug!(sources = results.len(), "sources found");
        Ok(results)
    }

    fn clamp(&self, max_hops: usize) -> usize {
        max_hops.min(self.config.max_hops_limit.max(1))
    }

    fn read_degrading<T>(
        &self,
        workspace: &WorkspaceId,
        query: &GraphQuery,
        narrow: fn(Vec<GraphRow>) -> Vec<T>,
    ) -> LoreResult<Vec<T>> {
        match self.store.read(workspace, query) {
            Ok(rows) => Ok(narrow(rows)),
            Err(e) if e.is_transient() => {
                warn!(error = %e, pattern = query.pattern(), "path search degraded");
                Ok(Vec::new())
            }
            Err(e) => Err(e),
        }
    }
}

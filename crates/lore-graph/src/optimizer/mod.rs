//! Graph query optimizer: picks a search strategy for a natural-language
//! query and runs it against the graph store.
//!
//! Every strategy degrades to an empty result when the store fails; the
//! failure is logged, never raised.

mod query_type;
mod ranking;
mod verbs;

pub use query_type::GraphQueryType;
pub use verbs::relationship_for;

use std::sync::Arc;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::{debug, field, info, info_span, warn};

use lore_core::config::defaults;
use lore_core::config::GraphConfig;
use lore_core::errors::LoreResult;
use lore_core::models::{GraphHit, MatchTier, NodeHit, Path, PathHit, RelationshipType, WorkspaceId};
use lore_core::text;
use lore_core::traits::{GraphQuery, GraphRow, IEntityAssist, IGraphStore};

use crate::entity_linking::{AliasTable, EntityLinker};

/// Rows fetched per requested hit, so re-ranking has room to work.
const NODE_OVERFETCH: usize = 3;
const PATH_OVERFETCH: usize = 4;
const MIN_CROSS_EPISODES: usize = 2;

/// Words that describe a cross-episode question rather than its topic.
const CROSS_EPISODE_WORDS: &[&str] = &[
    "multiple", "episode", "episodes", "recurring", "recur", "recurs", "many", "several",
    "different", "appear", "appears", "appeared", "come", "comes", "concept", "concepts", "topic",
    "topics", "theme", "themes", "idea", "ideas", "discussed", "show", "shows",
];

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GraphSearchOptions {
    /// Forces a strategy; detected from the query when unset.
    pub query_type: Option<GraphQueryType>,
    pub max_hops: usize,
    pub limit: usize,
}

impl Default for GraphSearchOptions {
    fn default() -> Self {
        Self {
            query_type: None,
            max_hops: defaults::DEFAULT_MAX_HOPS,
            limit: defaults::DEFAULT_GRAPH_LIMIT,
        }
    }
}

impl GraphSearchOptions {
    pub fn from_config(config: &GraphConfig) -> Self {
        Self {
            query_type: None,
            max_hops: config.default_max_hops,
            limit: config.default_limit,
        }
    }

    pub fn with_type(mut self, query_type: GraphQueryType) -> Self {
        self.query_type = Some(query_type);
        self
    }

    pub fn with_limit(mut self, limit: usize) -> Self {
        self.limit = limit;
        self
    }

    pub fn with_max_hops(mut self, max_hops: usize) -> Self {
        self.max_hops = max_hops;
        self
    }
}

/// Turns natural-language questions into graph store reads.
///
/// Detects (or accepts) a [`GraphQueryType`], extracts search terms for it,
/// runs one or two store patterns, and ranks the rows into [`GraphHit`]s.
pub struct GraphQueryOptimizer {
    store: Arc<dyn IGraphStore>,
    config: GraphConfig,
    linker: EntityLinker,
}

impl GraphQueryOptimizer {
    pub fn new(store: Arc<dyn IGraphStore>, config: GraphConfig) -> Self {
        let linker = EntityLinker::new(
            AliasTable::with_defaults(&config.aliases),
            Duration::from_millis(config.entity_assist_budget_ms),
        );
        Self {
            store,
            config,
            linker,
        }
    }

    /// Enables the advisory pass of entity linking.
    pub fn with_entity_assist(mut self, assist: Arc<dyn IEntityAssist>) -> Self {
        self.linker = self.linker.with_assist(assist);
        self
    }

    pub fn config(&self) -> &GraphConfig {
        &self.config
    }

    pub fn search(
        &self,
        workspace: &WorkspaceId,
        query: &str,
        options: &GraphSearchOptions,
    ) -> Vec<GraphHit> {
        if options.limit == 0 || query.trim().is_empty() {
            return Vec::new();
        }
        let query_type = options
            .query_type
            .unwrap_or_else(|| GraphQueryType::detect(query));
        let max_hops = options.max_hops.clamp(1, self.config.max_hops_limit.max(1));

        let span = info_span!(
            "lore.graph_search",
            workspace = %workspace,
            query_type = %query_type,
            max_hops,
            hits = field::Empty,
        );
        let _entered = span.enter();

        let outcome = match query_type {
            GraphQueryType::EntityCentric => self.entity_centric(workspace, query, options.limit),
            GraphQueryType::EntityLinking => self.entity_linking(workspace, query, options.limit),
            GraphQueryType::MultiHop => self.multi_hop(workspace, query, max_hops, options.limit),
            GraphQueryType::CrossEpisode => self.cross_episode(workspace, query, options.limit),
        };
        let hits = outcome.unwrap_or_else(|e| {
            warn!(error = %e, transient = e.is_transient(), "graph search degraded");
            Vec::new()
        });
        span.record("hits", hits.len());
        info!(hits = hits.len(), "graph search complete");
        hits
    }

    fn entity_centric(
        &self,
        workspace: &WorkspaceId,
        query: &str,
        limit: usize,
    ) -> LoreResult<Vec<GraphHit>> {
        let keywords = text::extract_keywords(query);
        self.match_ranked(workspace, &keywords, limit)
    }

    fn entity_linking(
        &self,
        workspace: &WorkspaceId,
        query: &str,
        limit: usize,
    ) -> LoreResult<Vec<GraphHit>> {
        let candidates = self.linker.link(query).candidates();
        self.match_ranked(workspace, &candidates, limit)
    }

    /// Node match on `terms`, ranked by tier first and score second.
    fn match_ranked(
        &self,
        workspace: &WorkspaceId,
        terms: &[String],
        limit: usize,
    ) -> LoreResult<Vec<GraphHit>> {
        if terms.is_empty() {
            return Ok(Vec::new());
        }
        let rows = self.store.read(
            workspace,
            &GraphQuery::MatchNodes {
                terms: terms.to_vec(),
                limit: limit.saturating_mul(NODE_OVERFETCH),
            },
        )?;
        let mut hits: Vec<NodeHit> = GraphRow::nodes(rows)
            .into_iter()
            .filter_map(|record| ranking::node_hit(record, terms))
            .collect();
        ranking::sort_nodes(&mut hits);
        hits.truncate(limit);
        debug!(terms = ?terms, hits = hits.len(), "node match");
        Ok(hits.into_iter().map(GraphHit::Node).collect())
    }

    fn multi_hop(
        &self,
        workspace: &WorkspaceId,
        query: &str,
        max_hops: usize,
        limit: usize,
    ) -> LoreResult<Vec<GraphHit>> {
        let terms: Vec<String> = text::extract_keywords(query)
            .into_iter()
            .filter(|w| !verbs::is_verb_word(w))
            .collect();
        if terms.len() < 2 {
            debug!(terms = ?terms, "too few terms for a path search");
            return self.match_ranked(workspace, &terms, limit);
        }
        let relationship = verbs::relationship_for(query);

        let mut paths = self.paths_between_terms(workspace, &terms, max_hops, relationship, limit)?;
        let widened = paths.is_empty() && relationship.is_some();
        if widened {
            debug!(?relationship, "no typed path, widening to all relationships");
            paths = self.paths_between_terms(workspace, &terms, max_hops, None, limit)?;
        }

        let mut hits: Vec<PathHit> = paths
            .into_iter()
            .map(|path| PathHit {
                endpoint_tier: ranking::endpoint_tier(&path, &terms),
                path,
                widened,
            })
            .collect();
        hits.sort_by_key(|h| (h.endpoint_tier, h.path.hops));
        hits.truncate(limit);
        Ok(hits.into_iter().map(GraphHit::Path).collect())
    }

    fn paths_between_terms(
        &self,
        workspace: &WorkspaceId,
        terms: &[String],
        max_hops: usize,
        relationship_type: Option<RelationshipType>,
        limit: usize,
    ) -> LoreResult<Vec<Path>> {
        let rows = self.store.read(
            workspace,
            &GraphQuery::PathsBetweenTerms {
                terms: terms.to_vec(),
                max_hops,
                relationship_type,
                limit: limit.saturating_mul(PATH_OVERFETCH),
            },
        )?;
        Ok(GraphRow::paths(rows))
    }

    fn cross_episode(
        &self,
        workspace: &WorkspaceId,
        query: &str,
        limit: usize,
    ) -> LoreResult<Vec<GraphHit>> {
        let topical: Vec<String> = text::extract_keywords(query)
            .into_iter()
            .filter(|w| !CROSS_EPISODE_WORDS.contains(&w.as_str()) && !verbs::is_verb_word(w))
            .collect();
        let terms = (!topical.is_empty()).then_some(topical);
        let rows = self.store.read(
            workspace,
            &GraphQuery::MultiEpisodeNodes {
                min_episodes: MIN_CROSS_EPISODES,
                terms: terms.clone(),
                limit,
            },
        )?;
        let records = GraphRow::nodes(rows);
        let most = records
            .iter()
            .map(|r| r.node.episode_count())
            .max()
            .unwrap_or(0)
            .max(1);
        let hits = records
            .into_iter()
            .map(|record| {
                let best = terms
                    .as_deref()
                    .and_then(|t| MatchTier::best(&record.node, t))
                    .map(|(tier, term)| (tier, term.to_string()));
                let episode_count = record.node.episode_count();
                GraphHit::Node(NodeHit {
                    match_tier: best.as_ref().map(|(tier, _)| *tier),
                    matched_term: best.map(|(_, term)| term),
                    episode_count,
                    score: episode_count as f64 / most as f64,
                    preview: record.preview,
                    node: record.node,
                })
            })
            .collect::<Vec<_>>();
        debug!(terms = ?terms, hits = hits.len(), "cross-episode nodes");
        Ok(hits)
    }
}

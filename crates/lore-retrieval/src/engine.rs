//! RetrievalEngine: adaptive hybrid retrieval over the chunk store and the
//! concept graph.
//!
//! classify → weights → (vector ∥ graph, each under its own deadline)
//!          → fuse → diversify

use std::sync::Arc;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::{field, info, info_span, warn};

use lore_core::config::RetrievalConfig;
use lore_core::deadline;
use lore_core::errors::{LoreError, LoreResult};
use lore_core::models::{ChunkFilter, RetrievalResult, WorkspaceId};
use lore_core::traits::{IEmbeddingProvider, IGraphStore, ISimilarityStore};

use crate::expansion::QueryExpander;
use crate::search::{diversify, fuse, GraphSearcher, VectorSearcher};
use crate::weighting;

/// Per-call switches.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RetrievalOptions {
    pub use_vector: bool,
    pub use_graph: bool,
    /// Family hint from the caller ("entity", "relationship", "definitional").
    pub query_type_hint: Option<String>,
    /// Overrides `retrieval.top_k`.
    pub top_k: Option<usize>,
    /// Metadata filter for the vector path.
    pub filter: ChunkFilter,
}

impl Default for RetrievalOptions {
    fn default() -> Self {
        Self {
            use_vector: true,
            use_graph: true,
            query_type_hint: None,
            top_k: None,
            filter: ChunkFilter::default(),
        }
    }
}

impl RetrievalOptions {
    pub fn vector_only() -> Self {
        Self {
            use_graph: false,
            ..Self::default()
        }
    }

    pub fn graph_only() -> Self {
        Self {
            use_vector: false,
            ..Self::default()
        }
    }

    pub fn with_hint(mut self, hint: &str) -> Self {
        self.query_type_hint = Some(hint.to_string());
        self
    }

    pub fn with_top_k(mut self, top_k: usize) -> Self {
        self.top_k = Some(top_k);
        self
    }
}

/// Hybrid retrieval engine: runs vector and graph search for one query,
/// weights them by query family, and fuses the two lists into a single
/// diversified ranking.
pub struct RetrievalEngine {
    vector: VectorSearcher,
    graph: GraphSearcher,
    config: RetrievalConfig,
}

impl RetrievalEngine {
    pub fn new(
        similarity: Arc<dyn ISimilarityStore>,
        graph: Arc<dyn IGraphStore>,
        embedder: Arc<dyn IEmbeddingProvider>,
        expander: Arc<QueryExpander>,
        config: RetrievalConfig,
    ) -> Self {
        Self {
            vector: VectorSearcher::new(similarity, embedder, expander, &config.collection),
            graph: GraphSearcher::new(graph),
            config,
        }
    }

    pub fn config(&self) -> &RetrievalConfig {
        &self.config
    }

    /// Ranked results for `query`, at most `top_k`.
    ///
    /// A failing or slow substrate degrades to the other; the call only fails
    /// on invalid options.
    pub fn retrieve(
        &self,
        workspace: &WorkspaceId,
        query: &str,
        options: &RetrievalOptions,
    ) -> LoreResult<Vec<RetrievalResult>> {
        if !options.use_vector && !options.use_graph {
            return Err(LoreError::ConfigError(
                "retrieval needs at least one of use_vector or use_graph".to_string(),
            ));
        }
        let top_k = options.top_k.unwrap_or(self.config.top_k);
        if top_k == 0 {
            return Err(LoreError::ConfigError("top_k must be > 0".to_string()));
        }
        if query.trim().is_empty() {
            return Ok(Vec::new());
        }

        let (family, weights) = weighting::weights_for(
            &self.config.weights,
            query,
            options.query_type_hint.as_deref(),
        );
        let span = info_span!(
            "lore.retrieval",
            workspace = %workspace,
            family = %family,
            vector_weight = weights.vector,
            graph_weight = weights.graph,
            vector_hits = field::Empty,
            graph_hits = field::Empty,
            results = field::Empty,
        );
        let _entered = span.enter();

        let k = top_k.saturating_mul(self.config.candidate_multiplier.max(1));

        let vector_pending = if options.use_vector {
            let searcher = self.vector.clone();
            let ws = workspace.clone();
            let q = query.to_string();
            let filter = options.filter.clone();
            Some(deadline::spawn(
                "vector_search",
                Duration::from_millis(self.config.vector_timeout_ms),
                move || searcher.search(&ws, &q, family, k, &filter),
            ))
        } else {
            None
        };
        let graph_pending = if options.use_graph {
            let searcher = self.graph.clone();
            let ws = workspace.clone();
            let q = query.to_string();
            Some(deadline::spawn(
                "graph_search",
                Duration::from_millis(self.config.graph_timeout_ms),
                move || searcher.search(&ws, &q, k),
            ))
        } else {
            None
        };

        let vector_results = settle(vector_pending);
        let graph_results = settle(graph_pending);
        span.record("vector_hits", vector_results.len());
        span.record("graph_hits", graph_results.len());

        let fused = fuse(vector_results, graph_results, weights);
        let results = diversify(fused, top_k);
        span.record("results", results.len());
        info!(results = results.len(), "retrieval complete");
        Ok(results)
    }
}

/// Wait for a substrate. Errors and timeouts both degrade to no results.
fn settle(
    pending: Option<LoreResult<deadline::Pending<Vec<RetrievalResult>>>>,
) -> Vec<RetrievalResult> {
    match pending.map(|p| p.and_then(deadline::Pending::wait)) {
        None => Vec::new(),
        Some(Ok(results)) => results,
        Some(Err(e)) => {
            warn!(error = %e, "substrate degraded");
            Vec::new()
        }
    }
}

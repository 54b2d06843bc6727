//! Retry decorators. The core never retries; adapters wrapped here do.

use std::sync::Arc;

use lore_core::errors::LoreResult;
use lore_core::models::{Distance, ScoredChunk, WorkspaceId};
use lore_core::retry::RetryPolicy;
use lore_core::traits::{
    GraphQuery, GraphRow, GraphWrite, IGraphStore, ISimilarityStore, SimilarityQuery,
    WriteOutcome,
};

/// Retries transient graph failures. Writes are upserts, so replaying a
/// batch is safe.
pub struct RetryingGraphStore {
    inner: Arc<dyn IGraphStore>,
    policy: RetryPolicy,
}

impl RetryingGraphStore {
    pub fn new(inner: Arc<dyn IGraphStore>, policy: RetryPolicy) -> Self {
        Self { inner, policy }
    }
}

impl IGraphStore for RetryingGraphStore {
    fn read(&self, workspace: &WorkspaceId, query: &GraphQuery) -> LoreResult<Vec<GraphRow>> {
        self.policy
            .run(query.pattern(), || self.inner.read(workspace, query))
    }

    fn write_batch(
        &self,
        workspace: &WorkspaceId,
        writes: &[GraphWrite],
    ) -> LoreResult<Vec<WriteOutcome>> {
        self.policy
            .run("graph_write_batch", || self.inner.write_batch(workspace, writes))
    }

    fn name(&self) -> &str {
        self.inner.name()
    }
}

/// Retries transient similarity-store failures.
pub struct RetryingSimilarityStore {
    inner: Arc<dyn ISimilarityStore>,
    policy: RetryPolicy,
}

impl RetryingSimilarityStore {
    pub fn new(inner: Arc<dyn ISimilarityStore>, policy: RetryPolicy) -> Self {
        Self { inner, policy }
    }
}

impl ISimilarityStore for RetryingSimilarityStore {
    fn query(&self, query: &SimilarityQuery) -> LoreResult<Vec<ScoredChunk>> {
        self.policy.run("similarity_query", || self.inner.query(query))
    }

    fn collection_exists(&self, name: &str) -> LoreResult<bool> {
        self.policy
            .run("collection_exists", || self.inner.collection_exists(name))
    }

    fn create_collection(&self, name: &str, dimensions: usize, distance: Distance) -> LoreResult<()> {
        self.policy.run("create_collection", || {
            self.inner.create_collection(name, dimensions, distance)
        })
    }
}

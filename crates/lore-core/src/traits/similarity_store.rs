use serde::{Deserialize, Serialize};

use crate::errors::LoreResult;
use crate::models::{ChunkFilter, Distance, ScoredChunk, WorkspaceId};

/// Nearest-neighbour query. `workspace` is always applied as an equality filter.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimilarityQuery {
    pub collection: String,
    pub workspace: WorkspaceId,
    pub vector: Vec<f32>,
    pub k: usize,
    #[serde(default)]
    pub filter: ChunkFilter,
}

/// Similarity-indexed chunk store.
pub trait ISimilarityStore: Send + Sync {
    /// Up to `k` chunks, best first.
    fn query(&self, query: &SimilarityQuery) -> LoreResult<Vec<ScoredChunk>>;

    fn collection_exists(&self, name: &str) -> LoreResult<bool>;

    fn create_collection(&self, name: &str, dimensions: usize, distance: Distance)
        -> LoreResult<()>;
}

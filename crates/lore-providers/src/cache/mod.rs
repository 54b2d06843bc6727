mod cached_embedder;
mod semantic_cache;

pub use cached_embedder::CachedEmbedder;
pub use semantic_cache::SemanticCache;

//! # lore-providers
//!
//! Embedding and completion providers plus the semantic embedding cache.
//!
//! ## Modules
//!
//! - `cache`: `SemanticCache` (moka, LRU + TTL) and the `CachedEmbedder` decorator
//! - `hashed`: `HashedEmbedder`, a deterministic local embedder
//! - `http`: OpenAI-compatible HTTP embedding and completion providers

pub mod cache;
pub mod hashed;
pub mod http;

pub use cache::{CachedEmbedder, SemanticCache};
pub use hashed::HashedEmbedder;
pub use http::{ApiCompletionProvider, ApiEmbeddingProvider};

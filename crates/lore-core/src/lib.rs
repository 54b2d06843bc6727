//! # lore-core
//!
//! Foundation crate for the Lore hybrid retrieval engine.
//! Defines all types, traits, errors, config, and constants.
//! Every other crate in the workspace depends on this.

pub mod config;
pub mod constants;
pub mod deadline;
pub mod errors;
pub mod models;
pub mod retry;
pub mod text;
pub mod tracing_setup;
pub mod traits;

// Re-export the most commonly used types at the crate root.
pub use config::LoreConfig;
pub use errors::{LoreError, LoreResult};
pub use models::{
    ConceptNode, ConceptType, GraphHit, MatchTier, Path, QueryFamily, RelationshipEdge,
    RelationshipType, RetrievalResult, RetrievalSource, TextChunk, WorkspaceId,
};
pub use retry::RetryPolicy;

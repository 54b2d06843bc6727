//! # lore-retrieval
//!
//! The retrieval fusion orchestrator.
//!
//! query → family classification → weights
//!       → (vector path: expansion → embed → similarity) ∥ (graph path: keyword node match)
//!       → fingerprint fusion → document diversification

pub mod engine;
pub mod expansion;
pub mod search;
pub mod weighting;

pub use engine::{RetrievalEngine, RetrievalOptions};
pub use expansion::{LlmParaphraser, QueryExpander, QueryVariation, TemplateParaphraser};

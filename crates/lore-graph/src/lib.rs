//! # lore-graph
//!
//! Structured reasoning over the concept graph.
//!
//! ## Modules
//!
//! - `optimizer`: query-type dispatch (entity-centric, entity linking, multi-hop, cross-episode)
//! - `entity_linking`: mention extraction, alias table, advisory LLM resolution
//! - `reasoner`: bounded multi-hop path search, influencers, practices for an outcome
//! - `linker`: batch promotion of co-occurring concepts into CROSS_EPISODE edges

pub mod entity_linking;
pub mod linker;
pub mod optimizer;
pub mod reasoner;

pub use entity_linking::{AliasTable, EntityLinker, LlmEntityAssist};
pub use linker::{CrossEpisodeLinker, LinkOptions};
pub use optimizer::{GraphQueryOptimizer, GraphQueryType, GraphSearchOptions};
pub use reasoner::{PathReasoner, PathResult};

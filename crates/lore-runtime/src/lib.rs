//! # lore-runtime
//!
//! Builds every engine once, from one resolved configuration, and hands out
//! shared handles. Nothing here is global: callers own the [`LoreRuntime`].

mod jobs;
mod runtime;

pub use jobs::LinkerJob;
pub use runtime::{LoreRuntime, RuntimeOptions};

pub use lore_graph::{GraphQueryType, GraphSearchOptions, LinkOptions, PathResult};
pub use lore_retrieval::RetrievalOptions;

//! # lore-storage
//!
//! Store adapters implementing the `lore-core` store traits.
//!
//! ## Modules
//!
//! - `similarity`: `InMemorySimilarityStore`, brute-force nearest neighbours over `DashMap` collections
//! - `graph`: `InMemoryGraphStore`, one petgraph `StableGraph` per workspace
//! - `retrying`: `RetryPolicy` decorators for any store

pub mod graph;
pub mod retrying;
pub mod similarity;

pub use graph::InMemoryGraphStore;
pub use retrying::{RetryingGraphStore, RetryingSimilarityStore};
pub use similarity::InMemorySimilarityStore;

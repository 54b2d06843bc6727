//! Per-substrate search plus the fusion and diversification stages.

pub mod diversify;
pub mod fusion;
pub mod graph;
pub mod vector;

pub use diversify::diversify;
pub use fusion::fuse;
pub use graph::{graph_score, GraphSearcher};
pub use vector::VectorSearcher;

//! Data model shared by every crate in the workspace.

mod cache_stats;
mod chunk;
mod concept;
mod graph_hit;
mod link_report;
mod path;
mod relationship;
mod retrieval;
mod workspace;

pub use cache_stats::CacheStats;
pub use chunk::{ChunkFilter, Distance, ScoredChunk, TextChunk};
pub use concept::{ConceptNode, ConceptType};
pub use graph_hit::{EdgeDirection, GraphHit, MatchTier, NodeHit, PathHit, RelationshipPreview};
pub use link_report::LinkReport;
pub use path::Path;
pub use relationship::{RelationshipEdge, RelationshipType};
pub use retrieval::{QueryFamily, ResultMetadata, RetrievalResult, RetrievalSource};
pub use workspace::WorkspaceId;

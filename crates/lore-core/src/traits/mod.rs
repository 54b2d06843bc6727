mod completion;
mod embedding;
mod entity_assist;
mod graph_store;
mod paraphraser;
mod similarity_store;

pub use completion::{CompletionOptions, ICompletionProvider};
pub use embedding::IEmbeddingProvider;
pub use entity_assist::IEntityAssist;
pub use graph_store::{
    CrossEpisodeLink, GraphQuery, GraphRow, GraphWrite, IGraphStore, NodeRecord, PairRecord,
    WriteOutcome,
};
pub use paraphraser::{Complexity, IParaphraser, ParaphraseContext};
pub use similarity_store::{ISimilarityStore, SimilarityQuery};

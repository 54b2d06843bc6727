mod client;
mod completion;
mod embedding;

pub use completion::ApiCompletionProvider;
pub use embedding::ApiEmbeddingProvider;

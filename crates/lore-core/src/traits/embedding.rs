use crate::errors::LoreResult;

/// Embedding generation provider.
pub trait IEmbeddingProvider: Send + Sync {
    /// Embed a single text.
    fn embed(&self, text: &str) -> LoreResult<Vec<f32>>;

    /// Embed a batch of texts, preserving order.
    fn embed_batch(&self, texts: &[String]) -> LoreResult<Vec<Vec<f32>>>;

    /// Dimensionality of produced vectors.
    fn dimensions(&self) -> usize;

    fn name(&self) -> &str;

    fn is_available(&self) -> bool;
}

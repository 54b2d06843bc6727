//! Cache-first embedding decorator.

use std::sync::Arc;

use tracing::debug;

use lore_core::errors::LoreResult;
use lore_core::traits::IEmbeddingProvider;

use super::SemanticCache;

/// Looks up the semantic cache before calling the wrapped provider and
/// stores every fresh vector. Provider errors propagate unchanged.
pub struct CachedEmbedder {
    inner: Arc<dyn IEmbeddingProvider>,
    cache: Arc<SemanticCache>,
}

impl CachedEmbedder {
    pub fn new(inner: Arc<dyn IEmbeddingProvider>, cache: Arc<SemanticCache>) -> Self {
        Self { inner, cache }
    }

    pub fn cache(&self) -> &Arc<SemanticCache> {
        &self.cache
    }
}

impl IEmbeddingProvider for CachedEmbedder {
    fn embed(&self, text: &str) -> LoreResult<Vec<f32>> {
        if let Some(v) = self.cache.get(text) {
            return Ok(v);
        }
        let v = self.inner.embed(text)?;
        self.cache.set(text, v.clone());
        Ok(v)
    }

    fn embed_batch(&self, texts: &[String]) -> LoreResult<Vec<Vec<f32>>> {
        let mut out: Vec<Option<Vec<f32>>> = texts.iter().map(|t| self.cache.get(t)).collect();
        let missing: Vec<usize> = out
            .iter()
            .enumerate()
            .filter(|(_, v)| v.is_none())
            .map(|(i, _)| i)
            .collect();
        if !missing.is_empty() {
            let batch: Vec<String> = missing.iter().map(|i| texts[*i].clone()).collect();
            let fresh = self.inner.embed_batch(&batch)?;
            debug!(
                cached = texts.len() - missing.len(),
                embedded = fresh.len(),
                "batch embedding"
            );
            for (i, v) in missing.into_iter().zip(fresh) {
                self.cache.set(&texts[i], v.clone());
                out[i] = Some(v);
            }
        }
        Ok(out.into_iter().flatten().collect())
    }

    fn dimensions(&self) -> usize {
        self.inner.dimensions()
    }

    fn name(&self) -> &str {
        self.inner.name()
    }

    fn is_available(&self) -> bool {
        self.inner.is_available()
    }
}

//! Deterministic feature-hashing embedder.
//!
//! Needs no network or model files, so it is always available. Terms are
//! hashed into signed buckets with FNV-1a and the result is L2-normalized,
//! which keeps cosine similarity meaningful for lexical overlap.

use std::collections::HashMap;

use lore_core::errors::LoreResult;
use lore_core::text;
use lore_core::traits::IEmbeddingProvider;

const FNV_OFFSET: u64 = 0xcbf2_9ce4_8422_2325;
const FNV_PRIME: u64 = 0x0100_0000_01b3;

pub struct HashedEmbedder {
    dimensions: usize,
}

impl HashedEmbedder {
    pub fn new(dimensions: usize) -> Self {
        Self {
            dimensions: dimensions.max(1),
        }
    }

    fn fnv1a(term: &str) -> u64 {
        term.as_bytes().iter().fold(FNV_OFFSET, |h, b| {
            (h ^ u64::from(*b)).wrapping_mul(FNV_PRIME)
        })
    }

    /// Crude plural folding so "practices" and "practice" share a bucket.
    fn fold(term: &str) -> &str {
        if term.len() > 4 && term.ends_with('s') && !term.ends_with("ss") {
            &term[..term.len() - 1]
        } else {
            term
        }
    }

    fn tokens(input: &str) -> Vec<String> {
        input
            .split(|c: char| !c.is_alphanumeric())
            .filter(|s| s.len() >= 2)
            .map(str::to_lowercase)
            .filter(|s| !text::is_stopword(s))
            .map(|s| Self::fold(&s).to_string())
            .collect()
    }

    fn vector(&self, input: &str) -> Vec<f32> {
        let mut out = vec![0.0f32; self.dimensions];
        let tokens = Self::tokens(input);
        if tokens.is_empty() {
            return out;
        }

        let mut tf: HashMap<&str, f32> = HashMap::new();
        for t in &tokens {
            *tf.entry(t.as_str()).or_default() += 1.0;
        }
        for (term, count) in tf {
            let h = Self::fnv1a(term);
            let bucket = (h % self.dimensions as u64) as usize;
            let sign = if (h >> 63) == 0 { 1.0 } else { -1.0 };
            let idf = 1.0 + (term.len() as f32).ln();
            out[bucket] += sign * (1.0 + count.ln()) * idf;
        }

        let norm = out.iter().map(|x| x * x).sum::<f32>().sqrt();
        if norm > f32::EPSILON {
            out.iter_mut().for_each(|x| *x /= norm);
        }
        out
    }
}

impl IEmbeddingProvider for HashedEmbedder {
    fn embed(&self, text: &str) -> LoreResult<Vec<f32>> {
        Ok(self.vector(text))
    }

    fn embed_batch(&self, texts: &[String]) -> LoreResult<Vec<Vec<f32>>> {
        Ok(texts.iter().map(|t| self.vector(t)).collect())
    }

    fn dimensions(&self) -> usize {
        self.dimensions
    }

    fn name(&self) -> &str {
        "hashed"
    }

    fn is_available(&self) -> bool {
        true
    }
}

//! Vector path: expand, embed each variation, query the similarity store,
//! and dedupe hits by fingerprint keeping the best weighted score.

use std::collections::HashMap;
use std::sync::Arc;

use tracing::{debug, warn};

use lore_core::errors::{LoreError, LoreResult};
use lore_core::models::{
    ChunkFilter, QueryFamily, ResultMetadata, RetrievalResult, RetrievalSource, ScoredChunk,
    WorkspaceId,
};
use lore_core::text;
use lore_core::traits::{
    IEmbeddingProvider, ISimilarityStore, ParaphraseContext, SimilarityQuery,
};

use crate::expansion::{QueryExpander, QueryVariation};

/// Embeds each query variation and collects the nearest chunks for the
/// workspace. A failed variation is skipped, not fatal.
#[derive(Clone)]
pub struct VectorSearcher {
    store: Arc<dyn ISimilarityStore>,
    embedder: Arc<dyn IEmbeddingProvider>,
    expander: Arc<QueryExpander>,
    collection: String,
}

impl VectorSearcher {
    pub fn new(
        store: Arc<dyn ISimilarityStore>,
        embedder: Arc<dyn IEmbeddingProvider>,
        expander: Arc<QueryExpander>,
        collection: &str,
    ) -> Self {
        Self {
            store,
            embedder,
            expander,
            collection: collection.to_string(),
        }
    }

    fn query_variation(
        &self,
        workspace: &WorkspaceId,
        variation: &QueryVariation,
        k: usize,
        filter: &ChunkFilter,
    ) -> LoreResult<Vec<ScoredChunk>> {
        let vector = self.embedder.embed(&variation.text)?;
        self.store.query(&SimilarityQuery {
            collection: self.collection.clone(),
            workspace: workspace.clone(),
            vector,
            k,
            filter: filter.clone(),
        })
    }

    /// Results sorted by weighted similarity, best first. Fails only when
    /// every variation failed.
    pub fn search(
        &self,
        workspace: &WorkspaceId,
        query: &str,
        family: QueryFamily,
        k: usize,
        filter: &ChunkFilter,
    ) -> LoreResult<Vec<RetrievalResult>> {
        let variations = self.expander.expand(query, &ParaphraseContext { family });
        let mut results: Vec<RetrievalResult> = Vec::new();
        let mut by_fingerprint: HashMap<String, usize> = HashMap::new();
        let mut last_error: Option<LoreError> = None;
        let mut failed = 0;

        for variation in &variations {
            let hits = match self.query_variation(workspace, variation, k, filter) {
                Ok(hits) => hits,
                Err(e) => {
                    warn!(variation = %variation.text, error = %e, "variation skipped");
                    failed += 1;
                    last_error = Some(e);
                    continue;
                }
            };
            for hit in hits {
                let weighted = hit.score * variation.weight;
                let fingerprint = text::fingerprint(&hit.chunk.text);
                match by_fingerprint.get(&fingerprint) {
                    Some(&i) => {
                        let existing = &mut results[i];
                        if weighted > existing.vector_score.unwrap_or(f64::MIN) {
                            existing.score = weighted;
                            existing.vector_score = Some(weighted);
                            existing.metadata.matched_variation = Some(variation.text.clone());
                        }
                    }
                    None => {
                        by_fingerprint.insert(fingerprint.clone(), results.len());
                        results.push(to_result(hit, fingerprint, weighted, &variation.text));
                    }
                }
            }
        }

        if failed == variations.len() {
            return Err(last_error.unwrap_or_else(|| {
                LoreError::ConcurrencyError("vector search ran no variations".to_string())
            }));
        }

        results.sort_by(|a, b| b.score.total_cmp(&a.score));
        debug!(
            variations = variations.len(),
            failed,
            hits = results.len(),
            "vector search"
        );
        Ok(results)
    }
}

fn to_result(hit: ScoredChunk, fingerprint: String, weighted: f64, variation: &str) -> RetrievalResult {
    let chunk = hit.chunk;
    RetrievalResult {
        fingerprint,
        source_document: chunk.source_document_id,
        sources: vec![RetrievalSource::Vector],
        score: weighted,
        vector_score: Some(weighted),
        graph_score: None,
        metadata: ResultMetadata {
            chunk_id: Some(chunk.id),
            node_id: None,
            speaker: chunk.speaker,
            title: chunk.title,
            timestamp_secs: chunk.timestamp_secs,
            matched_variation: Some(variation.to_string()),
        },
        text: chunk.text,
    }
}

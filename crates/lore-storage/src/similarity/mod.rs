//! In-memory similarity index.

mod distance;

use std::sync::RwLock;

use dashmap::DashMap;
use rayon::prelude::*;
use tracing::debug;

use lore_core::errors::{LoreError, LoreResult, StoreError};
use lore_core::models::{Distance, ScoredChunk, TextChunk};
use lore_core::traits::{ISimilarityStore, SimilarityQuery};

pub use distance::score;

const STORE_NAME: &str = "in-memory-similarity";

struct Collection {
    dimensions: usize,
    distance: Distance,
    entries: RwLock<Vec<(TextChunk, Vec<f32>)>>,
}

/// Brute-force nearest-neighbour store keyed by collection name.
#[derive(Default)]
pub struct InMemorySimilarityStore {
    collections: DashMap<String, Collection>,
}

impl InMemorySimilarityStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace (by chunk id) a chunk and its vector.
    pub fn upsert(&self, collection: &str, chunk: TextChunk, vector: Vec<f32>) -> LoreResult<()> {
        let entry = self.collections.get(collection).ok_or_else(|| {
            StoreError::CollectionNotFound {
                collection: collection.to_string(),
            }
        })?;
        if vector.len() != entry.dimensions {
            return Err(StoreError::DimensionMismatch {
                collection: collection.to_string(),
                expected: entry.dimensions,
                actual: vector.len(),
            }
            .into());
        }
        let mut entries = entry
            .entries
            .write()
            .map_err(|e| LoreError::ConcurrencyError(e.to_string()))?;
        match entries
            .iter_mut()
            .find(|(c, _)| c.id == chunk.id && c.workspace_id == chunk.workspace_id)
        {
            Some(slot) => *slot = (chunk, vector),
            None => entries.push((chunk, vector)),
        }
        Ok(())
    }

    /// Number of chunks in a collection (0 when absent).
    pub fn len(&self, collection: &str) -> usize {
        self.collections
            .get(collection)
            .and_then(|c| c.entries.read().ok().map(|e| e.len()))
            .unwrap_or(0)
    }

    pub fn is_empty(&self, collection: &str) -> bool {
        self.len(collection) == 0
    }
}

impl ISimilarityStore for InMemorySimilarityStore {
    fn query(&self, query: &SimilarityQuery) -> LoreResult<Vec<ScoredChunk>> {
        let collection = self.collections.get(&query.collection).ok_or_else(|| {
            StoreError::CollectionNotFound {
                collection: query.collection.clone(),
            }
        })?;
        if query.vector.len() != collection.dimensions {
            return Err(StoreError::DimensionMismatch {
                collection: query.collection.clone(),
                expected: collection.dimensions,
                actual: query.vector.len(),
            }
            .into());
        }
        if query.k == 0 {
            return Ok(Vec::new());
        }

        let distance = collection.distance;
        let entries = collection
            .entries
            .read()
            .map_err(|e| LoreError::ConcurrencyError(e.to_string()))?;
        let mut scored: Vec<ScoredChunk> = entries
            .par_iter()
            .filter(|(chunk, _)| chunk.workspace_id == query.workspace && query.filter.matches(chunk))
            .map(|(chunk, vector)| ScoredChunk {
                chunk: chunk.clone(),
                score: score(distance, &query.vector, vector),
            })
            .collect();
        scored.sort_by(|a, b| {
            b.score
                .total_cmp(&a.score)
                .then_with(|| a.chunk.id.cmp(&b.chunk.id))
        });
        scored.truncate(query.k);
        debug!(
            store = STORE_NAME,
            collection = %query.collection,
            hits = scored.len(),
            "similarity query"
        );
        Ok(scored)
    }

    fn collection_exists(&self, name: &str) -> LoreResult<bool> {
        Ok(self.collections.contains_key(name))
    }

    fn create_collection(&self, name: &str, dimensions: usize, distance: Distance) -> LoreResult<()> {
        if dimensions == 0 {
            return Err(LoreError::ConfigError(format!(
                "collection {name}: dimensions must be greater than 0"
            )));
        }
        if let Some(existing) = self.collections.get(name) {
            if existing.dimensions != dimensions {
                return Err(StoreError::DimensionMismatch {
                    collection: name.to_string(),
                    expected: existing.dimensions,
                    actual: dimensions,
                }
                .into());
            }
            return Ok(());
        }
        self.collections.insert(
            name.to_string(),
            Collection {
                dimensions,
                distance,
                entries: RwLock::new(Vec::new()),
            },
        );
        Ok(())
    }
}

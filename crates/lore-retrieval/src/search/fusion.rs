//! Fingerprint-keyed fusion of the vector and graph lists.

use std::collections::HashMap;

use lore_core::config::SubstrateWeights;
use lore_core::models::{RetrievalResult, RetrievalSource};

/// Merge both lists keyed by fingerprint. A fingerprint present in both
/// lists gets the sum of its weighted scores and both source tags. The sort
/// is stable: ties keep first-seen order, vector list first.
pub fn fuse(
    vector: Vec<RetrievalResult>,
    graph: Vec<RetrievalResult>,
    weights: SubstrateWeights,
) -> Vec<RetrievalResult> {
    let mut fused: Vec<RetrievalResult> = Vec::with_capacity(vector.len() + graph.len());
    let mut by_fingerprint: HashMap<String, usize> = HashMap::new();

    let weighted = vector
        .into_iter()
        .map(|r| (RetrievalSource::Vector, weights.vector, r))
        .chain(
            graph
                .into_iter()
                .map(|r| (RetrievalSource::Graph, weights.graph, r)),
        );

    for (source, weight, mut result) in weighted {
        let raw = match source {
            RetrievalSource::Vector => result.vector_score,
            RetrievalSource::Graph => result.graph_score,
        }
        .unwrap_or(result.score);
        let contribution = weight * raw;

        let Some(&i) = by_fingerprint.get(&result.fingerprint) else {
            result.score = contribution;
            by_fingerprint.insert(result.fingerprint.clone(), fused.len());
            fused.push(result);
            continue;
        };

        let existing = &mut fused[i];
        if existing.has_source(source) {
            // Same substrate twice: keep the better hit, do not double count.
            let current = match source {
                RetrievalSource::Vector => existing.vector_score,
                RetrievalSource::Graph => existing.graph_score,
            }
            .unwrap_or(0.0);
            if raw > current {
                existing.score += weight * (raw - current);
                set_substrate_score(existing, source, raw);
            }
            continue;
        }
        existing.score += contribution;
        set_substrate_score(existing, source, raw);
        existing.sources.push(source);
        existing.sources.sort();
        existing.metadata.absorb(&result.metadata);
    }

    fused.sort_by(|a, b| b.score.total_cmp(&a.score));
    fused
}

fn set_substrate_score(result: &mut RetrievalResult, source: RetrievalSource, score: f64) {
    match source {
        RetrievalSource::Vector => result.vector_score = Some(score),
        RetrievalSource::Graph => result.graph_score = Some(score),
    }
}

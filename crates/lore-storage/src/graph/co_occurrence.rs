//! Document co-occurrence between concept pairs.

use rayon::prelude::*;

use lore_core::models::ConceptNode;
use lore_core::traits::PairRecord;

use super::concept_graph::ConceptGraph;

/// Unordered pairs of nodes that each appear in `min_episodes` documents and
/// share at least `min_shared`. Highest shared count first, then ids.
///
/// Only node document sets are consulted, so CROSS_EPISODE edges never feed
/// back into the counts.
pub fn pairs(
    graph: &ConceptGraph,
    min_episodes: usize,
    min_shared: usize,
    limit: usize,
) -> Vec<PairRecord> {
    let eligible: Vec<&ConceptNode> = graph
        .sorted_indices()
        .into_iter()
        .filter_map(|idx| graph.node(idx))
        .filter(|n| n.episode_count() >= min_episodes.max(1))
        .collect();

    let mut found: Vec<PairRecord> = (0..eligible.len())
        .into_par_iter()
        .flat_map_iter(|i| {
            let first = eligible[i];
            eligible[i + 1..].iter().filter_map(move |second| {
                let shared: std::collections::BTreeSet<String> = first
                    .source_document_ids
                    .intersection(&second.source_document_ids)
                    .cloned()
                    .collect();
                (shared.len() >= min_shared.max(1)).then(|| PairRecord {
                    first: first.clone(),
                    second: (*second).clone(),
                    shared_documents: shared,
                })
            })
        })
        .collect();

    found.sort_by(|a, b| {
        b.shared_count()
            .cmp(&a.shared_count())
            .then_with(|| a.first.id.cmp(&b.first.id))
            .then_with(|| a.second.id.cmp(&b.second.id))
    });
    found.truncate(limit);
    found
}

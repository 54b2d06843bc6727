//! Source-document diversification.

use std::collections::HashSet;

use lore_core::models::RetrievalResult;

/// Take the best result of each not-yet-seen document first (in score
/// order), then backfill by score. At most `top_k` results.
pub fn diversify(results: Vec<RetrievalResult>, top_k: usize) -> Vec<RetrievalResult> {
    if top_k == 0 {
        return Vec::new();
    }
    let mut seen: HashSet<&str> = HashSet::new();
    let mut first_pass: Vec<usize> = Vec::new();
    for (i, r) in results.iter().enumerate() {
        if first_pass.len() == top_k {
            break;
        }
        if seen.insert(r.source_document.as_str()) {
            first_pass.push(i);
        }
    }
    let picked: HashSet<usize> = first_pass.iter().copied().collect();
    let backfill = (0..results.len())
        .filter(|i| !picked.contains(i))
        .take(top_k - first_pass.len());
    let order: Vec<usize> = first_pass.iter().copied().chain(backfill).collect();

    let mut slots: Vec<Option<RetrievalResult>> = results.into_iter().map(Some).collect();
    order
        .into_iter()
        .filter_map(|i| slots.get_mut(i).and_then(Option::take))
        .collect()
}

//! Term matching against node names and descriptions.

use lore_core::models::{ConceptNode, MatchTier};

/// Best tier of `node` across `terms`, if any term matches.
pub fn best_tier(node: &ConceptNode, terms: &[String]) -> Option<MatchTier> {
    MatchTier::best(node, terms).map(|(tier, _)| tier)
}

/// Indexes of the terms that `node` matches.
pub fn matched_terms(node: &ConceptNode, terms: &[String]) -> Vec<usize> {
    terms
        .iter()
        .enumerate()
        .filter(|(_, term)| MatchTier::best(node, std::slice::from_ref(*term)).is_some())
        .map(|(i, _)| i)
        .collect()
}

/// Whether two matched-term sets cover at least two different terms.
pub fn distinct_terms(a: &[usize], b: &[usize]) -> bool {
    a.iter().any(|i| b.iter().any(|j| i != j))
}

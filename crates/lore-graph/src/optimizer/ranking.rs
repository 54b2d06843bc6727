//! Tier-first ranking of graph hits.

use lore_core::models::{MatchTier, NodeHit, Path};
use lore_core::text;
use lore_core::traits::NodeRecord;

const DESCRIPTION_HIT: f64 = 0.5;
const EDGE_BOOST: f64 = 0.02;
const MAX_EDGE_BOOST: f64 = 0.1;

/// Term coverage (name 1.0, description 0.5, averaged) plus a small boost
/// for well-connected nodes, clamped to 1.0.
pub(crate) fn node_score(record: &NodeRecord, terms: &[String]) -> f64 {
    if terms.is_empty() {
        return 0.0;
    }
    let coverage = terms
        .iter()
        .map(|t| {
            if MatchTier::of_name(&record.node.name, t).is_some() {
                1.0
            } else if text::contains_ci(&record.node.description, t) {
                DESCRIPTION_HIT
            } else {
                0.0
            }
        })
        .sum::<f64>()
        / terms.len() as f64;
    let boost = (record.preview.len() as f64 * EDGE_BOOST).min(MAX_EDGE_BOOST);
    (coverage + boost).min(1.0)
}

pub(crate) fn node_hit(record: NodeRecord, terms: &[String]) -> Option<NodeHit> {
    let (tier, term) = MatchTier::best(&record.node, terms)?;
    let matched_term = term.to_string();
    let score = node_score(&record, terms);
    Some(NodeHit {
        episode_count: record.node.episode_count(),
        match_tier: Some(tier),
        matched_term: Some(matched_term),
        score,
        preview: record.preview,
        node: record.node,
    })
}

/// Tier ascending, then score descending, then id.
pub(crate) fn sort_nodes(hits: &mut [NodeHit]) {
    hits.sort_by(|a, b| {
        a.match_tier
            .cmp(&b.match_tier)
            .then_with(|| b.score.total_cmp(&a.score))
            .then_with(|| a.node.id.cmp(&b.node.id))
    });
}

fn name_tier(name: &str, terms: &[String]) -> MatchTier {
    terms
        .iter()
        .filter_map(|t| MatchTier::of_name(name, t))
        .min()
        .unwrap_or(MatchTier::DescriptionOnly)
}

/// The worse of the two endpoints' best tiers.
pub(crate) fn endpoint_tier(path: &Path, terms: &[String]) -> MatchTier {
    let source = path.source_name().map_or(MatchTier::DescriptionOnly, |n| name_tier(n, terms));
    let target = path.target_name().map_or(MatchTier::DescriptionOnly, |n| name_tier(n, terms));
    source.max(target)
}

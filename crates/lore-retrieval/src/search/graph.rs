//! Graph path: keyword node match on the literal query with a one-hop
//! relationship preview used as a relevance boost.

use std::sync::Arc;

use tracing::debug;

use lore_core::errors::LoreResult;
use lore_core::models::{MatchTier, ResultMetadata, RetrievalResult, RetrievalSource, WorkspaceId};
use lore_core::text;
use lore_core::traits::{GraphQuery, GraphRow, IGraphStore, NodeRecord};

const DESCRIPTION_HIT: f64 = 0.5;
const PREVIEW_BOOST: f64 = 0.05;
const MAX_PREVIEW_BOOST: f64 = 0.2;

/// Keyword node match rendered as retrieval results.
#[derive(Clone)]
pub struct GraphSearcher {
    store: Arc<dyn IGraphStore>,
}

impl GraphSearcher {
    pub fn new(store: Arc<dyn IGraphStore>) -> Self {
        Self { store }
    }

    /// Up to `limit` node results, best first. No keywords, no results.
    pub fn search(
        &self,
        workspace: &WorkspaceId,
        query: &str,
        limit: usize,
    ) -> LoreResult<Vec<RetrievalResult>> {
        let keywords = text::extract_keywords(query);
        if keywords.is_empty() || limit == 0 {
            return Ok(Vec::new());
        }
        let rows = self.store.read(
            workspace,
            &GraphQuery::MatchNodes {
                terms: keywords.clone(),
                limit,
            },
        )?;
        let mut results: Vec<RetrievalResult> = GraphRow::nodes(rows)
            .into_iter()
            .map(|record| {
                let score = graph_score(&keywords, &record);
                to_result(record, score)
            })
            .collect();
        results.sort_by(|a, b| b.score.total_cmp(&a.score));
        debug!(keywords = ?keywords, hits = results.len(), "graph search");
        Ok(results)
    }
}

/// Keyword coverage (name hit 1.0, description hit 0.5, averaged) plus 0.05
/// per matching preview neighbour, capped at 0.2, clamped to 1.0.
pub fn graph_score(keywords: &[String], record: &NodeRecord) -> f64 {
    if keywords.is_empty() {
        return 0.0;
    }
    let node = &record.node;
    let coverage: f64 = keywords
        .iter()
        .map(|k| {
            if MatchTier::of_name(&node.name, k).is_some() {
                1.0
            } else if text::contains_ci(&node.description, k) {
                DESCRIPTION_HIT
            } else {
                0.0
            }
        })
        .sum::<f64>()
        / keywords.len() as f64;

    let neighbours = record
        .preview
        .iter()
        .filter(|p| keywords.iter().any(|k| text::contains_ci(&p.neighbor_name, k)))
        .count();
    let boost = (neighbours as f64 * PREVIEW_BOOST).min(MAX_PREVIEW_BOOST);
    (coverage + boost).min(1.0)
}

fn to_result(record: NodeRecord, score: f64) -> RetrievalResult {
    let node = record.node;
    let mut body = format!("{} ({})", node.name, node.concept_type);
    if !node.description.is_empty() {
        body.push_str(": ");
        body.push_str(&node.description);
    }
    if !record.preview.is_empty() {
        let related: Vec<String> = record
            .preview
            .iter()
            .map(|p| format!("{} {}", node.name, p.describe()))
            .collect();
        body.push_str(" Related: ");
        body.push_str(&related.join("; "));
    }
    let source_document = node
        .source_document_ids
        .iter()
        .next()
        .cloned()
        .unwrap_or_else(|| node.id.clone());

    RetrievalResult {
        fingerprint: text::fingerprint(&body),
        text: body,
        source_document,
        sources: vec![RetrievalSource::Graph],
        score,
        vector_score: None,
        graph_score: Some(score),
        metadata: ResultMetadata {
            node_id: Some(node.id),
            speaker: node.speakers.iter().next().cloned(),
            ..ResultMetadata::default()
        },
    }
}

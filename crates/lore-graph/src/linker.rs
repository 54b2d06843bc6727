//! Cross-episode linker: promotes concept pairs that keep appearing together
//! into CROSS_EPISODE edges.
//!
//! Runs as a batch job off the query path. A re-run on an unchanged graph
//! writes nothing new (`created == 0`).

use std::sync::Arc;

use chrono::Utc;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, info_span, warn};

use lore_core::config::LinkerConfig;
use lore_core::errors::{LoreError, LoreResult};
use lore_core::models::{LinkReport, WorkspaceId};
use lore_core::traits::{
    CrossEpisodeLink, GraphQuery, GraphRow, GraphWrite, IGraphStore, PairRecord, WriteOutcome,
};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LinkOptions {
    /// Documents each concept must individually appear in.
    pub min_episodes: usize,
    /// Documents the pair must share.
    pub min_co_occurrences: usize,
    pub min_confidence: f64,
    pub batch_size: usize,
    /// Pairs considered per run, highest co-occurrence first.
    pub max_pairs: usize,
    pub confidence_divisor: f64,
}

impl Default for LinkOptions {
    fn default() -> Self {
        Self::from_config(&LinkerConfig::default())
    }
}

impl LinkOptions {
    pub fn from_config(config: &LinkerConfig) -> Self {
        Self {
            min_episodes: config.min_episodes,
            min_co_occurrences: config.min_co_occurrences,
            min_confidence: config.min_confidence,
            batch_size: config.batch_size,
            max_pairs: config.max_pairs,
            confidence_divisor: config.confidence_divisor,
        }
    }

    pub fn validate(&self) -> LoreResult<()> {
        if !(0.0..=1.0).contains(&self.min_confidence) {
            return Err(LoreError::ConfigError(format!(
                "linker.min_confidence must be in [0, 1], got {}",
                self.min_confidence
            )));
        }
        if self.batch_size == 0 {
            return Err(LoreError::ConfigError(
                "linker.batch_size must be greater than 0".to_string(),
            ));
        }
        if self.min_episodes == 0 {
            return Err(LoreError::ConfigError(
                "linker.min_episodes must be at least 1".to_string(),
            ));
        }
        if self.min_co_occurrences == 0 {
            return Err(LoreError::ConfigError(
                "linker.min_co_occurrences must be at least 1".to_string(),
            ));
        }
        if !(self.confidence_divisor.is_finite() && self.confidence_divisor > 0.0) {
            return Err(LoreError::ConfigError(format!(
                "linker.confidence_divisor must be positive, got {}",
                self.confidence_divisor
            )));
        }
        Ok(())
    }

    /// `min(1, shared / divisor)`
    pub fn confidence(&self, shared: usize) -> f64 {
        (shared as f64 / self.confidence_divisor).min(1.0)
    }
}

/// Batch job that promotes concept pairs sharing enough documents into
/// CROSS_EPISODE edges.
///
/// Runs are idempotent: a second run over an unchanged graph reports every
/// link as unchanged.
pub struct CrossEpisodeLinker {
    store: Arc<dyn IGraphStore>,
    defaults: LinkOptions,
}

impl CrossEpisodeLinker {
    pub fn new(store: Arc<dyn IGraphStore>, config: LinkerConfig) -> Self {
        Self {
            store,
            defaults: LinkOptions::from_config(&config),
        }
    }

    /// Options built from configuration.
    pub fn default_options(&self) -> &LinkOptions {
        &self.defaults
    }

    pub fn create_links(
        &self,
        workspace: &WorkspaceId,
        options: &LinkOptions,
    ) -> LoreResult<LinkReport> {
        options.validate()?;
        let span = info_span!(
            "lore.linker",
            workspace = %workspace,
            min_episodes = options.min_episodes,
            min_co_occurrences = options.min_co_occurrences,
            min_confidence = options.min_confidence,
        );
        let _entered = span.enter();
        let mut report = LinkReport::start();

        let rows = self.store.read(
            workspace,
            &GraphQuery::CoOccurringPairs {
                min_episodes: options.min_episodes,
                min_shared: options.min_co_occurrences,
                limit: options.max_pairs,
            },
        )?;
        let pairs = GraphRow::pairs(rows);
        report.pairs_considered = pairs.len();

        let mut links = Vec::with_capacity(pairs.len());
        for pair in pairs {
            let confidence = options.confidence(pair.shared_count());
            if confidence < options.min_confidence {
                debug!(
                    first = %pair.first.id,
                    second = %pair.second.id,
                    confidence,
                    "pair below confidence threshold"
                );
                report.skipped += 1;
                continue;
            }
            links.push(link_for(pair, confidence));
        }

        for (batch_no, batch) in links.chunks(options.batch_size).enumerate() {
            let writes: Vec<GraphWrite> = batch
                .iter()
                .cloned()
                .map(GraphWrite::UpsertCrossEpisode)
                .collect();
            match self.store.write_batch(workspace, &writes) {
                Ok(outcomes) => tally(&mut report, batch, &outcomes),
                Err(e) if e.is_transient() => {
                    warn!(batch = batch_no, size = batch.len(), error = %e, "link batch failed");
                    report.failed += batch.len();
                }
                Err(e) => return Err(e),
            }
        }

        report.finished_at = Utc::now();
        info!(
            pairs = report.pairs_considered,
            created = report.created,
            updated = report.updated,
            unchanged = report.unchanged,
            skipped = report.skipped,
            failed = report.failed,
            integrity_warnings = report.integrity_warnings,
            "cross-episode linking complete"
        );
        Ok(report)
    }

    /// [`create_links`](Self::create_links) with the configured options.
    pub fn run(&self, workspace: &WorkspaceId) -> LoreResult<LinkReport> {
        self.create_links(workspace, &self.defaults)
    }
}

/// Directed from the concept in more documents; equal counts go from the
/// smaller id.
fn link_for(pair: PairRecord, confidence: f64) -> CrossEpisodeLink {
    let (a, b) = (&pair.first, &pair.second);
    let a_first = match a.episode_count().cmp(&b.episode_count()) {
        std::cmp::Ordering::Greater => true,
        std::cmp::Ordering::Less => false,
        std::cmp::Ordering::Equal => a.id <= b.id,
    };
    let (source, target) = if a_first { (a, b) } else { (b, a) };
    let count = pair.shared_count();
    CrossEpisodeLink {
        source_id: source.id.clone(),
        target_id: target.id.clone(),
        description: format!(
            "{} and {} co-occur in {count} episodes",
            source.name, target.name
        ),
        co_occurrence_count: count,
        confidence,
        shared_episodes: pair.shared_documents,
    }
}

fn tally(report: &mut LinkReport, batch: &[CrossEpisodeLink], outcomes: &[WriteOutcome]) {
    for (link, outcome) in batch.iter().zip(outcomes) {
        match outcome {
            WriteOutcome::Created => report.created += 1,
            WriteOutcome::Updated => report.updated += 1,
            WriteOutcome::Unchanged => report.unchanged += 1,
            WriteOutcome::MissingEndpoint => {
                warn!(
                    source = %link.source_id,
                    target = %link.target_id,
                    "cross-episode endpoint missing"
                );
                report.integrity_warnings += 1;
            }
            WriteOutcome::Rejected => {
                warn!(source = %link.source_id, target = %link.target_id, "cross-episode write rejected");
                report.failed += 1;
            }
        }
    }
}

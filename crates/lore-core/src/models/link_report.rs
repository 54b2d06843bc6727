use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Outcome of one cross-episode linking run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LinkReport {
    pub pairs_considered: usize,
    pub created: usize,
    pub updated: usize,
    pub unchanged: usize,
    /// Pairs below the confidence threshold; not written.
    pub skipped: usize,
    /// Pairs whose write batch failed transiently.
    pub failed: usize,
    /// Writes that targeted a node that no longer exists.
    pub integrity_warnings: usize,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
}

impl LinkReport {
    pub fn start() -> Self {
        let now = Utc::now();
        Self {
            pairs_considered: 0,
            created: 0,
            updated: 0,
            unchanged: 0,
            skipped: 0,
            failed: 0,
            integrity_warnings: 0,
            started_at: now,
            finished_at: now,
        }
    }

    /// Number of edges written (created or widened).
    pub fn written(&self) -> usize {
        self.created + self.updated
    }
}

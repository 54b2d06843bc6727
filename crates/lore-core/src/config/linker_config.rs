use serde::{Deserialize, Serialize};

use super::defaults;

/// Cross-episode linker defaults.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LinkerConfig {
    pub min_episodes: usize,
    pub min_co_occurrences: usize,
    pub min_confidence: f64,
    pub batch_size: usize,
    pub max_pairs: usize,
    /// confidence = min(1, shared_count / confidence_divisor)
    pub confidence_divisor: f64,
}

impl Default for LinkerConfig {
    fn default() -> Self {
        Self {
            min_episodes: defaults::DEFAULT_LINK_MIN_EPISODES,
            min_co_occurrences: defaults::DEFAULT_LINK_MIN_CO_OCCURRENCES,
            min_confidence: defaults::DEFAULT_LINK_MIN_CONFIDENCE,
            batch_size: defaults::DEFAULT_LINK_BATCH_SIZE,
            max_pairs: defaults::DEFAULT_LINK_MAX_PAIRS,
            confidence_divisor: defaults::DEFAULT_CONFIDENCE_DIVISOR,
        }
    }
}

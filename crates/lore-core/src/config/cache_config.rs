use serde::{Deserialize, Serialize};

use super::defaults;

/// Semantic (embedding) cache configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CacheConfig {
    pub capacity: u64,
    pub ttl_secs: u64,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            capacity: defaults::DEFAULT_CACHE_CAPACITY,
            ttl_secs: defaults::DEFAULT_CACHE_TTL_SECS,
        }
    }
}

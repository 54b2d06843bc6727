//! Bounded LRU embedding cache with lazy TTL expiry.
//!
//! Keys are blake3 hashes of the lower-cased, trimmed text. Pending moka
//! maintenance is flushed on `set`, `clear`, and `stats`, so size accounting
//! is exact at those points.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use moka::notification::RemovalCause;
use moka::policy::EvictionPolicy;
use moka::sync::Cache;
use tracing::debug;

use lore_core::config::CacheConfig;
use lore_core::models::CacheStats;
use lore_core::text;

#[derive(Default)]
struct Counters {
    hits: AtomicU64,
    misses: AtomicU64,
    evictions: AtomicU64,
    expirations: AtomicU64,
}

/// Process-wide embedding cache. Share it by `Arc`.
pub struct SemanticCache {
    cache: Cache<String, Arc<Vec<f32>>>,
    capacity: u64,
    counters: Arc<Counters>,
}

impl SemanticCache {
    pub fn new(capacity: u64, ttl: Duration) -> Self {
        let counters = Arc::new(Counters::default());
        let listener_counters = Arc::clone(&counters);
        let cache = Cache::builder()
            .max_capacity(capacity)
            .time_to_live(ttl)
            .eviction_policy(EvictionPolicy::lru())
            .eviction_listener(move |_key, _value, cause| match cause {
                RemovalCause::Size => {
                    listener_counters.evictions.fetch_add(1, Ordering::Relaxed);
                }
                RemovalCause::Expired => {
                    listener_counters.expirations.fetch_add(1, Ordering::Relaxed);
                }
                RemovalCause::Explicit | RemovalCause::Replaced => {}
            })
            .build();
        Self {
            cache,
            capacity,
            counters,
        }
    }

    pub fn from_config(config: &CacheConfig) -> Self {
        Self::new(config.capacity, Duration::from_secs(config.ttl_secs))
    }

    /// Cached vector for `text`. Expired entries count as misses.
    pub fn get(&self, text: &str) -> Option<Vec<f32>> {
        match self.cache.get(&text::cache_key(text)) {
            Some(v) => {
                self.counters.hits.fetch_add(1, Ordering::Relaxed);
                Some(v.as_ref().clone())
            }
            None => {
                self.counters.misses.fetch_add(1, Ordering::Relaxed);
                None
            }
        }
    }

    /// Insert or refresh. At capacity the least-recently-used entry is dropped.
    pub fn set(&self, text: &str, vector: Vec<f32>) {
        self.cache.insert(text::cache_key(text), Arc::new(vector));
        self.cache.run_pending_tasks();
    }

    pub fn stats(&self) -> CacheStats {
        self.cache.run_pending_tasks();
        CacheStats {
            size: self.cache.entry_count(),
            capacity: self.capacity,
            hits: self.counters.hits.load(Ordering::Relaxed),
            misses: self.counters.misses.load(Ordering::Relaxed),
            evictions: self.counters.evictions.load(Ordering::Relaxed),
            expirations: self.counters.expirations.load(Ordering::Relaxed),
        }
    }

    pub fn clear(&self) {
        self.cache.invalidate_all();
        self.cache.run_pending_tasks();
        debug!("semantic cache cleared");
    }
}

#[cfg(test)]
mod tests {
    use std::thread;

    use super::*;

    #[test]
    fn round_trip_ignores_case_and_padding() {
        let cache = SemanticCache::new(10, Duration::from_secs(60));
        cache.set("Sleep Quality", vec![1.0, 2.0]);
        assert_eq!(cache.get("  sleep quality "), Some(vec![1.0, 2.0]));
        let stats = cache.stats();
        assert_eq!(stats.hits, 1);
        assert_eq!(stats.size, 1);
    }

    #[test]
    fn miss_is_counted() {
        let cache = SemanticCache::new(10, Duration::from_secs(60));
        assert_eq!(cache.get("nothing"), None);
        assert_eq!(cache.stats().misses, 1);
    }

    #[test]
    fn capacity_evicts_least_recently_used() {
        let cache = SemanticCache::new(2, Duration::from_secs(60));
        cache.set("a", vec![1.0]);
        cache.set("b", vec![2.0]);
        assert!(cache.get("a").is_some());
        cache.set("c", vec![3.0]);
        let stats = cache.stats();
        assert_eq!(stats.size, 2);
        assert_eq!(stats.evictions, 1);
        assert!(cache.get("a").is_some());
        assert!(cache.get("c").is_some());
        assert!(cache.get("b").is_none());
    }

    #[test]
    fn expired_entry_is_a_miss_and_purged() {
        let cache = SemanticCache::new(10, Duration::from_millis(50));
        cache.set("short lived", vec![1.0]);
        cache.set("other", vec![2.0]);
        assert_eq!(cache.stats().size, 2);
        thread::sleep(Duration::from_millis(120));
        assert_eq!(cache.get("short lived"), None);
        let stats = cache.stats();
        assert_eq!(stats.size, 0);
        assert_eq!(stats.expirations, 2);
    }

    #[test]
    fn clear_empties_cache() {
        let cache = SemanticCache::new(10, Duration::from_secs(60));
        cache.set("a", vec![1.0]);
        cache.clear();
        assert_eq!(cache.get("a"), None);
        assert_eq!(cache.stats().size, 0);
    }
}

//! Retry with exponential backoff and jitter, applied at adapter boundaries.

use std::time::Duration;

use rand::Rng;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::config::defaults;
use crate::errors::LoreResult;

/// Backoff schedule shared by store decorators and HTTP providers.
///
/// Only transient errors (`LoreError::is_transient`) are retried.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RetryPolicy {
    /// Total attempts, including the first. `1` disables retry.
    pub max_attempts: u32,
    /// Delay before the first retry (doubles each retry).
    pub base_delay_ms: u64,
    /// Upper bound on a single delay.
    pub max_delay_ms: u64,
    /// Fractional random spread added to each delay, in `[0, 1]`.
    pub jitter: f64,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: defaults::DEFAULT_RETRY_MAX_ATTEMPTS,
            base_delay_ms: defaults::DEFAULT_RETRY_BASE_DELAY_MS,
            max_delay_ms: defaults::DEFAULT_RETRY_MAX_DELAY_MS,
            jitter: defaults::DEFAULT_RETRY_JITTER,
        }
    }
}

impl RetryPolicy {
    /// A policy that never retries.
    pub fn none() -> Self {
        Self {
            max_attempts: 1,
            ..Self::default()
        }
    }

    /// Delay before retry number `retry` (1-based), without jitter.
    pub fn base_delay(&self, retry: u32) -> Duration {
        let factor = 2u64.saturating_pow(retry.saturating_sub(1));
        let ms = self.base_delay_ms.saturating_mul(factor).min(self.max_delay_ms);
        Duration::from_millis(ms)
    }

    fn jittered(&self, retry: u32) -> Duration {
        let base = self.base_delay(retry);
        let spread = self.jitter.clamp(0.0, 1.0);
        if spread == 0.0 || base.is_zero() {
            return base;
        }
        let extra = rand::thread_rng().gen_range(0.0..=spread);
        base.mul_f64(1.0 + extra)
            .min(Duration::from_millis(self.max_delay_ms))
    }

    /// Run `op`, retrying transient failures until attempts are exhausted.
    pub fn run<T, F>(&self, operation: &str, mut op: F) -> LoreResult<T>
    where
        F: FnMut() -> LoreResult<T>,
    {
        let attempts = self.max_attempts.max(1);
        let mut attempt = 1;
        loop {
            match op() {
                Ok(value) => return Ok(value),
                Err(e) if e.is_transient() && attempt < attempts => {
                    let delay = self.jittered(attempt);
                    debug!(operation, attempt, ?delay, error = %e, "retrying");
                    std::thread::sleep(delay);
                    attempt += 1;
                }
                Err(e) => {
                    if e.is_transient() {
                        warn!(operation, attempts, error = %e, "retries exhausted");
                    }
                    return Err(e);
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::cell::Cell;

    use super::*;
    use crate::errors::{LoreError, StoreError};

    fn fast() -> RetryPolicy {
        RetryPolicy {
            max_attempts: 3,
            base_delay_ms: 1,
            max_delay_ms: 4,
            jitter: 0.5,
        }
    }

    fn unavailable() -> LoreError {
        StoreError::Unavailable {
            store: "graph".into(),
            reason: "connection refused".into(),
        }
        .into()
    }

    #[test]
    fn retries_transient_until_success() {
        let calls = Cell::new(0);
        let out = fast()
            .run("read", || {
                calls.set(calls.get() + 1);
                if calls.get() < 3 {
                    Err(unavailable())
                } else {
                    Ok("ok")
                }
            })
            .unwrap();
        assert_eq!(out, "ok");
        assert_eq!(calls.get(), 3);
    }

    #[test]
    fn gives_up_after_max_attempts() {
        let calls = Cell::new(0);
        let err = fast()
            .run::<(), _>("read", || {
                calls.set(calls.get() + 1);
                Err(unavailable())
            })
            .unwrap_err();
        assert!(err.is_transient());
        assert_eq!(calls.get(), 3);
    }

    #[test]
    fn config_errors_are_not_retried() {
        let calls = Cell::new(0);
        let _ = fast().run::<(), _>("read", || {
            calls.set(calls.get() + 1);
            Err(LoreError::ConfigError("bad filter".into()))
        });
        assert_eq!(calls.get(), 1);
    }

    #[test]
    fn delay_doubles_and_caps() {
        let p = RetryPolicy {
            max_attempts: 5,
            base_delay_ms: 100,
            max_delay_ms: 300,
            jitter: 0.0,
        };
        assert_eq!(p.base_delay(1), Duration::from_millis(100));
        assert_eq!(p.base_delay(2), Duration::from_millis(200));
        assert_eq!(p.base_delay(3), Duration::from_millis(300));
        assert_eq!(p.base_delay(10), Duration::from_millis(300));
    }
}

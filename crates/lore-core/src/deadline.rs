//! Bounded-wait execution on short-lived worker threads.
//!
//! The caller never blocks past the deadline. A worker that overruns keeps
//! running in the background and its result is dropped.

use std::thread;
use std::time::{Duration, Instant};

use crossbeam_channel::{bounded, Receiver, RecvTimeoutError};

use crate::errors::{LoreError, LoreResult};

/// Handle to work running on a worker thread.
pub struct Pending<T> {
    operation: String,
    rx: Receiver<LoreResult<T>>,
    started: Instant,
    timeout: Duration,
}

impl<T> Pending<T> {
    /// Block until the result arrives or the deadline (measured from spawn)
    /// passes.
    pub fn wait(self) -> LoreResult<T> {
        let remaining = self.timeout.saturating_sub(self.started.elapsed());
        match self.rx.recv_timeout(remaining) {
            Ok(result) => result,
            Err(RecvTimeoutError::Timeout) => Err(LoreError::Timeout {
                operation: self.operation,
                elapsed_ms: self.started.elapsed().as_millis() as u64,
            }),
            Err(RecvTimeoutError::Disconnected) => Err(LoreError::ConcurrencyError(format!(
                "{} worker exited without a result",
                self.operation
            ))),
        }
    }

    pub fn operation(&self) -> &str {
        &self.operation
    }
}

/// Start `work` on a named worker thread that inherits the current tracing span.
pub fn spawn<T, F>(operation: &str, timeout: Duration, work: F) -> LoreResult<Pending<T>>
where
    T: Send + 'static,
    F: FnOnce() -> LoreResult<T> + Send + 'static,
{
    let (tx, rx) = bounded(1);
    let span = tracing::Span::current();
    thread::Builder::new()
        .name(format!("lore-{operation}"))
        .spawn(move || {
            let _entered = span.enter();
            // The receiver is gone once the caller has given up.
            let _ = tx.send(work());
        })
        .map_err(|e| LoreError::ConcurrencyError(format!("failed to spawn {operation}: {e}")))?;
    Ok(Pending {
        operation: operation.to_string(),
        rx,
        started: Instant::now(),
        timeout,
    })
}

/// Run `work` and wait for it under `timeout`.
pub fn run<T, F>(operation: &str, timeout: Duration, work: F) -> LoreResult<T>
where
    T: Send + 'static,
    F: FnOnce() -> LoreResult<T> + Send + 'static,
{
    spawn(operation, timeout, work)?.wait()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn returns_result_within_deadline() {
        let out = run("quick", Duration::from_millis(500), || Ok(7)).unwrap();
        assert_eq!(out, 7);
    }

    #[test]
    fn overrun_becomes_timeout() {
        let err = run("slow", Duration::from_millis(20), || {
            thread::sleep(Duration::from_millis(300));
            Ok(())
        })
        .unwrap_err();
        assert!(matches!(err, LoreError::Timeout { ref operation, .. } if operation == "slow"));
        assert!(err.is_transient());
    }

    #[test]
    fn worker_error_passes_through() {
        let err = run::<(), _>("failing", Duration::from_millis(500), || {
            Err(LoreError::ConfigError("bad".into()))
        })
        .unwrap_err();
        assert!(err.is_config());
    }

    #[test]
    fn concurrent_handles_share_wall_clock() {
        let started = Instant::now();
        let a = spawn("a", Duration::from_millis(400), || {
            thread::sleep(Duration::from_millis(100));
            Ok(1)
        })
        .unwrap();
        let b = spawn("b", Duration::from_millis(400), || {
            thread::sleep(Duration::from_millis(100));
            Ok(2)
        })
        .unwrap();
        assert_eq!(a.wait().unwrap() + b.wait().unwrap(), 3);
        assert!(started.elapsed() < Duration::from_millis(350));
    }
}

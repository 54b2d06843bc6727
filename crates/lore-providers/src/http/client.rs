//! Shared blocking JSON client for OpenAI-compatible endpoints.

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{Duration, Instant};

use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::warn;

use lore_core::errors::{LoreResult, ProviderError};
use lore_core::retry::RetryPolicy;

pub(crate) struct JsonClient {
    name: String,
    endpoint: String,
    api_key: Option<String>,
    client: reqwest::blocking::Client,
    retry: RetryPolicy,
    cooldown: Duration,
    origin: Instant,
    /// Milliseconds after `origin` before which calls fail fast. `0` is up.
    down_until_ms: AtomicU64,
}

impl JsonClient {
    pub(crate) fn new(
        name: &str,
        endpoint: &str,
        api_key: Option<String>,
        timeout: Duration,
        retry: RetryPolicy,
        cooldown: Duration,
    ) -> LoreResult<Self> {
        let client = reqwest::blocking::Client::builder()
            .timeout(timeout)
            .gzip(true)
            .build()
            .map_err(|e| ProviderError::RequestFailed {
                reason: format!("http client: {e}"),
            })?;
        Ok(Self {
            name: name.to_string(),
            endpoint: endpoint.to_string(),
            api_key,
            client,
            retry,
            cooldown,
            origin: Instant::now(),
            down_until_ms: AtomicU64::new(0),
        })
    }

    pub(crate) fn name(&self) -> &str {
        &self.name
    }

    fn now_ms(&self) -> u64 {
        u64::try_from(self.origin.elapsed().as_millis()).unwrap_or(u64::MAX)
    }

    /// False while cooling down after a transient failure.
    pub(crate) fn is_available(&self) -> bool {
        self.now_ms() >= self.down_until_ms.load(Ordering::Relaxed)
    }

    pub(crate) fn reset_availability(&self) {
        self.down_until_ms.store(0, Ordering::Relaxed);
    }

    /// POST `body` with retry. Exhausting retries on a transient failure
    /// marks the provider unavailable for the cooldown; the first call after
    /// it goes through again, and a success clears the mark.
    pub(crate) fn post<Req, Resp>(&self, body: &Req) -> LoreResult<Resp>
    where
        Req: Serialize,
        Resp: DeserializeOwned,
    {
        if !self.is_available() {
            return Err(ProviderError::Unavailable {
                provider: self.name.clone(),
            }
            .into());
        }
        let result = self.retry.run(&self.name, || self.send(body));
        match &result {
            Ok(_) => self.reset_availability(),
            Err(e) if e.is_transient() => {
                let cooldown_ms = u64::try_from(self.cooldown.as_millis()).unwrap_or(u64::MAX);
                warn!(
                    provider = %self.name,
                    error = %e,
                    cooldown_ms,
                    "provider marked unavailable"
                );
                self.down_until_ms
                    .store(self.now_ms().saturating_add(cooldown_ms), Ordering::Relaxed);
            }
            Err(_) => {}
        }
        result
    }

    fn send<Req, Resp>(&self, body: &Req) -> LoreResult<Resp>
    where
        Req: Serialize,
        Resp: DeserializeOwned,
    {
        let mut req = self.client.post(&self.endpoint).json(body);
        if let Some(key) = &self.api_key {
            req = req.bearer_auth(key);
        }
        let response = req.send().map_err(|e| ProviderError::RequestFailed {
            reason: format!("http: {e}"),
        })?;

        let status = response.status();
        if status.is_server_error() || status.as_u16() == 429 {
            return Err(ProviderError::RequestFailed {
                reason: format!("{} returned {status}", self.name),
            }
            .into());
        }
        if !status.is_success() {
            let text = response.text().unwrap_or_default();
            return Err(ProviderError::InvalidResponse {
                reason: format!("{} returned {status}: {text}", self.name),
            }
            .into());
        }
        response.json::<Resp>().map_err(|e| {
            ProviderError::InvalidResponse {
                reason: format!("json: {e}"),
            }
            .into()
        })
    }
}

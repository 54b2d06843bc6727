use serde::{Deserialize, Serialize};

use super::defaults;
use crate::retry::RetryPolicy;

/// HTTP embedding/completion provider configuration.
///
/// With no endpoint set the runtime falls back to the local hashed embedder
/// and template paraphrasing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProviderConfig {
    /// OpenAI-compatible `/embeddings` URL.
    pub embedding_endpoint: Option<String>,
    /// OpenAI-compatible `/chat/completions` URL.
    pub completion_endpoint: Option<String>,
    pub embedding_model: String,
    pub completion_model: String,
    pub dimensions: usize,
    /// Environment variable holding the bearer token.
    pub api_key_env: String,
    pub request_timeout_ms: u64,
    pub retry: RetryPolicy,
    /// How long a provider that exhausted its retries fails fast before the
    /// next call is let through.
    pub unavailable_cooldown_ms: u64,
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            embedding_endpoint: None,
            completion_endpoint: None,
            embedding_model: defaults::DEFAULT_EMBEDDING_MODEL.to_string(),
            completion_model: defaults::DEFAULT_COMPLETION_MODEL.to_string(),
            dimensions: defaults::DEFAULT_EMBEDDING_DIMENSIONS,
            api_key_env: defaults::DEFAULT_API_KEY_ENV.to_string(),
            request_timeout_ms: defaults::DEFAULT_REQUEST_TIMEOUT_MS,
            retry: RetryPolicy::default(),
            unavailable_cooldown_ms: defaults::DEFAULT_UNAVAILABLE_COOLDOWN_MS,
        }
    }
}

//! OpenAI-compatible `/embeddings` provider.

use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::debug;

use lore_core::config::ProviderConfig;
use lore_core::errors::{LoreResult, ProviderError};
use lore_core::traits::IEmbeddingProvider;

use super::client::JsonClient;

#[derive(Debug, Serialize)]
pub(crate) struct EmbedRequest<'a> {
    pub model: &'a str,
    pub input: &'a [String],
}

#[derive(Debug, Deserialize)]
pub(crate) struct EmbedResponse {
    pub data: Vec<EmbedData>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct EmbedData {
    pub embedding: Vec<f32>,
    #[serde(default)]
    pub index: Option<usize>,
}

pub struct ApiEmbeddingProvider {
    client: JsonClient,
    model: String,
    dimensions: usize,
}

impl ApiEmbeddingProvider {
    pub fn new(
        endpoint: &str,
        model: &str,
        api_key: Option<String>,
        dimensions: usize,
        config: &ProviderConfig,
    ) -> LoreResult<Self> {
        let client = JsonClient::new(
            "api-embedding",
            endpoint,
            api_key,
            Duration::from_millis(config.request_timeout_ms),
            config.retry.clone(),
            Duration::from_millis(config.unavailable_cooldown_ms),
        )?;
        Ok(Self {
            client,
            model: model.to_string(),
            dimensions,
        })
    }

    /// Build from config, reading the bearer token from `api_key_env`.
    /// Returns `None` when no embedding endpoint is configured.
    pub fn from_config(config: &ProviderConfig) -> LoreResult<Option<Self>> {
        let Some(endpoint) = config.embedding_endpoint.as_deref() else {
            return Ok(None);
        };
        let key = std::env::var(&config.api_key_env).ok();
        Self::new(
            endpoint,
            &config.embedding_model,
            key,
            config.dimensions,
            config,
        )
        .map(Some)
    }

    pub fn reset_availability(&self) {
        self.client.reset_availability();
    }

    fn request(&self, texts: &[String]) -> LoreResult<Vec<Vec<f32>>> {
        let response: EmbedResponse = self.client.post(&EmbedRequest {
            model: &self.model,
            input: texts,
        })?;
        let vectors = order_embeddings(response, texts.len())?;
        if let Some(v) = vectors.iter().find(|v| v.len() != self.dimensions) {
            return Err(ProviderError::DimensionMismatch {
                expected: self.dimensions,
                actual: v.len(),
            }
            .into());
        }
        debug!(count = vectors.len(), "embedded batch");
        Ok(vectors)
    }
}

/// Reorder by `index` when the server supplies it and check the count.
pub(crate) fn order_embeddings(
    mut response: EmbedResponse,
    expected: usize,
) -> LoreResult<Vec<Vec<f32>>> {
    if response.data.len() != expected {
        return Err(ProviderError::InvalidResponse {
            reason: format!(
                "expected {expected} embeddings, got {}",
                response.data.len()
            ),
        }
        .into());
    }
    if response.data.iter().all(|d| d.index.is_some()) {
        response.data.sort_by_key(|d| d.index);
    }
    Ok(response.data.into_iter().map(|d| d.embedding).collect())
}

impl IEmbeddingProvider for ApiEmbeddingProvider {
    fn embed(&self, text: &str) -> LoreResult<Vec<f32>> {
        let mut out = self.request(&[text.to_string()])?;
        out.pop().ok_or_else(|| {
            ProviderError::InvalidResponse {
                reason: "empty embedding response".to_string(),
            }
            .into()
        })
    }

    fn embed_batch(&self, texts: &[String]) -> LoreResult<Vec<Vec<f32>>> {
        if texts.is_empty() {
            return Ok(Vec::new());
        }
        self.request(texts)
    }

    fn dimensions(&self) -> usize {
        self.dimensions
    }

    fn name(&self) -> &str {
        self.client.name()
    }

    fn is_available(&self) -> bool {
        self.client.is_available()
    }
}

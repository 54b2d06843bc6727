//! OpenAI-compatible `/chat/completions` provider.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use lore_core::config::ProviderConfig;
use lore_core::errors::{LoreResult, ProviderError};
use lore_core::traits::{CompletionOptions, ICompletionProvider};

use super::client::JsonClient;

#[derive(Debug, Serialize)]
pub(crate) struct ChatRequest<'a> {
    pub model: &'a str,
    pub messages: Vec<ChatMessage<'a>>,
    pub max_tokens: u32,
    pub temperature: f32,
}

#[derive(Debug, Serialize)]
pub(crate) struct ChatMessage<'a> {
    pub role: &'a str,
    pub content: &'a str,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ChatResponse {
    pub choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ChatChoice {
    pub message: ChatReply,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ChatReply {
    #[serde(default)]
    pub content: Option<String>,
}

impl ChatResponse {
    pub(crate) fn into_text(self) -> LoreResult<String> {
        self.choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .ok_or_else(|| {
                ProviderError::InvalidResponse {
                    reason: "completion response had no content".to_string(),
                }
                .into()
            })
    }
}

pub struct ApiCompletionProvider {
    client: JsonClient,
    model: String,
}

impl ApiCompletionProvider {
    pub fn new(
        endpoint: &str,
        model: &str,
        api_key: Option<String>,
        config: &ProviderConfig,
    ) -> LoreResult<Self> {
        let client = JsonClient::new(
            "api-completion",
            endpoint,
            api_key,
            Duration::from_millis(config.request_timeout_ms),
            config.retry.clone(),
            Duration::from_millis(config.unavailable_cooldown_ms),
        )?;
        Ok(Self {
            client,
            model: model.to_string(),
        })
    }

    /// Returns `None` when no completion endpoint is configured.
    pub fn from_config(config: &ProviderConfig) -> LoreResult<Option<Self>> {
        let Some(endpoint) = config.completion_endpoint.as_deref() else {
            return Ok(None);
        };
        let key = std::env::var(&config.api_key_env).ok();
        Self::new(endpoint, &config.completion_model, key, config).map(Some)
    }

    pub fn reset_availability(&self) {
        self.client.reset_availability();
    }
}

impl ICompletionProvider for ApiCompletionProvider {
    fn complete(&self, prompt: &str, options: &CompletionOptions) -> LoreResult<String> {
        let request = ChatRequest {
            model: &self.model,
            messages: vec![ChatMessage {
                role: "user",
                content: prompt,
            }],
            max_tokens: options.max_tokens,
            temperature: options.temperature,
        };
        let response: ChatResponse = self.client.post(&request)?;
        response.into_text()
    }

    fn name(&self) -> &str {
        self.client.name()
    }

    fn is_available(&self) -> bool {
        self.client.is_available()
    }
}

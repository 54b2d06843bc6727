use serde::{Deserialize, Serialize};

use crate::errors::LoreResult;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompletionOptions {
    pub max_tokens: u32,
    pub temperature: f32,
}

impl Default for CompletionOptions {
    fn default() -> Self {
        Self {
            max_tokens: 256,
            temperature: 0.7,
        }
    }
}

/// Text completion (chat) provider.
pub trait ICompletionProvider: Send + Sync {
    fn complete(&self, prompt: &str, options: &CompletionOptions) -> LoreResult<String>;

    fn name(&self) -> &str;

    fn is_available(&self) -> bool;
}

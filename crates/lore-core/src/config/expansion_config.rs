use serde::{Deserialize, Serialize};

use super::defaults;

/// Query variation expander configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExpansionConfig {
    /// When false the expander returns only the literal query.
    pub enabled: bool,
    pub max_variations: usize,
    /// Weight applied to every non-literal variation.
    pub paraphrase_discount: f64,
    /// Prefer the completion provider when one is configured.
    pub use_llm: bool,
    pub budget_ms: u64,
    pub temperature: f32,
    pub max_tokens: u32,
}

impl Default for ExpansionConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            max_variations: defaults::DEFAULT_MAX_VARIATIONS,
            paraphrase_discount: defaults::DEFAULT_PARAPHRASE_DISCOUNT,
            use_llm: true,
            budget_ms: defaults::DEFAULT_EXPANSION_BUDGET_MS,
            temperature: defaults::DEFAULT_PARAPHRASE_TEMPERATURE,
            max_tokens: defaults::DEFAULT_PARAPHRASE_MAX_TOKENS,
        }
    }
}

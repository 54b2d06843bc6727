//! Query variation expansion.
//!
//! The literal query always comes first with weight 1.0; paraphrases follow
//! with the configured discount. A failing or empty primary paraphraser falls
//! back to templates.

mod llm;
mod template;

pub use llm::LlmParaphraser;
pub use template::TemplateParaphraser;

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use lore_core::config::ExpansionConfig;
use lore_core::constants::LITERAL_QUERY_WEIGHT;
use lore_core::traits::{ICompletionProvider, IParaphraser, ParaphraseContext};

/// One query string sent to the vector substrate, with its score weight.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QueryVariation {
    pub text: String,
    pub weight: f64,
}

impl QueryVariation {
    pub fn literal(text: &str) -> Self {
        Self {
            text: text.to_string(),
            weight: LITERAL_QUERY_WEIGHT,
        }
    }
}

/// Produces the literal query plus paraphrased variations.
pub struct QueryExpander {
    primary: Option<Arc<dyn IParaphraser>>,
    fallback: TemplateParaphraser,
    config: ExpansionConfig,
}

impl QueryExpander {
    /// Use the completion provider when one is given and `use_llm` is set,
    /// templates otherwise.
    pub fn new(config: ExpansionConfig, completion: Option<Arc<dyn ICompletionProvider>>) -> Self {
        let primary = completion
            .filter(|_| config.use_llm)
            .map(|p| Arc::new(LlmParaphraser::new(p, &config)) as Arc<dyn IParaphraser>);
        Self {
            primary,
            fallback: TemplateParaphraser,
            config,
        }
    }

    pub fn with_paraphraser(config: ExpansionConfig, paraphraser: Arc<dyn IParaphraser>) -> Self {
        Self {
            primary: Some(paraphraser),
            fallback: TemplateParaphraser,
            config,
        }
    }

    pub fn template_only(config: ExpansionConfig) -> Self {
        Self::new(config, None)
    }

    pub fn paraphraser_name(&self) -> &str {
        self.primary
            .as_ref()
            .map(|p| p.name())
            .unwrap_or_else(|| self.fallback.name())
    }

    /// `[literal, ...variations]`, at most `max_variations + 1` entries.
    pub fn expand(&self, query: &str, context: &ParaphraseContext) -> Vec<QueryVariation> {
        let mut out = vec![QueryVariation::literal(query)];
        let max = self.config.max_variations;
        if !self.config.enabled || max == 0 || query.trim().is_empty() {
            return out;
        }

        let variations = match &self.primary {
            Some(primary) => match primary.paraphrase(query, context, max) {
                Ok(v) if !v.is_empty() => v,
                Ok(_) => {
                    debug!(paraphraser = primary.name(), "no usable paraphrase, using templates");
                    self.fallback.variations(query, max)
                }
                Err(e) => {
                    warn!(paraphraser = primary.name(), error = %e, "paraphrasing failed, using templates");
                    self.fallback.variations(query, max)
                }
            },
            None => self.fallback.variations(query, max),
        };

        let literal = query.trim();
        for text in variations {
            let text = text.trim().to_string();
            let duplicate = text.is_empty()
                || text.eq_ignore_ascii_case(literal)
                || out.iter().any(|v| v.text.eq_ignore_ascii_case(&text));
            if duplicate {
                continue;
            }
            out.push(QueryVariation {
                text,
                weight: self.config.paraphrase_discount,
            });
            if out.len() > max {
                break;
            }
        }
        debug!(count = out.len() - 1, "query expanded");
        out
    }
}

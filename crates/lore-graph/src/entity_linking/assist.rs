//! Completion-backed entity resolution.

use std::sync::Arc;

use lore_core::errors::LoreResult;
use lore_core::traits::{CompletionOptions, ICompletionProvider, IEntityAssist};

const ASSIST_MAX_TOKENS: u32 = 120;

/// Asks the completion provider for the canonical names behind the mentions.
pub struct LlmEntityAssist {
    provider: Arc<dyn ICompletionProvider>,
    options: CompletionOptions,
}

impl LlmEntityAssist {
    pub fn new(provider: Arc<dyn ICompletionProvider>) -> Self {
        Self {
            provider,
            options: CompletionOptions {
                max_tokens: ASSIST_MAX_TOKENS,
                temperature: 0.0,
            },
        }
    }

    fn prompt(query: &str, mentions: &[String]) -> String {
        let listed = if mentions.is_empty() {
            "(none detected)".to_string()
        } else {
            mentions.join(", ")
        };
        format!(
            "A listener asked about a wellness podcast: \"{query}\"\n\
             Detected mentions: {listed}\n\
             List the full canonical names of the people, practices, or concepts being referred to, \
             one per line, with no commentary. Answer NONE if there are none."
        )
    }

    pub(crate) fn parse(response: &str) -> Vec<String> {
        let mut out: Vec<String> = Vec::new();
        for line in response.lines() {
            let name = line
                .trim()
                .trim_start_matches(['-', '*', '•'])
                .trim_start_matches(|c: char| c.is_ascii_digit())
                .trim_start_matches(['.', ')'])
                .trim()
                .trim_matches(['"', '\''])
                .trim();
            if name.is_empty() || name.eq_ignore_ascii_case("none") {
                continue;
            }
            if !out.iter().any(|o| o.eq_ignore_ascii_case(name)) {
                out.push(name.to_string());
            }
        }
        out
    }
}

impl IEntityAssist for LlmEntityAssist {
    fn suggest(&self, query: &str, mentions: &[String]) -> LoreResult<Vec<String>> {
        let response = self
            .provider
            .complete(&Self::prompt(query, mentions), &self.options)?;
        Ok(Self::parse(&response))
    }
}

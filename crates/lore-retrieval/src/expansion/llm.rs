//! Completion-provider paraphrasing under a time budget.

use std::sync::Arc;
use std::time::Duration;

use tracing::debug;

use lore_core::config::ExpansionConfig;
use lore_core::deadline;
use lore_core::errors::LoreResult;
use lore_core::models::QueryFamily;
use lore_core::traits::{
    Complexity, CompletionOptions, ICompletionProvider, IParaphraser, ParaphraseContext,
};

pub struct LlmParaphraser {
    provider: Arc<dyn ICompletionProvider>,
    options: CompletionOptions,
    budget: Duration,
}

impl LlmParaphraser {
    pub fn new(provider: Arc<dyn ICompletionProvider>, config: &ExpansionConfig) -> Self {
        Self {
            provider,
            options: CompletionOptions {
                max_tokens: config.max_tokens,
                temperature: config.temperature,
            },
            budget: Duration::from_millis(config.budget_ms),
        }
    }

    fn family_guidance(family: QueryFamily) -> &'static str {
        match family {
            QueryFamily::EntityCentric => {
                "Keep every person or entity name exactly as written and vary how the question asks about them."
            }
            QueryFamily::Relationship => {
                "Keep both concepts and vary the words describing how they are connected."
            }
            QueryFamily::Definitional => {
                "Ask for the meaning, the definition, or an explanation of the concept."
            }
            QueryFamily::General => "Use different wording and closely related terms.",
        }
    }

    fn complexity_guidance(complexity: Complexity) -> &'static str {
        match complexity {
            Complexity::Simple => "The question is short; you may add one clarifying word.",
            Complexity::Moderate => "Keep roughly the same length.",
            Complexity::Complex => "Rewrite it as a shorter, more focused question.",
        }
    }

    pub(crate) fn prompt(query: &str, context: &ParaphraseContext, max: usize) -> String {
        let complexity = Complexity::of(query);
        format!(
            "Rewrite the search question below in {max} different ways for searching podcast transcripts.\n\
             Question type: {family}. Complexity: {level}.\n\
             {family_hint}\n\
             {complexity_hint}\n\
             Return one rewrite per line with no numbering or commentary.\n\n\
             Question: {query}",
            family = context.family.as_str(),
            level = complexity.as_str(),
            family_hint = Self::family_guidance(context.family),
            complexity_hint = Self::complexity_guidance(complexity),
        )
    }

    /// Strip list markers and surrounding quotes from one response line.
    pub(crate) fn clean_line(line: &str) -> String {
        let mut s = line.trim();
        s = s.trim_start_matches(['-', '*', '•']).trim_start();
        let digits = s.chars().take_while(char::is_ascii_digit).count();
        if digits > 0 {
            let after = &s[digits..];
            if let Some(rest) = after.strip_prefix(['.', ')', ':']) {
                s = rest.trim_start();
            }
        }
        s.trim_matches(['"', '\'', '“', '”', '`']).trim().to_string()
    }

    /// Usable variations from a raw completion, deduplicated and capped.
    pub(crate) fn parse_response(query: &str, response: &str, max: usize) -> Vec<String> {
        let literal = query.trim();
        let mut out: Vec<String> = Vec::new();
        for line in response.lines() {
            let candidate = Self::clean_line(line);
            if candidate.is_empty()
                || candidate.eq_ignore_ascii_case(literal)
                || out.iter().any(|o| o.eq_ignore_ascii_case(&candidate))
            {
                continue;
            }
            out.push(candidate);
            if out.len() == max {
                break;
            }
        }
        out
    }
}

impl IParaphraser for LlmParaphraser {
    fn paraphrase(
        &self,
        query: &str,
        context: &ParaphraseContext,
        max: usize,
    ) -> LoreResult<Vec<String>> {
        if max == 0 || query.trim().is_empty() {
            return Ok(Vec::new());
        }
        let prompt = Self::prompt(query, context, max);
        let provider = Arc::clone(&self.provider);
        let options = self.options.clone();
        let response = deadline::run("paraphrase", self.budget, move || {
            provider.complete(&prompt, &options)
        })?;
        let variations = Self::parse_response(query, &response, max);
        debug!(
            provider = self.provider.name(),
            count = variations.len(),
            "llm paraphrases"
        );
        Ok(variations)
    }

    fn name(&self) -> &str {
        "llm"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clean_line_strips_markers_and_quotes() {
        assert_eq!(LlmParaphraser::clean_line("1. \"how is dopamine defined\""), "how is dopamine defined");
        assert_eq!(LlmParaphraser::clean_line("  - tell me about dopamine"), "tell me about dopamine");
        assert_eq!(LlmParaphraser::clean_line("2) 'explain dopamine'"), "explain dopamine");
        assert_eq!(LlmParaphraser::clean_line("• what is dopamine for"), "what is dopamine for");
        assert_eq!(LlmParaphraser::clean_line("10 minute routines"), "10 minute routines");
    }

    #[test]
    fn parse_drops_literal_duplicates_and_blanks() {
        let response = "1. What is dopamine?\n\n2. How is dopamine defined\n3. how is dopamine defined\n4. Explain dopamine\n5. Dopamine meaning";
        let v = LlmParaphraser::parse_response("What is dopamine?", response, 3);
        assert_eq!(
            v,
            vec![
                "How is dopamine defined".to_string(),
                "Explain dopamine".to_string(),
                "Dopamine meaning".to_string(),
            ]
        );
    }

    #[test]
    fn prompt_mentions_family_and_complexity() {
        let ctx = ParaphraseContext {
            family: QueryFamily::Relationship,
        };
        let p = LlmParaphraser::prompt("how does stress affect sleep", &ctx, 3);
        assert!(p.contains("relationship"));
        assert!(p.contains("simple"));
        assert!(p.contains("3 different ways"));
        assert!(p.ends_with("Question: how does stress affect sleep"));
    }
}

//! Deterministic prefix-pattern paraphrasing with a small synonym table.

use lore_core::errors::LoreResult;
use lore_core::traits::{IParaphraser, ParaphraseContext};

/// Question openers and the rephrasings they expand to. `{}` is the rest of
/// the query after the opener.
const PATTERNS: &[(&str, &[&str])] = &[
    ("what is ", &["how is {} defined", "tell me about {}", "explain {}"]),
    ("what are ", &["how are {} defined", "tell me about {}", "explain {}"]),
    (
        "who is ",
        &["tell me about {}", "what is {} known for", "background of {}"],
    ),
    (
        "how does ",
        &["explain how {}", "in what way does {}", "what is the mechanism by which {}"],
    ),
    (
        "why ",
        &["what is the reason {}", "what explains why {}", "reasons why {}"],
    ),
    (
        "how to ",
        &["ways to {}", "best practices to {}", "tips to {}"],
    ),
    (
        "how can i ",
        &["ways to {}", "how to {}", "tips to {}"],
    ),
];

/// "how does X work" reads better without the trailing verb.
const HOW_WORKS: &[&str] = &["explain how {} works", "what is the mechanism of {}", "how {} works"];

const SYNONYMS: &[(&str, &[&str])] = &[
    ("improve", &["enhance", "boost"]),
    ("increase", &["raise", "boost"]),
    ("reduce", &["lower", "decrease"]),
    ("sleep", &["rest"]),
    ("focus", &["concentration", "attention"]),
    ("stress", &["anxiety", "pressure"]),
    ("benefits", &["advantages", "effects"]),
    ("exercise", &["workout", "training"]),
    ("habit", &["routine"]),
    ("habits", &["routines"]),
    ("meditation", &["mindfulness"]),
    ("motivation", &["drive"]),
    ("happiness", &["wellbeing"]),
    ("tips", &["advice", "strategies"]),
];

/// Always-available fallback paraphraser.
#[derive(Debug, Clone, Copy, Default)]
pub struct TemplateParaphraser;

impl TemplateParaphraser {
    pub fn new() -> Self {
        Self
    }

    /// Case-insensitive prefix split; `None` if `query` does not start with it.
    fn strip_opener<'a>(query: &'a str, opener: &str) -> Option<&'a str> {
        let head = query.get(..opener.len())?;
        if !head.eq_ignore_ascii_case(opener) {
            return None;
        }
        let rest = query[opener.len()..].trim();
        (!rest.is_empty()).then_some(rest)
    }

    fn fill(templates: &[&str], rest: &str) -> Vec<String> {
        templates.iter().map(|t| t.replace("{}", rest)).collect()
    }

    fn from_patterns(query: &str) -> Vec<String> {
        if let Some(subject) =
            Self::strip_opener(query, "how does ").and_then(|r| r.strip_suffix(" work"))
        {
            return Self::fill(HOW_WORKS, subject);
        }
        PATTERNS
            .iter()
            .find_map(|(opener, templates)| {
                Self::strip_opener(query, opener).map(|rest| Self::fill(templates, rest))
            })
            .unwrap_or_default()
    }

    /// One variation per synonym of the first word that has any.
    fn from_synonyms(query: &str) -> Vec<String> {
        let words: Vec<&str> = query.split_whitespace().collect();
        for (i, word) in words.iter().enumerate() {
            let lower = word.to_lowercase();
            let Some((_, alternatives)) = SYNONYMS.iter().find(|(w, _)| *w == lower) else {
                continue;
            };
            return alternatives
                .iter()
                .map(|alt| {
                    let mut swapped = words.clone();
                    swapped[i] = alt;
                    swapped.join(" ")
                })
                .collect();
        }
        Vec::new()
    }

    /// Variations of `query`, excluding the query itself.
    pub fn variations(&self, query: &str, max: usize) -> Vec<String> {
        let cleaned = query.trim().trim_end_matches(['?', '.', '!']).trim();
        if cleaned.is_empty() || max == 0 {
            return Vec::new();
        }
        let mut out: Vec<String> = Vec::new();
        for candidate in Self::from_patterns(cleaned)
            .into_iter()
            .chain(Self::from_synonyms(cleaned))
        {
            let duplicate = candidate.eq_ignore_ascii_case(cleaned)
                || out.iter().any(|o| o.eq_ignore_ascii_case(&candidate));
            if !duplicate {
                out.push(candidate);
            }
            if out.len() == max {
                break;
            }
        }
        out
    }
}

impl IParaphraser for TemplateParaphraser {
    fn paraphrase(
        &self,
        query: &str,
        _context: &ParaphraseContext,
        max: usize,
    ) -> LoreResult<Vec<String>> {
        Ok(self.variations(query, max))
    }

    fn name(&self) -> &str {
        "template"
    }
}

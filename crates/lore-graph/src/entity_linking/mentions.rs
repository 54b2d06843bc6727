//! Candidate entity mentions in a free-text query.

use std::sync::LazyLock;

use regex::Regex;

use lore_core::text;

static QUOTED: LazyLock<Option<Regex>> =
    LazyLock::new(|| Regex::new(r#"["“]([^"”]{2,})["”]"#).ok());

/// Two or more consecutive capitalized words.
static CAPITALIZED_RUN: LazyLock<Option<Regex>> =
    LazyLock::new(|| Regex::new(r"\b[A-Z][\w'’-]*(?:\s+[A-Z][\w'’-]*)+").ok());

static CAPITALIZED: LazyLock<Option<Regex>> =
    LazyLock::new(|| Regex::new(r"\b[A-Z][\w'’-]+").ok());

fn strip_possessive(s: &str) -> &str {
    s.strip_suffix("'s")
        .or_else(|| s.strip_suffix("’s"))
        .unwrap_or(s)
}

fn push_unique(out: &mut Vec<String>, mention: &str) {
    let mention = mention.trim();
    if !mention.is_empty() && !out.iter().any(|m| m.eq_ignore_ascii_case(mention)) {
        out.push(mention.to_string());
    }
}

/// Quoted phrases, then multi-word capitalized names, then single
/// capitalized non-stopword tokens not already covered.
pub fn extract_mentions(query: &str) -> Vec<String> {
    let mut out: Vec<String> = Vec::new();

    if let Some(re) = QUOTED.as_ref() {
        for cap in re.captures_iter(query) {
            if let Some(m) = cap.get(1) {
                push_unique(&mut out, m.as_str());
            }
        }
    }

    if let Some(re) = CAPITALIZED_RUN.as_ref() {
        for m in re.find_iter(query) {
            let words: Vec<&str> = m
                .as_str()
                .split_whitespace()
                .map(strip_possessive)
                .skip_while(|w| text::is_stopword(w))
                .collect();
            if words.len() >= 2 {
                push_unique(&mut out, &words.join(" "));
            }
        }
    }

    if let Some(re) = CAPITALIZED.as_ref() {
        for m in re.find_iter(query) {
            let token = strip_possessive(m.as_str());
            if token.chars().count() < 2 || text::is_stopword(token) {
                continue;
            }
            let covered = out.iter().any(|existing| text::contains_ci(existing, token));
            if !covered {
                push_unique(&mut out, token);
            }
        }
    }
    out
}

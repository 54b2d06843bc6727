//! Text normalization, hashing, and keyword extraction shared by the cache,
//! fusion, and graph search.

use crate::constants::{FINGERPRINT_HEX_LEN, FINGERPRINT_PREFIX_CHARS, MIN_KEYWORD_LEN};

/// Words ignored when extracting search keywords.
pub const STOPWORDS: &[&str] = &[
    "a", "about", "across", "after", "all", "also", "am", "an", "and", "any", "are", "as", "at",
    "be", "been", "being", "but", "by", "can", "could", "did", "do", "does", "doing", "for",
    "from", "had", "has", "have", "having", "he", "her", "him", "his", "how", "i", "if", "in",
    "into", "is", "it", "its", "me", "mention", "mentioned", "more", "most", "my", "no", "not",
    "of", "on", "or", "our", "say", "said", "says", "she", "should", "so", "some", "talk",
    "talked", "tell", "than", "that", "the", "their", "them", "then", "there", "these", "they",
    "this", "those", "to", "was", "we", "were", "what", "when", "where", "which", "who", "whom",
    "why", "will", "with", "would", "you", "your",
];

pub fn is_stopword(word: &str) -> bool {
    STOPWORDS.contains(&word.to_lowercase().as_str())
}

/// Lower-case, collapse whitespace runs, trim.
pub fn normalize(text: &str) -> String {
    text.split_whitespace()
        .map(str::to_lowercase)
        .collect::<Vec<_>>()
        .join(" ")
}

/// Lower-case and collapse every run of non-alphanumerics into one `_`.
pub fn slugify(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut pending_sep = false;
    for c in text.chars() {
        if c.is_alphanumeric() {
            if pending_sep && !out.is_empty() {
                out.push('_');
            }
            pending_sep = false;
            out.extend(c.to_lowercase());
        } else {
            pending_sep = true;
        }
    }
    out
}

/// Semantic cache key: blake3 of the lower-cased, trimmed text.
pub fn cache_key(text: &str) -> String {
    blake3::hash(text.trim().to_lowercase().as_bytes())
        .to_hex()
        .to_string()
}

/// Dedup key for retrieval results: hash of the first
/// [`FINGERPRINT_PREFIX_CHARS`] normalized characters.
pub fn fingerprint(text: &str) -> String {
    let prefix: String = normalize(text)
        .chars()
        .take(FINGERPRINT_PREFIX_CHARS)
        .collect();
    let hex = blake3::hash(prefix.as_bytes()).to_hex();
    hex[..FINGERPRINT_HEX_LEN].to_string()
}

/// Stopword-filtered, de-duplicated lower-case keywords in query order.
pub fn extract_keywords(query: &str) -> Vec<String> {
    let mut keywords: Vec<String> = Vec::new();
    for token in query.split(|c: char| !(c.is_alphanumeric() || c == '\'')) {
        let token = token.trim_matches('\'').to_lowercase();
        let token = token.strip_suffix("'s").unwrap_or(&token).to_string();
        if token.chars().count() < MIN_KEYWORD_LEN || is_stopword(&token) {
            continue;
        }
        if !keywords.contains(&token) {
            keywords.push(token);
        }
    }
    keywords
}

pub fn word_count(text: &str) -> usize {
    text.split_whitespace().count()
}

/// Case-insensitive containment.
pub fn contains_ci(haystack: &str, needle: &str) -> bool {
    !needle.is_empty() && haystack.to_lowercase().contains(&needle.to_lowercase())
}

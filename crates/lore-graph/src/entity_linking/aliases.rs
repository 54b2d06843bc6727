//! Nickname → canonical name table.

use std::collections::BTreeMap;

/// Built-in aliases for recurring guests and practices.
const BUILTIN: &[(&str, &str)] = &[
    ("huberman", "Andrew Huberman"),
    ("dr huberman", "Andrew Huberman"),
    ("andy huberman", "Andrew Huberman"),
    ("lembke", "Anna Lembke"),
    ("dr lembke", "Anna Lembke"),
    ("spiegel", "David Spiegel"),
    ("dr spiegel", "David Spiegel"),
    ("soeberg", "Susanna Soeberg"),
    ("cold plunge", "Cold Exposure"),
    ("ice bath", "Cold Exposure"),
    ("cold water", "Cold Exposure"),
    ("physiological sigh", "Breathwork"),
    ("sunlight viewing", "Morning Sunlight"),
    ("body clock", "Circadian Rhythm"),
    ("nsdr", "Non-Sleep Deep Rest"),
];

/// Case-insensitive alias lookup. Keys are stored lower-cased with honorific
/// dots removed.
#[derive(Debug, Clone, PartialEq)]
pub struct AliasTable {
    entries: BTreeMap<String, String>,
}

impl AliasTable {
    fn key(alias: &str) -> String {
        alias
            .trim()
            .to_lowercase()
            .replace('.', "")
            .split_whitespace()
            .collect::<Vec<_>>()
            .join(" ")
    }

    pub fn empty() -> Self {
        Self {
            entries: BTreeMap::new(),
        }
    }

    /// Built-ins overlaid with `extra` (extra wins).
    pub fn with_defaults(extra: &BTreeMap<String, String>) -> Self {
        let mut table = Self::empty();
        for (alias, canonical) in BUILTIN {
            table.insert(alias, canonical);
        }
        for (alias, canonical) in extra {
            table.insert(alias, canonical);
        }
        table
    }

    pub fn insert(&mut self, alias: &str, canonical: &str) {
        let key = Self::key(alias);
        if !key.is_empty() && !canonical.trim().is_empty() {
            self.entries.insert(key, canonical.trim().to_string());
        }
    }

    pub fn resolve(&self, mention: &str) -> Option<&str> {
        self.entries.get(&Self::key(mention)).map(String::as_str)
    }

    /// Canonical names of every alias that appears as a phrase in `query`.
    pub fn scan(&self, query: &str) -> Vec<&str> {
        let cleaned: String = query
            .chars()
            .map(|c| if c.is_alphanumeric() || c == '.' { c } else { ' ' })
            .collect();
        let haystack = format!(" {} ", Self::key(&cleaned));
        let mut out: Vec<&str> = Vec::new();
        for (alias, canonical) in &self.entries {
            if haystack.contains(&format!(" {alias} ")) && !out.contains(&canonical.as_str()) {
                out.push(canonical);
            }
        }
        out
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Default for AliasTable {
    fn default() -> Self {
        Self::with_defaults(&BTreeMap::new())
    }
}

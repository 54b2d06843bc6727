use std::fmt;

use serde::{Deserialize, Serialize};

/// Which substrate produced a result.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RetrievalSource {
    Vector,
    Graph,
}

impl fmt::Display for RetrievalSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Vector => f.write_str("vector"),
            Self::Graph => f.write_str("graph"),
        }
    }
}

/// Provenance carried alongside a result for answer synthesis.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ResultMetadata {
    pub chunk_id: Option<String>,
    pub node_id: Option<String>,
    pub speaker: Option<String>,
    pub title: Option<String>,
    pub timestamp_secs: Option<f64>,
    /// The query variation that produced the best vector hit.
    pub matched_variation: Option<String>,
}

impl ResultMetadata {
    /// Fill empty fields from `other`.
    pub fn absorb(&mut self, other: &ResultMetadata) {
        fn fill<T: Clone>(slot: &mut Option<T>, from: &Option<T>) {
            if slot.is_none() {
                slot.clone_from(from);
            }
        }
        fill(&mut self.chunk_id, &other.chunk_id);
        fill(&mut self.node_id, &other.node_id);
        fill(&mut self.speaker, &other.speaker);
        fill(&mut self.title, &other.title);
        fill(&mut self.timestamp_secs, &other.timestamp_secs);
        fill(&mut self.matched_variation, &other.matched_variation);
    }
}

/// A ranked, source-tagged record produced for one query.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RetrievalResult {
    pub text: String,
    /// Hash of the normalized text prefix; the fusion/dedup key.
    pub fingerprint: String,
    /// Document used for diversification.
    pub source_document: String,
    /// Sorted, unique.
    pub sources: Vec<RetrievalSource>,
    /// Fused score: sum of weighted per-substrate scores.
    pub score: f64,
    pub vector_score: Option<f64>,
    pub graph_score: Option<f64>,
    pub metadata: ResultMetadata,
}

impl RetrievalResult {
    pub fn has_source(&self, source: RetrievalSource) -> bool {
        self.sources.contains(&source)
    }
}

/// Coarse question family driving substrate weights and paraphrase prompts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum QueryFamily {
    /// "who is X", "what did X say"
    EntityCentric,
    /// "how does X relate to Y"
    Relationship,
    /// "what is X", "define X"
    Definitional,
    #[default]
    General,
}

impl QueryFamily {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::EntityCentric => "entity_centric",
            Self::Relationship => "relationship",
            Self::Definitional => "definitional",
            Self::General => "general",
        }
    }

    /// Parse a caller-supplied hint. Unknown hints are ignored by callers.
    pub fn parse(hint: &str) -> Option<Self> {
        match hint.trim().to_lowercase().replace([' ', '-'], "_").as_str() {
            "entity" | "entity_centric" | "person" => Some(Self::EntityCentric),
            "relationship" | "relation" | "relational" => Some(Self::Relationship),
            "definition" | "definitional" | "factual" => Some(Self::Definitional),
            "general" => Some(Self::General),
            _ => None,
        }
    }
}

impl fmt::Display for QueryFamily {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

use std::collections::BTreeSet;
use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::errors::{LoreError, LoreResult};

/// Directed relationship types between concepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RelationshipType {
    Causes,
    Influences,
    Optimizes,
    Enables,
    Reduces,
    LeadsTo,
    Requires,
    RelatesTo,
    IsPartOf,
    Mentions,
    Supports,
    Contradicts,
    /// Recurring co-occurrence across documents. Written only by the linker.
    CrossEpisode,
}

impl RelationshipType {
    pub const ALL: [RelationshipType; 13] = [
        Self::Causes,
        Self::Influences,
        Self::Optimizes,
        Self::Enables,
        Self::Reduces,
        Self::LeadsTo,
        Self::Requires,
        Self::RelatesTo,
        Self::IsPartOf,
        Self::Mentions,
        Self::Supports,
        Self::Contradicts,
        Self::CrossEpisode,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Causes => "CAUSES",
            Self::Influences => "INFLUENCES",
            Self::Optimizes => "OPTIMIZES",
            Self::Enables => "ENABLES",
            Self::Reduces => "REDUCES",
            Self::LeadsTo => "LEADS_TO",
            Self::Requires => "REQUIRES",
            Self::RelatesTo => "RELATES_TO",
            Self::IsPartOf => "IS_PART_OF",
            Self::Mentions => "MENTIONS",
            Self::Supports => "SUPPORTS",
            Self::Contradicts => "CONTRADICTS",
            Self::CrossEpisode => "CROSS_EPISODE",
        }
    }

    /// Parse `LEADS_TO`, `leads_to`, or `leads to`.
    pub fn parse(name: &str) -> LoreResult<Self> {
        let wanted = name.trim().replace([' ', '-'], "_").to_uppercase();
        Self::ALL
            .iter()
            .copied()
            .find(|t| t.as_str() == wanted)
            .ok_or_else(|| LoreError::InvalidRelationshipType {
                name: name.to_string(),
            })
    }

    /// Parse a caller-supplied relationship filter. Any unknown name fails the
    /// whole filter.
    pub fn parse_filter<S: AsRef<str>>(names: &[S]) -> LoreResult<Vec<Self>> {
        let mut parsed = Vec::with_capacity(names.len());
        for name in names {
            let t = Self::parse(name.as_ref())?;
            if !parsed.contains(&t) {
                parsed.push(t);
            }
        }
        Ok(parsed)
    }
}

impl fmt::Display for RelationshipType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A directed, typed edge between two concepts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RelationshipEdge {
    pub source_id: String,
    pub target_id: String,
    pub relationship: RelationshipType,
    #[serde(default)]
    pub description: String,
    /// For CROSS_EPISODE edges these are the shared episodes.
    #[serde(default)]
    pub source_document_ids: BTreeSet<String>,
    #[serde(default = "default_confidence")]
    pub confidence: f64,
    /// Set on CROSS_EPISODE edges only.
    #[serde(default)]
    pub co_occurrence_count: Option<usize>,
    #[serde(default = "Utc::now")]
    pub updated_at: DateTime<Utc>,
}

fn default_confidence() -> f64 {
    1.0
}

impl RelationshipEdge {
    pub fn new(source_id: &str, target_id: &str, relationship: RelationshipType) -> Self {
        Self {
            source_id: source_id.to_string(),
            target_id: target_id.to_string(),
            relationship,
            description: String::new(),
            source_document_ids: BTreeSet::new(),
            confidence: default_confidence(),
            co_occurrence_count: None,
            updated_at: Utc::now(),
        }
    }

    pub fn with_description(mut self, description: &str) -> Self {
        self.description = description.to_string();
        self
    }

    pub fn with_documents<I, S>(mut self, documents: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.source_document_ids
            .extend(documents.into_iter().map(Into::into));
        self
    }

    pub fn with_confidence(mut self, confidence: f64) -> Self {
        self.confidence = confidence;
        self
    }
}

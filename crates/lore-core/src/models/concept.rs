use std::collections::BTreeSet;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::errors::{LoreError, LoreResult};
use crate::text;

/// The node labels produced by the extraction pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum ConceptType {
    Concept,
    Practice,
    CognitiveState,
    BehavioralPattern,
    Principle,
    Outcome,
    Causality,
    Person,
    Place,
    Organization,
    Event,
}

impl ConceptType {
    pub const ALL: [ConceptType; 11] = [
        Self::Concept,
        Self::Practice,
        Self::CognitiveState,
        Self::BehavioralPattern,
        Self::Principle,
        Self::Outcome,
        Self::Causality,
        Self::Person,
        Self::Place,
        Self::Organization,
        Self::Event,
    ];

    /// Graph label for this type.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Concept => "Concept",
            Self::Practice => "Practice",
            Self::CognitiveState => "CognitiveState",
            Self::BehavioralPattern => "BehavioralPattern",
            Self::Principle => "Principle",
            Self::Outcome => "Outcome",
            Self::Causality => "Causality",
            Self::Person => "Person",
            Self::Place => "Place",
            Self::Organization => "Organization",
            Self::Event => "Event",
        }
    }

    /// Parse a label, case-insensitively and ignoring `_`/spaces.
    pub fn parse(name: &str) -> LoreResult<Self> {
        let wanted: String = name
            .chars()
            .filter(|c| c.is_alphanumeric())
            .collect::<String>()
            .to_lowercase();
        Self::ALL
            .iter()
            .copied()
            .find(|t| t.as_str().to_lowercase() == wanted)
            .ok_or_else(|| LoreError::ConfigError(format!("unknown concept type: {name}")))
    }

    /// Whether nodes of this type name a real-world entity (person, place, org).
    pub fn is_named_entity(&self) -> bool {
        matches!(self, Self::Person | Self::Place | Self::Organization)
    }
}

impl fmt::Display for ConceptType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A typed entity in the knowledge graph.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConceptNode {
    /// Derived from type + normalized name; unique per workspace.
    pub id: String,
    pub name: String,
    pub concept_type: ConceptType,
    #[serde(default)]
    pub description: String,
    /// Documents (episodes) this concept was extracted from. Only ever grows.
    #[serde(default)]
    pub source_document_ids: BTreeSet<String>,
    #[serde(default)]
    pub speakers: BTreeSet<String>,
    #[serde(default = "default_confidence")]
    pub confidence: f64,
}

fn default_confidence() -> f64 {
    1.0
}

impl ConceptNode {
    /// Create a node with its id derived from type and name.
    pub fn new(name: &str, concept_type: ConceptType) -> Self {
        Self {
            id: Self::derive_id(concept_type, name),
            name: name.trim().to_string(),
            concept_type,
            description: String::new(),
            source_document_ids: BTreeSet::new(),
            speakers: BTreeSet::new(),
            confidence: default_confidence(),
        }
    }

    /// `practice:morning_sunlight` style id.
    pub fn derive_id(concept_type: ConceptType, name: &str) -> String {
        let slug = text::slugify(name);
        format!("{}:{}", text::slugify(concept_type.as_str()), slug)
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

    pub fn with_speakers<I, S>(mut self, speakers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.speakers.extend(speakers.into_iter().map(Into::into));
        self
    }

    /// Number of distinct documents the concept appears in.
    pub fn episode_count(&self) -> usize {
        self.source_document_ids.len()
    }

    /// Merge a re-extracted copy of this node. Document and speaker sets are
    /// unioned; returns whether anything changed.
    pub fn merge(&mut self, other: &ConceptNode) -> bool {
        let before = (
            self.source_document_ids.len(),
            self.speakers.len(),
            self.description.clone(),
            self.confidence,
        );
        self.source_document_ids
            .extend(other.source_document_ids.iter().cloned());
        self.speakers.extend(other.speakers.iter().cloned());
        if !other.description.is_empty() {
            self.description = other.description.clone();
        }
        self.confidence = self.confidence.max(other.confidence);
        before
            != (
                self.source_document_ids.len(),
                self.speakers.len(),
                self.description.clone(),
                self.confidence,
            )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn id_is_type_scoped_slug() {
        assert_eq!(
            ConceptNode::derive_id(ConceptType::Practice, "Morning  Sunlight!"),
            "practice:morning_sunlight"
        );
        assert_eq!(
            ConceptNode::derive_id(ConceptType::CognitiveState, "Flow"),
            "cognitivestate:flow"
        );
    }

    #[test]
    fn merge_only_grows_documents() {
        let mut a = ConceptNode::new("Meditation", ConceptType::Practice).with_documents(["ep1"]);
        let b = ConceptNode::new("Meditation", ConceptType::Practice).with_documents(["ep2"]);
        assert!(a.merge(&b));
        assert_eq!(a.episode_count(), 2);
        // Merging an older copy never shrinks the set.
        let older = ConceptNode::new("Meditation", ConceptType::Practice).with_documents(["ep1"]);
        assert!(!a.merge(&older));
        assert_eq!(a.episode_count(), 2);
    }

    #[test]
    fn concept_type_parse_is_lenient() {
        assert_eq!(
            ConceptType::parse("cognitive_state").unwrap(),
            ConceptType::CognitiveState
        );
        assert_eq!(ConceptType::parse("PRACTICE").unwrap(), ConceptType::Practice);
        assert!(ConceptType::parse("widget").is_err());
    }
}

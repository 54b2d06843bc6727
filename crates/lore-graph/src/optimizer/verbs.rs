//! Verb phrases that pin a multi-hop search to one relationship type.

use lore_core::models::RelationshipType;

use super::query_type::padded_words;

/// Inflected verb forms, matched as whole words. Earlier entries win.
const VERB_TABLE: &[(&[&str], RelationshipType)] = &[
    (&["lead to", "leads to", "led to", "leading to"], RelationshipType::LeadsTo),
    (
        &[
            "optimize", "optimizes", "optimized", "optimizing", "optimise", "optimises",
            "optimised", "optimising", "improve", "improves", "improved", "improving",
        ],
        RelationshipType::Optimizes,
    ),
    (&["cause", "causes", "caused", "causing"], RelationshipType::Causes),
    (&["enable", "enables", "enabled", "enabling"], RelationshipType::Enables),
    (&["reduce", "reduces", "reduced", "reducing"], RelationshipType::Reduces),
    (&["require", "requires", "required", "requiring"], RelationshipType::Requires),
    (
        &["influence", "influences", "influenced", "influencing"],
        RelationshipType::Influences,
    ),
    (&["relate", "relates", "related", "relating"], RelationshipType::RelatesTo),
];

pub fn relationship_for(query: &str) -> Option<RelationshipType> {
    let padded = padded_words(query);
    VERB_TABLE
        .iter()
        .find(|(forms, _)| forms.iter().any(|f| padded.contains(&format!(" {f} "))))
        .map(|(_, t)| *t)
}

/// Whether a keyword is one of the verb forms above rather than a topic.
/// Nouns sharing a stem ("relationships", "reduction") are topics.
pub fn is_verb_word(word: &str) -> bool {
    let word = word.to_lowercase();
    matches!(word.as_str(), "lead" | "leads" | "led" | "leading")
        || VERB_TABLE
            .iter()
            .flat_map(|(forms, _)| forms.iter())
            .any(|f| *f == word)
}

//! Keyword/prefix classification of a query into a `QueryFamily`.

use lore_core::models::QueryFamily;
use lore_core::text;

/// Phrases that mark a question about how concepts connect.
const RELATIONSHIP_MARKERS: &[&str] = &[
    " relate",
    "relationship between",
    "connection between",
    "connected to",
    "link between",
    "linked to",
    "lead to",
    "leads to",
    " affect",
    " impact",
    " influence",
    " cause",
    "difference between",
    "compared to",
];

/// Openers of questions about a specific person or named entity.
const ENTITY_PREFIXES: &[&str] = &[
    "who is",
    "who was",
    "who are",
    "who's",
    "what did",
    "what does",
    "according to",
];

/// Words anywhere in the query that point at a speaker's statements.
const ENTITY_MARKERS: &[&str] = &[" say ", " said ", " says ", " recommend", " mention"];

const DEFINITIONAL_PREFIXES: &[&str] = &[
    "what is",
    "what are",
    "what's",
    "define",
    "definition of",
    "meaning of",
    "explain what",
];

/// Classify a query. Relationship wins over entity, entity over definitional.
pub fn classify(query: &str) -> QueryFamily {
    let q = format!(" {} ", text::normalize(query).trim_end_matches('?'));
    let trimmed = q.trim();

    if RELATIONSHIP_MARKERS.iter().any(|m| q.contains(m)) {
        return QueryFamily::Relationship;
    }
    if ENTITY_PREFIXES.iter().any(|p| trimmed.starts_with(p))
        || ENTITY_MARKERS.iter().any(|m| q.contains(m))
    {
        // "what does X mean" is a definition, not a speaker question.
        if trimmed.starts_with("what does") && q.contains(" mean ") {
            return QueryFamily::Definitional;
        }
        return QueryFamily::EntityCentric;
    }
    if DEFINITIONAL_PREFIXES.iter().any(|p| trimmed.starts_with(p)) {
        return QueryFamily::Definitional;
    }
    QueryFamily::General
}

/// An explicit, parseable hint wins over classification.
pub fn resolve(query: &str, hint: Option<&str>) -> QueryFamily {
    hint.and_then(QueryFamily::parse)
        .unwrap_or_else(|| classify(query))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn families() {
        assert_eq!(classify("Who is Andrew Huberman?"), QueryFamily::EntityCentric);
        assert_eq!(
            classify("What did Anna Lembke say about dopamine"),
            QueryFamily::EntityCentric
        );
        assert_eq!(
            classify("How does meditation relate to clarity?"),
            QueryFamily::Relationship
        );
        assert_eq!(
            classify("what is the relationship between stress and sleep"),
            QueryFamily::Relationship
        );
        assert_eq!(classify("What is dopamine?"), QueryFamily::Definitional);
        assert_eq!(classify("what does NSDR mean"), QueryFamily::Definitional);
        assert_eq!(classify("morning routines for focus"), QueryFamily::General);
    }

    #[test]
    fn hint_overrides_classification() {
        assert_eq!(
            resolve("what is dopamine", Some("entity")),
            QueryFamily::EntityCentric
        );
        assert_eq!(
            resolve("what is dopamine", Some("nonsense")),
            QueryFamily::Definitional
        );
        assert_eq!(resolve("what is dopamine", None), QueryFamily::Definitional);
    }
}

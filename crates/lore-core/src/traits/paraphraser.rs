use crate::errors::LoreResult;
use crate::models::QueryFamily;
use crate::text;

/// Length bucket used to condition paraphrase prompts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Complexity {
    /// Up to 5 words.
    Simple,
    /// Up to 15 words.
    Moderate,
    Complex,
}

impl Complexity {
    pub fn of(query: &str) -> Self {
        match text::word_count(query) {
            0..=5 => Self::Simple,
            6..=15 => Self::Moderate,
            _ => Self::Complex,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Simple => "simple",
            Self::Moderate => "moderate",
            Self::Complex => "complex",
        }
    }
}

/// What a paraphraser knows about the query besides its text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ParaphraseContext {
    pub family: QueryFamily,
}

/// Produces alternative phrasings of a query.
///
/// Implementations return only the variations, never the literal query.
pub trait IParaphraser: Send + Sync {
    fn paraphrase(
        &self,
        query: &str,
        context: &ParaphraseContext,
        max: usize,
    ) -> LoreResult<Vec<String>>;

    fn name(&self) -> &str;
}

use crate::errors::LoreResult;

/// Advisory entity resolution, typically backed by a completion provider.
///
/// Callers treat every failure as "no suggestions".
pub trait IEntityAssist: Send + Sync {
    /// Suggest canonical entity names for the given mentions in `query`.
    fn suggest(&self, query: &str, mentions: &[String]) -> LoreResult<Vec<String>>;
}

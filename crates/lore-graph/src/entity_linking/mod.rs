//! Entity linking: mentions → alias table → (optional) advisory LLM pass.
//!
//! Fuzzy graph lookup over the resulting candidates is done by the optimizer,
//! which owns the store.

mod aliases;
mod assist;
mod mentions;

pub use aliases::AliasTable;
pub use assist::LlmEntityAssist;
pub use mentions::extract_mentions;

use std::sync::Arc;
use std::time::Duration;

use tracing::{debug, warn};

use lore_core::deadline;
use lore_core::text;
use lore_core::traits::IEntityAssist;

/// Everything the deterministic and advisory passes found for one query.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LinkedQuery {
    /// Mentions in the query text, or its keywords when none were found.
    pub mentions: Vec<String>,
    /// Canonical names reached through the alias table.
    pub aliases: Vec<String>,
    /// Names suggested by the advisory pass.
    pub suggestions: Vec<String>,
}

impl LinkedQuery {
    /// Mentions, aliases, and suggestions, deduplicated case-insensitively.
    pub fn candidates(&self) -> Vec<String> {
        let mut out: Vec<String> = Vec::new();
        for c in self
            .mentions
            .iter()
            .chain(&self.aliases)
            .chain(&self.suggestions)
        {
            if !out.iter().any(|o| o.eq_ignore_ascii_case(c)) {
                out.push(c.clone());
            }
        }
        out
    }
}

pub struct EntityLinker {
    aliases: AliasTable,
    assist: Option<Arc<dyn IEntityAssist>>,
    assist_budget: Duration,
}

impl EntityLinker {
    pub fn new(aliases: AliasTable, assist_budget: Duration) -> Self {
        Self {
            aliases,
            assist: None,
            assist_budget,
        }
    }

    pub fn with_assist(mut self, assist: Arc<dyn IEntityAssist>) -> Self {
        self.assist = Some(assist);
        self
    }

    pub fn aliases(&self) -> &AliasTable {
        &self.aliases
    }

    pub fn link(&self, query: &str) -> LinkedQuery {
        let mut mentions = extract_mentions(query);
        if mentions.is_empty() {
            mentions = text::extract_keywords(query);
        }

        let mut aliases: Vec<String> = Vec::new();
        let resolved = mentions
            .iter()
            .filter_map(|m| self.aliases.resolve(m))
            .chain(self.aliases.scan(query));
        for canonical in resolved {
            if !aliases.iter().any(|a| a.eq_ignore_ascii_case(canonical)) {
                aliases.push(canonical.to_string());
            }
        }

        let suggestions = self.suggest(query, &mentions);
        debug!(?mentions, ?aliases, ?suggestions, "entity linking");
        LinkedQuery {
            mentions,
            aliases,
            suggestions,
        }
    }

    /// Advisory pass. Failures and overruns mean "no suggestions".
    fn suggest(&self, query: &str, mentions: &[String]) -> Vec<String> {
        let Some(assist) = &self.assist else {
            return Vec::new();
        };
        let assist = Arc::clone(assist);
        let q = query.to_string();
        let m = mentions.to_vec();
        match deadline::run("entity_assist", self.assist_budget, move || {
            assist.suggest(&q, &m)
        }) {
            Ok(names) => names
                .into_iter()
                .map(|n| n.trim().to_string())
                .filter(|n| !n.is_empty())
                .collect(),
            Err(e) => {
                warn!(error = %e, "entity assist skipped");
                Vec::new()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn aliases_join_mentions() {
        let linker = EntityLinker::new(AliasTable::default(), Duration::from_millis(100));
        let linked = linker.link("What did Huberman say about an ice bath?");
        assert_eq!(linked.mentions, vec!["Huberman".to_string()]);
        assert_eq!(
            linked.aliases,
            vec!["Andrew Huberman".to_string(), "Cold Exposure".to_string()]
        );
        assert_eq!(
            linked.candidates(),
            vec![
                "Huberman".to_string(),
                "Andrew Huberman".to_string(),
                "Cold Exposure".to_string()
            ]
        );
    }

    #[test]
    fn keywords_stand_in_for_missing_mentions() {
        let linker = EntityLinker::new(AliasTable::empty(), Duration::from_millis(100));
        let linked = linker.link("what did the guest recommend for focus");
        assert_eq!(
            linked.mentions,
            vec!["guest".to_string(), "recommend".to_string(), "focus".to_string()]
        );
        assert!(linked.aliases.is_empty());
    }
}

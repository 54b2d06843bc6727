use std::fmt;

use serde::{Deserialize, Serialize};

use lore_core::errors::{LoreError, LoreResult};

const CROSS_EPISODE_MARKERS: &[&str] = &[
    "multiple episodes",
    "across episodes",
    "several episodes",
    "many episodes",
    "different episodes",
    "recurring",
    "recur",
];

const MULTI_HOP_MARKERS: &[&str] = &[
    "lead to",
    "leads to",
    "led to",
    "relate",
    "optimiz",
    "optimis",
    "cause",
];

/// Whole words carry a trailing space; bare stems match any suffix.
const ENTITY_LINKING_MARKERS: &[&str] = &["did ", "said ", "says ", "recommend"];

/// Graph search strategy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GraphQueryType {
    EntityCentric,
    EntityLinking,
    MultiHop,
    CrossEpisode,
}

impl GraphQueryType {
    pub const ALL: [GraphQueryType; 4] = [
        Self::EntityCentric,
        Self::EntityLinking,
        Self::MultiHop,
        Self::CrossEpisode,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::EntityCentric => "entity_centric",
            Self::EntityLinking => "entity_linking",
            Self::MultiHop => "multi_hop",
            Self::CrossEpisode => "cross_episode",
        }
    }

    pub fn parse(name: &str) -> LoreResult<Self> {
        let wanted = name.trim().replace([' ', '-'], "_").to_lowercase();
        Self::ALL
            .iter()
            .copied()
            .find(|t| t.as_str() == wanted)
            .ok_or_else(|| LoreError::ConfigError(format!("unknown graph query type: {name}")))
    }

    /// Keyword detection, checked in precedence order:
    /// cross-episode, multi-hop, entity linking, entity-centric.
    pub fn detect(query: &str) -> Self {
        let padded = padded_words(query);
        let has = |markers: &[&str]| markers.iter().any(|m| padded.contains(&format!(" {m}")));
        if has(CROSS_EPISODE_MARKERS) {
            Self::CrossEpisode
        } else if has(MULTI_HOP_MARKERS) {
            Self::MultiHop
        } else if has(ENTITY_LINKING_MARKERS) {
            Self::EntityLinking
        } else {
            Self::EntityCentric
        }
    }
}

impl fmt::Display for GraphQueryType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Lower-cased words separated by single spaces, with a space at both ends.
pub(crate) fn padded_words(query: &str) -> String {
    let cleaned: String = query
        .chars()
        .map(|c| if c.is_alphanumeric() { c } else { ' ' })
        .collect();
    let words: Vec<String> = cleaned.split_whitespace().map(str::to_lowercase).collect();
    format!(" {} ", words.join(" "))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn detection_precedence() {
        assert_eq!(
            GraphQueryType::detect("Which ideas come up across episodes?"),
            GraphQueryType::CrossEpisode
        );
        assert_eq!(
            GraphQueryType::detect("What recurring themes relate to sleep?"),
            GraphQueryType::CrossEpisode
        );
        assert_eq!(
            GraphQueryType::detect("Does morning sunlight lead to better sleep?"),
            GraphQueryType::MultiHop
        );
        assert_eq!(
            GraphQueryType::detect("What did Huberman recommend?"),
            GraphQueryType::EntityLinking
        );
        assert_eq!(GraphQueryType::detect("meditation"), GraphQueryType::EntityCentric);
    }

    #[test]
    fn because_is_not_a_causal_marker() {
        assert_eq!(
            GraphQueryType::detect("sleep matters because of recovery"),
            GraphQueryType::EntityCentric
        );
    }

    #[test]
    fn parse_accepts_display_names() {
        for t in GraphQueryType::ALL {
            assert_eq!(GraphQueryType::parse(t.as_str()).unwrap(), t);
        }
        assert_eq!(
            GraphQueryType::parse("Multi-Hop").unwrap(),
            GraphQueryType::MultiHop
        );
        assert!(GraphQueryType::parse("sideways").unwrap_err().is_config());
    }
}

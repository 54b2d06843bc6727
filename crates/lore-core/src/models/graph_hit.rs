use serde::{Deserialize, Serialize};

use super::{ConceptNode, Path, RelationshipType};
use crate::constants::MIN_KEYWORD_LEN;

/// How well a node name matches a search candidate. Lower is better.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchTier {
    Exact = 1,
    Prefix = 2,
    NameContains = 3,
    CandidateContains = 4,
    DescriptionOnly = 5,
}

impl MatchTier {
    /// Tier of `name` against one candidate, comparing case-insensitively.
    /// Returns `None` when the names do not overlap.
    pub fn of_name(name: &str, candidate: &str) -> Option<MatchTier> {
        let name = name.trim().to_lowercase();
        let candidate = candidate.trim().to_lowercase();
        if name.is_empty() || candidate.is_empty() {
            return None;
        }
        if name == candidate {
            Some(Self::Exact)
        } else if name.starts_with(&candidate) {
            Some(Self::Prefix)
        } else if name.contains(&candidate) {
            Some(Self::NameContains)
        } else if name.chars().count() >= MIN_KEYWORD_LEN && candidate.contains(&name) {
            Some(Self::CandidateContains)
        } else {
            None
        }
    }

    /// Best tier of a node across several candidates, with the candidate that
    /// achieved it. Falls back to `DescriptionOnly` when only the description
    /// mentions a candidate.
    pub fn best<'a, S: AsRef<str>>(
        node: &ConceptNode,
        candidates: &'a [S],
    ) -> Option<(MatchTier, &'a str)> {
        let by_name = candidates
            .iter()
            .filter_map(|c| Self::of_name(&node.name, c.as_ref()).map(|t| (t, c.as_ref())))
            .min_by_key(|(t, _)| *t);
        if by_name.is_some() {
            return by_name;
        }
        let description = node.description.to_lowercase();
        candidates
            .iter()
            .map(AsRef::as_ref)
            .find(|c| !c.trim().is_empty() && description.contains(&c.trim().to_lowercase()))
            .map(|c| (Self::DescriptionOnly, c))
    }

    pub fn rank(&self) -> u8 {
        *self as u8
    }
}

/// Direction of a previewed relationship relative to the hit node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EdgeDirection {
    Outgoing,
    Incoming,
}

/// One-hop neighbour summary attached to graph node hits.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RelationshipPreview {
    pub relationship: RelationshipType,
    pub direction: EdgeDirection,
    pub neighbor_id: String,
    pub neighbor_name: String,
}

impl RelationshipPreview {
    /// `-[OPTIMIZES]-> Clarity` / `<-[REDUCES]- Breathwork`
    pub fn describe(&self) -> String {
        match self.direction {
            EdgeDirection::Outgoing => format!("-[{}]-> {}", self.relationship, self.neighbor_name),
            EdgeDirection::Incoming => format!("<-[{}]- {}", self.relationship, self.neighbor_name),
        }
    }
}

/// A concept matched by a graph search.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NodeHit {
    pub node: ConceptNode,
    /// `None` when the search had no terms to match (cross-episode listing).
    pub match_tier: Option<MatchTier>,
    pub matched_term: Option<String>,
    pub episode_count: usize,
    pub score: f64,
    pub preview: Vec<RelationshipPreview>,
}

/// A path matched by a multi-hop graph search.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PathHit {
    pub path: Path,
    /// The worse of the two endpoints' best tiers.
    pub endpoint_tier: MatchTier,
    /// Set when the query named a relationship but no path of that type
    /// existed, so the path was found with every relationship type allowed.
    #[serde(default)]
    pub widened: bool,
}

/// Structured row returned by the graph query optimizer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum GraphHit {
    Node(NodeHit),
    Path(PathHit),
}

impl GraphHit {
    pub fn as_node(&self) -> Option<&NodeHit> {
        match self {
            Self::Node(n) => Some(n),
            Self::Path(_) => None,
        }
    }

    pub fn as_path(&self) -> Option<&PathHit> {
        match self {
            Self::Path(p) => Some(p),
            Self::Node(_) => None,
        }
    }
}

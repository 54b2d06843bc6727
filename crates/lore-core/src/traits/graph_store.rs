//! Typed contract for the property-graph store.
//!
//! Queries are a closed set of parameterized patterns; rows come back as
//! typed records and are narrowed with the `into_*` helpers at the call site.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::errors::LoreResult;
use crate::models::{
    ConceptNode, ConceptType, Path, RelationshipEdge, RelationshipPreview, RelationshipType,
    WorkspaceId,
};

/// Read patterns understood by every graph adapter.
///
/// A node matches a term when its name contains the term, its description
/// contains the term, or the term contains its name (all case-insensitive).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "pattern", rename_all = "snake_case")]
pub enum GraphQuery {
    /// Nodes matching any term, each with a one-hop relationship preview.
    MatchNodes { terms: Vec<String>, limit: usize },
    /// Nodes appearing in at least `min_episodes` documents, most documents
    /// first. When `terms` is set, nodes must also match a term.
    MultiEpisodeNodes {
        min_episodes: usize,
        terms: Option<Vec<String>>,
        limit: usize,
    },
    /// Directed paths of 1..=`max_hops` edges from one node to another,
    /// shortest first. An empty type list allows every type.
    PathsBetween {
        source_id: String,
        target_id: String,
        max_hops: usize,
        relationship_types: Vec<RelationshipType>,
        limit: usize,
    },
    /// Directed paths whose endpoints match two different terms.
    PathsBetweenTerms {
        terms: Vec<String>,
        max_hops: usize,
        relationship_type: Option<RelationshipType>,
        limit: usize,
    },
    /// Directed paths ending at the node whose id or name equals `target`,
    /// optionally starting only at nodes of `source_type`. Shortest first.
    PathsInto {
        target: String,
        max_hops: usize,
        relationship_types: Vec<RelationshipType>,
        source_type: Option<ConceptType>,
        limit: usize,
    },
    /// Unordered node pairs that each appear in `min_episodes` documents and
    /// share at least `min_shared`. Highest shared count first, then ids.
    /// CROSS_EPISODE edges never contribute to document sets.
    CoOccurringPairs {
        min_episodes: usize,
        min_shared: usize,
        limit: usize,
    },
}

impl GraphQuery {
    pub fn pattern(&self) -> &'static str {
        match self {
            Self::MatchNodes { .. } => "match_nodes",
            Self::MultiEpisodeNodes { .. } => "multi_episode_nodes",
            Self::PathsBetween { .. } => "paths_between",
            Self::PathsBetweenTerms { .. } => "paths_between_terms",
            Self::PathsInto { .. } => "paths_into",
            Self::CoOccurringPairs { .. } => "co_occurring_pairs",
        }
    }
}

/// A node with its one-hop neighbourhood summary.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NodeRecord {
    pub node: ConceptNode,
    #[serde(default)]
    pub preview: Vec<RelationshipPreview>,
}

/// Two nodes and the documents they share.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PairRecord {
    pub first: ConceptNode,
    pub second: ConceptNode,
    pub shared_documents: BTreeSet<String>,
}

impl PairRecord {
    pub fn shared_count(&self) -> usize {
        self.shared_documents.len()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "row", rename_all = "snake_case")]
pub enum GraphRow {
    Node(NodeRecord),
    Path(Path),
    Pair(PairRecord),
}

impl GraphRow {
    pub fn into_node(self) -> Option<NodeRecord> {
        match self {
            Self::Node(n) => Some(n),
            _ => None,
        }
    }

    pub fn into_path(self) -> Option<Path> {
        match self {
            Self::Path(p) => Some(p),
            _ => None,
        }
    }

    pub fn into_pair(self) -> Option<PairRecord> {
        match self {
            Self::Pair(p) => Some(p),
            _ => None,
        }
    }

    /// Keep only node rows.
    pub fn nodes(rows: Vec<GraphRow>) -> Vec<NodeRecord> {
        rows.into_iter().filter_map(Self::into_node).collect()
    }

    pub fn paths(rows: Vec<GraphRow>) -> Vec<Path> {
        rows.into_iter().filter_map(Self::into_path).collect()
    }

    pub fn pairs(rows: Vec<GraphRow>) -> Vec<PairRecord> {
        rows.into_iter().filter_map(Self::into_pair).collect()
    }
}

/// Payload of a CROSS_EPISODE upsert.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CrossEpisodeLink {
    pub source_id: String,
    pub target_id: String,
    pub shared_episodes: BTreeSet<String>,
    pub co_occurrence_count: usize,
    pub confidence: f64,
    pub description: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum GraphWrite {
    /// Insert or merge a node (document sets are unioned).
    UpsertNode(ConceptNode),
    /// Insert or merge a typed edge. CROSS_EPISODE edges are rejected.
    UpsertEdge(RelationshipEdge),
    /// Insert a CROSS_EPISODE edge, or union its shared episodes and
    /// overwrite count and confidence.
    UpsertCrossEpisode(CrossEpisodeLink),
}

/// Per-write result, in the order the writes were submitted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WriteOutcome {
    Created,
    Updated,
    Unchanged,
    /// An edge endpoint does not exist. Nothing was written.
    MissingEndpoint,
    /// The write is not allowed through this operation.
    Rejected,
}

/// Property-graph store.
pub trait IGraphStore: Send + Sync {
    fn read(&self, workspace: &WorkspaceId, query: &GraphQuery) -> LoreResult<Vec<GraphRow>>;

    /// Apply writes as one batch. A transient error fails the whole batch.
    fn write_batch(
        &self,
        workspace: &WorkspaceId,
        writes: &[GraphWrite],
    ) -> LoreResult<Vec<WriteOutcome>>;

    fn name(&self) -> &str;
}

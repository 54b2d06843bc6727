//! Bounded directed path enumeration.
//!
//! Forward search expands level by level, so paths come out shortest first
//! and in a deterministic order (neighbours are visited by id).

use std::collections::{HashMap, HashSet};

use petgraph::stable_graph::NodeIndex;
use petgraph::Direction;
use tracing::warn;

use lore_core::models::{ConceptType, Path, RelationshipType};

use super::concept_graph::ConceptGraph;

/// Upper bound on partial paths held in one BFS level.
const MAX_FRONTIER: usize = 50_000;

/// Which edge types a traversal may follow.
///
/// An empty filter allows every type except CROSS_EPISODE, which is a
/// co-occurrence link rather than a semantic relationship.
pub struct EdgeFilter<'a>(pub &'a [RelationshipType]);

impl EdgeFilter<'_> {
    pub fn allows(&self, relationship: RelationshipType) -> bool {
        if self.0.is_empty() {
            relationship != RelationshipType::CrossEpisode
        } else {
            self.0.contains(&relationship)
        }
    }
}

struct Walk {
    nodes: Vec<NodeIndex>,
    edges: Vec<RelationshipType>,
}

/// Simple paths of 1..=`max_hops` edges from any of `starts` to a node
/// accepted by `is_goal(start, candidate)`. At most `limit` paths.
pub fn forward<G>(
    graph: &ConceptGraph,
    starts: &[NodeIndex],
    max_hops: usize,
    filter: &EdgeFilter<'_>,
    limit: usize,
    is_goal: G,
) -> Vec<Path>
where
    G: Fn(NodeIndex, NodeIndex) -> bool,
{
    let mut results = Vec::new();
    if limit == 0 || max_hops == 0 {
        return results;
    }
    let mut frontier: Vec<Walk> = starts
        .iter()
        .map(|s| Walk {
            nodes: vec![*s],
            edges: Vec::new(),
        })
        .collect();

    for _ in 0..max_hops {
        let mut next = Vec::new();
        for walk in &frontier {
            let (Some(&start), Some(&last)) = (walk.nodes.first(), walk.nodes.last()) else {
                continue;
            };
            for (neighbor, relationship) in graph.sorted_edges(last, Direction::Outgoing) {
                if !filter.allows(relationship) || walk.nodes.contains(&neighbor) {
                    continue;
                }
                let mut nodes = walk.nodes.clone();
                nodes.push(neighbor);
                let mut edges = walk.edges.clone();
                edges.push(relationship);
                if is_goal(start, neighbor) {
                    results.push(graph.to_path(&nodes, &edges));
                }
                next.push(Walk { nodes, edges });
            }
        }
        if results.len() >= limit || next.is_empty() {
            break;
        }
        if next.len() > MAX_FRONTIER {
            warn!(frontier = next.len(), "path search frontier truncated");
            next.truncate(MAX_FRONTIER);
        }
        frontier = next;
    }

    results.truncate(limit);
    results
}

/// One shortest path from every node that reaches any of `targets`, walking
/// incoming edges. Sources can be restricted to one concept type.
pub fn into_targets(
    graph: &ConceptGraph,
    targets: &[NodeIndex],
    max_hops: usize,
    filter: &EdgeFilter<'_>,
    source_type: Option<ConceptType>,
    limit: usize,
) -> Vec<Path> {
    let mut results = Vec::new();
    if limit == 0 || max_hops == 0 {
        return results;
    }
    let mut visited: HashSet<NodeIndex> = targets.iter().copied().collect();
    // node -> (next node towards the target, edge type)
    let mut parent: HashMap<NodeIndex, (NodeIndex, RelationshipType)> = HashMap::new();
    let mut frontier: Vec<NodeIndex> = targets.to_vec();

    'levels: for _ in 0..max_hops {
        let mut next = Vec::new();
        for &current in &frontier {
            for (source, relationship) in graph.sorted_edges(current, Direction::Incoming) {
                if !filter.allows(relationship) || !visited.insert(source) {
                    continue;
                }
                parent.insert(source, (current, relationship));
                next.push(source);

                let type_ok = match source_type {
                    Some(t) => graph.node(source).is_some_and(|n| n.concept_type == t),
                    None => true,
                };
                if type_ok {
                    results.push(unwind(graph, source, &parent));
                    if results.len() >= limit {
                        break 'levels;
                    }
                }
            }
        }
        if next.is_empty() {
            break;
        }
        frontier = next;
    }
    results
}

fn unwind(
    graph: &ConceptGraph,
    source: NodeIndex,
    parent: &HashMap<NodeIndex, (NodeIndex, RelationshipType)>,
) -> Path {
    let mut nodes = vec![source];
    let mut edges = Vec::new();
    let mut current = source;
    while let Some(&(next, relationship)) = parent.get(&current) {
        nodes.push(next);
        edges.push(relationship);
        current = next;
    }
    graph.to_path(&nodes, &edges)
}

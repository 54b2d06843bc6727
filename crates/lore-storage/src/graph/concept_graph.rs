//! petgraph `StableGraph` wrapper holding one workspace's concepts.

use std::collections::HashMap;

use petgraph::stable_graph::{EdgeIndex, NodeIndex, StableGraph};
use petgraph::visit::EdgeRef;
use petgraph::{Directed, Direction};

use lore_core::constants::RELATIONSHIP_PREVIEW_LIMIT;
use lore_core::models::{
    ConceptNode, EdgeDirection, Path, RelationshipEdge, RelationshipPreview, RelationshipType,
};

pub type ConceptStableGraph = StableGraph<ConceptNode, RelationshipEdge, Directed>;

/// Concept graph with O(1) lookup by node id.
#[derive(Default)]
pub struct ConceptGraph {
    pub graph: ConceptStableGraph,
    pub node_index: HashMap<String, NodeIndex>,
}

impl ConceptGraph {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get_node(&self, id: &str) -> Option<NodeIndex> {
        self.node_index.get(id).copied()
    }

    pub fn node(&self, idx: NodeIndex) -> Option<&ConceptNode> {
        self.graph.node_weight(idx)
    }

    pub fn add_node(&mut self, node: ConceptNode) -> NodeIndex {
        let id = node.id.clone();
        let idx = self.graph.add_node(node);
        self.node_index.insert(id, idx);
        idx
    }

    /// Node indexes ordered by node id.
    pub fn sorted_indices(&self) -> Vec<NodeIndex> {
        let mut ids: Vec<(&String, NodeIndex)> =
            self.node_index.iter().map(|(id, idx)| (id, *idx)).collect();
        ids.sort_by(|a, b| a.0.cmp(b.0));
        ids.into_iter().map(|(_, idx)| idx).collect()
    }

    /// Nodes whose id equals `key` or whose name equals it case-insensitively.
    pub fn resolve(&self, key: &str) -> Vec<NodeIndex> {
        if let Some(idx) = self.get_node(key) {
            return vec![idx];
        }
        let wanted = key.trim().to_lowercase();
        self.sorted_indices()
            .into_iter()
            .filter(|idx| {
                self.node(*idx)
                    .is_some_and(|n| n.name.to_lowercase() == wanted)
            })
            .collect()
    }

    pub fn find_edge(
        &self,
        source: NodeIndex,
        target: NodeIndex,
        relationship: RelationshipType,
    ) -> Option<EdgeIndex> {
        self.graph
            .edges_directed(source, Direction::Outgoing)
            .find(|e| e.target() == target && e.weight().relationship == relationship)
            .map(|e| e.id())
    }

    /// Edges leaving (or entering) `idx`, ordered by neighbour id then type.
    pub fn sorted_edges(
        &self,
        idx: NodeIndex,
        direction: Direction,
    ) -> Vec<(NodeIndex, RelationshipType)> {
        let mut edges: Vec<(NodeIndex, RelationshipType)> = self
            .graph
            .edges_directed(idx, direction)
            .map(|e| {
                let other = match direction {
                    Direction::Outgoing => e.target(),
                    Direction::Incoming => e.source(),
                };
                (other, e.weight().relationship)
            })
            .collect();
        edges.sort_by(|a, b| {
            let id_a = self.node(a.0).map(|n| n.id.as_str());
            let id_b = self.node(b.0).map(|n| n.id.as_str());
            id_a.cmp(&id_b).then_with(|| a.1.as_str().cmp(b.1.as_str()))
        });
        edges
    }

    /// One-hop neighbourhood summary: outgoing edges first, then incoming.
    pub fn preview(&self, idx: NodeIndex) -> Vec<RelationshipPreview> {
        let outgoing = self
            .sorted_edges(idx, Direction::Outgoing)
            .into_iter()
            .map(|e| (e, EdgeDirection::Outgoing));
        let incoming = self
            .sorted_edges(idx, Direction::Incoming)
            .into_iter()
            .map(|e| (e, EdgeDirection::Incoming));
        outgoing
            .chain(incoming)
            .filter_map(|((other, relationship), direction)| {
                self.node(other).map(|n| RelationshipPreview {
                    relationship,
                    direction,
                    neighbor_id: n.id.clone(),
                    neighbor_name: n.name.clone(),
                })
            })
            .take(RELATIONSHIP_PREVIEW_LIMIT)
            .collect()
    }

    /// Materialize a walk into a `Path`.
    pub fn to_path(&self, nodes: &[NodeIndex], edges: &[RelationshipType]) -> Path {
        let (node_ids, node_names): (Vec<String>, Vec<String>) = nodes
            .iter()
            .filter_map(|idx| self.node(*idx))
            .map(|n| (n.id.clone(), n.name.clone()))
            .unzip();
        Path {
            node_ids,
            node_names,
            edge_types: edges.to_vec(),
            hops: edges.len(),
        }
    }

    pub fn node_count(&self) -> usize {
        self.graph.node_count()
    }

    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }
}

use serde::{Deserialize, Serialize};

use super::RelationshipType;

/// An ordered walk through the graph. `node_ids.len() == hops + 1`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Path {
    pub node_ids: Vec<String>,
    pub node_names: Vec<String>,
    pub edge_types: Vec<RelationshipType>,
    pub hops: usize,
}

impl Path {
    pub fn source_id(&self) -> Option<&str> {
        self.node_ids.first().map(String::as_str)
    }

    pub fn target_id(&self) -> Option<&str> {
        self.node_ids.last().map(String::as_str)
    }

    pub fn source_name(&self) -> Option<&str> {
        self.node_names.first().map(String::as_str)
    }

    pub fn target_name(&self) -> Option<&str> {
        self.node_names.last().map(String::as_str)
    }

    /// `Meditation -[OPTIMIZES]-> Clarity`
    pub fn describe(&self) -> String {
        let mut out = String::new();
        for (i, name) in self.node_names.iter().enumerate() {
            if i > 0 {
                if let Some(edge) = self.edge_types.get(i - 1) {
                    out.push_str(&format!(" -[{edge}]-> "));
                }
            }
            out.push_str(name);
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn describe_renders_edges() {
        let p = Path {
            node_ids: vec!["practice:meditation".into(), "outcome:clarity".into()],
            node_names: vec!["Meditation".into(), "Clarity".into()],
            edge_types: vec![RelationshipType::Optimizes],
            hops: 1,
        };
        assert_eq!(p.describe(), "Meditation -[OPTIMIZES]-> Clarity");
        assert_eq!(p.source_name(), Some("Meditation"));
        assert_eq!(p.target_id(), Some("outcome:clarity"));
    }
}

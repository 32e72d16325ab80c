//! JSON export of a graph.
//!
//! Nodes carry their degree so consumers can size or rank them without
//! recomputing adjacency.

use crate::graph::SocialGraph;
use crate::FeedGraphError;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NodeJson {
    pub id: u64,
    pub label: String,
    pub degree: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EdgeJson {
    pub source: u64,
    pub target: u64,
}

/// Whole-graph JSON document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GraphJson {
    pub nodes: Vec<NodeJson>,
    pub edges: Vec<EdgeJson>,
}

impl From<&SocialGraph> for GraphJson {
    fn from(graph: &SocialGraph) -> Self {
        Self {
            nodes: graph
                .nodes()
                .map(|n| NodeJson {
                    id: n.id.0,
                    label: n.label.as_str().to_string(),
                    degree: graph.degree(n.id),
                })
                .collect(),
            edges: graph
                .edges()
                .map(|(a, b)| EdgeJson {
                    source: a.0,
                    target: b.0,
                })
                .collect(),
        }
    }
}

/// Pretty-printed JSON bytes for a graph.
pub fn export_json(graph: &SocialGraph) -> Result<Vec<u8>, FeedGraphError> {
    serde_json::to_vec_pretty(&GraphJson::from(graph))
        .map_err(|e| FeedGraphError::SerializationError(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Label;

    #[test]
    fn json_lists_nodes_with_degree() {
        let mut graph = SocialGraph::new();
        graph.connect(&Label::new("u2"), &Label::new("Ann"));
        graph.connect(&Label::new("u3"), &Label::new("Ann"));

        let doc = GraphJson::from(&graph);
        assert_eq!(doc.nodes.len(), 3);
        assert_eq!(doc.edges.len(), 2);
        let ann = doc.nodes.iter().find(|n| n.label == "Ann").expect("Ann");
        assert_eq!(ann.degree, 2);
    }

    #[test]
    fn export_json_is_parseable() {
        let mut graph = SocialGraph::new();
        graph.connect(&Label::new("a"), &Label::new("b"));

        let bytes = export_json(&graph).expect("export");
        let value: serde_json::Value = serde_json::from_slice(&bytes).expect("parse");
        assert_eq!(value["edges"][0]["source"], 0);
        assert_eq!(value["edges"][0]["target"], 1);
    }
}

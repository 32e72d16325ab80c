//! # Graph Metrics
//!
//! Summary numbers for status output. Integer arithmetic only.

use crate::graph::SocialGraph;
use crate::Label;
use serde::Serialize;

/// Size and shape of a graph.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct GraphMetrics {
    pub node_count: usize,
    pub edge_count: usize,
    /// Nodes with no edges.
    pub isolated_count: usize,
    pub max_degree: usize,
    /// Edges per thousand possible pairs.
    pub density_per_thousand: u64,
}

impl GraphMetrics {
    /// Compute metrics for a graph.
    #[must_use]
    pub fn from_graph(graph: &SocialGraph) -> Self {
        let node_count = graph.node_count();
        let edge_count = graph.edge_count();

        let mut isolated_count = 0usize;
        let mut max_degree = 0usize;
        for node in graph.nodes() {
            let degree = graph.degree(node.id);
            if degree == 0 {
                isolated_count += 1;
            }
            max_degree = max_degree.max(degree);
        }

        let n = node_count as u64;
        let possible_pairs = n.saturating_mul(n.saturating_sub(1)) / 2;
        let density_per_thousand = if possible_pairs == 0 {
            0
        } else {
            (edge_count as u64).saturating_mul(1000) / possible_pairs
        };

        Self {
            node_count,
            edge_count,
            isolated_count,
            max_degree,
            density_per_thousand,
        }
    }
}

/// The `limit` best-connected people, by degree descending then label.
#[must_use]
pub fn most_connected(graph: &SocialGraph, limit: usize) -> Vec<(Label, usize)> {
    let mut ranked: Vec<(Label, usize)> = graph
        .nodes()
        .map(|n| (n.label.clone(), graph.degree(n.id)))
        .collect();
    ranked.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
    ranked.truncate(limit);
    ranked
}

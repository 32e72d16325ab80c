//! # Social Graph
//!
//! Undirected, label-keyed graph of people connected by comments.
//!
//! All data structures use `BTreeMap`/`BTreeSet` for deterministic ordering.
//! Adding a node or edge that already exists is a no-op.

use crate::{Label, Node, NodeId};
use std::collections::{BTreeMap, BTreeSet};

/// The comment network.
///
/// Each label maps to exactly one node. Adjacency is stored in both
/// directions; a self-loop is stored once under its own node.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SocialGraph {
    /// Node storage: NodeId -> Node
    nodes: BTreeMap<NodeId, Node>,

    /// Symmetric adjacency: node -> neighbors
    adjacency: BTreeMap<NodeId, BTreeSet<NodeId>>,

    /// Reverse lookup: Label -> NodeId
    label_index: BTreeMap<Label, NodeId>,

    /// Next available NodeId
    next_node_id: u64,
}

impl SocialGraph {
    /// Create a new empty graph.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuild a graph from stored nodes and edges, preserving NodeIds.
    ///
    /// Edges naming an unknown node are ignored. The id counter restarts
    /// just past the largest id, so reloading never changes future ids.
    #[must_use]
    pub fn from_parts(
        nodes: impl IntoIterator<Item = Node>,
        edges: impl IntoIterator<Item = (NodeId, NodeId)>,
    ) -> Self {
        let mut graph = Self::new();
        for node in nodes {
            graph.import_node(node);
        }
        for (a, b) in edges {
            graph.ensure_edge(a, b);
        }
        graph
    }

    /// Insert a node with its original NodeId.
    fn import_node(&mut self, node: Node) {
        if node.id.0 >= self.next_node_id {
            self.next_node_id = node.id.0.saturating_add(1);
        }
        self.label_index.insert(node.label.clone(), node.id);
        self.nodes.insert(node.id, node);
    }

    /// Get or create the node for a label.
    pub fn ensure_node(&mut self, label: &Label) -> NodeId {
        if let Some(&id) = self.label_index.get(label) {
            return id;
        }

        let id = NodeId(self.next_node_id);
        self.next_node_id = self.next_node_id.saturating_add(1);

        self.nodes.insert(id, Node::new(id, label.clone()));
        self.label_index.insert(label.clone(), id);
        id
    }

    /// Add an undirected edge. Returns `true` if it was not present.
    ///
    /// Edges touching a node that does not exist are ignored.
    pub fn ensure_edge(&mut self, a: NodeId, b: NodeId) -> bool {
        if !self.nodes.contains_key(&a) || !self.nodes.contains_key(&b) {
            return false;
        }
        let added = self.adjacency.entry(a).or_default().insert(b);
        self.adjacency.entry(b).or_default().insert(a);
        added
    }

    /// Ensure both nodes and the edge between them exist.
    pub fn connect(&mut self, a: &Label, b: &Label) -> bool {
        let a = self.ensure_node(a);
        let b = self.ensure_node(b);
        self.ensure_edge(a, b)
    }

    /// Remove a node and every incident edge.
    ///
    /// Returns the number of edges removed, or `None` if the label is absent.
    pub fn remove_node(&mut self, label: &Label) -> Option<usize> {
        let id = self.label_index.remove(label)?;
        self.nodes.remove(&id);

        let neighbors = self.adjacency.remove(&id).unwrap_or_default();
        for neighbor in &neighbors {
            if *neighbor == id {
                continue;
            }
            if let Some(set) = self.adjacency.get_mut(neighbor) {
                set.remove(&id);
                if set.is_empty() {
                    self.adjacency.remove(neighbor);
                }
            }
        }
        Some(neighbors.len())
    }

    /// Get the NodeId for a label.
    #[must_use]
    pub fn node_id(&self, label: &Label) -> Option<NodeId> {
        self.label_index.get(label).copied()
    }

    /// Get a node by id.
    #[must_use]
    pub fn node(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(&id)
    }

    #[must_use]
    pub fn contains_label(&self, label: &Label) -> bool {
        self.label_index.contains_key(label)
    }

    /// Check for an undirected edge between two labels.
    #[must_use]
    pub fn contains_edge(&self, a: &Label, b: &Label) -> bool {
        match (self.node_id(a), self.node_id(b)) {
            (Some(a), Some(b)) => self.adjacency.get(&a).is_some_and(|set| set.contains(&b)),
            _ => false,
        }
    }

    /// All nodes in NodeId order.
    pub fn nodes(&self) -> impl Iterator<Item = &Node> {
        self.nodes.values()
    }

    /// Every undirected edge once, as `(low, high)` in sorted order.
    pub fn edges(&self) -> impl Iterator<Item = (NodeId, NodeId)> + '_ {
        self.adjacency.iter().flat_map(|(&a, targets)| {
            targets.range(a..).map(move |&b| (a, b))
        })
    }

    /// Every edge as a label pair, smaller label first.
    ///
    /// Two graphs with equal node-label sets and equal edge-label sets are
    /// the same network regardless of the NodeIds they were assigned.
    #[must_use]
    pub fn edge_labels(&self) -> BTreeSet<(Label, Label)> {
        self.edges()
            .filter_map(|(a, b)| {
                let a = self.nodes.get(&a)?.label.clone();
                let b = self.nodes.get(&b)?.label.clone();
                Some(if a <= b { (a, b) } else { (b, a) })
            })
            .collect()
    }

    /// All labels in sorted order.
    #[must_use]
    pub fn labels(&self) -> BTreeSet<Label> {
        self.label_index.keys().cloned().collect()
    }

    /// Neighbors of a node in NodeId order.
    pub fn neighbors(&self, id: NodeId) -> impl Iterator<Item = NodeId> + '_ {
        self.adjacency.get(&id).into_iter().flatten().copied()
    }

    /// Number of incident edges (a self-loop counts once).
    #[must_use]
    pub fn degree(&self, id: NodeId) -> usize {
        self.adjacency.get(&id).map_or(0, BTreeSet::len)
    }

    #[must_use]
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    #[must_use]
    pub fn edge_count(&self) -> usize {
        self.edges().count()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}

// =============================================================================
// TESTS
// =============================================================================

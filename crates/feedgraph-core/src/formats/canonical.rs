//! # Canonical Graph Format
//!
//! Deterministic, bit-exact binary serialization of a `SocialGraph`.
//! This is the persisted state carried from one run to the next.
//!
//! Format:
//! ```text
//! [header_len: u32 LE] [CanonicalHeader (postcard)] [CanonicalGraph (postcard)]
//! ```
//!
//! ## Validation
//!
//! Import checks, in order, before trusting any data:
//! 1. Length prefix and header decode, no bytes left over
//! 2. Magic bytes and version
//! 3. Header counts against `MAX_IMPORT_*` limits (before decoding the body)
//! 4. Body decode with nothing trailing, then checksum and counts
//! 5. Unique node ids and labels, edges referencing known nodes
//!
//! Every failure is `CorruptPersistedState`.

use crate::graph::SocialGraph;
use crate::primitives::{
    CANONICAL_MAGIC, CANONICAL_VERSION, MAX_IMPORT_EDGE_COUNT, MAX_IMPORT_NODE_COUNT,
};
use crate::{FeedGraphError, Label, Node, NodeId};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

// =============================================================================
// HEADER
// =============================================================================

/// Header for canonical graph files.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CanonicalHeader {
    /// Magic bytes to identify the format.
    pub magic: [u8; 4],

    /// Format version for compatibility.
    pub version: u8,

    /// Number of nodes in the body.
    pub node_count: u64,

    /// Number of edges in the body.
    pub edge_count: u64,

    /// Checksum of the body.
    pub checksum: u64,
}

impl CanonicalHeader {
    /// Create a new header with the given counts.
    #[must_use]
    pub fn new(node_count: u64, edge_count: u64, checksum: u64) -> Self {
        Self {
            magic: CANONICAL_MAGIC,
            version: CANONICAL_VERSION,
            node_count,
            edge_count,
            checksum,
        }
    }

    /// Validate magic, version, and size limits.
    pub fn validate(&self) -> Result<(), FeedGraphError> {
        if self.magic != CANONICAL_MAGIC {
            return Err(corrupt("invalid file format"));
        }
        if self.version != CANONICAL_VERSION {
            return Err(corrupt(format!("unsupported version {}", self.version)));
        }
        if self.node_count > MAX_IMPORT_NODE_COUNT {
            return Err(corrupt(format!(
                "node count {} exceeds maximum allowed {}",
                self.node_count, MAX_IMPORT_NODE_COUNT
            )));
        }
        if self.edge_count > MAX_IMPORT_EDGE_COUNT {
            return Err(corrupt(format!(
                "edge count {} exceeds maximum allowed {}",
                self.edge_count, MAX_IMPORT_EDGE_COUNT
            )));
        }
        Ok(())
    }
}

fn corrupt(msg: impl Into<String>) -> FeedGraphError {
    FeedGraphError::CorruptPersistedState(msg.into())
}

// =============================================================================
// BODY
// =============================================================================

/// A node in canonical form, sorted by id.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord)]
pub struct CanonicalNode {
    pub id: u64,
    pub label: String,
}

/// An undirected edge in canonical form, `a <= b`, sorted.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord)]
pub struct CanonicalEdge {
    pub a: u64,
    pub b: u64,
}

/// A graph in canonical form for bit-exact serialization.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CanonicalGraph {
    /// Nodes sorted by id.
    pub nodes: Vec<CanonicalNode>,

    /// Edges sorted by (a, b).
    pub edges: Vec<CanonicalEdge>,
}

impl CanonicalGraph {
    /// Snapshot a graph in sorted order.
    #[must_use]
    pub fn from_graph(graph: &SocialGraph) -> Self {
        let mut nodes: Vec<CanonicalNode> = graph
            .nodes()
            .map(|n| CanonicalNode {
                id: n.id.0,
                label: n.label.as_str().to_string(),
            })
            .collect();
        nodes.sort();

        let mut edges: Vec<CanonicalEdge> = graph
            .edges()
            .map(|(a, b)| CanonicalEdge { a: a.0, b: b.0 })
            .collect();
        edges.sort();

        Self { nodes, edges }
    }

    /// Rebuild the graph after checking structural integrity.
    pub fn to_graph(&self) -> Result<SocialGraph, FeedGraphError> {
        let mut ids = BTreeSet::new();
        let mut labels = BTreeSet::new();
        for node in &self.nodes {
            if !ids.insert(node.id) {
                return Err(corrupt(format!("duplicate node id {}", node.id)));
            }
            if !labels.insert(node.label.as_str()) {
                return Err(corrupt(format!("duplicate node label '{}'", node.label)));
            }
        }
        for edge in &self.edges {
            if edge.a > edge.b || !ids.contains(&edge.a) || !ids.contains(&edge.b) {
                return Err(corrupt(format!("invalid edge {} - {}", edge.a, edge.b)));
            }
        }

        Ok(SocialGraph::from_parts(
            self.nodes
                .iter()
                .map(|n| Node::new(NodeId(n.id), Label::new(n.label.as_str()))),
            self.edges.iter().map(|e| (NodeId(e.a), NodeId(e.b))),
        ))
    }

    /// Deterministic checksum of the body.
    ///
    /// FNV-1a over ids, label bytes, and edge endpoints. This detects
    /// accidental corruption; it is NOT a cryptographic hash.
    #[must_use]
    pub fn checksum(&self) -> u64 {
        const OFFSET: u64 = 0xcbf2_9ce4_8422_2325;
        const PRIME: u64 = 0x0000_0100_0000_01b3;

        let mut hash = OFFSET;
        let mut feed = |bytes: &[u8]| {
            for byte in bytes {
                hash ^= u64::from(*byte);
                hash = hash.wrapping_mul(PRIME);
            }
        };

        for node in &self.nodes {
            feed(&node.id.to_le_bytes());
            feed(&(node.label.len() as u64).to_le_bytes());
            feed(node.label.as_bytes());
        }
        for edge in &self.edges {
            feed(&edge.a.to_le_bytes());
            feed(&edge.b.to_le_bytes());
        }

        hash
    }
}

// =============================================================================
// EXPORT / IMPORT
// =============================================================================

/// Serialize a graph to canonical bytes.
///
/// The same graph always produces the same bytes.
pub fn export_canonical(graph: &SocialGraph) -> Result<Vec<u8>, FeedGraphError> {
    let canonical = CanonicalGraph::from_graph(graph);
    let header = CanonicalHeader::new(
        canonical.nodes.len() as u64,
        canonical.edges.len() as u64,
        canonical.checksum(),
    );

    let header_bytes = postcard::to_allocvec(&header)
        .map_err(|e| FeedGraphError::SerializationError(format!("Header: {}", e)))?;
    let data_bytes = postcard::to_allocvec(&canonical)
        .map_err(|e| FeedGraphError::SerializationError(format!("Data: {}", e)))?;

    let mut result = Vec::with_capacity(4 + header_bytes.len() + data_bytes.len());
    result.extend_from_slice(&(header_bytes.len() as u32).to_le_bytes());
    result.extend_from_slice(&header_bytes);
    result.extend_from_slice(&data_bytes);

    Ok(result)
}

/// Deserialize and validate canonical bytes.
pub fn import_canonical(data: &[u8]) -> Result<SocialGraph, FeedGraphError> {
    let Some((len_bytes, rest)) = data.split_first_chunk::<4>() else {
        return Err(corrupt("data too short"));
    };
    let header_len = u32::from_le_bytes(*len_bytes) as usize;
    if rest.len() < header_len {
        return Err(corrupt("data too short for header"));
    }
    let (header_bytes, body) = rest.split_at(header_len);

    let (header, unread): (CanonicalHeader, _) =
        postcard::take_from_bytes(header_bytes).map_err(|e| corrupt(format!("header: {}", e)))?;
    if !unread.is_empty() {
        return Err(corrupt("trailing data after header"));
    }
    header.validate()?;

    let (canonical, unread): (CanonicalGraph, _) =
        postcard::take_from_bytes(body).map_err(|e| corrupt(format!("body: {}", e)))?;
    if !unread.is_empty() {
        return Err(corrupt(format!("trailing data: {} bytes", unread.len())));
    }

    let computed = canonical.checksum();
    if computed != header.checksum {
        return Err(corrupt(format!(
            "checksum mismatch: expected {}, got {}",
            header.checksum, computed
        )));
    }
    if canonical.nodes.len() as u64 != header.node_count {
        return Err(corrupt("node count mismatch"));
    }
    if canonical.edges.len() as u64 != header.edge_count {
        return Err(corrupt("edge count mismatch"));
    }

    canonical.to_graph()
}

/// Checksum of a graph's canonical form.
#[must_use]
pub fn canonical_checksum(graph: &SocialGraph) -> u64 {
    CanonicalGraph::from_graph(graph).checksum()
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> SocialGraph {
        let mut graph = SocialGraph::new();
        graph.connect(&Label::new("u2"), &Label::new("Ann"));
        graph.connect(&Label::new("u3"), &Label::new("Ann"));
        graph.connect(&Label::new("u3"), &Label::new("u3"));
        graph.ensure_node(&Label::new("loner"));
        graph
    }

    #[test]
    fn roundtrip_bit_exact() {
        let graph = sample();
        let bytes1 = export_canonical(&graph).expect("export");
        let restored = import_canonical(&bytes1).expect("import");
        let bytes2 = export_canonical(&restored).expect("export");

        assert_eq!(bytes1, bytes2, "save -> load -> save must produce identical bytes");
        assert_eq!(graph.labels(), restored.labels());
        assert_eq!(graph.edge_labels(), restored.edge_labels());
    }

    #[test]
    fn empty_graph_roundtrip() {
        let bytes = export_canonical(&SocialGraph::new()).expect("export");
        let restored = import_canonical(&bytes).expect("import");
        assert!(restored.is_empty());
    }

    #[test]
    fn truncated_data_rejected() {
        let bytes = export_canonical(&sample()).expect("export");
        for cut in [0, 3, 6, bytes.len() - 1] {
            let result = import_canonical(&bytes[..cut]);
            assert!(
                matches!(result, Err(FeedGraphError::CorruptPersistedState(_))),
                "cut at {cut}"
            );
        }
    }

    #[test]
    fn trailing_data_rejected() {
        let mut graph = SocialGraph::new();
        graph.connect(&Label::new("a"), &Label::new("b"));
        let mut bytes = export_canonical(&graph).expect("export");
        bytes.extend_from_slice(&[0xAB; 32]);

        let err = import_canonical(&bytes).expect_err("trailing bytes");
        assert!(matches!(err, FeedGraphError::CorruptPersistedState(_)));
        assert!(err.to_string().contains("trailing data"));
    }

    #[test]
    fn flipped_label_byte_fails_checksum() {
        let mut bytes = export_canonical(&sample()).expect("export");
        let pos = bytes
            .windows(5)
            .position(|w| w == b"loner")
            .expect("label present");
        bytes[pos] = b'L';

        let err = import_canonical(&bytes).expect_err("corrupt");
        assert!(err.to_string().contains("checksum"));
    }

    #[test]
    fn wrong_magic_rejected() {
        let header = CanonicalHeader {
            magic: *b"XXXX",
            ..CanonicalHeader::new(0, 0, 0)
        };
        assert!(header.validate().is_err());
    }

    #[test]
    fn oversized_header_rejected_before_body() {
        let header = CanonicalHeader::new(MAX_IMPORT_NODE_COUNT + 1, 0, 0);
        let header_bytes = postcard::to_allocvec(&header).expect("header");
        let mut data = (header_bytes.len() as u32).to_le_bytes().to_vec();
        data.extend_from_slice(&header_bytes);

        let err = import_canonical(&data).expect_err("too big");
        assert!(err.to_string().contains("exceeds maximum"));
    }

    #[test]
    fn dangling_edge_rejected() {
        let canonical = CanonicalGraph {
            nodes: vec![CanonicalNode { id: 0, label: "a".into() }],
            edges: vec![CanonicalEdge { a: 0, b: 5 }],
        };
        assert!(canonical.to_graph().is_err());
    }

    #[test]
    fn duplicate_label_rejected() {
        let canonical = CanonicalGraph {
            nodes: vec![
                CanonicalNode { id: 0, label: "a".into() },
                CanonicalNode { id: 1, label: "a".into() },
            ],
            edges: Vec::new(),
        };
        assert!(canonical.to_graph().is_err());
    }

    #[test]
    fn checksum_depends_on_content() {
        let mut other = sample();
        other.ensure_node(&Label::new("extra"));
        assert_ne!(canonical_checksum(&sample()), canonical_checksum(&other));
    }
}

//! # Graph Formats
//!
//! - `canonical`: the persisted binary format (postcard, checksummed)
//! - `json`: a readable export for other tools
//! - `gexf`: XML interchange with networkx and Gephi, both directions

pub mod canonical;
pub mod gexf;
pub mod json;

pub use canonical::{
    CanonicalEdge, CanonicalGraph, CanonicalHeader, CanonicalNode, canonical_checksum,
    export_canonical, import_canonical,
};
pub use gexf::{export_gexf, import_gexf};
pub use json::{EdgeJson, GraphJson, NodeJson, export_json};

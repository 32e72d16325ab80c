//! # feedgraph-core
//!
//! The comment-network engine - THE LOGIC.
//!
//! Reads a local social-app export (contacts, feeds, comments) and folds it
//! into an undirected graph that connects every feed author to each person
//! who commented on that feed. The graph is persisted and merged with the
//! previous run's state, so it accumulates over time.
//!
//! ## Pipeline
//!
//! ```text
//! contacts ──► IdentityResolver ──┐
//!                                 ▼
//! feeds + comments ──► RelationExtractor ──► GraphMerger ──► GraphFile ──► RenderSink
//!                                               ▲
//!                          GraphFile (prior) ───┘
//! ```
//!
//! ## Architectural Constraints
//!
//! - Single-threaded, synchronous batch; no async, no network
//! - No logging backend: stages return counters, the app logs them
//! - Deterministic: ordered collections only

// =============================================================================
// MODULES
// =============================================================================

pub mod formats;
pub mod graph;
pub mod identity;
pub mod merge;
pub mod metrics;
pub mod persist;
pub mod primitives;
pub mod relation;
pub mod render;
pub mod source;
pub mod types;

// =============================================================================
// RE-EXPORTS: Core Types
// =============================================================================

pub use types::{ErrorKind, FeedGraphError, FeedId, Label, Node, NodeId, Relation, UserId};

// =============================================================================
// RE-EXPORTS: Engine
// =============================================================================

pub use graph::SocialGraph;
pub use identity::IdentityResolver;
pub use merge::{GraphMerger, MergeReport, SelfExclusion};
pub use metrics::{GraphMetrics, most_connected};
pub use persist::{GraphFile, load_gexf};
pub use relation::{CommentRecord, FeedRecord, RelationExtractor, Timeline};
pub use render::{HtmlRenderer, RenderSink};

// =============================================================================
// RE-EXPORTS: Sources & Formats
// =============================================================================

pub use formats::{
    canonical_checksum, export_canonical, export_gexf, export_json, import_canonical, import_gexf,
};
pub use source::{Field, MemoryStore, RecordStore, SourceSchema, SqliteStore, Table};

//! # Core Type Definitions
//!
//! This module contains the core types shared by every stage of the batch:
//! - Identifiers from the export (`UserId`, `FeedId`)
//! - Graph identifiers and labels (`NodeId`, `Label`, `Node`)
//! - The derived per-feed `Relation`
//! - Error types (`FeedGraphError`, `ErrorKind`)
//!
//! ## Determinism Guarantees
//!
//! All key types implement `Ord` so they can live in `BTreeMap`/`BTreeSet`
//! and iterate in a stable order.

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

// =============================================================================
// EXPORT IDENTIFIERS
// =============================================================================

/// Opaque account identifier as stored in the export (stable, unique per person).
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct UserId(pub String);

impl UserId {
    /// Create a new user identifier.
    #[must_use]
    pub fn new(s: impl Into<String>) -> Self {
        Self(s.into())
    }

    /// Get the identifier as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Feed identifier; the join key between the feeds and comments tables.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct FeedId(pub String);

impl FeedId {
    /// Create a new feed identifier.
    #[must_use]
    pub fn new(s: impl Into<String>) -> Self {
        Self(s.into())
    }

    /// Get the identifier as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

// =============================================================================
// GRAPH IDENTIFIERS
// =============================================================================

/// Internal node identifier inside a `SocialGraph`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct NodeId(pub u64);

/// Human-readable node label: a resolved display name, or the raw
/// identifier when no override exists.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Label(pub String);

impl Label {
    /// Create a new label.
    #[must_use]
    pub fn new(s: impl Into<String>) -> Self {
        Self(s.into())
    }

    /// Get the label as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Label {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&UserId> for Label {
    fn from(id: &UserId) -> Self {
        Self(id.0.clone())
    }
}

/// A node in the social graph.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Node {
    /// The internal node identifier.
    pub id: NodeId,
    /// The person this node stands for.
    pub label: Label,
}

impl Node {
    /// Create a new node.
    #[must_use]
    pub fn new(id: NodeId, label: Label) -> Self {
        Self { id, label }
    }
}

// =============================================================================
// RELATION
// =============================================================================

/// One feed's poster paired with its commenters, all as resolved labels.
///
/// Commenters keep comment-table row order. Repeats are kept; the graph
/// treats a repeated edge as a no-op.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Relation {
    pub poster: Label,
    pub commenters: Vec<Label>,
}

impl Relation {
    /// Create a new relation.
    #[must_use]
    pub fn new(poster: Label, commenters: Vec<Label>) -> Self {
        Self { poster, commenters }
    }
}

// =============================================================================
// ERROR TYPES
// =============================================================================

/// Errors that can occur while building the comment network.
///
/// - No silent failures
/// - Use `Result<T, FeedGraphError>` for fallible operations
/// - Unknown identifiers and empty input are NOT errors
#[derive(Debug, Error)]
pub enum FeedGraphError {
    /// The record store cannot be opened or a table cannot be read.
    #[error("Source unavailable: {0}")]
    SourceUnavailable(String),

    /// A required column is absent from a source table.
    #[error("Table '{table}' has no column '{column}'")]
    MissingColumn { table: String, column: String },

    /// The persisted graph exists but cannot be parsed.
    #[error("Corrupt persisted graph: {0}")]
    CorruptPersistedState(String),

    /// A serialization error occurred while encoding a graph.
    #[error("Serialization error: {0}")]
    SerializationError(String),

    /// The visualization could not be produced.
    #[error("Render failed: {0}")]
    RenderFailed(String),

    /// An I/O error occurred.
    #[error("I/O error: {0}")]
    IoError(String),

    /// Configuration is unusable.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

impl FeedGraphError {
    /// Classify this error for the run status.
    #[must_use]
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::SourceUnavailable(_) | Self::MissingColumn { .. } => {
                ErrorKind::SourceUnavailable
            }
            Self::CorruptPersistedState(_) => ErrorKind::CorruptPersistedState,
            Self::SerializationError(_) | Self::IoError(_) => ErrorKind::Persist,
            Self::RenderFailed(_) => ErrorKind::Render,
            Self::InvalidConfig(_) => ErrorKind::Config,
        }
    }
}

/// Coarse failure classification reported by a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    SourceUnavailable,
    CorruptPersistedState,
    Persist,
    Render,
    Config,
}

impl ErrorKind {
    /// Stable snake_case name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::SourceUnavailable => "source_unavailable",
            Self::CorruptPersistedState => "corrupt_persisted_state",
            Self::Persist => "persist",
            Self::Render => "render",
            Self::Config => "config",
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn label_from_user_id_is_verbatim() {
        let id = UserId::new("wxid_abc");
        assert_eq!(Label::from(&id).as_str(), "wxid_abc");
    }

    #[test]
    fn error_kinds_classify_variants() {
        let missing = FeedGraphError::MissingColumn {
            table: "Contact".to_string(),
            column: "Remark".to_string(),
        };
        assert_eq!(missing.kind(), ErrorKind::SourceUnavailable);
        assert_eq!(
            FeedGraphError::CorruptPersistedState("x".into()).kind(),
            ErrorKind::CorruptPersistedState
        );
        assert_eq!(FeedGraphError::IoError("x".into()).kind(), ErrorKind::Persist);
        assert_eq!(FeedGraphError::RenderFailed("x".into()).kind(), ErrorKind::Render);
    }

    #[test]
    fn missing_column_message_names_table_and_column() {
        let err = FeedGraphError::MissingColumn {
            table: "FeedsV20".to_string(),
            column: "FeedId".to_string(),
        };
        assert_eq!(err.to_string(), "Table 'FeedsV20' has no column 'FeedId'");
    }

    #[test]
    fn error_kind_serializes_snake_case() {
        let json = serde_json::to_string(&ErrorKind::CorruptPersistedState).expect("json");
        assert_eq!(json, "\"corrupt_persisted_state\"");
    }
}

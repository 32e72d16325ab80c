//! # Primitives
//!
//! Fixed constants compiled into the binary: well-known paths, format
//! magic, and import limits.

/// Persisted graph file, relative to the working directory.
pub const GRAPH_FILE: &str = "graph.fgx";

/// Rendered visualization, relative to the working directory.
pub const RENDER_FILE: &str = "comment_network.html";

/// Contacts database of the export.
pub const CONTACTS_DB: &str = "Msg/MicroMsg.db";

/// Timeline (feeds + comments) database of the export.
pub const TIMELINE_DB: &str = "Msg/Sns.db";

/// Magic bytes for the canonical graph format.
pub const CANONICAL_MAGIC: [u8; 4] = *b"FGRX";

/// Current canonical format version.
///
/// Increment this when making breaking changes to the serialization format.
pub const CANONICAL_VERSION: u8 = 1;

/// Maximum node count accepted when importing a persisted graph.
///
/// Checked against the header before the body is decoded.
pub const MAX_IMPORT_NODE_COUNT: u64 = 1_000_000;

/// Maximum edge count accepted when importing a persisted graph.
pub const MAX_IMPORT_EDGE_COUNT: u64 = 10_000_000;

/// Maximum persisted file size (256 MB).
pub const MAX_PERSISTED_FILE_SIZE: u64 = 256 * 1024 * 1024;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn magic_bytes_correct() {
        assert_eq!(&CANONICAL_MAGIC, b"FGRX");
    }

    #[test]
    fn well_known_paths_are_relative() {
        for path in [GRAPH_FILE, RENDER_FILE, CONTACTS_DB, TIMELINE_DB] {
            assert!(std::path::Path::new(path).is_relative(), "{path}");
        }
    }
}

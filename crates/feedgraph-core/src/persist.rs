//! # Persisted Graph File
//!
//! The single artifact carried across runs.
//!
//! - Absent file: no prior state, start empty (not an error)
//! - Present but unparsable: `CorruptPersistedState`, never silently discarded
//! - Saving writes a sibling temp file and renames it into place, so a
//!   failed save leaves the previous file untouched
//!
//! Concurrent runs against one file are not coordinated; callers serialize.

use crate::formats::{export_canonical, import_canonical, import_gexf};
use crate::graph::SocialGraph;
use crate::primitives::{GRAPH_FILE, MAX_PERSISTED_FILE_SIZE};
use crate::FeedGraphError;
use std::fs::{self, File};
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};

/// Handle to the persisted graph location.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GraphFile {
    path: PathBuf,
}

impl Default for GraphFile {
    fn default() -> Self {
        Self::new(GRAPH_FILE)
    }
}

impl GraphFile {
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load the persisted graph, or `None` if there is no prior state.
    pub fn load(&self) -> Result<Option<SocialGraph>, FeedGraphError> {
        match read_bounded(&self.path)? {
            Some(data) => import_canonical(&data).map(Some),
            None => Ok(None),
        }
    }

    /// Load the persisted graph or start from an empty one.
    pub fn load_or_empty(&self) -> Result<SocialGraph, FeedGraphError> {
        Ok(self.load()?.unwrap_or_default())
    }

    /// Write the graph atomically.
    pub fn save(&self, graph: &SocialGraph) -> Result<(), FeedGraphError> {
        let data = export_canonical(graph)?;
        write_atomic(&self.path, &data)
    }
}

/// Load a GEXF file (e.g. a networkx `graph.gexf`) as prior state, or
/// `None` if it does not exist.
pub fn load_gexf(path: &Path) -> Result<Option<SocialGraph>, FeedGraphError> {
    match read_bounded(path)? {
        Some(data) => import_gexf(&data).map(Some),
        None => Ok(None),
    }
}

/// Read a prior-state file, refusing anything that is not a regular file
/// of bounded size.
fn read_bounded(path: &Path) -> Result<Option<Vec<u8>>, FeedGraphError> {
    let metadata = match fs::metadata(path) {
        Ok(m) => m,
        Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
        Err(e) => {
            return Err(FeedGraphError::IoError(format!(
                "cannot stat '{}': {}",
                path.display(),
                e
            )));
        }
    };

    if !metadata.is_file() {
        return Err(FeedGraphError::CorruptPersistedState(format!(
            "'{}' is not a regular file",
            path.display()
        )));
    }
    if metadata.len() > MAX_PERSISTED_FILE_SIZE {
        return Err(FeedGraphError::CorruptPersistedState(format!(
            "file size {} bytes exceeds maximum allowed {} bytes",
            metadata.len(),
            MAX_PERSISTED_FILE_SIZE
        )));
    }

    fs::read(path)
        .map(Some)
        .map_err(|e| FeedGraphError::IoError(format!("cannot read '{}': {}", path.display(), e)))
}

/// Write `data` to a sibling temp file, sync it, then rename over `path`.
pub(crate) fn write_atomic(path: &Path, data: &[u8]) -> Result<(), FeedGraphError> {
    let io_err = |what: &str, e: std::io::Error| {
        FeedGraphError::IoError(format!("{} '{}': {}", what, path.display(), e))
    };

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(|e| io_err("cannot create directory for", e))?;
    }

    let mut temp_name = path.as_os_str().to_os_string();
    temp_name.push(".tmp");
    let temp_path = PathBuf::from(temp_name);

    let result = (|| {
        let mut file = File::create(&temp_path)?;
        file.write_all(data)?;
        file.sync_all()?;
        fs::rename(&temp_path, path)
    })();

    if let Err(e) = result {
        let _ = fs::remove_file(&temp_path);
        return Err(io_err("cannot write", e));
    }
    Ok(())
}

// =============================================================================
// TESTS
// =============================================================================

//! # feedgraph
//!
//! The application layer over `feedgraph-core`: configuration, the batch
//! pipeline, and the CLI.
//!
//! The whole batch is also reachable as a single call:
//!
//! ```no_run
//! let status = feedgraph::generate_comment_network();
//! println!("{}", status);
//! ```

pub mod cli;
pub mod config;
pub mod pipeline;

pub use config::{CONFIG_FILE, Config};
pub use pipeline::{Pipeline, RunStatus, RunSummary};

use std::path::Path;

/// Run the full pipeline with `feedgraph.toml` from the working directory
/// (defaults if absent) and return a human-readable status line.
///
/// Never panics on bad input; every failure is folded into the string.
pub fn generate_comment_network() -> String {
    let status = match Config::load(Path::new(CONFIG_FILE)) {
        Ok(config) => Pipeline::new(config).run(),
        Err(e) => RunStatus::from(&e),
    };
    status.to_string()
}

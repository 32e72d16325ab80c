//! # feedgraph CLI Module
//!
//! ## Available Commands
//!
//! - `run` - Merge the export into the persisted graph and render it (default)
//! - `status` - Show size and best-connected people of the persisted graph
//! - `export` - Export the persisted graph to a file
//! - `render` - Re-render the persisted graph without reading the export
//! - `init` - Write a default configuration file

mod commands;

use crate::config::{CONFIG_FILE, Config};
use clap::{Parser, Subcommand};
use feedgraph_core::FeedGraphError;
use std::path::PathBuf;

pub use commands::*;

// =============================================================================
// CLI STRUCTURE
// =============================================================================

/// feedgraph - comment network builder
///
/// Connects every feed author to each person who commented on the feed,
/// accumulating the network across runs.
#[derive(Parser, Debug)]
#[command(name = "feedgraph")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Suppress banner output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Path to the configuration file
    #[arg(short, long, global = true, default_value = CONFIG_FILE)]
    pub config: PathBuf,

    /// Output in JSON format (for programmatic access)
    #[arg(long, global = true)]
    pub json_mode: bool,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available CLI commands.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Build the comment network from the export
    Run {
        /// Own account identifier (overrides account.self_id)
        #[arg(short, long)]
        self_id: Option<String>,
    },

    /// Show persisted graph status
    Status {
        /// How many best-connected people to list
        #[arg(short, long, default_value = "10")]
        top: usize,
    },

    /// Export the persisted graph
    Export {
        /// Output file path
        #[arg(short, long)]
        output: PathBuf,

        /// Export format (canonical, json, gexf)
        #[arg(short = 't', long, default_value = "canonical")]
        format: String,
    },

    /// Render the persisted graph to HTML
    Render,

    /// Write a default configuration file
    Init {
        /// Overwrite an existing configuration file
        #[arg(short, long)]
        force: bool,
    },
}

// =============================================================================
// COMMAND EXECUTION
// =============================================================================

/// Execute the CLI with parsed arguments.
pub fn execute(cli: Cli) -> Result<(), FeedGraphError> {
    let json_mode = cli.json_mode;

    // init must work even when the existing file is broken
    if let Some(Commands::Init { force }) = cli.command {
        return cmd_init(&cli.config, force);
    }

    let config = Config::load(&cli.config)?;

    match cli.command {
        Some(Commands::Run { self_id }) => cmd_run(config, self_id, json_mode),
        Some(Commands::Status { top }) => cmd_status(&config, json_mode, top),
        Some(Commands::Export { output, format }) => cmd_export(&config, &output, &format),
        Some(Commands::Render) => cmd_render(&config, json_mode),
        Some(Commands::Init { force }) => cmd_init(&cli.config, force),
        None => cmd_run(config, None, json_mode),
    }
}

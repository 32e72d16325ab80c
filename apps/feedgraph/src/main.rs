//! # feedgraph
//!
//! Builds an interactive comment network from a local social-app export.
//!
//! ## Usage
//!
//! ```bash
//! # Merge the export into the persisted graph and render it
//! feedgraph run --self-id wxid_me
//!
//! # Inspect the persisted graph
//! feedgraph status
//! feedgraph export -o graph.json -t json
//! ```

use clap::Parser;
use feedgraph::cli;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

// =============================================================================
// APPLICATION ENTRY POINT
// =============================================================================

fn main() {
    // FEEDGRAPH_LOG_FORMAT=json enables machine-parseable output.
    let log_format = std::env::var("FEEDGRAPH_LOG_FORMAT").unwrap_or_else(|_| "text".to_string());

    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "feedgraph=info".into());

    match log_format.as_str() {
        "json" => {
            tracing_subscriber::registry()
                .with(filter)
                .with(tracing_subscriber::fmt::layer().json().with_writer(std::io::stderr))
                .init();
        }
        _ => {
            tracing_subscriber::registry()
                .with(filter)
                .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
                .init();
        }
    }

    let cli = cli::Cli::parse();

    if !cli.quiet && !cli.json_mode {
        print_banner();
    }

    if let Err(e) = cli::execute(cli) {
        tracing::error!("Error: {}", e);
        std::process::exit(1);
    }
}

fn print_banner() {
    println!(
        r#"
  feedgraph v{}
  comment network builder
"#,
        env!("CARGO_PKG_VERSION")
    );
}

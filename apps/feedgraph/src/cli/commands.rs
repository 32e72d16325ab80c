//! # CLI Command Implementations

use crate::config::{Config, DEFAULT_CONFIG};
use crate::pipeline::{Pipeline, RunStatus};
use feedgraph_core::{
    FeedGraphError, GraphFile, GraphMetrics, HtmlRenderer, RenderSink, SelfExclusion,
    SocialGraph, canonical_checksum, export_canonical, export_gexf, export_json, most_connected,
};
use std::path::{Path, PathBuf};

/// Validate an output path: the parent directory must already exist.
fn validate_output_path(path: &Path) -> Result<PathBuf, FeedGraphError> {
    let parent = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };

    let canonical_parent = parent.canonicalize().map_err(|e| {
        FeedGraphError::IoError(format!(
            "Invalid output directory '{}': {}",
            parent.display(),
            e
        ))
    })?;

    if !canonical_parent.is_dir() {
        return Err(FeedGraphError::IoError(format!(
            "Output directory '{}' is not a valid directory",
            parent.display()
        )));
    }

    let filename = path
        .file_name()
        .ok_or_else(|| FeedGraphError::IoError("Output path has no filename".to_string()))?;

    Ok(canonical_parent.join(filename))
}

/// Load the persisted graph named by the configuration.
pub fn load_graph(config: &Config) -> Result<SocialGraph, FeedGraphError> {
    GraphFile::new(&config.output.graph).load_or_empty()
}

fn print_json(value: &serde_json::Value) {
    println!("{}", serde_json::to_string_pretty(value).unwrap_or_default());
}

// =============================================================================
// RUN COMMAND
// =============================================================================

/// Run the pipeline and print its status line.
pub fn cmd_run(
    config: Config,
    self_id: Option<String>,
    json_mode: bool,
) -> Result<(), FeedGraphError> {
    let mut pipeline = Pipeline::new(config);
    if let Some(id) = self_id {
        pipeline = pipeline.with_self_id(id);
    }

    let result = pipeline.try_run();
    let status = match &result {
        Ok(summary) => RunStatus::Success(summary.clone()),
        Err(e) => RunStatus::from(e),
    };

    if json_mode {
        let output = match &status {
            RunStatus::Success(s) => {
                let self_removed = match s.report.self_exclusion {
                    SelfExclusion::Removed { .. } => true,
                    SelfExclusion::Absent | SelfExclusion::Skipped => false,
                };
                serde_json::json!({
                    "success": true,
                    "artifact": s.artifact.to_string_lossy(),
                    "graph": s.graph_path.to_string_lossy(),
                    "node_count": s.nodes,
                    "edge_count": s.edges,
                    "relations": s.report.relations,
                    "nodes_added": s.report.nodes_added,
                    "edges_added": s.report.edges_added,
                    "self_removed": self_removed,
                    "skipped_rows": s.skipped_rows
                })
            }
            RunStatus::Failure { kind, message } => serde_json::json!({
                "success": false,
                "kind": kind,
                "error": message
            }),
        };
        print_json(&output);
    } else {
        println!("{}", status);
    }

    result.map(|_| ())
}

// =============================================================================
// STATUS COMMAND
// =============================================================================

/// Show persisted graph status.
pub fn cmd_status(config: &Config, json_mode: bool, top: usize) -> Result<(), FeedGraphError> {
    let graph = load_graph(config)?;
    let metrics = GraphMetrics::from_graph(&graph);
    let ranked = most_connected(&graph, top);

    if json_mode {
        let output = serde_json::json!({
            "graph": config.output.graph.to_string_lossy(),
            "metrics": metrics,
            "most_connected": ranked
                .iter()
                .map(|(label, degree)| serde_json::json!({ "label": label.as_str(), "degree": degree }))
                .collect::<Vec<_>>()
        });
        print_json(&output);
        return Ok(());
    }

    println!("Comment Network Status");
    println!("======================");
    println!("Graph: {:?}", config.output.graph);
    println!();
    println!("People:      {}", metrics.node_count);
    println!("Connections: {}", metrics.edge_count);
    println!("Isolated:    {}", metrics.isolated_count);
    println!("Max Degree:  {}", metrics.max_degree);
    println!(
        "Density:     {} per thousand",
        metrics.density_per_thousand
    );

    if !ranked.is_empty() {
        println!();
        println!("Most connected:");
        for (label, degree) in &ranked {
            println!("  {:>4}  {}", degree, label);
        }
    }

    Ok(())
}

// =============================================================================
// EXPORT COMMAND
// =============================================================================

/// Export the persisted graph.
pub fn cmd_export(config: &Config, output: &Path, format: &str) -> Result<(), FeedGraphError> {
    let validated_output = validate_output_path(output)?;
    let graph = load_graph(config)?;

    let data = match format {
        "canonical" => {
            let data = export_canonical(&graph)?;
            println!("Checksum: {}", canonical_checksum(&graph));
            data
        }
        "json" => export_json(&graph)?,
        "gexf" => export_gexf(&graph)?,
        _ => {
            return Err(FeedGraphError::SerializationError(format!(
                "Unknown format: {}. Use: canonical, json, gexf",
                format
            )));
        }
    };

    std::fs::write(&validated_output, &data)
        .map_err(|e| FeedGraphError::IoError(format!("Write file: {}", e)))?;

    println!("Exported {} bytes to {:?}", data.len(), validated_output);

    Ok(())
}

// =============================================================================
// RENDER COMMAND
// =============================================================================

/// Render the persisted graph without touching the export.
pub fn cmd_render(config: &Config, json_mode: bool) -> Result<(), FeedGraphError> {
    let graph = load_graph(config)?;
    let path = HtmlRenderer::new(&config.output.html).render(&graph)?;

    if json_mode {
        print_json(&serde_json::json!({
            "artifact": path.to_string_lossy(),
            "node_count": graph.node_count(),
            "edge_count": graph.edge_count()
        }));
    } else {
        println!("Rendered {} people to {:?}", graph.node_count(), path);
    }
    Ok(())
}

// =============================================================================
// INIT COMMAND
// =============================================================================

/// Write the default configuration file.
pub fn cmd_init(path: &Path, force: bool) -> Result<(), FeedGraphError> {
    if path.exists() && !force {
        return Err(FeedGraphError::InvalidConfig(format!(
            "'{}' already exists. Use --force to overwrite.",
            path.display()
        )));
    }

    std::fs::write(path, DEFAULT_CONFIG)
        .map_err(|e| FeedGraphError::IoError(format!("Write config: {}", e)))?;
    println!("Wrote default configuration to {:?}", path);

    Ok(())
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use feedgraph_core::Label;

    fn config_in(dir: &Path) -> Config {
        let mut config = Config::default();
        config.output.graph = dir.join("graph.fgx");
        config.output.html = dir.join("comment_network.html");
        config
    }

    #[test]
    fn export_rejects_missing_directory() {
        let dir = tempfile::tempdir().expect("tempdir");
        let config = config_in(dir.path());
        let target = dir.path().join("missing").join("out.fgx");

        assert!(cmd_export(&config, &target, "canonical").is_err());
    }

    #[test]
    fn export_rejects_unknown_format() {
        let dir = tempfile::tempdir().expect("tempdir");
        let config = config_in(dir.path());
        let result = cmd_export(&config, &dir.path().join("out.bin"), "xml");
        assert!(matches!(result, Err(FeedGraphError::SerializationError(_))));
    }

    #[test]
    fn export_json_writes_persisted_graph() {
        let dir = tempfile::tempdir().expect("tempdir");
        let config = config_in(dir.path());
        let mut graph = SocialGraph::new();
        graph.connect(&Label::new("u2"), &Label::new("u3"));
        GraphFile::new(&config.output.graph).save(&graph).expect("save");

        let target = dir.path().join("out.json");
        cmd_export(&config, &target, "json").expect("export");

        let value: serde_json::Value =
            serde_json::from_slice(&std::fs::read(target).expect("read")).expect("json");
        assert_eq!(value["nodes"].as_array().map(Vec::len), Some(2));
        assert_eq!(value["edges"].as_array().map(Vec::len), Some(1));
    }

    #[test]
    fn export_gexf_reads_back() {
        let dir = tempfile::tempdir().expect("tempdir");
        let config = config_in(dir.path());
        let mut graph = SocialGraph::new();
        graph.connect(&Label::new("u2"), &Label::new("Ann"));
        GraphFile::new(&config.output.graph).save(&graph).expect("save");

        let target = dir.path().join("graph.gexf");
        cmd_export(&config, &target, "gexf").expect("export");

        let restored = feedgraph_core::load_gexf(&target)
            .expect("load")
            .expect("present");
        assert_eq!(restored.edge_labels(), graph.edge_labels());
    }

    #[test]
    fn init_refuses_to_overwrite_without_force() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("feedgraph.toml");

        cmd_init(&path, false).expect("first init");
        assert!(cmd_init(&path, false).is_err());
        cmd_init(&path, true).expect("forced init");
        assert_eq!(std::fs::read_to_string(path).expect("read"), DEFAULT_CONFIG);
    }

    #[test]
    fn render_uses_configured_path() {
        let dir = tempfile::tempdir().expect("tempdir");
        let config = config_in(dir.path());
        cmd_render(&config, false).expect("render");
        assert!(config.output.html.exists());
    }
}

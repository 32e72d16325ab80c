//! # Visualization Sink
//!
//! Turns a finished graph into an interactive artifact.
//!
//! `HtmlRenderer` writes a standalone page driven by vis-network: an
//! undirected force layout with the physics controls shown, nodes sized by
//! degree. Graph data is embedded as JSON.

use crate::graph::SocialGraph;
use crate::persist::write_atomic;
use crate::primitives::RENDER_FILE;
use crate::FeedGraphError;
use serde::Serialize;
use std::path::{Path, PathBuf};

/// Something that can turn a graph into an artifact.
pub trait RenderSink {
    /// Produce the artifact and return where it was written.
    fn render(&self, graph: &SocialGraph) -> Result<PathBuf, FeedGraphError>;
}

const VIS_NETWORK_JS: &str =
    "https://unpkg.com/vis-network@9.1.9/standalone/umd/vis-network.min.js";

/// Writes a vis-network HTML page.
#[derive(Debug, Clone)]
pub struct HtmlRenderer {
    path: PathBuf,
    title: String,
    height: String,
}

impl Default for HtmlRenderer {
    fn default() -> Self {
        Self::new(RENDER_FILE)
    }
}

#[derive(Serialize)]
struct VisNode<'a> {
    id: u64,
    label: &'a str,
    title: String,
    value: usize,
}

#[derive(Serialize)]
struct VisEdge {
    from: u64,
    to: u64,
}

#[derive(Serialize)]
struct VisData<'a> {
    nodes: Vec<VisNode<'a>>,
    edges: Vec<VisEdge>,
}

impl HtmlRenderer {
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            title: "Comment Network".to_string(),
            height: "750px".to_string(),
        }
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Build the full HTML document for a graph.
    pub fn to_html(&self, graph: &SocialGraph) -> Result<String, FeedGraphError> {
        let data = VisData {
            nodes: graph
                .nodes()
                .map(|n| {
                    let degree = graph.degree(n.id);
                    VisNode {
                        id: n.id.0,
                        label: n.label.as_str(),
                        title: format!("{} ({} connections)", n.label, degree),
                        value: degree,
                    }
                })
                .collect(),
            edges: graph
                .edges()
                .map(|(a, b)| VisEdge { from: a.0, to: b.0 })
                .collect(),
        };

        let json = serde_json::to_string(&data)
            .map_err(|e| FeedGraphError::RenderFailed(e.to_string()))?;

        Ok(format!(
            r#"<!DOCTYPE html>
<html>
<head>
<meta charset="utf-8">
<title>{title}</title>
<script src="{script}"></script>
<style>
  body {{ margin: 0; font-family: sans-serif; }}
  #network {{ width: 100%; height: {height}; border: 1px solid lightgray; }}
  #config {{ padding: 8px; }}
</style>
</head>
<body>
<div id="network"></div>
<div id="config"></div>
<script type="text/javascript">
  var data = {data};
  var container = document.getElementById("network");
  var options = {{
    nodes: {{ shape: "dot", scaling: {{ min: 8, max: 40 }} }},
    edges: {{ smooth: false }},
    physics: {{ stabilization: {{ iterations: 200 }} }},
    configure: {{ enabled: true, filter: "physics", container: document.getElementById("config") }}
  }};
  var network = new vis.Network(container, {{
    nodes: new vis.DataSet(data.nodes),
    edges: new vis.DataSet(data.edges)
  }}, options);
</script>
</body>
</html>
"#,
            title = escape_html(&self.title),
            script = VIS_NETWORK_JS,
            height = escape_html(&self.height),
            data = escape_script(&json),
        ))
    }
}

impl RenderSink for HtmlRenderer {
    fn render(&self, graph: &SocialGraph) -> Result<PathBuf, FeedGraphError> {
        let html = self.to_html(graph)?;
        write_atomic(&self.path, html.as_bytes())
            .map_err(|e| FeedGraphError::RenderFailed(e.to_string()))?;
        Ok(self.path.clone())
    }
}

/// Keep embedded JSON from closing the surrounding `<script>` element.
fn escape_script(json: &str) -> String {
    json.replace("</", "<\\/").replace("<!--", "<\\!--")
}

fn escape_html(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

// =============================================================================
// TESTS
// =============================================================================

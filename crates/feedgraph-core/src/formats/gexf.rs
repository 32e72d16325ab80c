//! GEXF 1.2 interchange, as written and read by networkx and Gephi.
//!
//! Node ids are the labels themselves, so a file written here loads in
//! networkx with the same node keys, and a networkx-written `graph.gexf`
//! can seed a fresh persisted graph.
//!
//! Import accepts only undirected graphs. A node's `label` attribute wins
//! over its `id`; edges must reference declared nodes.

use crate::graph::SocialGraph;
use crate::{FeedGraphError, Label};
use quick_xml::escape::escape;
use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;
use std::collections::BTreeMap;

const GEXF_NAMESPACE: &str = "http://www.gexf.net/1.2draft";

/// Write a graph as a GEXF document.
pub fn export_gexf(graph: &SocialGraph) -> Result<Vec<u8>, FeedGraphError> {
    let mut out = String::new();
    out.push_str("<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n");
    out.push_str(&format!(
        "<gexf xmlns=\"{}\" version=\"1.2\">\n",
        GEXF_NAMESPACE
    ));
    out.push_str(&format!(
        "  <meta>\n    <creator>feedgraph {}</creator>\n  </meta>\n",
        env!("CARGO_PKG_VERSION")
    ));
    out.push_str("  <graph defaultedgetype=\"undirected\" mode=\"static\">\n");

    out.push_str("    <nodes>\n");
    for node in graph.nodes() {
        let label = escape(node.label.as_str());
        out.push_str(&format!(
            "      <node id=\"{}\" label=\"{}\" />\n",
            label, label
        ));
    }
    out.push_str("    </nodes>\n");

    out.push_str("    <edges>\n");
    for (index, (a, b)) in graph.edges().enumerate() {
        let (Some(a), Some(b)) = (graph.node(a), graph.node(b)) else {
            return Err(FeedGraphError::SerializationError(
                "edge references a missing node".to_string(),
            ));
        };
        out.push_str(&format!(
            "      <edge id=\"{}\" source=\"{}\" target=\"{}\" />\n",
            index,
            escape(a.label.as_str()),
            escape(b.label.as_str())
        ));
    }
    out.push_str("    </edges>\n");

    out.push_str("  </graph>\n</gexf>\n");
    Ok(out.into_bytes())
}

/// Read a GEXF document into a graph.
///
/// Every failure is `CorruptPersistedState`: a GEXF file is only read as
/// prior state.
pub fn import_gexf(data: &[u8]) -> Result<SocialGraph, FeedGraphError> {
    let text = std::str::from_utf8(data).map_err(|e| corrupt(format!("not UTF-8: {}", e)))?;
    let mut reader = Reader::from_str(text);
    reader.config_mut().trim_text(true);

    let mut graph = SocialGraph::new();
    let mut labels: BTreeMap<String, Label> = BTreeMap::new();
    let mut saw_graph = false;

    loop {
        let event = reader
            .read_event()
            .map_err(|e| corrupt(format!("at byte {}: {}", reader.buffer_position(), e)))?;
        match event {
            Event::Start(e) | Event::Empty(e) => match e.local_name().as_ref() {
                b"graph" => {
                    saw_graph = true;
                    if let Some(kind) = attribute(&e, b"defaultedgetype")? {
                        if kind == "directed" {
                            return Err(corrupt("directed graphs are not supported"));
                        }
                    }
                }
                b"node" => {
                    let id = attribute(&e, b"id")?.ok_or_else(|| corrupt("node without id"))?;
                    let label = Label::new(attribute(&e, b"label")?.unwrap_or_else(|| id.clone()));
                    if graph.contains_label(&label) {
                        return Err(corrupt(format!("duplicate node label '{}'", label)));
                    }
                    graph.ensure_node(&label);
                    if labels.insert(id.clone(), label).is_some() {
                        return Err(corrupt(format!("duplicate node id '{}'", id)));
                    }
                }
                b"edge" => {
                    let source = endpoint(&e, b"source", &labels)?;
                    let target = endpoint(&e, b"target", &labels)?;
                    graph.connect(&source, &target);
                }
                _ => {}
            },
            Event::Eof => break,
            _ => {}
        }
    }

    if !saw_graph {
        return Err(corrupt("no <graph> element"));
    }
    Ok(graph)
}

fn attribute(element: &BytesStart<'_>, name: &[u8]) -> Result<Option<String>, FeedGraphError> {
    let Some(attr) = element
        .try_get_attribute(name)
        .map_err(|e| corrupt(e.to_string()))?
    else {
        return Ok(None);
    };
    let value = attr.unescape_value().map_err(|e| corrupt(e.to_string()))?;
    Ok(Some(value.into_owned()))
}

fn endpoint(
    element: &BytesStart<'_>,
    name: &[u8],
    labels: &BTreeMap<String, Label>,
) -> Result<Label, FeedGraphError> {
    let id = attribute(element, name)?.ok_or_else(|| corrupt("edge without endpoint"))?;
    labels
        .get(&id)
        .cloned()
        .ok_or_else(|| corrupt(format!("edge references unknown node '{}'", id)))
}

fn corrupt(msg: impl Into<String>) -> FeedGraphError {
    FeedGraphError::CorruptPersistedState(format!("GEXF {}", msg.into()))
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    /// Shape of a file written by networkx `write_gexf`.
    const NETWORKX_GEXF: &str = r#"<?xml version='1.0' encoding='utf-8'?>
<gexf xmlns="http://www.gexf.net/1.2draft" xmlns:xsi="http://www.w3.org/2001/XMLSchema-instance" xsi:schemaLocation="http://www.gexf.net/1.2draft http://www.gexf.net/1.2draft/gexf.xsd" version="1.2">
  <meta lastmodifieddate="2024-05-01">
    <creator>NetworkX 3.2</creator>
  </meta>
  <graph defaultedgetype="undirected" mode="static" name="">
    <nodes>
      <node id="Ann" label="Ann" />
      <node id="u2" label="u2" />
      <node id="u3" label="u3" />
    </nodes>
    <edges>
      <edge source="u2" target="Ann" id="0" />
      <edge source="u3" target="Ann" id="1" />
    </edges>
  </graph>
</gexf>
"#;

    #[test]
    fn reads_networkx_output() {
        let graph = import_gexf(NETWORKX_GEXF.as_bytes()).expect("import");
        assert_eq!(graph.node_count(), 3);
        assert!(graph.contains_edge(&Label::new("u2"), &Label::new("Ann")));
        assert!(graph.contains_edge(&Label::new("Ann"), &Label::new("u3")));
    }

    #[test]
    fn export_then_import_keeps_network() {
        let mut graph = SocialGraph::new();
        graph.connect(&Label::new("Tom & \"Jerry\""), &Label::new("<b>"));
        graph.connect(&Label::new("solo"), &Label::new("solo"));
        graph.ensure_node(&Label::new("loner"));

        let bytes = export_gexf(&graph).expect("export");
        let text = String::from_utf8(bytes.clone()).expect("utf8");
        assert!(text.contains("defaultedgetype=\"undirected\""));
        assert!(text.contains("Tom &amp; &quot;Jerry&quot;"));

        let restored = import_gexf(&bytes).expect("import");
        assert_eq!(restored.labels(), graph.labels());
        assert_eq!(restored.edge_labels(), graph.edge_labels());
    }

    #[test]
    fn label_attribute_wins_over_id() {
        let doc = r#"<gexf><graph><nodes>
            <node id="n0" label="Ann"/><node id="n1"/>
        </nodes><edges><edge source="n0" target="n1"/></edges></graph></gexf>"#;
        let graph = import_gexf(doc.as_bytes()).expect("import");
        assert!(graph.contains_edge(&Label::new("Ann"), &Label::new("n1")));
    }

    #[test]
    fn unknown_edge_endpoint_is_corrupt() {
        let doc = r#"<gexf><graph><nodes><node id="a"/></nodes>
            <edges><edge source="a" target="zz"/></edges></graph></gexf>"#;
        let err = import_gexf(doc.as_bytes()).expect_err("dangling");
        assert!(matches!(err, FeedGraphError::CorruptPersistedState(_)));
    }

    #[test]
    fn directed_graph_is_rejected() {
        let doc = r#"<gexf><graph defaultedgetype="directed"><nodes/></graph></gexf>"#;
        assert!(import_gexf(doc.as_bytes()).is_err());
    }

    #[test]
    fn malformed_xml_is_corrupt() {
        let err = import_gexf(b"<gexf><graph><nodes><node id=").expect_err("bad xml");
        assert!(matches!(err, FeedGraphError::CorruptPersistedState(_)));
    }
}

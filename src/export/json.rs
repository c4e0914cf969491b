//! JSON export implementation.
//!
//! Exports the forest as nested trees for machine-readable output.
//!
//! Trees are converted and serialized recursively, so nesting depth is
//! limited by the stack of the calling thread. Use DOT output for very deep
//! dependency chains.

use super::Exporter;
use crate::graph::{Forest, NodeId};
use serde::Serialize;
use std::io::{self, Write};

/// JSON exporter implementation.
pub struct JsonExporter;

/// Serializable node for JSON output.
#[derive(Serialize)]
struct JsonNode<'a> {
    key: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    path: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    children: Vec<JsonNode<'a>>,
}

/// Summary statistics for JSON output.
#[derive(Serialize)]
struct JsonSummary {
    roots: usize,
    nodes: usize,
    edges: usize,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    cycles: Vec<String>,
}

/// Root JSON export structure.
#[derive(Serialize)]
struct JsonExport<'a> {
    summary: JsonSummary,
    roots: Vec<JsonNode<'a>>,
}

fn to_json_node(forest: &Forest, id: NodeId) -> JsonNode<'_> {
    let node = forest.node(id);
    JsonNode {
        key: node.key(),
        path: node.path().map(|p| p.display().to_string()),
        children: node
            .children()
            .iter()
            .map(|&child| to_json_node(forest, child))
            .collect(),
    }
}

impl Exporter for JsonExporter {
    fn export<W: Write>(&self, forest: &Forest, writer: &mut W) -> io::Result<()> {
        let export = JsonExport {
            summary: JsonSummary {
                roots: forest.roots().len(),
                nodes: forest.node_count(),
                edges: forest.edge_count(),
                cycles: forest
                    .detect_cycles()
                    .iter()
                    .map(|c| c.cycle_path())
                    .collect(),
            },
            roots: forest
                .roots()
                .iter()
                .map(|&root| to_json_node(forest, root))
                .collect(),
        };

        serde_json::to_writer_pretty(&mut *writer, &export)?;
        writeln!(writer)?;
        Ok(())
    }
}

//! Graphviz DOT export implementation.
//!
//! Each statement goes on its own line between a fixed header and footer.
//! Roots with children contribute one `"parent" -> "child"` statement per
//! link in their tree; childless roots contribute a bare `"key"` statement.
//! Keys are wrapped in double quotes and otherwise written as-is.

use super::Exporter;
use crate::graph::{Forest, NodeId, VisitState, VisitedTable};
use std::io::{self, Write};

/// Opening line of every document.
pub const HEADER: &str = "digraph modules { concentrate=true; size=\"30,40\"; ";

/// Closing line of every document.
pub const FOOTER: &str = " } ";

/// DOT exporter implementation.
pub struct DotExporter;

impl Exporter for DotExporter {
    fn export<W: Write>(&self, forest: &Forest, writer: &mut W) -> io::Result<()> {
        writeln!(writer, "{HEADER}")?;

        let mut visited = VisitedTable::new(forest.nodes().map(|n| n.key()));
        for &root in forest.roots() {
            let node = forest.node(root);
            if node.has_children() {
                write_edges(forest, root, &mut visited, writer)?;
            } else {
                writeln!(writer, "{}", format_single(node.key()))?;
            }
        }

        writeln!(writer, "{FOOTER}")
    }
}

/// Writes the edges of `root`'s subtree, descending into each key once.
///
/// The walk keeps its own stack so deep chains do not grow the call stack.
fn write_edges<W: Write>(
    forest: &Forest,
    root: NodeId,
    visited: &mut VisitedTable,
    writer: &mut W,
) -> io::Result<()> {
    let key = forest.node(root).key();
    visited.mark(key, VisitState::Visited);
    let mut stack = vec![(key, forest.children(root))];

    while let Some(top) = stack.last_mut() {
        let parent = top.0;
        let Some((child_id, child)) = top.1.next() else {
            stack.pop();
            continue;
        };

        writeln!(writer, "{}", format_edge(parent, child.key()))?;
        if visited.is_unvisited(child.key()) {
            visited.mark(child.key(), VisitState::Visited);
            stack.push((child.key(), forest.children(child_id)));
        }
    }

    Ok(())
}

/// Formats a `"parent" -> "child"` statement.
pub fn format_edge(parent: &str, child: &str) -> String {
    format!("\"{parent}\" -> \"{child}\"")
}

/// Formats a single-node statement.
pub fn format_single(key: &str) -> String {
    format!("\"{key}\"")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::export::{export_to_string, ExportFormat};
    use crate::graph::GraphBuilder;
    use crate::parser::Registry;
    use std::collections::HashMap;
    use std::path::PathBuf;

    fn render(modules: &[(&str, Vec<&str>)]) -> String {
        let registry: Registry = modules
            .iter()
            .map(|(key, _)| (*key, format!("{key}.js")))
            .collect();
        let source: HashMap<PathBuf, Vec<String>> = modules
            .iter()
            .map(|(key, deps)| {
                (
                    PathBuf::from(format!("{key}.js")),
                    deps.iter().map(|d| d.to_string()).collect(),
                )
            })
            .collect();

        let forest = GraphBuilder::new(&registry, &source).build().unwrap();
        export_to_string(ExportFormat::Dot, &forest).unwrap()
    }

    fn body(document: &str) -> Vec<&str> {
        let lines: Vec<&str> = document.lines().collect();
        assert_eq!(lines.first(), Some(&HEADER));
        assert_eq!(lines.last(), Some(&FOOTER));
        lines[1..lines.len() - 1].to_vec()
    }

    #[test]
    fn test_format_edge() {
        assert_eq!(format_edge("a", "b"), "\"a\" -> \"b\"");
        assert_eq!(format_single("x"), "\"x\"");
    }

    #[test]
    fn test_single_root_without_dependencies() {
        let output = render(&[("x", vec![])]);
        assert_eq!(body(&output), vec!["\"x\""]);
    }

    #[test]
    fn test_edge_per_dependency() {
        let output = render(&[("a", vec!["b", "c"]), ("b", vec!["c"]), ("c", vec![])]);
        assert_eq!(
            body(&output),
            vec!["\"a\" -> \"b\"", "\"b\" -> \"c\"", "\"a\" -> \"c\""]
        );
    }

    #[test]
    fn test_two_cycle_closes() {
        let output = render(&[("a", vec!["b"]), ("b", vec!["a"])]);
        assert_eq!(body(&output), vec!["\"a\" -> \"b\"", "\"b\" -> \"a\""]);
    }

    #[test]
    fn test_mixed_roots() {
        let output = render(&[("lonely", vec![]), ("a", vec!["ext/lib"])]);
        assert_eq!(body(&output), vec!["\"lonely\"", "\"a\" -> \"ext/lib\""]);
    }

    #[test]
    fn test_root_reached_later_renders_as_leaf_edge() {
        let output = render(&[("b", vec![]), ("a", vec!["b"])]);
        assert_eq!(body(&output), vec!["\"b\"", "\"a\" -> \"b\""]);
    }

    #[test]
    fn test_shared_dependency_edges_once() {
        let output = render(&[
            ("app", vec!["left", "right"]),
            ("left", vec!["shared"]),
            ("right", vec!["shared"]),
            ("shared", vec!["leaf"]),
            ("leaf", vec![]),
        ]);
        assert_eq!(
            body(&output),
            vec![
                "\"app\" -> \"left\"",
                "\"left\" -> \"shared\"",
                "\"shared\" -> \"leaf\"",
                "\"app\" -> \"right\"",
                "\"right\" -> \"shared\"",
            ]
        );
    }

    #[test]
    fn test_render_is_idempotent() {
        let modules = [("a", vec!["b", "c"]), ("b", vec!["a"]), ("c", vec!["b"])];
        assert_eq!(render(&modules), render(&modules));
    }

    #[test]
    fn test_long_chain_renders() {
        let keys: Vec<String> = (0..10_000).map(|i| format!("m{i}")).collect();
        let modules: Vec<(&str, Vec<&str>)> = keys
            .iter()
            .enumerate()
            .map(|(i, key)| (key.as_str(), keys.get(i + 1).map(String::as_str).into_iter().collect()))
            .collect();

        let output = render(&modules);
        let lines = body(&output);

        assert_eq!(lines.len(), 9_999);
        assert_eq!(lines[0], "\"m0\" -> \"m1\"");
        assert_eq!(lines[9_998], "\"m9998\" -> \"m9999\"");
    }
}

//! Arena-backed dependency forest.
//!
//! Every [`DependencyNode`] lives in a single `Vec` owned by the [`Forest`];
//! parents refer to their children by [`NodeId`]. The forest is a tree-shaped
//! unrolling of the module graph: a key that is referenced several times is
//! expanded once, and every other reference is a separate childless node.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use petgraph::algo::tarjan_scc;
use petgraph::graph::{DiGraph, NodeIndex};

/// Index of a node inside a [`Forest`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(usize);

/// A module reached during traversal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DependencyNode {
    key: String,
    path: Option<PathBuf>,
    children: Vec<NodeId>,
}

impl DependencyNode {
    fn new(key: String, path: Option<PathBuf>) -> Self {
        Self {
            key,
            path,
            children: Vec::new(),
        }
    }

    /// Module key this node stands for.
    pub fn key(&self) -> &str {
        &self.key
    }

    /// Source file of the module, or `None` for a dangling reference.
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// Child node ids in declaration order.
    pub fn children(&self) -> &[NodeId] {
        &self.children
    }

    /// Returns true if this node has children.
    pub fn has_children(&self) -> bool {
        !self.children.is_empty()
    }

    /// Returns true if the key has no registry entry.
    pub fn is_dangling(&self) -> bool {
        self.path.is_none()
    }
}

/// Information about a detected circular dependency.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CycleInfo {
    /// Module keys in the cycle, in first-seen order
    pub keys: Vec<String>,
}

impl CycleInfo {
    /// Returns a formatted string representation of the cycle.
    ///
    /// For example: "a -> b -> c -> a"
    pub fn cycle_path(&self) -> String {
        let Some(first) = self.keys.first() else {
            return String::new();
        };
        format!("{} -> {}", self.keys.join(" -> "), first)
    }

    /// Returns the number of modules in the cycle.
    pub fn len(&self) -> usize {
        self.keys.len()
    }

    /// Returns true if the cycle is empty (should not happen in practice).
    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }
}

/// The ordered roots of one build pass plus the arena holding all nodes.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Forest {
    nodes: Vec<DependencyNode>,
    roots: Vec<NodeId>,
}

impl Forest {
    /// Creates an empty forest.
    pub fn new() -> Self {
        Self::default()
    }

    /// Allocates a node that is not yet attached anywhere.
    pub(crate) fn add_node(&mut self, key: impl Into<String>, path: Option<PathBuf>) -> NodeId {
        let id = NodeId(self.nodes.len());
        self.nodes.push(DependencyNode::new(key.into(), path));
        id
    }

    /// Appends `child` to `parent`'s child list.
    pub(crate) fn add_child(&mut self, parent: NodeId, child: NodeId) {
        self.nodes[parent.0].children.push(child);
    }

    /// Appends `root` to the root list.
    pub(crate) fn add_root(&mut self, root: NodeId) {
        self.roots.push(root);
    }

    /// Returns the node with the given id.
    ///
    /// # Panics
    ///
    /// Panics if `id` does not belong to this forest.
    pub fn node(&self, id: NodeId) -> &DependencyNode {
        &self.nodes[id.0]
    }

    /// Root ids in traversal order.
    pub fn roots(&self) -> &[NodeId] {
        &self.roots
    }

    /// Iterates the children of a node.
    pub fn children(&self, id: NodeId) -> impl Iterator<Item = (NodeId, &DependencyNode)> {
        self.node(id)
            .children
            .iter()
            .map(move |&child| (child, self.node(child)))
    }

    /// Iterates every node in allocation order.
    pub fn nodes(&self) -> impl Iterator<Item = &DependencyNode> {
        self.nodes.iter()
    }

    /// Total number of nodes, including leaves for repeated references.
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Total number of parent/child links.
    pub fn edge_count(&self) -> usize {
        self.nodes.iter().map(|n| n.children.len()).sum()
    }

    /// Returns true if the forest has no roots.
    pub fn is_empty(&self) -> bool {
        self.roots.is_empty()
    }

    /// Collapses the forest back into a key-level graph.
    ///
    /// Each distinct key becomes one graph node and each distinct
    /// (parent key, child key) pair one edge.
    pub fn key_graph(&self) -> DiGraph<String, ()> {
        let mut graph = DiGraph::new();
        let mut indices: HashMap<&str, NodeIndex> = HashMap::new();

        for node in &self.nodes {
            let from = *indices
                .entry(node.key.as_str())
                .or_insert_with(|| graph.add_node(node.key.clone()));

            for &child in &node.children {
                let child_key = self.nodes[child.0].key.as_str();
                let to = *indices
                    .entry(child_key)
                    .or_insert_with(|| graph.add_node(child_key.to_string()));
                graph.update_edge(from, to, ());
            }
        }

        graph
    }

    /// Detects circular dependencies between module keys.
    ///
    /// Uses Tarjan's strongly connected components on [`Self::key_graph`].
    /// Components with more than one key, and keys depending on themselves,
    /// are reported.
    pub fn detect_cycles(&self) -> Vec<CycleInfo> {
        let graph = self.key_graph();
        let mut cycles = Vec::new();

        for mut scc in tarjan_scc(&graph) {
            let is_cycle = scc.len() > 1 || graph.contains_edge(scc[0], scc[0]);
            if !is_cycle {
                continue;
            }

            scc.sort();
            cycles.push(CycleInfo {
                keys: scc.iter().map(|&idx| graph[idx].clone()).collect(),
            });
        }

        cycles.sort_by(|a, b| a.keys.cmp(&b.keys));
        cycles
    }
}

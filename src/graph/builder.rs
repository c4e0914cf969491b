//! Depth-first construction of the dependency forest.

use std::collections::HashMap;

use tracing::{debug, info};

use super::forest::{Forest, NodeId};
use crate::error::Result;
use crate::parser::{DependencySource, Registry};

/// Traversal state of a module key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum VisitState {
    /// Not reached yet
    #[default]
    Unvisited,
    /// Expansion started but not finished; a reference now closes a cycle
    InProgress,
    /// Fully expanded
    Visited,
}

/// Per-pass visit state for a fixed set of keys.
///
/// Keys outside the set (dangling references) have no state and are never
/// expanded.
#[derive(Debug, Clone, Default)]
pub struct VisitedTable {
    states: HashMap<String, VisitState>,
}

impl VisitedTable {
    /// Creates a table with every key `Unvisited`.
    pub fn new<'a>(keys: impl IntoIterator<Item = &'a str>) -> Self {
        Self {
            states: keys
                .into_iter()
                .map(|k| (k.to_string(), VisitState::Unvisited))
                .collect(),
        }
    }

    /// State of `key`, or `None` if the key is not tracked.
    pub fn state(&self, key: &str) -> Option<VisitState> {
        self.states.get(key).copied()
    }

    /// Returns true if `key` is tracked and not yet reached.
    pub fn is_unvisited(&self, key: &str) -> bool {
        self.state(key) == Some(VisitState::Unvisited)
    }

    /// Sets the state of a tracked key. Untracked keys are ignored.
    pub fn mark(&mut self, key: &str, state: VisitState) {
        if let Some(current) = self.states.get_mut(key) {
            *current = state;
        }
    }

    /// Number of tracked keys.
    pub fn len(&self) -> usize {
        self.states.len()
    }

    /// Returns true if no keys are tracked.
    pub fn is_empty(&self) -> bool {
        self.states.is_empty()
    }
}

/// Counters collected during one build pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BuildStats {
    /// Trees in the forest
    pub roots: usize,
    /// Nodes allocated, including unexpanded repeats
    pub nodes: usize,
    /// Modules whose declaration header was read
    pub expansions: usize,
    /// References to keys missing from the registry
    pub dangling: usize,
    /// References back to a module still being expanded
    pub back_edges: usize,
}

/// Builds a [`Forest`] from a registry and a dependency source.
///
/// Each registry key is expanded at most once. A key is expanded where it is
/// first reached; every later reference, including one that closes a cycle,
/// becomes a childless node.
///
/// # Example
///
/// ```rust
/// use std::collections::HashMap;
/// use std::path::PathBuf;
/// use modgraph::graph::GraphBuilder;
/// use modgraph::parser::Registry;
///
/// let registry: Registry = [("a", "a.js"), ("b", "b.js")].into_iter().collect();
/// let mut source = HashMap::new();
/// source.insert(PathBuf::from("a.js"), vec!["b".to_string()]);
///
/// let forest = GraphBuilder::new(&registry, &source).build().unwrap();
/// assert_eq!(forest.roots().len(), 1);
/// assert_eq!(forest.edge_count(), 1);
/// ```
pub struct GraphBuilder<'a, S: DependencySource> {
    registry: &'a Registry,
    source: &'a S,
}

impl<'a, S: DependencySource> GraphBuilder<'a, S> {
    /// Creates a builder over `registry`, reading dependencies via `source`.
    pub fn new(registry: &'a Registry, source: &'a S) -> Self {
        Self { registry, source }
    }

    /// Runs one build pass.
    pub fn build(&self) -> Result<Forest> {
        self.build_with_stats().map(|(forest, _)| forest)
    }

    /// Runs one build pass and reports traversal counters.
    pub fn build_with_stats(&self) -> Result<(Forest, BuildStats)> {
        let mut forest = Forest::new();
        let mut visited = VisitedTable::new(self.registry.keys());
        let mut stats = BuildStats::default();

        for entry in self.registry {
            if !visited.is_unvisited(&entry.key) {
                continue;
            }

            let root = forest.add_node(entry.key.as_str(), Some(entry.path.clone()));
            forest.add_root(root);
            self.expand(&mut forest, root, &mut visited, &mut stats)?;
        }

        stats.roots = forest.roots().len();
        stats.nodes = forest.node_count();
        info!(
            "Built {} roots, {} nodes from {} modules",
            stats.roots,
            stats.nodes,
            self.registry.len()
        );

        Ok((forest, stats))
    }

    /// Expands the subtree under `root` with an explicit stack of open
    /// modules, so chain depth is bounded by memory rather than the call
    /// stack.
    fn expand(
        &self,
        forest: &mut Forest,
        root: NodeId,
        visited: &mut VisitedTable,
        stats: &mut BuildStats,
    ) -> Result<()> {
        let mut stack: Vec<Expansion> = Vec::new();
        stack.extend(self.open(forest, root, visited, stats)?);

        while let Some(top) = stack.last_mut() {
            let Some(dep) = top.deps.next() else {
                visited.mark(&top.key, VisitState::Visited);
                stack.pop();
                continue;
            };

            let dep_path = self.registry.get(&dep).map(|p| p.to_path_buf());
            if dep_path.is_none() {
                debug!("'{}' depends on unregistered '{}'", top.key, dep);
                stats.dangling += 1;
            }

            let child = forest.add_node(dep.as_str(), dep_path);
            forest.add_child(top.id, child);

            match visited.state(&dep) {
                Some(VisitState::Unvisited) => {
                    stack.extend(self.open(forest, child, visited, stats)?);
                }
                Some(VisitState::InProgress) => {
                    debug!("Cycle closed by '{}' -> '{}'", top.key, dep);
                    stats.back_edges += 1;
                }
                Some(VisitState::Visited) | None => {}
            }
        }

        Ok(())
    }

    /// Marks `id`'s module in progress and reads its declarations.
    ///
    /// Returns `None` for keys without a registry entry.
    fn open(
        &self,
        forest: &Forest,
        id: NodeId,
        visited: &mut VisitedTable,
        stats: &mut BuildStats,
    ) -> Result<Option<Expansion>> {
        let key = forest.node(id).key();
        let Some(path) = self.registry.get(key) else {
            return Ok(None);
        };

        visited.mark(key, VisitState::InProgress);
        stats.expansions += 1;

        Ok(Some(Expansion {
            id,
            key: key.to_string(),
            deps: self.source.dependencies(path)?.into_iter(),
        }))
    }
}

/// A module whose dependencies are still being attached.
struct Expansion {
    id: NodeId,
    key: String,
    deps: std::vec::IntoIter<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    /// Registry of `key -> key.js` plus matching in-memory declarations.
    fn fixture(
        modules: &[(&str, Vec<&str>)],
    ) -> (Registry, HashMap<PathBuf, Vec<String>>) {
        let registry: Registry = modules
            .iter()
            .map(|(key, _)| (*key, format!("{key}.js")))
            .collect();
        let source = modules
            .iter()
            .map(|(key, deps)| {
                (
                    PathBuf::from(format!("{key}.js")),
                    deps.iter().map(|d| d.to_string()).collect(),
                )
            })
            .collect();
        (registry, source)
    }

    fn child_keys<'f>(forest: &'f Forest, id: NodeId) -> Vec<&'f str> {
        forest.children(id).map(|(_, n)| n.key()).collect()
    }

    fn root_keys(forest: &Forest) -> Vec<&str> {
        forest
            .roots()
            .iter()
            .map(|&id| forest.node(id).key())
            .collect()
    }

    #[test]
    fn test_visited_table() {
        let mut table = VisitedTable::new(["a", "b"]);
        assert_eq!(table.len(), 2);
        assert!(table.is_unvisited("a"));
        assert_eq!(table.state("zzz"), None);
        assert!(!table.is_unvisited("zzz"));

        table.mark("a", VisitState::InProgress);
        table.mark("zzz", VisitState::Visited);
        assert_eq!(table.state("a"), Some(VisitState::InProgress));
        assert_eq!(table.state("zzz"), None);
    }

    #[test]
    fn test_empty_registry() {
        let (registry, source) = fixture(&[]);
        let (forest, stats) = GraphBuilder::new(&registry, &source)
            .build_with_stats()
            .unwrap();
        assert!(forest.is_empty());
        assert_eq!(stats, BuildStats::default());
    }

    #[test]
    fn test_simple_chain() {
        let (registry, source) = fixture(&[("a", vec!["b"]), ("b", vec![])]);
        let forest = GraphBuilder::new(&registry, &source).build().unwrap();

        assert_eq!(root_keys(&forest), vec!["a"]);
        let a = forest.roots()[0];
        assert_eq!(child_keys(&forest, a), vec!["b"]);
    }

    #[test]
    fn test_later_key_becomes_root_when_not_reached() {
        let (registry, source) = fixture(&[("b", vec![]), ("a", vec!["b"])]);
        let forest = GraphBuilder::new(&registry, &source).build().unwrap();

        // b is iterated before a reaches it, so both are roots
        assert_eq!(root_keys(&forest), vec!["b", "a"]);
        assert!(!forest.node(forest.roots()[0]).has_children());
        assert_eq!(child_keys(&forest, forest.roots()[1]), vec!["b"]);
    }

    #[test]
    fn test_shared_dependency_expanded_once() {
        let (registry, source) = fixture(&[
            ("app", vec!["left", "right"]),
            ("left", vec!["shared"]),
            ("right", vec!["shared"]),
            ("shared", vec!["leaf"]),
            ("leaf", vec![]),
        ]);
        let (forest, stats) = GraphBuilder::new(&registry, &source)
            .build_with_stats()
            .unwrap();

        assert_eq!(root_keys(&forest), vec!["app"]);
        assert_eq!(stats.expansions, 5);

        let shared: Vec<_> = forest.nodes().filter(|n| n.key() == "shared").collect();
        assert_eq!(shared.len(), 2);
        assert_eq!(shared.iter().filter(|n| n.has_children()).count(), 1);
    }

    #[test]
    fn test_two_cycle_terminates() {
        let (registry, source) = fixture(&[("a", vec!["b"]), ("b", vec!["a"])]);
        let (forest, stats) = GraphBuilder::new(&registry, &source)
            .build_with_stats()
            .unwrap();

        assert_eq!(root_keys(&forest), vec!["a"]);
        let a = forest.roots()[0];
        let (b, _) = forest.children(a).next().unwrap();
        assert_eq!(child_keys(&forest, b), vec!["a"]);
        assert_eq!(stats.back_edges, 1);
        assert_eq!(stats.expansions, 2);
    }

    #[test]
    fn test_self_dependency_terminates() {
        let (registry, source) = fixture(&[("a", vec!["a"])]);
        let (forest, stats) = GraphBuilder::new(&registry, &source)
            .build_with_stats()
            .unwrap();

        assert_eq!(forest.node_count(), 2);
        assert_eq!(stats.back_edges, 1);
    }

    #[test]
    fn test_dangling_reference_is_leaf() {
        let (registry, source) = fixture(&[("a", vec!["jquery", "b"]), ("b", vec![])]);
        let (forest, stats) = GraphBuilder::new(&registry, &source)
            .build_with_stats()
            .unwrap();

        let a = forest.roots()[0];
        assert_eq!(child_keys(&forest, a), vec!["jquery", "b"]);
        let (_, jquery) = forest.children(a).next().unwrap();
        assert!(jquery.is_dangling());
        assert!(!jquery.has_children());
        assert_eq!(stats.dangling, 1);
    }

    #[test]
    fn test_duplicate_dependencies_kept() {
        let (registry, source) = fixture(&[("a", vec!["b", "b"]), ("b", vec!["c"]), ("c", vec![])]);
        let forest = GraphBuilder::new(&registry, &source).build().unwrap();

        let a = forest.roots()[0];
        let children: Vec<_> = forest.children(a).collect();
        assert_eq!(children.len(), 2);
        assert!(children[0].1.has_children());
        assert!(!children[1].1.has_children());
    }

    #[test]
    fn test_build_is_repeatable() {
        let (registry, source) = fixture(&[("a", vec!["b"]), ("b", vec!["a", "c"]), ("c", vec![])]);
        let builder = GraphBuilder::new(&registry, &source);
        assert_eq!(builder.build().unwrap(), builder.build().unwrap());
    }

    #[test]
    fn test_long_chain_builds() {
        let keys: Vec<String> = (0..10_000).map(|i| format!("m{i}")).collect();
        let modules: Vec<(&str, Vec<&str>)> = keys
            .iter()
            .enumerate()
            .map(|(i, key)| (key.as_str(), keys.get(i + 1).map(String::as_str).into_iter().collect()))
            .collect();
        let (registry, source) = fixture(&modules);

        let (forest, stats) = GraphBuilder::new(&registry, &source)
            .build_with_stats()
            .unwrap();

        assert_eq!(root_keys(&forest), vec!["m0"]);
        assert_eq!(stats.expansions, 10_000);
        assert_eq!(forest.node_count(), 10_000);
        assert_eq!(forest.edge_count(), 9_999);
    }
}

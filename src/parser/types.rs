//! Shared types for registry scanning.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

/// A module key and the source file it was resolved to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegistryEntry {
    /// Declared module key (e.g., "model/todo")
    pub key: String,
    /// Resolved source file (e.g., "app/modules/todo_model.coffee")
    pub path: PathBuf,
}

impl RegistryEntry {
    /// Creates a new registry entry.
    pub fn new(key: impl Into<String>, path: impl Into<PathBuf>) -> Self {
        Self {
            key: key.into(),
            path: path.into(),
        }
    }
}

/// Ordered mapping from module key to source file.
///
/// Iteration follows the order in which keys were first seen. Inserting a
/// key that already exists replaces its path but keeps its position.
///
/// # Example
///
/// ```rust
/// use modgraph::parser::Registry;
///
/// let mut registry = Registry::new();
/// registry.insert("b", "b.js");
/// registry.insert("a", "a.js");
/// registry.insert("b", "b.coffee");
///
/// let keys: Vec<&str> = registry.keys().collect();
/// assert_eq!(keys, vec!["b", "a"]);
/// assert_eq!(registry.get("b").unwrap().to_str(), Some("b.coffee"));
/// ```
#[derive(Debug, Clone, Default)]
pub struct Registry {
    entries: Vec<RegistryEntry>,
    /// Maps keys to their position in `entries`
    index: HashMap<String, usize>,
}

impl Registry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Records `key` at `path`, overwriting any earlier path for the key.
    ///
    /// Returns the previous path if the key was already present.
    pub fn insert(&mut self, key: impl Into<String>, path: impl Into<PathBuf>) -> Option<PathBuf> {
        let key = key.into();
        let path = path.into();

        if let Some(&pos) = self.index.get(&key) {
            return Some(std::mem::replace(&mut self.entries[pos].path, path));
        }

        self.index.insert(key.clone(), self.entries.len());
        self.entries.push(RegistryEntry { key, path });
        None
    }

    /// Looks up the source file for a key.
    pub fn get(&self, key: &str) -> Option<&Path> {
        self.index
            .get(key)
            .map(|&pos| self.entries[pos].path.as_path())
    }

    /// Returns true if the key is registered.
    pub fn contains(&self, key: &str) -> bool {
        self.index.contains_key(key)
    }

    /// Returns the number of registered keys.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if no keys are registered.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterates entries in registry order.
    pub fn iter(&self) -> std::slice::Iter<'_, RegistryEntry> {
        self.entries.iter()
    }

    /// Iterates keys in registry order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|e| e.key.as_str())
    }
}

impl<K: Into<String>, P: Into<PathBuf>> FromIterator<(K, P)> for Registry {
    fn from_iter<I: IntoIterator<Item = (K, P)>>(iter: I) -> Self {
        let mut registry = Registry::new();
        for (key, path) in iter {
            registry.insert(key, path);
        }
        registry
    }
}

impl<'a> IntoIterator for &'a Registry {
    type Item = &'a RegistryEntry;
    type IntoIter = std::slice::Iter<'a, RegistryEntry>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

//! Extraction of declared dependencies from a module's `define` header.
//!
//! Only the header line is inspected. It must start (after optional
//! whitespace) with `define`, followed by a bracketed list on the same line:
//!
//! ```text
//! define ['cs!model/todo', 'lib/underscore'], (Todo, _) ->
//! ```
//!
//! Inside the brackets the span from the first to the last single quote is
//! split on `", "`. Quotes are removed from each item and the loader marker
//! (`cs!` by default) is stripped from its front. Items left empty are
//! dropped, so `define ['']` declares nothing. The rest are returned in
//! written order with duplicates kept.
//!
//! Not recognized: headers spanning several lines, double-quoted items, items
//! separated by anything other than a comma and one space, and any `define`
//! after the first one in the file.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use regex::Regex;
use tracing::trace;

use super::read_lines;
use crate::config::ScanConfig;
use crate::error::Result;

/// Pattern for the declaration header; group 1 is the bracket contents.
const DEFINE_HEADER: &str = r"^\s*define\s*\[(.*)\]";

/// Pattern for the quoted span inside the brackets.
const QUOTED_LIST: &str = r"'.*'";

/// Delimiter between quoted items.
const ITEM_DELIMITER: &str = ", ";

/// Something that can list the declared dependencies of a module file.
pub trait DependencySource {
    /// Returns the dependency keys declared by the module at `path`.
    fn dependencies(&self, path: &Path) -> Result<Vec<String>>;
}

/// Reads dependency lists from `define [...]` headers on disk.
#[derive(Debug, Clone)]
pub struct DefineExtractor {
    marker: String,
    header: Regex,
    quoted: Regex,
}

impl DefineExtractor {
    /// Creates an extractor stripping `marker` from each dependency.
    pub fn new(marker: impl Into<String>) -> Result<Self> {
        Ok(Self {
            marker: marker.into(),
            header: Regex::new(DEFINE_HEADER)?,
            quoted: Regex::new(QUOTED_LIST)?,
        })
    }

    /// Creates an extractor using the marker from `config`.
    pub fn from_config(config: &ScanConfig) -> Result<Self> {
        Self::new(config.marker.clone())
    }

    /// Parses a single line.
    ///
    /// Returns `None` if the line is not a declaration header, otherwise the
    /// (possibly empty) dependency list.
    ///
    /// # Example
    ///
    /// ```rust
    /// use modgraph::parser::DefineExtractor;
    ///
    /// let extractor = DefineExtractor::new("cs!").unwrap();
    /// let deps = extractor.parse_header("define ['cs!model/todo', 'jquery'], ($) ->");
    /// assert_eq!(deps, Some(vec!["model/todo".to_string(), "jquery".to_string()]));
    /// assert_eq!(extractor.parse_header("define [], ->"), Some(vec![]));
    /// assert_eq!(extractor.parse_header("class Todo"), None);
    /// ```
    pub fn parse_header(&self, line: &str) -> Option<Vec<String>> {
        let captures = self.header.captures(line)?;
        let contents = captures.get(1).map_or("", |m| m.as_str());

        let Some(span) = self.quoted.find(contents) else {
            return Some(Vec::new());
        };

        Some(
            span.as_str()
                .split(ITEM_DELIMITER)
                .map(|item| self.clean_item(item))
                .filter(|key| !key.is_empty())
                .collect(),
        )
    }

    /// Extracts the dependency list from module source text.
    pub fn extract_from_str(&self, source: &str) -> Vec<String> {
        source
            .lines()
            .find_map(|line| self.parse_header(line))
            .unwrap_or_default()
    }

    fn clean_item(&self, item: &str) -> String {
        let unquoted = item.replace('\'', "");
        match unquoted.strip_prefix(self.marker.as_str()) {
            Some(stripped) => stripped.to_string(),
            None => unquoted,
        }
    }
}

impl DependencySource for DefineExtractor {
    fn dependencies(&self, path: &Path) -> Result<Vec<String>> {
        for line in read_lines(path)? {
            if let Some(deps) = self.parse_header(&line?) {
                trace!("{}: {} dependencies", path.display(), deps.len());
                return Ok(deps);
            }
        }

        trace!("{}: no define header", path.display());
        Ok(Vec::new())
    }
}

/// In-memory source keyed by module path. Paths without an entry declare
/// nothing.
impl DependencySource for HashMap<PathBuf, Vec<String>> {
    fn dependencies(&self, path: &Path) -> Result<Vec<String>> {
        Ok(self.get(path).cloned().unwrap_or_default())
    }
}

//! Scanner for module registry files.
//!
//! A registry file maps module keys to source paths, one declaration per
//! line:
//!
//! ```text
//! 'model/todo': 'modules/todo_model',
//! ```
//!
//! A line is recognized when it contains a `'…': '…'` span. The key is the
//! text between the first pair of quotes of that span, the path the text
//! between the second pair. Anything before or after the span is ignored, as
//! are lines without one. Quotes cannot be escaped.
//!
//! Declared paths carry no extension. Each configured extension is appended
//! in order and the first candidate that exists as a file under the base
//! directory is recorded. Keys whose path resolves to nothing are dropped.

use std::path::{Path, PathBuf};

use regex::Regex;
use tracing::debug;

use super::read_lines;
use super::types::Registry;
use crate::config::ScanConfig;
use crate::error::Result;

/// Pattern for a `'<key>': '<path>'` declaration.
const REGISTRY_LINE: &str = r"'.*': '.*'";

/// Builds a [`Registry`] from bootstrap files under a base directory.
#[derive(Debug, Clone)]
pub struct RegistryScanner {
    base_dir: PathBuf,
    extensions: Vec<String>,
    line_pattern: Regex,
}

impl RegistryScanner {
    /// Creates a scanner resolving paths under `base_dir` with the given
    /// extensions, tried in order.
    pub fn new(base_dir: impl Into<PathBuf>, extensions: Vec<String>) -> Result<Self> {
        Ok(Self {
            base_dir: base_dir.into(),
            extensions,
            line_pattern: Regex::new(REGISTRY_LINE)?,
        })
    }

    /// Creates a scanner using the extensions from `config`.
    pub fn from_config(base_dir: impl Into<PathBuf>, config: &ScanConfig) -> Result<Self> {
        Self::new(base_dir, config.extensions.clone())
    }

    /// Scans every bootstrap file in order into a single registry.
    ///
    /// File names are relative to the base directory. A file that cannot be
    /// read aborts the scan.
    pub fn scan<P: AsRef<Path>>(&self, files: &[P]) -> Result<Registry> {
        let mut registry = Registry::new();
        for file in files {
            self.scan_file(file.as_ref(), &mut registry)?;
        }
        debug!("Registry holds {} modules", registry.len());
        Ok(registry)
    }

    /// Scans one bootstrap file into `registry`.
    ///
    /// Returns the number of declarations that resolved to a source file.
    pub fn scan_file(&self, file: &Path, registry: &mut Registry) -> Result<usize> {
        let path = self.base_dir.join(file);
        let mut resolved = 0;

        for line in read_lines(&path)? {
            let line = line?;
            let Some((key, declared)) = self.parse_line(&line) else {
                continue;
            };

            match self.resolve(declared) {
                Some(source) => {
                    registry.insert(key, source);
                    resolved += 1;
                }
                None => debug!("Dropping '{}': no source file for '{}'", key, declared),
            }
        }

        debug!("{}: {} modules resolved", path.display(), resolved);
        Ok(resolved)
    }

    /// Extracts the key and declared path from a registry line.
    ///
    /// # Example
    ///
    /// ```rust
    /// use modgraph::parser::RegistryScanner;
    ///
    /// let scanner = RegistryScanner::new(".", vec![".js".to_string()]).unwrap();
    /// let line = "    'model/todo': 'modules/todo_model',";
    /// assert_eq!(scanner.parse_line(line), Some(("model/todo", "modules/todo_model")));
    /// assert_eq!(scanner.parse_line("var App = App || {};"), None);
    /// ```
    pub fn parse_line<'a>(&self, line: &'a str) -> Option<(&'a str, &'a str)> {
        let span = self.line_pattern.find(line)?.as_str();
        let mut fields = span.split('\'');
        let key = fields.nth(1)?;
        let path = fields.nth(1)?;
        Some((key, path))
    }

    /// Resolves a declared path to the first existing `<base>/<path><ext>`.
    pub fn resolve(&self, declared: &str) -> Option<PathBuf> {
        self.extensions
            .iter()
            .map(|ext| self.base_dir.join(format!("{declared}{ext}")))
            .find(|candidate| candidate.is_file())
    }
}

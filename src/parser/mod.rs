//! Parsers for module registries and declaration headers.
//!
//! Both grammars are matched line by line with small regular expressions
//! rather than a parser for the host language. Lines that do not match are
//! skipped, never reported.
//!
//! # Example
//!
//! ```ignore
//! use modgraph::parser::{DefineExtractor, DependencySource, RegistryScanner};
//!
//! let scanner = RegistryScanner::new("app", vec![".coffee".into(), ".js".into()])?;
//! let registry = scanner.scan(&["conf/modules.js"])?;
//!
//! let extractor = DefineExtractor::new("cs!")?;
//! for entry in &registry {
//!     println!("{} -> {:?}", entry.key, extractor.dependencies(&entry.path)?);
//! }
//! ```

pub mod define;
pub mod registry;
pub mod types;

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use crate::error::{Error, Result};

// Re-export commonly used types for convenience
pub use define::{DefineExtractor, DependencySource};
pub use registry::RegistryScanner;
pub use types::{Registry, RegistryEntry};

/// Iterates the lines of a file, decoding invalid UTF-8 lossily.
///
/// The file stays open only as long as the iterator lives.
pub(crate) fn read_lines(path: &Path) -> Result<impl Iterator<Item = Result<String>> + '_> {
    let file = File::open(path).map_err(|e| Error::io(path, e))?;
    Ok(BufReader::new(file).split(b'\n').map(move |line| {
        line.map(|bytes| String::from_utf8_lossy(&bytes).into_owned())
            .map_err(|e| Error::io(path, e))
    }))
}

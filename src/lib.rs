//! modgraph - Module dependency graph extractor with Graphviz output
//!
//! This crate reads module registries and `define [...]` headers from a
//! source tree, assembles the declared dependencies into a forest of trees,
//! and renders it as a DOT document.

pub mod config;
pub mod error;
pub mod export;
pub mod graph;
pub mod parser;

use std::path::Path;

pub use error::{Error, Result};

use config::ScanConfig;
use graph::{BuildStats, Forest, GraphBuilder};
use parser::{DefineExtractor, RegistryScanner};

/// Scans `files` under `base_dir` and builds the dependency forest.
///
/// # Example
///
/// ```ignore
/// use std::path::Path;
/// use modgraph::config::ScanConfig;
/// use modgraph::export::{export, ExportFormat};
///
/// let (forest, _) = modgraph::build_forest(Path::new("app"), &["conf/modules.js"], &ScanConfig::default())?;
/// export(ExportFormat::Dot, &forest, &mut std::io::stdout())?;
/// ```
pub fn build_forest<P: AsRef<Path>>(
    base_dir: &Path,
    files: &[P],
    config: &ScanConfig,
) -> Result<(Forest, BuildStats)> {
    let registry = RegistryScanner::from_config(base_dir, config)?.scan(files)?;
    let extractor = DefineExtractor::from_config(config)?;
    GraphBuilder::new(&registry, &extractor).build_with_stats()
}

//! Scan and render settings.
//!
//! Every field has a default, so a config file only needs the values it
//! changes:
//!
//! ```toml
//! [scan]
//! extensions = [".ts", ".js"]
//! marker = "cs!"
//!
//! [render]
//! format = "json"
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::export::ExportFormat;

/// Default extensions tried when resolving a registry path, in priority order.
pub const DEFAULT_EXTENSIONS: &[&str] = &[".coffee", ".js"];

/// Default loader-plugin prefix stripped from dependency keys.
pub const DEFAULT_MARKER: &str = "cs!";

/// Top-level configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub scan: ScanConfig,
    pub render: RenderConfig,
}

/// Settings for the registry scanner and dependency extractor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScanConfig {
    /// Suffixes appended to a declared path, tried in order
    pub extensions: Vec<String>,
    /// Prefix removed from each declared dependency
    pub marker: String,
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            extensions: DEFAULT_EXTENSIONS.iter().map(|e| e.to_string()).collect(),
            marker: DEFAULT_MARKER.to_string(),
        }
    }
}

/// Settings for the output stage.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderConfig {
    pub format: ExportFormat,
}

impl Config {
    /// Loads a config from a TOML file.
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| Error::io(path, e))?;
        toml::from_str(&content).map_err(|source| Error::Config {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Loads `path` if given, otherwise returns the defaults.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => {
                tracing::info!("Loading configuration from {}", path.display());
                Self::from_file(path)
            }
            None => Ok(Self::default()),
        }
    }
}

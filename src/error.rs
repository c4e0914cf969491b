//! Error types for modgraph.
//!
//! Parsing ambiguity is never an error here: malformed registry lines and
//! missing declaration headers are absorbed by the scanners. What remains are
//! resource failures that abort the whole run.

use std::path::PathBuf;

/// Errors that halt a graph build.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// A bootstrap or module source file could not be opened or read.
    #[error("Failed to read {}: {source}", path.display())]
    Io {
        /// File that failed
        path: PathBuf,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// The configuration file is not valid TOML for [`crate::config::Config`].
    #[error("Invalid config file {}: {source}", path.display())]
    Config {
        /// Config file path
        path: PathBuf,
        /// Underlying TOML error
        #[source]
        source: toml::de::Error,
    },

    /// A line pattern failed to compile.
    #[error("Invalid pattern: {0}")]
    Pattern(#[from] regex::Error),
}

impl Error {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

/// Result type alias for modgraph operations.
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_io_error_mentions_path() {
        let err = Error::io(
            "conf/modules.js",
            std::io::Error::new(std::io::ErrorKind::NotFound, "missing"),
        );
        let message = err.to_string();
        assert!(message.contains("conf/modules.js"));
        assert!(message.contains("missing"));
    }

    #[test]
    fn test_io_error_exposes_source() {
        let err = Error::io(
            "a.js",
            std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied"),
        );
        assert!(std::error::Error::source(&err).is_some());
    }
}

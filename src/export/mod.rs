//! Export functionality for dependency forests.
//!
//! This module renders a [`Forest`] either as a Graphviz DOT document or as
//! nested JSON.

pub mod dot;
pub mod json;

use crate::graph::Forest;
use serde::{Deserialize, Serialize};
use std::io::{self, Write};

/// Export format options
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExportFormat {
    /// Graphviz DOT - for `dot -Tpng` and friends
    #[default]
    Dot,
    /// JSON format - machine-readable, nested trees
    Json,
}

impl std::str::FromStr for ExportFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "dot" | "gv" => Ok(ExportFormat::Dot),
            "json" => Ok(ExportFormat::Json),
            _ => Err(format!(
                "Unknown export format: '{}'. Valid formats: dot, json",
                s
            )),
        }
    }
}

impl std::fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ExportFormat::Dot => write!(f, "dot"),
            ExportFormat::Json => write!(f, "json"),
        }
    }
}

/// Trait for exporters.
pub trait Exporter {
    /// Export the forest to the given writer.
    fn export<W: Write>(&self, forest: &Forest, writer: &mut W) -> io::Result<()>;
}

/// Export a forest in the specified format.
pub fn export<W: Write>(format: ExportFormat, forest: &Forest, writer: &mut W) -> io::Result<()> {
    match format {
        ExportFormat::Dot => dot::DotExporter.export(forest, writer),
        ExportFormat::Json => json::JsonExporter.export(forest, writer),
    }
}

/// Export a forest to a string.
pub fn export_to_string(format: ExportFormat, forest: &Forest) -> io::Result<String> {
    let mut buffer = Vec::new();
    export(format, forest, &mut buffer)?;
    String::from_utf8(buffer).map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_export_format_from_str() {
        assert_eq!("dot".parse::<ExportFormat>().unwrap(), ExportFormat::Dot);
        assert_eq!("DOT".parse::<ExportFormat>().unwrap(), ExportFormat::Dot);
        assert_eq!("gv".parse::<ExportFormat>().unwrap(), ExportFormat::Dot);
        assert_eq!("json".parse::<ExportFormat>().unwrap(), ExportFormat::Json);
        assert!("markdown".parse::<ExportFormat>().is_err());
    }

    #[test]
    fn test_export_format_display() {
        assert_eq!(format!("{}", ExportFormat::Dot), "dot");
        assert_eq!(format!("{}", ExportFormat::Json), "json");
    }

    #[test]
    fn test_export_empty_forest() {
        let forest = Forest::new();
        let dot = export_to_string(ExportFormat::Dot, &forest).unwrap();
        assert_eq!(dot, format!("{}\n{}\n", dot::HEADER, dot::FOOTER));

        let json = export_to_string(ExportFormat::Json, &forest).unwrap();
        assert!(json.contains("\"roots\": []"));
    }
}

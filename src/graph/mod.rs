//! Graph module for module dependency modeling.
//!
//! [`GraphBuilder`] walks a [`Registry`](crate::parser::Registry) depth-first
//! and produces a [`Forest`]: one tree per module that was not reached from an
//! earlier module.
//!
//! # Example
//!
//! ```rust
//! use std::collections::HashMap;
//! use std::path::PathBuf;
//! use modgraph::graph::GraphBuilder;
//! use modgraph::parser::Registry;
//!
//! let registry: Registry = [("a", "a.js"), ("b", "b.js")].into_iter().collect();
//! let mut source = HashMap::new();
//! source.insert(PathBuf::from("a.js"), vec!["b".to_string()]);
//! source.insert(PathBuf::from("b.js"), vec!["a".to_string()]);
//!
//! let forest = GraphBuilder::new(&registry, &source).build().unwrap();
//! assert_eq!(forest.roots().len(), 1);
//! assert_eq!(forest.detect_cycles()[0].cycle_path(), "a -> b -> a");
//! ```

mod builder;
mod forest;

pub use builder::{BuildStats, GraphBuilder, VisitState, VisitedTable};
pub use forest::{CycleInfo, DependencyNode, Forest, NodeId};

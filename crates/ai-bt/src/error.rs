use std::path::PathBuf;

use ai_graph::{NodeId, SurfaceError};
use thiserror::Error;

/// Failure of [`BehaviorTreeGraph::load`](crate::BehaviorTreeGraph::load).
///
/// Unresolved types, hydration failures and dangling references are not errors: they are logged
/// and the offending element is left out of the compiled tree.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("Failed to load graph surface: {0}")]
    Surface(#[from] SurfaceError),

    #[error("Cycle detected: node {from} references its ancestor {to}")]
    Cycle { from: NodeId, to: NodeId },

    #[error("Graph has no root node")]
    NoRoot,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config from {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse config: {0}")]
    Parse(#[from] serde_yaml::Error),
}

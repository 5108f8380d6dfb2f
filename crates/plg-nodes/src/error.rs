//! Node-subsystem error type.

use thiserror::Error;

use plg_core::{NodeId, RunIndexError};

/// Errors produced by `plg-nodes`.
#[derive(Debug, Error)]
pub enum NodeError {
    #[error("node {0} not found in node set")]
    NodeNotFound(NodeId),

    #[error("node set has {positions} positions but {lanes} lane ids")]
    ColumnMismatch { positions: usize, lanes: usize },

    #[error("run index error: {0}")]
    RunIndex(#[from] RunIndexError),
}

pub type NodeResult<T> = Result<T, NodeError>;

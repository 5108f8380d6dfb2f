//! Model-subsystem error type.

use thiserror::Error;

use plg_core::{ClusterId, NodeId, VehicleId};
use plg_nodes::NodeError;

/// Errors produced by `plg-model`.
///
/// Dead-end rows and paths ending outside every cluster are valid model
/// states and never appear here.
#[derive(Debug, Error)]
pub enum ModelError {
    #[error("vehicle {vehicle} visits {node}, but the node set has only {node_count} nodes")]
    NodeOutOfRange { vehicle: VehicleId, node: NodeId, node_count: usize },

    #[error("cluster {0} has no centroid")]
    MissingCentroid(ClusterId),

    #[error("ranking for cluster {cluster} must start with the cluster itself")]
    BadRanking { cluster: ClusterId },

    #[error("count matrices of different sizes cannot be merged ({left} vs {right})")]
    SizeMismatch { left: usize, right: usize },

    #[error("malformed transition matrix: {0}")]
    MalformedMatrix(&'static str),

    #[error("node error: {0}")]
    Node(#[from] NodeError),
}

pub type ModelResult<T> = Result<T, ModelError>;

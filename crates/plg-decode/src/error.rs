//! Decoder error type.
//!
//! Dead ends are not errors: they end a [`GeneratedPath`](crate::GeneratedPath)
//! with [`PathEnd::DeadEnd`](crate::PathEnd::DeadEnd).

use thiserror::Error;

use plg_core::{ClusterId, NodeId};

/// Errors produced by `plg-decode`.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum DecodeError {
    #[error("lane graph has no transition model yet")]
    NotReady,

    #[error("lane graph has no start or target clusters")]
    NoClusters,

    #[error("unknown target cluster {0}")]
    UnknownCluster(ClusterId),

    #[error("start node {node} outside node set of {node_count}")]
    UnknownNode { node: NodeId, node_count: usize },

    /// A path was post-processed without passing the length filter first.
    #[error("path has {got} nodes but heading smoothing needs at least {needed}")]
    PathTooShort { needed: usize, got: usize },

    #[error("no viable path after {attempts} attempts")]
    AttemptsExhausted { attempts: usize },
}

pub type DecodeResult<T> = Result<T, DecodeError>;

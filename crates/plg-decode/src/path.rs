//! Decoded paths and the viability filter.

use plg_core::{ClusterId, DecodeConfig, NodeId};

/// Why decoding stopped.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum PathEnd {
    /// The last node is a member of the target cluster.
    ReachedTarget,
    /// No cluster in the ranking offered a successor.  The path carries an
    /// implicit dead-end sentinel after its last node.
    DeadEnd,
    /// The length cap was hit first.
    Capped,
}

/// A synthesized node path.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GeneratedPath {
    pub start:  NodeId,
    pub target: ClusterId,
    /// Visited nodes, starting with `start`.  Never holds the sentinel.
    pub nodes:  Vec<NodeId>,
    pub end:    PathEnd,
}

impl GeneratedPath {
    /// Path length counting the dead-end sentinel, if any.
    pub fn len(&self) -> usize {
        self.nodes.len() + usize::from(self.is_dead_end())
    }

    /// Number of real nodes (sentinel excluded).
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn is_dead_end(&self) -> bool {
        self.end == PathEnd::DeadEnd
    }

    pub fn reached_target(&self) -> bool {
        self.end == PathEnd::ReachedTarget
    }
}

/// Decides whether a decoded path is kept or redrawn.
///
/// A path is rejected when its length (sentinel included) reaches the cap,
/// since it never terminated on its own, or when it has fewer than `min_len`
/// real nodes.  Dead-end paths that are long enough are kept.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct PathFilter {
    pub min_len: usize,
    pub max_len: usize,
}

impl PathFilter {
    pub fn new(config: &DecodeConfig) -> Self {
        Self { min_len: config.min_path_length, max_len: config.max_path_length }
    }

    pub fn accepts(&self, path: &GeneratedPath) -> bool {
        path.len() < self.max_len && path.node_count() >= self.min_len
    }
}

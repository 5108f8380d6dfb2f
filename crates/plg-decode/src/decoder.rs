//! Greedy path decoding over the conditioned transition models.
//!
//! # Algorithm
//!
//! ```text
//! path = [start]
//! loop:
//!     last in target cluster          → ReachedTarget
//!     len(path) == max_path_length    → Capped
//!     for c in ranking(target):       (target itself first)
//!         if policy picks a successor of last in conditioned[c]: append it, continue loop
//!     no cluster offered one          → DeadEnd
//! ```
//!
//! The decoder borrows the snapshot immutably and never copies a matrix, so
//! any number of decoders can share one [`Plg`] across threads.

use tracing::trace;

use plg_core::{ClusterId, DecodeConfig, NodeId};
use plg_model::{Plg, TransitionMatrix};

use crate::{DecodeError, DecodeResult, GeneratedPath, PathEnd};

// ── NextNodePolicy ────────────────────────────────────────────────────────────

/// Picks the successor of `current` from one transition matrix.
///
/// Returning `None` means the row offers nothing and the decoder should fall
/// back to the next cluster in the ranking.
pub trait NextNodePolicy: Send + Sync {
    fn next_node(&self, matrix: &TransitionMatrix, current: NodeId) -> Option<NodeId>;
}

/// Most probable successor, lowest node index on ties.
#[derive(Copy, Clone, Debug, Default)]
pub struct ArgMaxLowestIndex;

impl NextNodePolicy for ArgMaxLowestIndex {
    #[inline]
    fn next_node(&self, matrix: &TransitionMatrix, current: NodeId) -> Option<NodeId> {
        matrix.argmax_row(current)
    }
}

// ── PathDecoder ───────────────────────────────────────────────────────────────

/// Decodes paths from a finished lane graph.
pub struct PathDecoder<'a, P = ArgMaxLowestIndex> {
    plg:             &'a Plg,
    policy:          P,
    max_path_length: usize,
}

impl<'a> PathDecoder<'a, ArgMaxLowestIndex> {
    pub fn new(plg: &'a Plg, config: &DecodeConfig) -> DecodeResult<Self> {
        Self::with_policy(plg, config, ArgMaxLowestIndex)
    }
}

impl<'a, P: NextNodePolicy> PathDecoder<'a, P> {
    pub fn with_policy(plg: &'a Plg, config: &DecodeConfig, policy: P) -> DecodeResult<Self> {
        if !plg.is_ready() {
            return Err(DecodeError::NotReady);
        }
        Ok(Self { plg, policy, max_path_length: config.max_path_length })
    }

    pub fn plg(&self) -> &'a Plg {
        self.plg
    }

    /// Decode one path from `start` towards `target`.
    ///
    /// The returned path holds at most `max_path_length` entries, counting
    /// the dead-end sentinel.
    pub fn decode(&self, start: NodeId, target: ClusterId) -> DecodeResult<GeneratedPath> {
        let node_count = self.plg.nodes.len();
        if start.index() >= node_count {
            return Err(DecodeError::UnknownNode { node: start, node_count });
        }
        let targets = &self.plg.target_clusters;
        let ranking = targets.ranking(target).ok_or(DecodeError::UnknownCluster(target))?;

        let mut nodes = vec![start];
        let end = loop {
            let last = nodes[nodes.len() - 1];
            if targets.contains(target, last) {
                break PathEnd::ReachedTarget;
            }
            if nodes.len() >= self.max_path_length {
                break PathEnd::Capped;
            }
            match self.step(last, ranking) {
                Some(next) => nodes.push(next),
                None => break PathEnd::DeadEnd,
            }
        };

        trace!(start = start.0, target = target.0, len = nodes.len(), end = ?end, "decoded path");
        Ok(GeneratedPath { start, target, nodes, end })
    }

    /// Successor of `current`, trying each cluster of `ranking` in turn.
    fn step(&self, current: NodeId, ranking: &[ClusterId]) -> Option<NodeId> {
        ranking.iter().find_map(|&c| {
            self.plg
                .conditioned(c)
                .and_then(|matrix| self.policy.next_node(matrix, current))
        })
    }
}

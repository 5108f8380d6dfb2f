//! Global and destination-conditioned transition models.
//!
//! # Algorithm
//!
//! ```text
//! for path in vehicle paths:
//!     global += pairs(path)
//!     match targets.containing(path.last):
//!         Some(c) => conditioned[c] += pairs(path)
//!         None    => uncategorised += 1        (global only)
//!
//! for each accumulator: drop edges longer than max_edge_length, row-normalise
//! ```
//!
//! Every target cluster gets a conditioned matrix, even one no path ends in
//! (it is simply all-zero).  Counting commutes, so with the `parallel`
//! feature paths are folded into per-thread accumulators and reduced; the
//! result equals the sequential build.

use std::collections::BTreeMap;

use tracing::{debug, info, warn};

#[cfg(feature = "parallel")]
use rayon::prelude::*;

use plg_core::{ClusterId, ModelConfig, NodeId, VehicleId};
use plg_nodes::{NodeSet, VehiclePaths};

use crate::{ClusterSet, CountMatrix, ModelResult, TransitionMatrix};

/// Counters describing one model build.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ModelStats {
    pub paths:               usize,
    pub transitions:         usize,
    /// Global edges removed by the max-edge-length rule.
    pub pruned_edges:        usize,
    /// Paths whose final node lies in no target cluster.
    pub uncategorised_paths: usize,
    /// Target clusters no path ends in.
    pub empty_clusters:      usize,
}

/// The frozen output of [`TransitionModelBuilder::build`].
#[derive(Clone, Debug, Default, PartialEq)]
pub struct TransitionModel {
    pub global:      TransitionMatrix,
    pub conditioned: BTreeMap<ClusterId, TransitionMatrix>,
    pub stats:       ModelStats,
}

// ── Accumulator ───────────────────────────────────────────────────────────────

struct Accumulator {
    global:        CountMatrix,
    conditioned:   BTreeMap<ClusterId, CountMatrix>,
    paths:         usize,
    transitions:   usize,
    uncategorised: usize,
}

impl Accumulator {
    fn new(node_count: usize, targets: &ClusterSet) -> Self {
        Self {
            global:        CountMatrix::new(node_count),
            conditioned:   targets.ids().map(|c| (c, CountMatrix::new(node_count))).collect(),
            paths:         0,
            transitions:   0,
            uncategorised: 0,
        }
    }

    fn add(mut self, targets: &ClusterSet, vehicle: VehicleId, path: &[NodeId]) -> ModelResult<Self> {
        let added = self.global.add_path(vehicle, path)?;
        self.paths += 1;
        self.transitions += added;

        let destination = path.last().and_then(|&n| targets.containing(n));
        match destination.and_then(|c| self.conditioned.get_mut(&c)) {
            Some(counts) => {
                counts.add_path(vehicle, path)?;
            }
            None => {
                self.uncategorised += 1;
                debug!(vehicle = vehicle.0, "path ends outside every target cluster");
            }
        }
        Ok(self)
    }

    #[cfg(feature = "parallel")]
    fn merge(mut self, other: Accumulator) -> ModelResult<Self> {
        self.global.merge(other.global)?;
        for (c, counts) in other.conditioned {
            match self.conditioned.get_mut(&c) {
                Some(mine) => mine.merge(counts)?,
                None => {
                    self.conditioned.insert(c, counts);
                }
            }
        }
        self.paths += other.paths;
        self.transitions += other.transitions;
        self.uncategorised += other.uncategorised;
        Ok(self)
    }
}

// ── TransitionModelBuilder ────────────────────────────────────────────────────

/// Builds the global and per-destination transition matrices.
#[derive(Clone, Debug)]
pub struct TransitionModelBuilder {
    max_edge_length_m: f64,
}

impl TransitionModelBuilder {
    pub fn new(config: &ModelConfig) -> Self {
        Self { max_edge_length_m: config.max_edge_length_m }
    }

    /// Single pass over `paths`.  Fails only if a path names a node outside
    /// `nodes`.
    pub fn build(
        &self,
        nodes:   &NodeSet,
        paths:   &VehiclePaths,
        targets: &ClusterSet,
    ) -> ModelResult<TransitionModel> {
        let n = nodes.len();

        #[cfg(feature = "parallel")]
        let acc = paths
            .par_iter()
            .try_fold(
                || Accumulator::new(n, targets),
                |acc, (&vehicle, path)| acc.add(targets, vehicle, path),
            )
            .try_reduce(|| Accumulator::new(n, targets), Accumulator::merge)?;

        #[cfg(not(feature = "parallel"))]
        let acc = paths.iter().try_fold(Accumulator::new(n, targets), |acc, (&vehicle, path)| {
            acc.add(targets, vehicle, path)
        })?;

        let Accumulator { mut global, conditioned, paths, transitions, uncategorised } = acc;

        let pruned_edges = global.prune_longer_than(nodes, self.max_edge_length_m);
        let global = global.normalise();

        let mut empty_clusters = 0;
        let conditioned: BTreeMap<ClusterId, TransitionMatrix> = conditioned
            .into_iter()
            .map(|(c, mut counts)| {
                if counts.is_empty() {
                    empty_clusters += 1;
                }
                counts.prune_longer_than(nodes, self.max_edge_length_m);
                (c, counts.normalise())
            })
            .collect();

        let stats = ModelStats {
            paths,
            transitions,
            pruned_edges,
            uncategorised_paths: uncategorised,
            empty_clusters,
        };
        if stats.uncategorised_paths > 0 {
            warn!(
                uncategorised = stats.uncategorised_paths,
                "some paths end outside every target cluster; they only feed the global model"
            );
        }
        info!(
            paths = stats.paths,
            transitions = stats.transitions,
            edges = global.edge_count(),
            pruned = stats.pruned_edges,
            clusters = conditioned.len(),
            "transition model built"
        );

        Ok(TransitionModel { global, conditioned, stats })
    }
}

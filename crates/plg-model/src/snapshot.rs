//! The lane graph snapshot.
//!
//! One [`Plg`] value holds everything every stage has produced so far.  The
//! pipeline driver owns it, lets exactly one stage mutate it at a time, and
//! persists it at every stage boundary.  `completed` records the last stage
//! whose output the snapshot holds, so a restarted build resumes after it.

use std::collections::BTreeMap;
use std::fmt;

use plg_clean::TrajectoryTable;
use plg_core::ClusterId;
use plg_nodes::{NodeSet, VehiclePaths};

use crate::{ClusterAssignment, ClusterSet, ModelStats, TransitionMatrix, TransitionModel};

// ── Stage ─────────────────────────────────────────────────────────────────────

/// Build stages in execution order.
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Stage {
    Clean,
    Nodes,
    Discretise,
    Clusters,
    Model,
}

impl Stage {
    pub const ALL: [Stage; 5] =
        [Stage::Clean, Stage::Nodes, Stage::Discretise, Stage::Clusters, Stage::Model];

    pub fn name(self) -> &'static str {
        match self {
            Stage::Clean      => "clean",
            Stage::Nodes      => "nodes",
            Stage::Discretise => "discretise",
            Stage::Clusters   => "clusters",
            Stage::Model      => "model",
        }
    }

    /// The stage after `self`, or `None` after the last.
    pub fn next(self) -> Option<Stage> {
        Stage::ALL.iter().copied().find(|&s| s > self)
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

// ── Plg ───────────────────────────────────────────────────────────────────────

/// Probabilistic lane graph: nodes, clusters and transition models.
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Plg {
    /// Last stage whose output is present.  `None` for a fresh snapshot.
    pub completed:       Option<Stage>,
    /// Cleaned samples with fresh vehicle ids.
    pub cleaned:         TrajectoryTable,
    pub nodes:           NodeSet,
    pub vehicle_paths:   VehiclePaths,
    pub start_clusters:  ClusterSet,
    pub target_clusters: ClusterSet,
    pub global:          TransitionMatrix,
    /// One matrix per target cluster.
    pub conditioned:     BTreeMap<ClusterId, TransitionMatrix>,
    pub stats:           ModelStats,
}

impl Plg {
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether `stage`'s output is present.
    pub fn is_complete(&self, stage: Stage) -> bool {
        self.completed.is_some_and(|done| done >= stage)
    }

    /// True once the transition models are built and paths can be decoded.
    pub fn is_ready(&self) -> bool {
        self.is_complete(Stage::Model)
    }

    /// The first stage still to run, or `None` when the build is complete.
    pub fn next_stage(&self) -> Option<Stage> {
        match self.completed {
            None       => Some(Stage::Clean),
            Some(done) => done.next(),
        }
    }

    pub fn mark_complete(&mut self, stage: Stage) {
        self.completed = Some(stage);
    }

    pub fn conditioned(&self, cluster: ClusterId) -> Option<&TransitionMatrix> {
        self.conditioned.get(&cluster)
    }

    pub fn set_clusters(&mut self, clusters: ClusterAssignment) {
        self.start_clusters = clusters.start;
        self.target_clusters = clusters.target;
    }

    pub fn set_model(&mut self, model: TransitionModel) {
        self.global = model.global;
        self.conditioned = model.conditioned;
        self.stats = model.stats;
    }
}

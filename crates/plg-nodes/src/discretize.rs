//! Trajectory → node-path discretization.
//!
//! The [`Discretizer`] trait is the seam between the node set and the
//! transition model: it turns one cleaned trajectory into the ordered list
//! of node ids the vehicle passed through.  [`NearestNodeDiscretizer`] is the
//! reference implementation.

use std::collections::BTreeMap;

use tracing::info;

use plg_clean::CleanedTrajectories;
use plg_core::{NodeId, Point2, VehicleId};

use crate::NodeSet;

/// Node path of every cleaned vehicle, keyed by cleaned vehicle id.
pub type VehiclePaths = BTreeMap<VehicleId, Vec<NodeId>>;

/// Maps a trajectory onto the node set.
///
/// Implementations must be `Send + Sync` so a pipeline can hold one behind a
/// `Box<dyn Discretizer>` and share it across threads.
pub trait Discretizer: Send + Sync {
    /// Node ids following the vehicle's motion along `trajectory`.
    fn discretize(&self, nodes: &NodeSet, trajectory: &[Point2]) -> Vec<NodeId>;
}

/// Snaps every sample to its nearest node and collapses consecutive repeats,
/// so a vehicle lingering near one node never produces a self-transition.
#[derive(Copy, Clone, Debug, Default)]
pub struct NearestNodeDiscretizer;

impl Discretizer for NearestNodeDiscretizer {
    fn discretize(&self, nodes: &NodeSet, trajectory: &[Point2]) -> Vec<NodeId> {
        let mut path: Vec<NodeId> = Vec::with_capacity(trajectory.len());
        for &p in trajectory {
            let Some(node) = nodes.snap_to_node(p) else { break };
            if path.last() != Some(&node) {
                path.push(node);
            }
        }
        path
    }
}

/// Discretize every cleaned vehicle.  Vehicles with an empty path (only
/// possible with an empty node set) are left out.
pub fn discretize_all(
    discretizer: &dyn Discretizer,
    nodes:       &NodeSet,
    cleaned:     &CleanedTrajectories,
) -> VehiclePaths {
    let paths: VehiclePaths = cleaned
        .trajectories()
        .map(|(vehicle, pts)| (vehicle, discretizer.discretize(nodes, &pts)))
        .filter(|(_, path)| !path.is_empty())
        .collect();
    info!(vehicles = cleaned.vehicle_count(), paths = paths.len(), "discretization complete");
    paths
}

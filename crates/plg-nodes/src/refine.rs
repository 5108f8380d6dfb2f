//! Lane-aware node relocation.
//!
//! For every lane carried by the node set (ignored lanes excluded), the
//! lane's nodes seed a k-means fit over all cleaned samples of that lane,
//! with one cluster per node.  Each node then moves to its cluster's
//! centroid.  Node count, ids and lane ids never change.
//!
//! Lanes are independent, so with the `parallel` feature the fits run on
//! Rayon's thread pool.  Results are applied in ascending lane order either
//! way, which keeps the output identical to the sequential build.

use tracing::{debug, info, warn};

#[cfg(feature = "parallel")]
use rayon::prelude::*;

use plg_clean::CleanedTrajectories;
use plg_core::{LaneId, LaneRefinement, NodeId, Point2, RunSelector};

use crate::kmeans::KMeans;
use crate::{NodeResult, NodeSet};

/// Summary of one refinement pass.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RefinementReport {
    /// Lanes whose nodes were relocated.
    pub lanes_refined:    usize,
    /// Lanes excluded via `ignored_lanes` or with no cleaned samples.
    pub lanes_skipped:    usize,
    pub nodes_moved:      usize,
    /// Lloyd iterations summed over all lanes.
    pub total_iterations: usize,
    /// True when the whole pass was skipped (disabled or no lane identity).
    pub skipped:          bool,
}

struct LaneFit {
    lane:       LaneId,
    moves:      Vec<(NodeId, Point2)>,
    iterations: usize,
}

/// Relocate nodes lane by lane.  See the module docs.
pub fn refine_lanes(
    nodes:   &mut NodeSet,
    cleaned: &CleanedTrajectories,
    config:  &LaneRefinement,
) -> NodeResult<RefinementReport> {
    if !config.enabled {
        debug!("lane refinement disabled");
        return Ok(RefinementReport { skipped: true, ..RefinementReport::default() });
    }
    if !cleaned.table.has_lane_identity() {
        info!("dataset carries no lane identity; skipping lane refinement");
        return Ok(RefinementReport { skipped: true, ..RefinementReport::default() });
    }

    let kmeans = KMeans::new(config.max_iterations, config.tolerance_m);
    let mut report = RefinementReport::default();

    // Gather per-lane inputs up front so the fits can borrow nothing mutable.
    let mut jobs: Vec<(LaneId, Vec<NodeId>, Vec<Point2>)> = Vec::new();
    for lane in nodes.distinct_lanes() {
        if config.ignored_lanes.contains(&lane) {
            report.lanes_skipped += 1;
            continue;
        }
        let xs = cleaned.lanes.extract(&cleaned.table.x, lane, RunSelector::All)?;
        let ys = cleaned.lanes.extract(&cleaned.table.y, lane, RunSelector::All)?;
        let (Some(xs), Some(ys)) = (xs, ys) else {
            warn!(lane = lane.0, "lane has nodes but no cleaned samples; skipping");
            report.lanes_skipped += 1;
            continue;
        };
        let data: Vec<Point2> = xs.into_iter().zip(ys).map(|(x, y)| Point2::new(x, y)).collect();
        jobs.push((lane, nodes.nodes_in_lane(lane), data));
    }

    let fit_one = |(lane, ids, data): &(LaneId, Vec<NodeId>, Vec<Point2>)| {
        let init: Vec<Point2> = ids.iter().map(|&n| nodes.position(n)).collect();
        let fit = kmeans.fit(&init, data);
        if !fit.converged {
            debug!(lane = lane.0, iterations = fit.iterations, "k-means hit iteration cap");
        }
        LaneFit {
            lane:       *lane,
            moves:      ids.iter().copied().zip(fit.centroids).collect(),
            iterations: fit.iterations,
        }
    };

    #[cfg(feature = "parallel")]
    let fits: Vec<LaneFit> = jobs.par_iter().map(fit_one).collect();
    #[cfg(not(feature = "parallel"))]
    let fits: Vec<LaneFit> = jobs.iter().map(fit_one).collect();

    let mut moves = Vec::with_capacity(nodes.len());
    for fit in fits {
        debug!(lane = fit.lane.0, nodes = fit.moves.len(), iterations = fit.iterations, "refined lane");
        report.lanes_refined += 1;
        report.nodes_moved += fit.moves.len();
        report.total_iterations += fit.iterations;
        moves.extend(fit.moves);
    }
    nodes.relocate(&moves)?;

    info!(
        refined = report.lanes_refined,
        skipped = report.lanes_skipped,
        moved = report.nodes_moved,
        "lane refinement complete"
    );
    Ok(report)
}

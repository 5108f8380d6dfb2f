//! Jump rejection and vehicle re-segmentation.
//!
//! # Algorithm
//!
//! Vehicles are visited in ascending raw id, and each vehicle's runs in
//! stream order.  Within a run the cleaner keeps a *last accepted* position,
//! seeded with the run's first sample:
//!
//! ```text
//! for p in run[1..]:
//!     if |p − last_accepted| < jump_threshold:  accept p; last_accepted = p
//!     else:                                     discard p
//! ```
//!
//! Distances are measured against the last *accepted* sample, never the raw
//! predecessor, so a vehicle that jumps away and comes back is picked up
//! again once it is near its last good position.
//!
//! Every maximal contiguous accepted sub-run gets a brand-new vehicle id.  A
//! discarded sample therefore splits a run, and a raw id that recurs later
//! in the stream (the vehicle left and re-entered the area) never shares an
//! id with its earlier visit.

use plg_core::{CleanConfig, VehicleId};
use tracing::{debug, info};

use crate::dataset::{CleanedTrajectories, TrajectoryTable};

/// Counters describing one cleaning pass.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct CleanReport {
    pub input_points:     usize,
    pub kept_points:      usize,
    pub discarded_points: usize,
    /// Contiguous runs of raw vehicle ids.
    pub input_runs:       usize,
    /// Fresh vehicle ids issued.
    pub output_vehicles:  usize,
}

/// Removes anomalous jumps and re-segments vehicles into fresh ids.
#[derive(Clone, Debug)]
pub struct TrajectoryCleaner {
    jump_threshold_m: f64,
}

impl TrajectoryCleaner {
    pub fn new(config: &CleanConfig) -> Self {
        Self { jump_threshold_m: config.jump_threshold_m }
    }

    /// Clean `raw`, returning the cleaned table with rebuilt run indexes.
    ///
    /// Cleaned ids are issued sequentially from `VehicleId(0)`.
    pub fn clean(&self, raw: &TrajectoryTable) -> (CleanedTrajectories, CleanReport) {
        let index = raw.vehicle_index();
        let mut out = TrajectoryTable::with_capacity(raw.len());
        let mut report = CleanReport { input_points: raw.len(), ..CleanReport::default() };
        let mut next_id = 0u32;

        for raw_id in index.ids() {
            let Some(runs) = index.lookup(raw_id) else { continue };
            for run in runs {
                report.input_runs += 1;

                let mut last = raw.point(run.start);
                let mut current = VehicleId(next_id);
                next_id += 1;
                out.push(last, current, raw.lane[run.start]);

                // `open` is false after a discard until the next acceptance.
                let mut open = true;
                for k in run.start + 1..=run.end {
                    let p = raw.point(k);
                    if last.distance(p) < self.jump_threshold_m {
                        if !open {
                            current = VehicleId(next_id);
                            next_id += 1;
                            open = true;
                        }
                        out.push(p, current, raw.lane[k]);
                        last = p;
                    } else {
                        report.discarded_points += 1;
                        open = false;
                    }
                }
            }
            debug!(vehicle = raw_id.0, runs = runs.len(), "cleaned vehicle");
        }

        report.kept_points = out.len();
        report.output_vehicles = next_id as usize;
        info!(
            input = report.input_points,
            kept = report.kept_points,
            discarded = report.discarded_points,
            vehicles = report.output_vehicles,
            "trajectory cleaning complete"
        );

        (CleanedTrajectories::new(out), report)
    }
}

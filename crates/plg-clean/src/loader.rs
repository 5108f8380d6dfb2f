//! CSV trajectory loader.
//!
//! # CSV format
//!
//! One row per sample, in recording order.  `lane_id` is optional; when the
//! column is absent every sample is given lane 0.
//!
//! ```csv
//! x,y,vehicle_id,lane_id
//! 12.0,4.5,7,1
//! 12.4,4.6,7,1
//! 31.0,9.2,8,2
//! ```
//!
//! Coordinates are converted to metres and shifted so the minimum `x` and
//! `y` are zero, which is the frame every later stage assumes.

use std::io::Read;
use std::path::Path;

use serde::Deserialize;

use plg_core::{LaneId, VehicleId};

use crate::dataset::{LengthUnit, TrajectoryTable};
use crate::{CleanError, CleanResult};

// ── CSV record ────────────────────────────────────────────────────────────────

#[derive(Deserialize)]
struct TrajectoryRecord {
    x:          f64,
    y:          f64,
    vehicle_id: u32,
    #[serde(default)]
    lane_id:    Option<u32>,
}

// ── Public API ────────────────────────────────────────────────────────────────

/// Load a raw trajectory table from a CSV file.
pub fn load_trajectories_csv(path: &Path, unit: LengthUnit) -> CleanResult<TrajectoryTable> {
    let file = std::fs::File::open(path).map_err(CleanError::Io)?;
    load_trajectories_reader(file, unit)
}

/// Like [`load_trajectories_csv`] but accepts any `Read` source.
///
/// Useful for testing (pass a `std::io::Cursor`) or embedding small datasets.
pub fn load_trajectories_reader<R: Read>(reader: R, unit: LengthUnit) -> CleanResult<TrajectoryTable> {
    let mut csv_reader = csv::Reader::from_reader(reader);
    let has_lane = csv_reader
        .headers()
        .map_err(|e| CleanError::Parse(e.to_string()))?
        .iter()
        .any(|h| h.trim() == "lane_id");

    let (mut x, mut y, mut vehicle, mut lane) = (Vec::new(), Vec::new(), Vec::new(), Vec::new());
    for result in csv_reader.deserialize::<TrajectoryRecord>() {
        let row = result.map_err(|e| CleanError::Parse(e.to_string()))?;
        if !row.x.is_finite() || !row.y.is_finite() {
            return Err(CleanError::Parse(format!(
                "non-finite coordinate ({}, {}) for vehicle {}",
                row.x, row.y, row.vehicle_id
            )));
        }
        x.push(row.x);
        y.push(row.y);
        vehicle.push(VehicleId(row.vehicle_id));
        lane.push(LaneId(row.lane_id.unwrap_or(0)));
    }

    let mut table = TrajectoryTable::from_columns(x, y, vehicle, has_lane.then_some(lane))?;
    table.convert_units(unit);
    table.normalise_origin();
    Ok(table)
}

//! Columnar trajectory storage.
//!
//! Raw logs are kept as parallel columns (`x`, `y`, `vehicle`, `lane`) rather
//! than a `Vec` of structs: the run index, the cleaner and the node
//! synthesizer all scan one or two columns at a time.

use plg_core::{LaneId, Point2, RunIndex, VehicleId};

use crate::{CleanError, CleanResult};

/// Length unit of the coordinates in a raw dataset.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Default)]
pub enum LengthUnit {
    #[default]
    Metres,
    Feet,
}

impl LengthUnit {
    /// Multiplier that converts this unit to metres.
    pub fn to_metres(self) -> f64 {
        match self {
            LengthUnit::Metres => 1.0,
            LengthUnit::Feet   => 0.3048,
        }
    }
}

// ── TrajectoryTable ───────────────────────────────────────────────────────────

/// Per-sample vehicle positions as parallel columns.
///
/// Sample order is significant: vehicle ids are run-length encoded, and the
/// node synthesizer's output depends on scan order.
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TrajectoryTable {
    pub x:       Vec<f64>,
    pub y:       Vec<f64>,
    pub vehicle: Vec<VehicleId>,
    pub lane:    Vec<LaneId>,
}

impl TrajectoryTable {
    /// Assemble a table from columns, checking they are parallel.
    ///
    /// A dataset without lane information passes `lane = None` and receives
    /// an all-zero lane column.
    pub fn from_columns(
        x:       Vec<f64>,
        y:       Vec<f64>,
        vehicle: Vec<VehicleId>,
        lane:    Option<Vec<LaneId>>,
    ) -> CleanResult<Self> {
        let n = x.len();
        check_len("y", n, y.len())?;
        check_len("vehicle", n, vehicle.len())?;
        let lane = match lane {
            Some(l) => {
                check_len("lane", n, l.len())?;
                l
            }
            None => vec![LaneId(0); n],
        };
        Ok(Self { x, y, vehicle, lane })
    }

    pub fn with_capacity(n: usize) -> Self {
        Self {
            x:       Vec::with_capacity(n),
            y:       Vec::with_capacity(n),
            vehicle: Vec::with_capacity(n),
            lane:    Vec::with_capacity(n),
        }
    }

    /// Append one sample.
    #[inline]
    pub fn push(&mut self, p: Point2, vehicle: VehicleId, lane: LaneId) {
        self.x.push(p.x);
        self.y.push(p.y);
        self.vehicle.push(vehicle);
        self.lane.push(lane);
    }

    pub fn len(&self) -> usize {
        self.x.len()
    }

    pub fn is_empty(&self) -> bool {
        self.x.is_empty()
    }

    /// Position of sample `k`.
    #[inline]
    pub fn point(&self, k: usize) -> Point2 {
        Point2::new(self.x[k], self.y[k])
    }

    /// All positions in stream order.
    pub fn points(&self) -> impl Iterator<Item = Point2> + '_ {
        self.x.iter().zip(&self.y).map(|(&x, &y)| Point2::new(x, y))
    }

    /// Scale coordinates to metres.
    pub fn convert_units(&mut self, unit: LengthUnit) {
        let k = unit.to_metres();
        if k == 1.0 {
            return;
        }
        self.x.iter_mut().for_each(|v| *v *= k);
        self.y.iter_mut().for_each(|v| *v *= k);
    }

    /// Shift coordinates so the minimum `x` and minimum `y` are both zero.
    pub fn normalise_origin(&mut self) {
        let min_x = self.x.iter().copied().fold(f64::INFINITY, f64::min);
        let min_y = self.y.iter().copied().fold(f64::INFINITY, f64::min);
        if !min_x.is_finite() || !min_y.is_finite() {
            return;
        }
        self.x.iter_mut().for_each(|v| *v -= min_x);
        self.y.iter_mut().for_each(|v| *v -= min_y);
    }

    /// `false` when every sample carries the same lane id, i.e. the column
    /// was defaulted and lane-aware processing is meaningless.
    pub fn has_lane_identity(&self) -> bool {
        match self.lane.first() {
            None        => false,
            Some(first) => self.lane.iter().any(|l| l != first),
        }
    }

    /// Run index over the vehicle column.
    pub fn vehicle_index(&self) -> RunIndex<VehicleId> {
        RunIndex::build(&self.vehicle)
    }
}

fn check_len(column: &'static str, expected: usize, got: usize) -> CleanResult<()> {
    if expected == got {
        Ok(())
    } else {
        Err(CleanError::ColumnLengthMismatch { column, expected, got })
    }
}

// ── CleanedTrajectories ───────────────────────────────────────────────────────

/// Output of the cleaner: a table whose vehicle ids are unique per
/// contiguous sub-path, plus fresh run indexes over it.
#[derive(Clone, Debug)]
pub struct CleanedTrajectories {
    pub table:    TrajectoryTable,
    /// Every cleaned vehicle id occupies exactly one run.
    pub vehicles: RunIndex<VehicleId>,
    pub lanes:    RunIndex<LaneId>,
}

impl CleanedTrajectories {
    pub fn new(table: TrajectoryTable) -> Self {
        let vehicles = RunIndex::build(&table.vehicle);
        let lanes = RunIndex::build(&table.lane);
        Self { table, vehicles, lanes }
    }

    pub fn vehicle_count(&self) -> usize {
        self.vehicles.id_count()
    }

    /// Positions of one cleaned vehicle, or `None` if the id is unknown.
    pub fn trajectory(&self, vehicle: VehicleId) -> Option<Vec<Point2>> {
        let runs = self.vehicles.lookup(vehicle)?;
        Some(
            runs.iter()
                .flat_map(|r| r.range())
                .map(|k| self.table.point(k))
                .collect(),
        )
    }

    /// Every cleaned vehicle with its positions, in stream order.
    pub fn trajectories(&self) -> impl Iterator<Item = (VehicleId, Vec<Point2>)> + '_ {
        self.vehicles.runs_in_order().iter().map(|&(id, run)| {
            let pts = run.range().map(|k| self.table.point(k)).collect();
            (id, pts)
        })
    }
}

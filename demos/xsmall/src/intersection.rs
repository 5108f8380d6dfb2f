//! Synthetic four-way intersection survey.
//!
//! A 100 m × 100 m box with one lane per approach, crossing at (50, 50):
//!
//! ```text
//!                 S↓  N↑
//!                 x47 x53
//!      W ← ─────────────────── y53   lane 2
//!      E → ─────────────────── y47   lane 1
//!                 │    │
//!              lane 4  lane 3
//! ```
//!
//! Every approach feeds a straight, a left and a right movement.  Vehicles
//! are sampled every metre with a little lateral noise, and one vehicle
//! carries a GPS glitch that the cleaner has to remove.

use plg_clean::TrajectoryTable;
use plg_core::{LaneId, PlgRng, Point2, VehicleId};

/// Vehicles recorded per movement.
pub const VEHICLES_PER_MOVEMENT: usize = 4;

const SAMPLE_SPACING_M: f64 = 1.0;
const NOISE_M:          f64 = 0.25;
const GLITCH_VEHICLE:   u32 = 5;
const GLITCH_SAMPLE:    usize = 30;
const GLITCH_OFFSET_M:  f64 = 30.0;

#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub enum Heading {
    East,
    West,
    North,
    South,
}

impl Heading {
    pub const ALL: [Heading; 4] = [Heading::East, Heading::West, Heading::North, Heading::South];

    fn entry(self) -> Point2 {
        match self {
            Heading::East  => Point2::new(0.0, 47.0),
            Heading::West  => Point2::new(100.0, 53.0),
            Heading::North => Point2::new(53.0, 0.0),
            Heading::South => Point2::new(47.0, 100.0),
        }
    }

    fn exit(self) -> Point2 {
        match self {
            Heading::East  => Point2::new(100.0, 47.0),
            Heading::West  => Point2::new(0.0, 53.0),
            Heading::North => Point2::new(53.0, 100.0),
            Heading::South => Point2::new(47.0, 0.0),
        }
    }

    fn lane(self) -> LaneId {
        match self {
            Heading::East  => LaneId(1),
            Heading::West  => LaneId(2),
            Heading::North => LaneId(3),
            Heading::South => LaneId(4),
        }
    }

    fn horizontal(self) -> bool {
        matches!(self, Heading::East | Heading::West)
    }

    fn opposite(self) -> Heading {
        match self {
            Heading::East  => Heading::West,
            Heading::West  => Heading::East,
            Heading::North => Heading::South,
            Heading::South => Heading::North,
        }
    }
}

/// Corner points of the movement `from → to`, each tagged with the lane of
/// the segment it starts.
fn route(from: Heading, to: Heading) -> Vec<(Point2, LaneId)> {
    let (a, b) = (from.entry(), to.exit());
    if from == to {
        return vec![(a, from.lane()), (b, to.lane())];
    }
    let corner = if from.horizontal() { Point2::new(b.x, a.y) } else { Point2::new(a.x, b.y) };
    vec![(a, from.lane()), (corner, to.lane()), (b, to.lane())]
}

/// Sample a route every [`SAMPLE_SPACING_M`] metres with uniform noise.
fn drive(route: &[(Point2, LaneId)], rng: &mut PlgRng) -> Vec<(Point2, LaneId)> {
    let mut out = Vec::new();
    for pair in route.windows(2) {
        let ((a, lane), (b, _)) = (pair[0], pair[1]);
        let steps = (a.distance(b) / SAMPLE_SPACING_M).ceil() as usize;
        for k in 0..steps {
            let t = k as f64 / steps as f64;
            let p = Point2::new(a.x + (b.x - a.x) * t, a.y + (b.y - a.y) * t);
            out.push((jitter(p, rng), lane));
        }
    }
    if let Some(&(end, lane)) = route.last() {
        out.push((jitter(end, rng), lane));
    }
    out
}

fn jitter(p: Point2, rng: &mut PlgRng) -> Point2 {
    Point2::new(
        p.x + rng.gen_range(-NOISE_M..=NOISE_M),
        p.y + rng.gen_range(-NOISE_M..=NOISE_M),
    )
}

/// Raw survey table: every movement, [`VEHICLES_PER_MOVEMENT`] vehicles each,
/// one contiguous run per vehicle.
pub fn build_survey(seed: u64) -> TrajectoryTable {
    let mut rng = PlgRng::new(seed);
    let mut table = TrajectoryTable::default();
    let mut vehicle = 0u32;

    for from in Heading::ALL {
        for to in Heading::ALL.into_iter().filter(|&to| to != from.opposite()) {
            let path = route(from, to);
            for _ in 0..VEHICLES_PER_MOVEMENT {
                vehicle += 1;
                let mut vrng = rng.child(vehicle as u64);
                for (i, (mut p, lane)) in drive(&path, &mut vrng).into_iter().enumerate() {
                    if vehicle == GLITCH_VEHICLE && i == GLITCH_SAMPLE {
                        p.y += GLITCH_OFFSET_M;
                    }
                    table.push(p, VehicleId(vehicle), lane);
                }
            }
        }
    }
    table
}

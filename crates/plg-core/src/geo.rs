//! Planar coordinate type and spatial utilities.
//!
//! Trajectories are converted to a local metric frame before they reach the
//! core, so all geometry here is flat Euclidean in metres.  `f64` is used
//! throughout: origin-normalised survey coordinates routinely exceed the
//! range where `f32` keeps centimetre precision.

/// A point in the local metric plane.
#[derive(Copy, Clone, Debug, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Point2 {
    pub x: f64,
    pub y: f64,
}

impl Point2 {
    pub const ORIGIN: Point2 = Point2 { x: 0.0, y: 0.0 };

    #[inline]
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Euclidean distance in metres.
    #[inline]
    pub fn distance(self, other: Point2) -> f64 {
        self.distance_sq(other).sqrt()
    }

    /// Squared Euclidean distance.  Cheaper than [`distance`](Self::distance)
    /// when only comparisons are needed.
    #[inline]
    pub fn distance_sq(self, other: Point2) -> f64 {
        let dx = other.x - self.x;
        let dy = other.y - self.y;
        dx * dx + dy * dy
    }

    /// Angle of the displacement `self → other` in radians, in `(-π, π]`.
    ///
    /// Zero points along `+x`; positive angles turn towards `+y`.  A zero
    /// displacement yields `0.0`.
    #[inline]
    pub fn heading_to(self, other: Point2) -> f64 {
        (other.y - self.y).atan2(other.x - self.x)
    }

    /// `[x, y]` array form used by the R-tree indexes.
    #[inline]
    pub fn to_array(self) -> [f64; 2] {
        [self.x, self.y]
    }

    /// Arithmetic mean of a non-empty set of points; `None` if empty.
    pub fn centroid<I: IntoIterator<Item = Point2>>(points: I) -> Option<Point2> {
        let mut n = 0usize;
        let (mut sx, mut sy) = (0.0, 0.0);
        for p in points {
            sx += p.x;
            sy += p.y;
            n += 1;
        }
        (n > 0).then(|| Point2::new(sx / n as f64, sy / n as f64))
    }
}

impl From<[f64; 2]> for Point2 {
    #[inline]
    fn from([x, y]: [f64; 2]) -> Self {
        Self { x, y }
    }
}

impl std::fmt::Display for Point2 {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({:.3}, {:.3})", self.x, self.y)
    }
}

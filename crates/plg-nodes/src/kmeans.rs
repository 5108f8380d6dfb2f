//! Seeded Lloyd k-means over 2-D points.
//!
//! The cluster count is the number of initial centroids supplied by the
//! caller, so the fit is fully deterministic: there is no random restart.
//!
//! - Assignment ties go to the lowest centroid index.
//! - A centroid that attracts no points keeps its previous position.
//! - Iteration stops once no centroid moves further than `tolerance`, or
//!   after `max_iterations` update steps.

use plg_core::Point2;

/// Lloyd iteration parameters.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct KMeans {
    pub max_iterations: usize,
    pub tolerance:      f64,
}

/// Outcome of one [`KMeans::fit`].
#[derive(Clone, Debug, PartialEq)]
pub struct KMeansFit {
    /// Final centroids, in the order of the initial centroids.
    pub centroids:  Vec<Point2>,
    /// Update steps performed.
    pub iterations: usize,
    pub converged:  bool,
}

impl KMeans {
    pub fn new(max_iterations: usize, tolerance: f64) -> Self {
        Self { max_iterations, tolerance }
    }

    /// Fit `init.len()` clusters to `data`, starting from `init`.
    ///
    /// With empty `init` or empty `data` the initial centroids are returned
    /// unchanged and reported as converged.
    pub fn fit(&self, init: &[Point2], data: &[Point2]) -> KMeansFit {
        let mut centroids = init.to_vec();
        if centroids.is_empty() || data.is_empty() {
            return KMeansFit { centroids, iterations: 0, converged: true };
        }

        let k = centroids.len();
        let mut sum = vec![(0.0f64, 0.0f64); k];
        let mut count = vec![0usize; k];

        for iteration in 1..=self.max_iterations {
            sum.iter_mut().for_each(|s| *s = (0.0, 0.0));
            count.iter_mut().for_each(|c| *c = 0);

            for &p in data {
                let c = nearest_centroid(&centroids, p);
                sum[c].0 += p.x;
                sum[c].1 += p.y;
                count[c] += 1;
            }

            let mut max_shift = 0.0f64;
            for c in 0..k {
                if count[c] == 0 {
                    continue;
                }
                let n = count[c] as f64;
                let next = Point2::new(sum[c].0 / n, sum[c].1 / n);
                max_shift = max_shift.max(centroids[c].distance(next));
                centroids[c] = next;
            }

            if max_shift <= self.tolerance {
                return KMeansFit { centroids, iterations: iteration, converged: true };
            }
        }

        KMeansFit { centroids, iterations: self.max_iterations, converged: false }
    }

    /// Index of the centroid nearest to each point in `data`.
    pub fn assign(centroids: &[Point2], data: &[Point2]) -> Vec<usize> {
        data.iter().map(|&p| nearest_centroid(centroids, p)).collect()
    }
}

/// Nearest centroid by squared distance; strict `<` keeps the lowest index on
/// ties.  `centroids` must be non-empty.
fn nearest_centroid(centroids: &[Point2], p: Point2) -> usize {
    let mut best = 0;
    let mut best_d = f64::INFINITY;
    for (i, c) in centroids.iter().enumerate() {
        let d = c.distance_sq(p);
        if d < best_d {
            best = i;
            best_d = d;
        }
    }
    best
}

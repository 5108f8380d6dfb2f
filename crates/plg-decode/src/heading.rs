//! Node path → `(x, y, heading)` samples.
//!
//! Each edge of the path gets the heading of its displacement vector.  The
//! edge headings are smoothed with a trailing window average, which drops
//! `window − 1` values at the front, and the smoothed sequence is left-padded
//! with its first value until there is one heading per node.
//!
//! ```text
//! nodes     n0    n1    n2    n3
//! edges        h0    h1    h2
//! smoothed              s0          (window 3: mean of h0 h1 h2)
//! padded    s0    s0    s0    s0
//! ```
//!
//! Headings are angles, so the edge sequence is unwrapped (consecutive
//! steps kept within ±π) before averaging and the result wrapped back into
//! (−π, π].  A westbound path jittering across ±π averages to ≈π, not 0.
//!
//! A path with exactly `window` nodes has only `window − 1` edges; the
//! window is clamped to the edges available so such a path still yields one
//! smoothed value.  Fewer than `window` nodes is an error.

use std::f64::consts::{PI, TAU};

use plg_core::Point2;
use plg_nodes::NodeSet;

use crate::{DecodeError, DecodeResult, GeneratedPath};

/// One row of a synthesized-path table.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PathSample {
    pub x:       f64,
    pub y:       f64,
    /// Radians, counter-clockwise from +x.
    pub heading: f64,
}

/// `out[i] = mean(values[i .. i + window])`; length `values.len() − window + 1`.
///
/// Empty when `window` is zero or longer than `values`.
pub fn moving_average(values: &[f64], window: usize) -> Vec<f64> {
    if window == 0 {
        return Vec::new();
    }
    values.windows(window).map(|w| w.iter().sum::<f64>() / window as f64).collect()
}

/// Wrap an angle into (−π, π].
pub fn wrap_angle(a: f64) -> f64 {
    let r = a.rem_euclid(TAU);
    if r > PI { r - TAU } else { r }
}

/// Shift each angle by a multiple of 2π so no step between neighbours
/// exceeds π.  The first angle is kept as is.
pub fn unwrap_angles(angles: &[f64]) -> Vec<f64> {
    let mut out: Vec<f64> = Vec::with_capacity(angles.len());
    for &a in angles {
        let next = match out.last() {
            Some(&prev) => prev + wrap_angle(a - prev),
            None => a,
        };
        out.push(next);
    }
    out
}

/// Smoothed, padded heading of every point in `positions`.
///
/// Needs at least `max(window, 2)` points.  With exactly `window` points the
/// averaging window is clamped to the `window − 1` edges available.
pub fn headings(positions: &[Point2], window: usize) -> DecodeResult<Vec<f64>> {
    let needed = window.max(2);
    if positions.len() < needed {
        return Err(DecodeError::PathTooShort { needed, got: positions.len() });
    }

    let raw: Vec<f64> = positions.windows(2).map(|w| w[0].heading_to(w[1])).collect();
    let smoothed: Vec<f64> = moving_average(&unwrap_angles(&raw), window.min(raw.len()))
        .into_iter()
        .map(wrap_angle)
        .collect();
    let Some(&first) = smoothed.first() else {
        return Err(DecodeError::PathTooShort { needed, got: positions.len() });
    };

    let mut out = Vec::with_capacity(positions.len());
    out.resize(positions.len() - smoothed.len(), first);
    out.extend_from_slice(&smoothed);
    Ok(out)
}

/// Export samples for a decoded path.  A dead-end sentinel is never part of
/// `path.nodes`, so nothing needs stripping here.
pub fn samples(nodes: &NodeSet, path: &GeneratedPath, window: usize) -> DecodeResult<Vec<PathSample>> {
    let positions: Vec<Point2> = path.nodes.iter().map(|&n| nodes.position(n)).collect();
    let heading = headings(&positions, window)?;
    Ok(positions
        .into_iter()
        .zip(heading)
        .map(|(p, heading)| PathSample { x: p.x, y: p.y, heading })
        .collect())
}

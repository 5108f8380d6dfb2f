//! Pipeline configuration.
//!
//! One immutable [`PlgConfig`] value is built up front (typically loaded from
//! a TOML file by the application crate) and passed by reference into every
//! stage.  No stage reads ambient state.
//!
//! Defaults reproduce the parameters the lane graph was tuned with on the
//! Lankershim survey data.

use crate::{LaneId, PlgError, PlgResult};

// ── Stage sections ────────────────────────────────────────────────────────────

/// Trajectory cleaner parameters.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct CleanConfig {
    /// A sample further than this (metres) from the last accepted sample of
    /// its vehicle is discarded as a jump.  Default: 10.
    pub jump_threshold_m: f64,
}

impl Default for CleanConfig {
    fn default() -> Self {
        Self { jump_threshold_m: 10.0 }
    }
}

/// Per-lane k-means relocation of synthesized nodes.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct LaneRefinement {
    /// Run the refinement at all.  Skipped automatically when the dataset
    /// carries no lane identity.
    pub enabled: bool,
    /// Background / no-lane ids whose nodes are never relocated.
    pub ignored_lanes: Vec<LaneId>,
    /// Lloyd iteration cap per lane.  Default: 100.
    pub max_iterations: usize,
    /// Stop early once no centroid moves further than this (metres).
    pub tolerance_m: f64,
}

impl Default for LaneRefinement {
    fn default() -> Self {
        Self {
            enabled:        true,
            ignored_lanes:  vec![LaneId(0), LaneId(101)],
            max_iterations: 100,
            tolerance_m:    1e-4,
        }
    }
}

/// Node synthesizer parameters.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct NodeConfig {
    /// Minimum distance (metres) between any two synthesized nodes.
    /// Default: 3.
    pub min_separation_m: f64,
    pub refinement: LaneRefinement,
}

impl Default for NodeConfig {
    fn default() -> Self {
        Self { min_separation_m: 3.0, refinement: LaneRefinement::default() }
    }
}

/// Transition model parameters.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct ModelConfig {
    /// Observed transitions between nodes further apart than this (metres)
    /// are dropped before normalisation.  Default: 10.
    pub max_edge_length_m: f64,
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self { max_edge_length_m: 10.0 }
    }
}

/// Entry/exit cluster parameters for the reference cluster generator.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct ClusterConfig {
    pub start_clusters:  usize,
    pub target_clusters: usize,
    pub max_iterations:  usize,
}

impl Default for ClusterConfig {
    fn default() -> Self {
        Self { start_clusters: 10, target_clusters: 10, max_iterations: 100 }
    }
}

/// Path decoder and generator parameters.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct DecodeConfig {
    /// Decoding stops once a path holds this many entries.  Paths that hit
    /// the cap are discarded as unterminated.  Default: 300.
    pub max_path_length: usize,
    /// Paths with fewer nodes than this are discarded.  Default: 5.
    pub min_path_length: usize,
    /// Centered moving-average window for headings.  Default: 3.
    pub smoothing_window: usize,
    /// Random (start, target) draws before the generator gives up.
    pub max_attempts: usize,
}

impl Default for DecodeConfig {
    fn default() -> Self {
        Self {
            max_path_length:  300,
            min_path_length:  5,
            smoothing_window: 3,
            max_attempts:     100,
        }
    }
}

// ── PlgConfig ─────────────────────────────────────────────────────────────────

/// Top-level configuration for a lane-graph build and generation session.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct PlgConfig {
    pub clean:    CleanConfig,
    pub nodes:    NodeConfig,
    pub model:    ModelConfig,
    pub clusters: ClusterConfig,
    pub decode:   DecodeConfig,
    /// Master RNG seed.  The same seed always produces identical paths.
    pub seed: u64,
}

impl Default for PlgConfig {
    fn default() -> Self {
        Self {
            clean:    CleanConfig::default(),
            nodes:    NodeConfig::default(),
            model:    ModelConfig::default(),
            clusters: ClusterConfig::default(),
            decode:   DecodeConfig::default(),
            seed:     42,
        }
    }
}

impl PlgConfig {
    /// Reject parameter combinations no stage can work with.
    pub fn validate(&self) -> PlgResult<()> {
        positive("clean.jump_threshold_m", self.clean.jump_threshold_m)?;
        positive("nodes.min_separation_m", self.nodes.min_separation_m)?;
        positive("model.max_edge_length_m", self.model.max_edge_length_m)?;

        if self.nodes.refinement.tolerance_m < 0.0 {
            return Err(PlgError::Config("nodes.refinement.tolerance_m must be ≥ 0".into()));
        }
        if self.clusters.start_clusters == 0 || self.clusters.target_clusters == 0 {
            return Err(PlgError::Config("cluster counts must be ≥ 1".into()));
        }

        let d = &self.decode;
        if d.smoothing_window == 0 {
            return Err(PlgError::Config("decode.smoothing_window must be ≥ 1".into()));
        }
        if d.min_path_length < d.smoothing_window {
            return Err(PlgError::Config(format!(
                "decode.min_path_length ({}) must be ≥ smoothing_window ({})",
                d.min_path_length, d.smoothing_window
            )));
        }
        if d.max_path_length <= d.min_path_length {
            return Err(PlgError::Config(format!(
                "decode.max_path_length ({}) must exceed min_path_length ({})",
                d.max_path_length, d.min_path_length
            )));
        }
        if d.max_attempts == 0 {
            return Err(PlgError::Config("decode.max_attempts must be ≥ 1".into()));
        }
        Ok(())
    }
}

fn positive(name: &str, v: f64) -> PlgResult<()> {
    if v.is_finite() && v > 0.0 {
        Ok(())
    } else {
        Err(PlgError::Config(format!("{name} must be a positive finite number, got {v}")))
    }
}

//! Pipeline observer trait for progress reporting and export.

use std::time::Instant;

use tracing::info;

use plg_decode::{GeneratedPath, PathSample};
use plg_model::{Plg, Stage};

/// Callbacks invoked by [`Pipeline`][crate::Pipeline] at stage boundaries
/// and for every generated path.
///
/// All methods have default no-op implementations so implementors only need to
/// override what they care about.
///
/// # Example — path counter
///
/// ```rust,ignore
/// struct Counter(usize);
///
/// impl PipelineObserver for Counter {
///     fn on_path_generated(&mut self, _i: usize, _p: &GeneratedPath, _s: &[PathSample]) {
///         self.0 += 1;
///     }
/// }
/// ```
pub trait PipelineObserver {
    /// Called before a stage mutates the snapshot.
    fn on_stage_start(&mut self, _stage: Stage) {}

    /// Called after a stage finished.  `summary` is a one-line human-readable
    /// description of what the stage produced.
    fn on_stage_end(&mut self, _stage: Stage, _summary: &str) {}

    /// Called once the snapshot has been handed to the store after `stage`.
    fn on_checkpoint(&mut self, _stage: Stage) {}

    /// Called once per accepted path, in path-index order.
    fn on_path_generated(&mut self, _index: usize, _path: &GeneratedPath, _samples: &[PathSample]) {}

    /// Called once after a [`generate`](crate::Pipeline::generate) batch has
    /// been reported in full.
    fn on_generation_end(&mut self, _count: usize) {}

    /// Called once after the last stage of a build, including a build that
    /// had nothing left to do.
    fn on_build_end(&mut self, _plg: &Plg) {}
}

/// A [`PipelineObserver`] that does nothing.
pub struct NoopObserver;

impl PipelineObserver for NoopObserver {}

/// Logs stage boundaries and elapsed time through `tracing`.
#[derive(Default)]
pub struct TracingObserver {
    stage_started: Option<Instant>,
}

impl TracingObserver {
    pub fn new() -> Self {
        Self::default()
    }
}

impl PipelineObserver for TracingObserver {
    fn on_stage_start(&mut self, stage: Stage) {
        self.stage_started = Some(Instant::now());
        info!(%stage, "stage started");
    }

    fn on_stage_end(&mut self, stage: Stage, summary: &str) {
        let elapsed_ms = self.stage_started.take().map_or(0, |t| t.elapsed().as_millis());
        info!(%stage, elapsed_ms, "{summary}");
    }

    fn on_checkpoint(&mut self, stage: Stage) {
        info!(%stage, "checkpoint written");
    }

    fn on_generation_end(&mut self, count: usize) {
        info!(count, "paths reported");
    }

    fn on_build_end(&mut self, plg: &Plg) {
        info!(
            nodes = plg.nodes.len(),
            start_clusters = plg.start_clusters.len(),
            target_clusters = plg.target_clusters.len(),
            edges = plg.global.edge_count(),
            "lane graph ready"
        );
    }
}

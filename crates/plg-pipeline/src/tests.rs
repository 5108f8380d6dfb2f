//! Integration tests for plg-pipeline.

use plg_clean::TrajectoryTable;
use plg_core::{LaneId, PlgConfig, Point2, VehicleId};
use plg_decode::{DecodeError, GeneratedPath, PathEnd, PathSample};
use plg_model::{EndpointClusterGenerator, Plg, Stage};
use plg_nodes::NearestNodeDiscretizer;

use crate::{
    MemoryStore, NoopObserver, Pipeline, PipelineBuilder, PipelineError, PipelineObserver,
    PipelineResult, SnapshotStore,
};

// ── Helpers ───────────────────────────────────────────────────────────────────

/// A four-way crossing: three vehicles drive east along y = 30 (lane 1),
/// three drive north along x = 30 (lane 2).  Samples are 1 m apart.
fn crossing() -> TrajectoryTable {
    let mut t = TrajectoryTable::with_capacity(6 * 61);
    for v in 1..=3 {
        for i in 0..=60 {
            t.push(Point2::new(i as f64, 30.0), VehicleId(v), LaneId(1));
        }
    }
    for v in 4..=6 {
        for i in 0..=60 {
            t.push(Point2::new(30.0, i as f64), VehicleId(v), LaneId(2));
        }
    }
    t
}

fn pipeline<S: SnapshotStore>(store: S) -> Pipeline<S> {
    let config = PlgConfig::default();
    let clusters = EndpointClusterGenerator::new(&config.clusters);
    PipelineBuilder::new(config, NearestNodeDiscretizer, clusters)
        .store(store)
        .build()
        .unwrap()
}

#[derive(Default)]
struct Recorder {
    started:     Vec<Stage>,
    ended:       Vec<Stage>,
    checkpoints: Vec<Stage>,
    paths:       Vec<(usize, usize)>,
    generated:   Option<usize>,
    builds:      usize,
}

impl PipelineObserver for Recorder {
    fn on_stage_start(&mut self, stage: Stage) {
        self.started.push(stage);
    }
    fn on_stage_end(&mut self, stage: Stage, summary: &str) {
        assert!(!summary.is_empty());
        self.ended.push(stage);
    }
    fn on_checkpoint(&mut self, stage: Stage) {
        self.checkpoints.push(stage);
    }
    fn on_path_generated(&mut self, index: usize, path: &GeneratedPath, samples: &[PathSample]) {
        assert_eq!(samples.len(), path.node_count());
        self.paths.push((index, samples.len()));
    }
    fn on_generation_end(&mut self, count: usize) {
        self.generated = Some(count);
    }
    fn on_build_end(&mut self, _plg: &Plg) {
        self.builds += 1;
    }
}

struct FailingStore;

impl SnapshotStore for FailingStore {
    fn load(&mut self) -> PipelineResult<Option<Plg>> {
        Ok(None)
    }
    fn save(&mut self, _plg: &Plg, stage: Stage) -> PipelineResult<()> {
        Err(PipelineError::store(Some(stage), "disk full"))
    }
}

// ── PipelineBuilder validation ────────────────────────────────────────────────

#[cfg(test)]
mod builder_tests {
    use super::*;

    #[test]
    fn builds_with_defaults() {
        let p = pipeline(MemoryStore::new());
        assert_eq!(p.config, PlgConfig::default());
        let store = p.into_store();
        assert!(store.latest.is_none());
        assert!(store.saves.is_empty());
    }

    #[test]
    fn invalid_config_rejected() {
        let mut config = PlgConfig::default();
        config.decode.smoothing_window = 0;
        let clusters = EndpointClusterGenerator::new(&config.clusters);
        let result = PipelineBuilder::new(config, NearestNodeDiscretizer, clusters).build();
        assert!(matches!(result, Err(PipelineError::Config(_))));
    }

    #[test]
    fn negative_threshold_rejected() {
        let mut config = PlgConfig::default();
        config.model.max_edge_length_m = -1.0;
        let clusters = EndpointClusterGenerator::new(&config.clusters);
        assert!(PipelineBuilder::new(config, NearestNodeDiscretizer, clusters).build().is_err());
    }
}

// ── Stage loop ────────────────────────────────────────────────────────────────

#[cfg(test)]
mod run_tests {
    use super::*;

    #[test]
    fn full_build_runs_every_stage_in_order() {
        let mut p = pipeline(MemoryStore::new());
        let mut obs = Recorder::default();
        let plg = p.run(&crossing(), &mut obs).unwrap();

        assert!(plg.is_ready());
        assert_eq!(plg.next_stage(), None);
        assert_eq!(obs.started, Stage::ALL.to_vec());
        assert_eq!(obs.ended, Stage::ALL.to_vec());
        assert_eq!(obs.checkpoints, Stage::ALL.to_vec());
        assert_eq!(obs.builds, 1);
        assert_eq!(p.store().saves, Stage::ALL.to_vec());
        assert_eq!(p.store().latest.as_ref(), Some(&plg));
    }

    #[test]
    fn crossing_produces_expected_structure() {
        let plg = pipeline(MemoryStore::new()).run(&crossing(), &mut NoopObserver).unwrap();

        assert!(plg.nodes.len() > 30);
        assert_eq!(plg.vehicle_paths.len(), 6);
        // One entry and one exit per approach.
        assert_eq!(plg.start_clusters.len(), 2);
        assert_eq!(plg.target_clusters.len(), 2);
        assert_eq!(plg.conditioned.len(), 2);
        assert!(plg.global.is_row_stochastic(1e-9));
        for m in plg.conditioned.values() {
            assert!(m.is_row_stochastic(1e-9));
        }
        assert_eq!(plg.stats.paths, 6);
        assert_eq!(plg.stats.uncategorised_paths, 0);
        assert_eq!(plg.stats.pruned_edges, 0);
    }

    #[test]
    fn resume_skips_completed_stages() {
        let full = pipeline(MemoryStore::new()).run(&crossing(), &mut NoopObserver).unwrap();

        let mut partial = full.clone();
        partial.completed = Some(Stage::Discretise);
        let mut p = pipeline(MemoryStore::with_snapshot(partial));
        let mut obs = Recorder::default();
        // An empty raw table proves the clean stage is not re-run.
        let resumed = p.run(&TrajectoryTable::default(), &mut obs).unwrap();

        assert_eq!(obs.started, vec![Stage::Clusters, Stage::Model]);
        assert_eq!(p.store().saves, vec![Stage::Clusters, Stage::Model]);
        assert_eq!(resumed, full);
    }

    #[test]
    fn resume_after_clean_rebuilds_cleaned_view() {
        let full = pipeline(MemoryStore::new()).run(&crossing(), &mut NoopObserver).unwrap();

        let mut partial = Plg::new();
        partial.cleaned = full.cleaned.clone();
        partial.mark_complete(Stage::Clean);
        let resumed = pipeline(MemoryStore::with_snapshot(partial))
            .run(&TrajectoryTable::default(), &mut NoopObserver)
            .unwrap();

        assert_eq!(resumed, full);
    }

    #[test]
    fn complete_snapshot_runs_nothing() {
        let full = pipeline(MemoryStore::new()).run(&crossing(), &mut NoopObserver).unwrap();
        let mut p = pipeline(MemoryStore::with_snapshot(full.clone()));
        let mut obs = Recorder::default();
        let again = p.run(&crossing(), &mut obs).unwrap();

        assert!(obs.started.is_empty());
        assert!(p.store().saves.is_empty());
        assert_eq!(obs.builds, 1);
        assert_eq!(again, full);
    }

    #[test]
    fn resume_disabled_rebuilds_from_raw() {
        let mut stale = Plg::new();
        stale.mark_complete(Stage::Model);

        let config = PlgConfig::default();
        let clusters = EndpointClusterGenerator::new(&config.clusters);
        let mut p = PipelineBuilder::new(config, NearestNodeDiscretizer, clusters)
            .store(MemoryStore::with_snapshot(stale))
            .resume(false)
            .build()
            .unwrap();
        let mut obs = Recorder::default();
        let plg = p.run(&crossing(), &mut obs).unwrap();

        assert_eq!(obs.started, Stage::ALL.to_vec());
        assert!(!plg.nodes.is_empty());
    }

    #[test]
    fn store_failure_stops_the_build() {
        let mut p = pipeline(FailingStore);
        let mut obs = Recorder::default();
        let err = p.run(&crossing(), &mut obs).unwrap_err();

        assert!(matches!(err, PipelineError::Store { stage: Some(Stage::Clean), .. }));
        assert_eq!(obs.started, vec![Stage::Clean]);
        assert!(obs.checkpoints.is_empty());
    }

    #[test]
    fn empty_input_builds_an_empty_graph() {
        let plg = pipeline(MemoryStore::new())
            .run(&TrajectoryTable::default(), &mut NoopObserver)
            .unwrap();
        assert!(plg.is_ready());
        assert!(plg.nodes.is_empty());
        assert!(plg.start_clusters.is_empty());
    }
}

// ── Path generation ───────────────────────────────────────────────────────────

#[cfg(test)]
mod generate_tests {
    use super::*;

    fn built() -> (Pipeline<MemoryStore>, Plg) {
        let mut p = pipeline(MemoryStore::new());
        let plg = p.run(&crossing(), &mut NoopObserver).unwrap();
        (p, plg)
    }

    #[test]
    fn every_path_reaches_its_target() {
        let (p, plg) = built();
        let mut obs = Recorder::default();
        let paths = p.generate(&plg, 8, &mut obs).unwrap();

        assert_eq!(paths.len(), 8);
        for path in &paths {
            assert_eq!(path.end, PathEnd::ReachedTarget);
            assert!(path.node_count() >= p.config.decode.min_path_length);
            assert!(plg.target_clusters.contains(path.target, *path.nodes.last().unwrap()));
        }
        let indices: Vec<usize> = obs.paths.iter().map(|&(i, _)| i).collect();
        assert_eq!(indices, (0..8).collect::<Vec<_>>());
        assert_eq!(obs.generated, Some(8));
    }

    #[test]
    fn batches_are_reproducible_and_extend() {
        let (p, plg) = built();
        let a = p.generate(&plg, 8, &mut NoopObserver).unwrap();
        let b = p.generate(&plg, 8, &mut NoopObserver).unwrap();
        let prefix = p.generate(&plg, 3, &mut NoopObserver).unwrap();

        assert_eq!(a, b);
        assert_eq!(prefix[..], a[..3]);
    }

    #[test]
    fn unbuilt_graph_is_rejected() {
        let (p, _) = built();
        let err = p.generate(&Plg::new(), 1, &mut NoopObserver).unwrap_err();
        assert!(matches!(err, PipelineError::Decode(DecodeError::NotReady)));
    }

    #[test]
    fn graph_without_clusters_is_rejected() {
        let mut store = MemoryStore::new();
        let mut p = pipeline(&mut store);
        let plg = p.run(&TrajectoryTable::default(), &mut NoopObserver).unwrap();

        let err = p.generate(&plg, 1, &mut NoopObserver).unwrap_err();
        assert!(matches!(err, PipelineError::Decode(DecodeError::NoClusters)));
        drop(p);
        assert_eq!(store.saves.len(), Stage::ALL.len());
    }
}

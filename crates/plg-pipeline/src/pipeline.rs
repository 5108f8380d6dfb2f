//! The `Pipeline` struct and its stage loop.

use tracing::{debug, info};

use plg_clean::{CleanedTrajectories, TrajectoryCleaner, TrajectoryTable};
use plg_core::PlgConfig;
use plg_decode::{samples, GeneratedPath, PathGenerator};
use plg_model::{ClusterGenerator, Plg, Stage, TransitionModelBuilder};
use plg_nodes::{discretize_all, refine_lanes, Discretizer, NodeSynthesizer};

use crate::{PipelineObserver, PipelineResult, SnapshotStore};

// ── Pipeline ──────────────────────────────────────────────────────────────────

/// Builds a [`Plg`] from raw trajectories and generates paths from it.
///
/// `run` drives the stages in order, one at a time, each mutating the
/// snapshot it is handed:
///
/// 1. **Clean**: drop jump samples and re-segment vehicles.
/// 2. **Nodes**: synthesize well-separated nodes, then refine them per lane.
/// 3. **Discretise**: map every cleaned trajectory to a node path.
/// 4. **Clusters**: partition path endpoints into start/target clusters.
/// 5. **Model**: count transitions, prune long edges, normalise.
///
/// After each stage the snapshot is marked complete up to that stage and
/// handed to the [`SnapshotStore`].  A later run resumes after the last
/// completed stage.
///
/// Create via [`PipelineBuilder`][crate::PipelineBuilder].
pub struct Pipeline<S: SnapshotStore> {
    /// Validated configuration shared by every stage.
    pub config: PlgConfig,

    pub(crate) discretizer: Box<dyn Discretizer>,
    pub(crate) clusters:    Box<dyn ClusterGenerator>,
    pub(crate) store:       S,
    pub(crate) resume:      bool,
}

impl<S: SnapshotStore> Pipeline<S> {
    // ── Public API ────────────────────────────────────────────────────────

    /// Run every stage not yet completed.
    ///
    /// With `resume` enabled (the default) the store's latest snapshot is the
    /// starting point and `raw` is only read if the clean stage still has to
    /// run.
    pub fn run<O: PipelineObserver>(
        &mut self,
        raw:      &TrajectoryTable,
        observer: &mut O,
    ) -> PipelineResult<Plg> {
        let start = if self.resume { self.store.load()? } else { None };
        match &start {
            Some(plg) => info!(completed = ?plg.completed, "resuming from checkpoint"),
            None => debug!("starting a fresh build"),
        }
        self.run_from(start.unwrap_or_default(), raw, observer)
    }

    /// Continue building `plg` from its first incomplete stage.
    pub fn run_from<O: PipelineObserver>(
        &mut self,
        mut plg:  Plg,
        raw:      &TrajectoryTable,
        observer: &mut O,
    ) -> PipelineResult<Plg> {
        // Rebuilt lazily from the snapshot when resuming past the clean stage.
        let mut cleaned: Option<CleanedTrajectories> = None;

        while let Some(stage) = plg.next_stage() {
            observer.on_stage_start(stage);
            let summary = self.run_stage(stage, &mut plg, raw, &mut cleaned)?;
            plg.mark_complete(stage);
            observer.on_stage_end(stage, &summary);

            self.store.save(&plg, stage)?;
            observer.on_checkpoint(stage);
        }

        observer.on_build_end(&plg);
        Ok(plg)
    }

    /// Generate `count` viable paths from a finished snapshot, reporting each
    /// with its heading samples.
    ///
    /// Path `i` depends only on `(config.seed, i)`, never on `count`.
    pub fn generate<O: PipelineObserver>(
        &self,
        plg:      &Plg,
        count:    usize,
        observer: &mut O,
    ) -> PipelineResult<Vec<GeneratedPath>> {
        let decode = &self.config.decode;
        let generator = PathGenerator::new(plg, decode)?;
        let paths = generator.generate_batch(count, self.config.seed)?;

        for (index, path) in paths.iter().enumerate() {
            let rows = samples(&plg.nodes, path, decode.smoothing_window)?;
            observer.on_path_generated(index, path, &rows);
        }
        observer.on_generation_end(paths.len());
        Ok(paths)
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn into_store(self) -> S {
        self.store
    }

    // ── Stages ────────────────────────────────────────────────────────────

    /// Run one stage against `plg`; returns the stage summary line.
    fn run_stage(
        &self,
        stage:   Stage,
        plg:     &mut Plg,
        raw:     &TrajectoryTable,
        cleaned: &mut Option<CleanedTrajectories>,
    ) -> PipelineResult<String> {
        let summary = match stage {
            Stage::Clean => {
                let (out, report) = TrajectoryCleaner::new(&self.config.clean).clean(raw);
                plg.cleaned = out.table.clone();
                *cleaned = Some(out);
                format!(
                    "kept {} of {} samples as {} vehicles",
                    report.kept_points, report.input_points, report.output_vehicles
                )
            }

            Stage::Nodes => {
                let traj = cleaned.get_or_insert_with(|| CleanedTrajectories::new(plg.cleaned.clone()));
                let mut nodes = NodeSynthesizer::new(&self.config.nodes).synthesize(traj)?;
                let report = refine_lanes(&mut nodes, traj, &self.config.nodes.refinement)?;
                plg.nodes = nodes;
                format!(
                    "{} nodes, {} lanes refined, {} nodes moved",
                    plg.nodes.len(), report.lanes_refined, report.nodes_moved
                )
            }

            Stage::Discretise => {
                let traj = cleaned.get_or_insert_with(|| CleanedTrajectories::new(plg.cleaned.clone()));
                plg.vehicle_paths = discretize_all(self.discretizer.as_ref(), &plg.nodes, traj);
                format!("{} vehicle paths", plg.vehicle_paths.len())
            }

            Stage::Clusters => {
                let assignment = self.clusters.generate(&plg.nodes, &plg.vehicle_paths)?;
                plg.set_clusters(assignment);
                format!(
                    "{} start clusters, {} target clusters",
                    plg.start_clusters.len(), plg.target_clusters.len()
                )
            }

            Stage::Model => {
                let model = TransitionModelBuilder::new(&self.config.model).build(
                    &plg.nodes,
                    &plg.vehicle_paths,
                    &plg.target_clusters,
                )?;
                plg.set_model(model);
                format!(
                    "{} edges from {} transitions, {} pruned",
                    plg.global.edge_count(), plg.stats.transitions, plg.stats.pruned_edges
                )
            }
        };
        Ok(summary)
    }
}

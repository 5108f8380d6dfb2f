//! xsmall — smallest end-to-end run of the probabilistic lane graph.
//!
//! Builds a lane graph from a synthetic 48-vehicle survey of a four-way
//! intersection, checkpointing every stage to `output/xsmall/plg.json`, then
//! generates a handful of paths and exports them as CSV.  Swap the survey
//! for `plg_clean::load_trajectories_csv` to run on recorded data.

mod intersection;

use std::path::Path;
use std::time::Instant;

use anyhow::Result;
use tracing_subscriber::EnvFilter;

use plg_core::PlgConfig;
use plg_decode::{GeneratedPath, PathSample};
use plg_io::{CsvWriter, ExportObserver, JsonSnapshotStore, PathWriter};
use plg_model::{EndpointClusterGenerator, Plg, Stage};
use plg_nodes::NearestNodeDiscretizer;
use plg_pipeline::{PipelineBuilder, PipelineObserver, TracingObserver};

use intersection::{build_survey, VEHICLES_PER_MOVEMENT};

// ── Constants ─────────────────────────────────────────────────────────────────

const SEED:       u64 = 42;
const PATH_COUNT: usize = 10;
const OUTPUT_DIR: &str = "output/xsmall";

// ── Observer wrapper: log, export, and keep a per-path summary ───────────────

struct DemoObserver<W: PathWriter> {
    log:     TracingObserver,
    export:  ExportObserver<W>,
    summary: Vec<(usize, usize, f64)>,
}

impl<W: PathWriter> DemoObserver<W> {
    fn new(export: ExportObserver<W>) -> Self {
        Self { log: TracingObserver::new(), export, summary: Vec::new() }
    }
}

impl<W: PathWriter> PipelineObserver for DemoObserver<W> {
    fn on_stage_start(&mut self, stage: Stage) {
        self.log.on_stage_start(stage);
    }

    fn on_stage_end(&mut self, stage: Stage, summary: &str) {
        self.log.on_stage_end(stage, summary);
    }

    fn on_checkpoint(&mut self, stage: Stage) {
        self.log.on_checkpoint(stage);
    }

    fn on_path_generated(&mut self, index: usize, path: &GeneratedPath, samples: &[PathSample]) {
        let final_heading = samples.last().map_or(0.0, |s| s.heading.to_degrees());
        self.summary.push((index, samples.len(), final_heading));
        self.export.on_path_generated(index, path, samples);
    }

    fn on_generation_end(&mut self, count: usize) {
        self.log.on_generation_end(count);
        self.export.on_generation_end(count);
    }

    fn on_build_end(&mut self, plg: &Plg) {
        self.log.on_build_end(plg);
        self.export.on_build_end(plg);
    }
}

// ── main ──────────────────────────────────────────────────────────────────────

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    println!("=== xsmall — probabilistic lane graph ===");
    println!("Vehicles per movement: {VEHICLES_PER_MOVEMENT}  |  Paths: {PATH_COUNT}  |  Seed: {SEED}");
    println!();

    // 1. Synthetic survey.
    let raw = build_survey(SEED);
    println!("Survey: {} samples", raw.len());

    // 2. Pipeline.  Always rebuild so edits to the survey take effect; the
    //    checkpoints are still written for `plg generate`.
    std::fs::create_dir_all(OUTPUT_DIR)?;
    let config = PlgConfig { seed: SEED, ..PlgConfig::default() };
    let clusters = EndpointClusterGenerator::new(&config.clusters);
    let mut pipeline = PipelineBuilder::new(config, NearestNodeDiscretizer, clusters)
        .store(JsonSnapshotStore::new(Path::new(OUTPUT_DIR).join("plg.json")))
        .resume(false)
        .build()?;

    // 3. Export.
    let export = ExportObserver::new(CsvWriter::new(Path::new(OUTPUT_DIR))?)
        .with_path_tables(OUTPUT_DIR);
    let mut obs = DemoObserver::new(export);

    // 4. Build and generate.
    let t0 = Instant::now();
    let plg = pipeline.run(&raw, &mut obs)?;
    let build_elapsed = t0.elapsed();
    let paths = pipeline.generate(&plg, PATH_COUNT, &mut obs)?;

    if let Some(e) = obs.export.take_error() {
        eprintln!("export error: {e}");
    }

    // 5. Summary.
    println!("Build complete in {:.3} s", build_elapsed.as_secs_f64());
    println!("  nodes           : {}", plg.nodes.len());
    println!("  vehicle paths   : {}", plg.vehicle_paths.len());
    println!("  start clusters  : {}", plg.start_clusters.len());
    println!("  target clusters : {}", plg.target_clusters.len());
    println!("  global edges    : {}", plg.global.edge_count());
    println!();

    // 6. Generated paths table.
    println!("{:<6} {:<8} {:<8} {:<8} {:<10}", "Path", "Start", "Target", "Nodes", "Exit hdg");
    println!("{}", "-".repeat(44));
    for (path, &(index, len, heading)) in paths.iter().zip(&obs.summary) {
        println!(
            "{:<6} {:<8} {:<8} {:<8} {:<10.1}",
            index, path.start.0, path.target.0, len, heading,
        );
    }

    Ok(())
}

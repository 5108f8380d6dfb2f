//! `plg` — build a lane graph from a trajectory CSV and generate paths.
//!
//! ```text
//! plg build    --input survey.csv [--feet] [--out DIR] [--fresh]
//! plg generate [--out DIR] [--count N] [--seed S] [--backend csv|sqlite|parquet]
//! plg init-config plg.toml
//! ```
//!
//! `build` checkpoints to `<out>/plg.json` after every stage and resumes
//! from it unless `--fresh` is given.  `generate` reads the same file.

use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use tracing::info;
use tracing_subscriber::EnvFilter;

use plg_clean::{load_trajectories_csv, LengthUnit, TrajectoryTable};
use plg_core::PlgConfig;
use plg_io::{load_config, load_snapshot, save_config, CsvWriter, ExportObserver, JsonSnapshotStore, PathWriter};
use plg_model::EndpointClusterGenerator;
use plg_nodes::NearestNodeDiscretizer;
use plg_pipeline::{NoStore, PipelineBuilder, TracingObserver};

const SNAPSHOT_FILE: &str = "plg.json";

// ── Arguments ─────────────────────────────────────────────────────────────────

/// Probabilistic lane graph builder and path generator
#[derive(Parser, Debug)]
#[command(name = "plg")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable debug-level logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// TOML config file (defaults apply for anything it leaves out)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Build (or resume building) the lane graph
    Build {
        /// Trajectory CSV with columns x,y,vehicle_id[,lane_id]
        #[arg(short, long)]
        input: PathBuf,

        /// Coordinates in the CSV are feet rather than metres
        #[arg(long)]
        feet: bool,

        /// Output directory for the snapshot
        #[arg(short, long, default_value = "output")]
        out: PathBuf,

        /// Ignore any existing checkpoint
        #[arg(long)]
        fresh: bool,
    },

    /// Generate paths from a built lane graph
    Generate {
        /// Directory holding plg.json; exports are written here too
        #[arg(short, long, default_value = "output")]
        out: PathBuf,

        /// Number of paths
        #[arg(short = 'n', long, default_value = "10")]
        count: usize,

        /// Override the configured seed
        #[arg(short, long)]
        seed: Option<u64>,

        /// Export backend
        #[arg(short, long, value_enum, default_value = "csv")]
        backend: Backend,

        /// Also write each path as its own x,y,heading table
        #[arg(long)]
        tables: bool,
    },

    /// Write the default configuration as TOML
    InitConfig {
        path: PathBuf,
    },
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
enum Backend {
    Csv,
    Sqlite,
    Parquet,
}

// ── main ──────────────────────────────────────────────────────────────────────

fn main() -> Result<()> {
    let cli = Cli::parse();

    let default_level = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .init();

    let config = match &cli.config {
        Some(path) => load_config(path).with_context(|| format!("loading {}", path.display()))?,
        None => PlgConfig::default(),
    };

    match cli.command {
        Commands::Build { input, feet, out, fresh } => run_build(config, &input, feet, &out, fresh),
        Commands::Generate { out, count, seed, backend, tables } => {
            let config = PlgConfig { seed: seed.unwrap_or(config.seed), ..config };
            run_generate(config, &out, count, backend, tables)
        }
        Commands::InitConfig { path } => {
            save_config(&path, &PlgConfig::default())?;
            println!("wrote {}", path.display());
            Ok(())
        }
    }
}

// ── Commands ──────────────────────────────────────────────────────────────────

fn run_build(config: PlgConfig, input: &Path, feet: bool, out: &Path, fresh: bool) -> Result<()> {
    std::fs::create_dir_all(out)?;
    let snapshot = out.join(SNAPSHOT_FILE);

    // Checkpoints are only written after the clean stage, so a resumed build
    // never reads the trajectories again.
    let resuming = !fresh && snapshot.exists();
    let raw = if resuming {
        info!(path = %snapshot.display(), "checkpoint found; input file not read");
        TrajectoryTable::default()
    } else {
        let unit = if feet { LengthUnit::Feet } else { LengthUnit::Metres };
        load_trajectories_csv(input, unit).with_context(|| format!("reading {}", input.display()))?
    };

    let clusters = EndpointClusterGenerator::new(&config.clusters);
    let mut pipeline = PipelineBuilder::new(config, NearestNodeDiscretizer, clusters)
        .store(JsonSnapshotStore::new(&snapshot))
        .resume(!fresh)
        .build()?;

    let plg = pipeline.run(&raw, &mut TracingObserver::new())?;

    println!(
        "lane graph: {} nodes, {} start / {} target clusters → {}",
        plg.nodes.len(),
        plg.start_clusters.len(),
        plg.target_clusters.len(),
        snapshot.display(),
    );
    Ok(())
}

fn run_generate(config: PlgConfig, out: &Path, count: usize, backend: Backend, tables: bool) -> Result<()> {
    let snapshot = out.join(SNAPSHOT_FILE);
    let plg = load_snapshot(&snapshot).with_context(|| format!("reading {}", snapshot.display()))?;
    if !plg.is_ready() {
        bail!("{} is not a finished lane graph; run `plg build` first", snapshot.display());
    }
    info!(path = %snapshot.display(), nodes = plg.nodes.len(), "lane graph loaded");

    match backend {
        Backend::Csv => export(config, &plg, out, count, tables, CsvWriter::new(out)?),
        #[cfg(feature = "sqlite")]
        Backend::Sqlite => export(config, &plg, out, count, tables, plg_io::SqliteWriter::new(out)?),
        #[cfg(feature = "parquet")]
        Backend::Parquet => export(config, &plg, out, count, tables, plg_io::ParquetWriter::new(out)?),
        #[allow(unreachable_patterns)]
        other => bail!("backend {other:?} not compiled in; rebuild with `--features {}`", feature_name(other)),
    }
}

fn export<W: PathWriter>(
    config: PlgConfig,
    plg:    &plg_model::Plg,
    out:    &Path,
    count:  usize,
    tables: bool,
    writer: W,
) -> Result<()> {
    let mut obs = ExportObserver::new(writer);
    if tables {
        obs = obs.with_path_tables(out);
    }
    obs.write_nodes(&plg.nodes)?;

    let pipeline = PipelineBuilder::new(
        config.clone(),
        NearestNodeDiscretizer,
        EndpointClusterGenerator::new(&config.clusters),
    )
    .store(NoStore)
    .build()?;
    let paths = pipeline.generate(plg, count, &mut obs)?;

    if let Some(e) = obs.take_error() {
        return Err(e).context("exporting paths");
    }
    let samples: usize = paths.iter().map(|p| p.node_count()).sum();
    println!("generated {} paths ({samples} samples) → {}", paths.len(), out.display());
    Ok(())
}

fn feature_name(backend: Backend) -> &'static str {
    match backend {
        Backend::Csv     => "csv",
        Backend::Sqlite  => "sqlite",
        Backend::Parquet => "parquet",
    }
}

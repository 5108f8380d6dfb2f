//! `plg-io` — persistence and export for the probabilistic lane graph.
//!
//! # Snapshots and configuration
//!
//! | Item                  | Purpose                                           |
//! |-----------------------|---------------------------------------------------|
//! | [`JsonSnapshotStore`] | `SnapshotStore` checkpointing to one JSON file    |
//! | [`load_config`]       | TOML → validated `PlgConfig`                      |
//!
//! # Path export
//!
//! Three backends are provided behind Cargo features:
//!
//! | Feature   | Backend     | Files created                                     |
//! |-----------|-------------|---------------------------------------------------|
//! | *(none)*  | CSV         | `nodes.csv`, `synthesized_paths.csv`              |
//! | `sqlite`  | SQLite      | `plg.db`                                          |
//! | `parquet` | Parquet     | `nodes.parquet`, `synthesized_paths.parquet`      |
//!
//! All backends implement [`PathWriter`] and are driven by
//! [`ExportObserver`], which implements `plg_pipeline::PipelineObserver`.
//!
//! # Usage
//!
//! ```rust,ignore
//! use plg_io::{CsvWriter, ExportObserver};
//!
//! let mut obs = ExportObserver::new(CsvWriter::new(Path::new("./output"))?);
//! obs.write_nodes(&plg.nodes)?;
//! pipeline.generate(&plg, 100, &mut obs)?;
//! obs.take_error().map(|e| eprintln!("export error: {e}"));
//! ```

pub mod config;
pub mod csv;
pub mod error;
pub mod observer;
pub mod row;
pub mod snapshot;
pub mod writer;

#[cfg(feature = "sqlite")]
pub mod sqlite;

#[cfg(feature = "parquet")]
pub mod parquet;


pub use config::{load_config, parse_config, save_config};
pub use csv::{write_path_table, CsvWriter};
pub use error::{OutputError, OutputResult};
pub use observer::ExportObserver;
pub use row::{NodeRow, PathRow};
pub use snapshot::{load_snapshot, save_snapshot, JsonSnapshotStore};
pub use writer::PathWriter;

#[cfg(feature = "sqlite")]
pub use sqlite::SqliteWriter;

#[cfg(feature = "parquet")]
pub use parquet::ParquetWriter;

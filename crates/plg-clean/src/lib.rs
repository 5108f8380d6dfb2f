//! `plg-clean` — raw trajectory tables, CSV loading, and trajectory cleaning.
//!
//! # Crate layout
//!
//! | Module      | Contents                                                    |
//! |-------------|-------------------------------------------------------------|
//! | [`dataset`] | `TrajectoryTable`, `CleanedTrajectories`, `LengthUnit`      |
//! | [`loader`]  | `load_trajectories_csv`, `load_trajectories_reader`         |
//! | [`cleaner`] | `TrajectoryCleaner`, `CleanReport`                          |
//! | [`error`]   | `CleanError`, `CleanResult<T>`                              |
//!
//! # Cleaning model (summary)
//!
//! ```text
//! raw table ──RunIndex(vehicle)──▶ per-run jump rejection ──▶ fresh ids
//!                                                       └──▶ RunIndex(vehicle), RunIndex(lane)
//! ```

pub mod cleaner;
pub mod dataset;
pub mod error;
pub mod loader;


pub use cleaner::{CleanReport, TrajectoryCleaner};
pub use dataset::{CleanedTrajectories, LengthUnit, TrajectoryTable};
pub use error::{CleanError, CleanResult};
pub use loader::{load_trajectories_csv, load_trajectories_reader};

//! `plg-core` — foundational types for the probabilistic lane graph workspace.
//!
//! This crate is a dependency of every other `plg-*` crate.  It intentionally
//! has no `plg-*` dependencies and minimal external ones (only `rand` and
//! `thiserror`, plus optional `serde`).
//!
//! # What lives here
//!
//! | Module        | Contents                                                |
//! |---------------|---------------------------------------------------------|
//! | [`ids`]       | `NodeId`, `VehicleId`, `LaneId`, `ClusterId`            |
//! | [`geo`]       | `Point2`, Euclidean distance, heading                   |
//! | [`run_index`] | `RunIndex`, `Run`, `RunSelector`                        |
//! | [`config`]    | `PlgConfig` and its per-stage sections                  |
//! | [`rng`]       | `PlgRng` (session and per-path seeding)                 |
//! | [`error`]     | `PlgError`, `RunIndexError`, `PlgResult`                |
//!
//! # Feature flags
//!
//! | Flag    | Effect                                                     |
//! |---------|------------------------------------------------------------|
//! | `serde` | Adds `Serialize`/`Deserialize` to ids, points and config.  |
//!           | Required by `plg-io` snapshots.                            |

pub mod config;
pub mod error;
pub mod geo;
pub mod ids;
pub mod rng;
pub mod run_index;

#[cfg(test)]
mod tests;

// ── Re-exports ────────────────────────────────────────────────────────────────

pub use config::{
    CleanConfig, ClusterConfig, DecodeConfig, LaneRefinement, ModelConfig, NodeConfig, PlgConfig,
};
pub use error::{PlgError, PlgResult, RunIndexError};
pub use geo::Point2;
pub use ids::{ClusterId, LaneId, NodeId, VehicleId};
pub use rng::PlgRng;
pub use run_index::{Run, RunIndex, RunSelector};

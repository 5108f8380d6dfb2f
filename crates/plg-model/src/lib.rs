//! `plg-model` — transition models, clusters, and the lane graph snapshot.
//!
//! # Crate layout
//!
//! | Module       | Contents                                                     |
//! |--------------|--------------------------------------------------------------|
//! | [`matrix`]   | `CountMatrix` accumulator, `TransitionMatrix` (CSR)          |
//! | [`cluster`]  | `ClusterSet`, `Cluster`, `ClusterGenerator`, `EndpointClusterGenerator` |
//! | [`builder`]  | `TransitionModelBuilder`, `TransitionModel`, `ModelStats`    |
//! | [`snapshot`] | `Plg` snapshot, `Stage`                                      |
//! | [`error`]    | `ModelError`, `ModelResult<T>`                               |
//!
//! # Feature flags
//!
//! | Flag       | Effect                                                      |
//! |------------|-------------------------------------------------------------|
//! | `parallel` | Transition counting runs as a Rayon fold + reduce.          |
//! | `fx-hash`  | FxHashMap for the node → cluster lookup.                    |
//! | `serde`    | `Plg` and everything it holds become (de)serializable.      |

pub mod builder;
pub mod cluster;
pub mod error;
pub mod matrix;
pub mod snapshot;

#[cfg(test)]
mod tests;

pub use builder::{ModelStats, TransitionModel, TransitionModelBuilder};
pub use cluster::{Cluster, ClusterAssignment, ClusterGenerator, ClusterSet, EndpointClusterGenerator};
pub use error::{ModelError, ModelResult};
pub use matrix::{CountMatrix, TransitionMatrix};
pub use snapshot::{Plg, Stage};

//! `plg-nodes` — node synthesis, lane refinement, and trajectory discretization.
//!
//! # Crate layout
//!
//! | Module          | Contents                                                |
//! |-----------------|---------------------------------------------------------|
//! | [`node_set`]    | `NodeSet` (positions + lane ids + R-tree)               |
//! | [`synthesizer`] | `NodeSynthesizer` (greedy min-separation placement)     |
//! | [`kmeans`]      | `KMeans`, `KMeansFit` (seeded Lloyd iteration)          |
//! | [`refine`]      | `refine_lanes`, `RefinementReport`                      |
//! | [`discretize`]  | `Discretizer` trait, `NearestNodeDiscretizer`, `VehiclePaths` |
//! | [`error`]       | `NodeError`, `NodeResult<T>`                            |
//!
//! # Feature flags
//!
//! | Flag       | Effect                                                    |
//! |------------|-----------------------------------------------------------|
//! | `parallel` | Per-lane k-means fits run on Rayon's thread pool.         |
//! | `serde`    | `NodeSet` serializes as position and lane columns.        |

pub mod discretize;
pub mod error;
pub mod kmeans;
pub mod node_set;
pub mod refine;
pub mod synthesizer;


pub use discretize::{discretize_all, Discretizer, NearestNodeDiscretizer, VehiclePaths};
pub use error::{NodeError, NodeResult};
pub use kmeans::{KMeans, KMeansFit};
pub use node_set::NodeSet;
pub use refine::{refine_lanes, RefinementReport};
pub use synthesizer::NodeSynthesizer;

//! `plg-pipeline` — stage driver for building and sampling a probabilistic
//! lane graph.
//!
//! # Stage loop
//!
//! ```text
//! plg = store.load() or Plg::new()
//! while let Some(stage) = plg.next_stage():
//!   ① Clean       — jump removal, vehicle re-segmentation
//!   ② Nodes       — synthesize nodes, refine per lane
//!   ③ Discretise  — trajectories → node paths
//!   ④ Clusters    — start/target clusters over path endpoints
//!   ⑤ Model       — global + target-conditioned transition matrices
//!   mark_complete(stage); store.save(plg)
//! ```
//!
//! # Cargo features
//!
//! | Feature    | Effect                                                       |
//! |------------|--------------------------------------------------------------|
//! | `parallel` | Refinement, model accumulation and batch generation on Rayon. |
//! | `fx-hash`  | FxHash for the node → cluster lookup.                        |
//! | `serde`    | Derives on the snapshot and its parts.                       |
//!
//! # Quick-start
//!
//! ```rust,ignore
//! use plg_core::PlgConfig;
//! use plg_model::EndpointClusterGenerator;
//! use plg_nodes::NearestNodeDiscretizer;
//! use plg_pipeline::{NoopObserver, PipelineBuilder};
//!
//! let clusters = EndpointClusterGenerator::new(&config.clusters);
//! let mut pipeline = PipelineBuilder::new(config, NearestNodeDiscretizer, clusters)
//!     .build()?;
//! let plg = pipeline.run(&raw, &mut NoopObserver)?;
//! let paths = pipeline.generate(&plg, 100, &mut NoopObserver)?;
//! ```

pub mod builder;
pub mod error;
pub mod observer;
pub mod pipeline;
pub mod store;

#[cfg(test)]
mod tests;

pub use builder::PipelineBuilder;
pub use error::{PipelineError, PipelineResult};
pub use observer::{NoopObserver, PipelineObserver, TracingObserver};
pub use pipeline::Pipeline;
pub use store::{MemoryStore, NoStore, SnapshotStore};

//! Fluent builder for constructing a [`Pipeline`].

use plg_core::PlgConfig;
use plg_model::ClusterGenerator;
use plg_nodes::Discretizer;

use crate::{NoStore, Pipeline, PipelineResult, SnapshotStore};

/// Fluent builder for [`Pipeline<S>`].
///
/// # Required inputs
///
/// - [`PlgConfig`] — thresholds, cluster counts, decode limits, seed
/// - `Discretizer` — maps cleaned samples to node paths
///   (e.g. [`plg_nodes::NearestNodeDiscretizer`])
/// - `ClusterGenerator` — partitions nodes into entry/exit clusters
///   (e.g. [`plg_model::EndpointClusterGenerator`])
///
/// # Optional inputs (have defaults)
///
/// | Method          | Default                                      |
/// |-----------------|----------------------------------------------|
/// | `.store(s)`     | [`NoStore`] (no checkpoints, always fresh)   |
/// | `.resume(b)`    | `true`: continue from the store's snapshot   |
///
/// # Example
///
/// ```rust,ignore
/// let mut pipeline = PipelineBuilder::new(config, NearestNodeDiscretizer, clusters)
///     .store(JsonSnapshotStore::new("out/plg.json"))
///     .build()?;
/// let plg = pipeline.run(&raw, &mut TracingObserver::new())?;
/// ```
pub struct PipelineBuilder<S: SnapshotStore = NoStore> {
    config:      PlgConfig,
    discretizer: Box<dyn Discretizer>,
    clusters:    Box<dyn ClusterGenerator>,
    store:       S,
    resume:      bool,
}

impl PipelineBuilder<NoStore> {
    /// Create a builder with all required inputs.
    pub fn new<D, C>(config: PlgConfig, discretizer: D, clusters: C) -> Self
    where
        D: Discretizer + 'static,
        C: ClusterGenerator + 'static,
    {
        Self {
            config,
            discretizer: Box::new(discretizer),
            clusters:    Box::new(clusters),
            store:       NoStore,
            resume:      true,
        }
    }
}

impl<S: SnapshotStore> PipelineBuilder<S> {
    /// Supply the store that receives a checkpoint after every stage.
    pub fn store<T: SnapshotStore>(self, store: T) -> PipelineBuilder<T> {
        PipelineBuilder {
            config:      self.config,
            discretizer: self.discretizer,
            clusters:    self.clusters,
            store,
            resume:      self.resume,
        }
    }

    /// Whether [`Pipeline::run`] starts from the store's latest snapshot.
    ///
    /// With `false` every run rebuilds from the raw table, overwriting the
    /// stored checkpoints as it goes.
    pub fn resume(mut self, resume: bool) -> Self {
        self.resume = resume;
        self
    }

    /// Validate the configuration and return a ready-to-run [`Pipeline`].
    pub fn build(self) -> PipelineResult<Pipeline<S>> {
        self.config.validate()?;
        Ok(Pipeline {
            config:      self.config,
            discretizer: self.discretizer,
            clusters:    self.clusters,
            store:       self.store,
            resume:      self.resume,
        })
    }
}

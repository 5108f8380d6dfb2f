use plg_clean::CleanError;
use plg_core::PlgError;
use plg_decode::DecodeError;
use plg_model::{ModelError, Stage};
use plg_nodes::NodeError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("pipeline configuration error: {0}")]
    Config(#[from] PlgError),

    #[error("clean stage failed: {0}")]
    Clean(#[from] CleanError),

    #[error("node stage failed: {0}")]
    Node(#[from] NodeError),

    #[error("model stage failed: {0}")]
    Model(#[from] ModelError),

    #[error("path generation failed: {0}")]
    Decode(#[from] DecodeError),

    /// A snapshot store could not read or write a checkpoint.
    #[error("snapshot store error after stage {stage:?}: {source}")]
    Store {
        stage:  Option<Stage>,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },
}

impl PipelineError {
    pub fn store<E>(stage: Option<Stage>, source: E) -> Self
    where
        E: Into<Box<dyn std::error::Error + Send + Sync>>,
    {
        PipelineError::Store { stage, source: source.into() }
    }
}

pub type PipelineResult<T> = Result<T, PipelineError>;

//! Workspace error types.
//!
//! Sub-crates define their own error enums and convert `PlgError` /
//! `RunIndexError` into them via `#[from]`.

use thiserror::Error;

/// Errors raised by [`RunIndex`](crate::RunIndex) extraction.
///
/// A missing id is *not* an error: lookups return `None` for that case.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum RunIndexError {
    /// The values slice is not parallel to the id sequence the index was
    /// built from.  This is a caller bug, never recoverable data.
    #[error("values length {got} does not match indexed sequence length {expected}")]
    LengthMismatch { expected: usize, got: usize },

    #[error("run {run} requested but id has only {available} run(s)")]
    RunOutOfRange { run: usize, available: usize },
}

/// The top-level error type for `plg-core` and a common base for sub-crates.
#[derive(Debug, Error)]
pub enum PlgError {
    #[error("configuration error: {0}")]
    Config(String),

    #[error("run index error: {0}")]
    RunIndex(#[from] RunIndexError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Shorthand result type for `plg-core`.
pub type PlgResult<T> = Result<T, PlgError>;

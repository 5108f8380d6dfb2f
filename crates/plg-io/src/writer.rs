//! The `PathWriter` trait implemented by all backend writers.

use crate::{NodeRow, OutputResult, PathRow};

/// Trait implemented by CSV, SQLite, and Parquet writers.
///
/// Errors raised while the pipeline is reporting paths are stored by
/// [`ExportObserver`](crate::ExportObserver) and retrieved with
/// [`take_error`](crate::ExportObserver::take_error).
pub trait PathWriter {
    /// Write the node table.  Called once, before any path.
    fn write_nodes(&mut self, rows: &[NodeRow]) -> OutputResult<()>;

    /// Write the samples of one generated path.
    fn write_path(&mut self, rows: &[PathRow]) -> OutputResult<()>;

    /// Flush and close all underlying file handles.
    ///
    /// Idempotent; later calls are no-ops.
    fn finish(&mut self) -> OutputResult<()>;
}

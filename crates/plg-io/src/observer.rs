//! `ExportObserver<W>` — bridges `PipelineObserver` to a `PathWriter`.

use std::path::PathBuf;

use plg_decode::{GeneratedPath, PathSample};
use plg_model::Plg;
use plg_nodes::NodeSet;
use plg_pipeline::PipelineObserver;

use crate::csv::write_path_table;
use crate::row::{NodeRow, PathRow};
use crate::writer::PathWriter;
use crate::{OutputError, OutputResult};

/// A [`PipelineObserver`] that exports nodes and generated paths to any
/// [`PathWriter`] backend (CSV, SQLite, Parquet, …).
///
/// Errors from the writer are stored internally because `PipelineObserver`
/// methods have no return value.  After `pipeline.generate()` returns, check
/// for errors with [`take_error`][Self::take_error].
pub struct ExportObserver<W: PathWriter> {
    writer:        W,
    table_dir:     Option<PathBuf>,
    nodes_written: bool,
    last_error:    Option<OutputError>,
}

impl<W: PathWriter> ExportObserver<W> {
    pub fn new(writer: W) -> Self {
        Self { writer, table_dir: None, nodes_written: false, last_error: None }
    }

    /// Also write every path as its own `path_<n>.csv` table in `dir`.
    pub fn with_path_tables(mut self, dir: impl Into<PathBuf>) -> Self {
        self.table_dir = Some(dir.into());
        self
    }

    /// Write the node table now.  Later calls, and the automatic write at
    /// the end of a build, are no-ops.
    pub fn write_nodes(&mut self, nodes: &NodeSet) -> OutputResult<()> {
        if self.nodes_written {
            return Ok(());
        }
        self.nodes_written = true;
        self.writer.write_nodes(&NodeRow::from_nodes(nodes))
    }

    /// Take the stored write error (if any) after generation returns.
    ///
    /// Returns `None` if all writes succeeded.
    pub fn take_error(&mut self) -> Option<OutputError> {
        self.last_error.take()
    }

    /// Unwrap the inner writer (e.g. to inspect files after export).
    pub fn into_writer(self) -> W {
        self.writer
    }

    fn store_err(&mut self, result: OutputResult<()>) {
        if let Err(e) = result {
            // Keep only the first error.
            if self.last_error.is_none() {
                self.last_error = Some(e);
            }
        }
    }
}

impl<W: PathWriter> PipelineObserver for ExportObserver<W> {
    fn on_build_end(&mut self, plg: &Plg) {
        let result = self.write_nodes(&plg.nodes);
        self.store_err(result);
    }

    fn on_path_generated(&mut self, index: usize, path: &GeneratedPath, samples: &[PathSample]) {
        let rows = PathRow::from_path(index as u32, path, samples);
        let result = self.writer.write_path(&rows);
        self.store_err(result);

        if let Some(dir) = &self.table_dir {
            let result = write_path_table(dir, samples).map(|_| ());
            self.store_err(result);
        }
    }

    fn on_generation_end(&mut self, _count: usize) {
        let result = self.writer.finish();
        self.store_err(result);
    }
}

//! CSV export backend.
//!
//! Creates two files in the configured output directory:
//! - `nodes.csv`
//! - `synthesized_paths.csv`
//!
//! [`write_path_table`] additionally writes a single path as its own
//! three-column table.

use std::fs::File;
use std::path::{Path, PathBuf};

use csv::Writer;
use tracing::debug;

use plg_decode::PathSample;

use crate::writer::PathWriter;
use crate::{NodeRow, OutputResult, PathRow};

/// Writes the node table and every generated path to two CSV files.
pub struct CsvWriter {
    nodes:    Writer<File>,
    paths:    Writer<File>,
    finished: bool,
}

impl CsvWriter {
    /// Open (or create) the two CSV files in `dir` and write the header rows.
    pub fn new(dir: &Path) -> OutputResult<Self> {
        let mut nodes = Writer::from_path(dir.join("nodes.csv"))?;
        nodes.write_record(["node_id", "x", "y", "lane_id"])?;

        let mut paths = Writer::from_path(dir.join("synthesized_paths.csv"))?;
        paths.write_record(["path_id", "step", "node_id", "x", "y", "heading"])?;

        Ok(Self {
            nodes,
            paths,
            finished: false,
        })
    }
}

impl PathWriter for CsvWriter {
    fn write_nodes(&mut self, rows: &[NodeRow]) -> OutputResult<()> {
        for row in rows {
            self.nodes.write_record(&[
                row.node_id.to_string(),
                row.x.to_string(),
                row.y.to_string(),
                row.lane_id.to_string(),
            ])?;
        }
        Ok(())
    }

    fn write_path(&mut self, rows: &[PathRow]) -> OutputResult<()> {
        for row in rows {
            self.paths.write_record(&[
                row.path_id.to_string(),
                row.step.to_string(),
                row.node_id.to_string(),
                row.x.to_string(),
                row.y.to_string(),
                row.heading.to_string(),
            ])?;
        }
        Ok(())
    }

    fn finish(&mut self) -> OutputResult<()> {
        if self.finished {
            return Ok(());
        }
        self.finished = true;
        self.nodes.flush()?;
        self.paths.flush()?;
        Ok(())
    }
}

/// Write one path as an `x,y,heading` table named after its sample count,
/// e.g. `path_42.csv`.  Values are fixed to six decimals.  Returns the path
/// of the file written; a second path of the same length overwrites it.
pub fn write_path_table(dir: &Path, samples: &[PathSample]) -> OutputResult<PathBuf> {
    let file = dir.join(format!("path_{}.csv", samples.len()));
    let mut w = Writer::from_path(&file)?;
    w.write_record(["x", "y", "heading"])?;
    for s in samples {
        w.write_record(&[
            format!("{:.6}", s.x),
            format!("{:.6}", s.y),
            format!("{:.6}", s.heading),
        ])?;
    }
    w.flush()?;
    debug!(file = %file.display(), rows = samples.len(), "path table written");
    Ok(file)
}

//! Parquet export backend (feature `parquet`).
//!
//! Creates two files in the configured output directory:
//! - `nodes.parquet`
//! - `synthesized_paths.parquet`

use std::fs::File;
use std::path::Path;
use std::sync::Arc;

use arrow::array::{Float64Builder, UInt32Builder};
use arrow::datatypes::{DataType, Field, Schema};
use arrow::record_batch::RecordBatch;
use parquet::arrow::ArrowWriter;
use parquet::basic::Compression;
use parquet::file::properties::WriterProperties;

use crate::writer::PathWriter;
use crate::{NodeRow, OutputResult, PathRow};

fn node_schema() -> Arc<Schema> {
    Arc::new(Schema::new(vec![
        Field::new("node_id", DataType::UInt32,  false),
        Field::new("x",       DataType::Float64, false),
        Field::new("y",       DataType::Float64, false),
        Field::new("lane_id", DataType::UInt32,  false),
    ]))
}

fn path_schema() -> Arc<Schema> {
    Arc::new(Schema::new(vec![
        Field::new("path_id", DataType::UInt32,  false),
        Field::new("step",    DataType::UInt32,  false),
        Field::new("node_id", DataType::UInt32,  false),
        Field::new("x",       DataType::Float64, false),
        Field::new("y",       DataType::Float64, false),
        Field::new("heading", DataType::Float64, false),
    ]))
}

fn snappy_props() -> WriterProperties {
    WriterProperties::builder()
        .set_compression(Compression::SNAPPY)
        .build()
}

/// Writes the node table and generated paths to two Parquet files.
///
/// `finish()` **must** be called to write the Parquet file footer; files
/// written without calling `finish()` cannot be opened by Parquet readers.
pub struct ParquetWriter {
    nodes:       Option<ArrowWriter<File>>,
    paths:       Option<ArrowWriter<File>>,
    node_schema: Arc<Schema>,
    path_schema: Arc<Schema>,
}

impl ParquetWriter {
    /// Create both Parquet files in `dir`.
    pub fn new(dir: &Path) -> OutputResult<Self> {
        let node_schema = node_schema();
        let path_schema = path_schema();

        let nodes = ArrowWriter::try_new(
            File::create(dir.join("nodes.parquet"))?,
            Arc::clone(&node_schema),
            Some(snappy_props()),
        )?;
        let paths = ArrowWriter::try_new(
            File::create(dir.join("synthesized_paths.parquet"))?,
            Arc::clone(&path_schema),
            Some(snappy_props()),
        )?;

        Ok(Self {
            nodes: Some(nodes),
            paths: Some(paths),
            node_schema,
            path_schema,
        })
    }
}

impl PathWriter for ParquetWriter {
    fn write_nodes(&mut self, rows: &[NodeRow]) -> OutputResult<()> {
        if rows.is_empty() {
            return Ok(());
        }
        let Some(writer) = self.nodes.as_mut() else {
            return Ok(());
        };

        let mut ids   = UInt32Builder::new();
        let mut xs    = Float64Builder::new();
        let mut ys    = Float64Builder::new();
        let mut lanes = UInt32Builder::new();

        for row in rows {
            ids.append_value(row.node_id);
            xs.append_value(row.x);
            ys.append_value(row.y);
            lanes.append_value(row.lane_id);
        }

        let batch = RecordBatch::try_new(
            Arc::clone(&self.node_schema),
            vec![
                Arc::new(ids.finish()),
                Arc::new(xs.finish()),
                Arc::new(ys.finish()),
                Arc::new(lanes.finish()),
            ],
        )?;
        writer.write(&batch)?;
        Ok(())
    }

    fn write_path(&mut self, rows: &[PathRow]) -> OutputResult<()> {
        if rows.is_empty() {
            return Ok(());
        }
        let Some(writer) = self.paths.as_mut() else {
            return Ok(());
        };

        let mut path_ids = UInt32Builder::new();
        let mut steps    = UInt32Builder::new();
        let mut node_ids = UInt32Builder::new();
        let mut xs       = Float64Builder::new();
        let mut ys       = Float64Builder::new();
        let mut headings = Float64Builder::new();

        for row in rows {
            path_ids.append_value(row.path_id);
            steps.append_value(row.step);
            node_ids.append_value(row.node_id);
            xs.append_value(row.x);
            ys.append_value(row.y);
            headings.append_value(row.heading);
        }

        let batch = RecordBatch::try_new(
            Arc::clone(&self.path_schema),
            vec![
                Arc::new(path_ids.finish()),
                Arc::new(steps.finish()),
                Arc::new(node_ids.finish()),
                Arc::new(xs.finish()),
                Arc::new(ys.finish()),
                Arc::new(headings.finish()),
            ],
        )?;
        writer.write(&batch)?;
        Ok(())
    }

    fn finish(&mut self) -> OutputResult<()> {
        if let Some(w) = self.nodes.take() {
            w.close()?;
        }
        if let Some(w) = self.paths.take() {
            w.close()?;
        }
        Ok(())
    }
}

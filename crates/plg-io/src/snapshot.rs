//! JSON snapshot persistence.
//!
//! The whole [`Plg`] is written as one JSON document after every stage.  A
//! save goes to `<file>.tmp` first and is renamed over the previous
//! checkpoint, so an interrupted save never leaves a truncated snapshot.

use std::fs::{self, File};
use std::io::{BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

use tracing::{debug, info};

use plg_model::{Plg, Stage};
use plg_pipeline::{PipelineError, PipelineResult, SnapshotStore};

use crate::OutputResult;

/// Read a snapshot written by [`save_snapshot`].
pub fn load_snapshot(path: &Path) -> OutputResult<Plg> {
    let reader = BufReader::new(File::open(path)?);
    Ok(serde_json::from_reader(reader)?)
}

/// Write `plg` to `path`, replacing any previous snapshot atomically.
pub fn save_snapshot(path: &Path, plg: &Plg) -> OutputResult<()> {
    let tmp = tmp_path(path);
    {
        let mut w = BufWriter::new(File::create(&tmp)?);
        serde_json::to_writer(&mut w, plg)?;
        w.flush()?;
    }
    fs::rename(&tmp, path)?;
    Ok(())
}

fn tmp_path(path: &Path) -> PathBuf {
    let mut name = path.as_os_str().to_owned();
    name.push(".tmp");
    PathBuf::from(name)
}

/// A [`SnapshotStore`] backed by a single JSON file.
#[derive(Clone, Debug)]
pub struct JsonSnapshotStore {
    path: PathBuf,
}

impl JsonSnapshotStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl SnapshotStore for JsonSnapshotStore {
    fn load(&mut self) -> PipelineResult<Option<Plg>> {
        if !self.path.exists() {
            debug!(path = %self.path.display(), "no checkpoint");
            return Ok(None);
        }
        let plg = load_snapshot(&self.path).map_err(|e| PipelineError::store(None, e))?;
        info!(path = %self.path.display(), completed = ?plg.completed, "checkpoint loaded");
        Ok(Some(plg))
    }

    fn save(&mut self, plg: &Plg, stage: Stage) -> PipelineResult<()> {
        save_snapshot(&self.path, plg).map_err(|e| PipelineError::store(Some(stage), e))?;
        debug!(path = %self.path.display(), %stage, "checkpoint saved");
        Ok(())
    }
}

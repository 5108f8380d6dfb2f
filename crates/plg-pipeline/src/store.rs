//! Checkpoint seam between the pipeline and snapshot persistence.
//!
//! The pipeline hands the snapshot to a [`SnapshotStore`] after every stage
//! and asks it for a previous snapshot before the first.  File-backed stores
//! live in `plg-io`; this crate ships the two trivial ones.

use plg_model::{Plg, Stage};

use crate::PipelineResult;

pub trait SnapshotStore {
    /// The most recent checkpoint, if any.
    fn load(&mut self) -> PipelineResult<Option<Plg>>;

    /// Persist `plg`, which has just completed `stage`.
    fn save(&mut self, plg: &Plg, stage: Stage) -> PipelineResult<()>;
}

/// Discards every checkpoint.  A build with this store always starts fresh.
#[derive(Copy, Clone, Debug, Default)]
pub struct NoStore;

impl SnapshotStore for NoStore {
    fn load(&mut self) -> PipelineResult<Option<Plg>> {
        Ok(None)
    }

    fn save(&mut self, _plg: &Plg, _stage: Stage) -> PipelineResult<()> {
        Ok(())
    }
}

/// Keeps the latest checkpoint in memory and records the order of saves.
#[derive(Clone, Debug, Default)]
pub struct MemoryStore {
    pub latest: Option<Plg>,
    pub saves:  Vec<Stage>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// A store whose first `load` returns `plg`.
    pub fn with_snapshot(plg: Plg) -> Self {
        Self { latest: Some(plg), saves: Vec::new() }
    }
}

impl SnapshotStore for MemoryStore {
    fn load(&mut self) -> PipelineResult<Option<Plg>> {
        Ok(self.latest.clone())
    }

    fn save(&mut self, plg: &Plg, stage: Stage) -> PipelineResult<()> {
        self.latest = Some(plg.clone());
        self.saves.push(stage);
        Ok(())
    }
}

impl<S: SnapshotStore + ?Sized> SnapshotStore for &mut S {
    fn load(&mut self) -> PipelineResult<Option<Plg>> {
        (**self).load()
    }

    fn save(&mut self, plg: &Plg, stage: Stage) -> PipelineResult<()> {
        (**self).save(plg, stage)
    }
}

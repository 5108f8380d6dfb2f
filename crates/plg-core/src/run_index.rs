//! Run-length index over a tagged sequence.
//!
//! Per-vehicle logs arrive as parallel columns where the vehicle id is
//! run-length encoded, not globally grouped: a vehicle that leaves and
//! re-enters the surveyed area shows up as several disjoint runs.
//!
//! ```text
//! ids:   [0, 0, 0, 1, 1, 2, 2, 2, 0, 0]
//! runs:  0 → [0..=2, 8..=9]   1 → [3..=4]   2 → [5..=7]
//! ```
//!
//! The runs of all ids together tile `0..len` exactly, with no gaps or
//! overlaps.

use std::collections::BTreeMap;
use std::ops::RangeInclusive;

use crate::RunIndexError;

// ── Run ───────────────────────────────────────────────────────────────────────

/// Inclusive `[start, end]` offsets of one contiguous run.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Run {
    pub start: usize,
    pub end:   usize,
}

impl Run {
    #[inline]
    pub fn new(start: usize, end: usize) -> Self {
        debug_assert!(start <= end, "run start {start} after end {end}");
        Self { start, end }
    }

    /// Number of samples in the run (always ≥ 1).
    #[inline]
    pub fn len(&self) -> usize {
        self.end - self.start + 1
    }

    #[inline]
    pub fn range(&self) -> RangeInclusive<usize> {
        self.start..=self.end
    }

    /// Borrow this run's window of a parallel column.
    ///
    /// # Panics
    /// Panics if `values` is shorter than `end + 1`.
    #[inline]
    pub fn slice<'a, T>(&self, values: &'a [T]) -> &'a [T] {
        &values[self.range()]
    }
}

/// Which runs of an id [`RunIndex::extract`] should return.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum RunSelector {
    /// Concatenate every run in stream order.
    All,
    /// Only the `k`-th run (0-based, stream order).
    Run(usize),
}

// ── RunIndex ──────────────────────────────────────────────────────────────────

/// Maps each id to the ordered list of runs it occupies in a sequence.
#[derive(Clone, Debug)]
pub struct RunIndex<I> {
    /// Length of the indexed sequence.
    len:   usize,
    /// Runs per id, each list in stream order.
    by_id: BTreeMap<I, Vec<Run>>,
    /// Every run in stream order, tagged with its id.
    order: Vec<(I, Run)>,
}

impl<I: Copy + Ord> RunIndex<I> {
    /// Group `ids` into runs.  A run closes whenever the id differs from the
    /// previous sample, or at the end of the sequence.
    pub fn build(ids: &[I]) -> Self {
        let mut by_id: BTreeMap<I, Vec<Run>> = BTreeMap::new();
        let mut order = Vec::new();

        let mut start = 0usize;
        for k in 1..=ids.len() {
            if k == ids.len() || ids[k] != ids[start] {
                let run = Run::new(start, k - 1);
                by_id.entry(ids[start]).or_default().push(run);
                order.push((ids[start], run));
                start = k;
            }
        }

        Self { len: ids.len(), by_id, order }
    }

    /// All runs of `id` in stream order, or `None` if `id` never occurs.
    pub fn lookup(&self, id: I) -> Option<&[Run]> {
        self.by_id.get(&id).map(Vec::as_slice)
    }

    /// Copy the samples of `id` out of a column parallel to the indexed ids.
    ///
    /// Returns `Ok(None)` when `id` is absent.  A column of the wrong length
    /// or an out-of-range run selector is a hard error.
    pub fn extract<T: Clone>(
        &self,
        values:   &[T],
        id:       I,
        selector: RunSelector,
    ) -> Result<Option<Vec<T>>, RunIndexError> {
        if values.len() != self.len {
            return Err(RunIndexError::LengthMismatch { expected: self.len, got: values.len() });
        }
        let Some(runs) = self.lookup(id) else {
            return Ok(None);
        };

        let out = match selector {
            RunSelector::All => {
                let total = runs.iter().map(Run::len).sum();
                let mut out = Vec::with_capacity(total);
                for run in runs {
                    out.extend_from_slice(run.slice(values));
                }
                out
            }
            RunSelector::Run(k) => {
                let run = runs.get(k).ok_or(RunIndexError::RunOutOfRange {
                    run:       k,
                    available: runs.len(),
                })?;
                run.slice(values).to_vec()
            }
        };
        Ok(Some(out))
    }

    /// Every run in stream order, tagged with its id.
    pub fn runs_in_order(&self) -> &[(I, Run)] {
        &self.order
    }

    /// Distinct ids in ascending order.
    pub fn ids(&self) -> impl Iterator<Item = I> + '_ {
        self.by_id.keys().copied()
    }

    /// Number of runs `id` occupies (0 if absent).
    pub fn run_count(&self, id: I) -> usize {
        self.by_id.get(&id).map_or(0, Vec::len)
    }

    /// Number of distinct ids.
    pub fn id_count(&self) -> usize {
        self.by_id.len()
    }

    /// Length of the indexed sequence.
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }
}

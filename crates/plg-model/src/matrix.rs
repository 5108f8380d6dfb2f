//! Transition count accumulators and row-stochastic transition matrices.
//!
//! # Data layout
//!
//! Observed transitions are sparse (a node only ever leads to a handful of
//! neighbours), so both types store only non-zero entries.
//!
//! [`CountMatrix`] is the accumulator: an ordered map `(from, to) → count`.
//! Counting is commutative, so accumulators built over disjoint path subsets
//! can be merged in any order.
//!
//! [`TransitionMatrix`] is the frozen, normalised form in **Compressed Sparse
//! Row (CSR)** layout.  Given a `NodeId n`, its outgoing entries occupy:
//!
//! ```text
//! col[ row_start[n] .. row_start[n+1] ]    (ascending column order)
//! prob[ row_start[n] .. row_start[n+1] ]
//! ```
//!
//! A row with no entries is a dead end: it has zero mass and no arg-max.

use std::collections::BTreeMap;

use plg_core::{NodeId, VehicleId};
use plg_nodes::NodeSet;

use crate::{ModelError, ModelResult};

// ── CountMatrix ───────────────────────────────────────────────────────────────

/// Integer transition counts over a fixed node count.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct CountMatrix {
    node_count: usize,
    counts:     BTreeMap<(NodeId, NodeId), u32>,
}

impl CountMatrix {
    pub fn new(node_count: usize) -> Self {
        Self { node_count, counts: BTreeMap::new() }
    }

    pub fn node_count(&self) -> usize {
        self.node_count
    }

    /// Count every consecutive pair of `path`.  Returns the number of
    /// transitions added.
    ///
    /// The whole path is checked before anything is counted, so a bad path
    /// leaves the matrix untouched.
    pub fn add_path(&mut self, vehicle: VehicleId, path: &[NodeId]) -> ModelResult<usize> {
        if let Some(&node) = path.iter().find(|n| n.index() >= self.node_count) {
            return Err(ModelError::NodeOutOfRange { vehicle, node, node_count: self.node_count });
        }
        for pair in path.windows(2) {
            *self.counts.entry((pair[0], pair[1])).or_insert(0) += 1;
        }
        Ok(path.len().saturating_sub(1))
    }

    #[inline]
    pub fn get(&self, from: NodeId, to: NodeId) -> u32 {
        self.counts.get(&(from, to)).copied().unwrap_or(0)
    }

    /// Distinct edges with a non-zero count.
    pub fn edge_count(&self) -> usize {
        self.counts.len()
    }

    /// Sum of all counts.
    pub fn total(&self) -> u64 {
        self.counts.values().map(|&c| c as u64).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }

    /// Add every count of `other` into `self`.
    pub fn merge(&mut self, other: CountMatrix) -> ModelResult<()> {
        if self.node_count != other.node_count {
            return Err(ModelError::SizeMismatch { left: self.node_count, right: other.node_count });
        }
        for (edge, c) in other.counts {
            *self.counts.entry(edge).or_insert(0) += c;
        }
        Ok(())
    }

    /// Zero every edge whose endpoints are further apart than `max_length_m`.
    /// Returns the number of edges removed.
    pub fn prune_longer_than(&mut self, nodes: &NodeSet, max_length_m: f64) -> usize {
        let before = self.counts.len();
        self.counts.retain(|&(from, to), _| nodes.distance(from, to) <= max_length_m);
        before - self.counts.len()
    }

    /// Row-normalise into a [`TransitionMatrix`].  Rows with no counts stay
    /// all-zero.
    pub fn normalise(&self) -> TransitionMatrix {
        let n = self.node_count;
        let mut row_sum = vec![0u64; n];
        let mut row_start = vec![0u32; n + 1];
        for (&(from, _), &c) in &self.counts {
            row_sum[from.index()] += c as u64;
            row_start[from.index() + 1] += 1;
        }
        for i in 1..=n {
            row_start[i] += row_start[i - 1];
        }

        // The map iterates in (from, to) order, which is exactly CSR order.
        let mut col = Vec::with_capacity(self.counts.len());
        let mut prob = Vec::with_capacity(self.counts.len());
        for (&(from, to), &c) in &self.counts {
            col.push(to);
            prob.push(c as f64 / row_sum[from.index()] as f64);
        }

        TransitionMatrix { row_start, col, prob }
    }
}

// ── TransitionMatrix ──────────────────────────────────────────────────────────

/// Row-stochastic transition probabilities in CSR form.
///
/// Every row sums to 1 or is empty.  Queries on a node outside the matrix
/// behave like an empty row.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(try_from = "CsrParts", into = "CsrParts"))]
pub struct TransitionMatrix {
    /// CSR row pointer.  Length = `node_count + 1`.
    row_start: Vec<u32>,
    col:       Vec<NodeId>,
    prob:      Vec<f64>,
}

impl TransitionMatrix {
    /// An all-zero matrix over `node_count` nodes.
    pub fn empty(node_count: usize) -> Self {
        Self { row_start: vec![0; node_count + 1], col: Vec::new(), prob: Vec::new() }
    }

    /// Assemble a matrix from raw CSR arrays, checking the layout every
    /// query relies on: `row_start` starts at 0, never decreases and ends at
    /// `col.len() == prob.len()`; each row's columns are strictly ascending
    /// and inside the matrix; probabilities are finite and non-negative.
    pub fn from_csr(row_start: Vec<u32>, col: Vec<NodeId>, prob: Vec<f64>) -> ModelResult<Self> {
        let Some((&first, &last)) = row_start.first().zip(row_start.last()) else {
            return Err(ModelError::MalformedMatrix("row_start is empty"));
        };
        if first != 0 {
            return Err(ModelError::MalformedMatrix("row_start does not begin at 0"));
        }
        if row_start.windows(2).any(|w| w[0] > w[1]) {
            return Err(ModelError::MalformedMatrix("row_start decreases"));
        }
        if last as usize != col.len() || col.len() != prob.len() {
            return Err(ModelError::MalformedMatrix("row_start, col and prob disagree in length"));
        }
        let node_count = row_start.len() - 1;
        for w in row_start.windows(2) {
            let row = &col[w[0] as usize..w[1] as usize];
            if row.windows(2).any(|c| c[0] >= c[1]) {
                return Err(ModelError::MalformedMatrix("row columns are not strictly ascending"));
            }
            if row.iter().any(|c| c.index() >= node_count) {
                return Err(ModelError::MalformedMatrix("column outside the matrix"));
            }
        }
        if prob.iter().any(|p| !p.is_finite() || *p < 0.0) {
            return Err(ModelError::MalformedMatrix("probability is negative or not finite"));
        }
        Ok(Self { row_start, col, prob })
    }

    pub fn node_count(&self) -> usize {
        self.row_start.len().saturating_sub(1)
    }

    /// Number of stored (positive) entries.
    pub fn edge_count(&self) -> usize {
        self.col.len()
    }

    #[inline]
    fn bounds(&self, node: NodeId) -> (usize, usize) {
        let i = node.index();
        if i >= self.node_count() {
            return (0, 0);
        }
        (self.row_start[i] as usize, self.row_start[i + 1] as usize)
    }

    /// Non-zero entries of `node`'s row, ascending by column.
    pub fn row(&self, node: NodeId) -> impl Iterator<Item = (NodeId, f64)> + '_ {
        let (start, end) = self.bounds(node);
        self.col[start..end].iter().copied().zip(self.prob[start..end].iter().copied())
    }

    /// Sum of `node`'s row: 1 for a node with outgoing transitions, else 0.
    pub fn row_mass(&self, node: NodeId) -> f64 {
        let (start, end) = self.bounds(node);
        self.prob[start..end].iter().sum()
    }

    pub fn prob(&self, from: NodeId, to: NodeId) -> f64 {
        let (start, end) = self.bounds(from);
        match self.col[start..end].binary_search(&to) {
            Ok(k) => self.prob[start + k],
            Err(_) => 0.0,
        }
    }

    /// Most probable successor of `node`, lowest column on ties.
    ///
    /// `None` means the row has no positive mass.  `Some(NodeId(0))` is an
    /// ordinary successor like any other.
    pub fn argmax_row(&self, node: NodeId) -> Option<NodeId> {
        let mut best: Option<(NodeId, f64)> = None;
        for (to, p) in self.row(node) {
            // Strict `>` over ascending columns keeps the lowest index.
            if p > 0.0 && best.is_none_or(|(_, bp)| p > bp) {
                best = Some((to, p));
            }
        }
        best.map(|(to, _)| to)
    }

    /// True when every row sums to 0 or 1 within `tolerance`.
    pub fn is_row_stochastic(&self, tolerance: f64) -> bool {
        (0..self.node_count() as u32).map(NodeId).all(|n| {
            let m = self.row_mass(n);
            m.abs() <= tolerance || (m - 1.0).abs() <= tolerance
        })
    }

    /// Every stored entry as `(from, to, probability)`, row by row.
    pub fn edges(&self) -> impl Iterator<Item = (NodeId, NodeId, f64)> + '_ {
        (0..self.node_count()).flat_map(move |i| {
            let from = NodeId(i as u32);
            self.row(from).map(move |(to, p)| (from, to, p))
        })
    }
}

impl Default for TransitionMatrix {
    fn default() -> Self {
        Self::empty(0)
    }
}

// ── Serialized form ───────────────────────────────────────────────────────────

/// Raw CSR arrays as persisted; validated by [`TransitionMatrix::from_csr`]
/// on load.
#[cfg(feature = "serde")]
#[derive(serde::Serialize, serde::Deserialize)]
struct CsrParts {
    row_start: Vec<u32>,
    col:       Vec<NodeId>,
    prob:      Vec<f64>,
}

#[cfg(feature = "serde")]
impl TryFrom<CsrParts> for TransitionMatrix {
    type Error = ModelError;
    fn try_from(p: CsrParts) -> Result<Self, Self::Error> {
        TransitionMatrix::from_csr(p.row_start, p.col, p.prob)
    }
}

#[cfg(feature = "serde")]
impl From<TransitionMatrix> for CsrParts {
    fn from(m: TransitionMatrix) -> Self {
        CsrParts { row_start: m.row_start, col: m.col, prob: m.prob }
    }
}

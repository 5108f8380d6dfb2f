//! Lane-graph node storage and spatial index.
//!
//! # Data layout
//!
//! Nodes are stored as two parallel columns indexed by `NodeId`:
//!
//! ```text
//! pos[n]   Point2   metric position (may be relocated by lane refinement)
//! lane[n]  LaneId   lane the node was synthesized from (never changes)
//! ```
//!
//! Node count and index assignment are fixed once the synthesizer has run.
//!
//! # Spatial index
//!
//! An R-tree (via `rstar`) maps `[x, y]` to the nearest `NodeId`.  Used by the
//! discretizer to snap trajectory samples to nodes.  It is rebuilt whenever
//! positions are relocated.

use std::collections::BTreeSet;

use rstar::{PointDistance, RTree, RTreeObject, AABB};

use plg_core::{LaneId, NodeId, Point2};

use crate::{NodeError, NodeResult};

// ── R-tree node entry ─────────────────────────────────────────────────────────

/// Entry stored in the R-tree spatial index: a 2-D `[x, y]` point with the
/// associated `NodeId`.
#[derive(Clone, Debug)]
pub(crate) struct NodeEntry {
    pub(crate) point: [f64; 2],
    pub(crate) id:    NodeId,
}

impl RTreeObject for NodeEntry {
    type Envelope = AABB<[f64; 2]>;
    fn envelope(&self) -> Self::Envelope {
        AABB::from_point(self.point)
    }
}

impl PointDistance for NodeEntry {
    /// Squared Euclidean distance in the metric plane.
    fn distance_2(&self, point: &[f64; 2]) -> f64 {
        let dx = self.point[0] - point[0];
        let dy = self.point[1] - point[1];
        dx * dx + dy * dy
    }
}

fn bulk_index(pos: &[Point2]) -> RTree<NodeEntry> {
    let entries: Vec<NodeEntry> = pos
        .iter()
        .enumerate()
        .map(|(i, p)| NodeEntry { point: p.to_array(), id: NodeId(i as u32) })
        .collect();
    RTree::bulk_load(entries)
}

// ── NodeSet ───────────────────────────────────────────────────────────────────

/// The lane graph's vertices plus a spatial index for snapping.
#[derive(Clone, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(try_from = "NodeColumns", into = "NodeColumns"))]
pub struct NodeSet {
    pos:         Vec<Point2>,
    lane:        Vec<LaneId>,
    spatial_idx: RTree<NodeEntry>,
}

impl NodeSet {
    /// Build a node set from parallel position and lane columns.
    pub fn new(pos: Vec<Point2>, lane: Vec<LaneId>) -> NodeResult<Self> {
        if pos.len() != lane.len() {
            return Err(NodeError::ColumnMismatch { positions: pos.len(), lanes: lane.len() });
        }
        let spatial_idx = bulk_index(&pos);
        Ok(Self { pos, lane, spatial_idx })
    }

    /// A node set with no nodes.
    pub fn empty() -> Self {
        Self { pos: Vec::new(), lane: Vec::new(), spatial_idx: RTree::new() }
    }

    // ── Dimensions and access ─────────────────────────────────────────────

    pub fn len(&self) -> usize {
        self.pos.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pos.is_empty()
    }

    /// Position of `node`.
    ///
    /// # Panics
    /// Panics if `node` is out of range; use [`get`](Self::get) when the id
    /// is untrusted.
    #[inline]
    pub fn position(&self, node: NodeId) -> Point2 {
        self.pos[node.index()]
    }

    pub fn get(&self, node: NodeId) -> NodeResult<Point2> {
        self.pos.get(node.index()).copied().ok_or(NodeError::NodeNotFound(node))
    }

    #[inline]
    pub fn lane_of(&self, node: NodeId) -> LaneId {
        self.lane[node.index()]
    }

    pub fn positions(&self) -> &[Point2] {
        &self.pos
    }

    pub fn lanes(&self) -> &[LaneId] {
        &self.lane
    }

    /// Distinct lane ids carried by nodes, ascending.
    pub fn distinct_lanes(&self) -> BTreeSet<LaneId> {
        self.lane.iter().copied().collect()
    }

    /// Nodes synthesized from `lane`, ascending.
    pub fn nodes_in_lane(&self, lane: LaneId) -> Vec<NodeId> {
        self.lane
            .iter()
            .enumerate()
            .filter(|&(_, &l)| l == lane)
            .map(|(i, _)| NodeId(i as u32))
            .collect()
    }

    pub fn ids(&self) -> impl Iterator<Item = NodeId> + use<> {
        (0..self.pos.len() as u32).map(NodeId)
    }

    /// Euclidean distance between two nodes.
    #[inline]
    pub fn distance(&self, a: NodeId, b: NodeId) -> f64 {
        self.position(a).distance(self.position(b))
    }

    // ── Relocation ────────────────────────────────────────────────────────

    /// Move nodes to new positions and rebuild the spatial index.
    ///
    /// Node count, ids and lane ids are unchanged.
    pub fn relocate(&mut self, moves: &[(NodeId, Point2)]) -> NodeResult<()> {
        for &(node, p) in moves {
            let slot = self.pos.get_mut(node.index()).ok_or(NodeError::NodeNotFound(node))?;
            *slot = p;
        }
        self.spatial_idx = bulk_index(&self.pos);
        Ok(())
    }

    // ── Spatial queries ───────────────────────────────────────────────────

    /// Return the `NodeId` of the nearest node to `p`.
    ///
    /// Returns `None` only if the set has no nodes.
    pub fn snap_to_node(&self, p: Point2) -> Option<NodeId> {
        self.spatial_idx.nearest_neighbor(&p.to_array()).map(|e| e.id)
    }

    /// Return up to `k` nearest nodes to `p`, sorted by ascending distance.
    pub fn k_nearest(&self, p: Point2, k: usize) -> Vec<NodeId> {
        self.spatial_idx
            .nearest_neighbor_iter(&p.to_array())
            .take(k)
            .map(|e| e.id)
            .collect()
    }
}

impl Default for NodeSet {
    fn default() -> Self {
        Self::empty()
    }
}

/// Equality ignores the spatial index, which is derived from `pos`.
impl PartialEq for NodeSet {
    fn eq(&self, other: &Self) -> bool {
        self.pos == other.pos && self.lane == other.lane
    }
}

// ── Serialized form ───────────────────────────────────────────────────────────

/// Column form persisted in snapshots; the R-tree is rebuilt on load.
#[cfg(feature = "serde")]
#[derive(serde::Serialize, serde::Deserialize)]
struct NodeColumns {
    pos:  Vec<Point2>,
    lane: Vec<LaneId>,
}

#[cfg(feature = "serde")]
impl TryFrom<NodeColumns> for NodeSet {
    type Error = NodeError;
    fn try_from(c: NodeColumns) -> Result<Self, Self::Error> {
        NodeSet::new(c.pos, c.lane)
    }
}

#[cfg(feature = "serde")]
impl From<NodeSet> for NodeColumns {
    fn from(n: NodeSet) -> Self {
        NodeColumns { pos: n.pos, lane: n.lane }
    }
}

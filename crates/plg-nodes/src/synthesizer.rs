//! Greedy minimum-separation node placement.
//!
//! Cleaned samples are scanned in stream order.  The first sample always
//! becomes node 0; every later sample becomes a new node iff its distance to
//! the nearest existing node is at least `min_separation_m`.  Each node takes
//! the lane id of the sample it was placed on.
//!
//! The result depends on sample order.  Shuffling the input yields a
//! different (equally valid) node set, so the scan is never parallelised.

use rstar::RTree;
use tracing::{info, trace};

use plg_clean::CleanedTrajectories;
use plg_core::{LaneId, NodeConfig, NodeId, Point2};

use crate::node_set::NodeEntry;
use crate::{NodeResult, NodeSet};

/// Places nodes over a cleaned point cloud.
#[derive(Clone, Debug)]
pub struct NodeSynthesizer {
    min_separation_m: f64,
}

impl NodeSynthesizer {
    pub fn new(config: &NodeConfig) -> Self {
        Self { min_separation_m: config.min_separation_m }
    }

    /// Run the greedy scan over every cleaned sample.
    pub fn synthesize(&self, cleaned: &CleanedTrajectories) -> NodeResult<NodeSet> {
        let table = &cleaned.table;
        let (pos, lane) = self.place(table.points().zip(table.lane.iter().copied()));
        info!(
            samples = table.len(),
            nodes = pos.len(),
            min_separation = self.min_separation_m,
            "node synthesis complete"
        );
        NodeSet::new(pos, lane)
    }

    /// Greedy scan over `(position, lane)` samples in the given order.
    pub fn place<I>(&self, samples: I) -> (Vec<Point2>, Vec<LaneId>)
    where
        I: IntoIterator<Item = (Point2, LaneId)>,
    {
        let mut tree: RTree<NodeEntry> = RTree::new();
        let mut pos = Vec::new();
        let mut lane = Vec::new();

        for (p, l) in samples {
            let point = p.to_array();
            // `>=`: a sample exactly at the separation distance becomes a node.
            let far_enough = match tree.nearest_neighbor(&point) {
                Some(nearest) => Point2::from(nearest.point).distance(p) >= self.min_separation_m,
                None => true,
            };
            if far_enough {
                let id = NodeId(pos.len() as u32);
                tree.insert(NodeEntry { point, id });
                pos.push(p);
                lane.push(l);
                trace!(node = id.0, x = p.x, y = p.y, lane = l.0, "placed node");
            }
        }
        (pos, lane)
    }
}

//! Plain data row types written by export backends.

use plg_decode::{GeneratedPath, PathSample};
use plg_nodes::NodeSet;

/// One synthesized node.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NodeRow {
    pub node_id: u32,
    pub x:       f64,
    pub y:       f64,
    pub lane_id: u32,
}

impl NodeRow {
    /// One row per node, in node-id order.
    pub fn from_nodes(nodes: &NodeSet) -> Vec<NodeRow> {
        nodes
            .ids()
            .map(|id| {
                let p = nodes.position(id);
                NodeRow { node_id: id.0, x: p.x, y: p.y, lane_id: nodes.lane_of(id).0 }
            })
            .collect()
    }
}

/// One sample of one generated path.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PathRow {
    pub path_id: u32,
    /// Position of the sample within its path, from 0.
    pub step:    u32,
    pub node_id: u32,
    pub x:       f64,
    pub y:       f64,
    /// Radians, counter-clockwise from +x.
    pub heading: f64,
}

impl PathRow {
    /// Rows for path number `path_id`.  `samples` must be the samples of
    /// `path`, one per node.
    pub fn from_path(path_id: u32, path: &GeneratedPath, samples: &[PathSample]) -> Vec<PathRow> {
        path.nodes
            .iter()
            .zip(samples)
            .enumerate()
            .map(|(step, (node, s))| PathRow {
                path_id,
                step: step as u32,
                node_id: node.0,
                x: s.x,
                y: s.y,
                heading: s.heading,
            })
            .collect()
    }
}

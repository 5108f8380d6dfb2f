//! Entry/exit clusters and the cluster generator seam.
//!
//! A [`ClusterSet`] labels groups of nodes (entry regions or exit regions)
//! with a centroid each, and carries for every cluster a ranking of all
//! clusters by ascending centroid distance.  The ranking always starts with
//! the cluster itself; the path decoder walks it to find a fallback model.

use std::collections::{BTreeMap, BTreeSet};

use tracing::{debug, info};

use plg_core::{ClusterConfig, ClusterId, NodeId, Point2};
use plg_nodes::{KMeans, NodeSet, VehiclePaths};

use crate::{ModelError, ModelResult};

#[cfg(feature = "fx-hash")]
type NodeMap<V> = rustc_hash::FxHashMap<NodeId, V>;
#[cfg(not(feature = "fx-hash"))]
type NodeMap<V> = std::collections::HashMap<NodeId, V>;

// ── ClusterSet ────────────────────────────────────────────────────────────────

/// One cluster's data.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Cluster {
    pub id:       ClusterId,
    pub centroid: Point2,
    /// Member nodes, ascending and de-duplicated.
    pub members:  Vec<NodeId>,
    /// Every cluster id by ascending centroid distance, starting with `id`.
    pub ranking:  Vec<ClusterId>,
}

/// Labelled node groups with centroids and distance rankings.
#[derive(Clone, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(from = "Vec<Cluster>", into = "Vec<Cluster>"))]
pub struct ClusterSet {
    clusters: BTreeMap<ClusterId, Cluster>,
    /// node → lowest cluster id containing it.
    lookup:   NodeMap<ClusterId>,
}

impl ClusterSet {
    /// Build from externally supplied clusters.
    ///
    /// Member lists are sorted and de-duplicated.  Every ranking must start
    /// with its own cluster.
    pub fn new(clusters: Vec<Cluster>) -> ModelResult<Self> {
        for c in &clusters {
            if c.ranking.first() != Some(&c.id) {
                return Err(ModelError::BadRanking { cluster: c.id });
            }
        }
        Ok(Self::from(clusters))
    }

    /// Build from membership and centroids, ranking clusters by ascending
    /// centroid distance (ties by cluster id, self always first).
    pub fn with_distance_ranking(
        members:   BTreeMap<ClusterId, Vec<NodeId>>,
        centroids: &BTreeMap<ClusterId, Point2>,
    ) -> ModelResult<Self> {
        let mut clusters = Vec::with_capacity(members.len());
        for (id, nodes) in members {
            let centroid = *centroids.get(&id).ok_or(ModelError::MissingCentroid(id))?;
            clusters.push(Cluster { id, centroid, members: nodes, ranking: Vec::new() });
        }

        let positions: Vec<(ClusterId, Point2)> = clusters.iter().map(|c| (c.id, c.centroid)).collect();
        for c in &mut clusters {
            let mut others: Vec<(f64, ClusterId)> = positions
                .iter()
                .filter(|&&(id, _)| id != c.id)
                .map(|&(id, p)| (c.centroid.distance(p), id))
                .collect();
            others.sort_by(|a, b| a.0.total_cmp(&b.0).then(a.1.cmp(&b.1)));
            c.ranking = std::iter::once(c.id).chain(others.into_iter().map(|(_, id)| id)).collect();
        }
        Ok(Self::from(clusters))
    }

    pub fn len(&self) -> usize {
        self.clusters.len()
    }

    pub fn is_empty(&self) -> bool {
        self.clusters.is_empty()
    }

    /// Cluster ids, ascending.
    pub fn ids(&self) -> impl Iterator<Item = ClusterId> + '_ {
        self.clusters.keys().copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Cluster> {
        self.clusters.values()
    }

    pub fn get(&self, id: ClusterId) -> Option<&Cluster> {
        self.clusters.get(&id)
    }

    pub fn members(&self, id: ClusterId) -> Option<&[NodeId]> {
        self.clusters.get(&id).map(|c| c.members.as_slice())
    }

    pub fn centroid(&self, id: ClusterId) -> Option<Point2> {
        self.clusters.get(&id).map(|c| c.centroid)
    }

    pub fn ranking(&self, id: ClusterId) -> Option<&[ClusterId]> {
        self.clusters.get(&id).map(|c| c.ranking.as_slice())
    }

    /// Whether `node` is a member of cluster `id`.
    pub fn contains(&self, id: ClusterId, node: NodeId) -> bool {
        self.clusters.get(&id).is_some_and(|c| c.members.binary_search(&node).is_ok())
    }

    /// The cluster containing `node`.  When clusters overlap the lowest
    /// cluster id wins, so the answer never depends on hash order.
    pub fn containing(&self, node: NodeId) -> Option<ClusterId> {
        self.lookup.get(&node).copied()
    }
}

impl From<Vec<Cluster>> for ClusterSet {
    fn from(list: Vec<Cluster>) -> Self {
        let mut clusters = BTreeMap::new();
        for mut c in list {
            c.members.sort_unstable();
            c.members.dedup();
            clusters.insert(c.id, c);
        }
        let mut lookup = NodeMap::default();
        for c in clusters.values() {
            for &node in &c.members {
                lookup.entry(node).or_insert(c.id);
            }
        }
        Self { clusters, lookup }
    }
}

impl From<ClusterSet> for Vec<Cluster> {
    fn from(set: ClusterSet) -> Self {
        set.clusters.into_values().collect()
    }
}

impl PartialEq for ClusterSet {
    fn eq(&self, other: &Self) -> bool {
        self.clusters == other.clusters
    }
}

// ── ClusterGenerator ──────────────────────────────────────────────────────────

/// Entry and exit clusters for one dataset.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ClusterAssignment {
    pub start:  ClusterSet,
    pub target: ClusterSet,
}

/// Partitions nodes into entry (start) and exit (target) clusters.
///
/// Implementations must be `Send + Sync` so a pipeline can hold one behind a
/// `Box<dyn ClusterGenerator>`.
pub trait ClusterGenerator: Send + Sync {
    fn generate(&self, nodes: &NodeSet, paths: &VehiclePaths) -> ModelResult<ClusterAssignment>;
}

/// Clusters the first and last node of every vehicle path with k-means.
///
/// - Start clusters group path start nodes, target clusters group path end
///   nodes.
/// - The fit runs over every endpoint occurrence, so busy entry points pull
///   centroids harder.  It is seeded from evenly strided distinct endpoint
///   nodes.
/// - Each distinct endpoint node joins its nearest final centroid.  Clusters
///   left without members are dropped and the rest renumbered from 0.
#[derive(Clone, Debug)]
pub struct EndpointClusterGenerator {
    pub start_clusters:  usize,
    pub target_clusters: usize,
    pub max_iterations:  usize,
}

impl EndpointClusterGenerator {
    pub fn new(config: &ClusterConfig) -> Self {
        Self {
            start_clusters:  config.start_clusters,
            target_clusters: config.target_clusters,
            max_iterations:  config.max_iterations,
        }
    }

    fn cluster_endpoints(&self, nodes: &NodeSet, endpoints: &[NodeId], k: usize) -> ModelResult<ClusterSet> {
        // Distinct endpoint nodes in first-seen order.
        let mut seen = BTreeSet::new();
        let distinct: Vec<NodeId> = endpoints.iter().copied().filter(|&n| seen.insert(n)).collect();
        let k = k.min(distinct.len());
        if k == 0 {
            return Ok(ClusterSet::default());
        }

        let stride = distinct.len() / k;
        let init: Vec<Point2> = (0..k).map(|i| nodes.position(distinct[i * stride])).collect();
        let data: Vec<Point2> = endpoints.iter().map(|&n| nodes.position(n)).collect();
        let fit = KMeans::new(self.max_iterations, 0.0).fit(&init, &data);

        let distinct_pos: Vec<Point2> = distinct.iter().map(|&n| nodes.position(n)).collect();
        let assignment = KMeans::assign(&fit.centroids, &distinct_pos);

        let mut by_label: BTreeMap<usize, Vec<NodeId>> = BTreeMap::new();
        for (&node, &label) in distinct.iter().zip(&assignment) {
            by_label.entry(label).or_default().push(node);
        }

        let mut members = BTreeMap::new();
        let mut centroids = BTreeMap::new();
        for (new_id, (label, nodes_in)) in by_label.into_iter().enumerate() {
            let id = ClusterId(new_id as u32);
            members.insert(id, nodes_in);
            centroids.insert(id, fit.centroids[label]);
        }
        debug!(requested = k, produced = members.len(), iterations = fit.iterations, "endpoint clustering");
        ClusterSet::with_distance_ranking(members, &centroids)
    }
}

impl ClusterGenerator for EndpointClusterGenerator {
    fn generate(&self, nodes: &NodeSet, paths: &VehiclePaths) -> ModelResult<ClusterAssignment> {
        let mut starts = Vec::with_capacity(paths.len());
        let mut ends = Vec::with_capacity(paths.len());
        for (&vehicle, path) in paths {
            let (Some(&first), Some(&last)) = (path.first(), path.last()) else { continue };
            for node in [first, last] {
                if node.index() >= nodes.len() {
                    return Err(ModelError::NodeOutOfRange { vehicle, node, node_count: nodes.len() });
                }
            }
            starts.push(first);
            ends.push(last);
        }

        let start = self.cluster_endpoints(nodes, &starts, self.start_clusters)?;
        let target = self.cluster_endpoints(nodes, &ends, self.target_clusters)?;
        info!(start = start.len(), target = target.len(), "cluster generation complete");
        Ok(ClusterAssignment { start, target })
    }
}

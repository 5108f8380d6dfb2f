//! Unit tests for plg-model.

#[cfg(test)]
mod helpers {
    use std::collections::BTreeMap;

    use plg_core::{ClusterId, LaneId, NodeId, Point2, VehicleId};
    use plg_nodes::{NodeSet, VehiclePaths};

    use crate::ClusterSet;

    /// Nodes 0..=3 every 5 m along x, node 4 far away at x = 100.
    pub fn line_nodes() -> NodeSet {
        let pos = vec![
            Point2::new(0.0, 0.0),
            Point2::new(5.0, 0.0),
            Point2::new(10.0, 0.0),
            Point2::new(15.0, 0.0),
            Point2::new(100.0, 0.0),
        ];
        NodeSet::new(pos, vec![LaneId(1); 5]).unwrap()
    }

    pub fn ids(raw: &[u32]) -> Vec<NodeId> {
        raw.iter().map(|&n| NodeId(n)).collect()
    }

    pub fn paths(list: &[&[u32]]) -> VehiclePaths {
        list.iter().enumerate().map(|(v, p)| (VehicleId(v as u32), ids(p))).collect()
    }

    /// Clusters given as `(members, centroid x)`, ids assigned in order.
    pub fn clusters(layout: &[(&[u32], f64)]) -> ClusterSet {
        let mut members = BTreeMap::new();
        let mut centroids = BTreeMap::new();
        for (i, &(m, x)) in layout.iter().enumerate() {
            members.insert(ClusterId(i as u32), ids(m));
            centroids.insert(ClusterId(i as u32), Point2::new(x, 0.0));
        }
        ClusterSet::with_distance_ranking(members, &centroids).unwrap()
    }
}

// ── CountMatrix / TransitionMatrix ────────────────────────────────────────────

#[cfg(test)]
mod matrix {
    use plg_core::{NodeId, VehicleId};

    use super::helpers::{ids, line_nodes};
    use crate::{CountMatrix, ModelError, TransitionMatrix};

    fn counts(paths: &[&[u32]]) -> CountMatrix {
        let mut m = CountMatrix::new(5);
        for (v, p) in paths.iter().enumerate() {
            m.add_path(VehicleId(v as u32), &ids(p)).unwrap();
        }
        m
    }

    #[test]
    fn rows_normalise_to_one_or_stay_empty() {
        let t = counts(&[&[0, 1, 2], &[0, 1, 3]]).normalise();
        assert_eq!(t.prob(NodeId(0), NodeId(1)), 1.0);
        assert_eq!(t.prob(NodeId(1), NodeId(2)), 0.5);
        assert_eq!(t.prob(NodeId(1), NodeId(3)), 0.5);
        assert_eq!(t.row_mass(NodeId(2)), 0.0);
        assert!(t.is_row_stochastic(1e-12));
    }

    #[test]
    fn argmax_ties_pick_lowest_index() {
        let t = counts(&[&[0, 1, 3], &[0, 1, 2]]).normalise();
        assert_eq!(t.argmax_row(NodeId(1)), Some(NodeId(2)));
    }

    #[test]
    fn node_zero_is_a_real_successor() {
        let t = counts(&[&[1, 0], &[1, 0], &[1, 2]]).normalise();
        assert_eq!(t.argmax_row(NodeId(1)), Some(NodeId(0)));
    }

    #[test]
    fn dead_end_row_has_no_argmax() {
        let t = counts(&[&[0, 1]]).normalise();
        assert_eq!(t.argmax_row(NodeId(1)), None);
        assert_eq!(t.argmax_row(NodeId(42)), None);
        assert_eq!(t.row(NodeId(42)).count(), 0);
    }

    #[test]
    fn long_edges_are_pruned() {
        let mut m = counts(&[&[2, 3, 4]]);
        assert_eq!(m.prune_longer_than(&line_nodes(), 10.0), 1);
        let t = m.normalise();
        assert_eq!(t.row_mass(NodeId(3)), 0.0);
        assert_eq!(t.prob(NodeId(2), NodeId(3)), 1.0);
    }

    #[test]
    fn edge_of_exactly_max_length_survives() {
        let mut m = counts(&[&[0, 2]]);
        assert_eq!(m.prune_longer_than(&line_nodes(), 10.0), 0);
    }

    #[test]
    fn out_of_range_path_leaves_counts_untouched() {
        let mut m = counts(&[&[0, 1]]);
        let err = m.add_path(VehicleId(7), &ids(&[1, 2, 9])).unwrap_err();
        assert!(matches!(
            err,
            ModelError::NodeOutOfRange { vehicle: VehicleId(7), node: NodeId(9), node_count: 5 }
        ));
        assert_eq!(m.total(), 1);
    }

    #[test]
    fn merge_is_commutative() {
        let mut a = counts(&[&[0, 1, 2]]);
        let mut b = counts(&[&[1, 2, 3]]);
        a.merge(counts(&[&[1, 2, 3]])).unwrap();
        b.merge(counts(&[&[0, 1, 2]])).unwrap();
        assert_eq!(a, b);
        assert_eq!(a.get(NodeId(1), NodeId(2)), 2);
    }

    #[test]
    fn merge_size_mismatch_errors() {
        let mut a = CountMatrix::new(5);
        assert!(matches!(
            a.merge(CountMatrix::new(3)),
            Err(ModelError::SizeMismatch { left: 5, right: 3 })
        ));
    }

    #[test]
    fn csr_parts_round_trip_through_from_csr() {
        let t = counts(&[&[0, 1, 2], &[0, 1, 3]]).normalise();
        let mut row_start = vec![0u32];
        let (mut col, mut prob) = (Vec::new(), Vec::new());
        for n in 0..t.node_count() as u32 {
            for (to, p) in t.row(NodeId(n)) {
                col.push(to);
                prob.push(p);
            }
            row_start.push(col.len() as u32);
        }
        assert_eq!(TransitionMatrix::from_csr(row_start, col, prob).unwrap(), t);
    }

    #[test]
    fn malformed_csr_is_rejected() {
        let malformed = |row_start: Vec<u32>, col: &[u32], prob: Vec<f64>| {
            matches!(
                TransitionMatrix::from_csr(row_start, ids(col), prob),
                Err(ModelError::MalformedMatrix(_))
            )
        };
        // Decreasing row pointer.
        assert!(malformed(vec![0, 2, 1, 2], &[1, 2], vec![0.5, 0.5]));
        // Row pointer overruns the column array.
        assert!(malformed(vec![0, 1, 5], &[1], vec![1.0]));
        // Columns and probabilities disagree.
        assert!(malformed(vec![0, 1, 1], &[1], vec![]));
        // Unsorted row.
        assert!(malformed(vec![0, 2, 2], &[1, 0], vec![0.5, 0.5]));
        // Column past the last node.
        assert!(malformed(vec![0, 1, 1], &[7], vec![1.0]));
        assert!(malformed(vec![], &[], vec![]));
        assert!(malformed(vec![0, 1], &[0], vec![f64::NAN]));

        assert!(TransitionMatrix::from_csr(vec![0, 1, 1], ids(&[1]), vec![1.0]).is_ok());
    }

    #[test]
    fn edges_enumerate_row_by_row() {
        let t = counts(&[&[2, 1, 0]]).normalise();
        let edges: Vec<_> = t.edges().collect();
        assert_eq!(edges, vec![(NodeId(1), NodeId(0), 1.0), (NodeId(2), NodeId(1), 1.0)]);
    }
}

// ── Clusters ──────────────────────────────────────────────────────────────────

#[cfg(test)]
mod cluster {
    use plg_core::{ClusterConfig, ClusterId, LaneId, NodeId, Point2};
    use plg_nodes::NodeSet;

    use super::helpers::{clusters, ids, paths};
    use crate::{Cluster, ClusterGenerator, ClusterSet, EndpointClusterGenerator, ModelError};

    #[test]
    fn ranking_by_centroid_distance_self_first() {
        let set = clusters(&[(&[0], 0.0), (&[1], 10.0), (&[2], 3.0)]);
        assert_eq!(set.ranking(ClusterId(0)).unwrap(), &[ClusterId(0), ClusterId(2), ClusterId(1)]);
        assert_eq!(set.ranking(ClusterId(1)).unwrap(), &[ClusterId(1), ClusterId(2), ClusterId(0)]);
    }

    #[test]
    fn coincident_centroids_still_rank_self_first() {
        let set = clusters(&[(&[0], 5.0), (&[1], 5.0)]);
        assert_eq!(set.ranking(ClusterId(1)).unwrap()[0], ClusterId(1));
    }

    #[test]
    fn overlapping_membership_resolves_to_lowest_id() {
        let set = clusters(&[(&[1, 2], 0.0), (&[2, 3], 10.0)]);
        assert_eq!(set.containing(NodeId(2)), Some(ClusterId(0)));
        assert_eq!(set.containing(NodeId(3)), Some(ClusterId(1)));
        assert_eq!(set.containing(NodeId(9)), None);
        assert!(set.contains(ClusterId(1), NodeId(2)));
    }

    #[test]
    fn members_sorted_and_deduplicated() {
        let set = clusters(&[(&[4, 1, 4, 2], 0.0)]);
        assert_eq!(set.members(ClusterId(0)).unwrap(), ids(&[1, 2, 4]).as_slice());
    }

    #[test]
    fn ranking_must_start_with_self() {
        let bad = Cluster {
            id:       ClusterId(1),
            centroid: Point2::ORIGIN,
            members:  vec![],
            ranking:  vec![ClusterId(0), ClusterId(1)],
        };
        assert!(matches!(
            ClusterSet::new(vec![bad]),
            Err(ModelError::BadRanking { cluster: ClusterId(1) })
        ));
    }

    /// Two entry pairs 50 m apart, two exits.
    fn endpoint_fixture() -> NodeSet {
        NodeSet::new(
            vec![
                Point2::new(0.0, 0.0),
                Point2::new(0.0, 2.0),
                Point2::new(50.0, 0.0),
                Point2::new(50.0, 2.0),
                Point2::new(0.0, 50.0),
                Point2::new(50.0, 50.0),
            ],
            vec![LaneId(1); 6],
        )
        .unwrap()
    }

    #[test]
    fn endpoint_generator_groups_nearby_endpoints() {
        let nodes = endpoint_fixture();
        let p = paths(&[&[0, 4], &[1, 4], &[2, 5], &[3, 5]]);
        let generator = EndpointClusterGenerator::new(&ClusterConfig {
            start_clusters: 2,
            target_clusters: 2,
            max_iterations: 50,
        });
        let out = generator.generate(&nodes, &p).unwrap();

        assert_eq!(out.start.len(), 2);
        assert_eq!(out.start.members(ClusterId(0)).unwrap(), ids(&[0, 1]).as_slice());
        assert_eq!(out.start.members(ClusterId(1)).unwrap(), ids(&[2, 3]).as_slice());
        assert_eq!(out.start.centroid(ClusterId(0)), Some(Point2::new(0.0, 1.0)));
        assert_eq!(out.target.containing(NodeId(5)), Some(ClusterId(1)));
    }

    #[test]
    fn endpoint_generator_caps_k_at_distinct_endpoints() {
        let nodes = endpoint_fixture();
        let p = paths(&[&[0, 4], &[1, 4], &[2, 5]]);
        let out = EndpointClusterGenerator::new(&ClusterConfig::default()).generate(&nodes, &p).unwrap();
        assert_eq!(out.target.len(), 2);
        assert_eq!(out.start.len(), 3);
    }

    #[test]
    fn endpoint_generator_without_paths_is_empty() {
        let out = EndpointClusterGenerator::new(&ClusterConfig::default())
            .generate(&endpoint_fixture(), &Default::default())
            .unwrap();
        assert!(out.start.is_empty() && out.target.is_empty());
    }
}

// ── TransitionModelBuilder ────────────────────────────────────────────────────

#[cfg(test)]
mod builder {
    use plg_core::{ClusterId, ModelConfig, NodeId, PlgRng, VehicleId};
    use plg_nodes::VehiclePaths;

    use super::helpers::{clusters, line_nodes, paths};
    use crate::{TransitionModel, TransitionModelBuilder};

    fn build(p: &VehiclePaths) -> TransitionModel {
        // c0 = {3}, c1 = {2}, c2 = {4}, c3 = {} (nothing ends there).
        let targets = clusters(&[(&[3], 15.0), (&[2], 10.0), (&[4], 100.0), (&[], 50.0)]);
        TransitionModelBuilder::new(&ModelConfig::default())
            .build(&line_nodes(), p, &targets)
            .unwrap()
    }

    fn fixture() -> VehiclePaths {
        paths(&[&[0, 1, 2, 3], &[0, 1, 2], &[1, 0], &[3, 4]])
    }

    #[test]
    fn global_model_counts_every_path() {
        let m = build(&fixture());
        assert_eq!(m.stats.paths, 4);
        assert_eq!(m.stats.transitions, 7);
        assert!((m.global.prob(NodeId(1), NodeId(2)) - 2.0 / 3.0).abs() < 1e-12);
        assert!((m.global.prob(NodeId(1), NodeId(0)) - 1.0 / 3.0).abs() < 1e-12);
        assert_eq!(m.global.argmax_row(NodeId(1)), Some(NodeId(2)));
    }

    #[test]
    fn conditioned_models_only_see_their_destination() {
        let m = build(&fixture());
        let c0 = &m.conditioned[&ClusterId(0)];
        let c1 = &m.conditioned[&ClusterId(1)];
        assert_eq!(c0.prob(NodeId(2), NodeId(3)), 1.0);
        assert_eq!(c1.prob(NodeId(1), NodeId(2)), 1.0);
        assert_eq!(c1.argmax_row(NodeId(2)), None);
        assert_eq!(c0.prob(NodeId(1), NodeId(0)), 0.0);
    }

    #[test]
    fn uncategorised_path_feeds_global_only() {
        let m = build(&fixture());
        assert_eq!(m.stats.uncategorised_paths, 1);
        assert!(m.global.prob(NodeId(1), NodeId(0)) > 0.0);
        assert!(m.conditioned.values().all(|c| c.prob(NodeId(1), NodeId(0)) == 0.0));
    }

    #[test]
    fn pruning_applies_to_global_and_conditioned() {
        let m = build(&fixture());
        assert_eq!(m.stats.pruned_edges, 1);
        assert_eq!(m.global.row_mass(NodeId(3)), 0.0);
        assert_eq!(m.conditioned[&ClusterId(2)].edge_count(), 0);
    }

    #[test]
    fn every_target_cluster_gets_a_matrix() {
        let m = build(&fixture());
        assert_eq!(m.conditioned.len(), 4);
        assert_eq!(m.stats.empty_clusters, 1);
        assert_eq!(m.conditioned[&ClusterId(3)].node_count(), 5);
    }

    #[test]
    fn all_rows_sum_to_zero_or_one() {
        // Random walks over the 4 close nodes.
        let mut rng = PlgRng::new(9);
        let mut p = VehiclePaths::new();
        for v in 0..200u32 {
            let len = rng.gen_range(2..12);
            let walk: Vec<NodeId> = (0..len).map(|_| NodeId(rng.gen_range(0..4))).collect();
            p.insert(VehicleId(v), walk);
        }
        let m = build(&p);
        assert!(m.global.is_row_stochastic(1e-9));
        for matrix in m.conditioned.values() {
            assert!(matrix.is_row_stochastic(1e-9));
        }
    }

    #[test]
    fn path_order_does_not_matter() {
        let forward = build(&fixture());
        let reversed: VehiclePaths = fixture()
            .into_values()
            .rev()
            .enumerate()
            .map(|(v, p)| (VehicleId(v as u32), p))
            .collect();
        let backward = build(&reversed);
        assert_eq!(forward.global, backward.global);
        assert_eq!(forward.conditioned, backward.conditioned);
    }
}

// ── Snapshot ──────────────────────────────────────────────────────────────────

#[cfg(test)]
mod snapshot {
    use crate::{Plg, Stage};

    #[test]
    fn stages_run_in_declared_order() {
        assert!(Stage::Clean < Stage::Nodes);
        assert!(Stage::Discretise < Stage::Clusters);
        assert_eq!(Stage::Clusters.next(), Some(Stage::Model));
        assert_eq!(Stage::Model.next(), None);
    }

    #[test]
    fn completion_tracks_the_last_stage() {
        let mut plg = Plg::new();
        assert_eq!(plg.next_stage(), Some(Stage::Clean));
        plg.mark_complete(Stage::Discretise);
        assert!(plg.is_complete(Stage::Nodes));
        assert!(!plg.is_complete(Stage::Clusters));
        assert_eq!(plg.next_stage(), Some(Stage::Clusters));
        plg.mark_complete(Stage::Model);
        assert!(plg.is_ready());
        assert_eq!(plg.next_stage(), None);
    }
}

//! Unit tests for plg-core primitives.

#[cfg(test)]
mod ids {
    use crate::{ClusterId, LaneId, NodeId, VehicleId};

    #[test]
    fn index_roundtrip() {
        let id = NodeId(42);
        assert_eq!(id.index(), 42);
        assert_eq!(NodeId::try_from(42usize).unwrap(), id);
    }

    #[test]
    fn invalid_sentinels_are_max() {
        assert_eq!(NodeId::INVALID.0, u32::MAX);
        assert_eq!(VehicleId::INVALID.0, u32::MAX);
        assert_eq!(ClusterId::default(), ClusterId::INVALID);
    }

    #[test]
    fn display() {
        assert_eq!(LaneId(7).to_string(), "LaneId(7)");
    }
}

#[cfg(test)]
mod geo {
    use crate::Point2;

    #[test]
    fn distance_is_euclidean() {
        let a = Point2::new(0.0, 0.0);
        let b = Point2::new(3.0, 4.0);
        assert_eq!(a.distance(b), 5.0);
        assert_eq!(a.distance_sq(b), 25.0);
    }

    #[test]
    fn heading_quadrants() {
        let o = Point2::ORIGIN;
        assert_eq!(o.heading_to(Point2::new(1.0, 0.0)), 0.0);
        let up = o.heading_to(Point2::new(0.0, 2.0));
        assert!((up - std::f64::consts::FRAC_PI_2).abs() < 1e-12);
        let back = o.heading_to(Point2::new(-1.0, 0.0));
        assert!((back - std::f64::consts::PI).abs() < 1e-12);
    }

    #[test]
    fn centroid_of_square() {
        let pts = [
            Point2::new(0.0, 0.0),
            Point2::new(2.0, 0.0),
            Point2::new(2.0, 2.0),
            Point2::new(0.0, 2.0),
        ];
        assert_eq!(Point2::centroid(pts), Some(Point2::new(1.0, 1.0)));
        assert_eq!(Point2::centroid(std::iter::empty()), None);
    }
}

#[cfg(test)]
mod run_index {
    use crate::{Run, RunIndex, RunIndexError, RunSelector};

    const IDS: [u32; 10] = [0, 0, 0, 1, 1, 2, 2, 2, 0, 0];

    #[test]
    fn recurring_id_gets_two_runs() {
        let idx = RunIndex::build(&IDS);
        assert_eq!(idx.lookup(0), Some(&[Run::new(0, 2), Run::new(8, 9)][..]));
        assert_eq!(idx.lookup(1), Some(&[Run::new(3, 4)][..]));
        assert_eq!(idx.lookup(2), Some(&[Run::new(5, 7)][..]));
        assert_eq!(idx.run_count(0), 2);
        assert_eq!(idx.id_count(), 3);
    }

    #[test]
    fn missing_id_is_none() {
        let idx = RunIndex::build(&IDS);
        assert_eq!(idx.lookup(7), None);
        let values: Vec<u32> = (0..10).collect();
        assert_eq!(idx.extract(&values, 7, RunSelector::All), Ok(None));
    }

    #[test]
    fn runs_tile_the_sequence() {
        let ids = [5u32, 5, 3, 3, 3, 5, 9, 9, 3];
        let idx = RunIndex::build(&ids);
        let mut next = 0;
        for &(id, run) in idx.runs_in_order() {
            assert_eq!(run.start, next, "gap or overlap before {run:?}");
            assert!(run.start <= run.end);
            assert!(run.range().all(|k| ids[k] == id));
            next = run.end + 1;
        }
        assert_eq!(next, ids.len());
    }

    #[test]
    fn extract_all_concatenates_in_stream_order() {
        let idx = RunIndex::build(&IDS);
        let values = ["a", "b", "c", "d", "e", "f", "g", "h", "i", "j"];
        let got = idx.extract(&values, 0, RunSelector::All).unwrap().unwrap();
        assert_eq!(got, ["a", "b", "c", "i", "j"]);
    }

    #[test]
    fn extract_single_run() {
        let idx = RunIndex::build(&IDS);
        let values: Vec<f64> = (0..10).map(f64::from).collect();
        let second = idx.extract(&values, 0, RunSelector::Run(1)).unwrap().unwrap();
        assert_eq!(second, [8.0, 9.0]);
        let first = idx.extract(&values, 0, RunSelector::Run(0)).unwrap().unwrap();
        assert_eq!(first, [0.0, 1.0, 2.0]);
    }

    #[test]
    fn extract_rejects_wrong_length() {
        let idx = RunIndex::build(&IDS);
        let short = [1.0, 2.0];
        assert_eq!(
            idx.extract(&short, 0, RunSelector::All),
            Err(RunIndexError::LengthMismatch { expected: 10, got: 2 })
        );
    }

    #[test]
    fn extract_rejects_out_of_range_run() {
        let idx = RunIndex::build(&IDS);
        let values = [0u8; 10];
        assert_eq!(
            idx.extract(&values, 1, RunSelector::Run(1)),
            Err(RunIndexError::RunOutOfRange { run: 1, available: 1 })
        );
    }

    #[test]
    fn empty_sequence() {
        let idx: RunIndex<u32> = RunIndex::build(&[]);
        assert!(idx.is_empty());
        assert!(idx.runs_in_order().is_empty());
        assert_eq!(idx.ids().count(), 0);
    }

    #[test]
    fn single_element_run() {
        let idx = RunIndex::build(&[4u32]);
        assert_eq!(idx.lookup(4), Some(&[Run::new(0, 0)][..]));
        assert_eq!(Run::new(0, 0).len(), 1);
    }
}

#[cfg(test)]
mod config {
    use crate::PlgConfig;

    #[test]
    fn defaults_are_valid() {
        assert!(PlgConfig::default().validate().is_ok());
    }

    #[test]
    fn rejects_non_positive_separation() {
        let mut c = PlgConfig::default();
        c.nodes.min_separation_m = 0.0;
        assert!(c.validate().is_err());
        c.nodes.min_separation_m = f64::NAN;
        assert!(c.validate().is_err());
    }

    #[test]
    fn rejects_min_length_below_window() {
        let mut c = PlgConfig::default();
        c.decode.min_path_length = 2;
        assert!(c.validate().is_err());
    }

    #[test]
    fn rejects_cap_not_above_min() {
        let mut c = PlgConfig::default();
        c.decode.max_path_length = c.decode.min_path_length;
        assert!(c.validate().is_err());
    }
}

#[cfg(test)]
mod rng {
    use crate::PlgRng;

    #[test]
    fn same_seed_same_stream() {
        let mut a = PlgRng::new(7);
        let mut b = PlgRng::new(7);
        for _ in 0..16 {
            assert_eq!(a.gen_range(0..1000u32), b.gen_range(0..1000u32));
        }
    }

    #[test]
    fn per_path_seeds_differ() {
        let mut a = PlgRng::for_path(42, 0);
        let mut b = PlgRng::for_path(42, 1);
        let xs: Vec<u64> = (0..8).map(|_| a.gen_range(0..u64::MAX)).collect();
        let ys: Vec<u64> = (0..8).map(|_| b.gen_range(0..u64::MAX)).collect();
        assert_ne!(xs, ys);
    }

    #[test]
    fn choose_empty_is_none() {
        let mut r = PlgRng::new(1);
        let empty: [u8; 0] = [];
        assert!(r.choose(&empty).is_none());
    }
}

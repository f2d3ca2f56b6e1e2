// Copyright 2025 Lars Brubaker
// Randomized checks of the finished diagram.

mod helpers;

use fortune_dcel::{compute, Bounds, Dcel, Point};
use proptest::prelude::*;

fn spread_out(points: &[Point], min_dist: f64) -> bool {
    points
        .iter()
        .enumerate()
        .all(|(i, p)| points[..i].iter().all(|q| p.dist(*q) >= min_dist))
}

fn sites_strategy(max: usize) -> impl Strategy<Value = Vec<Point>> {
    prop::collection::vec((1.0f64..99.0, 1.0f64..99.0), 1..max)
        .prop_map(|v| v.into_iter().map(|(x, y)| Point::new(x, y)).collect::<Vec<_>>())
        .prop_filter("sites too close together", |v| spread_out(v, 0.5))
}

/// Sites on a coarse lattice: many share rows, columns and circles.
fn lattice_strategy() -> impl Strategy<Value = Vec<Point>> {
    prop::collection::btree_set((0u8..10, 0u8..10), 1..40).prop_map(|cells| {
        cells
            .into_iter()
            .map(|(i, j)| Point::new(5.0 + 10.0 * i as f64, 5.0 + 10.0 * j as f64))
            .collect()
    })
}

/// Sites packed into a square of side 0.01 in the middle of the box, so
/// circle events crowd together far below the box's size.
fn cluster_strategy(max: usize) -> impl Strategy<Value = Vec<Point>> {
    prop::collection::vec((50.0f64..50.01, 50.0f64..50.01), 3..max)
        .prop_map(|v| v.into_iter().map(|(x, y)| Point::new(x, y)).collect::<Vec<_>>())
        .prop_filter("sites too close together", |v| spread_out(v, 1e-5))
}

const FAR: f64 = 1.0e6;

fn build(sites: &[Point]) -> Dcel {
    compute(sites, Bounds::new(0.0, 0.0, 100.0, 100.0)).expect("valid input")
}

proptest! {
    #![proptest_config(ProptestConfig { cases: 200, .. ProptestConfig::default() })]

    #[test]
    fn random_sites_give_a_valid_partition(sites in sites_strategy(30)) {
        let d = build(&sites);
        prop_assert_eq!(d.num_faces(), sites.len());
        prop_assert!(d.validate().is_ok(), "{:?}", d.validate());
        helpers::check_all(&d);
    }

    #[test]
    fn lattice_sites_give_a_valid_partition(sites in lattice_strategy()) {
        let d = build(&sites);
        prop_assert_eq!(d.num_faces(), sites.len());
        helpers::check_all(&d);
    }

    #[test]
    fn clustered_sites_give_a_valid_partition(sites in cluster_strategy(40)) {
        let d = build(&sites);
        prop_assert_eq!(d.num_faces(), sites.len());
        helpers::check_all(&d);
    }

    #[test]
    fn far_off_bounds_give_a_valid_partition(sites in sites_strategy(60)) {
        let shifted: Vec<Point> = sites.iter().map(|p| Point::new(p.x + FAR, p.y + FAR)).collect();
        let d = compute(&shifted, Bounds::new(FAR, FAR, FAR + 100.0, FAR + 100.0)).expect("valid input");
        prop_assert_eq!(d.num_faces(), sites.len());
        helpers::check_all(&d);
    }

    #[test]
    fn twins_border_each_other(sites in sites_strategy(20)) {
        let d = build(&sites);
        for (i, e) in d.edges().iter().enumerate() {
            if e.twin == fortune_dcel::INVALID {
                prop_assert!(d.vertex(e.origin).on_boundary);
                continue;
            }
            let t = d.edge(e.twin);
            prop_assert_eq!(t.twin as usize, i);
            // The twin runs the other way along the same segment.
            prop_assert!(helpers::close(d.vertex(t.origin).point, d.vertex(d.dst(i as u32)).point));
        }
    }

    #[test]
    fn computing_twice_gives_the_same_diagram(sites in sites_strategy(20)) {
        let a = build(&sites);
        let b = build(&sites);
        prop_assert_eq!(a.edges(), b.edges());
        prop_assert_eq!(a.vertices(), b.vertices());
    }

    #[test]
    fn input_order_only_renumbers(sites in sites_strategy(15)) {
        let a = build(&sites);
        let mut reversed = sites.clone();
        reversed.reverse();
        let b = build(&reversed);
        let n = sites.len();
        for f in 0..n {
            let fa = a.face_area(f as u32);
            let fb = b.face_area((n - 1 - f) as u32);
            prop_assert!((fa - fb).abs() < 1e-6, "cell {}: {} vs {}", f, fa, fb);
        }
    }
}

// Copyright 2025 Lars Brubaker
// Shared test utilities for fortune-dcel tests.

#![allow(dead_code)]

use fortune_dcel::{compute, Bounds, Dcel, FaceIdx, Point, Real, INVALID};

pub const TOL: Real = 1e-6;

pub fn b100() -> Bounds {
    Bounds::new(0.0, 0.0, 100.0, 100.0)
}

pub fn pts(coords: &[(Real, Real)]) -> Vec<Point> {
    coords.iter().map(|&(x, y)| Point::new(x, y)).collect()
}

/// Compute and assert the result passes the structural self-check.
pub fn diagram(coords: &[(Real, Real)], bounds: Bounds) -> Dcel {
    let dcel = compute(&pts(coords), bounds).expect("diagram should compute");
    if let Err(msg) = dcel.validate() {
        panic!("invalid diagram for {:?}: {}", coords, msg);
    }
    dcel
}

pub fn close(a: Point, b: Point) -> bool {
    a.dist(b) < TOL
}

/// Polygon of `f` as (x, y) tuples.
pub fn polygon(dcel: &Dcel, f: FaceIdx) -> Vec<(Real, Real)> {
    dcel.face_polygon(f).iter().map(|p| (p.x, p.y)).collect()
}

/// Whether two closed polygons list the same corners in the same cyclic order.
pub fn same_cycle(got: &[Point], want: &[Point]) -> bool {
    if got.len() != want.len() {
        return false;
    }
    let n = got.len();
    (0..n).any(|shift| (0..n).all(|i| close(got[(i + shift) % n], want[i])))
}

pub fn assert_face(dcel: &Dcel, f: FaceIdx, want: &[(Real, Real)]) {
    let got = dcel.face_polygon(f);
    assert!(
        same_cycle(&got, &pts(want)),
        "face {} is {:?}, expected {:?}",
        f,
        polygon(dcel, f),
        want
    );
}

pub fn total_area(dcel: &Dcel) -> Real {
    (0..dcel.num_faces() as FaceIdx).map(|f| dcel.face_area(f)).sum()
}

pub fn count_pseudo(dcel: &Dcel) -> usize {
    dcel.edges().iter().filter(|e| e.twin == INVALID).count()
}

/// Longer side of the bounds. Distances are checked relative to it.
pub fn extent(dcel: &Dcel) -> Real {
    let b = dcel.bounds();
    b.width().max(b.height())
}

/// Every cell is a convex counter-clockwise polygon without repeated corners
/// that contains its own site.
pub fn check_cells(dcel: &Dcel) {
    let scale = dcel.bounds().scale();
    let area_tol = 1e-9 * extent(dcel) * extent(dcel);
    for f in 0..dcel.num_faces() as FaceIdx {
        let poly = dcel.face_polygon(f);
        let n = poly.len();
        assert!(n >= 3, "face {} has {} corners", f, n);
        for i in 0..n {
            let a = poly[i];
            let b = poly[(i + 1) % n];
            let c = poly[(i + 2) % n];
            assert!(a.dist(b) > 1e-9 * scale, "face {} repeats corner {:?}", f, a);
            let turn = (b.x - a.x) * (c.y - b.y) - (b.y - a.y) * (c.x - b.x);
            assert!(turn > -area_tol, "face {} turns clockwise at {:?}", f, b);
            let s = dcel.site(f).point;
            let side = (b.x - a.x) * (s.y - a.y) - (b.y - a.y) * (s.x - a.x);
            assert!(side > -area_tol, "site {} lies right of edge {:?} -> {:?}", f, a, b);
        }
    }
}

/// Each Voronoi edge is equidistant from the sites on its two sides, and each
/// cell corner is no closer to any other site than to its own.
pub fn check_distances(dcel: &Dcel) {
    let sites: Vec<Point> = dcel.sites().iter().map(|s| s.point).collect();
    let tol = 1e-8 * extent(dcel);
    for (i, e) in dcel.edges().iter().enumerate() {
        let p = dcel.vertex(e.origin).point;
        let own = sites[dcel.face(e.face).site as usize];
        if let Some(other) = dcel.neighbor(i as u32) {
            let d0 = p.dist(own);
            let d1 = p.dist(sites[other as usize]);
            assert!((d0 - d1).abs() < tol, "edge {} at {:?}: {} vs {}", i, p, d0, d1);
        }
        let d_own = p.dist(own);
        for (j, q) in sites.iter().enumerate() {
            assert!(
                p.dist(*q) > d_own - tol,
                "corner {:?} of face {} is closer to site {}",
                p,
                e.face,
                j
            );
        }
    }
}

/// Everything a finished diagram must satisfy.
pub fn check_all(dcel: &Dcel) {
    assert!(dcel.validate().is_ok(), "{:?}", dcel.validate());
    check_cells(dcel);
    check_distances(dcel);
    let b = dcel.bounds();
    let area = total_area(dcel);
    let want = b.width() * b.height();
    assert!((area - want).abs() < 1e-6 * want, "cells cover {} of {}", area, want);
}

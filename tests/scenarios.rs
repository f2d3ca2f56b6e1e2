// Copyright 2025 Lars Brubaker
// Complete diagrams for small site sets with known cells.

mod helpers;

use fortune_dcel::{compute, Bounds, Point, Voronoi};
use helpers::{assert_face, b100, check_all, count_pseudo, diagram};

// --- Five scattered sites ---

fn five_sites() -> Vec<(f64, f64)> {
    vec![(20.0, 80.0), (40.0, 60.0), (20.0, 30.0), (70.0, 70.0), (60.0, 50.0)]
}

#[test]
fn five_sites_counts() {
    let d = diagram(&five_sites(), b100());
    assert_eq!(d.num_faces(), 5);
    assert_eq!(d.num_vertices(), 12);
    assert_eq!(d.num_edges(), 24);
    assert_eq!(count_pseudo(&d), 8);
    assert_eq!(d.vertices().iter().filter(|v| v.on_boundary).count(), 8);
}

#[test]
fn five_sites_cells() {
    let d = diagram(&five_sites(), b100());
    assert_face(&d, 0, &[(47.5, 87.5), (50.0, 100.0), (0.0, 100.0), (0.0, 55.0), (15.0, 55.0)]);
    assert_face(&d, 1, &[(47.5, 87.5), (15.0, 55.0), (41.25, 37.5), (55.0, 65.0)]);
    assert_face(&d, 2, &[(41.25, 37.5), (15.0, 55.0), (0.0, 55.0), (0.0, 0.0), (60.0, 0.0)]);
    assert_face(&d, 3, &[(50.0, 100.0), (47.5, 87.5), (55.0, 65.0), (100.0, 42.5), (100.0, 100.0)]);
    assert_face(&d, 4, &[(100.0, 42.5), (55.0, 65.0), (41.25, 37.5), (60.0, 0.0), (100.0, 0.0)]);
    check_all(&d);
}

#[test]
fn enclosed_cell_has_only_voronoi_edges() {
    let d = diagram(&five_sites(), b100());
    let mut neighbours: Vec<u32> = d.face_boundary(1).map(|e| d.neighbor(e).unwrap()).collect();
    neighbours.sort_unstable();
    assert_eq!(neighbours, vec![0, 2, 3, 4]);
}

// --- Two sites ---

#[test]
fn two_sites_side_by_side() {
    let d = diagram(&[(30.0, 50.0), (70.0, 50.0)], b100());
    assert_eq!(d.num_vertices(), 6);
    assert_eq!(d.num_edges(), 8);
    assert_eq!(count_pseudo(&d), 6);
    assert_face(&d, 0, &[(0.0, 0.0), (50.0, 0.0), (50.0, 100.0), (0.0, 100.0)]);
    assert_face(&d, 1, &[(50.0, 0.0), (100.0, 0.0), (100.0, 100.0), (50.0, 100.0)]);
    check_all(&d);
}

#[test]
fn two_sites_stacked() {
    let d = diagram(&[(50.0, 50.0), (50.0, 20.0)], b100());
    assert_eq!(d.num_vertices(), 6);
    assert_eq!(d.num_edges(), 8);
    assert_eq!(count_pseudo(&d), 6);
    assert_face(&d, 0, &[(0.0, 35.0), (100.0, 35.0), (100.0, 100.0), (0.0, 100.0)]);
    assert_face(&d, 1, &[(0.0, 0.0), (100.0, 0.0), (100.0, 35.0), (0.0, 35.0)]);
    check_all(&d);
}

#[test]
fn two_sites_diagonal() {
    let d = diagram(&[(25.0, 75.0), (75.0, 25.0)], b100());
    // Bisector y = x runs corner to corner.
    assert_eq!(d.num_vertices(), 4);
    assert_face(&d, 0, &[(0.0, 0.0), (100.0, 100.0), (0.0, 100.0)]);
    assert_face(&d, 1, &[(0.0, 0.0), (100.0, 0.0), (100.0, 100.0)]);
    check_all(&d);
}

// --- Three sites ---

#[test]
fn collinear_row_makes_strips() {
    let d = diagram(&[(10.0, 50.0), (50.0, 50.0), (90.0, 50.0)], b100());
    assert_eq!(d.num_vertices(), 8);
    assert_eq!(d.num_edges(), 12);
    assert_eq!(count_pseudo(&d), 8);
    assert_face(&d, 0, &[(0.0, 0.0), (30.0, 0.0), (30.0, 100.0), (0.0, 100.0)]);
    assert_face(&d, 1, &[(30.0, 0.0), (70.0, 0.0), (70.0, 100.0), (30.0, 100.0)]);
    assert_face(&d, 2, &[(70.0, 0.0), (100.0, 0.0), (100.0, 100.0), (70.0, 100.0)]);
    check_all(&d);
}

#[test]
fn triangle_meets_at_circumcenter() {
    let d = diagram(&[(25.0, 75.0), (75.0, 75.0), (50.0, 25.0)], b100());
    assert_eq!(d.num_vertices(), 8);
    assert_eq!(d.num_edges(), 13);
    assert_eq!(count_pseudo(&d), 7);
    let interior: Vec<Point> = d.vertices().iter().filter(|v| !v.on_boundary).map(|v| v.point).collect();
    assert_eq!(interior.len(), 1);
    assert!(helpers::close(interior[0], Point::new(50.0, 56.25)));
    assert_face(&d, 0, &[(0.0, 31.25), (50.0, 56.25), (50.0, 100.0), (0.0, 100.0)]);
    assert_face(&d, 1, &[(50.0, 56.25), (100.0, 31.25), (100.0, 100.0), (50.0, 100.0)]);
    assert_face(&d, 2, &[(0.0, 0.0), (100.0, 0.0), (100.0, 31.25), (50.0, 56.25), (0.0, 31.25)]);
    check_all(&d);
}

// --- Single site ---

#[test]
fn single_site_owns_the_rectangle() {
    let d = diagram(&[(40.0, 30.0)], Bounds::new(10.0, 20.0, 60.0, 90.0));
    assert_eq!(d.num_faces(), 1);
    assert_eq!(d.num_vertices(), 4);
    assert_eq!(d.num_edges(), 4);
    assert_face(&d, 0, &[(10.0, 20.0), (60.0, 20.0), (60.0, 90.0), (10.0, 90.0)]);
    assert!((d.face_area(0) - 3500.0).abs() < 1e-9);
}

// --- Builder API ---

#[test]
fn builder_and_free_function_agree() {
    let mut v = Voronoi::new(b100());
    for (x, y) in five_sites() {
        v.add_site(x, y);
    }
    let a = v.compute().unwrap();
    let sites: Vec<Point> = five_sites().into_iter().map(|(x, y)| Point::new(x, y)).collect();
    let b = compute(&sites, b100()).unwrap();
    assert_eq!(a.num_vertices(), b.num_vertices());
    assert_eq!(a.edges(), b.edges());
}

#[test]
fn flat_coordinates() {
    let mut v = Voronoi::new(b100());
    v.add_sites(&[30.0, 50.0, 70.0, 50.0]);
    let d = v.compute().unwrap();
    assert_eq!(d.num_faces(), 2);
    assert_eq!(d.site(1).point, Point::new(70.0, 50.0));
}

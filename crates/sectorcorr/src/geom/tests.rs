use super::*;
use nalgebra::{vector, Vector2};
use proptest::prelude::*;

fn square(side: f64) -> Polygon {
    Polygon::from_xy(&[(0.0, 0.0), (side, 0.0), (side, side), (0.0, side)]).unwrap()
}

fn concave_l() -> Polygon {
    // L-shape, counterclockwise
    Polygon::from_xy(&[
        (0.0, 0.0),
        (4.0, 0.0),
        (4.0, 1.0),
        (1.0, 1.0),
        (1.0, 4.0),
        (0.0, 4.0),
    ])
    .unwrap()
}

fn brute_force_distance(poly: &Polygon, p: Point) -> f64 {
    let steps = 4_000;
    let mut best = f64::INFINITY;
    for (a, b) in poly.edges() {
        for k in 0..=steps {
            let t = k as f64 / steps as f64;
            let q = a + (b - a) * t;
            best = best.min((p - q).norm());
        }
    }
    best
}

#[test]
fn rejects_degenerate_polygons() {
    assert!(Polygon::from_xy(&[(0.0, 0.0), (1.0, 0.0)]).is_err());
    assert!(Polygon::from_xy(&[]).is_err());
    assert!(Polygon::from_xy(&[(0.0, 0.0), (1.0, f64::NAN), (0.0, 1.0)]).is_err());
}

#[test]
fn contains_handles_concave_notch() {
    let l = concave_l();
    assert!(l.contains(vector![0.5, 0.5]));
    assert!(l.contains(vector![3.5, 0.5]));
    assert!(l.contains(vector![0.5, 3.5]));
    assert!(!l.contains(vector![2.0, 2.0]));
    assert!(!l.contains(vector![-1.0, 0.5]));
    assert!(!l.contains(vector![5.0, 0.5]));
}

#[test]
fn boundary_distance_same_inside_and_outside() {
    let sq = square(10.0);
    let inside = sq.distance_to_boundary(vector![2.0, 5.0]);
    let outside = sq.distance_to_boundary(vector![-2.0, 5.0]);
    assert!((inside - 2.0).abs() < 1e-12);
    assert!((outside - 2.0).abs() < 1e-12);
    // Corner region: distance to the vertex, not to the extended edge line.
    let corner = sq.distance_to_boundary(vector![13.0, 14.0]);
    assert!((corner - 5.0).abs() < 1e-12);
}

#[test]
fn point_on_edge_has_zero_distance() {
    let sq = square(10.0);
    assert_eq!(sq.distance_to_boundary(vector![10.0, 3.0]), 0.0);
    assert_eq!(sq.distance_to_boundary(vector![0.0, 0.0]), 0.0);
}

#[test]
fn segment_distance_degenerate_segment() {
    let a = vector![1.0, 1.0];
    assert!((point_segment_distance(vector![4.0, 5.0], a, a) - 5.0).abs() < 1e-12);
}

#[test]
fn area_centroid_and_bbox() {
    let sq = square(2.0);
    assert!((sq.area() - 4.0).abs() < 1e-12);
    assert!(sq.signed_area() > 0.0);
    let c = sq.centroid().unwrap();
    assert!((c - vector![1.0, 1.0]).norm() < 1e-12);
    let bb = sq.bbox();
    assert_eq!(bb.min, vector![0.0, 0.0]);
    assert_eq!(bb.max, vector![2.0, 2.0]);
    assert!(!bb.is_degenerate());
    assert!((concave_l().area() - 7.0).abs() < 1e-12);
}

#[test]
fn collinear_ring_has_degenerate_bbox_or_no_centroid() {
    let line = Polygon::from_xy(&[(0.0, 0.0), (1.0, 0.0), (2.0, 0.0)]).unwrap();
    assert!(line.bbox().is_degenerate());
    assert!(line.centroid().is_none());
}

#[test]
fn sorted_by_angle_recovers_ring_order() {
    let scrambled =
        Polygon::from_xy(&[(0.0, 0.0), (1.0, 1.0), (1.0, 0.0), (0.0, 1.0)]).unwrap();
    // Crossed ordering has zero signed area; angle sort restores the square.
    assert!(scrambled.signed_area().abs() < 1e-12);
    let ring = scrambled.sorted_by_angle();
    assert!((ring.area() - 1.0).abs() < 1e-12);
    assert_eq!(ring.vertex_count(), 4);
}

#[test]
fn expanded_radially_moves_vertices_outward() {
    let sq = square(2.0);
    let grown = sq.expanded_radially(2.0_f64.sqrt()).unwrap();
    let bb = grown.bbox();
    assert!((bb.min - vector![-1.0, -1.0]).norm() < 1e-12);
    assert!((bb.max - vector![3.0, 3.0]).norm() < 1e-12);
    assert!(grown.area() > sq.area());
}

#[test]
fn expanded_radially_rejects_vertex_at_mean() {
    // Vertex mean is (1, 0), which is also a vertex.
    let p = Polygon::from_xy(&[(0.0, 0.0), (1.0, 0.0), (2.0, 0.0)]).unwrap();
    assert!(p.expanded_radially(1.0).is_err());
}

#[test]
fn serde_round_trip_validates() {
    let sq = square(1.0);
    let json = serde_json::to_string(&sq).unwrap();
    let back: Polygon = serde_json::from_str(&json).unwrap();
    assert_eq!(back, sq);
    let bad: Result<Polygon, _> = serde_json::from_str("[[0.0,0.0],[1.0,0.0]]");
    assert!(bad.is_err());
}

proptest! {
    #[test]
    fn distance_matches_segment_scan(px in -6.0f64..10.0, py in -6.0f64..10.0) {
        let poly = concave_l();
        let p = Vector2::new(px, py);
        let fast = poly.distance_to_boundary(p);
        let brute = brute_force_distance(&poly, p);
        // Scan spacing is at most 1e-3; the exact value can only be smaller.
        prop_assert!(fast <= brute + 1e-12);
        prop_assert!(brute - fast < 1e-3);
    }

    #[test]
    fn perturbing_edge_point_flips_containment(edge in 0usize..4, t in 0.05f64..0.95) {
        let sq = square(10.0);
        let verts = sq.vertices();
        let a = verts[edge];
        let b = verts[(edge + 1) % 4];
        let on_edge = a + (b - a) * t;
        prop_assert!(sq.distance_to_boundary(on_edge) < 1e-12);
        let d = b - a;
        let outward = Vector2::new(d.y, -d.x) / d.norm();
        let eps = 1e-6;
        prop_assert!(sq.contains(on_edge - outward * eps));
        prop_assert!(!sq.contains(on_edge + outward * eps));
    }
}

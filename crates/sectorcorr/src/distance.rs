//! Nearest-boundary distances for a point set.

use crate::geom::{Point, Polygon};

/// Boundary distance of every point, with exact zeros (points on the
/// boundary) dropped. Output may be shorter than input; it may be empty.
pub fn extract_distances(points: &[Point], boundary: &Polygon) -> Vec<f64> {
    points
        .iter()
        .map(|p| boundary.distance_to_boundary(*p))
        .filter(|&d| d != 0.0)
        .collect()
}

/// Keep only the points inside `domain`, preserving their order.
pub fn points_inside(points: &[Point], domain: &Polygon) -> Vec<Point> {
    points.iter().copied().filter(|p| domain.contains(*p)).collect()
}

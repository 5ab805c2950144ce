//! Boundary geometry for closed 2D polygons.
//!
//! Purpose
//! - Two directly testable primitives: `Polygon::contains` (crossing number)
//!   and `Polygon::distance_to_boundary` (minimum point-to-segment distance).
//! - Small outline helpers used by loaders and density bands: angle ordering,
//!   radial expansion, shoelace area, bounding box.
//!
//! Conventions
//! - Vertices form an implicitly closed ring; at least 3 finite vertices are
//!   enforced at construction. Self-intersection is not checked.
//! - Boundary distance ignores containment: a point inside and a point outside
//!   at the same distance from an edge get the same value.
//! - `contains` is half-open in y, so a point exactly on an edge may land on
//!   either side. Such points have distance 0 and are dropped before binning.

mod polygon;

pub use polygon::{point_segment_distance, Bbox2, Polygon};

use nalgebra::Vector2;

/// A position on the tissue surface.
pub type Point = Vector2<f64>;

#[cfg(test)]
mod tests;

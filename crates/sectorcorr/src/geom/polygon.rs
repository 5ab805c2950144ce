use super::Point;
use crate::error::CorrError;
use nalgebra::Vector2;
use serde::{Deserialize, Serialize};

/// Axis-aligned bounding box.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Bbox2 {
    pub min: Point,
    pub max: Point,
}

impl Bbox2 {
    #[inline]
    pub fn width(&self) -> f64 {
        self.max.x - self.min.x
    }
    #[inline]
    pub fn height(&self) -> f64 {
        self.max.y - self.min.y
    }
    #[inline]
    pub fn area(&self) -> f64 {
        self.width() * self.height()
    }
    /// True when either side has zero (or non-finite) extent.
    pub fn is_degenerate(&self) -> bool {
        !(self.width() > 0.0 && self.height() > 0.0 && self.area().is_finite())
    }
}

/// Closed polygon given by its vertex ring.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Vec<Point>", into = "Vec<Point>")]
pub struct Polygon {
    verts: Vec<Point>,
}

impl TryFrom<Vec<Point>> for Polygon {
    type Error = CorrError;
    fn try_from(verts: Vec<Point>) -> Result<Self, Self::Error> {
        Self::new(verts)
    }
}

impl From<Polygon> for Vec<Point> {
    fn from(poly: Polygon) -> Self {
        poly.verts
    }
}

impl Polygon {
    /// Validate and wrap a vertex ring (last vertex connects to the first).
    pub fn new(verts: Vec<Point>) -> Result<Self, CorrError> {
        if verts.len() < 3 {
            return Err(CorrError::config(format!(
                "polygon needs at least 3 vertices, got {}",
                verts.len()
            )));
        }
        if verts.iter().any(|p| !(p.x.is_finite() && p.y.is_finite())) {
            return Err(CorrError::config("polygon vertices must be finite"));
        }
        Ok(Self { verts })
    }

    /// Convenience constructor from `(x, y)` pairs.
    pub fn from_xy(coords: &[(f64, f64)]) -> Result<Self, CorrError> {
        Self::new(coords.iter().map(|&(x, y)| Vector2::new(x, y)).collect())
    }

    #[inline]
    pub fn vertices(&self) -> &[Point] {
        &self.verts
    }

    #[inline]
    pub fn vertex_count(&self) -> usize {
        self.verts.len()
    }

    /// Edge segments `(v_i, v_{i+1})`, including the closing edge.
    pub fn edges(&self) -> impl Iterator<Item = (Point, Point)> + '_ {
        let n = self.verts.len();
        (0..n).map(move |i| (self.verts[i], self.verts[(i + 1) % n]))
    }

    /// Crossing-number point-in-polygon test.
    ///
    /// Casts a ray toward +x and counts edges whose half-open y-span
    /// `[y_min, y_max)` contains `p.y` and whose crossing lies right of `p`.
    /// Horizontal edges never count.
    pub fn contains(&self, p: Point) -> bool {
        let mut inside = false;
        for (a, b) in self.edges() {
            let (y_min, y_max) = if a.y < b.y { (a.y, b.y) } else { (b.y, a.y) };
            if p.y < y_min || p.y >= y_max {
                continue;
            }
            let t = (p.y - a.y) / (b.y - a.y);
            let x_cross = a.x + t * (b.x - a.x);
            if x_cross > p.x {
                inside = !inside;
            }
        }
        inside
    }

    /// Minimum Euclidean distance from `p` to the boundary ring.
    pub fn distance_to_boundary(&self, p: Point) -> f64 {
        self.edges()
            .map(|(a, b)| point_segment_distance(p, a, b))
            .fold(f64::INFINITY, f64::min)
    }

    /// Shoelace area; positive for counterclockwise rings.
    pub fn signed_area(&self) -> f64 {
        0.5 * self
            .edges()
            .map(|(p, q)| p.x * q.y - q.x * p.y)
            .sum::<f64>()
    }

    #[inline]
    pub fn area(&self) -> f64 {
        self.signed_area().abs()
    }

    /// Area centroid; `None` for (near) zero-area rings.
    pub fn centroid(&self) -> Option<Point> {
        let mut a = 0.0;
        let mut cx = 0.0;
        let mut cy = 0.0;
        for (p, q) in self.edges() {
            let cross = p.x * q.y - q.x * p.y;
            a += cross;
            cx += (p.x + q.x) * cross;
            cy += (p.y + q.y) * cross;
        }
        a *= 0.5;
        if a.abs() < 1e-18 {
            return None;
        }
        Some(Vector2::new(cx / (6.0 * a), cy / (6.0 * a)))
    }

    /// Arithmetic mean of the vertices.
    pub fn vertex_mean(&self) -> Point {
        let sum = self
            .verts
            .iter()
            .fold(Vector2::zeros(), |acc: Point, p| acc + p);
        sum / self.verts.len() as f64
    }

    pub fn bbox(&self) -> Bbox2 {
        let mut min = Vector2::new(f64::INFINITY, f64::INFINITY);
        let mut max = Vector2::new(f64::NEG_INFINITY, f64::NEG_INFINITY);
        for p in &self.verts {
            min.x = min.x.min(p.x);
            min.y = min.y.min(p.y);
            max.x = max.x.max(p.x);
            max.y = max.y.max(p.y);
        }
        Bbox2 { min, max }
    }

    /// Reorder vertices by polar angle around the vertex mean.
    ///
    /// Digitized outlines arrive as unordered point clouds; this yields a
    /// simple ring for star-shaped outlines.
    pub fn sorted_by_angle(&self) -> Polygon {
        let c = self.vertex_mean();
        let mut keyed: Vec<(f64, Point)> = self
            .verts
            .iter()
            .map(|p| ((p.y - c.y).atan2(p.x - c.x), *p))
            .collect();
        keyed.sort_by(|a, b| a.0.total_cmp(&b.0));
        Polygon {
            verts: keyed.into_iter().map(|(_, p)| p).collect(),
        }
    }

    /// Push every vertex `range` further from the vertex mean along its ray.
    ///
    /// Used to build a "virtual sector" that reaches `range` beyond the real
    /// outline. Fails if a vertex coincides with the mean (no direction).
    pub fn expanded_radially(&self, range: f64) -> Result<Polygon, CorrError> {
        if !range.is_finite() {
            return Err(CorrError::config("expansion range must be finite"));
        }
        let c = self.vertex_mean();
        let mut out = Vec::with_capacity(self.verts.len());
        for p in &self.verts {
            let d = p - c;
            let norm = d.norm();
            if norm <= 0.0 {
                return Err(CorrError::config(
                    "cannot expand a polygon with a vertex at its vertex mean",
                ));
            }
            out.push(p + d * (range / norm));
        }
        Polygon::new(out)
    }
}

/// Distance from `p` to the closed segment `[a, b]`.
#[inline]
pub fn point_segment_distance(p: Point, a: Point, b: Point) -> f64 {
    let ab = b - a;
    let len2 = ab.norm_squared();
    if len2 == 0.0 {
        return (p - a).norm();
    }
    let t = ((p - a).dot(&ab) / len2).clamp(0.0, 1.0);
    (p - (a + ab * t)).norm()
}

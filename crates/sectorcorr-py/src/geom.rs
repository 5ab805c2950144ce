//! Geometry and distance bindings.

use crate::common::{map_corr_err, point_from_py, points_from_py, polygon_from_py};
use pyo3::prelude::*;
use sectorcorr::distance;
use sectorcorr::histogram::BinEdges;

/// Minimum distance from `point` to the polygon outline.
#[pyfunction]
pub fn distance_to_boundary(polygon: Vec<(f64, f64)>, point: (f64, f64)) -> PyResult<f64> {
    Ok(polygon_from_py(polygon)?.distance_to_boundary(point_from_py(point)))
}

/// Points of `points` that fall inside `polygon`, in input order.
#[pyfunction]
pub fn points_inside(
    polygon: Vec<(f64, f64)>,
    points: Vec<(f64, f64)>,
) -> PyResult<Vec<(f64, f64)>> {
    let poly = polygon_from_py(polygon)?;
    Ok(distance::points_inside(&points_from_py(points), &poly)
        .into_iter()
        .map(|p| (p.x, p.y))
        .collect())
}

/// Boundary distances with on-boundary points dropped.
#[pyfunction]
pub fn extract_distances(points: Vec<(f64, f64)>, polygon: Vec<(f64, f64)>) -> PyResult<Vec<f64>> {
    let poly = polygon_from_py(polygon)?;
    Ok(distance::extract_distances(&points_from_py(points), &poly))
}

/// Histogram counts of `distances` over `edges`.
#[pyfunction]
pub fn bin_distances(distances: Vec<f64>, edges: Vec<f64>) -> PyResult<Vec<u64>> {
    let edges = BinEdges::new(edges).map_err(map_corr_err)?;
    Ok(edges.bin(&distances).counts().to_vec())
}

pub fn register(m: &Bound<'_, PyModule>) -> PyResult<()> {
    m.add_function(wrap_pyfunction!(distance_to_boundary, m)?)?;
    m.add_function(wrap_pyfunction!(points_inside, m)?)?;
    m.add_function(wrap_pyfunction!(extract_distances, m)?)?;
    m.add_function(wrap_pyfunction!(bin_distances, m)?)?;
    Ok(())
}

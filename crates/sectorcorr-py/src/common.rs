use nalgebra::Vector2;
use pyo3::exceptions::PyValueError;
use pyo3::prelude::*;
use sectorcorr::{CorrError, Point, Polygon};

pub fn point_from_py(p: (f64, f64)) -> Point {
    Vector2::new(p.0, p.1)
}

pub fn points_from_py(pts: Vec<(f64, f64)>) -> Vec<Point> {
    pts.into_iter().map(point_from_py).collect()
}

pub fn polygon_from_py(verts: Vec<(f64, f64)>) -> PyResult<Polygon> {
    Polygon::new(points_from_py(verts)).map_err(map_corr_err)
}

pub fn map_corr_err(err: CorrError) -> PyErr {
    PyValueError::new_err(err.to_string())
}

//! Correlation binding.

use crate::common::map_corr_err;
use pyo3::prelude::*;
use sectorcorr::estimate::{estimate, Analytic};
use sectorcorr::histogram::{Histogram, TrialMatrix};
use std::collections::HashMap;

/// Per-bin `score`, `lower`, `upper` lists; undefined bins are `None`.
#[pyfunction]
#[pyo3(signature = (observed, trials, z = None))]
pub fn correlation(
    observed: Vec<u64>,
    trials: Vec<Vec<u64>>,
    z: Option<f64>,
) -> PyResult<HashMap<&'static str, Vec<Option<f64>>>> {
    let trials = TrialMatrix::new(trials.into_iter().map(Histogram::from_counts).collect())
        .map_err(map_corr_err)?;
    let estimator = z.map(|z| Analytic { z }).unwrap_or_default();
    let res = estimate(&Histogram::from_counts(observed), &trials, &estimator)
        .map_err(map_corr_err)?;
    Ok(HashMap::from([
        ("score", res.scores()),
        ("lower", res.lower()),
        ("upper", res.upper()),
    ]))
}

pub fn register(m: &Bound<'_, PyModule>) -> PyResult<()> {
    m.add_function(wrap_pyfunction!(correlation, m)?)?;
    Ok(())
}

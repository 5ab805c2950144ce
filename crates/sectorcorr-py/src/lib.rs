//! PyO3 bindings for selected `sectorcorr` functions.
//!
//! Notes
//! - Keep bindings thin and predictable: plain tuples and lists in, lists and
//!   dicts out. Spreadsheet loading and plotting stay on the Python side.
//! - Engine errors surface as `ValueError`; undefined bins surface as `None`.

use pyo3::prelude::*;

mod common;
mod estimate;
mod geom;

#[pymodule]
fn sectorcorr_native(m: &Bound<'_, PyModule>) -> PyResult<()> {
    geom::register(m)?;
    estimate::register(m)?;
    m.add("__version__", sectorcorr::VERSION)?;
    Ok(())
}

#[cfg(feature = "python")]
use pyo3::prelude::*;

pub mod axis;
pub mod envelope;
pub mod error;
pub mod matrix;
pub mod numerics;
pub mod proj;
pub mod transform;
#[cfg(feature = "python")]
mod py;

/// A Python module implemented in Rust.
#[cfg(feature = "python")]
#[pymodule]
fn _georef(m: &Bound<'_, PyModule>) -> PyResult<()> {
    py::register(m)?;
    Ok(())
}

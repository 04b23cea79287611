use pyo3::prelude::*;

mod matrix;
mod transform;

/// Register all Python-visible functions and types.
pub fn register(m: &Bound<'_, PyModule>) -> PyResult<()> {
    m.add_function(wrap_pyfunction!(transform::mercator_forward, m)?)?;
    m.add_function(wrap_pyfunction!(transform::mercator_inverse, m)?)?;
    m.add_function(wrap_pyfunction!(matrix::matrix_to_string, m)?)?;
    m.add_function(wrap_pyfunction!(matrix::matrix_inverse, m)?)?;
    Ok(())
}

//! PyO3 bindings for matrix formatting and inversion.

use ndarray::Array2;
use numpy::{PyArray2, PyReadonlyArray2};
use pyo3::exceptions::PyValueError;
use pyo3::prelude::*;

use crate::matrix::{format, matrices};

/// Format a 2D array as a boxed table with aligned decimal columns.
#[pyfunction]
pub fn matrix_to_string(matrix: PyReadonlyArray2<'_, f64>) -> String {
    let array: Array2<f64> = matrix.as_array().to_owned();
    format::to_string(&array)
}

/// Invert a square 2D array.
///
/// Raises:
///     ValueError: if the matrix is not square or is singular.
#[pyfunction]
pub fn matrix_inverse<'py>(
    py: Python<'py>,
    matrix: PyReadonlyArray2<'py, f64>,
) -> PyResult<Bound<'py, PyArray2<f64>>> {
    let array: Array2<f64> = matrix.as_array().to_owned();
    let inverse = matrices::copy_of(&array)
        .inverse()
        .map_err(|e| PyValueError::new_err(e.to_string()))?;
    Ok(PyArray2::from_owned_array(py, inverse.to_array2()))
}

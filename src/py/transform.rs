//! PyO3 bindings for batch Mercator projection on WGS84.

use numpy::{PyArray1, PyReadonlyArray1};
use pyo3::exceptions::PyValueError;
use pyo3::prelude::*;

use crate::proj::pipeline::{MapProjection, MercatorMethod, MercatorParameters};

type CoordArrays<'py> = (Bound<'py, PyArray1<f64>>, Bound<'py, PyArray1<f64>>);

fn method_from_name(name: &str) -> PyResult<MercatorMethod> {
    match name {
        "variant_a" | "1sp" => Ok(MercatorMethod::VariantA),
        "variant_b" | "2sp" => Ok(MercatorMethod::VariantB),
        "pseudo" | "web" => Ok(MercatorMethod::PseudoMercator),
        _ => Err(PyValueError::new_err(format!("Unknown Mercator method: {name}"))),
    }
}

fn build(
    method: &str,
    central_meridian: f64,
    scale_factor: f64,
    standard_parallel: f64,
    false_easting: f64,
    false_northing: f64,
) -> PyResult<MapProjection> {
    let params = MercatorParameters {
        method: method_from_name(method)?,
        central_meridian,
        scale_factor,
        standard_parallel,
        false_easting,
        false_northing,
        ..MercatorParameters::default()
    };
    MapProjection::mercator(&params).map_err(|e| PyValueError::new_err(e.to_string()))
}

fn interleave(x: &PyReadonlyArray1<'_, f64>, y: &PyReadonlyArray1<'_, f64>) -> PyResult<Vec<f64>> {
    let x_view = x.as_array();
    let y_view = y.as_array();
    if x_view.len() != y_view.len() {
        return Err(PyValueError::new_err(format!(
            "x and y must have same length, got {} and {}",
            x_view.len(),
            y_view.len()
        )));
    }
    Ok(x_view
        .iter()
        .zip(y_view.iter())
        .flat_map(|(&xi, &yi)| [xi, yi])
        .collect())
}

fn split<'py>(py: Python<'py>, coords: &[f64]) -> CoordArrays<'py> {
    let (xs, ys): (Vec<f64>, Vec<f64>) = coords.chunks_exact(2).map(|p| (p[0], p[1])).unzip();
    (
        PyArray1::from_owned_array(py, ndarray::Array1::from(xs)),
        PyArray1::from_owned_array(py, ndarray::Array1::from(ys)),
    )
}

/// Project longitude/latitude arrays (degrees) to Mercator easting/northing (metres).
///
/// Args:
///     lon: 1D array of longitudes.
///     lat: 1D array of latitudes.
///     method: "variant_a", "variant_b" or "pseudo".
///     central_meridian: Longitude of natural origin in degrees.
///     scale_factor: Scale factor at the equator (variant A).
///     standard_parallel: Latitude of the standard parallel (variant B).
///     false_easting: False easting in metres.
///     false_northing: False northing in metres.
///
/// Returns:
///     Tuple of (x, y) arrays. Latitudes of ±90° give infinite northings.
#[pyfunction]
#[pyo3(signature = (lon, lat, method="variant_a", central_meridian=0.0, scale_factor=1.0, standard_parallel=0.0, false_easting=0.0, false_northing=0.0))]
#[allow(clippy::too_many_arguments)]
pub fn mercator_forward<'py>(
    py: Python<'py>,
    lon: PyReadonlyArray1<'py, f64>,
    lat: PyReadonlyArray1<'py, f64>,
    method: &str,
    central_meridian: f64,
    scale_factor: f64,
    standard_parallel: f64,
    false_easting: f64,
    false_northing: f64,
) -> PyResult<CoordArrays<'py>> {
    let projection = build(
        method,
        central_meridian,
        scale_factor,
        standard_parallel,
        false_easting,
        false_northing,
    )?;
    let mut coords = interleave(&lon, &lat)?;

    let coords = py.allow_threads(move || -> PyResult<Vec<f64>> {
        projection
            .forward_batch(&mut coords)
            .map_err(|e| PyValueError::new_err(e.to_string()))?;
        Ok(coords)
    })?;

    Ok(split(py, &coords))
}

/// Convert Mercator easting/northing arrays (metres) back to longitude/latitude (degrees).
///
/// Takes the same projection parameters as `mercator_forward`.
#[pyfunction]
#[pyo3(signature = (x, y, method="variant_a", central_meridian=0.0, scale_factor=1.0, standard_parallel=0.0, false_easting=0.0, false_northing=0.0))]
#[allow(clippy::too_many_arguments)]
pub fn mercator_inverse<'py>(
    py: Python<'py>,
    x: PyReadonlyArray1<'py, f64>,
    y: PyReadonlyArray1<'py, f64>,
    method: &str,
    central_meridian: f64,
    scale_factor: f64,
    standard_parallel: f64,
    false_easting: f64,
    false_northing: f64,
) -> PyResult<CoordArrays<'py>> {
    let projection = build(
        method,
        central_meridian,
        scale_factor,
        standard_parallel,
        false_easting,
        false_northing,
    )?;
    let coords = interleave(&x, &y)?;

    let coords = py.allow_threads(move || -> PyResult<Vec<f64>> {
        let mut out = Vec::with_capacity(coords.len());
        for p in coords.chunks_exact(2) {
            let (lon, lat) = projection
                .inverse(p[0], p[1])
                .map_err(|e| PyValueError::new_err(e.to_string()))?;
            out.extend([lon, lat]);
        }
        Ok(out)
    })?;

    Ok(split(py, &coords))
}

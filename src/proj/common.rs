//! Common helpers for projection math (isometric latitude, scale factors, tolerances).

use std::f64::consts::{FRAC_PI_2, FRAC_PI_4};

use crate::error::ProjError;

/// Tolerance in radians around the poles within which a latitude is projected
/// to infinity instead of being rejected as NaN.
pub const ANGLE_TOLERANCE: f64 = 1e-10;

/// Convergence threshold in radians of the iterative latitude computation.
pub const ITERATION_TOLERANCE: f64 = 1e-10;

/// Maximum number of iterations of the iterative latitude computation.
pub const MAXIMUM_ITERATIONS: usize = 15;

/// Exponential of the isometric latitude, `exp(ψ)` (Snyder 7-7 before the logarithm):
///
/// ```text
///   tan(π/4 + φ/2) · ((1 − e·sinφ) / (1 + e·sinφ))^(e/2)
/// ```
///
/// `e_sin_phi` is `e·sin(φ)`, usually already computed by the caller.
#[inline]
pub fn exp_y(phi: f64, e_sin_phi: f64, e: f64) -> f64 {
    (FRAC_PI_4 + 0.5 * phi).tan() * ((1.0 - e_sin_phi) / (1.0 + e_sin_phi)).powf(0.5 * e)
}

/// Latitude from `ts = exp(−ψ)`, the inverse of [`exp_y`] (Snyder 7-9).
///
/// Iterates until two successive estimates differ by no more than
/// [`ITERATION_TOLERANCE`]. A `NaN` input gives `NaN`. `ts = 0` gives π/2 and
/// `ts = ∞` gives −π/2.
pub fn phi_from_ts(ts: f64, e: f64) -> Result<f64, ProjError> {
    let half_e = 0.5 * e;
    let mut phi = FRAC_PI_2 - 2.0 * ts.atan();
    for _ in 0..MAXIMUM_ITERATIONS {
        let e_sin_phi = e * phi.sin();
        let next =
            FRAC_PI_2 - 2.0 * (ts * ((1.0 - e_sin_phi) / (1.0 + e_sin_phi)).powf(half_e)).atan();
        let delta = next - phi;
        phi = next;
        if !(delta.abs() > ITERATION_TOLERANCE) {
            return Ok(phi);
        }
    }
    Err(ProjError::NoConvergence)
}

/// Radius of the parallel at latitude φ on an ellipsoid of semi-major axis 1,
/// `cos(φ) / sqrt(1 − e²·sin²(φ))` (Snyder 14-15).
#[inline]
pub fn msfn(phi: f64, e2: f64) -> f64 {
    let sin_phi = phi.sin();
    phi.cos() / (1.0 - e2 * sin_phi * sin_phi).sqrt()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::proj::ellipsoid::WGS84;
    use approx::assert_relative_eq;

    #[test]
    fn test_phi_from_ts_inverts_exp_y() {
        let e = WGS84.eccentricity();
        for deg in [-89.0, -60.0, -1.0, 0.5, 30.0, 45.0, 85.0] {
            let phi: f64 = f64::to_radians(deg);
            let ts = 1.0 / exp_y(phi, e * phi.sin(), e);
            assert_relative_eq!(phi_from_ts(ts, e).unwrap(), phi, epsilon = 1e-10);
        }
    }

    #[test]
    fn test_phi_from_ts_special_values() {
        let e = WGS84.eccentricity();
        assert_relative_eq!(phi_from_ts(0.0, e).unwrap(), FRAC_PI_2);
        assert_relative_eq!(phi_from_ts(f64::INFINITY, e).unwrap(), -FRAC_PI_2);
        assert!(phi_from_ts(f64::NAN, e).unwrap().is_nan());
    }

    #[test]
    fn test_exp_y_spherical() {
        let phi = 0.7;
        assert_relative_eq!(exp_y(phi, 0.0, 0.0), (FRAC_PI_4 + phi / 2.0).tan());
    }

    #[test]
    fn test_msfn() {
        assert_relative_eq!(msfn(0.0, WGS84.e2), 1.0);
        assert_relative_eq!(msfn(0.5, 0.0), 0.5f64.cos());
        assert!(msfn(0.5, WGS84.e2) > 0.5f64.cos());
    }
}

//! Unitary Mercator projection, ellipsoidal and spherical.
//!
//! Ellipsoidal (Snyder 7-7 and 7-9):
//!   forward: x = λ, y = ln(tan(π/4 + φ/2) · ((1 − e·sinφ)/(1 + e·sinφ))^(e/2))
//!   inverse: λ = x, φ = phi_from_ts(exp(−y), e)
//!
//! Spherical (Snyder 7-2 and 7-4):
//!   forward: x = λ, y = ln(tan(π/4 + φ/2))
//!   inverse: λ = x, φ = π/2 − 2·atan(exp(−y))
//!
//! Poles are checked explicitly: `tan(π/2)` is not infinite in floating point
//! since π/2 has no exact representation, so one pole would otherwise give a
//! large finite value (about 1E+16) instead of infinity.

use std::f64::consts::{FRAC_PI_2, FRAC_PI_4};

use tracing::{debug, trace};

use crate::error::ProjError;
use crate::matrix::Matrix2;
use crate::proj::common::{exp_y, phi_from_ts, ANGLE_TOLERANCE};
use crate::proj::ellipsoid::Ellipsoid;
use crate::proj::UnitaryProjection;
use crate::transform::{ensure_capacity, MathTransform};

/// Descriptor of the Mercator projection with a scale factor at the equator.
pub const MERCATOR_1SP: &str = "Mercator (variant A)";

/// Descriptor of the spherical Mercator applied to ellipsoidal coordinates (EPSG:3857).
pub const PSEUDO_MERCATOR: &str = "Popular Visualisation Pseudo Mercator";

/// Which set of formulas a [`Mercator`] uses.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MercatorKind {
    Ellipsoidal,
    /// Spherical formulas on a sphere.
    Spherical,
    /// Spherical formulas applied whatever the ellipsoid (Web Mercator).
    Pseudo,
}

/// Mercator projection on a unit ellipsoid.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Mercator {
    eccentricity: f64,
    eccentricity_squared: f64,
    kind: MercatorKind,
}

impl Mercator {
    /// Ellipsoidal formulas, valid for any ellipsoid including spheres.
    pub fn new(ellipsoid: &Ellipsoid) -> Self {
        Self::with_kind(ellipsoid.e2, MercatorKind::Ellipsoidal)
    }

    /// Spherical formulas. Fails unless the ellipsoid is a sphere.
    pub fn spherical(ellipsoid: &Ellipsoid) -> Result<Self, ProjError> {
        if !ellipsoid.is_sphere() {
            return Err(ProjError::InvalidParameter(format!(
                "spherical Mercator needs a sphere, got an ellipsoid with flattening {}",
                ellipsoid.f
            )));
        }
        Ok(Self::with_kind(0.0, MercatorKind::Spherical))
    }

    /// Spherical formulas whatever the datum ellipsoid, as used by Web Mercator.
    pub fn pseudo() -> Self {
        Self::with_kind(0.0, MercatorKind::Pseudo)
    }

    /// Spherical formulas if the ellipsoid is a sphere, ellipsoidal otherwise.
    pub fn create(ellipsoid: &Ellipsoid) -> Self {
        if ellipsoid.e2 == 0.0 {
            Self::with_kind(0.0, MercatorKind::Spherical)
        } else {
            Self::new(ellipsoid)
        }
    }

    fn with_kind(eccentricity_squared: f64, kind: MercatorKind) -> Self {
        let eccentricity = eccentricity_squared.sqrt();
        debug!("Created unitary Mercator projection: {kind:?}, eccentricity {eccentricity}");
        Self {
            eccentricity,
            eccentricity_squared,
            kind,
        }
    }

    pub fn kind(&self) -> MercatorKind {
        self.kind
    }

    fn is_spherical(&self) -> bool {
        self.kind != MercatorKind::Ellipsoidal
    }

    /// Projects a latitude. Zero is returned unchanged with its sign.
    #[inline]
    fn project_latitude(&self, phi: f64) -> f64 {
        let sin_phi = phi.sin();
        if sin_phi == 0.0 {
            return phi;
        }
        let abs_phi = phi.abs();
        if abs_phi < FRAC_PI_2 {
            if self.is_spherical() {
                (FRAC_PI_4 + 0.5 * phi).tan().ln()
            } else {
                exp_y(phi, self.eccentricity * sin_phi, self.eccentricity).ln()
            }
        } else if abs_phi <= FRAC_PI_2 + ANGLE_TOLERANCE {
            f64::INFINITY.copysign(phi)
        } else {
            f64::NAN
        }
    }

    #[inline]
    fn unproject_latitude(&self, y: f64) -> Result<f64, ProjError> {
        if self.is_spherical() {
            Ok(FRAC_PI_2 - 2.0 * (-y).exp().atan())
        } else {
            phi_from_ts((-y).exp(), self.eccentricity)
        }
    }

    fn derivative(&self, phi: f64) -> Matrix2 {
        let cos_phi = phi.cos();
        if self.is_spherical() {
            return Matrix2::new(1.0, 0.0, 0.0, 1.0 / cos_phi);
        }
        let sin_phi = phi.sin();
        let e_sin_phi = self.eccentricity * sin_phi;
        let t = (1.0 - sin_phi) / cos_phi;
        Matrix2::new(
            1.0,
            0.0,
            0.0,
            0.5 * (t + 1.0 / t)
                - self.eccentricity_squared * cos_phi / (1.0 - e_sin_phi * e_sin_phi),
        )
    }
}

impl UnitaryProjection for Mercator {
    fn transform(&self, point: [f64; 2], derivate: bool) -> ([f64; 2], Option<Matrix2>) {
        let [lambda, phi] = point;
        let y = self.project_latitude(phi);
        let derivative = derivate.then(|| self.derivative(phi));
        ([lambda, y], derivative)
    }

    fn inverse_transform(&self, point: [f64; 2]) -> Result<[f64; 2], ProjError> {
        let [x, y] = point;
        Ok([x, self.unproject_latitude(y)?])
    }

    fn descriptor_name(&self) -> &'static str {
        match self.kind {
            MercatorKind::Pseudo => PSEUDO_MERCATOR,
            _ => MERCATOR_1SP,
        }
    }

    fn eccentricity(&self) -> f64 {
        self.eccentricity
    }
}

impl MathTransform for Mercator {
    fn source_dimensions(&self) -> usize {
        2
    }

    fn target_dimensions(&self) -> usize {
        2
    }

    fn transform_array(
        &self,
        src: &[f64],
        dst: &mut [f64],
        num_pts: usize,
    ) -> Result<(), ProjError> {
        ensure_capacity(src.len(), 2 * num_pts)?;
        ensure_capacity(dst.len(), 2 * num_pts)?;
        trace!("Mercator forward on {num_pts} points");
        for (s, d) in src.chunks_exact(2).zip(dst.chunks_exact_mut(2)).take(num_pts) {
            d[0] = s[0];
            d[1] = self.project_latitude(s[1]);
        }
        Ok(())
    }

    /// When both offsets are equal only the latitudes are rewritten, since the
    /// longitudes are left unchanged by this projection.
    fn transform_within(
        &self,
        pts: &mut [f64],
        src_off: usize,
        dst_off: usize,
        num_pts: usize,
    ) -> Result<(), ProjError> {
        ensure_capacity(pts.len(), src_off.max(dst_off) + 2 * num_pts)?;
        if num_pts == 0 {
            return Ok(());
        }
        trace!("Mercator forward on {num_pts} points in place (offsets {src_off} → {dst_off})");
        if src_off == dst_off {
            for phi in pts[src_off + 1..].iter_mut().step_by(2).take(num_pts) {
                *phi = self.project_latitude(*phi);
            }
            return Ok(());
        }
        let mut step = |k: usize| {
            let (lambda, phi) = (pts[src_off + 2 * k], pts[src_off + 2 * k + 1]);
            pts[dst_off + 2 * k] = lambda;
            pts[dst_off + 2 * k + 1] = self.project_latitude(phi);
        };
        // Same rule as `slice::copy_within`: walk backward when writing ahead of the reads.
        if dst_off > src_off {
            (0..num_pts).rev().for_each(&mut step);
        } else {
            (0..num_pts).for_each(&mut step);
        }
        Ok(())
    }

    fn inverse(&self) -> Result<Box<dyn MathTransform>, ProjError> {
        Ok(Box::new(InverseMercator { forward: *self }))
    }

    fn boxed_clone(&self) -> Box<dyn MathTransform> {
        Box::new(*self)
    }
}

/// The inverse of a [`Mercator`] projection, from (x, y) to (λ, φ).
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct InverseMercator {
    forward: Mercator,
}

impl MathTransform for InverseMercator {
    fn source_dimensions(&self) -> usize {
        2
    }

    fn target_dimensions(&self) -> usize {
        2
    }

    fn transform_array(
        &self,
        src: &[f64],
        dst: &mut [f64],
        num_pts: usize,
    ) -> Result<(), ProjError> {
        ensure_capacity(src.len(), 2 * num_pts)?;
        ensure_capacity(dst.len(), 2 * num_pts)?;
        trace!("Mercator inverse on {num_pts} points");
        for (s, d) in src.chunks_exact(2).zip(dst.chunks_exact_mut(2)).take(num_pts) {
            let [lambda, phi] = self.forward.inverse_transform([s[0], s[1]])?;
            d[0] = lambda;
            d[1] = phi;
        }
        Ok(())
    }

    fn inverse(&self) -> Result<Box<dyn MathTransform>, ProjError> {
        Ok(Box::new(self.forward))
    }

    fn boxed_clone(&self) -> Box<dyn MathTransform> {
        Box::new(*self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::proj::ellipsoid::{WGS84, WGS84_SPHERE};
    use approx::assert_relative_eq;

    fn all_kinds() -> [Mercator; 3] {
        [
            Mercator::new(&WGS84),
            Mercator::spherical(&WGS84_SPHERE).unwrap(),
            Mercator::pseudo(),
        ]
    }

    #[test]
    fn test_equator_is_exact() {
        for proj in all_kinds() {
            let ([x, y], _) = proj.transform([0.3, 0.0], false);
            assert_eq!(x, 0.3);
            assert_eq!(y.to_bits(), 0.0f64.to_bits());
            let ([_, y], _) = proj.transform([0.3, -0.0], false);
            assert_eq!(y.to_bits(), (-0.0f64).to_bits());
        }
    }

    #[test]
    fn test_poles() {
        for proj in all_kinds() {
            assert_eq!(proj.transform([0.0, FRAC_PI_2], false).0[1], f64::INFINITY);
            assert_eq!(proj.transform([0.0, -FRAC_PI_2], false).0[1], f64::NEG_INFINITY);
            let near = FRAC_PI_2 + 0.5 * ANGLE_TOLERANCE;
            assert_eq!(proj.transform([0.0, near], false).0[1], f64::INFINITY);
            assert!(proj.transform([0.0, 2.0], false).0[1].is_nan());
            assert!(proj.transform([0.0, -2.0], false).0[1].is_nan());
        }
    }

    #[test]
    fn test_inverse_at_poles_and_nan() {
        for proj in all_kinds() {
            assert_relative_eq!(proj.inverse_transform([0.0, f64::INFINITY]).unwrap()[1], FRAC_PI_2);
            assert_relative_eq!(
                proj.inverse_transform([0.0, f64::NEG_INFINITY]).unwrap()[1],
                -FRAC_PI_2
            );
            assert!(proj.inverse_transform([0.0, f64::NAN]).unwrap()[1].is_nan());
        }
    }

    #[test]
    fn test_roundtrip() {
        let cases: &[(f64, f64)] = &[
            (0.0, 0.0),
            (10.0, 45.0),
            (-73.9857, 40.7484), // NYC
            (139.6917, 35.6895), // Tokyo
            (-180.0, -89.9),
            (180.0, 89.9),
        ];
        for proj in all_kinds() {
            for &(lon_deg, lat_deg) in cases {
                let src = [lon_deg.to_radians(), lat_deg.to_radians()];
                let (projected, _) = proj.transform(src, false);
                let back = proj.inverse_transform(projected).unwrap();
                assert_relative_eq!(back[0], src[0], epsilon = 1e-12);
                assert_relative_eq!(back[1], src[1], epsilon = 1e-10);
            }
        }
    }

    #[test]
    fn test_known_value() {
        // 45°N on a sphere: ln(tan(67.5°)) = asinh(1)
        let proj = Mercator::pseudo();
        let ([_, y], _) = proj.transform([0.0, FRAC_PI_4], false);
        assert_relative_eq!(y, 1.0f64.asinh(), epsilon = 1e-15);
        // The ellipsoid pulls the northing toward the equator.
        let ([_, ye], _) = Mercator::new(&WGS84).transform([0.0, FRAC_PI_4], false);
        assert!(ye < y);
        assert_relative_eq!(ye * WGS84.a, 5_591_295.92, epsilon = 0.01);
    }

    #[test]
    fn test_ellipsoidal_formulas_on_sphere_match_spherical() {
        let ellipsoidal = Mercator::new(&WGS84_SPHERE);
        let spherical = Mercator::create(&WGS84_SPHERE);
        assert_eq!(spherical.kind(), MercatorKind::Spherical);
        assert_eq!(ellipsoidal.kind(), MercatorKind::Ellipsoidal);
        for deg in [-80.0, -12.5, 3.0, 60.0] {
            let phi = f64::to_radians(deg);
            let (a, da) = ellipsoidal.transform([1.0, phi], true);
            let (b, db) = spherical.transform([1.0, phi], true);
            assert_relative_eq!(a[1], b[1], epsilon = 1e-14);
            let (da, db) = (da.unwrap(), db.unwrap());
            assert_relative_eq!(da.m11, db.m11, max_relative = 1e-12);
        }
    }

    #[test]
    fn test_derivative_matches_finite_difference() {
        let h = 1e-6;
        for proj in all_kinds() {
            for deg in [-70.0, -5.0, 20.0, 55.0] {
                let phi = f64::to_radians(deg);
                let (_, derivative) = proj.transform([0.2, phi], true);
                let derivative = derivative.unwrap();
                let y1 = proj.transform([0.2, phi - h], false).0[1];
                let y2 = proj.transform([0.2, phi + h], false).0[1];
                assert_eq!((derivative.m00, derivative.m01, derivative.m10), (1.0, 0.0, 0.0));
                assert_relative_eq!(derivative.m11, (y2 - y1) / (2.0 * h), max_relative = 1e-7);
            }
        }
        assert!(Mercator::pseudo().transform([0.0, 0.1], false).1.is_none());
    }

    #[test]
    fn test_spherical_rejects_ellipsoid() {
        assert!(matches!(
            Mercator::spherical(&WGS84),
            Err(ProjError::InvalidParameter(_))
        ));
        assert_eq!(Mercator::create(&WGS84).kind(), MercatorKind::Ellipsoidal);
    }

    #[test]
    fn test_descriptor_names() {
        assert_eq!(Mercator::new(&WGS84).descriptor_name(), "Mercator (variant A)");
        assert_eq!(
            Mercator::spherical(&WGS84_SPHERE).unwrap().descriptor_name(),
            "Mercator (variant A)"
        );
        assert_eq!(
            Mercator::pseudo().descriptor_name(),
            "Popular Visualisation Pseudo Mercator"
        );
        assert_eq!(Mercator::pseudo().eccentricity(), 0.0);
    }

    fn sample_points(n: usize) -> Vec<f64> {
        (0..n)
            .flat_map(|i| {
                let t = i as f64 / n as f64;
                [(t - 0.5) * 6.0, (t - 0.5) * 3.1]
            })
            .collect()
    }

    #[test]
    fn test_aliased_batch_matches_separate_buffers() {
        for proj in all_kinds() {
            let src = sample_points(1000);
            let mut expected = vec![0.0; src.len()];
            proj.transform_array(&src, &mut expected, 1000).unwrap();

            let mut pts = src.clone();
            proj.transform_within(&mut pts, 0, 0, 1000).unwrap();
            assert_eq!(pts, expected);
        }
    }

    #[test]
    fn test_overlapping_batch() {
        let proj = Mercator::new(&WGS84);
        let src = sample_points(100);
        let mut expected = vec![0.0; src.len()];
        proj.transform_array(&src, &mut expected, 100).unwrap();

        // Destination ahead of the source.
        let mut pts = src.clone();
        pts.extend([0.0; 6]);
        proj.transform_within(&mut pts, 0, 6, 100).unwrap();
        assert_eq!(&pts[6..], &expected[..]);

        // Destination behind the source.
        let mut pts = vec![0.0; 6];
        pts.extend(&src);
        proj.transform_within(&mut pts, 6, 0, 100).unwrap();
        assert_eq!(&pts[..200], &expected[..]);
    }

    #[test]
    fn test_inverse_transform_array() {
        let proj = Mercator::new(&WGS84);
        let src = sample_points(10);
        let mut projected = vec![0.0; 20];
        proj.transform_array(&src, &mut projected, 10).unwrap();
        let inverse = proj.inverse().unwrap();
        let mut back = vec![0.0; 20];
        inverse.transform_array(&projected, &mut back, 10).unwrap();
        for (a, b) in back.iter().zip(&src) {
            assert_relative_eq!(a, b, epsilon = 1e-10);
        }
        assert!(matches!(
            proj.transform_array(&src, &mut back[..4], 10),
            Err(ProjError::BufferTooSmall { required: 20, actual: 4 })
        ));
    }
}

//! Pipeline: full map projection built as normalize → unitary projection → denormalize.
//!
//! The normalization step converts (longitude, latitude) in degrees to radians
//! relative to the central meridian. The denormalization step applies the
//! semi-major axis, the scale factor and the false easting/northing. Both are
//! plain matrices, so they merge with any adjacent linear step (for example a
//! pixel-to-CRS geotransform) when the pipeline is concatenated.

use tracing::debug;

use crate::error::ProjError;
use crate::matrix::Matrix3;
use crate::proj::common::msfn;
use crate::proj::ellipsoid::{Ellipsoid, WGS84};
use crate::proj::mercator::Mercator;
use crate::proj::UnitaryProjection;
use crate::transform::{concatenate, MathTransform, ProjectiveTransform};

/// Operation methods of the Mercator family.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MercatorMethod {
    /// Scale factor given at the equator (EPSG:9804, "1SP").
    VariantA,
    /// Scale factor derived from a standard parallel (EPSG:9805, "2SP").
    VariantB,
    /// Spherical formulas on ellipsoidal coordinates (EPSG:1024, Web Mercator).
    PseudoMercator,
}

/// Parameters of a full Mercator projection. Angles are in degrees, distances in metres.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct MercatorParameters {
    pub ellipsoid: Ellipsoid,
    pub method: MercatorMethod,
    /// Longitude of natural origin.
    pub central_meridian: f64,
    /// Scale factor at the equator. Ignored by variant B.
    pub scale_factor: f64,
    /// Latitude of the first standard parallel. Used by variant B only.
    pub standard_parallel: f64,
    pub false_easting: f64,
    pub false_northing: f64,
}

impl Default for MercatorParameters {
    fn default() -> Self {
        Self {
            ellipsoid: WGS84,
            method: MercatorMethod::VariantA,
            central_meridian: 0.0,
            scale_factor: 1.0,
            standard_parallel: 0.0,
            false_easting: 0.0,
            false_northing: 0.0,
        }
    }
}

impl MercatorParameters {
    /// Web Mercator (EPSG:3857) parameters.
    pub fn pseudo_mercator() -> Self {
        Self {
            method: MercatorMethod::PseudoMercator,
            ..Self::default()
        }
    }

    /// Scale factor at the equator, derived from the standard parallel for variant B.
    pub fn equator_scale_factor(&self) -> Result<f64, ProjError> {
        let k0 = match self.method {
            MercatorMethod::VariantB => {
                if !(self.standard_parallel.abs() < 90.0) {
                    return Err(ProjError::InvalidParameter(format!(
                        "standard parallel {} is not in the (-90, 90) range",
                        self.standard_parallel
                    )));
                }
                msfn(self.standard_parallel.to_radians(), self.ellipsoid.e2)
            }
            MercatorMethod::VariantA | MercatorMethod::PseudoMercator => self.scale_factor,
        };
        if !(k0 > 0.0 && k0.is_finite()) {
            return Err(ProjError::InvalidParameter(format!(
                "scale factor must be strictly positive, got {k0}"
            )));
        }
        Ok(k0)
    }
}

/// A complete map projection from (longitude, latitude) in degrees to
/// (easting, northing) in metres.
pub struct MapProjection {
    kernel: Mercator,
    normalize: ProjectiveTransform,
    denormalize: ProjectiveTransform,
    chain: Box<dyn MathTransform>,
}

impl MapProjection {
    /// Creates a Mercator projection from the given parameters.
    pub fn mercator(params: &MercatorParameters) -> Result<Self, ProjError> {
        let ellipsoid = &params.ellipsoid;
        if !(ellipsoid.a > 0.0 && ellipsoid.a.is_finite()) {
            return Err(ProjError::InvalidParameter(format!(
                "semi-major axis must be strictly positive, got {}",
                ellipsoid.a
            )));
        }
        if !(0.0..1.0).contains(&ellipsoid.f) {
            return Err(ProjError::InvalidParameter(format!(
                "flattening must be in the [0, 1) range, got {}",
                ellipsoid.f
            )));
        }
        let k0 = params.equator_scale_factor()?;
        let kernel = match params.method {
            MercatorMethod::PseudoMercator => Mercator::pseudo(),
            MercatorMethod::VariantA | MercatorMethod::VariantB => Mercator::create(ellipsoid),
        };
        let to_radians = 1f64.to_radians();
        let normalize = ProjectiveTransform::new(Matrix3::new(
            to_radians,
            0.0,
            -params.central_meridian * to_radians,
            0.0,
            to_radians,
            0.0,
            0.0,
            0.0,
            1.0,
        ))?;
        let scale = ellipsoid.a * k0;
        let denormalize = ProjectiveTransform::new(Matrix3::new(
            scale,
            0.0,
            params.false_easting,
            0.0,
            scale,
            params.false_northing,
            0.0,
            0.0,
            1.0,
        ))?;
        let chain = concatenate(vec![
            normalize.boxed_clone(),
            kernel.boxed_clone(),
            denormalize.boxed_clone(),
        ])?;
        debug!(
            "Created {} with k0 = {k0}, central meridian {}°",
            kernel.descriptor_name(),
            params.central_meridian
        );
        Ok(Self {
            kernel,
            normalize,
            denormalize,
            chain,
        })
    }

    /// The non-linear step working on normalized coordinates.
    pub fn kernel(&self) -> &Mercator {
        &self.kernel
    }

    /// Degrees to radians, central meridian removal.
    pub fn normalize(&self) -> &ProjectiveTransform {
        &self.normalize
    }

    /// Scale and false origin, applied after the kernel.
    pub fn denormalize(&self) -> &ProjectiveTransform {
        &self.denormalize
    }

    /// Projects one point: (lon, lat) in degrees to (easting, northing) in metres.
    pub fn forward(&self, lon: f64, lat: f64) -> Result<(f64, f64), ProjError> {
        let mut point = [lon, lat];
        self.chain.transform_within(&mut point, 0, 0, 1)?;
        Ok((point[0], point[1]))
    }

    /// Converts (easting, northing) in metres back to (lon, lat) in degrees.
    pub fn inverse(&self, x: f64, y: f64) -> Result<(f64, f64), ProjError> {
        let (lambda, phi) = self.denormalize_inverse(x, y)?;
        let [lambda, phi] = self.kernel.inverse_transform([lambda, phi])?;
        let p = self
            .normalize
            .inverse_projective()?
            .transform_point(&[lambda, phi])?;
        Ok((p[0], p[1]))
    }

    fn denormalize_inverse(&self, x: f64, y: f64) -> Result<(f64, f64), ProjError> {
        let p = self
            .denormalize
            .inverse_projective()?
            .transform_point(&[x, y])?;
        Ok((p[0], p[1]))
    }

    /// Batch forward transform of interleaved (lon, lat) pairs, in place.
    ///
    /// Fails with [`ProjError::MismatchedDimension`] if the buffer holds an odd
    /// number of values.
    pub fn forward_batch(&self, coords: &mut [f64]) -> Result<(), ProjError> {
        if coords.len() % 2 != 0 {
            return Err(ProjError::MismatchedDimension {
                expected: 2,
                actual: coords.len(),
            });
        }
        self.chain.transform_within(coords, 0, 0, coords.len() / 2)
    }

    /// Prepends a linear step, typically the pixel-to-geographic geotransform of
    /// a raster, and returns the simplified chain. The step merges with the
    /// normalization.
    pub fn after(&self, linear: &ProjectiveTransform) -> Result<Box<dyn MathTransform>, ProjError> {
        let mut steps = vec![linear.boxed_clone()];
        steps.extend(self.steps());
        concatenate(steps)
    }

    /// Appends a linear step, for example a CRS-to-pixel geotransform, and
    /// returns the simplified chain. The step merges with the denormalization.
    pub fn then(&self, linear: &ProjectiveTransform) -> Result<Box<dyn MathTransform>, ProjError> {
        let mut steps = self.steps();
        steps.push(linear.boxed_clone());
        concatenate(steps)
    }

    fn steps(&self) -> Vec<Box<dyn MathTransform>> {
        vec![
            self.normalize.boxed_clone(),
            self.kernel.boxed_clone(),
            self.denormalize.boxed_clone(),
        ]
    }
}

impl Clone for MapProjection {
    fn clone(&self) -> Self {
        Self {
            kernel: self.kernel,
            normalize: self.normalize.clone(),
            denormalize: self.denormalize.clone(),
            chain: self.chain.boxed_clone(),
        }
    }
}

impl std::fmt::Debug for MapProjection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MapProjection")
            .field("kernel", &self.kernel)
            .field("normalize", &self.normalize)
            .field("denormalize", &self.denormalize)
            .finish()
    }
}

impl MathTransform for MapProjection {
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
        self.chain.transform_array(src, dst, num_pts)
    }

    fn transform_within(
        &self,
        pts: &mut [f64],
        src_off: usize,
        dst_off: usize,
        num_pts: usize,
    ) -> Result<(), ProjError> {
        self.chain.transform_within(pts, src_off, dst_off, num_pts)
    }

    fn inverse(&self) -> Result<Box<dyn MathTransform>, ProjError> {
        self.chain.inverse()
    }

    fn boxed_clone(&self) -> Box<dyn MathTransform> {
        Box::new(self.clone())
    }
}

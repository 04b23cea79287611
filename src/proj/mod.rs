//! Map projections.
//!
//! A projection is split in three steps: a linear normalization (degrees to
//! radians, central meridian removal), a unitary projection working on a
//! sphere or ellipsoid of semi-major axis 1, and a linear denormalization
//! (scale factor, semi-major axis, false easting and northing). Only the
//! middle step is non-linear; see [`pipeline::MapProjection`].

pub mod common;
pub mod ellipsoid;
pub mod mercator;
pub mod pipeline;

use crate::error::ProjError;
use crate::matrix::Matrix2;
use crate::transform::MathTransform;

/// A map projection on normalized coordinates: (λ, φ) in radians to (x, y)
/// on a unit sphere or ellipsoid.
pub trait UnitaryProjection: MathTransform {
    /// Projects a single (λ, φ) point. Also computes the Jacobian at that point
    /// when `derivate` is `true`.
    ///
    /// Latitudes outside the projection domain give `NaN` or infinite
    /// ordinates rather than an error.
    fn transform(&self, point: [f64; 2], derivate: bool) -> ([f64; 2], Option<Matrix2>);

    /// Converts a projected (x, y) point back to (λ, φ).
    fn inverse_transform(&self, point: [f64; 2]) -> Result<[f64; 2], ProjError>;

    /// Name of the parameter descriptor of this projection.
    fn descriptor_name(&self) -> &'static str;

    /// Eccentricity of the ellipsoid, zero for the spherical formulas.
    fn eccentricity(&self) -> f64;
}

//! Coordinate transforms operating on flat arrays of ordinates.
//!
//! Points are stored one after the other, ordinate index varying fastest:
//! `[x0, y0, x1, y1, …]` for two-dimensional points.

pub mod concatenated;
pub mod projective;

use crate::error::ProjError;
use crate::matrix::{AnyMatrix, Matrix};

pub use concatenated::{concatenate, ConcatenatedTransform};
pub use projective::ProjectiveTransform;

/// A transform from `source_dimensions()`-dimensional points to
/// `target_dimensions()`-dimensional points.
pub trait MathTransform: Send + Sync {
    fn source_dimensions(&self) -> usize;

    fn target_dimensions(&self) -> usize;

    /// `true` if this transform leaves every point unchanged.
    fn is_identity(&self) -> bool {
        false
    }

    /// Transforms `num_pts` points read from `src` and writes them in `dst`.
    fn transform_array(&self, src: &[f64], dst: &mut [f64], num_pts: usize)
        -> Result<(), ProjError>;

    /// Transforms `num_pts` points within the same buffer, reading at `src_off`
    /// and writing at `dst_off`. The two regions may overlap.
    ///
    /// The default implementation copies the source region first.
    fn transform_within(
        &self,
        pts: &mut [f64],
        src_off: usize,
        dst_off: usize,
        num_pts: usize,
    ) -> Result<(), ProjError> {
        let src_len = num_pts * self.source_dimensions();
        let dst_len = num_pts * self.target_dimensions();
        ensure_capacity(pts.len(), src_off + src_len)?;
        ensure_capacity(pts.len(), dst_off + dst_len)?;
        let src = pts[src_off..src_off + src_len].to_vec();
        self.transform_array(&src, &mut pts[dst_off..dst_off + dst_len], num_pts)
    }

    /// Transforms a single point.
    fn transform_point(&self, point: &[f64]) -> Result<Vec<f64>, ProjError> {
        ensure_dimension(self.source_dimensions(), point.len())?;
        let mut result = vec![0.0; self.target_dimensions()];
        self.transform_array(point, &mut result, 1)?;
        Ok(result)
    }

    /// The transform going the other way.
    fn inverse(&self) -> Result<Box<dyn MathTransform>, ProjError>;

    /// This transform as a linear one, if it is backed by a matrix.
    fn as_linear(&self) -> Option<&dyn LinearTransform> {
        None
    }

    /// Clones this transform behind a new box.
    fn boxed_clone(&self) -> Box<dyn MathTransform>;
}

/// A transform representable by a single matrix acting on homogeneous coordinates.
///
/// Transforming a point is equivalent to multiplying [`LinearTransform::matrix`]
/// by the column vector of its ordinates extended with a trailing 1.
pub trait LinearTransform: MathTransform {
    /// The matrix of size `(target_dimensions + 1) × (source_dimensions + 1)`.
    fn matrix(&self) -> &AnyMatrix;

    /// `true` if the matrix has no perspective component.
    fn is_affine(&self) -> bool {
        self.matrix().is_affine()
    }
}

impl std::fmt::Debug for dyn MathTransform {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.as_linear() {
            Some(linear) => write!(
                f,
                "LinearTransform({}×{})",
                linear.matrix().num_row(),
                linear.matrix().num_col()
            ),
            None => write!(
                f,
                "MathTransform({} → {})",
                self.source_dimensions(),
                self.target_dimensions()
            ),
        }
    }
}

/// Fails unless a buffer of length `actual` can hold `required` values.
pub(crate) fn ensure_capacity(actual: usize, required: usize) -> Result<(), ProjError> {
    if actual < required {
        return Err(ProjError::BufferTooSmall { required, actual });
    }
    Ok(())
}

/// Fails unless a point has the expected number of ordinates.
pub(crate) fn ensure_dimension(expected: usize, actual: usize) -> Result<(), ProjError> {
    if expected != actual {
        return Err(ProjError::MismatchedDimension { expected, actual });
    }
    Ok(())
}

use crate::error::{MatrixError, ProjError};
use crate::matrix::{matrices, AnyMatrix, Matrix, Matrix3};
use crate::transform::{ensure_capacity, LinearTransform, MathTransform};

/// A linear transform backed by an arbitrary matrix.
///
/// A matrix of size `(m + 1) × (n + 1)` maps `n`-dimensional points to
/// `m`-dimensional ones:
///
/// ```text
///   x' = (m00·x + m01·y + m02) / w
///   y' = (m10·x + m11·y + m12) / w
///   w  =  m20·x + m21·y + m22
/// ```
///
/// When the matrix is affine, `w` is always 1 and the division is skipped.
#[derive(Clone, Debug, PartialEq)]
pub struct ProjectiveTransform {
    matrix: AnyMatrix,
}

impl ProjectiveTransform {
    /// Wraps any matrix with at least one row and one column.
    pub fn new<M: Matrix>(matrix: M) -> Result<Self, ProjError> {
        let matrix = matrix.into_any_matrix();
        if matrix.num_row() == 0 || matrix.num_col() == 0 {
            return Err(MatrixError::IllegalArgument(
                "a transform matrix needs at least one row and one column".into(),
            )
            .into());
        }
        Ok(Self { matrix })
    }

    /// The identity transform in the given number of dimensions.
    pub fn identity(dimension: usize) -> Self {
        Self {
            matrix: matrices::create_identity(dimension + 1),
        }
    }

    /// Creates a 2-D affine transform from a GDAL-style geotransform array
    /// `[c, a, b, f, d, e]`, mapping pixel coordinates (col, row) to (x, y):
    ///
    /// ```text
    ///   x = a·col + b·row + c
    ///   y = d·col + e·row + f
    /// ```
    pub fn from_gdal(gt: &[f64; 6]) -> Self {
        Self {
            matrix: AnyMatrix::Size3(Matrix3::new(
                gt[1], gt[2], gt[0], gt[4], gt[5], gt[3], 0.0, 0.0, 1.0,
            )),
        }
    }

    /// Converts back to a GDAL-style geotransform array, or `None` if this is
    /// not a 2-D affine transform.
    pub fn to_gdal(&self) -> Option<[f64; 6]> {
        match &self.matrix {
            AnyMatrix::Size3(m) if m.is_affine() => Some([m.m02, m.m00, m.m01, m.m12, m.m10, m.m11]),
            _ => None,
        }
    }

    /// The transform applying `self`, then `other`.
    pub fn then(&self, other: &ProjectiveTransform) -> Result<ProjectiveTransform, ProjError> {
        let product = other.matrix.multiply(&self.matrix)?;
        Ok(Self { matrix: product })
    }

    /// The inverse transform, with the same concrete type.
    pub fn inverse_projective(&self) -> Result<ProjectiveTransform, ProjError> {
        Ok(Self {
            matrix: self.matrix.inverse()?,
        })
    }
}

impl MathTransform for ProjectiveTransform {
    fn source_dimensions(&self) -> usize {
        self.matrix.num_col() - 1
    }

    fn target_dimensions(&self) -> usize {
        self.matrix.num_row() - 1
    }

    fn is_identity(&self) -> bool {
        self.matrix.is_identity()
    }

    fn transform_array(
        &self,
        src: &[f64],
        dst: &mut [f64],
        num_pts: usize,
    ) -> Result<(), ProjError> {
        let src_dim = self.source_dimensions();
        let dst_dim = self.target_dimensions();
        ensure_capacity(src.len(), num_pts * src_dim)?;
        ensure_capacity(dst.len(), num_pts * dst_dim)?;

        let num_col = src_dim + 1;
        let m = self.matrix.elements();
        let affine = self.matrix.is_affine();
        let row_product = |j: usize, point: &[f64]| -> f64 {
            let row = &m[j * num_col..(j + 1) * num_col];
            point.iter().zip(row).map(|(p, c)| p * c).sum::<f64>() + row[src_dim]
        };
        for p in 0..num_pts {
            let point = &src[p * src_dim..(p + 1) * src_dim];
            let out = &mut dst[p * dst_dim..(p + 1) * dst_dim];
            let w = if affine { 1.0 } else { row_product(dst_dim, point) };
            for (j, value) in out.iter_mut().enumerate() {
                *value = if affine {
                    row_product(j, point)
                } else {
                    row_product(j, point) / w
                };
            }
        }
        Ok(())
    }

    fn inverse(&self) -> Result<Box<dyn MathTransform>, ProjError> {
        Ok(Box::new(self.inverse_projective()?))
    }

    fn as_linear(&self) -> Option<&dyn LinearTransform> {
        Some(self)
    }

    fn boxed_clone(&self) -> Box<dyn MathTransform> {
        Box::new(self.clone())
    }
}

impl LinearTransform for ProjectiveTransform {
    fn matrix(&self) -> &AnyMatrix {
        &self.matrix
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn geotransform() -> ProjectiveTransform {
        // 10 m resolution, top-left at (500000, 6000000), north-up
        ProjectiveTransform::from_gdal(&[500000.0, 10.0, 0.0, 6000000.0, 0.0, -10.0])
    }

    #[test]
    fn test_forward_with_offset_and_scale() {
        let tr = geotransform();
        assert!(tr.is_affine());
        let p = tr.transform_point(&[0.0, 0.0]).unwrap();
        assert_relative_eq!(p[0], 500000.0);
        assert_relative_eq!(p[1], 6000000.0);

        let p = tr.transform_point(&[100.0, 100.0]).unwrap();
        assert_relative_eq!(p[0], 501000.0);
        assert_relative_eq!(p[1], 5999000.0);
    }

    #[test]
    fn test_inverse_roundtrip() {
        let inv = geotransform().inverse().unwrap();
        let p = inv.transform_point(&[501000.0, 5999000.0]).unwrap();
        assert_relative_eq!(p[0], 100.0, epsilon = 1e-10);
        assert_relative_eq!(p[1], 100.0, epsilon = 1e-10);
    }

    #[test]
    fn test_inverse_fine_grid_far_from_origin() {
        let tr = ProjectiveTransform::from_gdal(&[2.0e6, 1e-3, 0.0, 7.5e6, 0.0, -1e-3]);
        let inv = tr.inverse().unwrap();
        let p = inv.transform_point(&[2.0e6 + 0.25, 7.5e6 - 0.5]).unwrap();
        assert_relative_eq!(p[0], 250.0, epsilon = 1e-3);
        assert_relative_eq!(p[1], 500.0, epsilon = 1e-3);
    }

    #[test]
    fn test_singular() {
        let tr = ProjectiveTransform::from_gdal(&[0.0; 6]);
        assert_eq!(
            tr.inverse_projective(),
            Err(ProjError::Matrix(MatrixError::NonInvertible))
        );
    }

    #[test]
    fn test_gdal_roundtrip() {
        let gt = [500000.0, 10.0, 0.5, 6000000.0, -0.25, -10.0];
        assert_eq!(ProjectiveTransform::from_gdal(&gt).to_gdal(), Some(gt));
        assert_eq!(ProjectiveTransform::identity(3).to_gdal(), None);
    }

    #[test]
    fn test_perspective_division() {
        let m = matrices::create(3, 3, &[1.0, 0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 1.0, 1.0]).unwrap();
        let tr = ProjectiveTransform::new(m).unwrap();
        assert!(!tr.is_affine());
        let p = tr.transform_point(&[6.0, 2.0]).unwrap();
        assert_relative_eq!(p[0], 2.0);
        assert_relative_eq!(p[1], 2.0 / 3.0);
    }

    #[test]
    fn test_dimension_change() {
        // (x, y, z) → (y, x)
        let m = matrices::create_dimension_select(3, &[1, 0]).unwrap();
        let tr = ProjectiveTransform::new(m).unwrap();
        assert_eq!((tr.source_dimensions(), tr.target_dimensions()), (3, 2));
        let mut dst = [0.0; 4];
        tr.transform_array(&[1.0, 2.0, 3.0, 4.0, 5.0, 6.0], &mut dst, 2)
            .unwrap();
        assert_eq!(dst, [2.0, 1.0, 5.0, 4.0]);
        assert!(matches!(
            tr.transform_array(&[1.0, 2.0], &mut dst, 1),
            Err(ProjError::BufferTooSmall { required: 3, actual: 2 })
        ));
    }

    #[test]
    fn test_transform_within_overlapping() {
        let tr = geotransform();
        let mut pts = [0.0, 0.0, 1.0, 1.0, 2.0, 2.0, 0.0, 0.0];
        tr.transform_within(&mut pts, 0, 2, 3).unwrap();
        assert_eq!(
            pts[2..],
            [500000.0, 6000000.0, 500010.0, 5999990.0, 500020.0, 5999980.0]
        );
    }

    #[test]
    fn test_then() {
        let scale = ProjectiveTransform::new(matrices::create(
            3,
            3,
            &[2.0, 0.0, 0.0, 0.0, 2.0, 0.0, 0.0, 0.0, 1.0],
        )
        .unwrap())
        .unwrap();
        let combined = scale.then(&geotransform()).unwrap();
        let p = combined.transform_point(&[50.0, 50.0]).unwrap();
        assert_relative_eq!(p[0], 501000.0);
        assert_relative_eq!(p[1], 5999000.0);
    }

    #[test]
    fn test_empty_matrix_rejected() {
        assert!(ProjectiveTransform::new(matrices::create_zero(0, 3)).is_err());
    }
}

//! A 3×3 matrix, the common case of a two-dimensional affine transform.

use std::any::Any;
use std::hash::{Hash, Hasher};

use crate::error::MatrixError;
use crate::matrix::{determinant_scale, ensure_length_match, index_out_of_bounds};
use crate::matrix::{AnyMatrix, Matrix};
use crate::numerics::{bits_equal, is_negligible};

/// A matrix of fixed 3×3 size.
///
/// ```text
/// ┌             ┐
/// │ m00 m01 m02 │
/// │ m10 m11 m12 │
/// │ m20 m21 m22 │
/// └             ┘
/// ```
#[derive(Clone, Copy, Debug)]
pub struct Matrix3 {
    pub m00: f64,
    pub m01: f64,
    pub m02: f64,
    pub m10: f64,
    pub m11: f64,
    pub m12: f64,
    pub m20: f64,
    pub m21: f64,
    pub m22: f64,
}

impl Matrix3 {
    pub const SIZE: usize = 3;

    #[allow(clippy::too_many_arguments)]
    pub fn new(
        m00: f64,
        m01: f64,
        m02: f64,
        m10: f64,
        m11: f64,
        m12: f64,
        m20: f64,
        m21: f64,
        m22: f64,
    ) -> Self {
        Self {
            m00,
            m01,
            m02,
            m10,
            m11,
            m12,
            m20,
            m21,
            m22,
        }
    }

    pub fn identity() -> Self {
        Self::new(1.0, 0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0, 1.0)
    }

    pub fn zeros() -> Self {
        Self::new(0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0)
    }

    /// Creates a matrix from a flat row-major array of length 9.
    pub fn from_elements(elements: &[f64]) -> Result<Self, MatrixError> {
        let mut m = Self::zeros();
        m.set_elements(elements)?;
        Ok(m)
    }

    pub fn set_elements(&mut self, elements: &[f64]) -> Result<(), MatrixError> {
        ensure_length_match(Self::SIZE * Self::SIZE, elements)?;
        self.m00 = elements[0];
        self.m01 = elements[1];
        self.m02 = elements[2];
        self.m10 = elements[3];
        self.m11 = elements[4];
        self.m12 = elements[5];
        self.m20 = elements[6];
        self.m21 = elements[7];
        self.m22 = elements[8];
        Ok(())
    }

    pub fn is_affine(&self) -> bool {
        self.m20 == 0.0 && self.m21 == 0.0 && self.m22 == 1.0
    }

    pub fn is_identity(&self) -> bool {
        self.m00 == 1.0
            && self.m01 == 0.0
            && self.m02 == 0.0
            && self.m10 == 0.0
            && self.m11 == 1.0
            && self.m12 == 0.0
            && self.is_affine()
    }

    pub fn transpose(&mut self) {
        std::mem::swap(&mut self.m01, &mut self.m10);
        std::mem::swap(&mut self.m02, &mut self.m20);
        std::mem::swap(&mut self.m12, &mut self.m21);
    }

    pub fn normalize_columns(&mut self) {
        let n0 = (self.m00 * self.m00 + self.m10 * self.m10 + self.m20 * self.m20).sqrt();
        let n1 = (self.m01 * self.m01 + self.m11 * self.m11 + self.m21 * self.m21).sqrt();
        let n2 = (self.m02 * self.m02 + self.m12 * self.m12 + self.m22 * self.m22).sqrt();
        self.m00 /= n0;
        self.m10 /= n0;
        self.m20 /= n0;
        self.m01 /= n1;
        self.m11 /= n1;
        self.m21 /= n1;
        self.m02 /= n2;
        self.m12 /= n2;
        self.m22 /= n2;
    }

    pub fn determinant(&self) -> f64 {
        self.m00 * (self.m11 * self.m22 - self.m12 * self.m21)
            - self.m01 * (self.m10 * self.m22 - self.m12 * self.m20)
            + self.m02 * (self.m10 * self.m21 - self.m11 * self.m20)
    }

    /// Inverse by the adjugate (transposed cofactor) matrix.
    pub fn inverse(&self) -> Result<Matrix3, MatrixError> {
        let c00 = self.m11 * self.m22 - self.m12 * self.m21;
        let c01 = self.m12 * self.m20 - self.m10 * self.m22;
        let c02 = self.m10 * self.m21 - self.m11 * self.m20;
        let det = self.m00 * c00 + self.m01 * c01 + self.m02 * c02;
        if is_negligible(det, determinant_scale(Self::SIZE, &self.elements())) {
            return Err(MatrixError::NonInvertible);
        }
        Ok(Matrix3::new(
            c00 / det,
            (self.m02 * self.m21 - self.m01 * self.m22) / det,
            (self.m01 * self.m12 - self.m02 * self.m11) / det,
            c01 / det,
            (self.m00 * self.m22 - self.m02 * self.m20) / det,
            (self.m02 * self.m10 - self.m00 * self.m12) / det,
            c02 / det,
            (self.m01 * self.m20 - self.m00 * self.m21) / det,
            (self.m00 * self.m11 - self.m01 * self.m10) / det,
        ))
    }

    pub fn multiply(&self, b: &Matrix3) -> Matrix3 {
        Matrix3::new(
            self.m00 * b.m00 + self.m01 * b.m10 + self.m02 * b.m20,
            self.m00 * b.m01 + self.m01 * b.m11 + self.m02 * b.m21,
            self.m00 * b.m02 + self.m01 * b.m12 + self.m02 * b.m22,
            self.m10 * b.m00 + self.m11 * b.m10 + self.m12 * b.m20,
            self.m10 * b.m01 + self.m11 * b.m11 + self.m12 * b.m21,
            self.m10 * b.m02 + self.m11 * b.m12 + self.m12 * b.m22,
            self.m20 * b.m00 + self.m21 * b.m10 + self.m22 * b.m20,
            self.m20 * b.m01 + self.m21 * b.m11 + self.m22 * b.m21,
            self.m20 * b.m02 + self.m21 * b.m12 + self.m22 * b.m22,
        )
    }
}

impl Default for Matrix3 {
    fn default() -> Self {
        Self::identity()
    }
}

impl Matrix for Matrix3 {
    fn num_row(&self) -> usize {
        Self::SIZE
    }

    fn num_col(&self) -> usize {
        Self::SIZE
    }

    fn get_element(&self, row: usize, column: usize) -> Result<f64, MatrixError> {
        match (row, column) {
            (0, 0) => Ok(self.m00),
            (0, 1) => Ok(self.m01),
            (0, 2) => Ok(self.m02),
            (1, 0) => Ok(self.m10),
            (1, 1) => Ok(self.m11),
            (1, 2) => Ok(self.m12),
            (2, 0) => Ok(self.m20),
            (2, 1) => Ok(self.m21),
            (2, 2) => Ok(self.m22),
            _ => Err(index_out_of_bounds(row, column, Self::SIZE, Self::SIZE)),
        }
    }

    fn set_element(&mut self, row: usize, column: usize, value: f64) -> Result<(), MatrixError> {
        match (row, column) {
            (0, 0) => self.m00 = value,
            (0, 1) => self.m01 = value,
            (0, 2) => self.m02 = value,
            (1, 0) => self.m10 = value,
            (1, 1) => self.m11 = value,
            (1, 2) => self.m12 = value,
            (2, 0) => self.m20 = value,
            (2, 1) => self.m21 = value,
            (2, 2) => self.m22 = value,
            _ => return Err(index_out_of_bounds(row, column, Self::SIZE, Self::SIZE)),
        }
        Ok(())
    }

    fn elements(&self) -> Vec<f64> {
        vec![
            self.m00, self.m01, self.m02, self.m10, self.m11, self.m12, self.m20, self.m21,
            self.m22,
        ]
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn into_any_matrix(self) -> AnyMatrix {
        AnyMatrix::Size3(self)
    }
}

impl PartialEq for Matrix3 {
    fn eq(&self, other: &Self) -> bool {
        self.elements()
            .iter()
            .zip(other.elements().iter())
            .all(|(&a, &b)| bits_equal(a, b))
    }
}

impl Eq for Matrix3 {}

impl Hash for Matrix3 {
    fn hash<H: Hasher>(&self, state: &mut H) {
        for e in self.elements() {
            e.to_bits().hash(state);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_inverse_affine() {
        // 10 m pixels, origin at (500000, 6000000), north-up
        let m = Matrix3::new(10.0, 0.0, 500000.0, 0.0, -10.0, 6000000.0, 0.0, 0.0, 1.0);
        let inv = m.inverse().unwrap();
        assert!(inv.is_affine());
        assert_relative_eq!(inv.m00, 0.1, epsilon = 1e-15);
        assert_relative_eq!(inv.m02, -50000.0, epsilon = 1e-9);
        assert_relative_eq!(inv.m12, 600000.0, epsilon = 1e-9);
        let product = m.multiply(&inv);
        assert!(product
            .elements()
            .iter()
            .zip(Matrix3::identity().elements())
            .all(|(a, b)| (a - b).abs() < 1e-9));
    }

    #[test]
    fn test_inverse_geotransform_with_large_origin() {
        // Pixel sizes from 1 down to 1e-5 with an origin far from zero.
        for pixel in [1.0, 1e-3, 1e-5] {
            let m = Matrix3::new(pixel, 0.0, 2.0e6, 0.0, -pixel, 7.5e6, 0.0, 0.0, 1.0);
            let inv = m.inverse().unwrap();
            assert_relative_eq!(inv.m00, 1.0 / pixel, max_relative = 1e-12);
            assert_relative_eq!(inv.m11, -1.0 / pixel, max_relative = 1e-12);
            assert_relative_eq!(inv.m02, -2.0e6 / pixel, max_relative = 1e-12);
            assert_relative_eq!(inv.m12, 7.5e6 / pixel, max_relative = 1e-12);
            assert_relative_eq!(inv.inverse().unwrap().m02, 2.0e6, max_relative = 1e-12);
        }
    }

    #[test]
    fn test_singular_with_large_coefficients() {
        // Second column is twice the first.
        let m = Matrix3::new(1e6, 2e6, 5.0, 3e6, 6e6, 7.0, 0.0, 0.0, 1.0);
        assert_eq!(m.inverse(), Err(MatrixError::NonInvertible));
    }

    #[test]
    fn test_singular() {
        let m = Matrix3::new(1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0, 8.0, 9.0);
        assert_eq!(m.inverse(), Err(MatrixError::NonInvertible));
    }

    #[test]
    fn test_determinant() {
        let m = Matrix3::new(2.0, 0.0, 1.0, 1.0, 3.0, 2.0, 1.0, 1.0, 2.0);
        assert_relative_eq!(m.determinant(), 6.0, epsilon = 1e-15);
        assert_relative_eq!(m.determinant() * m.inverse().unwrap().determinant(), 1.0, epsilon = 1e-12);
    }

    #[test]
    fn test_element_access() {
        let mut m = Matrix3::zeros();
        m.set_element(2, 1, 7.0).unwrap();
        assert_eq!(m.m21, 7.0);
        assert!(m.set_element(3, 0, 1.0).is_err());
        assert!(m.get_element(0, 3).is_err());
    }
}

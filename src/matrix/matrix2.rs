//! A 2×2 matrix, typically the derivative of a two-dimensional map projection.

use std::any::Any;
use std::hash::{Hash, Hasher};

use crate::error::MatrixError;
use crate::matrix::{determinant_scale, ensure_length_match, index_out_of_bounds};
use crate::matrix::{AnyMatrix, Matrix};
use crate::numerics::{bits_equal, is_negligible};

/// A matrix of fixed 2×2 size.
///
/// ```text
/// ┌         ┐
/// │ m00 m01 │
/// │ m10 m11 │
/// └         ┘
/// ```
#[derive(Clone, Copy, Debug)]
pub struct Matrix2 {
    pub m00: f64,
    pub m01: f64,
    pub m10: f64,
    pub m11: f64,
}

impl Matrix2 {
    pub const SIZE: usize = 2;

    pub fn new(m00: f64, m01: f64, m10: f64, m11: f64) -> Self {
        Self { m00, m01, m10, m11 }
    }

    pub fn identity() -> Self {
        Self::new(1.0, 0.0, 0.0, 1.0)
    }

    pub fn zeros() -> Self {
        Self::new(0.0, 0.0, 0.0, 0.0)
    }

    /// Creates a matrix from a flat row-major array of length 4.
    pub fn from_elements(elements: &[f64]) -> Result<Self, MatrixError> {
        let mut m = Self::zeros();
        m.set_elements(elements)?;
        Ok(m)
    }

    pub fn set_elements(&mut self, elements: &[f64]) -> Result<(), MatrixError> {
        ensure_length_match(Self::SIZE * Self::SIZE, elements)?;
        self.m00 = elements[0];
        self.m01 = elements[1];
        self.m10 = elements[2];
        self.m11 = elements[3];
        Ok(())
    }

    pub fn is_affine(&self) -> bool {
        self.m10 == 0.0 && self.m11 == 1.0
    }

    pub fn is_identity(&self) -> bool {
        self.m00 == 1.0 && self.m01 == 0.0 && self.m10 == 0.0 && self.m11 == 1.0
    }

    pub fn transpose(&mut self) {
        std::mem::swap(&mut self.m01, &mut self.m10);
    }

    pub fn normalize_columns(&mut self) {
        let n0 = self.m00.hypot(self.m10);
        let n1 = self.m01.hypot(self.m11);
        self.m00 /= n0;
        self.m10 /= n0;
        self.m01 /= n1;
        self.m11 /= n1;
    }

    pub fn determinant(&self) -> f64 {
        self.m00 * self.m11 - self.m01 * self.m10
    }

    pub fn inverse(&self) -> Result<Matrix2, MatrixError> {
        let det = self.determinant();
        if is_negligible(det, determinant_scale(Self::SIZE, &self.elements())) {
            return Err(MatrixError::NonInvertible);
        }
        Ok(Matrix2::new(
            self.m11 / det,
            -self.m01 / det,
            -self.m10 / det,
            self.m00 / det,
        ))
    }

    pub fn multiply(&self, b: &Matrix2) -> Matrix2 {
        Matrix2::new(
            self.m00 * b.m00 + self.m01 * b.m10,
            self.m00 * b.m01 + self.m01 * b.m11,
            self.m10 * b.m00 + self.m11 * b.m10,
            self.m10 * b.m01 + self.m11 * b.m11,
        )
    }
}

impl Default for Matrix2 {
    fn default() -> Self {
        Self::identity()
    }
}

impl Matrix for Matrix2 {
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
            (1, 0) => Ok(self.m10),
            (1, 1) => Ok(self.m11),
            _ => Err(index_out_of_bounds(row, column, Self::SIZE, Self::SIZE)),
        }
    }

    fn set_element(&mut self, row: usize, column: usize, value: f64) -> Result<(), MatrixError> {
        match (row, column) {
            (0, 0) => self.m00 = value,
            (0, 1) => self.m01 = value,
            (1, 0) => self.m10 = value,
            (1, 1) => self.m11 = value,
            _ => return Err(index_out_of_bounds(row, column, Self::SIZE, Self::SIZE)),
        }
        Ok(())
    }

    fn elements(&self) -> Vec<f64> {
        vec![self.m00, self.m01, self.m10, self.m11]
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn into_any_matrix(self) -> AnyMatrix {
        AnyMatrix::Size2(self)
    }
}

impl PartialEq for Matrix2 {
    fn eq(&self, other: &Self) -> bool {
        bits_equal(self.m00, other.m00)
            && bits_equal(self.m01, other.m01)
            && bits_equal(self.m10, other.m10)
            && bits_equal(self.m11, other.m11)
    }
}

impl Eq for Matrix2 {}

impl Hash for Matrix2 {
    fn hash<H: Hasher>(&self, state: &mut H) {
        for e in [self.m00, self.m01, self.m10, self.m11] {
            e.to_bits().hash(state);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_element_order_is_row_major() {
        let m = Matrix2::from_elements(&[1.0, 2.0, 3.0, 4.0]).unwrap();
        assert_eq!(m.get_element(0, 1), Ok(2.0));
        assert_eq!(m.get_element(1, 0), Ok(3.0));
        assert_eq!(m.elements(), vec![1.0, 2.0, 3.0, 4.0]);
        assert!(m.get_element(2, 1).is_err());
    }

    #[test]
    fn test_inverse() {
        let m = Matrix2::new(4.0, 7.0, 2.0, 6.0);
        let inv = m.inverse().unwrap();
        let product = m.multiply(&inv);
        assert_relative_eq!(product.m00, 1.0, epsilon = 1e-12);
        assert_relative_eq!(product.m01, 0.0, epsilon = 1e-12);
        assert_relative_eq!(product.m10, 0.0, epsilon = 1e-12);
        assert_relative_eq!(product.m11, 1.0, epsilon = 1e-12);
    }

    #[test]
    fn test_inverse_small_scale_is_not_singular() {
        let m = Matrix2::new(1e-9, 0.0, 0.0, 1e-9);
        let inv = m.inverse().unwrap();
        assert_relative_eq!(inv.m00, 1e9, max_relative = 1e-12);
    }

    #[test]
    fn test_inverse_unbalanced_columns() {
        let m = Matrix2::new(1e-5, 1e6, 0.0, 1.0);
        let inv = m.inverse().unwrap();
        assert_relative_eq!(inv.m00, 1e5, max_relative = 1e-12);
        assert_relative_eq!(inv.m01, -1e11, max_relative = 1e-12);
        assert_eq!(inv.m10, 0.0);
        assert_eq!(inv.m11, 1.0);
    }

    #[test]
    fn test_transpose() {
        let mut m = Matrix2::new(1.0, 2.0, 3.0, 4.0);
        m.transpose();
        assert_eq!(m, Matrix2::new(1.0, 3.0, 2.0, 4.0));
    }

    #[test]
    fn test_affine() {
        assert!(Matrix2::new(3.0, 5.0, 0.0, 1.0).is_affine());
        assert!(!Matrix2::new(3.0, 5.0, 0.1, 1.0).is_affine());
        assert!(!Matrix2::new(3.0, 5.0, 0.0, 1.0).is_identity());
    }
}

//! A 4×4 matrix, the common case of a three-dimensional affine transform.

use std::any::Any;
use std::hash::{Hash, Hasher};

use crate::error::MatrixError;
use crate::matrix::general;
use crate::matrix::{ensure_length_match, index_out_of_bounds};
use crate::matrix::{AnyMatrix, Matrix};
use crate::numerics::bits_equal;

/// A matrix of fixed 4×4 size.
///
/// ```text
/// ┌                 ┐
/// │ m00 m01 m02 m03 │
/// │ m10 m11 m12 m13 │
/// │ m20 m21 m22 m23 │
/// │ m30 m31 m32 m33 │
/// └                 ┘
/// ```
#[derive(Clone, Copy, Debug)]
pub struct Matrix4 {
    pub m00: f64,
    pub m01: f64,
    pub m02: f64,
    pub m03: f64,
    pub m10: f64,
    pub m11: f64,
    pub m12: f64,
    pub m13: f64,
    pub m20: f64,
    pub m21: f64,
    pub m22: f64,
    pub m23: f64,
    pub m30: f64,
    pub m31: f64,
    pub m32: f64,
    pub m33: f64,
}

impl Matrix4 {
    pub const SIZE: usize = 4;

    #[allow(clippy::too_many_arguments)]
    pub fn new(
        m00: f64,
        m01: f64,
        m02: f64,
        m03: f64,
        m10: f64,
        m11: f64,
        m12: f64,
        m13: f64,
        m20: f64,
        m21: f64,
        m22: f64,
        m23: f64,
        m30: f64,
        m31: f64,
        m32: f64,
        m33: f64,
    ) -> Self {
        Self {
            m00,
            m01,
            m02,
            m03,
            m10,
            m11,
            m12,
            m13,
            m20,
            m21,
            m22,
            m23,
            m30,
            m31,
            m32,
            m33,
        }
    }

    pub fn identity() -> Self {
        let mut m = Self::zeros();
        m.m00 = 1.0;
        m.m11 = 1.0;
        m.m22 = 1.0;
        m.m33 = 1.0;
        m
    }

    pub fn zeros() -> Self {
        Self::new(
            0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0,
        )
    }

    /// Creates a matrix from a flat row-major array of length 16.
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
        self.m03 = elements[3];
        self.m10 = elements[4];
        self.m11 = elements[5];
        self.m12 = elements[6];
        self.m13 = elements[7];
        self.m20 = elements[8];
        self.m21 = elements[9];
        self.m22 = elements[10];
        self.m23 = elements[11];
        self.m30 = elements[12];
        self.m31 = elements[13];
        self.m32 = elements[14];
        self.m33 = elements[15];
        Ok(())
    }

    pub fn is_affine(&self) -> bool {
        self.m30 == 0.0 && self.m31 == 0.0 && self.m32 == 0.0 && self.m33 == 1.0
    }

    pub fn is_identity(&self) -> bool {
        self.m00 == 1.0
            && self.m01 == 0.0
            && self.m02 == 0.0
            && self.m03 == 0.0
            && self.m10 == 0.0
            && self.m11 == 1.0
            && self.m12 == 0.0
            && self.m13 == 0.0
            && self.m20 == 0.0
            && self.m21 == 0.0
            && self.m22 == 1.0
            && self.m23 == 0.0
            && self.is_affine()
    }

    pub fn transpose(&mut self) {
        std::mem::swap(&mut self.m01, &mut self.m10);
        std::mem::swap(&mut self.m02, &mut self.m20);
        std::mem::swap(&mut self.m03, &mut self.m30);
        std::mem::swap(&mut self.m12, &mut self.m21);
        std::mem::swap(&mut self.m13, &mut self.m31);
        std::mem::swap(&mut self.m23, &mut self.m32);
    }

    pub fn normalize_columns(&mut self) {
        for column in [
            [&mut self.m00, &mut self.m10, &mut self.m20, &mut self.m30],
            [&mut self.m01, &mut self.m11, &mut self.m21, &mut self.m31],
            [&mut self.m02, &mut self.m12, &mut self.m22, &mut self.m32],
            [&mut self.m03, &mut self.m13, &mut self.m23, &mut self.m33],
        ] {
            let norm = column.iter().map(|e| e.powi(2)).sum::<f64>().sqrt();
            for e in column {
                *e /= norm;
            }
        }
    }

    pub fn inverse(&self) -> Result<Matrix4, MatrixError> {
        let inverse = general::invert(Self::SIZE, &self.elements())?;
        Matrix4::from_elements(&inverse)
    }
}

impl Default for Matrix4 {
    fn default() -> Self {
        Self::identity()
    }
}

impl Matrix for Matrix4 {
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
            (0, 3) => Ok(self.m03),
            (1, 0) => Ok(self.m10),
            (1, 1) => Ok(self.m11),
            (1, 2) => Ok(self.m12),
            (1, 3) => Ok(self.m13),
            (2, 0) => Ok(self.m20),
            (2, 1) => Ok(self.m21),
            (2, 2) => Ok(self.m22),
            (2, 3) => Ok(self.m23),
            (3, 0) => Ok(self.m30),
            (3, 1) => Ok(self.m31),
            (3, 2) => Ok(self.m32),
            (3, 3) => Ok(self.m33),
            _ => Err(index_out_of_bounds(row, column, Self::SIZE, Self::SIZE)),
        }
    }

    fn set_element(&mut self, row: usize, column: usize, value: f64) -> Result<(), MatrixError> {
        match (row, column) {
            (0, 0) => self.m00 = value,
            (0, 1) => self.m01 = value,
            (0, 2) => self.m02 = value,
            (0, 3) => self.m03 = value,
            (1, 0) => self.m10 = value,
            (1, 1) => self.m11 = value,
            (1, 2) => self.m12 = value,
            (1, 3) => self.m13 = value,
            (2, 0) => self.m20 = value,
            (2, 1) => self.m21 = value,
            (2, 2) => self.m22 = value,
            (2, 3) => self.m23 = value,
            (3, 0) => self.m30 = value,
            (3, 1) => self.m31 = value,
            (3, 2) => self.m32 = value,
            (3, 3) => self.m33 = value,
            _ => return Err(index_out_of_bounds(row, column, Self::SIZE, Self::SIZE)),
        }
        Ok(())
    }

    #[rustfmt::skip]
    fn elements(&self) -> Vec<f64> {
        vec![
            self.m00, self.m01, self.m02, self.m03,
            self.m10, self.m11, self.m12, self.m13,
            self.m20, self.m21, self.m22, self.m23,
            self.m30, self.m31, self.m32, self.m33,
        ]
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn into_any_matrix(self) -> AnyMatrix {
        AnyMatrix::Size4(self)
    }
}

impl PartialEq for Matrix4 {
    fn eq(&self, other: &Self) -> bool {
        self.elements()
            .iter()
            .zip(other.elements().iter())
            .all(|(&a, &b)| bits_equal(a, b))
    }
}

impl Eq for Matrix4 {}

impl Hash for Matrix4 {
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
    fn test_transpose() {
        let values: Vec<f64> = (0..16).map(f64::from).collect();
        let mut m = Matrix4::from_elements(&values).unwrap();
        m.transpose();
        assert_eq!(m.m01, 4.0);
        assert_eq!(m.m30, 3.0);
        assert_eq!(m.m23, 14.0);
        m.transpose();
        assert_eq!(m.elements(), values);
    }

    #[test]
    fn test_normalize_columns() {
        let mut m = Matrix4::new(
            3.0, 0.0, 0.0, 1.0, //
            4.0, 2.0, 0.0, 1.0, //
            0.0, 0.0, 5.0, 1.0, //
            0.0, 0.0, 0.0, 1.0,
        );
        m.normalize_columns();
        assert_relative_eq!(m.m00, 0.6);
        assert_relative_eq!(m.m10, 0.8);
        assert_eq!(m.m11, 1.0);
        assert_eq!(m.m22, 1.0);
        assert_relative_eq!(m.m33, 0.5);
    }

    #[test]
    fn test_inverse_scale_and_translate() {
        let mut m = Matrix4::identity();
        m.m00 = 2.0;
        m.m11 = 4.0;
        m.m22 = 0.5;
        m.m03 = 10.0;
        m.m23 = -3.0;
        let inv = m.inverse().unwrap();
        assert!(inv.is_affine());
        assert_relative_eq!(inv.m00, 0.5);
        assert_relative_eq!(inv.m11, 0.25);
        assert_relative_eq!(inv.m22, 2.0);
        assert_relative_eq!(inv.m03, -5.0);
        assert_relative_eq!(inv.m23, 6.0);
    }

    #[test]
    fn test_identity_predicates() {
        let mut m = Matrix4::identity();
        assert!(m.is_identity() && m.is_affine());
        m.m13 = 1.0;
        assert!(!m.is_identity());
        assert!(m.is_affine());
        m.m32 = 1.0;
        assert!(!m.is_affine());
    }

    #[test]
    fn test_out_of_bounds() {
        let m = Matrix4::identity();
        assert!(matches!(
            m.get_element(4, 4),
            Err(MatrixError::IndexOutOfBounds { row: 4, column: 4, .. })
        ));
    }
}

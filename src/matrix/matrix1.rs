//! A 1×1 matrix, typically the derivative of a one-dimensional transform.

use std::any::Any;
use std::hash::{Hash, Hasher};

use crate::error::MatrixError;
use crate::matrix::{ensure_length_match, ensure_num_row_match, index_out_of_bounds, matrices};
use crate::matrix::{AnyMatrix, Matrix};
use crate::numerics::bits_equal;

/// A matrix of fixed 1×1 size.
#[derive(Clone, Copy, Debug)]
pub struct Matrix1 {
    pub m00: f64,
}

impl Matrix1 {
    pub const SIZE: usize = 1;

    pub fn new(m00: f64) -> Self {
        Self { m00 }
    }

    pub fn identity() -> Self {
        Self { m00: 1.0 }
    }

    pub fn zeros() -> Self {
        Self { m00: 0.0 }
    }

    /// Creates a matrix from a flat array of length 1.
    pub fn from_elements(elements: &[f64]) -> Result<Self, MatrixError> {
        let mut m = Self::zeros();
        m.set_elements(elements)?;
        Ok(m)
    }

    pub fn set_elements(&mut self, elements: &[f64]) -> Result<(), MatrixError> {
        ensure_length_match(Self::SIZE * Self::SIZE, elements)?;
        self.m00 = elements[0];
        Ok(())
    }

    pub fn is_affine(&self) -> bool {
        self.m00 == 1.0
    }

    pub fn is_identity(&self) -> bool {
        self.m00 == 1.0
    }

    /// Nothing to do for a 1×1 matrix.
    pub fn transpose(&mut self) {}

    pub fn normalize_columns(&mut self) {
        self.m00 /= self.m00.abs();
    }

    pub fn inverse(&self) -> Result<Matrix1, MatrixError> {
        if self.m00 == 0.0 {
            return Err(MatrixError::NonInvertible);
        }
        Ok(Matrix1::new(1.0 / self.m00))
    }

    pub fn solve(&self, matrix: &dyn Matrix) -> Result<AnyMatrix, MatrixError> {
        ensure_num_row_match(Self::SIZE, matrix)?;
        if self.m00 == 0.0 {
            return Err(MatrixError::NonInvertible);
        }
        let elements: Vec<f64> = matrix.elements().iter().map(|e| e / self.m00).collect();
        matrices::create(Self::SIZE, matrix.num_col(), &elements)
    }
}

impl Default for Matrix1 {
    fn default() -> Self {
        Self::identity()
    }
}

impl Matrix for Matrix1 {
    fn num_row(&self) -> usize {
        Self::SIZE
    }

    fn num_col(&self) -> usize {
        Self::SIZE
    }

    fn get_element(&self, row: usize, column: usize) -> Result<f64, MatrixError> {
        match (row, column) {
            (0, 0) => Ok(self.m00),
            _ => Err(index_out_of_bounds(row, column, Self::SIZE, Self::SIZE)),
        }
    }

    fn set_element(&mut self, row: usize, column: usize, value: f64) -> Result<(), MatrixError> {
        match (row, column) {
            (0, 0) => self.m00 = value,
            _ => return Err(index_out_of_bounds(row, column, Self::SIZE, Self::SIZE)),
        }
        Ok(())
    }

    fn elements(&self) -> Vec<f64> {
        vec![self.m00]
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn into_any_matrix(self) -> AnyMatrix {
        AnyMatrix::Size1(self)
    }
}

impl PartialEq for Matrix1 {
    fn eq(&self, other: &Self) -> bool {
        bits_equal(self.m00, other.m00)
    }
}

impl Eq for Matrix1 {}

impl Hash for Matrix1 {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.m00.to_bits().hash(state);
    }
}

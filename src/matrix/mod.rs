//! Matrices of double-precision coefficients.
//!
//! Square matrices of size 1 to 4 are stored in dedicated types holding their
//! coefficients as plain fields ([`Matrix1`] … [`Matrix4`]). Every other shape
//! is stored in a row-major [`GeneralMatrix`]. [`AnyMatrix`] is the closed set
//! of those representations; the factory functions in [`matrices`] pick the
//! smallest one able to hold the requested shape.

pub mod format;
pub mod general;
pub mod matrices;
pub mod matrix1;
pub mod matrix2;
pub mod matrix3;
pub mod matrix4;

use std::any::Any;
use std::fmt;
use std::hash::{Hash, Hasher};

use crate::error::MatrixError;

pub use general::GeneralMatrix;
pub use matrices::ComparisonMode;
pub use matrix1::Matrix1;
pub use matrix2::Matrix2;
pub use matrix3::Matrix3;
pub use matrix4::Matrix4;

/// A rectangular grid of `f64` values with bounds-checked element access.
///
/// This is the contract consumed by the factory and comparison functions.
/// Implementations outside this crate (for example `ndarray::Array2<f64>`)
/// can be copied into an [`AnyMatrix`] with [`matrices::copy`].
pub trait Matrix {
    fn num_row(&self) -> usize;

    fn num_col(&self) -> usize;

    /// Value at the given row and column.
    fn get_element(&self, row: usize, column: usize) -> Result<f64, MatrixError>;

    /// Modifies the value at the given row and column.
    fn set_element(&mut self, row: usize, column: usize, value: f64) -> Result<(), MatrixError>;

    /// A fresh copy of all elements in row-major order (column index varies fastest).
    fn elements(&self) -> Vec<f64>;

    /// Used for comparisons that must take the concrete implementation into account.
    fn as_any(&self) -> &dyn Any;

    /// Converts this matrix into the internal representation.
    ///
    /// The default implementation copies the elements. Implementations that
    /// already are one of the internal representations move themselves instead.
    fn into_any_matrix(self) -> AnyMatrix
    where
        Self: Sized,
    {
        matrices::copy_of(&self)
    }
}

/// Builds the error returned on invalid `(row, column)` access.
pub(crate) fn index_out_of_bounds(
    row: usize,
    column: usize,
    num_row: usize,
    num_col: usize,
) -> MatrixError {
    MatrixError::IndexOutOfBounds {
        row,
        column,
        num_row,
        num_col,
    }
}

/// Fails unless `elements` holds exactly `expected` values.
pub(crate) fn ensure_length_match(expected: usize, elements: &[f64]) -> Result<(), MatrixError> {
    if elements.len() != expected {
        return Err(MatrixError::MismatchedLength {
            expected,
            actual: elements.len(),
        });
    }
    Ok(())
}

/// Fails unless `matrix` has `expected` rows.
pub(crate) fn ensure_num_row_match(expected: usize, matrix: &dyn Matrix) -> Result<(), MatrixError> {
    if matrix.num_row() != expected {
        return Err(MatrixError::MismatchedSize {
            expected,
            num_row: matrix.num_row(),
            num_col: matrix.num_col(),
        });
    }
    Ok(())
}

/// Affine test on a flat row-major array: square, and last row is `[0 … 0 1]`.
pub(crate) fn is_affine_elements(num_row: usize, num_col: usize, elements: &[f64]) -> bool {
    if num_row != num_col || num_row == 0 {
        return false;
    }
    let last = &elements[(num_row - 1) * num_col..];
    let (one, zeros) = match last.split_last() {
        Some(split) => split,
        None => return false,
    };
    *one == 1.0 && zeros.iter().all(|&e| e == 0.0)
}

/// Largest magnitude in column `column` of a square row-major array.
pub(crate) fn column_max(size: usize, elements: &[f64], column: usize) -> f64 {
    (0..size).fold(0.0, |acc: f64, j| acc.max(elements[j * size + column].abs()))
}

/// Product of the column magnitudes of a square row-major array. The
/// determinant scales with each column, so `|det|` relative to this value
/// does not depend on the units of any coordinate (translations included).
pub(crate) fn determinant_scale(size: usize, elements: &[f64]) -> f64 {
    (0..size).map(|k| column_max(size, elements, k)).product()
}

/// Exact identity test on a flat row-major array.
pub(crate) fn is_identity_elements(num_row: usize, num_col: usize, elements: &[f64]) -> bool {
    if num_row != num_col {
        return false;
    }
    elements.iter().enumerate().all(|(k, &e)| {
        let expected = if k / num_col == k % num_col { 1.0 } else { 0.0 };
        e == expected
    })
}

/// One of the matrix representations owned by this crate.
///
/// Equality is exact (bit patterns of every element) and requires the same
/// representation; use [`matrices::equals`] for shape-and-value or
/// tolerance-based comparisons.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum AnyMatrix {
    Size1(Matrix1),
    Size2(Matrix2),
    Size3(Matrix3),
    Size4(Matrix4),
    General(GeneralMatrix),
}

macro_rules! dispatch {
    ($self:expr, $m:ident => $body:expr) => {
        match $self {
            AnyMatrix::Size1($m) => $body,
            AnyMatrix::Size2($m) => $body,
            AnyMatrix::Size3($m) => $body,
            AnyMatrix::Size4($m) => $body,
            AnyMatrix::General($m) => $body,
        }
    };
}

impl AnyMatrix {
    /// Sets all elements from a flat row-major array of length `num_row × num_col`.
    pub fn set_elements(&mut self, elements: &[f64]) -> Result<(), MatrixError> {
        dispatch!(self, m => m.set_elements(elements))
    }

    /// `true` if square and the last row is zero except a trailing 1.
    /// Evaluated from the current element values on every call.
    pub fn is_affine(&self) -> bool {
        dispatch!(self, m => m.is_affine())
    }

    /// `true` if this is exactly an identity matrix.
    pub fn is_identity(&self) -> bool {
        dispatch!(self, m => m.is_identity())
    }

    /// Transposes in place, swapping the roles of rows and columns.
    pub fn transpose(&mut self) {
        dispatch!(self, m => m.transpose())
    }

    /// Divides every column by its Euclidean norm.
    pub fn normalize_columns(&mut self) {
        dispatch!(self, m => m.normalize_columns())
    }

    /// The inverse of this matrix.
    pub fn inverse(&self) -> Result<AnyMatrix, MatrixError> {
        let result = match self {
            AnyMatrix::Size1(m) => m.inverse().map(AnyMatrix::Size1),
            AnyMatrix::Size2(m) => m.inverse().map(AnyMatrix::Size2),
            AnyMatrix::Size3(m) => m.inverse().map(AnyMatrix::Size3),
            AnyMatrix::Size4(m) => m.inverse().map(AnyMatrix::Size4),
            AnyMatrix::General(m) => m.inverse(),
        };
        if result.is_err() {
            tracing::debug!(
                "Rejected inversion of a singular {}×{} matrix",
                self.num_row(),
                self.num_col()
            );
        }
        result
    }

    /// Solves `self × X = matrix` for `X`.
    pub fn solve(&self, matrix: &dyn Matrix) -> Result<AnyMatrix, MatrixError> {
        match self {
            AnyMatrix::Size1(m) => m.solve(matrix),
            _ => general::solve(self, matrix),
        }
    }

    /// `self × matrix`. The result has `self.num_row()` rows and `matrix.num_col()` columns.
    pub fn multiply(&self, matrix: &dyn Matrix) -> Result<AnyMatrix, MatrixError> {
        match (self, matrix.as_any().downcast_ref::<AnyMatrix>()) {
            (AnyMatrix::Size2(a), Some(AnyMatrix::Size2(b))) => Ok(AnyMatrix::Size2(a.multiply(b))),
            (AnyMatrix::Size3(a), Some(AnyMatrix::Size3(b))) => Ok(AnyMatrix::Size3(a.multiply(b))),
            _ => matrices::multiply(self, matrix),
        }
    }

    /// Copies the elements into an `ndarray` array of the same shape.
    pub fn to_array2(&self) -> ndarray::Array2<f64> {
        ndarray::Array2::from_shape_vec((self.num_row(), self.num_col()), self.elements())
            .unwrap_or_else(|_| ndarray::Array2::zeros((self.num_row(), self.num_col())))
    }
}

impl Matrix for AnyMatrix {
    fn num_row(&self) -> usize {
        dispatch!(self, m => m.num_row())
    }

    fn num_col(&self) -> usize {
        dispatch!(self, m => m.num_col())
    }

    fn get_element(&self, row: usize, column: usize) -> Result<f64, MatrixError> {
        dispatch!(self, m => m.get_element(row, column))
    }

    fn set_element(&mut self, row: usize, column: usize, value: f64) -> Result<(), MatrixError> {
        dispatch!(self, m => m.set_element(row, column, value))
    }

    fn elements(&self) -> Vec<f64> {
        dispatch!(self, m => m.elements())
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn into_any_matrix(self) -> AnyMatrix {
        self
    }
}

impl Hash for AnyMatrix {
    fn hash<H: Hasher>(&self, state: &mut H) {
        std::mem::discriminant(self).hash(state);
        dispatch!(self, m => m.hash(state))
    }
}

impl fmt::Display for AnyMatrix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&format::to_string(self))
    }
}

impl From<Matrix1> for AnyMatrix {
    fn from(m: Matrix1) -> Self {
        AnyMatrix::Size1(m)
    }
}

impl From<Matrix2> for AnyMatrix {
    fn from(m: Matrix2) -> Self {
        AnyMatrix::Size2(m)
    }
}

impl From<Matrix3> for AnyMatrix {
    fn from(m: Matrix3) -> Self {
        AnyMatrix::Size3(m)
    }
}

impl From<Matrix4> for AnyMatrix {
    fn from(m: Matrix4) -> Self {
        AnyMatrix::Size4(m)
    }
}

impl From<GeneralMatrix> for AnyMatrix {
    fn from(m: GeneralMatrix) -> Self {
        AnyMatrix::General(m)
    }
}

/// Lets `ndarray` arrays be used wherever a [`Matrix`] is expected.
impl Matrix for ndarray::Array2<f64> {
    fn num_row(&self) -> usize {
        self.nrows()
    }

    fn num_col(&self) -> usize {
        self.ncols()
    }

    fn get_element(&self, row: usize, column: usize) -> Result<f64, MatrixError> {
        self.get((row, column))
            .copied()
            .ok_or_else(|| index_out_of_bounds(row, column, self.nrows(), self.ncols()))
    }

    fn set_element(&mut self, row: usize, column: usize, value: f64) -> Result<(), MatrixError> {
        let (num_row, num_col) = self.dim();
        match self.get_mut((row, column)) {
            Some(e) => {
                *e = value;
                Ok(())
            }
            None => Err(index_out_of_bounds(row, column, num_row, num_col)),
        }
    }

    fn elements(&self) -> Vec<f64> {
        self.iter().copied().collect()
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use ndarray::array;

    #[test]
    fn test_element_access_out_of_bounds() {
        let mut m = matrices::create_zero(2, 3);
        assert!(m.set_element(1, 2, 5.0).is_ok());
        assert_eq!(m.get_element(1, 2), Ok(5.0));
        assert!(matches!(
            m.get_element(2, 0),
            Err(MatrixError::IndexOutOfBounds { row: 2, column: 0, .. })
        ));
        assert!(m.set_element(0, 3, 1.0).is_err());
        assert_eq!(m.elements(), vec![0.0, 0.0, 0.0, 0.0, 0.0, 5.0]);
    }

    #[test]
    fn test_set_elements_wrong_length() {
        for size in 1..=5 {
            let mut m = matrices::create_identity(size);
            let err = m.set_elements(&[1.0; 3]);
            assert_eq!(
                err,
                Err(MatrixError::MismatchedLength {
                    expected: size * size,
                    actual: 3
                })
            );
            assert!(m.is_identity(), "matrix must be left unchanged");
        }
    }

    #[test]
    fn test_is_affine_is_recomputed() {
        let mut m = matrices::create_identity(3);
        assert!(m.is_affine());
        m.set_element(2, 0, 0.5).unwrap();
        assert!(!m.is_affine());
        m.set_element(2, 0, 0.0).unwrap();
        assert!(m.is_affine());
        assert!(!matrices::create_diagonal(2, 3).is_affine());
    }

    #[test]
    fn test_multiply_identity_law() {
        let m = matrices::create(3, 2, &[1.0, 2.0, 3.0, 4.0, 5.0, 6.0]).unwrap();
        let product = matrices::create_identity(3).multiply(&m).unwrap();
        assert_eq!(product, m);
        let product = m.multiply(&matrices::create_identity(2)).unwrap();
        assert_eq!(product, m);
    }

    #[test]
    fn test_multiply_mismatched_size() {
        let a = matrices::create_zero(2, 3);
        let b = matrices::create_zero(2, 2);
        assert!(matches!(
            a.multiply(&b),
            Err(MatrixError::MismatchedSize { expected: 3, .. })
        ));
    }

    #[test]
    fn test_multiply_picks_representation() {
        let a = matrices::create(2, 3, &[1.0, 0.0, 2.0, 0.0, 1.0, 3.0]).unwrap();
        let b = matrices::create(3, 2, &[1.0, 0.0, 0.0, 1.0, 0.0, 0.0]).unwrap();
        let product = a.multiply(&b).unwrap();
        assert!(matches!(product, AnyMatrix::Size2(_)));
        assert_eq!(product.elements(), vec![1.0, 0.0, 0.0, 1.0]);
    }

    #[test]
    fn test_inverse_of_inverse() {
        let samples: [&[f64]; 4] = [
            &[4.0],
            &[2.0, 1.0, 7.0, 4.0],
            &[2.0, 0.0, 5.0, 0.0, -3.0, 8.0, 0.0, 0.0, 1.0],
            &[
                1.0, 2.0, 0.0, 4.0, 0.0, 1.0, 3.0, -2.0, 2.0, 0.0, 1.0, 1.0, 0.0, 0.0, 0.0, 1.0,
            ],
        ];
        for elements in samples {
            let size = (elements.len() as f64).sqrt() as usize;
            let m = matrices::create(size, size, elements).unwrap();
            let back = m.inverse().unwrap().inverse().unwrap();
            assert!(
                matrices::equals(Some(&m), Some(&back), 1e-12, false),
                "{m}\n{back}"
            );
        }
    }

    #[test]
    fn test_inverse_of_inverse_general() {
        let mut m = matrices::create_identity(5);
        m.set_element(0, 4, 10.0).unwrap();
        m.set_element(2, 1, -3.0).unwrap();
        m.set_element(3, 3, 0.25).unwrap();
        let back = m.inverse().unwrap().inverse().unwrap();
        assert!(matrices::equals(Some(&m), Some(&back), 1e-12, false));
    }

    #[test]
    fn test_non_invertible() {
        let m = matrices::create(2, 2, &[1.0, 2.0, 2.0, 4.0]).unwrap();
        assert_eq!(m.inverse(), Err(MatrixError::NonInvertible));
        assert_eq!(
            matrices::create_zero(5, 5).inverse(),
            Err(MatrixError::NonInvertible)
        );
        assert_eq!(
            matrices::create_zero(2, 3).inverse(),
            Err(MatrixError::NonInvertible)
        );
    }

    #[test]
    fn test_solve() {
        let a = matrices::create(2, 2, &[2.0, 0.0, 0.0, 4.0]).unwrap();
        let b = matrices::create(2, 3, &[2.0, 4.0, 6.0, 4.0, 8.0, 12.0]).unwrap();
        let x = a.solve(&b).unwrap();
        assert_eq!(x.elements(), vec![1.0, 2.0, 3.0, 1.0, 2.0, 3.0]);

        let wrong = matrices::create_zero(3, 1);
        assert!(matches!(a.solve(&wrong), Err(MatrixError::MismatchedSize { .. })));

        let singular = matrices::create_zero(2, 2);
        assert_eq!(singular.solve(&b), Err(MatrixError::NonInvertible));
    }

    #[test]
    fn test_transpose() {
        let mut m = matrices::create(2, 3, &[1.0, 2.0, 3.0, 4.0, 5.0, 6.0]).unwrap();
        m.transpose();
        assert_eq!((m.num_row(), m.num_col()), (3, 2));
        assert_eq!(m.elements(), vec![1.0, 4.0, 2.0, 5.0, 3.0, 6.0]);

        let mut m = matrices::create(3, 3, &[1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0, 8.0, 9.0]).unwrap();
        m.transpose();
        assert_eq!(m.elements(), vec![1.0, 4.0, 7.0, 2.0, 5.0, 8.0, 3.0, 6.0, 9.0]);
    }

    #[test]
    fn test_normalize_columns() {
        let mut m = matrices::create(2, 2, &[3.0, 0.0, 4.0, 2.0]).unwrap();
        m.normalize_columns();
        assert_relative_eq!(m.get_element(0, 0).unwrap(), 0.6);
        assert_relative_eq!(m.get_element(1, 0).unwrap(), 0.8);
        assert_relative_eq!(m.get_element(1, 1).unwrap(), 1.0);
    }

    #[test]
    fn test_strict_equality_and_hash() {
        use std::collections::HashSet;
        let a = matrices::create(2, 2, &[1.0, f64::NAN, 0.0, 1.0]).unwrap();
        let b = a.clone();
        assert_eq!(a, b);
        let c = matrices::create(2, 2, &[1.0, f64::NAN, -0.0, 1.0]).unwrap();
        assert_ne!(a, c);
        let set: HashSet<AnyMatrix> = [a, b, c].into_iter().collect();
        assert_eq!(set.len(), 2);
    }

    #[test]
    fn test_ndarray_interop() {
        let arr = array![[1.0, 2.0], [3.0, 4.0]];
        assert_eq!(arr.get_element(1, 0), Ok(3.0));
        assert!(arr.get_element(2, 0).is_err());
        let m = arr.clone().into_any_matrix();
        assert!(matches!(m, AnyMatrix::Size2(_)));
        assert_eq!(m.to_array2(), arr);
    }
}

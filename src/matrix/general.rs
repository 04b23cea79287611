//! Matrix of arbitrary size, backed by a row-major array.

use std::any::Any;
use std::hash::{Hash, Hasher};

use crate::error::MatrixError;
use crate::matrix::{column_max, ensure_length_match, ensure_num_row_match, index_out_of_bounds, matrices};
use crate::matrix::{is_affine_elements, is_identity_elements, AnyMatrix, Matrix};
use crate::numerics::{bits_equal, is_negligible};

/// A matrix of any shape. Used for every shape that is not square of size 1 to 4.
#[derive(Clone, Debug)]
pub struct GeneralMatrix {
    num_row: usize,
    num_col: usize,
    /// Row-major: element `(j, i)` is at `j * num_col + i`.
    elements: Vec<f64>,
}

impl GeneralMatrix {
    /// Creates a matrix filled with zeros, with ones on the diagonal if `diagonal` is `true`.
    /// The matrix does not need to be square.
    pub fn new(num_row: usize, num_col: usize, diagonal: bool) -> Self {
        let mut elements = vec![0.0; num_row * num_col];
        if diagonal {
            for k in 0..num_row.min(num_col) {
                elements[k * num_col + k] = 1.0;
            }
        }
        Self {
            num_row,
            num_col,
            elements,
        }
    }

    /// Creates a matrix from a flat row-major array of length `num_row × num_col`.
    pub fn from_elements(
        num_row: usize,
        num_col: usize,
        elements: &[f64],
    ) -> Result<Self, MatrixError> {
        ensure_length_match(num_row * num_col, elements)?;
        Ok(Self {
            num_row,
            num_col,
            elements: elements.to_vec(),
        })
    }

    /// Copies the elements of any matrix.
    pub fn copy_of(matrix: &dyn Matrix) -> Self {
        Self {
            num_row: matrix.num_row(),
            num_col: matrix.num_col(),
            elements: matrix.elements(),
        }
    }

    pub fn set_elements(&mut self, elements: &[f64]) -> Result<(), MatrixError> {
        ensure_length_match(self.elements.len(), elements)?;
        self.elements.copy_from_slice(elements);
        Ok(())
    }

    pub fn is_affine(&self) -> bool {
        is_affine_elements(self.num_row, self.num_col, &self.elements)
    }

    pub fn is_identity(&self) -> bool {
        is_identity_elements(self.num_row, self.num_col, &self.elements)
    }

    /// Transposes in place. A non-square matrix gets its row and column counts swapped.
    pub fn transpose(&mut self) {
        let (num_row, num_col) = (self.num_row, self.num_col);
        let mut transposed = vec![0.0; self.elements.len()];
        for j in 0..num_row {
            for i in 0..num_col {
                transposed[i * num_row + j] = self.elements[j * num_col + i];
            }
        }
        self.elements = transposed;
        self.num_row = num_col;
        self.num_col = num_row;
    }

    pub fn normalize_columns(&mut self) {
        normalize_columns(self.num_row, self.num_col, &mut self.elements);
    }

    /// The inverse of this matrix. Non-square matrices are reported as non-invertible.
    pub fn inverse(&self) -> Result<AnyMatrix, MatrixError> {
        if self.num_row != self.num_col {
            return Err(MatrixError::NonInvertible);
        }
        let inverse = invert(self.num_row, &self.elements)?;
        matrices::create(self.num_row, self.num_col, &inverse)
    }
}

/// Divides every column of a row-major array by its Euclidean norm.
pub(crate) fn normalize_columns(num_row: usize, num_col: usize, elements: &mut [f64]) {
    for i in 0..num_col {
        let norm = (0..num_row)
            .map(|j| elements[j * num_col + i].powi(2))
            .sum::<f64>()
            .sqrt();
        for j in 0..num_row {
            elements[j * num_col + i] /= norm;
        }
    }
}

/// Inverts a square matrix given as a flat row-major array.
pub(crate) fn invert(size: usize, elements: &[f64]) -> Result<Vec<f64>, MatrixError> {
    let mut identity = vec![0.0; size * size];
    for k in 0..size {
        identity[k * size + k] = 1.0;
    }
    gauss_jordan(size, elements, size, identity)
}

/// Solves `a × X = b` for `X`, where `a` is square.
pub(crate) fn solve(a: &dyn Matrix, b: &dyn Matrix) -> Result<AnyMatrix, MatrixError> {
    let size = a.num_row();
    ensure_num_row_match(size, b)?;
    if a.num_col() != size {
        return Err(MatrixError::NonInvertible);
    }
    let x = gauss_jordan(size, &a.elements(), b.num_col(), b.elements())?;
    matrices::create(size, b.num_col(), &x)
}

/// Gauss-Jordan elimination with partial pivoting.
///
/// `a` is `size × size`, `b` is `size × width`; both row-major. Returns `X` such that `a × X = b`.
fn gauss_jordan(
    size: usize,
    a: &[f64],
    width: usize,
    mut b: Vec<f64>,
) -> Result<Vec<f64>, MatrixError> {
    let scales: Vec<f64> = (0..size).map(|k| column_max(size, a, k)).collect();
    let mut a = a.to_vec();
    for k in 0..size {
        let pivot_row = (k..size)
            .max_by(|&r1, &r2| a[r1 * size + k].abs().total_cmp(&a[r2 * size + k].abs()))
            .unwrap_or(k);
        let pivot = a[pivot_row * size + k];
        if is_negligible(pivot, scales[k]) {
            return Err(MatrixError::NonInvertible);
        }
        if pivot_row != k {
            for i in 0..size {
                a.swap(k * size + i, pivot_row * size + i);
            }
            for i in 0..width {
                b.swap(k * width + i, pivot_row * width + i);
            }
        }
        for i in 0..size {
            a[k * size + i] /= pivot;
        }
        for i in 0..width {
            b[k * width + i] /= pivot;
        }
        for j in (0..size).filter(|&j| j != k) {
            let factor = a[j * size + k];
            if factor == 0.0 {
                continue;
            }
            for i in 0..size {
                a[j * size + i] -= factor * a[k * size + i];
            }
            for i in 0..width {
                b[j * width + i] -= factor * b[k * width + i];
            }
        }
    }
    Ok(b)
}

impl Matrix for GeneralMatrix {
    fn num_row(&self) -> usize {
        self.num_row
    }

    fn num_col(&self) -> usize {
        self.num_col
    }

    fn get_element(&self, row: usize, column: usize) -> Result<f64, MatrixError> {
        if row < self.num_row && column < self.num_col {
            Ok(self.elements[row * self.num_col + column])
        } else {
            Err(index_out_of_bounds(row, column, self.num_row, self.num_col))
        }
    }

    fn set_element(&mut self, row: usize, column: usize, value: f64) -> Result<(), MatrixError> {
        if row < self.num_row && column < self.num_col {
            self.elements[row * self.num_col + column] = value;
            Ok(())
        } else {
            Err(index_out_of_bounds(row, column, self.num_row, self.num_col))
        }
    }

    fn elements(&self) -> Vec<f64> {
        self.elements.clone()
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn into_any_matrix(self) -> AnyMatrix {
        AnyMatrix::General(self)
    }
}

impl PartialEq for GeneralMatrix {
    fn eq(&self, other: &Self) -> bool {
        self.num_row == other.num_row
            && self.num_col == other.num_col
            && self
                .elements
                .iter()
                .zip(other.elements.iter())
                .all(|(&a, &b)| bits_equal(a, b))
    }
}

impl Eq for GeneralMatrix {}

impl Hash for GeneralMatrix {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.num_row.hash(state);
        self.num_col.hash(state);
        for e in &self.elements {
            e.to_bits().hash(state);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_diagonal_non_square() {
        let m = GeneralMatrix::new(2, 4, true);
        assert_eq!(m.elements(), vec![1.0, 0.0, 0.0, 0.0, 0.0, 1.0, 0.0, 0.0]);
        assert!(!m.is_identity());
        assert!(!m.is_affine());
    }

    #[test]
    fn test_from_elements_length() {
        assert!(GeneralMatrix::from_elements(2, 3, &[0.0; 6]).is_ok());
        assert_eq!(
            GeneralMatrix::from_elements(2, 3, &[0.0; 5]),
            Err(MatrixError::MismatchedLength {
                expected: 6,
                actual: 5
            })
        );
    }

    #[test]
    fn test_invert_requires_pivoting() {
        // Zero on the leading diagonal element.
        let inverse = invert(2, &[0.0, 1.0, 1.0, 0.0]).unwrap();
        assert_eq!(inverse, vec![0.0, 1.0, 1.0, 0.0]);
    }

    #[test]
    fn test_solve_five_by_five() {
        let mut a = GeneralMatrix::new(5, 5, true);
        for k in 0..5 {
            a.set_element(k, k, (k + 1) as f64).unwrap();
        }
        a.set_element(0, 4, 1.0).unwrap();
        let b = GeneralMatrix::from_elements(5, 1, &[6.0, 4.0, 9.0, 16.0, 25.0]).unwrap();
        let x = solve(&a, &b).unwrap();
        let x = x.elements();
        assert_relative_eq!(x[4], 5.0, epsilon = 1e-12);
        assert_relative_eq!(x[3], 4.0, epsilon = 1e-12);
        assert_relative_eq!(x[0], 1.0, epsilon = 1e-12);
    }

    #[test]
    fn test_non_square_is_not_invertible() {
        let m = GeneralMatrix::new(3, 4, true);
        assert_eq!(m.inverse(), Err(MatrixError::NonInvertible));
    }
}

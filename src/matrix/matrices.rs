//! Factory and comparison functions for matrices.
//!
//! Every factory picks [`Matrix1`] … [`Matrix4`] when the requested shape is
//! square with a size from 1 to 4, and [`GeneralMatrix`] otherwise.
//!
//! Matrices built by [`create_transform`] and friends describe transforms
//! between coordinate tuples using homogeneous coordinates: a matrix of size
//! `(target + 1) × (source + 1)` maps a `source`-dimensional point extended
//! with a trailing 1 to a `target`-dimensional one.

use std::str::FromStr;

use crate::axis::AxisDirection;
use crate::envelope::Envelope;
use crate::error::{ComparisonError, MatrixError};
use crate::matrix::{AnyMatrix, GeneralMatrix, Matrix, Matrix1, Matrix2, Matrix3, Matrix4};
use crate::numerics::{special_equal, COMPARISON_THRESHOLD};

/// Strictness of a matrix comparison.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ComparisonMode {
    /// Same representation and bit-identical elements.
    Strict,
    /// Same shape and equal values, regardless of the representation.
    ByContract,
    /// Same as [`ComparisonMode::ByContract`] for matrices.
    IgnoreMetadata,
    /// Values equal within [`COMPARISON_THRESHOLD`], relative to their magnitude.
    Approximate,
    /// Same as [`ComparisonMode::Approximate`] for matrices.
    Debug,
}

impl FromStr for ComparisonMode {
    type Err = ComparisonError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().replace(['-', '_'], "").as_str() {
            "strict" => Ok(Self::Strict),
            "bycontract" => Ok(Self::ByContract),
            "ignoremetadata" => Ok(Self::IgnoreMetadata),
            "approximate" | "approximative" => Ok(Self::Approximate),
            "debug" => Ok(Self::Debug),
            _ => Err(ComparisonError::UnknownMode(s.to_string())),
        }
    }
}

/// Creates a square identity matrix of the given size.
pub fn create_identity(size: usize) -> AnyMatrix {
    match size {
        1 => AnyMatrix::Size1(Matrix1::identity()),
        2 => AnyMatrix::Size2(Matrix2::identity()),
        3 => AnyMatrix::Size3(Matrix3::identity()),
        4 => AnyMatrix::Size4(Matrix4::identity()),
        _ => AnyMatrix::General(GeneralMatrix::new(size, size, true)),
    }
}

/// Creates a matrix with ones on the diagonal and zeros elsewhere.
/// The matrix does not need to be square.
pub fn create_diagonal(num_row: usize, num_col: usize) -> AnyMatrix {
    if num_row == num_col {
        create_identity(num_row)
    } else {
        AnyMatrix::General(GeneralMatrix::new(num_row, num_col, true))
    }
}

/// Creates a matrix filled with zeros.
pub fn create_zero(num_row: usize, num_col: usize) -> AnyMatrix {
    if num_row == num_col {
        match num_row {
            1 => return AnyMatrix::Size1(Matrix1::zeros()),
            2 => return AnyMatrix::Size2(Matrix2::zeros()),
            3 => return AnyMatrix::Size3(Matrix3::zeros()),
            4 => return AnyMatrix::Size4(Matrix4::zeros()),
            _ => {}
        }
    }
    AnyMatrix::General(GeneralMatrix::new(num_row, num_col, false))
}

/// Creates a matrix from a flat row-major array of length `num_row × num_col`.
pub fn create(num_row: usize, num_col: usize, elements: &[f64]) -> Result<AnyMatrix, MatrixError> {
    if num_row == num_col {
        match num_row {
            1 => return Matrix1::from_elements(elements).map(AnyMatrix::Size1),
            2 => return Matrix2::from_elements(elements).map(AnyMatrix::Size2),
            3 => return Matrix3::from_elements(elements).map(AnyMatrix::Size3),
            4 => return Matrix4::from_elements(elements).map(AnyMatrix::Size4),
            _ => {}
        }
    }
    GeneralMatrix::from_elements(num_row, num_col, elements).map(AnyMatrix::General)
}

/// Creates a transform that maps the source envelope onto the destination
/// envelope, dimension by dimension, without any axis swapping.
///
/// If the envelopes have different dimensions, the extra dimensions are dropped
/// (source) or set to zero (destination).
pub fn create_transform_between(
    src_envelope: &Envelope,
    dst_envelope: &Envelope,
) -> Result<AnyMatrix, MatrixError> {
    let src_dim = src_envelope.dimension();
    let dst_dim = dst_envelope.dimension();
    let mut matrix = create_zero(dst_dim + 1, src_dim + 1);
    for i in 0..src_dim.min(dst_dim) {
        let scale = dst_envelope.span(i) / src_envelope.span(i);
        let translate = dst_envelope.minimum(i) - src_envelope.minimum(i) * scale;
        matrix.set_element(i, i, scale)?;
        matrix.set_element(i, src_dim, translate)?;
    }
    matrix.set_element(dst_dim, src_dim, 1.0)?;
    Ok(matrix)
}

/// Creates a transform that reorders and flips axes so that they match the
/// destination directions.
///
/// Each destination axis is mapped to the source axis having the same
/// direction or the opposite one, with a coefficient of +1 or -1 respectively.
/// Source axes without a destination counterpart are dropped.
///
/// For example `create_transform(&[North, West], &[East, North])` gives:
///
/// ```text
/// ┌          ┐
/// │ 0  -1  0 │
/// │ 1   0  0 │
/// │ 0   0  1 │
/// └          ┘
/// ```
pub fn create_transform(
    src_axes: &[AxisDirection],
    dst_axes: &[AxisDirection],
) -> Result<AnyMatrix, MatrixError> {
    create_axis_transform(None, src_axes, dst_axes)
}

/// Same as [`create_transform`], also scaling and translating each axis so
/// that the source envelope is mapped onto the destination envelope.
///
/// When an axis keeps its direction the destination minimum is the anchor of
/// the translation; when the axis is flipped the destination maximum is used.
pub fn create_transform_with_envelopes(
    src_envelope: &Envelope,
    src_axes: &[AxisDirection],
    dst_envelope: &Envelope,
    dst_axes: &[AxisDirection],
) -> Result<AnyMatrix, MatrixError> {
    ensure_dimension_match("src_envelope", src_envelope, src_axes.len())?;
    ensure_dimension_match("dst_envelope", dst_envelope, dst_axes.len())?;
    create_axis_transform(Some((src_envelope, dst_envelope)), src_axes, dst_axes)
}

fn ensure_dimension_match(
    name: &'static str,
    envelope: &Envelope,
    dimension: usize,
) -> Result<(), MatrixError> {
    if envelope.dimension() != dimension {
        return Err(MatrixError::MismatchedDimension {
            name,
            expected: dimension,
            actual: envelope.dimension(),
        });
    }
    Ok(())
}

fn create_axis_transform(
    envelopes: Option<(&Envelope, &Envelope)>,
    src_axes: &[AxisDirection],
    dst_axes: &[AxisDirection],
) -> Result<AnyMatrix, MatrixError> {
    let mut matrix = create_zero(dst_axes.len() + 1, src_axes.len() + 1);
    for (dst_index, &dst_dir) in dst_axes.iter().enumerate() {
        let search = dst_dir.absolute();
        let mut found = false;
        for (src_index, &src_dir) in src_axes.iter().enumerate() {
            if search != src_dir.absolute() {
                continue;
            }
            if found {
                return Err(MatrixError::ColinearAxes {
                    source_axis: src_dir.to_string(),
                    target_axis: dst_dir.to_string(),
                });
            }
            found = true;
            let same = src_dir == dst_dir;
            let mut scale = if same { 1.0 } else { -1.0 };
            let mut translate = 0.0;
            if let Some((src_env, dst_env)) = envelopes {
                translate = if same {
                    dst_env.minimum(dst_index)
                } else {
                    dst_env.maximum(dst_index)
                };
                scale *= dst_env.span(dst_index) / src_env.span(src_index);
                translate -= src_env.minimum(src_index) * scale;
            }
            matrix.set_element(dst_index, src_index, scale)?;
            matrix.set_element(dst_index, src_axes.len(), translate)?;
        }
        if !found {
            return Err(MatrixError::AxisNotFound(dst_dir.to_string()));
        }
    }
    matrix.set_element(dst_axes.len(), src_axes.len(), 1.0)?;
    Ok(matrix)
}

/// Creates a matrix keeping only the given source dimensions, in the given order.
///
/// The result has `selected.len() + 1` rows and `source_dimensions + 1` columns.
pub fn create_dimension_select(
    source_dimensions: usize,
    selected: &[usize],
) -> Result<AnyMatrix, MatrixError> {
    let mut matrix = create_zero(selected.len() + 1, source_dimensions + 1);
    for (j, &i) in selected.iter().enumerate() {
        if i >= source_dimensions {
            return Err(MatrixError::IndexOutOfRange {
                index: i,
                bound: source_dimensions,
            });
        }
        matrix.set_element(j, i, 1.0)?;
    }
    matrix.set_element(selected.len(), source_dimensions, 1.0)?;
    Ok(matrix)
}

/// Expands a transform matrix so that it applies only to some dimensions of a
/// larger coordinate tuple.
///
/// The `first_affected` leading and `num_trailing` trailing ordinates are passed
/// through unchanged. The last column of `sub_matrix` (its translation terms) is
/// moved to the last column of the result.
///
/// For example, with `first_affected = 1`, `num_trailing = 1` and a 2×2 sub-matrix
/// `[a b; 0 1]` acting on the height of (x, z, t) tuples:
///
/// ```text
/// ┌            ┐
/// │ 1  0  0  0 │
/// │ 0  a  0  b │
/// │ 0  0  1  0 │
/// │ 0  0  0  1 │
/// └            ┘
/// ```
pub fn create_pass_through<M: Matrix + ?Sized>(
    first_affected: usize,
    sub_matrix: &M,
    num_trailing: usize,
) -> Result<AnyMatrix, MatrixError> {
    let sub_col = sub_matrix.num_col();
    let sub_row = sub_matrix.num_row();
    if sub_col == 0 || sub_row == 0 {
        return Err(MatrixError::IllegalArgument(format!(
            "pass-through sub-matrix must have at least one row and one column, got {sub_row}×{sub_col}"
        )));
    }
    let expansion = first_affected + num_trailing;
    let source_dimensions = sub_col - 1;
    let target_dimensions = sub_row - 1;
    let sub = sub_matrix.elements();
    let sub_at = |j: usize, i: usize| sub[j * sub_col + i];

    let mut matrix = create_zero(target_dimensions + expansion + 1, source_dimensions + expansion + 1);
    for j in 0..first_affected {
        matrix.set_element(j, j, 1.0)?;
    }
    let last_column = source_dimensions + expansion;
    for j in 0..target_dimensions {
        for i in 0..source_dimensions {
            matrix.set_element(first_affected + j, first_affected + i, sub_at(j, i))?;
        }
        matrix.set_element(first_affected + j, last_column, sub_at(j, source_dimensions))?;
    }
    for i in (last_column - num_trailing)..last_column {
        matrix.set_element(i + target_dimensions - source_dimensions, i, 1.0)?;
    }
    let last_row = target_dimensions + expansion;
    for i in 0..source_dimensions {
        matrix.set_element(last_row, first_affected + i, sub_at(target_dimensions, i))?;
    }
    matrix.set_element(last_row, last_column, sub_at(target_dimensions, source_dimensions))?;
    Ok(matrix)
}

/// Always allocates a new matrix holding the same values, or `None` for `None`.
pub fn copy<M: Matrix + ?Sized>(matrix: Option<&M>) -> Option<AnyMatrix> {
    matrix.map(copy_of)
}

/// Copies any matrix into the representation chosen from its shape.
pub fn copy_of<M: Matrix + ?Sized>(matrix: &M) -> AnyMatrix {
    let (num_row, num_col) = (matrix.num_row(), matrix.num_col());
    let mut elements = matrix.elements();
    if elements.len() != num_row * num_col {
        // Inconsistent element count: read element by element to keep the shape.
        elements = (0..num_row * num_col)
            .map(|k| matrix.get_element(k / num_col, k % num_col).unwrap_or(f64::NAN))
            .collect();
    }
    create(num_row, num_col, &elements).unwrap_or_else(|_| create_zero(num_row, num_col))
}

/// Returns the given matrix unchanged if it already is one of the internal
/// representations, or a copy otherwise.
pub fn cast_or_copy<M: Matrix>(matrix: Option<M>) -> Option<AnyMatrix> {
    matrix.map(Matrix::into_any_matrix)
}

/// `true` if the matrix is square and its last row is `[0 … 0 1]`.
/// Exact comparison, no tolerance.
pub fn is_affine<M: Matrix + ?Sized>(matrix: &M) -> bool {
    super::is_affine_elements(matrix.num_row(), matrix.num_col(), &matrix.elements())
}

/// `true` if the matrix is square and every element differs from the
/// identity matrix by no more than `tolerance`. `NaN` elements make the result `false`.
pub fn is_identity<M: Matrix + ?Sized>(matrix: &M, tolerance: f64) -> bool {
    let (num_row, num_col) = (matrix.num_row(), matrix.num_col());
    if num_row != num_col {
        return false;
    }
    matrix.elements().iter().enumerate().all(|(k, &e)| {
        let deviation = if k / num_col == k % num_col { e - 1.0 } else { e };
        deviation.abs() <= tolerance
    })
}

/// Compares two matrices element by element.
///
/// `tolerance` is `epsilon` in absolute mode, or `epsilon` times the largest
/// magnitude of the two compared values in relative mode. `NaN` is equal to `NaN`
/// and infinities of the same sign are equal. Different shapes, or only one
/// matrix being `None`, are reported as unequal.
pub fn equals<A, B>(m1: Option<&A>, m2: Option<&B>, epsilon: f64, relative: bool) -> bool
where
    A: Matrix + ?Sized,
    B: Matrix + ?Sized,
{
    let (m1, m2) = match (m1, m2) {
        (None, None) => return true,
        (Some(m1), Some(m2)) => (m1, m2),
        _ => return false,
    };
    if m1.num_row() != m2.num_row() || m1.num_col() != m2.num_col() {
        return false;
    }
    m1.elements()
        .iter()
        .zip(m2.elements().iter())
        .all(|(&v1, &v2)| {
            let mut tolerance = epsilon;
            if relative {
                tolerance *= v1.abs().max(v2.abs());
            }
            (v1 - v2).abs() <= tolerance || special_equal(v1, v2)
        })
}

/// Compares two matrices with the given strictness.
pub fn equals_with_mode<A, B>(m1: Option<&A>, m2: Option<&B>, mode: ComparisonMode) -> bool
where
    A: Matrix + ?Sized,
    B: Matrix + ?Sized,
{
    match mode {
        ComparisonMode::Strict => strict_equals(m1, m2),
        ComparisonMode::ByContract | ComparisonMode::IgnoreMetadata => equals(m1, m2, 0.0, false),
        ComparisonMode::Approximate | ComparisonMode::Debug => {
            equals(m1, m2, COMPARISON_THRESHOLD, true)
        }
    }
}

/// Same representation, same shape and bit-identical elements.
fn strict_equals<A, B>(m1: Option<&A>, m2: Option<&B>) -> bool
where
    A: Matrix + ?Sized,
    B: Matrix + ?Sized,
{
    let (m1, m2) = match (m1, m2) {
        (None, None) => return true,
        (Some(m1), Some(m2)) => (m1, m2),
        _ => return false,
    };
    let (a1, a2) = (m1.as_any(), m2.as_any());
    if let (Some(x), Some(y)) = (a1.downcast_ref::<AnyMatrix>(), a2.downcast_ref::<AnyMatrix>()) {
        return x == y;
    }
    a1.type_id() == a2.type_id()
        && m1.num_row() == m2.num_row()
        && m1.num_col() == m2.num_col()
        && m1
            .elements()
            .iter()
            .zip(m2.elements().iter())
            .all(|(a, b)| a.to_bits() == b.to_bits())
}

/// `a × b`, computed element by element.
pub fn multiply(a: &dyn Matrix, b: &dyn Matrix) -> Result<AnyMatrix, MatrixError> {
    let (num_row, shared, num_col) = (a.num_row(), a.num_col(), b.num_col());
    if b.num_row() != shared {
        return Err(MatrixError::MismatchedSize {
            expected: shared,
            num_row: b.num_row(),
            num_col,
        });
    }
    let (ea, eb) = (a.elements(), b.elements());
    let mut product = vec![0.0; num_row * num_col];
    for j in 0..num_row {
        for i in 0..num_col {
            product[j * num_col + i] = (0..shared)
                .map(|k| ea[j * shared + k] * eb[k * num_col + i])
                .sum();
        }
    }
    create(num_row, num_col, &product)
}

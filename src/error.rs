use thiserror::Error;

#[derive(Error, Debug)]
pub enum GeorefError {
    #[error("Matrix error: {0}")]
    Matrix(#[from] MatrixError),

    #[error("Projection error: {0}")]
    Projection(#[from] ProjError),

    #[error("Comparison error: {0}")]
    Comparison(#[from] ComparisonError),
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum MatrixError {
    #[error("Index ({row}, {column}) is out of bounds for a {num_row}×{num_col} matrix")]
    IndexOutOfBounds {
        row: usize,
        column: usize,
        num_row: usize,
        num_col: usize,
    },

    #[error("Index {index} is out of range [0, {bound})")]
    IndexOutOfRange { index: usize, bound: usize },

    #[error("Expected an array of length {expected}, got {actual}")]
    MismatchedLength { expected: usize, actual: usize },

    #[error("Mismatched matrix size: expected {expected} rows, got a {num_row}×{num_col} matrix")]
    MismatchedSize {
        expected: usize,
        num_row: usize,
        num_col: usize,
    },

    #[error("Matrix is not invertible")]
    NonInvertible,

    #[error("Can not map an axis from the source to the {0} direction")]
    AxisNotFound(String),

    #[error("Axis directions {source_axis} and {target_axis} are colinear")]
    ColinearAxes {
        source_axis: String,
        target_axis: String,
    },

    #[error("Mismatched dimension for {name}: expected {expected}, got {actual}")]
    MismatchedDimension {
        name: &'static str,
        expected: usize,
        actual: usize,
    },

    #[error("Illegal argument: {0}")]
    IllegalArgument(String),
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ProjError {
    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    #[error("No convergence while computing the latitude")]
    NoConvergence,

    #[error("Mismatched dimension: expected {expected}, got {actual}")]
    MismatchedDimension { expected: usize, actual: usize },

    #[error("Coordinate buffer too small: need {required} values, got {actual}")]
    BufferTooSmall { required: usize, actual: usize },

    #[error("Matrix error in projection: {0}")]
    Matrix(#[from] MatrixError),
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ComparisonError {
    #[error("Unknown comparison mode: {0}")]
    UnknownMode(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    fn invert_singular() -> Result<(), GeorefError> {
        let singular: Result<(), MatrixError> = Err(MatrixError::NonInvertible);
        singular?;
        Ok(())
    }

    #[test]
    fn test_umbrella_wraps_sources() {
        let err = invert_singular().unwrap_err();
        assert!(matches!(err, GeorefError::Matrix(MatrixError::NonInvertible)));
        assert_eq!(err.to_string(), "Matrix error: Matrix is not invertible");

        let err: GeorefError = ProjError::from(MatrixError::NonInvertible).into();
        assert_eq!(
            err.to_string(),
            "Projection error: Matrix error in projection: Matrix is not invertible"
        );
    }
}

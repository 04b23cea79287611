//! Axis-aligned n-dimensional extents.

use crate::error::MatrixError;

/// An envelope defined by its lower and upper corners.
#[derive(Clone, Debug, PartialEq)]
pub struct Envelope {
    lower: Vec<f64>,
    upper: Vec<f64>,
}

impl Envelope {
    /// Both corners must have the same dimension.
    pub fn new(lower: Vec<f64>, upper: Vec<f64>) -> Result<Self, MatrixError> {
        if lower.len() != upper.len() {
            return Err(MatrixError::MismatchedDimension {
                name: "upper",
                expected: lower.len(),
                actual: upper.len(),
            });
        }
        Ok(Self { lower, upper })
    }

    /// Creates an envelope from `(minimum, maximum)` pairs, one per dimension.
    pub fn from_ranges(ranges: &[(f64, f64)]) -> Self {
        let (lower, upper) = ranges.iter().copied().unzip();
        Self { lower, upper }
    }

    pub fn dimension(&self) -> usize {
        self.lower.len()
    }

    pub fn minimum(&self, dimension: usize) -> f64 {
        self.lower[dimension]
    }

    pub fn maximum(&self, dimension: usize) -> f64 {
        self.upper[dimension]
    }

    pub fn span(&self, dimension: usize) -> f64 {
        self.upper[dimension] - self.lower[dimension]
    }
}

use tracing::debug;

use crate::error::ProjError;
use crate::matrix::Matrix;
use crate::transform::{ensure_capacity, MathTransform, ProjectiveTransform};

/// A chain of transforms applied one after the other.
#[derive(Debug)]
pub struct ConcatenatedTransform {
    steps: Vec<Box<dyn MathTransform>>,
}

impl ConcatenatedTransform {
    /// The steps in the order they are applied.
    pub fn steps(&self) -> &[Box<dyn MathTransform>] {
        &self.steps
    }
}

/// Chains the given transforms, simplifying the chain on the way:
///
/// - identity steps are dropped,
/// - adjacent linear steps are merged into a single matrix product.
///
/// Returns the single remaining step unwrapped when the chain reduces to one
/// transform, or an identity transform when every step was dropped.
pub fn concatenate(steps: Vec<Box<dyn MathTransform>>) -> Result<Box<dyn MathTransform>, ProjError> {
    let dimension = match steps.first() {
        Some(first) => first.source_dimensions(),
        None => {
            return Err(ProjError::InvalidParameter(
                "can not concatenate an empty list of transforms".into(),
            ))
        }
    };
    let mut target = dimension;
    let mut merged: Vec<Box<dyn MathTransform>> = Vec::with_capacity(steps.len());
    for step in steps {
        if step.source_dimensions() != target {
            return Err(ProjError::MismatchedDimension {
                expected: target,
                actual: step.source_dimensions(),
            });
        }
        target = step.target_dimensions();
        if step.is_identity() {
            debug!("Dropped an identity step of dimension {target}");
            continue;
        }
        let product = match (merged.last().and_then(|last| last.as_linear()), step.as_linear()) {
            (Some(first), Some(second)) => Some(second.matrix().multiply(first.matrix())?),
            _ => None,
        };
        match product {
            Some(matrix) => {
                debug!(
                    "Concatenated two linear steps into a {}×{} matrix",
                    matrix.num_row(),
                    matrix.num_col()
                );
                merged.pop();
                let linear = ProjectiveTransform::new(matrix)?;
                if !linear.is_identity() {
                    merged.push(Box::new(linear));
                }
            }
            None => merged.push(step),
        }
    }
    match merged.len() {
        0 => Ok(Box::new(ProjectiveTransform::identity(dimension))),
        1 => Ok(merged.remove(0)),
        _ => Ok(Box::new(ConcatenatedTransform { steps: merged })),
    }
}

impl MathTransform for ConcatenatedTransform {
    fn source_dimensions(&self) -> usize {
        self.steps.first().map_or(0, |s| s.source_dimensions())
    }

    fn target_dimensions(&self) -> usize {
        self.steps.last().map_or(0, |s| s.target_dimensions())
    }

    fn is_identity(&self) -> bool {
        self.steps.iter().all(|s| s.is_identity())
    }

    fn transform_array(
        &self,
        src: &[f64],
        dst: &mut [f64],
        num_pts: usize,
    ) -> Result<(), ProjError> {
        let src_len = num_pts * self.source_dimensions();
        let dst_len = num_pts * self.target_dimensions();
        ensure_capacity(src.len(), src_len)?;
        ensure_capacity(dst.len(), dst_len)?;
        let mut buffer = src[..src_len].to_vec();
        for step in &self.steps {
            let mut out = vec![0.0; num_pts * step.target_dimensions()];
            step.transform_array(&buffer, &mut out, num_pts)?;
            buffer = out;
        }
        dst[..dst_len].copy_from_slice(&buffer);
        Ok(())
    }

    fn inverse(&self) -> Result<Box<dyn MathTransform>, ProjError> {
        let steps = self
            .steps
            .iter()
            .rev()
            .map(|s| s.inverse())
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Box::new(ConcatenatedTransform { steps }))
    }

    fn boxed_clone(&self) -> Box<dyn MathTransform> {
        Box::new(ConcatenatedTransform {
            steps: self.steps.iter().map(|s| s.boxed_clone()).collect(),
        })
    }
}

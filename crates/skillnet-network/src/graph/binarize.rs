//! Thresholding the association matrix into a 0/1 course × skill matrix.

use nalgebra::DMatrix;
use skillnet_core::{AnalysisError, AssociationMatrix, Result};

/// A course × skill matrix whose cells are exactly 0.0 or 1.0.
///
/// Stored as `f64` so the projection is a plain matrix product.
#[derive(Debug, Clone, PartialEq)]
pub struct BinarizedMatrix {
    cells: DMatrix<f64>,
    threshold: f64,
}

impl BinarizedMatrix {
    #[must_use]
    pub const fn cells(&self) -> &DMatrix<f64> {
        &self.cells
    }

    #[must_use]
    pub const fn threshold(&self) -> f64 {
        self.threshold
    }

    /// Number of cells that passed the threshold.
    #[must_use]
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    pub fn passing_count(&self) -> usize {
        self.cells.sum() as usize
    }
}

/// Binarize `matrix` at `threshold`.
///
/// A cell becomes 0 when it is below `threshold` or exactly zero, and 1
/// otherwise. A zero cell therefore stays 0 even at a non-positive
/// threshold, and a NaN cell, which is neither, becomes 1.
///
/// # Errors
///
/// Returns [`AnalysisError::InvalidThreshold`] if `threshold` is NaN or infinite.
pub fn binarize(matrix: &AssociationMatrix, threshold: f64) -> Result<BinarizedMatrix> {
    if !threshold.is_finite() {
        return Err(AnalysisError::InvalidThreshold(threshold));
    }

    let cells = matrix
        .values()
        .map(|v| if v < threshold || v == 0.0 { 0.0 } else { 1.0 });

    Ok(BinarizedMatrix { cells, threshold })
}

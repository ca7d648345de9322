//! Ordinary least squares via SVD.
//!
//! The closed-form solver goes through the normal equations. This is the
//! reference it is checked against at `λ = 0`:
//!
//! ```text
//! minimize Σ (y_i - φ_iᵀ w)²
//! ```
//!
//! Nalgebra's `QR::solve` is intended for square systems, so tall design
//! matrices go through `SVD::solve` instead.

use nalgebra::{DMatrix, DVector};

use crate::error::FitError;

/// Solve `min ‖Φw - y‖²` using SVD.
pub fn solve_least_squares(design: &DMatrix<f64>, labels: &DVector<f64>) -> Result<DVector<f64>, FitError> {
    if design.nrows() != labels.len() {
        return Err(FitError::mismatch("labels", labels.len(), design.nrows()));
    }

    let svd = design.clone().svd(true, true);
    let w = svd
        .solve(labels, 1e-12)
        .map_err(|e| FitError::linalg(format!("SVD least squares failed: {e}")))?;

    if w.iter().all(|v| v.is_finite()) {
        Ok(w)
    } else {
        Err(FitError::linalg("SVD least squares produced non-finite weights"))
    }
}

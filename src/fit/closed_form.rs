//! Ridge regression via the regularized normal equations.
//!
//! ```text
//! w = (ΦᵀΦ + λI)⁻¹ Φᵀ y
//! ```
//!
//! A singular `ΦᵀΦ + λI` is a terminal failure for the run (typically `λ = 0`
//! with collinear basis columns); it is reported, not retried.

use nalgebra::{DMatrix, DVector};

use crate::domain::ClosedFormFit;
use crate::error::FitError;
use crate::math::{invert, rmse};

pub fn solve_closed_form(
    design: &DMatrix<f64>,
    labels: &DVector<f64>,
    lambda: f64,
    num_basis: usize,
) -> Result<ClosedFormFit, FitError> {
    if design.ncols() != num_basis {
        return Err(FitError::mismatch("design columns", design.ncols(), num_basis));
    }
    if design.nrows() != labels.len() {
        return Err(FitError::mismatch("labels", labels.len(), design.nrows()));
    }
    if design.nrows() == 0 {
        return Err(FitError::config("closed-form solver needs at least one training sample"));
    }
    if !(lambda.is_finite() && lambda >= 0.0) {
        return Err(FitError::config(format!("lambda must be finite and >= 0 (got {lambda})")));
    }

    let design_t = design.transpose();
    let gram = &design_t * design + DMatrix::<f64>::identity(num_basis, num_basis) * lambda;
    let gram_inv = invert(&gram, "regularized normal-equations matrix")?;
    let weights = gram_inv * (&design_t * labels);

    let train_rmse = rmse(design, &weights, labels)?;
    Ok(ClosedFormFit {
        weights,
        train_rmse,
    })
}

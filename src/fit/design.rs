//! Design-matrix construction for the Gaussian RBF expansion.
//!
//! Column 0 is the bias term (always 1). Column `j > 0` evaluates
//! `exp(-0.5 · (x - μ_j)ᵀ Σ⁻¹ (x - μ_j))` against basis center `μ_j`; center
//! row 0 is a placeholder and is never evaluated.
//!
//! `Σ` is the diagonal of per-feature training variances plus `ε·I`. It is
//! estimated once from the training split, and the same `Σ⁻¹` and centers are
//! used to expand validation and test data so all splits share one feature
//! space.

use nalgebra::{DMatrix, DVector};

use crate::cluster::CenterSelector;
use crate::domain::{BasisCenters, CovarianceMetric};
use crate::error::FitError;
use crate::math::{gaussian_rbf, invert};

/// Ridge added to the variance diagonal so constant features stay invertible.
pub const COVARIANCE_EPSILON: f64 = 0.001;

/// Everything derived from the training split in one run.
#[derive(Debug, Clone, PartialEq)]
pub struct TrainingDesign {
    pub design: DMatrix<f64>,
    pub metric: CovarianceMetric,
    pub centers: BasisCenters,
}

/// Estimate `Σ = diag(var) + εI` from training inputs and invert it.
pub fn covariance_metric(train: &DMatrix<f64>) -> Result<CovarianceMetric, FitError> {
    let n = train.nrows();
    if n == 0 {
        return Err(FitError::config("cannot estimate feature variance from zero training rows"));
    }
    if train.ncols() == 0 {
        return Err(FitError::config("training inputs have no feature columns"));
    }

    // Population variance (divide by n), per feature column.
    let variance = DVector::from_iterator(
        train.ncols(),
        train.column_iter().map(|col| {
            let mean = col.mean();
            col.iter().map(|v| (v - mean) * (v - mean)).sum::<f64>() / n as f64
        }),
    );

    let covariance = DMatrix::from_diagonal(&variance.add_scalar(COVARIANCE_EPSILON));
    let inverse = invert(&covariance, "covariance matrix")?;
    Ok(CovarianceMetric {
        covariance,
        inverse,
    })
}

/// Expand `inputs` against existing training-derived metric and centers.
///
/// Zero-row inputs yield a `0 × K` matrix.
pub fn build_design(
    inputs: &DMatrix<f64>,
    metric: &CovarianceMetric,
    centers: &BasisCenters,
) -> Result<DMatrix<f64>, FitError> {
    if inputs.ncols() != metric.dim() {
        return Err(FitError::mismatch("input features", inputs.ncols(), metric.dim()));
    }
    if centers.dim() != metric.dim() {
        return Err(FitError::mismatch("center width", centers.dim(), metric.dim()));
    }

    let k = centers.len();
    let center_rows: Vec<DVector<f64>> = (0..k)
        .map(|j| centers.matrix().row(j).transpose())
        .collect();

    let mut design = DMatrix::<f64>::zeros(inputs.nrows(), k);
    let mut row = vec![0.0; k];
    for i in 0..inputs.nrows() {
        let x = inputs.row(i).transpose();
        fill_design_row(&x, metric.inverse(), &center_rows, &mut row);
        for (j, v) in row.iter().enumerate() {
            design[(i, j)] = *v;
        }
    }
    Ok(design)
}

/// Fill one design row: bias first, then one kernel value per real center.
fn fill_design_row(x: &DVector<f64>, sigma_inv: &DMatrix<f64>, centers: &[DVector<f64>], out: &mut [f64]) {
    out[0] = 1.0;
    for j in 1..centers.len() {
        out[j] = gaussian_rbf(x, &centers[j], sigma_inv);
    }
}

/// Build the training design matrix, selecting `k` centers by clustering.
pub fn build_training_design(
    train: &DMatrix<f64>,
    k: usize,
    selector: &CenterSelector,
) -> Result<TrainingDesign, FitError> {
    let metric = covariance_metric(train)?;
    let centers = selector.select(train, k)?;
    let design = build_design(train, &metric, &centers)?;
    log::debug!(
        "built {}x{} training design matrix",
        design.nrows(),
        design.ncols()
    );
    Ok(TrainingDesign {
        design,
        metric,
        centers,
    })
}

/// Build the training design matrix around caller-supplied centers.
pub fn build_training_design_with_centers(
    train: &DMatrix<f64>,
    centers: BasisCenters,
) -> Result<TrainingDesign, FitError> {
    let metric = covariance_metric(train)?;
    let design = build_design(train, &metric, &centers)?;
    Ok(TrainingDesign {
        design,
        metric,
        centers,
    })
}

//! Root-mean-square error of a linear model over a design matrix.

use nalgebra::{DMatrix, DVector};

use crate::error::FitError;

/// `sqrt(mean((y - M·w)²))`.
///
/// Returns a configuration error for zero samples, since the mean is undefined.
pub fn rmse(design: &DMatrix<f64>, weights: &DVector<f64>, labels: &DVector<f64>) -> Result<f64, FitError> {
    if design.ncols() != weights.len() {
        return Err(FitError::mismatch("weights", weights.len(), design.ncols()));
    }
    if design.nrows() != labels.len() {
        return Err(FitError::mismatch("labels", labels.len(), design.nrows()));
    }
    if labels.is_empty() {
        return Err(FitError::config("cannot compute RMSE over zero samples"));
    }

    let prediction = design * weights;
    let sse: f64 = labels
        .iter()
        .zip(prediction.iter())
        .map(|(y, p)| (y - p) * (y - p))
        .sum();
    Ok((sse / labels.len() as f64).sqrt())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rmse_is_zero_for_exact_predictions() {
        let m = DMatrix::from_row_slice(3, 2, &[1.0, 0.0, 1.0, 1.0, 1.0, 2.0]);
        let w = DVector::from_row_slice(&[2.0, 3.0]);
        let y = DVector::from_row_slice(&[2.0, 5.0, 8.0]);
        assert_eq!(rmse(&m, &w, &y).unwrap(), 0.0);
    }

    #[test]
    fn rmse_matches_hand_computation() {
        let m = DMatrix::from_row_slice(2, 1, &[1.0, 1.0]);
        let w = DVector::from_row_slice(&[0.0]);
        let y = DVector::from_row_slice(&[3.0, -4.0]);
        // sqrt((9 + 16) / 2)
        let e = rmse(&m, &w, &y).unwrap();
        assert!((e - 12.5_f64.sqrt()).abs() < 1e-12);
        assert!(e >= 0.0);
    }

    #[test]
    fn rmse_reports_dimension_mismatch() {
        let m = DMatrix::<f64>::zeros(3, 2);
        let err = rmse(&m, &DVector::zeros(3), &DVector::zeros(3)).unwrap_err();
        assert_eq!(err, FitError::mismatch("weights", 3, 2));
        let err = rmse(&m, &DVector::zeros(2), &DVector::zeros(4)).unwrap_err();
        assert_eq!(err, FitError::mismatch("labels", 4, 3));
    }

    #[test]
    fn rmse_rejects_empty_input() {
        let m = DMatrix::<f64>::zeros(0, 2);
        assert!(rmse(&m, &DVector::zeros(2), &DVector::zeros(0)).unwrap_err().is_configuration());
    }
}

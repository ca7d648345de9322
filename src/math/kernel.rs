//! Gaussian radial basis function under a shared Mahalanobis-style metric.
//!
//! For a sample `x`, center `μ` and inverse covariance `Σ⁻¹`:
//!
//! - `q = (x - μ)ᵀ Σ⁻¹ (x - μ)`
//! - `φ(x) = exp(-q / 2)`

use nalgebra::{DMatrix, DVector};

/// Quadratic form `δᵀ A δ` with `δ = x - center`.
///
/// Both vectors must have length `a.nrows()`; callers check shapes up front.
pub fn quadratic_form(x: &DVector<f64>, center: &DVector<f64>, a: &DMatrix<f64>) -> f64 {
    let delta = x - center;
    (a * &delta).dot(&delta)
}

/// `exp(-0.5 · δᵀ Σ⁻¹ δ)`.
pub fn gaussian_rbf(x: &DVector<f64>, center: &DVector<f64>, sigma_inv: &DMatrix<f64>) -> f64 {
    (-0.5 * quadratic_form(x, center, sigma_inv)).exp()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rbf_is_one_at_its_center() {
        let x = DVector::from_row_slice(&[0.3, -1.2]);
        let sigma_inv = DMatrix::from_diagonal_element(2, 2, 4.0);
        assert_eq!(gaussian_rbf(&x, &x, &sigma_inv), 1.0);
    }

    #[test]
    fn rbf_decays_with_distance() {
        let c = DVector::from_row_slice(&[0.0]);
        let sigma_inv = DMatrix::identity(1, 1);
        let near = gaussian_rbf(&DVector::from_row_slice(&[0.5]), &c, &sigma_inv);
        let far = gaussian_rbf(&DVector::from_row_slice(&[2.0]), &c, &sigma_inv);
        assert!(near > far && far > 0.0);
        assert!((far - (-2.0_f64).exp()).abs() < 1e-15);
    }

    #[test]
    fn quadratic_form_uses_metric_scaling() {
        let x = DVector::from_row_slice(&[1.0, 2.0]);
        let c = DVector::from_row_slice(&[0.0, 0.0]);
        let a = DMatrix::from_diagonal(&DVector::from_row_slice(&[2.0, 0.5]));
        // 2·1 + 0.5·4
        assert!((quadratic_form(&x, &c, &a) - 4.0).abs() < 1e-12);
    }
}

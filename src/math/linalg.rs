//! Checked matrix inversion.
//!
//! nalgebra's `try_inverse` only reports exact singularity. Nearly singular
//! inputs can still "succeed" with overflowing entries, so we also reject any
//! non-finite result rather than let NaNs leak into the design matrix or the
//! weights.

use nalgebra::DMatrix;

use crate::error::FitError;

/// Invert a square matrix, failing with `LinearAlgebra` if it is singular.
pub fn invert(m: &DMatrix<f64>, what: &str) -> Result<DMatrix<f64>, FitError> {
    if !m.is_square() {
        return Err(FitError::linalg(format!(
            "{what} is not square ({}x{})",
            m.nrows(),
            m.ncols()
        )));
    }
    if m.iter().any(|v| !v.is_finite()) {
        return Err(FitError::linalg(format!("{what} contains non-finite entries")));
    }

    let inv = m
        .clone()
        .try_inverse()
        .ok_or_else(|| FitError::linalg(format!("{what} is singular")))?;

    if inv.iter().all(|v| v.is_finite()) {
        Ok(inv)
    } else {
        Err(FitError::linalg(format!("{what} is numerically singular")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn inverts_diagonal() {
        let m = DMatrix::from_row_slice(2, 2, &[2.0, 0.0, 0.0, 4.0]);
        let inv = invert(&m, "test matrix").unwrap();
        assert!((inv[(0, 0)] - 0.5).abs() < 1e-15);
        assert!((inv[(1, 1)] - 0.25).abs() < 1e-15);
    }

    #[test]
    fn singular_matrix_is_linear_algebra_error() {
        let m = DMatrix::from_row_slice(2, 2, &[1.0, 2.0, 2.0, 4.0]);
        let err = invert(&m, "gram matrix").unwrap_err();
        assert!(err.is_linear_algebra());
        assert!(err.to_string().contains("gram matrix"));
    }
}

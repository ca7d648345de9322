//! Seeded synthetic regression data.
//!
//! Inputs are drawn uniformly from `[0, 1]^dim` and the target is a smooth
//! nonlinear surface plus Gaussian noise:
//!
//! `y = Σ_j sin(2π x_j) + ε`, `ε ~ N(0, noise_std²)`
//!
//! This gives the RBF expansion something to fit that a purely linear model
//! cannot, which is what RMSE-vs-complexity sweeps need.

use std::f64::consts::TAU;

use nalgebra::{DMatrix, DVector};
use rand::Rng;
use rand_distr::{Distribution, Normal, Uniform};

use crate::domain::Dataset;
use crate::error::FitError;

pub fn noisy_sinusoid<R: Rng + ?Sized>(
    n: usize,
    dim: usize,
    noise_std: f64,
    rng: &mut R,
) -> Result<Dataset, FitError> {
    if dim == 0 {
        return Err(FitError::config("synthetic data needs at least one feature"));
    }
    if !(noise_std.is_finite() && noise_std >= 0.0) {
        return Err(FitError::config(format!(
            "noise_std must be finite and >= 0 (got {noise_std})"
        )));
    }
    let noise = Normal::new(0.0, noise_std)
        .map_err(|e| FitError::config(format!("invalid noise level {noise_std}: {e}")))?;
    let unit = Uniform::new(0.0, 1.0);

    let mut inputs = DMatrix::<f64>::zeros(n, dim);
    let mut labels = DVector::<f64>::zeros(n);
    for i in 0..n {
        let mut y = 0.0;
        for j in 0..dim {
            let x = unit.sample(rng);
            inputs[(i, j)] = x;
            y += (TAU * x).sin();
        }
        labels[i] = y + noise.sample(rng);
    }

    Dataset::new(inputs, labels)
}

//! Stochastic gradient descent with an adaptive learning rate.
//!
//! Per sample `i` (in a freshly shuffled order every pass):
//!
//! ```text
//! r  = y_i - w·φ_i
//! g  = -r φ_i + λ w
//! w' = w - η g
//! ```
//!
//! The step size adapts after every sample: if `sqrt(|‖w'‖² - ‖w‖²|)` is below
//! the stability threshold, `η` is boosted, otherwise it is degraded.
//!
//! Termination: a pass limit (`max_passes`) caps runtime even when the
//! relative-error criterion has not been met. The error delta after the first
//! pass is reset to the sentinel, so the tolerance check can first stop the
//! loop after pass two.

use nalgebra::{DMatrix, DVector};
use rand::Rng;
use rand_distr::{Distribution, Uniform};

use crate::data::shuffle_paired;
use crate::domain::{SgdConfig, SgdFit, TrainingTrace};
use crate::error::FitError;
use crate::math::rmse;

pub fn solve_sgd<R: Rng + ?Sized>(
    design: &DMatrix<f64>,
    labels: &DVector<f64>,
    lambda: f64,
    num_basis: usize,
    config: &SgdConfig,
    rng: &mut R,
) -> Result<SgdFit, FitError> {
    if design.ncols() != num_basis {
        return Err(FitError::mismatch("design columns", design.ncols(), num_basis));
    }
    if design.nrows() != labels.len() {
        return Err(FitError::mismatch("labels", labels.len(), design.nrows()));
    }
    if design.nrows() == 0 || num_basis == 0 {
        return Err(FitError::config("SGD solver needs a non-empty design matrix"));
    }
    if !(lambda.is_finite() && lambda >= 0.0) {
        return Err(FitError::config(format!("lambda must be finite and >= 0 (got {lambda})")));
    }
    config.validate()?;

    let n = labels.len();
    let mut phi = design.clone();
    let mut y = labels.clone();

    let init = Uniform::new_inclusive(-1.0, 1.0);
    let mut w = DVector::from_iterator(num_basis, (0..num_basis).map(|_| init.sample(rng)));

    let mut eta = config.initial_learning_rate;
    let mut passes = 0usize;
    let mut delta_error = config.delta_sentinel;
    let mut previous_error = 0.0;
    let mut train_rmse = f64::NAN;
    let mut trace = TrainingTrace {
        learning_rates: Vec::with_capacity(config.max_passes * n),
        errors: Vec::with_capacity(config.max_passes * n),
    };

    while delta_error > config.tolerance && passes < config.max_passes {
        shuffle_paired(&mut phi, &mut y, rng)?;

        for i in 0..n {
            trace.errors.push(rmse(&phi, &w, &y)?);

            let row = phi.row(i).transpose();
            trace.learning_rates.push(eta);
            let next = sgd_step(&w, &row, y[i], lambda, eta);
            eta = adapt_learning_rate(eta, &w, &next, config);
            w = next;
        }

        train_rmse = rmse(&phi, &w, &y)?;
        if passes == 0 {
            previous_error = train_rmse;
            delta_error = config.delta_sentinel;
        } else {
            delta_error = previous_error - train_rmse;
            previous_error = train_rmse;
        }
        log::debug!(
            "sgd pass {}: rmse={train_rmse:.6} delta={delta_error:.3e} eta={eta:.3e}",
            passes + 1
        );
        passes += 1;
    }

    if !train_rmse.is_finite() || w.iter().any(|v| !v.is_finite()) {
        return Err(FitError::linalg(format!(
            "SGD diverged after {passes} passes (non-finite weights or error)"
        )));
    }

    Ok(SgdFit {
        weights: w,
        train_rmse,
        passes,
        trace,
    })
}

/// One regularized squared-error step on a single sample:
/// `w - η(-(y - w·φ)φ + λw)`.
fn sgd_step(w: &DVector<f64>, row: &DVector<f64>, label: f64, lambda: f64, eta: f64) -> DVector<f64> {
    let residual = label - w.dot(row);
    let gradient = -residual * row + lambda * w;
    w - eta * gradient
}

/// Boost `η` when the step left the weight norm nearly unchanged, degrade it
/// otherwise.
fn adapt_learning_rate(eta: f64, previous: &DVector<f64>, next: &DVector<f64>, config: &SgdConfig) -> f64 {
    let norm_change = (next.norm_squared() - previous.norm_squared()).abs().sqrt();
    if norm_change < config.stability_threshold {
        eta * config.boost_factor
    } else {
        eta * config.degrade_factor
    }
}

//! Shared domain types.
//!
//! Matrix-valued types (`Dataset`, `CovarianceMetric`, `BasisCenters`) stay
//! in-memory only. Configuration and result types are serializable so an
//! external reporting layer can persist or plot them.

use nalgebra::{DMatrix, DVector};
use serde::{Deserialize, Serialize};

use crate::error::FitError;

/// Labeled samples: one input row per label.
#[derive(Debug, Clone, PartialEq)]
pub struct Dataset {
    inputs: DMatrix<f64>,
    labels: DVector<f64>,
}

impl Dataset {
    /// Pair an input matrix (rows = samples) with its label vector.
    pub fn new(inputs: DMatrix<f64>, labels: DVector<f64>) -> Result<Self, FitError> {
        if inputs.nrows() != labels.len() {
            return Err(FitError::mismatch("labels", labels.len(), inputs.nrows()));
        }
        if inputs.iter().any(|v| !v.is_finite()) {
            return Err(FitError::config("input matrix contains non-finite values"));
        }
        if labels.iter().any(|v| !v.is_finite()) {
            return Err(FitError::config("label vector contains non-finite values"));
        }
        Ok(Self { inputs, labels })
    }

    /// Build a dataset from row vectors. All rows must share one width.
    pub fn from_rows(rows: &[Vec<f64>], labels: &[f64]) -> Result<Self, FitError> {
        let dim = rows.first().map_or(0, Vec::len);
        if let Some(bad) = rows.iter().find(|r| r.len() != dim) {
            return Err(FitError::mismatch("row width", bad.len(), dim));
        }
        let inputs = DMatrix::from_fn(rows.len(), dim, |i, j| rows[i][j]);
        Self::new(inputs, DVector::from_column_slice(labels))
    }

    /// An empty dataset with `dim` feature columns.
    pub fn empty(dim: usize) -> Self {
        Self {
            inputs: DMatrix::zeros(0, dim),
            labels: DVector::zeros(0),
        }
    }

    pub fn inputs(&self) -> &DMatrix<f64> {
        &self.inputs
    }

    pub fn labels(&self) -> &DVector<f64> {
        &self.labels
    }

    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    /// Number of raw feature columns.
    pub fn dim(&self) -> usize {
        self.inputs.ncols()
    }

    pub fn into_parts(self) -> (DMatrix<f64>, DVector<f64>) {
        (self.inputs, self.labels)
    }
}

/// A train / validation / test partition of one dataset.
#[derive(Debug, Clone, PartialEq)]
pub struct Split {
    pub train: Dataset,
    pub validation: Dataset,
    pub test: Dataset,
}

impl Split {
    /// `(train_data, train_labels, valid_data, valid_labels, test_data, test_labels)`.
    #[allow(clippy::type_complexity)]
    pub fn into_parts(
        self,
    ) -> (
        DMatrix<f64>,
        DVector<f64>,
        DMatrix<f64>,
        DVector<f64>,
        DMatrix<f64>,
        DVector<f64>,
    ) {
        let (train_data, train_labels) = self.train.into_parts();
        let (valid_data, valid_labels) = self.validation.into_parts();
        let (test_data, test_labels) = self.test.into_parts();
        (
            train_data,
            train_labels,
            valid_data,
            valid_labels,
            test_data,
            test_labels,
        )
    }
}

/// Diagonal covariance estimate of the training inputs and its inverse.
///
/// Built once per training run and reused unchanged for every held-out design
/// matrix of that run.
#[derive(Debug, Clone, PartialEq)]
pub struct CovarianceMetric {
    pub(crate) covariance: DMatrix<f64>,
    pub(crate) inverse: DMatrix<f64>,
}

impl CovarianceMetric {
    pub fn covariance(&self) -> &DMatrix<f64> {
        &self.covariance
    }

    /// `Σ⁻¹`, the matrix used in the RBF quadratic form.
    pub fn inverse(&self) -> &DMatrix<f64> {
        &self.inverse
    }

    pub fn dim(&self) -> usize {
        self.inverse.nrows()
    }
}

/// `K` basis centers, one per row. Row 0 is the bias slot and is never
/// evaluated as a kernel.
#[derive(Debug, Clone, PartialEq)]
pub struct BasisCenters(DMatrix<f64>);

impl BasisCenters {
    pub fn new(centers: DMatrix<f64>) -> Result<Self, FitError> {
        if centers.nrows() == 0 {
            return Err(FitError::config("at least one basis center is required"));
        }
        if centers.iter().any(|v| !v.is_finite()) {
            return Err(FitError::linalg("basis centers contain non-finite values"));
        }
        Ok(Self(centers))
    }

    pub fn from_rows(rows: &[Vec<f64>]) -> Result<Self, FitError> {
        let dim = rows.first().map_or(0, Vec::len);
        if let Some(bad) = rows.iter().find(|r| r.len() != dim) {
            return Err(FitError::mismatch("center width", bad.len(), dim));
        }
        Self::new(DMatrix::from_fn(rows.len(), dim, |i, j| rows[i][j]))
    }

    pub fn matrix(&self) -> &DMatrix<f64> {
        &self.0
    }

    /// Number of basis functions `K` (bias included).
    pub fn len(&self) -> usize {
        self.0.nrows()
    }

    pub fn is_empty(&self) -> bool {
        self.0.nrows() == 0
    }

    pub fn dim(&self) -> usize {
        self.0.ncols()
    }
}

/// Fractions used to partition a dataset. The test fraction is the remainder.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SplitConfig {
    pub train_fraction: f64,
    pub validation_fraction: f64,
}

impl Default for SplitConfig {
    fn default() -> Self {
        Self {
            train_fraction: 0.8,
            validation_fraction: 0.1,
        }
    }
}

impl SplitConfig {
    pub fn validate(&self) -> Result<(), FitError> {
        let (t, v) = (self.train_fraction, self.validation_fraction);
        if !(t.is_finite() && v.is_finite() && (0.0..=1.0).contains(&t) && (0.0..=1.0).contains(&v)) {
            return Err(FitError::config(format!(
                "split fractions must lie in [0, 1] (train={t}, validation={v})"
            )));
        }
        if t + v > 1.0 + 1e-12 {
            return Err(FitError::config(format!(
                "train + validation fractions exceed 1 (train={t}, validation={v})"
            )));
        }
        Ok(())
    }
}

/// Adaptive step-size SGD settings.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SgdConfig {
    pub initial_learning_rate: f64,
    /// Multiplier applied when a step barely changes the weight norm.
    pub boost_factor: f64,
    /// Multiplier applied otherwise.
    pub degrade_factor: f64,
    /// Hard cap on passes over the data.
    pub max_passes: usize,
    /// Minimum error improvement between passes to keep going.
    pub tolerance: f64,
    /// Weight-norm change below which a step counts as stable.
    pub stability_threshold: f64,
    /// Delta value that forces another pass.
    pub delta_sentinel: f64,
}

/// Upper bound on `SgdConfig::max_passes`.
pub const MAX_SGD_PASSES: usize = 5;

impl Default for SgdConfig {
    fn default() -> Self {
        Self {
            initial_learning_rate: 1.0,
            boost_factor: 1.25,
            degrade_factor: 0.8,
            max_passes: MAX_SGD_PASSES,
            tolerance: 1e-5,
            stability_threshold: 1e-4,
            delta_sentinel: 100_000.0,
        }
    }
}

impl SgdConfig {
    pub fn validate(&self) -> Result<(), FitError> {
        let positive = [
            ("initial_learning_rate", self.initial_learning_rate),
            ("boost_factor", self.boost_factor),
            ("degrade_factor", self.degrade_factor),
            ("stability_threshold", self.stability_threshold),
        ];
        for (name, value) in positive {
            if !(value.is_finite() && value > 0.0) {
                return Err(FitError::config(format!("{name} must be finite and > 0 (got {value})")));
            }
        }
        if !(self.tolerance.is_finite() && self.tolerance >= 0.0) {
            return Err(FitError::config("tolerance must be finite and >= 0"));
        }
        if self.delta_sentinel.is_nan() || self.delta_sentinel <= self.tolerance {
            return Err(FitError::config("delta_sentinel must exceed tolerance"));
        }
        if self.max_passes == 0 || self.max_passes > MAX_SGD_PASSES {
            return Err(FitError::config(format!(
                "max_passes must be in 1..={MAX_SGD_PASSES} (got {})",
                self.max_passes
            )));
        }
        Ok(())
    }
}

/// Which solver fits the weights.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Solver {
    #[default]
    ClosedForm,
    Sgd(SgdConfig),
}

/// One (λ, K) configuration.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TrainConfig {
    /// `K`, bias column included.
    pub num_basis: usize,
    pub lambda: f64,
    pub solver: Solver,
}

impl TrainConfig {
    pub fn validate(&self) -> Result<(), FitError> {
        if self.num_basis == 0 {
            return Err(FitError::config("num_basis must be >= 1"));
        }
        if !(self.lambda.is_finite() && self.lambda >= 0.0) {
            return Err(FitError::config(format!(
                "lambda must be finite and >= 0 (got {})",
                self.lambda
            )));
        }
        if let Solver::Sgd(cfg) = &self.solver {
            cfg.validate()?;
        }
        Ok(())
    }
}

/// Grid of configurations evaluated over one shared split.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SweepConfig {
    pub split: SplitConfig,
    pub lambdas: Vec<f64>,
    pub basis_counts: Vec<usize>,
    pub solver: Solver,
    pub seed: u64,
}

impl Default for SweepConfig {
    fn default() -> Self {
        Self {
            split: SplitConfig::default(),
            lambdas: vec![0.0, 0.1, 1.0],
            basis_counts: (2..=10).collect(),
            solver: Solver::ClosedForm,
            seed: 0,
        }
    }
}

/// Per-sample history of an SGD run, accumulated over all passes.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TrainingTrace {
    pub learning_rates: Vec<f64>,
    /// Training RMSE recorded before each sample's update.
    pub errors: Vec<f64>,
}

/// Output of the closed-form solver.
#[derive(Debug, Clone, PartialEq)]
pub struct ClosedFormFit {
    pub weights: DVector<f64>,
    pub train_rmse: f64,
}

/// Output of the SGD solver.
#[derive(Debug, Clone, PartialEq)]
pub struct SgdFit {
    pub weights: DVector<f64>,
    pub train_rmse: f64,
    pub passes: usize,
    pub trace: TrainingTrace,
}

/// Errors of one (λ, K) trial, as consumed by RMSE-vs-complexity plots.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrialResult {
    pub lambda: f64,
    pub num_basis: usize,
    pub train_rmse: f64,
    /// `None` when the validation split is empty.
    pub validation_rmse: Option<f64>,
    pub test_rmse: Option<f64>,
}

/// A trial that was aborted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrialFailure {
    pub lambda: f64,
    pub num_basis: usize,
    pub reason: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dataset_rejects_label_mismatch() {
        let err = Dataset::new(DMatrix::zeros(3, 2), DVector::zeros(2)).unwrap_err();
        assert_eq!(err, FitError::mismatch("labels", 2, 3));
    }

    #[test]
    fn dataset_rejects_ragged_rows() {
        let rows = vec![vec![1.0, 2.0], vec![3.0]];
        assert!(Dataset::from_rows(&rows, &[1.0, 2.0]).unwrap_err().is_configuration());
    }

    #[test]
    fn dataset_rejects_nan() {
        let rows = vec![vec![1.0, f64::NAN]];
        assert!(Dataset::from_rows(&rows, &[1.0]).is_err());
    }

    #[test]
    fn split_config_checks_sum() {
        assert!(SplitConfig::default().validate().is_ok());
        let bad = SplitConfig {
            train_fraction: 0.8,
            validation_fraction: 0.3,
        };
        assert!(bad.validate().unwrap_err().is_configuration());
        let full = SplitConfig {
            train_fraction: 0.7,
            validation_fraction: 0.3,
        };
        assert!(full.validate().is_ok());
    }

    #[test]
    fn default_sgd_config_matches_reference_constants() {
        let cfg = SgdConfig::default();
        assert_eq!(cfg.max_passes, 5);
        assert_eq!(cfg.boost_factor, 1.25);
        assert_eq!(cfg.degrade_factor, 0.8);
        assert!(cfg.validate().is_ok());
    }

    #[test]
    fn sgd_pass_cap_is_bounded() {
        for max_passes in [0, MAX_SGD_PASSES + 1, 50] {
            let cfg = SgdConfig {
                max_passes,
                ..SgdConfig::default()
            };
            assert!(cfg.validate().unwrap_err().is_configuration());
        }
        let capped = SgdConfig {
            max_passes: MAX_SGD_PASSES,
            ..SgdConfig::default()
        };
        assert!(capped.validate().is_ok());
    }

    #[test]
    fn train_config_rejects_zero_basis() {
        let cfg = TrainConfig {
            num_basis: 0,
            lambda: 0.1,
            solver: Solver::ClosedForm,
        };
        assert!(cfg.validate().is_err());
    }
}

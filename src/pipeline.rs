//! One training run, end to end.
//!
//! train split -> covariance metric + basis centers -> design matrices ->
//! solver -> weights -> RMSE on train / validation / test.
//!
//! The metric and centers estimated on the training split are owned by the
//! resulting `TrainedModel` and reused unchanged for every later expansion,
//! so held-out errors are measured in the training feature space.

use nalgebra::{DMatrix, DVector};
use rand::Rng;

use crate::cluster::CenterSelector;
use crate::domain::{
    BasisCenters, CovarianceMetric, Dataset, Solver, Split, TrainConfig, TrainingTrace, TrialResult,
};
use crate::error::FitError;
use crate::fit::{
    TrainingDesign, build_design, build_training_design, build_training_design_with_centers,
    solve_closed_form, solve_sgd,
};
use crate::math::rmse;

/// A fitted RBF regression model.
#[derive(Debug, Clone, PartialEq)]
pub struct TrainedModel {
    pub config: TrainConfig,
    pub metric: CovarianceMetric,
    pub centers: BasisCenters,
    pub weights: DVector<f64>,
    pub train_rmse: f64,
    /// SGD passes executed (`None` for the closed-form solver).
    pub passes: Option<usize>,
    /// SGD learning-rate / error history (`None` for the closed-form solver).
    pub trace: Option<TrainingTrace>,
}

impl TrainedModel {
    /// Expand new inputs with this model's training metric and centers.
    pub fn design(&self, inputs: &DMatrix<f64>) -> Result<DMatrix<f64>, FitError> {
        build_design(inputs, &self.metric, &self.centers)
    }

    pub fn predict(&self, inputs: &DMatrix<f64>) -> Result<DVector<f64>, FitError> {
        Ok(self.design(inputs)? * &self.weights)
    }

    /// RMSE over a held-out dataset, or `None` if it has no rows.
    pub fn rmse(&self, data: &Dataset) -> Result<Option<f64>, FitError> {
        if data.is_empty() {
            return Ok(None);
        }
        let design = self.design(data.inputs())?;
        rmse(&design, &self.weights, data.labels()).map(Some)
    }
}

/// Fit a model on `train`, choosing `config.num_basis` centers by clustering.
pub fn train<R: Rng + ?Sized>(
    train: &Dataset,
    config: &TrainConfig,
    selector: &CenterSelector,
    rng: &mut R,
) -> Result<TrainedModel, FitError> {
    check_training_input(train, config)?;
    let td = build_training_design(train.inputs(), config.num_basis, selector)?;
    fit_weights(td, train.labels(), config, rng)
}

/// Fit a model on `train` around fixed, caller-supplied centers.
pub fn train_with_centers<R: Rng + ?Sized>(
    train: &Dataset,
    centers: BasisCenters,
    config: &TrainConfig,
    rng: &mut R,
) -> Result<TrainedModel, FitError> {
    check_training_input(train, config)?;
    if centers.len() != config.num_basis {
        return Err(FitError::mismatch("basis centers", centers.len(), config.num_basis));
    }
    let td = build_training_design_with_centers(train.inputs(), centers)?;
    fit_weights(td, train.labels(), config, rng)
}

/// Train on `split.train` and report errors on every split.
pub fn run_trial<R: Rng + ?Sized>(
    split: &Split,
    config: &TrainConfig,
    selector: &CenterSelector,
    rng: &mut R,
) -> Result<TrialResult, FitError> {
    let model = train(&split.train, config, selector, rng)?;
    let validation_rmse = model.rmse(&split.validation)?;
    let test_rmse = model.rmse(&split.test)?;

    log::info!(
        "trial lambda={} k={}: train={:.6} validation={}",
        config.lambda,
        config.num_basis,
        model.train_rmse,
        validation_rmse.map_or_else(|| "-".to_string(), |v| format!("{v:.6}"))
    );

    Ok(TrialResult {
        lambda: config.lambda,
        num_basis: config.num_basis,
        train_rmse: model.train_rmse,
        validation_rmse,
        test_rmse,
    })
}

fn check_training_input(train: &Dataset, config: &TrainConfig) -> Result<(), FitError> {
    config.validate()?;
    if train.is_empty() {
        return Err(FitError::config("training split is empty"));
    }
    Ok(())
}

fn fit_weights<R: Rng + ?Sized>(
    td: TrainingDesign,
    labels: &DVector<f64>,
    config: &TrainConfig,
    rng: &mut R,
) -> Result<TrainedModel, FitError> {
    let TrainingDesign {
        design,
        metric,
        centers,
    } = td;

    let (weights, train_rmse, passes, trace) = match &config.solver {
        Solver::ClosedForm => {
            let fit = solve_closed_form(&design, labels, config.lambda, config.num_basis)?;
            (fit.weights, fit.train_rmse, None, None)
        }
        Solver::Sgd(sgd) => {
            let fit = solve_sgd(&design, labels, config.lambda, config.num_basis, sgd, rng)?;
            (fit.weights, fit.train_rmse, Some(fit.passes), Some(fit.trace))
        }
    };

    Ok(TrainedModel {
        config: *config,
        metric,
        centers,
        weights,
        train_rmse,
        passes,
        trace,
    })
}

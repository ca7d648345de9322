//! λ × K sweep for RMSE-vs-complexity curves.
//!
//! The dataset is partitioned once, then every `(λ, K)` pair is trained on the
//! same split. Trials are independent and run in parallel; each gets its own
//! RNG derived from the sweep seed and its grid index, so results do not
//! depend on thread scheduling. A trial that fails is recorded and the sweep
//! carries on with the rest of the grid.

use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};

use rand::SeedableRng;
use rand::rngs::StdRng;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::cluster::CenterSelector;
use crate::data::split_dataset;
use crate::domain::{Dataset, SweepConfig, TrainConfig, TrialFailure, TrialResult};
use crate::error::FitError;
use crate::pipeline::run_trial;

/// Outcome of a sweep, in grid order (λ-major, then K).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SweepReport {
    pub trials: Vec<TrialResult>,
    pub failures: Vec<TrialFailure>,
}

impl SweepReport {
    /// Successful trials for one λ, ordered by `K`.
    pub fn curve(&self, lambda: f64) -> Vec<&TrialResult> {
        let mut out: Vec<&TrialResult> = self.trials.iter().filter(|t| t.lambda == lambda).collect();
        out.sort_by_key(|t| t.num_basis);
        out
    }

    /// The trial with the lowest validation RMSE. Ties keep the earliest in
    /// grid order.
    pub fn best(&self) -> Option<&TrialResult> {
        let mut best: Option<(&TrialResult, f64)> = None;
        for trial in &self.trials {
            let Some(v) = trial.validation_rmse else {
                continue;
            };
            if best.is_none_or(|(_, b)| v < b) {
                best = Some((trial, v));
            }
        }
        best.map(|(t, _)| t)
    }
}

pub fn run_sweep(
    dataset: &Dataset,
    config: &SweepConfig,
    selector: &CenterSelector,
) -> Result<SweepReport, FitError> {
    if config.lambdas.is_empty() || config.basis_counts.is_empty() {
        return Err(FitError::config("sweep needs at least one lambda and one basis count"));
    }

    let mut rng = StdRng::seed_from_u64(config.seed);
    let split = split_dataset(dataset, &config.split, &mut rng)?;

    let grid: Vec<TrainConfig> = config
        .lambdas
        .iter()
        .flat_map(|&lambda| {
            config.basis_counts.iter().map(move |&num_basis| TrainConfig {
                num_basis,
                lambda,
                solver: config.solver,
            })
        })
        .collect();

    let outcomes: Vec<(TrainConfig, Result<TrialResult, FitError>)> = grid
        .par_iter()
        .enumerate()
        .map(|(idx, trial)| {
            let mut rng = StdRng::seed_from_u64(trial_seed(config.seed, idx));
            (*trial, run_trial(&split, trial, selector, &mut rng))
        })
        .collect();

    let mut report = SweepReport::default();
    for (trial, outcome) in outcomes {
        match outcome {
            Ok(result) => report.trials.push(result),
            Err(err) => {
                log::warn!(
                    "aborted trial lambda={} k={}: {err}",
                    trial.lambda,
                    trial.num_basis
                );
                report.failures.push(TrialFailure {
                    lambda: trial.lambda,
                    num_basis: trial.num_basis,
                    reason: err.to_string(),
                });
            }
        }
    }

    log::info!(
        "sweep finished: {} trials, {} failures",
        report.trials.len(),
        report.failures.len()
    );
    Ok(report)
}

fn trial_seed(seed: u64, idx: usize) -> u64 {
    let mut hasher = DefaultHasher::new();
    seed.hash(&mut hasher);
    idx.hash(&mut hasher);
    hasher.finish()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::noisy_sinusoid;
    use crate::domain::{SgdConfig, Solver, SplitConfig};

    fn data() -> Dataset {
        noisy_sinusoid(50, 1, 0.1, &mut StdRng::seed_from_u64(99)).unwrap()
    }

    #[test]
    fn sweep_covers_the_grid_in_order() {
        let config = SweepConfig {
            lambdas: vec![0.1, 1.0],
            basis_counts: vec![2, 4, 6],
            ..SweepConfig::default()
        };
        let report = run_sweep(&data(), &config, &CenterSelector::default()).unwrap();
        assert!(report.failures.is_empty());
        assert_eq!(report.trials.len(), 6);
        assert_eq!(report.trials[0].lambda, 0.1);
        assert_eq!(report.trials[3].lambda, 1.0);

        let curve = report.curve(1.0);
        let ks: Vec<usize> = curve.iter().map(|t| t.num_basis).collect();
        assert_eq!(ks, vec![2, 4, 6]);
        assert!(curve.iter().all(|t| t.validation_rmse.is_some()));
        assert!(report.best().is_some());
    }

    #[test]
    fn sweep_is_reproducible_for_a_seed() {
        let config = SweepConfig {
            lambdas: vec![0.1],
            basis_counts: vec![3, 5],
            solver: Solver::Sgd(SgdConfig::default()),
            seed: 7,
            ..SweepConfig::default()
        };
        let a = run_sweep(&data(), &config, &CenterSelector::default()).unwrap();
        let b = run_sweep(&data(), &config, &CenterSelector::default()).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn failing_trial_is_recorded_not_fatal() {
        let config = SweepConfig {
            split: SplitConfig {
                train_fraction: 0.1,
                validation_fraction: 0.5,
            },
            lambdas: vec![0.1],
            // Train split has 5 rows: K = 20 cannot be clustered.
            basis_counts: vec![2, 20],
            ..SweepConfig::default()
        };
        let report = run_sweep(&data(), &config, &CenterSelector::default()).unwrap();
        assert_eq!(report.trials.len(), 1);
        assert_eq!(report.failures.len(), 1);
        assert_eq!(report.failures[0].num_basis, 20);
        assert!(report.failures[0].reason.contains("configuration"));
    }

    #[test]
    fn empty_grid_is_rejected() {
        let config = SweepConfig {
            lambdas: vec![],
            ..SweepConfig::default()
        };
        assert!(run_sweep(&data(), &config, &CenterSelector::default()).is_err());
    }

    #[test]
    fn best_prefers_lowest_validation_error() {
        let mk = |k, v| TrialResult {
            lambda: 0.1,
            num_basis: k,
            train_rmse: 0.0,
            validation_rmse: v,
            test_rmse: None,
        };
        let report = SweepReport {
            trials: vec![mk(2, Some(0.5)), mk(3, None), mk(4, Some(0.2)), mk(5, Some(0.2))],
            failures: vec![],
        };
        assert_eq!(report.best().unwrap().num_basis, 4);
    }

    #[test]
    fn report_serializes_for_plotting() {
        let report = SweepReport {
            trials: vec![TrialResult {
                lambda: 0.1,
                num_basis: 3,
                train_rmse: 0.25,
                validation_rmse: Some(0.3),
                test_rmse: None,
            }],
            failures: vec![],
        };
        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["trials"][0]["num_basis"], 3);
        assert_eq!(json["trials"][0]["validation_rmse"], 0.3);
        assert!(json["trials"][0]["test_rmse"].is_null());
    }
}

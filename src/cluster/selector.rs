//! Primary/fallback dispatch for basis-center selection.

use nalgebra::DMatrix;

use super::{ClusterError, Clusterer, KMeans, Lloyd};
use crate::domain::BasisCenters;
use crate::error::FitError;

/// Chooses `K` basis centers from training inputs.
///
/// The fallback is tried only when the primary reports a recoverable
/// `ClusterError`. Invalid requests and malformed outputs are returned as-is.
pub struct CenterSelector {
    primary: Box<dyn Clusterer>,
    fallback: Box<dyn Clusterer>,
}

impl Default for CenterSelector {
    fn default() -> Self {
        Self::new(KMeans::default(), Lloyd::default())
    }
}

impl std::fmt::Debug for CenterSelector {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CenterSelector")
            .field("primary", &self.primary.name())
            .field("fallback", &self.fallback.name())
            .finish()
    }
}

impl CenterSelector {
    pub fn new(primary: impl Clusterer + 'static, fallback: impl Clusterer + 'static) -> Self {
        Self {
            primary: Box::new(primary),
            fallback: Box::new(fallback),
        }
    }

    pub fn select(&self, train: &DMatrix<f64>, k: usize) -> Result<BasisCenters, FitError> {
        let n = train.nrows();
        if k == 0 || k > n {
            return Err(FitError::config(format!(
                "number of basis functions must be in [1, {n}] for {n} training points (got {k})"
            )));
        }

        let centers = match self.primary.cluster(train, k) {
            Ok(centers) => centers,
            Err(err) if err.is_recoverable() => {
                log::warn!(
                    "{} failed ({err}); falling back to {}",
                    self.primary.name(),
                    self.fallback.name()
                );
                self.fallback
                    .cluster(train, k)
                    .map_err(ClusterError::into_fit_error)?
            }
            Err(err) => return Err(err.into_fit_error()),
        };

        if centers.nrows() != k {
            return Err(FitError::mismatch("cluster centers", centers.nrows(), k));
        }
        if centers.ncols() != train.ncols() {
            return Err(FitError::mismatch("center width", centers.ncols(), train.ncols()));
        }
        BasisCenters::new(centers)
    }
}

//! Basis-center selection by clustering.
//!
//! Clustering is a pluggable capability (`Clusterer`): partition `N` points
//! into `K` clusters and return the `K` centers. `CenterSelector` runs a
//! primary clusterer and, only for the recoverable failure kinds of
//! `ClusterError`, retries with a fallback that has the same contract.

pub mod kmeans;
pub mod lloyd;
pub mod selector;

pub use kmeans::*;
pub use lloyd::*;
pub use selector::*;

use nalgebra::DMatrix;

use crate::error::FitError;

/// Partition `points` (one per row) into `k` clusters and return the centers
/// (one per row, `k × dim`).
pub trait Clusterer: Send + Sync {
    fn name(&self) -> &'static str;

    fn cluster(&self, points: &DMatrix<f64>, k: usize) -> Result<DMatrix<f64>, ClusterError>;
}

/// Why a clusterer could not produce centers.
#[derive(Debug, Clone, PartialEq)]
pub enum ClusterError {
    /// The data cannot support this clusterer's strategy (e.g. fewer distinct
    /// points than clusters). Recoverable by the fallback.
    Degenerate(String),
    /// Center updates produced non-finite values. Recoverable by the fallback.
    Numerical(String),
    /// The request itself is invalid; any clusterer would fail the same way.
    InvalidInput(FitError),
}

impl ClusterError {
    /// Whether a different clusterer might still succeed.
    pub fn is_recoverable(&self) -> bool {
        matches!(self, Self::Degenerate(_) | Self::Numerical(_))
    }

    pub fn into_fit_error(self) -> FitError {
        match self {
            Self::Degenerate(msg) => FitError::Configuration(msg),
            Self::Numerical(msg) => FitError::LinearAlgebra(msg),
            Self::InvalidInput(err) => err,
        }
    }
}

impl std::fmt::Display for ClusterError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Degenerate(msg) => write!(f, "degenerate clustering input: {msg}"),
            Self::Numerical(msg) => write!(f, "clustering diverged: {msg}"),
            Self::InvalidInput(err) => write!(f, "{err}"),
        }
    }
}

impl std::error::Error for ClusterError {}

/// Shared precondition check: `1 <= k <= n`.
pub(crate) fn check_request(points: &DMatrix<f64>, k: usize) -> Result<(), ClusterError> {
    let n = points.nrows();
    if k == 0 || k > n {
        return Err(ClusterError::InvalidInput(FitError::config(format!(
            "cannot form {k} clusters from {n} points (need 1 <= k <= n)"
        ))));
    }
    Ok(())
}

pub(crate) fn squared_distance(points: &DMatrix<f64>, i: usize, centers: &DMatrix<f64>, c: usize) -> f64 {
    points
        .row(i)
        .iter()
        .zip(centers.row(c).iter())
        .map(|(a, b)| (a - b) * (a - b))
        .sum()
}

/// Assign every point to its nearest center. Returns labels and inertia
/// (sum of squared distances to the assigned centers).
pub(crate) fn assign(points: &DMatrix<f64>, centers: &DMatrix<f64>) -> (Vec<usize>, f64) {
    let mut labels = Vec::with_capacity(points.nrows());
    let mut inertia = 0.0;
    for i in 0..points.nrows() {
        let mut best = 0;
        let mut best_d = f64::INFINITY;
        for c in 0..centers.nrows() {
            let d = squared_distance(points, i, centers, c);
            if d < best_d {
                best = c;
                best_d = d;
            }
        }
        labels.push(best);
        inertia += best_d;
    }
    (labels, inertia)
}

/// Mean of each cluster's members. Clusters with no members keep the row from
/// `previous`; their indices are returned so callers can relocate them.
pub(crate) fn recompute_centers(
    points: &DMatrix<f64>,
    labels: &[usize],
    previous: &DMatrix<f64>,
) -> (DMatrix<f64>, Vec<usize>) {
    let k = previous.nrows();
    let mut sums = DMatrix::<f64>::zeros(k, points.ncols());
    let mut counts = vec![0usize; k];
    for (i, &c) in labels.iter().enumerate() {
        let mut row = sums.row_mut(c);
        row += points.row(i);
        counts[c] += 1;
    }

    let mut empty = Vec::new();
    for c in 0..k {
        if counts[c] == 0 {
            sums.set_row(c, &previous.row(c));
            empty.push(c);
        } else {
            let mut row = sums.row_mut(c);
            row /= counts[c] as f64;
        }
    }
    (sums, empty)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn assign_picks_nearest_center() {
        let points = DMatrix::from_row_slice(3, 1, &[0.0, 0.9, 5.0]);
        let centers = DMatrix::from_row_slice(2, 1, &[0.0, 4.0]);
        let (labels, inertia) = assign(&points, &centers);
        assert_eq!(labels, vec![0, 0, 1]);
        assert!((inertia - (0.81 + 1.0)).abs() < 1e-12);
    }

    #[test]
    fn recompute_keeps_empty_cluster_in_place() {
        let points = DMatrix::from_row_slice(2, 1, &[1.0, 3.0]);
        let previous = DMatrix::from_row_slice(2, 1, &[0.0, 10.0]);
        let (centers, empty) = recompute_centers(&points, &[0, 0], &previous);
        assert_eq!(centers[(0, 0)], 2.0);
        assert_eq!(centers[(1, 0)], 10.0);
        assert_eq!(empty, vec![1]);
    }

    #[test]
    fn only_degenerate_and_numerical_are_recoverable() {
        assert!(ClusterError::Degenerate("x".into()).is_recoverable());
        assert!(ClusterError::Numerical("x".into()).is_recoverable());
        assert!(!ClusterError::InvalidInput(FitError::config("x")).is_recoverable());
        assert!(ClusterError::Numerical("x".into()).into_fit_error().is_linear_algebra());
    }
}

//! Primary clusterer: k-means++ seeding followed by Lloyd iterations, restarted
//! `n_init` times and keeping the lowest-inertia run.
//!
//! Determinism: every call reseeds its own `StdRng` from `seed`, so the same
//! training inputs always produce the same centers regardless of the caller's
//! random source.

use nalgebra::DMatrix;
use rand::Rng;
use rand::SeedableRng;
use rand::distributions::WeightedIndex;
use rand::rngs::StdRng;
use rand_distr::Distribution;

use super::{ClusterError, Clusterer, assign, check_request, recompute_centers, squared_distance};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct KMeans {
    pub seed: u64,
    pub n_init: usize,
    pub max_iter: usize,
    /// Convergence threshold on total squared center shift, relative to the
    /// mean per-feature variance of the data.
    pub tolerance: f64,
}

impl Default for KMeans {
    fn default() -> Self {
        Self {
            seed: 0,
            n_init: 10,
            max_iter: 300,
            tolerance: 1e-4,
        }
    }
}

impl Clusterer for KMeans {
    fn name(&self) -> &'static str {
        "k-means++"
    }

    fn cluster(&self, points: &DMatrix<f64>, k: usize) -> Result<DMatrix<f64>, ClusterError> {
        check_request(points, k)?;

        let mut rng = StdRng::seed_from_u64(self.seed);
        let shift_tol = self.tolerance * mean_variance(points);

        let mut best: Option<(DMatrix<f64>, f64)> = None;
        for _ in 0..self.n_init.max(1) {
            let init = plus_plus_init(points, k, &mut rng)?;
            let (centers, inertia) = self.refine(points, init, shift_tol)?;
            let better = best.as_ref().is_none_or(|(_, b)| inertia < *b);
            if better {
                best = Some((centers, inertia));
            }
        }

        best.map(|(centers, _)| centers)
            .ok_or_else(|| ClusterError::Degenerate("no k-means run completed".to_string()))
    }
}

impl KMeans {
    fn refine(
        &self,
        points: &DMatrix<f64>,
        mut centers: DMatrix<f64>,
        shift_tol: f64,
    ) -> Result<(DMatrix<f64>, f64), ClusterError> {
        for _ in 0..self.max_iter {
            let (labels, _) = assign(points, &centers);
            let (mut next, empty) = recompute_centers(points, &labels, &centers);
            relocate_empty(points, &mut next, &empty);

            if next.iter().any(|v| !v.is_finite()) {
                return Err(ClusterError::Numerical(
                    "k-means produced non-finite centers".to_string(),
                ));
            }

            let shift = (&next - &centers).norm_squared();
            centers = next;
            if shift <= shift_tol {
                break;
            }
        }

        let (_, inertia) = assign(points, &centers);
        Ok((centers, inertia))
    }
}

/// k-means++: first center uniform, each next one drawn with probability
/// proportional to the squared distance from the nearest chosen center.
fn plus_plus_init<R: Rng + ?Sized>(
    points: &DMatrix<f64>,
    k: usize,
    rng: &mut R,
) -> Result<DMatrix<f64>, ClusterError> {
    let n = points.nrows();
    let mut centers = DMatrix::<f64>::zeros(k, points.ncols());
    centers.set_row(0, &points.row(rng.gen_range(0..n)));

    let mut nearest: Vec<f64> = (0..n).map(|i| squared_distance(points, i, &centers, 0)).collect();
    for c in 1..k {
        let pick = WeightedIndex::new(&nearest).map_err(|_| {
            ClusterError::Degenerate(format!("fewer than {k} distinct points to seed k-means++"))
        })?;
        centers.set_row(c, &points.row(pick.sample(rng)));
        for (i, d) in nearest.iter_mut().enumerate() {
            *d = d.min(squared_distance(points, i, &centers, c));
        }
    }
    Ok(centers)
}

/// Move each empty cluster onto the point currently farthest from its center.
fn relocate_empty(points: &DMatrix<f64>, centers: &mut DMatrix<f64>, empty: &[usize]) {
    for &c in empty {
        let (labels, _) = assign(points, centers);
        let far = (0..points.nrows())
            .map(|i| (i, squared_distance(points, i, centers, labels[i])))
            .max_by(|a, b| a.1.partial_cmp(&b.1).unwrap_or(std::cmp::Ordering::Equal));
        if let Some((i, _)) = far {
            centers.set_row(c, &points.row(i));
        }
    }
}

fn mean_variance(points: &DMatrix<f64>) -> f64 {
    let n = points.nrows() as f64;
    if points.ncols() == 0 || n == 0.0 {
        return 0.0;
    }
    let total: f64 = points
        .column_iter()
        .map(|col| {
            let mean = col.mean();
            col.iter().map(|v| (v - mean) * (v - mean)).sum::<f64>() / n
        })
        .sum();
    total / points.ncols() as f64
}

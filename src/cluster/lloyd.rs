//! Fallback clusterer: plain Lloyd iterations from a deterministic start.
//!
//! Initial centers are `k` rows spread evenly through the input order. Empty
//! clusters keep their previous center, so the method succeeds on any input
//! with `1 <= k <= n`, including data with repeated points.

use nalgebra::DMatrix;

use super::{ClusterError, Clusterer, assign, check_request, recompute_centers};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Lloyd {
    pub max_iter: usize,
}

impl Default for Lloyd {
    fn default() -> Self {
        Self { max_iter: 300 }
    }
}

impl Clusterer for Lloyd {
    fn name(&self) -> &'static str {
        "lloyd"
    }

    fn cluster(&self, points: &DMatrix<f64>, k: usize) -> Result<DMatrix<f64>, ClusterError> {
        check_request(points, k)?;

        let n = points.nrows();
        let start: Vec<usize> = (0..k).map(|c| c * n / k).collect();
        let mut centers = points.select_rows(start.iter());
        let mut labels: Option<Vec<usize>> = None;

        for _ in 0..self.max_iter {
            let (next_labels, _) = assign(points, &centers);
            if labels.as_ref() == Some(&next_labels) {
                break;
            }
            let (next, _) = recompute_centers(points, &next_labels, &centers);
            if next.iter().any(|v| !v.is_finite()) {
                return Err(ClusterError::Numerical(
                    "lloyd iteration produced non-finite centers".to_string(),
                ));
            }
            centers = next;
            labels = Some(next_labels);
        }

        Ok(centers)
    }
}

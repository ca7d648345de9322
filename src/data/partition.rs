//! Shuffle-and-split of labeled data.
//!
//! Inputs and labels are never concatenated. A single index permutation is
//! drawn and applied to both structures, so every label stays attached to its
//! row.

use nalgebra::{DMatrix, DVector};
use rand::Rng;
use rand::seq::SliceRandom;

use crate::domain::{Dataset, Split, SplitConfig};
use crate::error::FitError;

/// A uniformly random permutation of `0..n`.
pub fn permutation<R: Rng + ?Sized>(n: usize, rng: &mut R) -> Vec<usize> {
    let mut idx: Vec<usize> = (0..n).collect();
    idx.shuffle(rng);
    idx
}

/// Reorder `inputs` rows and `labels` entries by one shared permutation.
pub fn shuffle_paired<R: Rng + ?Sized>(
    inputs: &mut DMatrix<f64>,
    labels: &mut DVector<f64>,
    rng: &mut R,
) -> Result<(), FitError> {
    if inputs.nrows() != labels.len() {
        return Err(FitError::mismatch("labels", labels.len(), inputs.nrows()));
    }
    let perm = permutation(labels.len(), rng);
    *inputs = inputs.select_rows(perm.iter());
    *labels = labels.select_rows(perm.iter());
    Ok(())
}

/// Sizes of the train and validation slices for `n` rows.
///
/// `floor(train_fraction · n)` and `floor(validation_fraction · n)`; the test
/// slice takes whatever is left.
pub fn split_sizes(n: usize, config: &SplitConfig) -> Result<(usize, usize), FitError> {
    config.validate()?;
    let train = ((config.train_fraction * n as f64).floor() as usize).min(n);
    let validation = ((config.validation_fraction * n as f64).floor() as usize).min(n - train);
    Ok((train, validation))
}

/// Shuffle a dataset and partition it into train / validation / test.
///
/// Empty slices are allowed here; components that need data reject them.
pub fn split_dataset<R: Rng + ?Sized>(
    dataset: &Dataset,
    config: &SplitConfig,
    rng: &mut R,
) -> Result<Split, FitError> {
    let n = dataset.len();
    let (train_len, validation_len) = split_sizes(n, config)?;
    let perm = permutation(n, rng);

    let take = |rows: &[usize]| -> Result<Dataset, FitError> {
        if rows.is_empty() {
            return Ok(Dataset::empty(dataset.dim()));
        }
        Dataset::new(
            dataset.inputs().select_rows(rows.iter()),
            dataset.labels().select_rows(rows.iter()),
        )
    };

    let split = Split {
        train: take(&perm[..train_len])?,
        validation: take(&perm[train_len..train_len + validation_len])?,
        test: take(&perm[train_len + validation_len..])?,
    };

    log::debug!(
        "split {n} rows into train={} validation={} test={}",
        split.train.len(),
        split.validation.len(),
        split.test.len()
    );

    Ok(split)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn indexed_dataset(n: usize) -> Dataset {
        // Row i is [i, 2i] with label i, so alignment is checkable after shuffling.
        let rows: Vec<Vec<f64>> = (0..n).map(|i| vec![i as f64, 2.0 * i as f64]).collect();
        let labels: Vec<f64> = (0..n).map(|i| i as f64).collect();
        Dataset::from_rows(&rows, &labels).unwrap()
    }

    fn assert_aligned(d: &Dataset) {
        for i in 0..d.len() {
            assert_eq!(d.inputs()[(i, 0)], d.labels()[i]);
            assert_eq!(d.inputs()[(i, 1)], 2.0 * d.labels()[i]);
        }
    }

    #[test]
    fn split_is_a_permutation_with_aligned_labels() {
        let mut rng = StdRng::seed_from_u64(7);
        let data = indexed_dataset(23);
        for (t, v) in [(0.8, 0.1), (0.5, 0.5), (1.0, 0.0), (0.0, 0.0), (0.33, 0.33)] {
            let cfg = SplitConfig {
                train_fraction: t,
                validation_fraction: v,
            };
            let split = split_dataset(&data, &cfg, &mut rng).unwrap();
            assert_eq!(split.train.len() + split.validation.len() + split.test.len(), 23);
            assert_eq!(split.train.len(), (t * 23.0_f64).floor() as usize);

            let mut seen: Vec<f64> = Vec::new();
            for part in [&split.train, &split.validation, &split.test] {
                assert_aligned(part);
                seen.extend(part.labels().iter().copied());
            }
            seen.sort_by(|a, b| a.partial_cmp(b).unwrap());
            let expected: Vec<f64> = (0..23).map(|i| i as f64).collect();
            assert_eq!(seen, expected);
        }
    }

    #[test]
    fn split_into_parts_orders_train_validation_test() {
        let mut rng = StdRng::seed_from_u64(1);
        let cfg = SplitConfig {
            train_fraction: 0.6,
            validation_fraction: 0.2,
        };
        let (td, tl, vd, vl, sd, sl) = split_dataset(&indexed_dataset(10), &cfg, &mut rng)
            .unwrap()
            .into_parts();
        assert_eq!((td.nrows(), tl.len()), (6, 6));
        assert_eq!((vd.nrows(), vl.len()), (2, 2));
        assert_eq!((sd.nrows(), sl.len()), (2, 2));
    }

    #[test]
    fn split_rejects_fractions_above_one() {
        let mut rng = StdRng::seed_from_u64(0);
        let cfg = SplitConfig {
            train_fraction: 0.9,
            validation_fraction: 0.2,
        };
        let err = split_dataset(&indexed_dataset(5), &cfg, &mut rng).unwrap_err();
        assert!(err.is_configuration());
    }

    #[test]
    fn same_seed_same_split() {
        let data = indexed_dataset(30);
        let cfg = SplitConfig::default();
        let a = split_dataset(&data, &cfg, &mut StdRng::seed_from_u64(42)).unwrap();
        let b = split_dataset(&data, &cfg, &mut StdRng::seed_from_u64(42)).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn shuffle_paired_keeps_rows_with_labels() {
        let (mut x, mut y) = indexed_dataset(12).into_parts();
        shuffle_paired(&mut x, &mut y, &mut StdRng::seed_from_u64(3)).unwrap();
        for i in 0..12 {
            assert_eq!(x[(i, 0)], y[i]);
        }
        let mut labels: Vec<f64> = y.iter().copied().collect();
        labels.sort_by(|a, b| a.partial_cmp(b).unwrap());
        assert_eq!(labels, (0..12).map(|i| i as f64).collect::<Vec<_>>());
    }

    #[test]
    fn shuffle_paired_rejects_mismatch() {
        let mut x = DMatrix::<f64>::zeros(3, 1);
        let mut y = DVector::<f64>::zeros(2);
        assert!(shuffle_paired(&mut x, &mut y, &mut StdRng::seed_from_u64(0)).is_err());
    }
}

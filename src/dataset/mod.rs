//! Datasets
//!
//! This module implements the dataset struct and the element traits shared by
//! all algorithm crates.
use ndarray::{Array1, Array2, ScalarOperand};

use num_traits::{AsPrimitive, FromPrimitive, NumAssignOps, NumCast, Signed};
use rand::distributions::uniform::SampleUniform;

use std::fmt;
use std::hash::Hash;
use std::iter::Sum;

mod impl_dataset;

/// Floating point numbers
///
/// This trait bound multiplexes the most common assumptions made about
/// floating point numbers and implements them for 32bit and 64bit floats.
/// Records are always made of floats, targets only for regression tasks.
pub trait Float:
    FromPrimitive
    + num_traits::Float
    + PartialOrd
    + Sync
    + Send
    + Default
    + fmt::Display
    + fmt::Debug
    + Signed
    + Sum
    + NumAssignOps
    + AsPrimitive<usize>
    + SampleUniform
    + ScalarOperand
    + approx::AbsDiffEq
{
    fn cast<T: NumCast>(x: T) -> Self {
        NumCast::from(x).unwrap()
    }
}

impl Float for f32 {}
impl Float for f64 {}

/// Discrete labels
///
/// Labels are countable, comparable and hashable. Comparability gives every
/// multi-class problem a canonical class ordering, which keeps confusion
/// matrices and one-vs-all decompositions stable between runs.
pub trait Label: PartialEq + Eq + Ord + Hash + Clone {}

impl Label for bool {}
impl Label for usize {}
impl Label for String {}
impl Label for &str {}

/// Dataset
///
/// The fundamental structure of in-memory tabular data. It owns a two
/// dimensional record matrix with dimensionality (nsamples, nfeatures), a
/// target vector with one label per sample and optional descriptive feature
/// names.
///
/// All row-reordering operations (shuffling, splitting, folding) move records
/// and targets together, so the sample-to-label association is never broken.
pub struct Dataset<F, L> {
    pub records: Array2<F>,
    pub targets: Array1<L>,

    feature_names: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::{array, Axis};
    use rand::{rngs::SmallRng, SeedableRng};

    #[test]
    fn dataset_implements_required_methods() {
        let dataset = Dataset::new(
            array![[1., 2., 3., 4.], [5., 6., 7., 8.], [9., 10., 11., 12.]],
            array![0usize, 1, 2],
        );

        assert_eq!(dataset.nsamples(), 3);
        assert_eq!(dataset.nfeatures(), 4);
        assert_eq!(dataset.labels(), vec![0, 1, 2]);
    }

    #[test]
    fn shuffle_keeps_row_label_pairing() {
        // every row carries its own index, so a broken pairing is visible
        let records = Array2::from_shape_fn((10, 2), |(i, _)| i as f64);
        let targets = Array1::from_shape_fn(10, |i| i);
        let dataset = Dataset::new(records, targets);

        let mut rng = SmallRng::seed_from_u64(3);
        let shuffled = dataset.shuffle(&mut rng);

        for (row, target) in shuffled
            .records()
            .axis_iter(Axis(0))
            .zip(shuffled.targets().iter())
        {
            assert_eq!(row[0] as usize, *target);
            assert_eq!(row[1] as usize, *target);
        }
    }

    #[test]
    fn shuffle_is_deterministic_for_a_fixed_seed() {
        let records = Array2::from_shape_fn((50, 3), |(i, j)| (i * 3 + j) as f64);
        let targets = Array1::from_shape_fn(50, |i| i % 3);
        let dataset = Dataset::new(records, targets);

        let first = dataset.shuffle(&mut SmallRng::seed_from_u64(42));
        let second = dataset.shuffle(&mut SmallRng::seed_from_u64(42));

        assert_eq!(first.targets(), second.targets());
        assert_eq!(first.records(), second.records());
    }

    #[test]
    fn split_with_ratio_partitions_all_samples() {
        let records = Array2::from_shape_fn((150, 4), |(i, j)| (i + j) as f64);
        let targets = Array1::from_shape_fn(150, |i| i / 50);
        let dataset = Dataset::new(records, targets);

        let (train, test) = dataset.split_with_ratio(0.8);
        assert_eq!(train.nsamples(), 120);
        assert_eq!(test.nsamples(), 30);
        assert_eq!(train.nfeatures(), 4);
        assert_eq!(test.nfeatures(), 4);
    }

    #[test]
    fn select_features_projects_columns() {
        let dataset = Dataset::new(
            array![[1., 2., 3., 4.], [5., 6., 7., 8.], [9., 10., 11., 12.]],
            array![0usize, 1, 2],
        )
        .with_feature_names(vec!["a", "b", "c", "d"]);

        let projected = dataset.select_features(&[2, 3]);

        assert_eq!(projected.nfeatures(), 2);
        assert_eq!(projected.records(), &array![[3., 4.], [7., 8.], [11., 12.]]);
        assert_eq!(projected.targets(), dataset.targets());
        assert_eq!(projected.feature_names(), &["c", "d"]);
    }

    #[test]
    fn datasets_have_k_fold() {
        let records =
            Array2::from_shape_vec((5, 2), vec![1., 1., 2., 2., 3., 3., 4., 4., 5., 5.]).unwrap();
        let targets = Array1::from_shape_vec(5, vec![1usize, 2, 3, 4, 5]).unwrap();
        let dataset = Dataset::new(records, targets);

        for (i, (train, val)) in dataset.fold(5).into_iter().enumerate() {
            assert_eq!(val.records().row(0)[0] as usize, i + 1);
            assert_eq!(val.targets()[0], i + 1);

            for j in 0..4 {
                assert!(train.records().row(j)[0] as usize != i + 1);
                assert!(train.targets()[j] != i + 1);
            }
        }
    }

    #[test]
    fn fold_remainder_stays_in_training_set() {
        // 5 samples in 2 folds leaves one remainder row, which must always
        // land on the training side
        let records = Array2::from_shape_fn((5, 2), |(i, _)| i as f64);
        let targets = Array1::from_shape_fn(5, |i| i);
        let dataset = Dataset::new(records, targets);

        let folds = dataset.fold(2);
        assert_eq!(folds.len(), 2);
        for (train, val) in folds {
            assert_eq!(val.nsamples(), 2);
            assert_eq!(train.nsamples(), 3);
            assert!(train.targets().iter().any(|t| *t == 4));
        }
    }

    #[test]
    #[should_panic]
    fn fold_panics_for_k_0() {
        let dataset = Dataset::new(Array2::<f64>::zeros((5, 2)), Array1::from_elem(5, 0usize));
        let _ = dataset.fold(0);
    }

    #[test]
    fn map_targets_relabels() {
        let dataset = Dataset::new(
            array![[1., 2.], [3., 4.], [5., 6.]],
            array![0usize, 1, 2],
        );

        let binary = dataset.map_targets(|t| *t == 2);
        assert_eq!(binary.targets(), &array![false, false, true]);
        assert_eq!(binary.labels(), vec![false, true]);
    }

    #[test]
    fn split_determinism_on_bundled_iris() {
        let first = ovalearn_datasets::iris().shuffle(&mut SmallRng::seed_from_u64(42));
        let second = ovalearn_datasets::iris().shuffle(&mut SmallRng::seed_from_u64(42));

        let (train_a, test_a) = first.split_with_ratio(0.8);
        let (train_b, test_b) = second.split_with_ratio(0.8);

        assert_eq!(train_a.nsamples(), 120);
        assert_eq!(test_a.nsamples(), 30);
        assert_eq!(train_a.targets(), train_b.targets());
        assert_eq!(test_a.targets(), test_b.targets());
        assert_eq!(train_a.records(), train_b.records());
        assert_eq!(test_a.records(), test_b.records());
    }
}

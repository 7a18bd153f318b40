//! Common metrics for performance evaluation of classifiers
//!
//! This module implements the confusion matrix and the scores derived from
//! its entries, like accuracy, precision, recall and the f-beta score.
use std::collections::HashMap;
use std::fmt;

use ndarray::prelude::*;
use ndarray::Data;

use crate::dataset::{Dataset, Float, Label};
use crate::error::{Error, Result};

/// Confusion matrix for multi-class evaluation
///
/// Predictions are cross-tabulated against the ground truth: rows correspond
/// to the true label, columns to the predicted label, both in the canonical
/// sorted class order. The diagonal entries are correct predictions, and all
/// entries sum to the number of compared samples.
pub struct ConfusionMatrix<L> {
    matrix: Array2<usize>,
    members: Vec<L>,
}

impl<L: Label> ConfusionMatrix<L> {
    /// Raw count matrix with dimensionality (nclasses, nclasses)
    pub fn matrix(&self) -> &Array2<usize> {
        &self.matrix
    }

    /// The classes, in the order of the matrix rows and columns
    pub fn members(&self) -> &[L] {
        &self.members
    }

    /// Fraction of correct predictions
    pub fn accuracy(&self) -> f32 {
        self.matrix.diag().sum() as f32 / self.matrix.sum() as f32
    }

    /// Calculate precision for every class
    pub fn precision(&self) -> Array1<f32> {
        let predicted = self.matrix.sum_axis(Axis(0));

        Array1::from_iter(
            self.matrix
                .diag()
                .iter()
                .zip(predicted.iter())
                .map(|(a, b)| if *b == 0 { 0.0 } else { *a as f32 / *b as f32 }),
        )
    }

    /// Calculate recall for every class
    pub fn recall(&self) -> Array1<f32> {
        let occurred = self.matrix.sum_axis(Axis(1));

        Array1::from_iter(
            self.matrix
                .diag()
                .iter()
                .zip(occurred.iter())
                .map(|(a, b)| if *b == 0 { 0.0 } else { *a as f32 / *b as f32 }),
        )
    }

    /// Return the f-beta score for every class
    pub fn f_score(&self, beta: f32) -> Array1<f32> {
        let sb = beta * beta;
        let precision = self.precision();
        let recall = self.recall();

        Array1::from_iter(precision.iter().zip(recall.iter()).map(|(p, r)| {
            if *p == 0.0 && *r == 0.0 {
                0.0
            } else {
                (1.0 + sb) * (p * r) / (sb * p + r)
            }
        }))
    }

    /// Return the f1 score for every class
    pub fn f1_score(&self) -> Array1<f32> {
        self.f_score(1.0)
    }
}

/// Print a confusion matrix
impl<L: fmt::Display> fmt::Debug for ConfusionMatrix<L> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let len = self.matrix.len_of(Axis(0));
        writeln!(f, "{}", "-".repeat(len * 6 + 1))?;

        for i in 0..len {
            write!(f, "| ")?;

            for j in 0..len {
                write!(f, "{:^3} | ", self.matrix[(i, j)])?;
            }
            writeln!(f)?;
        }

        write!(f, "{}", "-".repeat(len * 6 + 1))
    }
}

/// Cross-tabulate predictions against a ground truth
///
/// The classes of the matrix are the union of the labels occurring in the
/// prediction and the ground truth, sorted. Comparing sequences of different
/// lengths is an error.
pub trait ToConfusionMatrix<L, T> {
    fn confusion_matrix(&self, ground_truth: T) -> Result<ConfusionMatrix<L>>;
}

impl<L: Label, C: Data<Elem = L>, D: Data<Elem = L>> ToConfusionMatrix<L, &ArrayBase<D, Ix1>>
    for ArrayBase<C, Ix1>
{
    fn confusion_matrix(&self, ground_truth: &ArrayBase<D, Ix1>) -> Result<ConfusionMatrix<L>> {
        if self.len() != ground_truth.len() {
            return Err(Error::MismatchedShapes(ground_truth.len(), self.len()));
        }

        let mut classes = ground_truth
            .iter()
            .chain(self.iter())
            .cloned()
            .collect::<Vec<_>>();
        classes.sort();
        classes.dedup();

        let indices = classes
            .iter()
            .enumerate()
            .map(|(a, b)| (b, a))
            .collect::<HashMap<_, usize>>();

        let mut matrix = Array2::zeros((classes.len(), classes.len()));
        for (truth, prediction) in ground_truth.iter().zip(self.iter()) {
            matrix[(indices[truth], indices[prediction])] += 1;
        }

        Ok(ConfusionMatrix {
            matrix,
            members: classes,
        })
    }
}

impl<L: Label, F: Float, C: Data<Elem = L>> ToConfusionMatrix<L, &Dataset<F, L>>
    for ArrayBase<C, Ix1>
{
    fn confusion_matrix(&self, ground_truth: &Dataset<F, L>) -> Result<ConfusionMatrix<L>> {
        self.confusion_matrix(ground_truth.targets())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use ndarray::{array, ArrayView1};

    #[test]
    fn test_confusion_matrix() {
        let predicted = ArrayView1::from(&[0usize, 1, 0, 1, 0, 1]);
        let ground_truth = ArrayView1::from(&[1usize, 1, 0, 1, 0, 1]);

        let cm = predicted.confusion_matrix(&ground_truth).unwrap();

        assert_eq!(cm.matrix(), &array![[2, 0], [1, 3]]);
        assert_eq!(cm.members(), &[0, 1]);
    }

    #[test]
    fn test_cm_metrices() {
        let predicted = array![0usize, 1, 0, 1, 0, 1];
        let ground_truth = array![1usize, 1, 0, 1, 0, 1];

        let cm = predicted.confusion_matrix(&ground_truth).unwrap();

        assert_abs_diff_eq!(cm.accuracy(), 5.0 / 6.0);
        assert_abs_diff_eq!(cm.recall(), array![1.0, 3.0 / 4.0]);
        assert_abs_diff_eq!(cm.precision(), array![2.0 / 3.0, 1.0]);
        assert_abs_diff_eq!(cm.f1_score(), array![4.0 / 5.0, 6.0 / 7.0]);
    }

    #[test]
    fn matrix_entries_sum_to_sample_count() {
        let predicted = array![0usize, 2, 1, 1, 0, 2, 2, 1, 0, 0];
        let ground_truth = array![0usize, 1, 1, 2, 0, 2, 1, 1, 0, 2];

        let cm = predicted.confusion_matrix(&ground_truth).unwrap();

        assert_eq!(cm.matrix().dim(), (3, 3));
        assert_eq!(cm.matrix().sum(), 10);
        assert!(cm.accuracy() >= 0.0 && cm.accuracy() <= 1.0);
        assert_abs_diff_eq!(
            cm.accuracy(),
            cm.matrix().diag().sum() as f32 / 10.0
        );
    }

    #[test]
    fn mismatched_lengths_are_rejected() {
        let predicted = array![0usize, 1];
        let ground_truth = array![0usize, 1, 1];

        assert!(predicted.confusion_matrix(&ground_truth).is_err());
    }

    #[test]
    fn dataset_targets_act_as_ground_truth() {
        let dataset = crate::Dataset::new(array![[1.0f64], [2.0], [3.0]], array![0usize, 1, 1]);
        let predicted = array![0usize, 1, 0];

        let cm = predicted.confusion_matrix(&dataset).unwrap();
        assert_abs_diff_eq!(cm.accuracy(), 2.0 / 3.0);
    }
}

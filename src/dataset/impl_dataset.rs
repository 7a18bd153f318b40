use ndarray::{Array1, Array2, Axis};
use rand::seq::SliceRandom;
use rand::Rng;

use super::{Dataset, Float, Label};

impl<F: Float, L: Label> Dataset<F, L> {
    /// Create a new dataset from a record matrix and a target vector
    pub fn new(records: Array2<F>, targets: Array1<L>) -> Self {
        Dataset {
            records,
            targets,
            feature_names: Vec::new(),
        }
    }

    pub fn records(&self) -> &Array2<F> {
        &self.records
    }

    pub fn targets(&self) -> &Array1<L> {
        &self.targets
    }

    pub fn nsamples(&self) -> usize {
        self.records.nrows()
    }

    pub fn nfeatures(&self) -> usize {
        self.records.ncols()
    }

    /// Add descriptive names for the feature columns
    pub fn with_feature_names<S: Into<String>>(mut self, names: Vec<S>) -> Self {
        self.feature_names = names.into_iter().map(Into::into).collect();
        self
    }

    pub fn feature_names(&self) -> &[String] {
        &self.feature_names
    }

    /// Map targets into a new label type, leaving records untouched
    pub fn map_targets<T: Label, G: FnMut(&L) -> T>(self, fnc: G) -> Dataset<F, T> {
        let Dataset {
            records,
            targets,
            feature_names,
        } = self;

        Dataset {
            records,
            targets: targets.map(fnc),
            feature_names,
        }
    }

    /// Distinct target labels, in their canonical sorted order
    pub fn labels(&self) -> Vec<L> {
        let mut labels = self.targets.to_vec();
        labels.sort();
        labels.dedup();
        labels
    }

    /// Project the records onto a subset of feature columns
    ///
    /// The projection keeps all samples in their current order; only the
    /// selected columns (and their feature names, if any) are carried over.
    pub fn select_features(&self, indices: &[usize]) -> Dataset<F, L> {
        let records = self.records.select(Axis(1), indices);
        let feature_names = if self.feature_names.is_empty() {
            Vec::new()
        } else {
            indices
                .iter()
                .map(|i| self.feature_names[*i].clone())
                .collect()
        };

        Dataset {
            records,
            targets: self.targets.clone(),
            feature_names,
        }
    }

    /// Produce a dataset with samples in random order
    ///
    /// Seeding the generator makes the resulting row order, and with it any
    /// subsequent `split_with_ratio` partition, reproducible.
    pub fn shuffle<R: Rng>(&self, rng: &mut R) -> Dataset<F, L> {
        let mut indices = (0..self.nsamples()).collect::<Vec<_>>();
        indices.shuffle(rng);

        self.select_rows(&indices)
    }

    /// Split the dataset into two disjoint subsets
    ///
    /// The first subset receives `ceil(nsamples * ratio)` rows, taken from the
    /// front; the remainder forms the second subset. Rows are not reordered,
    /// so shuffle first for a randomized split.
    pub fn split_with_ratio(&self, ratio: f32) -> (Dataset<F, L>, Dataset<F, L>) {
        let n = (self.nsamples() as f32 * ratio).ceil() as usize;
        let indices = (0..self.nsamples()).collect::<Vec<_>>();

        (self.select_rows(&indices[..n]), self.select_rows(&indices[n..]))
    }

    /// Partition the dataset into `k` (train, validation) pairs
    ///
    /// Fold `i` validates on rows `[i * nsamples / k, (i + 1) * nsamples / k)`
    /// and trains on everything else. When `k` does not divide the number of
    /// samples, the remainder rows are appended to every training set.
    pub fn fold(&self, k: usize) -> Vec<(Dataset<F, L>, Dataset<F, L>)> {
        assert!(
            k > 0 && k <= self.nsamples(),
            "fold requires 0 < k <= nsamples"
        );

        let fold_size = self.nsamples() / k;
        (0..k)
            .map(|i| {
                let val_range = i * fold_size..(i + 1) * fold_size;
                let train = (0..self.nsamples())
                    .filter(|j| !val_range.contains(j))
                    .collect::<Vec<_>>();
                let val = val_range.collect::<Vec<_>>();

                (self.select_rows(&train), self.select_rows(&val))
            })
            .collect()
    }

    fn select_rows(&self, indices: &[usize]) -> Dataset<F, L> {
        Dataset {
            records: self.records.select(Axis(0), indices),
            targets: self.targets.select(Axis(0), indices),
            feature_names: self.feature_names.clone(),
        }
    }
}

impl<F: Float, L: Label> From<(Array2<F>, Array1<L>)> for Dataset<F, L> {
    fn from(rec_tar: (Array2<F>, Array1<L>)) -> Self {
        Dataset::new(rec_tar.0, rec_tar.1)
    }
}

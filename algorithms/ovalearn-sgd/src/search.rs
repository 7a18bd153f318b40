use rand::rngs::SmallRng;
use rand::SeedableRng;
use rayon::prelude::*;

use ovalearn::dataset::{Dataset, Label};
use ovalearn::metrics::ToConfusionMatrix;
use ovalearn::traits::{Fit, Predict};
use ovalearn::{Float, ParamGuard};

use crate::error::{Result, SgdError};
use crate::hyperparams::{LearningRate, Loss, Penalty, SgdParams};

/// Exhaustive hyperparameter search with k-fold cross validation
///
/// Every combination of the configured value lists becomes one candidate. A
/// candidate is scored by fitting it on each of the `k` training folds and
/// averaging the accuracy on the matching validation folds; all candidates
/// see the same folds. Candidates are evaluated in parallel, each with its
/// own generator seeded from the search seed, so a rerun with the same seed
/// reproduces the same ranking.
#[derive(Debug, Clone)]
pub struct SgdGridSearch<F> {
    losses: Vec<Loss>,
    penalties: Vec<Penalty<F>>,
    alphas: Vec<F>,
    learning_rates: Vec<LearningRate<F>>,
    eta0s: Vec<F>,
    max_iters: Vec<usize>,
    tols: Vec<Option<F>>,
    early_stopping: bool,
    seed: u64,
}

impl<F: Float> SgdGridSearch<F> {
    /// Create a grid holding a single default candidate
    pub fn new() -> Self {
        SgdGridSearch {
            losses: vec![Loss::Hinge],
            penalties: vec![Penalty::L2],
            alphas: vec![F::cast(1e-4)],
            learning_rates: vec![LearningRate::Optimal],
            eta0s: vec![F::cast(0.0)],
            max_iters: vec![1000],
            tols: vec![Some(F::cast(1e-3))],
            early_stopping: false,
            seed: 42,
        }
    }

    pub fn losses(mut self, losses: &[Loss]) -> Self {
        self.losses = losses.to_vec();
        self
    }

    pub fn penalties(mut self, penalties: &[Penalty<F>]) -> Self {
        self.penalties = penalties.to_vec();
        self
    }

    pub fn alphas(mut self, alphas: &[F]) -> Self {
        self.alphas = alphas.to_vec();
        self
    }

    pub fn learning_rates(mut self, learning_rates: &[LearningRate<F>]) -> Self {
        self.learning_rates = learning_rates.to_vec();
        self
    }

    pub fn eta0s(mut self, eta0s: &[F]) -> Self {
        self.eta0s = eta0s.to_vec();
        self
    }

    pub fn max_iters(mut self, max_iters: &[usize]) -> Self {
        self.max_iters = max_iters.to_vec();
        self
    }

    pub fn tols(mut self, tols: &[Option<F>]) -> Self {
        self.tols = tols.to_vec();
        self
    }

    /// Enable early stopping for every candidate, defaults to `false`
    pub fn early_stopping(mut self, early_stopping: bool) -> Self {
        self.early_stopping = early_stopping;
        self
    }

    /// Set the base seed for the per-candidate generators, defaults to `42`
    pub fn seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Materialize the Cartesian product of the configured value lists
    pub fn candidates(&self) -> Vec<SgdParams<F, SmallRng>> {
        let mut candidates = Vec::new();
        for &loss in &self.losses {
            for &penalty in &self.penalties {
                for &alpha in &self.alphas {
                    for &learning_rate in &self.learning_rates {
                        for &eta0 in &self.eta0s {
                            for &max_iter in &self.max_iters {
                                for &tol in &self.tols {
                                    let idx = candidates.len() as u64;
                                    let params = SgdParams::new()
                                        .loss(loss)
                                        .penalty(penalty)
                                        .alpha(alpha)
                                        .learning_rate(learning_rate)
                                        .eta0(eta0)
                                        .max_iter(max_iter)
                                        .tol(tol)
                                        .early_stopping(self.early_stopping)
                                        .rng(SmallRng::seed_from_u64(
                                            self.seed.wrapping_add(idx),
                                        ));
                                    candidates.push(params);
                                }
                            }
                        }
                    }
                }
            }
        }
        candidates
    }

    /// Score every candidate with `folds`-fold cross validation and return
    /// the search result
    ///
    /// Fails if any candidate carries invalid hyperparameters or a fit
    /// errors out; ties on the mean accuracy go to the candidate generated
    /// first.
    pub fn run<L: Label + Send + Sync>(
        &self,
        dataset: &Dataset<F, L>,
        folds: usize,
    ) -> Result<GridSearchResult<F>> {
        if folds < 2 {
            return Err(SgdError::InvalidFolds(folds));
        }
        let candidates = self.candidates();
        if candidates.is_empty() {
            return Err(SgdError::EmptyGrid);
        }

        let splits = dataset.fold(folds);

        let scores = candidates
            .par_iter()
            .map(|candidate| {
                let valid_params = candidate.check_ref()?;
                let mut total = 0f64;
                for (train, valid) in &splits {
                    let model = valid_params.fit(train)?;
                    let predictions = model.predict(valid.records());
                    let cm = predictions.confusion_matrix(valid.targets())?;
                    total += cm.accuracy() as f64;
                }
                Ok(total / splits.len() as f64)
            })
            .collect::<Result<Vec<_>>>()?;

        let mut best_index = 0;
        for (idx, score) in scores.iter().enumerate() {
            if *score > scores[best_index] {
                best_index = idx;
            }
        }

        Ok(GridSearchResult {
            candidates,
            scores,
            best_index,
        })
    }
}

impl<F: Float> Default for SgdGridSearch<F> {
    fn default() -> Self {
        Self::new()
    }
}

/// Outcome of a grid search: every candidate, its mean validation accuracy
/// and the index of the winner
#[derive(Debug, Clone)]
pub struct GridSearchResult<F> {
    candidates: Vec<SgdParams<F, SmallRng>>,
    scores: Vec<f64>,
    best_index: usize,
}

impl<F: Float> GridSearchResult<F> {
    /// Hyperparameters of the best candidate
    pub fn best_params(&self) -> &SgdParams<F, SmallRng> {
        &self.candidates[self.best_index]
    }

    /// Mean cross validation accuracy of the best candidate
    pub fn best_score(&self) -> f64 {
        self.scores[self.best_index]
    }

    pub fn scores(&self) -> &[f64] {
        &self.scores
    }

    pub fn candidates(&self) -> &[SgdParams<F, SmallRng>] {
        &self.candidates
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::{Array1, Array2};
    use rand::Rng;

    fn blobs(rng: &mut SmallRng) -> Dataset<f64, usize> {
        let centers = [(0.0, 0.0), (5.0, 5.0), (0.0, 5.0)];
        let mut data = Vec::new();
        let mut targets = Vec::new();
        for (label, &(cx, cy)) in centers.iter().enumerate() {
            for _ in 0..15 {
                data.push(cx + rng.gen_range(-0.5..0.5));
                data.push(cy + rng.gen_range(-0.5..0.5));
                targets.push(label);
            }
        }
        let records = Array2::from_shape_vec((targets.len(), 2), data).unwrap();
        Dataset::new(records, Array1::from(targets))
    }

    #[test]
    fn candidate_count_is_product_of_lists() {
        let grid = SgdGridSearch::<f64>::new()
            .losses(&[Loss::Hinge, Loss::Log])
            .alphas(&[1e-4, 1e-3, 1e-2])
            .eta0s(&[0.01, 0.1]);
        assert_eq!(grid.candidates().len(), 12);
    }

    #[test]
    fn empty_grid_is_rejected() {
        let mut rng = SmallRng::seed_from_u64(1);
        let dataset = blobs(&mut rng);
        let grid = SgdGridSearch::<f64>::new().losses(&[]);
        assert!(matches!(grid.run(&dataset, 3), Err(SgdError::EmptyGrid)));
    }

    #[test]
    fn single_fold_is_rejected() {
        let mut rng = SmallRng::seed_from_u64(1);
        let dataset = blobs(&mut rng);
        let grid = SgdGridSearch::<f64>::new();
        assert!(matches!(
            grid.run(&dataset, 1),
            Err(SgdError::InvalidFolds(1))
        ));
    }

    #[test]
    fn best_score_is_maximal_over_candidates() {
        let mut rng = SmallRng::seed_from_u64(2);
        let dataset = blobs(&mut rng).shuffle(&mut SmallRng::seed_from_u64(2));

        let grid = SgdGridSearch::new()
            .losses(&[Loss::Hinge, Loss::Log])
            .alphas(&[1e-4, 1e-2]);
        let result = grid.run(&dataset, 3).unwrap();

        assert_eq!(result.scores().len(), 4);
        assert_eq!(result.candidates().len(), 4);
        let max = result.scores().iter().cloned().fold(f64::MIN, f64::max);
        assert_eq!(result.best_score(), max);
        assert!(result.best_score() > 0.9);
    }

    #[test]
    fn rerun_with_same_seed_reproduces_scores() {
        let mut rng = SmallRng::seed_from_u64(4);
        let dataset = blobs(&mut rng).shuffle(&mut SmallRng::seed_from_u64(4));

        let grid = SgdGridSearch::new()
            .losses(&[Loss::Hinge, Loss::ModifiedHuber])
            .alphas(&[1e-4, 1e-3])
            .seed(7);
        let first = grid.run(&dataset, 3).unwrap();
        let second = grid.run(&dataset, 3).unwrap();

        assert_eq!(first.scores(), second.scores());
        assert_eq!(
            first.best_params().check_ref().unwrap().alpha(),
            second.best_params().check_ref().unwrap().alpha()
        );
    }
}

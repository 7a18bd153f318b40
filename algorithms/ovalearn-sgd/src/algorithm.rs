use ndarray::{Array1, Array2, ArrayBase, ArrayView1, ArrayView2, Axis, Data, Ix2, Zip};
use ndarray_rand::rand_distr::Uniform;
use ndarray_rand::RandomExt;
use ndarray_stats::QuantileExt;
use rand::rngs::SmallRng;
use rand::seq::SliceRandom;
use rand::Rng;

use ovalearn::dataset::{Dataset, Label};
use ovalearn::traits::{Fit, PredictInplace};
use ovalearn::Float;

use crate::error::SgdError;
use crate::hyperparams::{LearningRate, Loss, Penalty, SgdParams, SgdValidParams};

/// Subgradient sign, zero at zero
fn sign<F: Float>(value: F) -> F {
    if value > F::zero() {
        F::one()
    } else if value < F::zero() {
        -F::one()
    } else {
        F::zero()
    }
}

impl Loss {
    /// Loss value at margin `z = p * y`
    pub(crate) fn loss<F: Float>(self, p: F, y: F) -> F {
        let z = p * y;
        match self {
            Loss::Hinge => {
                if z < F::one() {
                    F::one() - z
                } else {
                    F::zero()
                }
            }
            Loss::Log => {
                // clamp to avoid overflow in exp
                if z > F::cast(18.0) {
                    (-z).exp()
                } else if z < F::cast(-18.0) {
                    -z
                } else {
                    (F::one() + (-z).exp()).ln()
                }
            }
            Loss::ModifiedHuber => {
                if z >= F::one() {
                    F::zero()
                } else if z >= -F::one() {
                    let d = F::one() - z;
                    d * d
                } else {
                    -F::cast(4.0) * z
                }
            }
        }
    }

    /// Derivative of the loss with respect to the prediction `p`
    pub(crate) fn dloss<F: Float>(self, p: F, y: F) -> F {
        let z = p * y;
        match self {
            Loss::Hinge => {
                if z < F::one() {
                    -y
                } else {
                    F::zero()
                }
            }
            Loss::Log => {
                if z > F::cast(18.0) {
                    -y * (-z).exp()
                } else if z < F::cast(-18.0) {
                    -y
                } else {
                    -y / (z.exp() + F::one())
                }
            }
            Loss::ModifiedHuber => {
                if z >= F::one() {
                    F::zero()
                } else if z >= -F::one() {
                    -F::cast(2.0) * y * (F::one() - z)
                } else {
                    -F::cast(4.0) * y
                }
            }
        }
    }
}

impl<F: Float> Penalty<F> {
    /// Shrink the weight vector by one subgradient step of size
    /// `step = eta * alpha`. The intercept is never regularized.
    fn apply(&self, weights: &mut Array1<F>, step: F) {
        match *self {
            Penalty::None => {}
            Penalty::L2 => weights.mapv_inplace(|w| w - step * w),
            Penalty::L1 => weights.mapv_inplace(|w| w - step * sign(w)),
            Penalty::ElasticNet { l1_ratio } => weights.mapv_inplace(|w| {
                w - step * (l1_ratio * sign(w) + (F::one() - l1_ratio) * w)
            }),
        }
    }
}

/// A multi-class linear classifier trained with stochastic gradient descent
///
/// One binary ±1 problem is solved per class in a one-vs-all scheme; each
/// sample updates the weights of its binary problem with the subgradient of
/// the chosen loss plus the regularization penalty. Prediction picks the
/// class whose hyperplane scores highest.
#[derive(Debug, Clone, PartialEq)]
pub struct SgdClassifier<F, L> {
    weights: Array2<F>,
    intercepts: Array1<F>,
    classes: Vec<L>,
    n_iter: Vec<usize>,
}

impl<F: Float, L: Label> SgdClassifier<F, L> {
    /// Create default hyperparameters, see [`SgdParams`] for details
    pub fn params() -> SgdParams<F, SmallRng> {
        SgdParams::new()
    }

    /// Weight matrix with one row per class, in the order of
    /// [`classes`](SgdClassifier::classes)
    pub fn weights(&self) -> &Array2<F> {
        &self.weights
    }

    /// Intercept terms, one per class
    pub fn intercepts(&self) -> &Array1<F> {
        &self.intercepts
    }

    /// Class labels in canonical (sorted) order
    pub fn classes(&self) -> &[L] {
        &self.classes
    }

    /// Number of epochs actually run, maximized over the binary problems
    pub fn n_iter(&self) -> usize {
        self.n_iter.iter().copied().max().unwrap_or(0)
    }

    /// Number of epochs per binary problem, in class order
    pub fn n_iter_per_class(&self) -> &[usize] {
        &self.n_iter
    }

    /// Raw per-class scores `x * W^T + b` for a batch of samples
    pub fn decision_function<D: Data<Elem = F>>(&self, x: &ArrayBase<D, Ix2>) -> Array2<F> {
        x.dot(&self.weights.t()) + &self.intercepts
    }
}

impl<F: Float, R: Rng + Clone> SgdValidParams<F, R> {
    /// Run SGD on a single ±1 problem, returning weights, intercept and the
    /// number of epochs
    fn fit_binary(
        &self,
        x: ArrayView2<F>,
        y: ArrayView1<F>,
        rng: &mut R,
    ) -> (Array1<F>, F, usize) {
        let n = x.nrows();

        // With early stopping a validation split is carved off once and the
        // epochs train on the remainder only
        let (train_x, train_y, holdout) = if self.early_stopping {
            let mut indices: Vec<usize> = (0..n).collect();
            indices.shuffle(rng);
            let nval: usize = (F::cast(n) * self.validation_fraction).ceil().as_();
            let nval = nval.max(1).min(n - 1);
            let (val_idx, train_idx) = indices.split_at(nval);
            (
                x.select(Axis(0), train_idx),
                y.select(Axis(0), train_idx),
                Some((x.select(Axis(0), val_idx), y.select(Axis(0), val_idx))),
            )
        } else {
            (x.to_owned(), y.to_owned(), None)
        };
        let ntrain = train_x.nrows();

        let mut weights = Array1::random_using(
            train_x.ncols(),
            Uniform::new(F::cast(-0.01), F::cast(0.01)),
            rng,
        );
        let mut intercept = F::zero();

        // Bottou's heuristic for the optimal schedule: pick t0 so that the
        // first step size roughly matches the scale of a typical weight
        let t0 = if let LearningRate::Optimal = self.learning_rate {
            let typw = (F::one() / self.alpha.sqrt()).sqrt();
            let initial_eta0 = typw / F::one().max(self.loss.dloss(-typw, F::one()).abs());
            F::one() / (initial_eta0 * self.alpha)
        } else {
            F::zero()
        };

        let mut order: Vec<usize> = (0..ntrain).collect();
        let mut t = 1usize;
        let mut current_eta = self.eta0;
        let mut best_loss = F::infinity();
        let mut best_score = F::neg_infinity();
        let mut no_improvement = 0;
        let mut n_iter = 0;

        for epoch in 0..self.max_iter {
            n_iter = epoch + 1;
            order.shuffle(rng);

            let mut sum_loss = F::zero();
            for &i in &order {
                let xi = train_x.row(i);
                let yi = train_y[i];
                let p = xi.dot(&weights) + intercept;
                sum_loss += self.loss.loss(p, yi);

                let eta = match self.learning_rate {
                    LearningRate::Constant => self.eta0,
                    LearningRate::Optimal => F::one() / (self.alpha * (t0 + F::cast(t))),
                    LearningRate::InvScaling { power_t } => {
                        self.eta0 / F::cast(t).powf(power_t)
                    }
                    LearningRate::Adaptive => current_eta,
                };

                self.penalty.apply(&mut weights, eta * self.alpha);

                let dl = self.loss.dloss(p, yi);
                if dl != F::zero() {
                    Zip::from(&mut weights)
                        .and(&xi)
                        .for_each(|w, &x| *w -= eta * dl * x);
                    intercept -= eta * dl;
                }
                t += 1;
            }

            let stalled = match self.tol {
                None => false,
                Some(tol) => {
                    if let Some((val_x, val_y)) = &holdout {
                        let score = binary_accuracy(val_x.view(), val_y.view(), &weights, intercept);
                        let stalled = score < best_score + tol;
                        if score > best_score {
                            best_score = score;
                        }
                        stalled
                    } else {
                        let mean_loss = sum_loss / F::cast(ntrain);
                        let stalled = mean_loss > best_loss - tol;
                        if mean_loss < best_loss {
                            best_loss = mean_loss;
                        }
                        stalled
                    }
                }
            };

            if stalled {
                no_improvement += 1;
            } else {
                no_improvement = 0;
            }

            if no_improvement >= self.n_iter_no_change {
                if let LearningRate::Adaptive = self.learning_rate {
                    current_eta = current_eta / F::cast(5.0);
                    no_improvement = 0;
                    if current_eta < F::cast(1e-6) {
                        break;
                    }
                } else {
                    break;
                }
            }
        }

        (weights, intercept, n_iter)
    }
}

fn binary_accuracy<F: Float>(
    x: ArrayView2<F>,
    y: ArrayView1<F>,
    weights: &Array1<F>,
    intercept: F,
) -> F {
    let correct = x
        .rows()
        .into_iter()
        .zip(y.iter())
        .filter(|(xi, &yi)| (xi.dot(weights) + intercept >= F::zero()) == (yi > F::zero()))
        .count();
    F::cast(correct) / F::cast(y.len())
}

impl<F: Float, L: Label, R: Rng + Clone> Fit<F, L> for SgdValidParams<F, R> {
    type Object = SgdClassifier<F, L>;
    type Error = SgdError;

    fn fit(&self, dataset: &Dataset<F, L>) -> Result<Self::Object, Self::Error> {
        if dataset.nsamples() == 0 {
            return Err(ovalearn::error::Error::EmptyDataset.into());
        }
        if dataset.records().iter().any(|v| !v.is_finite()) {
            return Err(SgdError::InvalidValues);
        }

        let classes = dataset.labels();
        if classes.len() < 2 {
            return Err(SgdError::TooFewClasses(classes.len()));
        }

        let mut rng = self.rng().clone();
        let x = dataset.records().view();
        let mut weights = Array2::zeros((classes.len(), dataset.nfeatures()));
        let mut intercepts = Array1::zeros(classes.len());
        let mut n_iter = Vec::with_capacity(classes.len());

        for (idx, class) in classes.iter().enumerate() {
            let y = dataset
                .targets()
                .map(|t| if t == class { F::one() } else { -F::one() });
            let (w, b, iters) = self.fit_binary(x, y.view(), &mut rng);
            weights.row_mut(idx).assign(&w);
            intercepts[idx] = b;
            n_iter.push(iters);
        }

        Ok(SgdClassifier {
            weights,
            intercepts,
            classes,
            n_iter,
        })
    }
}

impl<F: Float, L: Label, D: Data<Elem = F>> PredictInplace<ArrayBase<D, Ix2>, Array1<L>>
    for SgdClassifier<F, L>
{
    fn predict_inplace(&self, x: &ArrayBase<D, Ix2>, y: &mut Array1<L>) {
        assert_eq!(
            x.nrows(),
            y.len(),
            "The number of data points must match the number of output targets."
        );
        assert_eq!(
            x.ncols(),
            self.weights.ncols(),
            "Number of data features must match the number of features the model was trained with."
        );

        let scores = self.decision_function(x);
        for (row, target) in scores.rows().into_iter().zip(y.iter_mut()) {
            let best = row.argmax().unwrap();
            *target = self.classes[best].clone();
        }
    }

    fn default_target(&self, x: &ArrayBase<D, Ix2>) -> Array1<L> {
        Array1::from_elem(x.nrows(), self.classes[0].clone())
    }
}

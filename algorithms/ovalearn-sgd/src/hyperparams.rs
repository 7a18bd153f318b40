use crate::error::SgdError;
use ovalearn::{Float, ParamGuard};
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

/// Loss functions for the per-sample gradient step
///
/// `Hinge` yields a linear support vector machine, `Log` logistic regression
/// and `ModifiedHuber` a smoothed hinge that tolerates outliers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Loss {
    Hinge,
    Log,
    ModifiedHuber,
}

/// Regularization penalties applied to the weight vector
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Penalty<F> {
    L1,
    L2,
    ElasticNet { l1_ratio: F },
    None,
}

/// Learning rate schedules
///
/// * `Constant`: eta = eta0
/// * `Optimal`: eta = 1 / (alpha * (t0 + t)), with t0 chosen by the Bottou
///   heuristic
/// * `InvScaling`: eta = eta0 / t^power_t
/// * `Adaptive`: eta starts at eta0 and is divided by 5 whenever the stopping
///   criterion stalls, until it falls below 1e-6
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum LearningRate<F> {
    Constant,
    Optimal,
    InvScaling { power_t: F },
    Adaptive,
}

/// A verified hyperparameter set ready for the estimation of a one-vs-all SGD
/// classification model
///
/// See [`SgdParams`](crate::SgdParams) for more information.
#[derive(Debug, Clone, PartialEq)]
pub struct SgdValidParams<F, R> {
    pub(crate) loss: Loss,
    pub(crate) penalty: Penalty<F>,
    pub(crate) alpha: F,
    pub(crate) learning_rate: LearningRate<F>,
    pub(crate) eta0: F,
    pub(crate) max_iter: usize,
    pub(crate) tol: Option<F>,
    pub(crate) early_stopping: bool,
    pub(crate) validation_fraction: F,
    pub(crate) n_iter_no_change: usize,
    pub(crate) rng: R,
}

impl<F: Float, R: Rng + Clone> SgdValidParams<F, R> {
    pub fn loss(&self) -> Loss {
        self.loss
    }

    pub fn penalty(&self) -> Penalty<F> {
        self.penalty
    }

    pub fn alpha(&self) -> F {
        self.alpha
    }

    pub fn learning_rate(&self) -> LearningRate<F> {
        self.learning_rate
    }

    pub fn eta0(&self) -> F {
        self.eta0
    }

    pub fn max_iter(&self) -> usize {
        self.max_iter
    }

    pub fn tol(&self) -> Option<F> {
        self.tol
    }

    pub fn early_stopping(&self) -> bool {
        self.early_stopping
    }

    pub fn validation_fraction(&self) -> F {
        self.validation_fraction
    }

    pub fn n_iter_no_change(&self) -> usize {
        self.n_iter_no_change
    }

    pub fn rng(&self) -> &R {
        &self.rng
    }
}

/// An unchecked hyperparameter set for the one-vs-all SGD classifier
///
/// The builder starts from the defaults of the scikit-learn `SGDClassifier`:
/// hinge loss, l2 penalty with `alpha = 1e-4`, the optimal learning rate
/// schedule, 1000 epochs at most and a convergence tolerance of `1e-3`.
///
/// The random generator drives per-epoch sample shuffling, weight
/// initialization and the early-stopping holdout. It defaults to an
/// entropy-seeded generator, so two fits with identical parameters produce
/// different weight values; pass a seeded generator through
/// [`rng`](SgdParams::rng) for reproducible training.
#[derive(Debug, Clone, PartialEq)]
pub struct SgdParams<F, R>(pub(crate) SgdValidParams<F, R>);

impl<F: Float> SgdParams<F, SmallRng> {
    /// Create new hyperparameters with default values
    pub fn new() -> Self {
        Self(SgdValidParams {
            loss: Loss::Hinge,
            penalty: Penalty::L2,
            alpha: F::cast(1e-4),
            learning_rate: LearningRate::Optimal,
            eta0: F::cast(0.0),
            max_iter: 1000,
            tol: Some(F::cast(1e-3)),
            early_stopping: false,
            validation_fraction: F::cast(0.1),
            n_iter_no_change: 5,
            rng: SmallRng::from_entropy(),
        })
    }
}

impl<F: Float> Default for SgdParams<F, SmallRng> {
    fn default() -> Self {
        Self::new()
    }
}

impl<F: Float, R: Rng + Clone> SgdParams<F, R> {
    /// Set the loss function, defaults to `Hinge`
    pub fn loss(mut self, loss: Loss) -> Self {
        self.0.loss = loss;
        self
    }

    /// Set the regularization penalty, defaults to `L2`
    pub fn penalty(mut self, penalty: Penalty<F>) -> Self {
        self.0.penalty = penalty;
        self
    }

    /// Set the regularization strength, defaults to `1e-4`
    ///
    /// `alpha` must be positive and finite. It also scales the step size of
    /// the `Optimal` schedule.
    pub fn alpha(mut self, alpha: F) -> Self {
        self.0.alpha = alpha;
        self
    }

    /// Set the learning rate schedule, defaults to `Optimal`
    pub fn learning_rate(mut self, learning_rate: LearningRate<F>) -> Self {
        self.0.learning_rate = learning_rate;
        self
    }

    /// Set the initial learning rate, defaults to `0.0`
    ///
    /// Must be positive for the `Constant`, `InvScaling` and `Adaptive`
    /// schedules; the `Optimal` schedule ignores it.
    pub fn eta0(mut self, eta0: F) -> Self {
        self.0.eta0 = eta0;
        self
    }

    /// Set the maximum number of epochs, defaults to `1000`
    pub fn max_iter(mut self, max_iter: usize) -> Self {
        self.0.max_iter = max_iter;
        self
    }

    /// Set the convergence tolerance, defaults to `1e-3`
    ///
    /// Training stops after [`n_iter_no_change`](SgdParams::n_iter_no_change)
    /// consecutive epochs without improving on the best observed epoch loss
    /// (or validation score, with early stopping) by at least `tol`. `None`
    /// disables the check and always runs `max_iter` epochs.
    pub fn tol(mut self, tol: Option<F>) -> Self {
        self.0.tol = tol;
        self
    }

    /// Enable early stopping on a held-out validation split, defaults to
    /// `false`
    pub fn early_stopping(mut self, early_stopping: bool) -> Self {
        self.0.early_stopping = early_stopping;
        self
    }

    /// Set the fraction of training data held out for early stopping,
    /// defaults to `0.1`
    pub fn validation_fraction(mut self, validation_fraction: F) -> Self {
        self.0.validation_fraction = validation_fraction;
        self
    }

    /// Set the patience of the stopping criterion, defaults to `5`
    pub fn n_iter_no_change(mut self, n_iter_no_change: usize) -> Self {
        self.0.n_iter_no_change = n_iter_no_change;
        self
    }

    /// Set the random number generator
    ///
    /// Defaults to an entropy-seeded `SmallRng`; replace it with a seeded
    /// generator for reproducible fits.
    pub fn rng<R2: Rng + Clone>(self, rng: R2) -> SgdParams<F, R2> {
        let SgdValidParams {
            loss,
            penalty,
            alpha,
            learning_rate,
            eta0,
            max_iter,
            tol,
            early_stopping,
            validation_fraction,
            n_iter_no_change,
            rng: _,
        } = self.0;

        SgdParams(SgdValidParams {
            loss,
            penalty,
            alpha,
            learning_rate,
            eta0,
            max_iter,
            tol,
            early_stopping,
            validation_fraction,
            n_iter_no_change,
            rng,
        })
    }
}

impl<F: Float, R: Rng + Clone> ParamGuard for SgdParams<F, R> {
    type Checked = SgdValidParams<F, R>;
    type Error = SgdError;

    fn check_ref(&self) -> Result<&Self::Checked, Self::Error> {
        let params = &self.0;

        if !params.alpha.is_finite() || params.alpha <= F::zero() {
            return Err(SgdError::InvalidAlpha(to_f32(params.alpha)));
        }
        if !params.eta0.is_finite() || params.eta0 < F::zero() {
            return Err(SgdError::InvalidEta0(to_f32(params.eta0)));
        }
        match params.learning_rate {
            LearningRate::Constant | LearningRate::Adaptive => {
                if params.eta0 <= F::zero() {
                    return Err(SgdError::InvalidEta0(to_f32(params.eta0)));
                }
            }
            LearningRate::InvScaling { power_t } => {
                if params.eta0 <= F::zero() {
                    return Err(SgdError::InvalidEta0(to_f32(params.eta0)));
                }
                if !power_t.is_finite() || power_t <= F::zero() {
                    return Err(SgdError::InvalidPowerT(to_f32(power_t)));
                }
            }
            LearningRate::Optimal => {}
        }
        if let Penalty::ElasticNet { l1_ratio } = params.penalty {
            if !(F::zero()..=F::one()).contains(&l1_ratio) {
                return Err(SgdError::InvalidL1Ratio(to_f32(l1_ratio)));
            }
        }
        if params.max_iter == 0 {
            return Err(SgdError::InvalidMaxIter);
        }
        if let Some(tol) = params.tol {
            if !tol.is_finite() || tol <= F::zero() {
                return Err(SgdError::InvalidTol(to_f32(tol)));
            }
        }
        if params.early_stopping
            && !(params.validation_fraction > F::zero() && params.validation_fraction < F::one())
        {
            return Err(SgdError::InvalidValidationFraction(to_f32(
                params.validation_fraction,
            )));
        }
        if params.n_iter_no_change == 0 {
            return Err(SgdError::InvalidNIterNoChange);
        }

        Ok(params)
    }

    fn check(self) -> Result<Self::Checked, Self::Error> {
        self.check_ref()?;
        Ok(self.0)
    }
}

fn to_f32<F: Float>(value: F) -> f32 {
    value.to_f32().unwrap_or(f32::NAN)
}

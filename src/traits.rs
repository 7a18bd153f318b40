//! Provide traits for different classes of algorithms
//!

use crate::dataset::{Dataset, Float, Label};

/// Fittable algorithms
///
/// A fit operation consumes a training dataset and produces a model object,
/// which is immutable afterwards. Parameter structs implement this trait,
/// either directly (checked parameters) or through the blanket implementation
/// on [`ParamGuard`](crate::ParamGuard).
pub trait Fit<F: Float, L: Label> {
    type Object;
    type Error: std::error::Error;

    fn fit(&self, dataset: &Dataset<F, L>) -> Result<Self::Object, Self::Error>;
}

/// Predict into a pre-allocated target container
pub trait PredictInplace<R, T> {
    /// Predict something in place
    fn predict_inplace(&self, x: &R, y: &mut T);

    /// Create targets that `predict_inplace` works with
    fn default_target(&self, x: &R) -> T;
}

/// Predict with the default target allocation
pub trait Predict<R, T> {
    fn predict(&self, x: R) -> T;
}

impl<R, T, S: PredictInplace<R, T>> Predict<&R, T> for S {
    fn predict(&self, x: &R) -> T {
        let mut targets = self.default_target(x);
        self.predict_inplace(x, &mut targets);
        targets
    }
}

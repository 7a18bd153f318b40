//! `ovalearn` is a small toolkit for classical supervised learning in Rust.
//!
//! Kin in spirit to Python's `scikit-learn`, it bundles the pieces needed to
//! train and evaluate classifiers on in-memory tabular data: a [`Dataset`]
//! container with splitting and k-fold helpers, classification metrics, and
//! the [`traits`] algorithm crates implement against.
//!
//! The actual learning algorithms live in their own crates, such as
//! `ovalearn-sgd` for linear one-vs-all classification with stochastic
//! gradient descent. Reference datasets are bundled in `ovalearn-datasets`.

pub mod dataset;
pub mod error;
mod metrics_classification;
mod param_guard;
pub mod prelude;
pub mod traits;

pub use dataset::{Dataset, Float, Label};
pub use error::Error;
pub use param_guard::ParamGuard;

/// Common metrics functions for classification
pub mod metrics {
    pub use crate::metrics_classification::{ConfusionMatrix, ToConfusionMatrix};
}

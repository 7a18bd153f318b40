//! # One-vs-all stochastic gradient descent
//!
//! `ovalearn-sgd` provides linear classification of multi-class datasets by
//! stochastic gradient descent. Each class is separated from the rest by its
//! own hyperplane, updated one sample at a time with the subgradient of a
//! configurable loss (hinge, logistic or modified Huber) plus an optional
//! l1/l2/elastic net penalty. Several learning rate schedules and two
//! stopping criteria (training loss plateau or held-out validation score)
//! are supported, together with an exhaustive cross validated grid search
//! over the hyperparameter space.
//!
//! Reference: Bottou, "Stochastic Gradient Descent Tricks", 2012.
//!
//! ## Examples
//!
//! ```rust
//! use ovalearn::prelude::*;
//! use ovalearn_sgd::SgdClassifier;
//! use rand::rngs::SmallRng;
//! use rand::SeedableRng;
//!
//! let dataset = ovalearn_datasets::iris();
//! let model = SgdClassifier::<f64, usize>::params()
//!     .rng(SmallRng::seed_from_u64(42))
//!     .check()
//!     .unwrap()
//!     .fit(&dataset)
//!     .unwrap();
//! let predictions = model.predict(dataset.records());
//! ```

mod algorithm;
mod error;
mod hyperparams;
mod search;

pub use algorithm::SgdClassifier;
pub use error::{Result, SgdError};
pub use hyperparams::{LearningRate, Loss, Penalty, SgdParams, SgdValidParams};
pub use search::{GridSearchResult, SgdGridSearch};

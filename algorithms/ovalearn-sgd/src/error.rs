use thiserror::Error;

/// Simplified `Result` using [`SgdError`](crate::SgdError) as error type
pub type Result<T> = std::result::Result<T, SgdError>;

#[derive(Error, Debug)]
pub enum SgdError {
    #[error("alpha must be positive and finite, but is {0}")]
    InvalidAlpha(f32),
    #[error("eta0 must be positive for the chosen learning rate schedule, but is {0}")]
    InvalidEta0(f32),
    #[error("l1 ratio must be in range [0, 1], but is {0}")]
    InvalidL1Ratio(f32),
    #[error("power_t must be positive and finite, but is {0}")]
    InvalidPowerT(f32),
    #[error("max_iter must be greater than 0")]
    InvalidMaxIter,
    #[error("tol must be positive and finite, but is {0}")]
    InvalidTol(f32),
    #[error("validation fraction must lie in (0, 1), but is {0}")]
    InvalidValidationFraction(f32),
    #[error("n_iter_no_change must be greater than 0")]
    InvalidNIterNoChange,
    #[error("training data contains {0} distinct classes, but at least two are required")]
    TooFewClasses(usize),
    #[error("records must be finite, not `Inf` or `NaN`")]
    InvalidValues,
    #[error("the hyperparameter grid is empty")]
    EmptyGrid,
    #[error("cross validation requires at least two folds, got {0}")]
    InvalidFolds(usize),
    #[error(transparent)]
    CoreError(#[from] ovalearn::error::Error),
}

//! Error types in ovalearn
//!

use thiserror::Error;

use ndarray::ShapeError;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Error, Debug, Clone)]
pub enum Error {
    #[error("invalid parameter {0}")]
    Parameters(String),
    #[error("expected {0} samples but got {1}")]
    MismatchedShapes(usize, usize),
    #[error("invalid ndarray shape {0}")]
    NdShape(#[from] ShapeError),
    #[error("dataset is empty")]
    EmptyDataset,
    #[error("expected at least two distinct classes, got {0}")]
    NotEnoughClasses(usize),
}

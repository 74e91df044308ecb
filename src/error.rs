//! Crate error type. Classification itself never fails; errors come from the
//! input boundary, configuration, tree loading and CSV I/O.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("transaction time {0} is outside 0..=86400 seconds")]
    TimeOutOfRange(f64),

    #[error("transaction amount {0} must be a non-negative number")]
    InvalidAmount(f64),

    #[error("feature V{} is not a finite number", .index + 1)]
    NonFiniteFeature { index: usize },

    #[error("{0} features supplied, at most 28 are supported")]
    TooManyFeatures(usize),

    #[error("invalid decision tree: {0}")]
    InvalidTree(String),

    #[error("malformed export row: {0}")]
    MalformedRow(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Csv(#[from] csv::Error),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;

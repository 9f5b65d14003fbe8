//! Error types for blood glucose conversion and classification

use thiserror::Error;

#[derive(Error, Debug)]
pub enum BgError {
    #[error("You must provide a `bgBounds` object with a `targetLowerBound` and a `targetUpperBound`!")]
    InvalidBounds,

    #[error("You must provide a positive, numerical blood glucose value to categorize!")]
    NonPositiveValue,

    #[error("Invalid blood glucose value: {0}")]
    InvalidValue(f64),

    #[error("Invalid blood glucose unit: {0}")]
    InvalidUnit(String),

    #[error("Invalid classification type: {0}")]
    InvalidClassification(String),

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),
}

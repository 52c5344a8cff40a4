//! Error types for the gas_forecast crate

use energy_math::MathError;
use thiserror::Error;

/// Custom error types for the gas_forecast crate
#[derive(Debug, Error)]
pub enum ForecastError {
    /// Train or test window (or the whole series) holds no usable observations
    #[error("Insufficient data: {0}")]
    InsufficientData(String),

    /// A model family could not be fitted to the training window
    #[error("Model fit error: {0}")]
    ModelFit(String),

    /// Error related to input validation
    #[error("Validation error: {0}")]
    ValidationError(String),

    /// Error from invalid parameters
    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    /// Error from IO operations
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    /// Error reading or writing a persisted table
    #[error("CSV error: {0}")]
    CsvError(#[from] csv::Error),

    /// Error serializing the model comparison
    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),
}

/// Result type with our custom error
pub type Result<T> = std::result::Result<T, ForecastError>;

impl From<MathError> for ForecastError {
    fn from(err: MathError) -> Self {
        match err {
            MathError::InsufficientData(msg) => ForecastError::InsufficientData(msg),
            MathError::InvalidInput(msg) => ForecastError::ValidationError(msg),
        }
    }
}

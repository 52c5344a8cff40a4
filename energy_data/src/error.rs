//! Error types for the energy_data crate

use polars::prelude::PolarsError;
use thiserror::Error;

/// Errors raised while fetching, reading or persisting datasets
#[derive(Debug, Error)]
pub enum DataError {
    /// Network or file failure while obtaining an input dataset
    #[error("Data loading error: {0}")]
    DataLoad(String),

    /// A required column is absent from a dataset or table
    #[error("Missing column: {0}")]
    MissingColumn(String),

    /// No usable rows survived filtering and merging
    #[error("Empty dataset: {0}")]
    Empty(String),

    /// Malformed value in a persisted table
    #[error("Parse error: {0}")]
    Parse(String),

    /// Error from IO operations
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Error from CSV reading or writing
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// Error from Polars operations
    #[error("Polars error: {0}")]
    Polars(String),
}

/// Result type with our custom error
pub type Result<T> = std::result::Result<T, DataError>;

impl From<PolarsError> for DataError {
    fn from(err: PolarsError) -> Self {
        DataError::Polars(err.to_string())
    }
}

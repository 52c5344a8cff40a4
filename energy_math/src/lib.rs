//! # Energy Math
//!
//! Numeric building blocks shared by the forecasting and scenario crates.
//! This crate provides the small amount of statistics the pipeline needs
//! without pulling a full dataframe library into the model code.

use thiserror::Error;

pub mod autocorrelation;
pub mod search;
pub mod statistics;

pub use autocorrelation::{acf, pacf, Correlogram};
pub use search::{GridSearch, SearchOutcome};
pub use statistics::{difference, mean, sample_std_dev};

/// Errors that can occur in numeric calculations
#[derive(Error, Debug, Clone, PartialEq)]
pub enum MathError {
    #[error("Insufficient data for calculation: {0}")]
    InsufficientData(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

/// Result type for numeric operations
pub type Result<T> = std::result::Result<T, MathError>;

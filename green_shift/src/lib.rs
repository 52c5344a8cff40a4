//! # Green Shift
//!
//! `green_shift` estimates what happens to emissions, energy cost and CO₂ tax
//! exposure when a fraction of forecast gas consumption moves to renewables.
//!
//! Each shift level is applied independently to the same forecast and
//! compared with the unshifted baseline.
//!
//! ## Usage Example
//!
//! ```
//! use green_shift::{simulate, ScenarioParameters};
//!
//! let gas = [100.0, 110.0, 120.0, 130.0, 140.0];
//! let params = ScenarioParameters::default();
//! let outcome = simulate(&gas, 50.0, &[0.10], &params).unwrap();
//!
//! assert_eq!(outcome.scenarios[0].shift_pct, 10);
//! assert!(outcome.scenarios[0].delta_emissions < 0.0);
//! ```

use energy_data::DataError;
use energy_math::MathError;
use thiserror::Error;

pub mod matrix;
pub mod params;
pub mod simulator;
pub mod summary;

pub use matrix::{ScenarioMatrix, ScenarioRow};
pub use params::ScenarioParameters;
pub use simulator::{
    from_tables, simulate, Baseline, ScenarioInputs, ScenarioOutcome, ShiftScenario,
};
pub use summary::{format_currency, render_summary, write_summary};

/// Errors that can occur while building or persisting scenarios
#[derive(Error, Debug)]
pub enum ScenarioError {
    #[error("Pivot table has no row for baseline year {0}")]
    MissingBaselineYear(i32),

    #[error("Gas forecast is empty")]
    EmptyForecast,

    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    #[error("Data error: {0}")]
    Data(#[from] DataError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
}

impl From<MathError> for ScenarioError {
    fn from(err: MathError) -> Self {
        match err {
            MathError::InsufficientData(_) => ScenarioError::EmptyForecast,
            MathError::InvalidInput(msg) => ScenarioError::InvalidParameter(msg),
        }
    }
}

/// Result type for scenario operations
pub type Result<T> = std::result::Result<T, ScenarioError>;

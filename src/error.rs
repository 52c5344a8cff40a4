//! Error type for the pipeline and reporting layer

use energy_data::DataError;
use energy_math::MathError;
use gas_forecast::ForecastError;
use green_shift::ScenarioError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Failed to parse configuration: {0}")]
    ConfigParse(#[from] toml::de::Error),

    #[error(transparent)]
    Data(#[from] DataError),

    #[error(transparent)]
    Forecast(#[from] ForecastError),

    #[error(transparent)]
    Scenario(#[from] ScenarioError),

    #[error(transparent)]
    Math(#[from] MathError),

    #[error("Report error: {0}")]
    Report(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, PipelineError>;

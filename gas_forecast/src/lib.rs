//! # Gas Forecast
//!
//! Back-tested model selection and forecasting for short yearly energy series.
//!
//! ## Features
//!
//! - Yearly series with a train/test split at a cutoff year
//! - Forecasting models (Holt exponential smoothing with additive trend, ARIMA)
//! - Model evaluation by MAE and RMSE on the held-out years
//! - Selection of the lowest-RMSE model and a forecast with a 95% band
//! - Persistence of the forecast table (CSV) and model comparison (JSON)
//!
//! ## Quick Start
//!
//! ```rust
//! use gas_forecast::{select_best, ForecastEvaluator, TimeSeries};
//!
//! let series = TimeSeries::from_pairs(
//!     (2000..2020).map(|year| (year, 500.0 + 12.0 * (year - 2000) as f64)),
//! )?;
//!
//! let evaluator = ForecastEvaluator::default();
//! let report = evaluator.evaluate(&series, 2015)?;
//! let best = select_best(&report)?;
//! let forecast = evaluator.forecast_best(&report, 5)?;
//!
//! assert_eq!(forecast.horizon(), 5);
//! assert_eq!(forecast.years()[0], 2020);
//! println!("selected {}", best);
//! # Ok::<(), gas_forecast::ForecastError>(())
//! ```

pub mod error;
pub mod evaluation;
pub mod metrics;
pub mod models;
pub mod output;
pub mod series;

// Re-export commonly used types
pub use crate::error::{ForecastError, Result};
pub use crate::evaluation::{select_best, EvaluationReport, ForecastEvaluator, ModelResult};
pub use crate::metrics::ErrorMetrics;
pub use crate::models::{ForecastModel, ModelFamily, TrainedForecastModel};
pub use crate::output::{ForecastOutput, ForecastRecord, ForecastTable, ModelComparison};
pub use crate::series::{TimeSeries, TrainTestSplit};

// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
pub const NAME: &str = env!("CARGO_PKG_NAME");

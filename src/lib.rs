//! # Energy Outlook
//!
//! `energy_outlook` ties the workspace crates into one run: it loads the
//! OWID energy and CO₂ data for a country, back-tests and forecasts gas
//! consumption, writes charts and summaries, and simulates gas-to-renewables
//! shift scenarios.
//!
//! ## Example
//!
//! ```no_run
//! use energy_outlook::{Pipeline, PipelineConfig, RunOptions};
//!
//! let config = PipelineConfig::default();
//! let report = Pipeline::new(config, RunOptions::default())
//!     .and_then(|pipeline| pipeline.run())
//!     .unwrap();
//! println!("{}", report.comparison);
//! ```

pub mod config;
pub mod error;
pub mod pipeline;
pub mod reporting;
pub mod telemetry;

pub use config::{DataConfig, ForecastConfig, OutputConfig, PipelineConfig};
pub use error::{PipelineError, Result};
pub use pipeline::{Pipeline, PipelineReport, RunOptions};
pub use telemetry::init_tracing;

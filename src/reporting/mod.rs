//! Charts and text reports built from the persisted tables

pub mod charts;
pub mod summary;
pub mod svg;

pub use charts::{
    diagnostics_chart, energy_forecast_chart, fuel_mix_chart, scenario_chart, DIAGNOSTIC_LAGS,
};
pub use summary::ExecutiveSummary;
pub use svg::SvgDocument;

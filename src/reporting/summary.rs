//! Executive summary text

use crate::error::Result;
use chrono::{DateTime, Utc};
use energy_data::{DataError, Measure, PivotTable};
use energy_math::mean;
use gas_forecast::ForecastTable;
use std::fs;
use std::path::Path;
use tracing::info;

/// Headline figures for the latest observed year and the forecast horizon.
///
/// Projected emissions reuse the latest observed total CO₂, so the projected
/// intensity only reflects the change in total energy.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ExecutiveSummary {
    pub latest_year: i32,
    pub baseline_intensity: f64,
    pub avg_forecast_gas: f64,
    pub projected_total_energy: f64,
    pub projected_emissions: f64,
    pub projected_intensity: f64,
    pub delta_intensity: f64,
}

impl ExecutiveSummary {
    pub fn from_tables(pivot: &PivotTable, forecast: &ForecastTable) -> Result<Self> {
        let latest_year = pivot
            .latest_year()
            .ok_or_else(|| DataError::Empty("pivot table has no rows".to_string()))?;
        let latest = |measure: Measure| {
            pivot
                .latest(measure)
                .ok_or_else(|| DataError::MissingColumn(measure.header().to_string()))
        };

        let baseline_intensity = latest(Measure::EmissionsIntensity)?;
        let avg_forecast_gas = mean(&forecast.gas_forecast())?;
        let projected_total_energy =
            latest(Measure::Coal)? + latest(Measure::Renewables)? + avg_forecast_gas;
        let projected_emissions = latest(Measure::TotalCo2)?;
        let projected_intensity = projected_emissions / projected_total_energy;

        Ok(Self {
            latest_year,
            baseline_intensity,
            avg_forecast_gas,
            projected_total_energy,
            projected_emissions,
            projected_intensity,
            delta_intensity: projected_intensity - baseline_intensity,
        })
    }

    pub fn render(&self, generated_at: DateTime<Utc>) -> String {
        format!(
            "ESG Executive Summary\n\
             \x20 Year analyzed: {}\n\
             \x20 Baseline CO₂ intensity: {:.2} Mt/TWh\n\
             \x20 Avg forecasted gas: {:.1} TWh\n\
             \x20 Projected total energy: {:.1} TWh\n\
             \x20 Estimated CO₂ intensity: {:.2} Mt/TWh\n\
             \x20 Δ Intensity vs. baseline: {:+.2} Mt/TWh\n\
             \x20 Generated: {}\n",
            self.latest_year,
            self.baseline_intensity,
            self.avg_forecast_gas,
            self.projected_total_energy,
            self.projected_intensity,
            self.delta_intensity,
            generated_at.format("%Y-%m-%d %H:%M UTC"),
        )
    }

    pub fn write<P: AsRef<Path>>(&self, path: P, generated_at: DateTime<Utc>) -> Result<()> {
        let path = path.as_ref();
        fs::write(path, self.render(generated_at))?;
        info!(path = %path.display(), "saved executive summary");
        Ok(())
    }
}

//! Baseline and per-shift scenario computation

use crate::matrix::{ScenarioMatrix, ScenarioRow};
use crate::params::{validate_levels, ScenarioParameters};
use crate::{Result, ScenarioError};
use energy_data::{Measure, PivotTable};
use energy_math::mean;
use gas_forecast::ForecastTable;
use tracing::{debug, info};

/// Unshifted outlook over the forecast horizon
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Baseline {
    pub mean_gas: f64,
    pub emissions: f64,
    pub intensity: f64,
    pub cost: f64,
    pub tax: f64,
}

/// One shift level and its deltas against the baseline
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ShiftScenario {
    pub shift: f64,
    pub shift_pct: u32,
    pub emissions: f64,
    pub intensity: f64,
    pub cost: f64,
    pub tax: f64,
    /// scenario − baseline
    pub delta_emissions: f64,
    /// scenario − baseline
    pub delta_intensity: f64,
    /// baseline − scenario
    pub savings: f64,
    /// baseline − scenario
    pub tax_delta: f64,
}

impl ShiftScenario {
    pub fn to_row(&self) -> ScenarioRow {
        ScenarioRow {
            shift_pct: self.shift_pct,
            scenario_emissions: self.emissions,
            delta_emissions: self.delta_emissions,
            emissions_intensity: self.intensity,
            energy_cost: self.cost,
            co2_tax_exposure: self.tax,
        }
    }
}

/// Baseline plus one scenario per shift level, in input order
#[derive(Debug, Clone, PartialEq)]
pub struct ScenarioOutcome {
    pub baseline: Baseline,
    pub scenarios: Vec<ShiftScenario>,
}

impl ScenarioOutcome {
    pub fn matrix(&self) -> ScenarioMatrix {
        ScenarioMatrix::new(self.scenarios.iter().map(ShiftScenario::to_row).collect())
    }
}

/// Run every shift level against the same gas forecast.
///
/// `renewables_baseline` is the renewables consumption of the base year and is
/// held flat across the horizon.
pub fn simulate(
    gas_forecast: &[f64],
    renewables_baseline: f64,
    shift_levels: &[f64],
    params: &ScenarioParameters,
) -> Result<ScenarioOutcome> {
    if gas_forecast.is_empty() {
        return Err(ScenarioError::EmptyForecast);
    }
    if gas_forecast.iter().any(|v| !v.is_finite()) || !renewables_baseline.is_finite() {
        return Err(ScenarioError::InvalidParameter(
            "gas forecast and renewables baseline must be finite".to_string(),
        ));
    }
    params.validate()?;
    validate_levels(shift_levels)?;

    let mean_gas = mean(gas_forecast)?;
    let emissions = mean_gas * params.gas_co2_factor;
    let energy: Vec<f64> = gas_forecast.iter().map(|g| g + renewables_baseline).collect();
    let baseline = Baseline {
        mean_gas,
        emissions,
        intensity: emissions / mean(&energy)?,
        cost: mean_gas * params.gas_unit_cost,
        tax: emissions * params.co2_tax_rate,
    };
    debug!(?baseline, renewables_baseline, "computed baseline");

    let scenarios = shift_levels
        .iter()
        .map(|&shift| shift_scenario(gas_forecast, renewables_baseline, shift, params, &baseline))
        .collect::<Result<Vec<_>>>()?;

    info!(levels = scenarios.len(), "simulated green shift scenarios");
    Ok(ScenarioOutcome {
        baseline,
        scenarios,
    })
}

fn shift_scenario(
    gas: &[f64],
    renewables_baseline: f64,
    shift: f64,
    params: &ScenarioParameters,
    baseline: &Baseline,
) -> Result<ShiftScenario> {
    let gas_shifted: Vec<f64> = gas.iter().map(|g| g * (1.0 - shift)).collect();
    let renewables_shifted: Vec<f64> = gas
        .iter()
        .map(|g| renewables_baseline + g * shift)
        .collect();
    let energy: Vec<f64> = gas_shifted
        .iter()
        .zip(&renewables_shifted)
        .map(|(g, r)| g + r)
        .collect();

    let mean_shifted = mean(&gas_shifted)?;
    let emissions = mean_shifted * params.gas_co2_factor;
    let intensity = emissions / mean(&energy)?;
    let cost = mean_shifted * params.gas_unit_cost
        + baseline.mean_gas * shift * params.renewables_unit_cost;
    let tax = emissions * params.co2_tax_rate;

    Ok(ShiftScenario {
        shift,
        shift_pct: (shift * 100.0).round() as u32,
        emissions,
        intensity,
        cost,
        tax,
        delta_emissions: emissions - baseline.emissions,
        delta_intensity: intensity - baseline.intensity,
        savings: baseline.cost - cost,
        tax_delta: baseline.tax - tax,
    })
}

/// Simulator inputs read from the persisted pivot and forecast tables
#[derive(Debug, Clone, PartialEq)]
pub struct ScenarioInputs {
    pub year: i32,
    pub renewables_baseline: f64,
    pub gas_forecast: Vec<f64>,
}

impl ScenarioInputs {
    pub fn simulate(
        &self,
        shift_levels: &[f64],
        params: &ScenarioParameters,
    ) -> Result<ScenarioOutcome> {
        simulate(&self.gas_forecast, self.renewables_baseline, shift_levels, params)
    }
}

/// Take renewables for `year` (latest when `None`) and the forecast values
pub fn from_tables(
    pivot: &PivotTable,
    forecast: &ForecastTable,
    year: Option<i32>,
) -> Result<ScenarioInputs> {
    if forecast.is_empty() {
        return Err(ScenarioError::EmptyForecast);
    }
    // Surfaces a missing Renewables column before the year lookup
    pivot.column(Measure::Renewables)?;

    let year = match year.or_else(|| pivot.latest_year()) {
        Some(year) => year,
        None => {
            return Err(ScenarioError::InvalidParameter(
                "pivot table has no rows".to_string(),
            ))
        }
    };
    let renewables_baseline = pivot
        .value(year, Measure::Renewables)
        .ok_or(ScenarioError::MissingBaselineYear(year))?;

    debug!(year, renewables_baseline, horizon = forecast.len(), "read scenario inputs");
    Ok(ScenarioInputs {
        year,
        renewables_baseline,
        gas_forecast: forecast.gas_forecast(),
    })
}

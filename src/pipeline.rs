//! End-to-end run: load, forecast, report, simulate

use crate::config::PipelineConfig;
use crate::error::{PipelineError, Result};
use crate::reporting::{self, ExecutiveSummary, SvgDocument};
use chrono::Utc;
use energy_data::{DatasetFetcher, DatasetLoader, Measure, PivotTable};
use gas_forecast::{ForecastEvaluator, ForecastOutput, ForecastTable, ModelComparison, TimeSeries};
use green_shift::{ScenarioMatrix, ScenarioOutcome};
use std::fs;
use std::path::PathBuf;
use tracing::{debug, info};

/// Stage switches taken from the command line
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunOptions {
    /// Single shift in whole percent, replacing the configured levels
    pub scenario_pct: Option<u32>,
    pub skip_plots: bool,
    pub skip_summary: bool,
    pub only_baseline: bool,
}

impl RunOptions {
    /// Shift levels to simulate, or `None` when scenarios are skipped
    pub fn shift_levels(&self, config: &PipelineConfig) -> Option<Vec<f64>> {
        match self.scenario_pct {
            Some(pct) => Some(vec![f64::from(pct) / 100.0]),
            None if self.only_baseline => None,
            None => Some(config.scenario.shift_levels.clone()),
        }
    }
}

/// What a run produced
#[derive(Debug, Clone)]
pub struct PipelineReport {
    pub comparison: ModelComparison,
    pub forecast: ForecastOutput,
    pub scenarios: Option<ScenarioOutcome>,
    pub written: Vec<PathBuf>,
}

pub struct Pipeline {
    config: PipelineConfig,
    options: RunOptions,
}

impl Pipeline {
    pub fn new(config: PipelineConfig, options: RunOptions) -> Result<Self> {
        config.validate()?;
        if let Some(pct) = options.scenario_pct {
            if !(1..=100).contains(&pct) {
                return Err(PipelineError::Config(format!(
                    "scenario percentage must be between 1 and 100, got {}",
                    pct
                )));
            }
        }
        Ok(Self { config, options })
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    /// Run every enabled stage, stopping at the first failure
    pub fn run(&self) -> Result<PipelineReport> {
        let config = &self.config;
        let out = &config.output;
        fs::create_dir_all(&out.dir)?;
        let mut written = Vec::new();

        // Data
        let fetcher = DatasetFetcher::new(config.http_timeout()).with_refresh(config.data.refresh);
        let loader = DatasetLoader::new(&config.country, fetcher);
        let dataset = loader.load(&config.energy_source(), &config.co2_source())?;
        let merged_path = config.output_path(&out.merged_csv);
        let pivot_path = config.output_path(&out.pivot_csv);
        dataset.persist(&merged_path, &pivot_path)?;
        written.extend([merged_path, pivot_path.clone()]);

        let gas = TimeSeries::from_pairs(dataset.pivot.column(Measure::Gas)?)?;
        info!(
            points = gas.len(),
            first_year = gas.first_year(),
            last_year = gas.last_year(),
            "gas series ready"
        );

        if !self.options.skip_plots {
            let chart = reporting::diagnostics_chart(gas.values(), "Gas")?;
            written.push(self.save_chart(&chart, &out.diagnostics_chart)?);
        }

        // Forecast
        let evaluator = ForecastEvaluator::default();
        let evaluation = evaluator.evaluate(&gas, config.forecast.cutoff_year)?;
        let comparison = evaluation.comparison()?;
        info!("{}", comparison);
        let comparison_path = config.output_path(&out.model_comparison_json);
        comparison.write_json(&comparison_path)?;
        written.push(comparison_path);

        let forecast = evaluator.forecast_best(&evaluation, config.forecast.horizon)?;
        let forecast_path = config.output_path(&out.forecast_csv);
        forecast.to_table().write_csv(&forecast_path)?;
        info!(path = %forecast_path.display(), model = forecast.model_name(), "saved gas forecast");
        written.push(forecast_path.clone());

        // Downstream stages work from the persisted tables
        let pivot = PivotTable::from_csv(&pivot_path)?;
        let table = ForecastTable::from_csv(&forecast_path)?;

        if !self.options.skip_plots {
            let chart = reporting::energy_forecast_chart(&pivot, &table, &config.country)?;
            written.push(self.save_chart(&chart, &out.energy_forecast_chart)?);
            let chart = reporting::fuel_mix_chart(&pivot, &config.country)?;
            written.push(self.save_chart(&chart, &out.fuel_mix_chart)?);
        }

        if !self.options.skip_summary {
            let path = config.output_path(&out.summary_txt);
            ExecutiveSummary::from_tables(&pivot, &table)?.write(&path, Utc::now())?;
            written.push(path);
        }

        let scenarios = match self.options.shift_levels(config) {
            Some(levels) => {
                let outcome = self.run_scenarios(&pivot, &table, &levels, &mut written)?;
                Some(outcome)
            }
            None => {
                info!("baseline only, skipping scenarios");
                None
            }
        };

        info!(files = written.len(), dir = %out.dir.display(), "pipeline finished");
        Ok(PipelineReport {
            comparison,
            forecast,
            scenarios,
            written,
        })
    }

    fn run_scenarios(
        &self,
        pivot: &PivotTable,
        table: &ForecastTable,
        levels: &[f64],
        written: &mut Vec<PathBuf>,
    ) -> Result<ScenarioOutcome> {
        let out = &self.config.output;
        debug!(?levels, "running green shift scenarios");

        let inputs = green_shift::from_tables(pivot, table, None)?;
        let outcome = inputs.simulate(levels, &self.config.scenario)?;
        let matrix: ScenarioMatrix = outcome.matrix();

        let matrix_path = self.config.output_path(&out.scenario_matrix_csv);
        matrix.write_csv(&matrix_path)?;
        written.push(matrix_path);

        let summary_path = self.config.output_path(&out.scenario_summary_txt);
        green_shift::write_summary(&outcome, &summary_path)?;
        written.push(summary_path);

        if !self.options.skip_plots {
            let chart = reporting::scenario_chart(&matrix)?;
            written.push(self.save_chart(&chart, &out.scenario_chart)?);
        }
        Ok(outcome)
    }

    fn save_chart(&self, chart: &SvgDocument, name: &str) -> Result<PathBuf> {
        let path = self.config.output_path(name);
        chart.save(&path)?;
        info!(path = %path.display(), "saved chart");
        Ok(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_shift_levels_from_options() {
        let config = PipelineConfig::default();

        let defaults = RunOptions::default();
        assert_eq!(defaults.shift_levels(&config), Some(vec![0.05, 0.10, 0.20, 0.30]));

        let single = RunOptions {
            scenario_pct: Some(15),
            only_baseline: true,
            ..RunOptions::default()
        };
        assert_eq!(single.shift_levels(&config), Some(vec![0.15]));

        let baseline = RunOptions {
            only_baseline: true,
            ..RunOptions::default()
        };
        assert_eq!(baseline.shift_levels(&config), None);
    }

    #[test]
    fn test_scenario_pct_range() {
        let options = RunOptions {
            scenario_pct: Some(0),
            ..RunOptions::default()
        };
        assert!(Pipeline::new(PipelineConfig::default(), options).is_err());
    }
}

//! Pipeline configuration, loaded from TOML.
//!
//! Every field has a default, so an empty file (or no file) is valid.
//!
//! ```toml
//! country = "United States"
//!
//! [forecast]
//! cutoff_year = 2015
//! horizon = 5
//!
//! [output]
//! dir = "output"
//!
//! [scenario]
//! co2_tax_rate = 120.0
//! shift_levels = [0.1, 0.25]
//! ```

use crate::error::{PipelineError, Result};
use energy_data::{DatasetSource, CO2_CSV_URL, DEFAULT_COUNTRY, ENERGY_CSV_URL};
use green_shift::ScenarioParameters;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Top-level configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    /// Country rows kept from both datasets
    pub country: String,
    pub data: DataConfig,
    pub forecast: ForecastConfig,
    pub output: OutputConfig,
    pub scenario: ScenarioParameters,
}

/// Where the input datasets come from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DataConfig {
    pub energy_url: String,
    pub co2_url: String,
    /// Local energy CSV; bypasses the download when set
    pub energy_csv: Option<PathBuf>,
    /// Local CO₂ CSV; bypasses the download when set
    pub co2_csv: Option<PathBuf>,
    /// Directory holding downloaded datasets
    pub cache_dir: PathBuf,
    /// Re-download even when a cached copy exists
    pub refresh: bool,
    pub http_timeout_secs: u64,
}

/// Back-test window and forecast length.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ForecastConfig {
    /// Last year of the training window
    pub cutoff_year: i32,
    /// Years to forecast past the last observation
    pub horizon: usize,
}

/// Output directory and file names.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    pub dir: PathBuf,
    pub merged_csv: String,
    pub pivot_csv: String,
    pub forecast_csv: String,
    pub model_comparison_json: String,
    pub scenario_matrix_csv: String,
    pub scenario_summary_txt: String,
    pub summary_txt: String,
    pub energy_forecast_chart: String,
    pub fuel_mix_chart: String,
    pub scenario_chart: String,
    pub diagnostics_chart: String,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            country: DEFAULT_COUNTRY.to_string(),
            data: DataConfig::default(),
            forecast: ForecastConfig::default(),
            output: OutputConfig::default(),
            scenario: ScenarioParameters::default(),
        }
    }
}

impl Default for DataConfig {
    fn default() -> Self {
        Self {
            energy_url: ENERGY_CSV_URL.to_string(),
            co2_url: CO2_CSV_URL.to_string(),
            energy_csv: None,
            co2_csv: None,
            cache_dir: PathBuf::from("data"),
            refresh: false,
            http_timeout_secs: 120,
        }
    }
}

impl Default for ForecastConfig {
    fn default() -> Self {
        Self {
            cutoff_year: 2015,
            horizon: 5,
        }
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            dir: PathBuf::from("."),
            merged_csv: "us_energy_co2_merged.csv".to_string(),
            pivot_csv: "us_energy_co2_pivot.csv".to_string(),
            forecast_csv: "us_gas_forecast_with_ci.csv".to_string(),
            model_comparison_json: "model_comparison.json".to_string(),
            scenario_matrix_csv: "scenario_matrix.csv".to_string(),
            scenario_summary_txt: "scenario_summary.txt".to_string(),
            summary_txt: "summary.txt".to_string(),
            energy_forecast_chart: "energy_forecast.svg".to_string(),
            fuel_mix_chart: "fuel_mix_share.svg".to_string(),
            scenario_chart: "scenario_matrix_plot.svg".to_string(),
            diagnostics_chart: "gas_acf_pacf.svg".to_string(),
        }
    }
}

impl PipelineConfig {
    /// Parse and validate a TOML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let text = fs::read_to_string(path).map_err(|e| {
            PipelineError::Config(format!("cannot read {}: {}", path.display(), e))
        })?;
        Self::from_toml(&text)
    }

    pub fn from_toml(text: &str) -> Result<Self> {
        let config: PipelineConfig = toml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.country.trim().is_empty() {
            return Err(PipelineError::Config("country must not be empty".to_string()));
        }
        if self.forecast.horizon == 0 {
            return Err(PipelineError::Config("horizon must be at least 1".to_string()));
        }
        if self.data.http_timeout_secs == 0 {
            return Err(PipelineError::Config(
                "http_timeout_secs must be at least 1".to_string(),
            ));
        }
        self.scenario.validate()?;
        Ok(())
    }

    pub fn energy_source(&self) -> DatasetSource {
        match &self.data.energy_csv {
            Some(path) => DatasetSource::path(path),
            None => DatasetSource::url(
                &self.data.energy_url,
                self.data.cache_dir.join(cache_name(&self.data.energy_url, "owid-energy-data.csv")),
            ),
        }
    }

    pub fn co2_source(&self) -> DatasetSource {
        match &self.data.co2_csv {
            Some(path) => DatasetSource::path(path),
            None => DatasetSource::url(
                &self.data.co2_url,
                self.data.cache_dir.join(cache_name(&self.data.co2_url, "owid-co2-data.csv")),
            ),
        }
    }

    pub fn http_timeout(&self) -> Duration {
        Duration::from_secs(self.data.http_timeout_secs)
    }

    /// Resolve an output file name against the output directory
    pub fn output_path(&self, name: &str) -> PathBuf {
        self.output.dir.join(name)
    }
}

/// Last path segment of the URL, or `fallback` when it has none
fn cache_name(url: &str, fallback: &str) -> String {
    url.rsplit('/')
        .next()
        .map(|s| s.split('?').next().unwrap_or(s))
        .filter(|s| !s.is_empty())
        .unwrap_or(fallback)
        .to_string()
}

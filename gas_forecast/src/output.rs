//! Forecast outputs and their persisted forms

use crate::error::{ForecastError, Result};
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::BufWriter;
use std::path::Path;

/// Point forecast with a confidence band, one entry per horizon year
#[derive(Debug, Clone, PartialEq)]
pub struct ForecastOutput {
    model_name: String,
    years: Vec<i32>,
    point_forecast: Vec<f64>,
    ci_lower: Vec<f64>,
    ci_upper: Vec<f64>,
    residual_std: f64,
}

impl ForecastOutput {
    /// Create a forecast with `(lower, upper)` intervals aligned to the values
    pub fn new_with_intervals(
        model_name: String,
        years: Vec<i32>,
        values: Vec<f64>,
        intervals: Vec<(f64, f64)>,
        residual_std: f64,
    ) -> Result<Self> {
        if values.len() != years.len() {
            return Err(ForecastError::ValidationError(format!(
                "Values length ({}) doesn't match years length ({})",
                values.len(),
                years.len()
            )));
        }

        if values.len() != intervals.len() {
            return Err(ForecastError::ValidationError(format!(
                "Values length ({}) doesn't match intervals length ({})",
                values.len(),
                intervals.len()
            )));
        }

        for (value, (lower, upper)) in values.iter().zip(&intervals) {
            if !(lower <= value && value <= upper) {
                return Err(ForecastError::ValidationError(format!(
                    "Interval [{}, {}] does not contain forecast {}",
                    lower, upper, value
                )));
            }
        }

        let (ci_lower, ci_upper) = intervals.into_iter().unzip();
        Ok(Self {
            model_name,
            years,
            point_forecast: values,
            ci_lower,
            ci_upper,
            residual_std,
        })
    }

    /// Label of the model that produced the forecast
    pub fn model_name(&self) -> &str {
        &self.model_name
    }

    pub fn years(&self) -> &[i32] {
        &self.years
    }

    pub fn point_forecast(&self) -> &[f64] {
        &self.point_forecast
    }

    pub fn ci_lower(&self) -> &[f64] {
        &self.ci_lower
    }

    pub fn ci_upper(&self) -> &[f64] {
        &self.ci_upper
    }

    /// Standard deviation of the training residuals behind the band
    pub fn residual_std(&self) -> f64 {
        self.residual_std
    }

    /// Number of forecast years
    pub fn horizon(&self) -> usize {
        self.point_forecast.len()
    }

    /// Tabular form written to disk
    pub fn to_table(&self) -> ForecastTable {
        let records = (0..self.horizon())
            .map(|i| ForecastRecord {
                year: self.years[i],
                gas_forecast_twh: self.point_forecast[i],
                ci_lower: self.ci_lower[i],
                ci_upper: self.ci_upper[i],
            })
            .collect();

        ForecastTable { records }
    }
}

/// One row of the persisted forecast table
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ForecastRecord {
    #[serde(rename = "Year")]
    pub year: i32,
    #[serde(rename = "Gas_Forecast_TWh")]
    pub gas_forecast_twh: f64,
    #[serde(rename = "CI_Lower")]
    pub ci_lower: f64,
    #[serde(rename = "CI_Upper")]
    pub ci_upper: f64,
}

/// Forecast table as persisted on disk
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ForecastTable {
    records: Vec<ForecastRecord>,
}

impl ForecastTable {
    pub fn new(records: Vec<ForecastRecord>) -> Self {
        Self { records }
    }

    pub fn records(&self) -> &[ForecastRecord] {
        &self.records
    }

    /// Gas forecast column in row order
    pub fn gas_forecast(&self) -> Vec<f64> {
        self.records.iter().map(|r| r.gas_forecast_twh).collect()
    }

    pub fn years(&self) -> Vec<i32> {
        self.records.iter().map(|r| r.year).collect()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Write the table as CSV with a header row
    pub fn write_csv<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let mut writer = csv::Writer::from_writer(BufWriter::new(File::create(path)?));
        for record in &self.records {
            writer.serialize(record)?;
        }
        writer.flush()?;
        Ok(())
    }

    /// Read a table previously written by [`ForecastTable::write_csv`]
    pub fn from_csv<P: AsRef<Path>>(path: P) -> Result<Self> {
        let mut reader = csv::Reader::from_path(path)?;
        let records = reader
            .deserialize()
            .collect::<std::result::Result<Vec<ForecastRecord>, csv::Error>>()?;

        Ok(Self { records })
    }
}

/// Back-test score of one candidate
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelScore {
    pub name: String,
    pub description: String,
    pub mae: f64,
    pub rmse: f64,
}

/// Persisted summary of a model evaluation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelComparison {
    pub cutoff_year: i32,
    pub train_years: (Option<i32>, Option<i32>),
    pub test_years: (Option<i32>, Option<i32>),
    pub selected: String,
    pub models: Vec<ModelScore>,
}

impl ModelComparison {
    pub fn write_json<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let writer = BufWriter::new(File::create(path)?);
        serde_json::to_writer_pretty(writer, self)?;
        Ok(())
    }
}

impl std::fmt::Display for ModelComparison {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "Model comparison (test window):")?;
        for model in &self.models {
            writeln!(f, "  {:5}  MAE={:.1}  RMSE={:.1}", model.name, model.mae, model.rmse)?;
        }
        write!(f, "Selected model: {}", self.selected)
    }
}

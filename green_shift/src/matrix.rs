//! Scenario matrix CSV

use crate::Result;
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::BufWriter;
use std::path::Path;
use tracing::info;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScenarioRow {
    #[serde(rename = "Shift_%")]
    pub shift_pct: u32,
    #[serde(rename = "Scenario_Emissions")]
    pub scenario_emissions: f64,
    #[serde(rename = "Delta_Emissions")]
    pub delta_emissions: f64,
    #[serde(rename = "Emissions_Intensity")]
    pub emissions_intensity: f64,
    #[serde(rename = "Energy_Cost")]
    pub energy_cost: f64,
    #[serde(rename = "CO2_Tax_Exposure")]
    pub co2_tax_exposure: f64,
}

/// Scenario rows in shift-level input order
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ScenarioMatrix {
    rows: Vec<ScenarioRow>,
}

impl ScenarioMatrix {
    pub fn new(rows: Vec<ScenarioRow>) -> Self {
        Self { rows }
    }

    pub fn rows(&self) -> &[ScenarioRow] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn write_csv<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        let mut writer = csv::Writer::from_writer(BufWriter::new(File::create(path)?));
        for row in &self.rows {
            writer.serialize(row)?;
        }
        writer.flush()?;
        info!(path = %path.display(), rows = self.rows.len(), "saved scenario matrix");
        Ok(())
    }

    pub fn from_csv<P: AsRef<Path>>(path: P) -> Result<Self> {
        let mut reader = csv::Reader::from_path(path)?;
        let rows = reader
            .deserialize()
            .collect::<std::result::Result<Vec<ScenarioRow>, csv::Error>>()?;
        Ok(Self { rows })
    }
}

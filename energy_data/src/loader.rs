//! Joining the energy and CO₂ frames into the merged and pivot tables

use crate::error::{DataError, Result};
use crate::measure::Measure;
use crate::owid::{self, CountryFrame};
use crate::pivot::{MergedTable, PivotRow, PivotTable};
use crate::source::{DatasetFetcher, DatasetSource};
use std::path::Path;
use tracing::{info, warn};

/// Country whose rows are kept when none is configured
pub const DEFAULT_COUNTRY: &str = "United States";

/// Result of loading both datasets for one country
#[derive(Debug, Clone, PartialEq)]
pub struct EnergyDataset {
    pub merged: MergedTable,
    pub pivot: PivotTable,
}

impl EnergyDataset {
    /// Save the merged and pivot tables
    pub fn persist(&self, merged_path: &Path, pivot_path: &Path) -> Result<()> {
        self.merged.write_csv(merged_path)?;
        self.pivot.write_csv(pivot_path)
    }
}

/// Fetches, reads and merges the two OWID datasets
#[derive(Debug, Clone)]
pub struct DatasetLoader {
    country: String,
    fetcher: DatasetFetcher,
}

impl Default for DatasetLoader {
    fn default() -> Self {
        Self::new(DEFAULT_COUNTRY, DatasetFetcher::default())
    }
}

impl DatasetLoader {
    pub fn new(country: impl Into<String>, fetcher: DatasetFetcher) -> Self {
        Self {
            country: country.into(),
            fetcher,
        }
    }

    pub fn country(&self) -> &str {
        &self.country
    }

    pub fn load(&self, energy: &DatasetSource, co2: &DatasetSource) -> Result<EnergyDataset> {
        let energy_path = self.fetcher.resolve(energy)?;
        info!(path = %energy_path.display(), "loading energy dataset");
        let energy = owid::read_energy(&energy_path, &self.country)?;

        let co2_path = self.fetcher.resolve(co2)?;
        info!(path = %co2_path.display(), "loading CO₂ dataset");
        let co2 = owid::read_emissions(&co2_path, &self.country)?;

        merge_and_clean(&energy, &co2)
    }
}

/// Inner-join on year, drop incomplete rows and derive the totals.
///
/// Total Electricity and Emissions Intensity are added only when
/// Total CO₂ is among the emission measures. Years without any electricity
/// consumption are then left out of the pivot.
pub fn merge_and_clean(energy: &CountryFrame, co2: &CountryFrame) -> Result<EnergyDataset> {
    let mut measures = energy.measures().to_vec();
    measures.extend_from_slice(co2.measures());

    let mut rows = Vec::new();
    let mut dropped = 0usize;
    for (year, energy_values) in energy.rows() {
        let Some(co2_values) = co2.row(year) else {
            continue;
        };
        let values: Option<Vec<f64>> = energy_values
            .iter()
            .chain(co2_values.iter())
            .copied()
            .collect();
        match values {
            Some(values) => rows.push(PivotRow { year, values }),
            None => dropped += 1,
        }
    }
    if dropped > 0 {
        warn!(dropped, "dropped joined rows with missing values");
    }
    if rows.is_empty() {
        return Err(DataError::Empty(format!(
            "no complete rows for {} after merging",
            energy.country()
        )));
    }

    let merged_table = PivotTable::new(measures.clone(), rows)?;
    let pivot = derive_totals(&merged_table)?;
    info!(
        country = energy.country(),
        rows = pivot.len(),
        first_year = pivot.first_year(),
        last_year = pivot.latest_year(),
        "merged energy and CO₂ data"
    );

    Ok(EnergyDataset {
        merged: MergedTable::new(energy.country(), merged_table),
        pivot,
    })
}

fn derive_totals(table: &PivotTable) -> Result<PivotTable> {
    if !table.has(Measure::TotalCo2) {
        warn!("Total CO₂ not available, skipping emissions intensity");
        return Ok(table.clone());
    }

    let fuel_idx: Vec<usize> = Measure::FUELS
        .iter()
        .filter_map(|m| table.measures().iter().position(|x| x == m))
        .collect();
    let total_idx = table
        .measures()
        .iter()
        .position(|m| *m == Measure::TotalCo2)
        .ok_or_else(|| DataError::MissingColumn(Measure::TotalCo2.header().to_string()))?;

    let mut measures = table.measures().to_vec();
    measures.push(Measure::TotalElectricity);
    measures.push(Measure::EmissionsIntensity);

    let mut rows = Vec::with_capacity(table.len());
    for row in table.rows() {
        let electricity: f64 = fuel_idx.iter().map(|i| row.values[*i]).sum();
        let intensity = row.values[total_idx] / electricity;
        // Persisted tables hold finite values only
        if !intensity.is_finite() {
            warn!(year = row.year, electricity, "no electricity consumption, dropping year");
            continue;
        }
        let mut values = row.values.clone();
        values.push(electricity);
        values.push(intensity);
        rows.push(PivotRow {
            year: row.year,
            values,
        });
    }
    if rows.is_empty() {
        return Err(DataError::Empty(
            "no years with electricity consumption to derive emissions intensity".to_string(),
        ));
    }

    PivotTable::new(measures, rows)
}

//! Reading wide OWID CSV files with polars and narrowing them to one country

use crate::error::{DataError, Result};
use crate::measure::Measure;
use polars::prelude::*;
use std::collections::BTreeMap;
use std::fs::File;
use std::path::Path;
use tracing::{debug, warn};

const COUNTRY_COLUMN: &str = "country";
const YEAR_COLUMN: &str = "year";

/// Yearly values of a set of measures for a single country.
///
/// Missing cells stay `None`; rows without a year are dropped on read.
#[derive(Debug, Clone, PartialEq)]
pub struct CountryFrame {
    country: String,
    measures: Vec<Measure>,
    rows: BTreeMap<i32, Vec<Option<f64>>>,
}

impl CountryFrame {
    /// Build a frame from explicit rows; each row must carry one value per measure
    pub fn new(
        country: impl Into<String>,
        measures: Vec<Measure>,
        rows: impl IntoIterator<Item = (i32, Vec<Option<f64>>)>,
    ) -> Result<Self> {
        let mut map = BTreeMap::new();
        for (year, values) in rows {
            if values.len() != measures.len() {
                return Err(DataError::Parse(format!(
                    "row for {} has {} values, expected {}",
                    year,
                    values.len(),
                    measures.len()
                )));
            }
            if map.insert(year, values).is_some() {
                return Err(DataError::Parse(format!("duplicate year {}", year)));
            }
        }
        Ok(Self {
            country: country.into(),
            measures,
            rows: map,
        })
    }

    pub fn country(&self) -> &str {
        &self.country
    }

    pub fn measures(&self) -> &[Measure] {
        &self.measures
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Rows in ascending year order
    pub fn rows(&self) -> impl Iterator<Item = (i32, &[Option<f64>])> {
        self.rows.iter().map(|(year, values)| (*year, values.as_slice()))
    }

    pub fn row(&self, year: i32) -> Option<&[Option<f64>]> {
        self.rows.get(&year).map(Vec::as_slice)
    }
}

/// Read the energy dataset; every fuel column is required
pub fn read_energy(path: &Path, country: &str) -> Result<CountryFrame> {
    let df = read_frame(path)?;
    let columns = column_names(&df);
    for measure in Measure::FUELS {
        require(&columns, source_name(measure)?, path)?;
    }
    country_frame(&df, country, Measure::FUELS.to_vec(), path)
}

/// Read the CO₂ dataset; emission columns absent from the file are skipped
pub fn read_emissions(path: &Path, country: &str) -> Result<CountryFrame> {
    let df = read_frame(path)?;
    let columns = column_names(&df);
    let mut present = Vec::new();
    for measure in Measure::EMISSIONS {
        let name = source_name(measure)?;
        if columns.iter().any(|c| c == name) {
            present.push(measure);
        } else {
            warn!(column = name, path = %path.display(), "emission column not present, skipping");
        }
    }
    country_frame(&df, country, present, path)
}

fn read_frame(path: &Path) -> Result<DataFrame> {
    let file = File::open(path).map_err(|e| {
        DataError::DataLoad(format!("failed to open {}: {}", path.display(), e))
    })?;
    let df = CsvReader::new(file)
        .infer_schema(None)
        .has_header(true)
        .finish()?;
    debug!(path = %path.display(), rows = df.height(), columns = df.width(), "read dataset");
    Ok(df)
}

fn column_names(df: &DataFrame) -> Vec<String> {
    df.get_column_names()
        .into_iter()
        .map(str::to_string)
        .collect()
}

fn require(columns: &[String], name: &str, path: &Path) -> Result<()> {
    if columns.iter().any(|c| c == name) {
        Ok(())
    } else {
        Err(DataError::MissingColumn(format!(
            "{} (in {})",
            name,
            path.display()
        )))
    }
}

fn source_name(measure: Measure) -> Result<&'static str> {
    measure
        .source_column()
        .ok_or_else(|| DataError::MissingColumn(format!("{} has no source column", measure)))
}

fn country_frame(
    df: &DataFrame,
    country: &str,
    measures: Vec<Measure>,
    path: &Path,
) -> Result<CountryFrame> {
    let columns = column_names(df);
    require(&columns, COUNTRY_COLUMN, path)?;
    require(&columns, YEAR_COLUMN, path)?;

    let country_col = df.column(COUNTRY_COLUMN)?.cast(&DataType::Utf8)?;
    let mask = country_col.utf8()?.equal(country);
    let filtered = df.filter(&mask)?;

    let years = filtered.column(YEAR_COLUMN)?.cast(&DataType::Int32)?;
    let years: Vec<Option<i32>> = years.i32()?.into_iter().collect();

    let mut value_columns = Vec::with_capacity(measures.len());
    for measure in &measures {
        let series = filtered.column(source_name(*measure)?)?.cast(&DataType::Float64)?;
        let values: Vec<Option<f64>> = series
            .f64()?
            .into_iter()
            .map(|v| v.filter(|x| x.is_finite()))
            .collect();
        value_columns.push(values);
    }

    let rows = years
        .iter()
        .enumerate()
        .filter_map(|(i, year)| {
            year.map(|y| (y, value_columns.iter().map(|col| col[i]).collect()))
        });

    let frame = CountryFrame::new(country, measures, rows)?;
    debug!(country, rows = frame.len(), path = %path.display(), "filtered dataset to country");
    Ok(frame)
}

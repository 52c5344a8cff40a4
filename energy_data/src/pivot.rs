//! Merged and pivot tables, and their CSV forms

use crate::error::{DataError, Result};
use crate::measure::Measure;
use std::fs::{self, File};
use std::path::Path;
use tracing::info;

const YEAR_HEADER: &str = "Year";
const COUNTRY_HEADER: &str = "country";

/// One year of complete observations
#[derive(Debug, Clone, PartialEq)]
pub struct PivotRow {
    pub year: i32,
    pub values: Vec<f64>,
}

/// Year-indexed table of measures for one country.
///
/// Rows are strictly ascending by year and carry no missing values.
#[derive(Debug, Clone, PartialEq)]
pub struct PivotTable {
    measures: Vec<Measure>,
    rows: Vec<PivotRow>,
}

impl PivotTable {
    pub fn new(measures: Vec<Measure>, mut rows: Vec<PivotRow>) -> Result<Self> {
        for row in &rows {
            if row.values.len() != measures.len() {
                return Err(DataError::Parse(format!(
                    "row for {} has {} values, expected {}",
                    row.year,
                    row.values.len(),
                    measures.len()
                )));
            }
        }
        rows.sort_by_key(|row| row.year);
        if let Some(pair) = rows.windows(2).find(|pair| pair[0].year == pair[1].year) {
            return Err(DataError::Parse(format!("duplicate year {}", pair[0].year)));
        }
        Ok(Self { measures, rows })
    }

    pub fn measures(&self) -> &[Measure] {
        &self.measures
    }

    pub fn rows(&self) -> &[PivotRow] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn has(&self, measure: Measure) -> bool {
        self.measures.contains(&measure)
    }

    pub fn years(&self) -> Vec<i32> {
        self.rows.iter().map(|row| row.year).collect()
    }

    pub fn first_year(&self) -> Option<i32> {
        self.rows.first().map(|row| row.year)
    }

    pub fn latest_year(&self) -> Option<i32> {
        self.rows.last().map(|row| row.year)
    }

    pub fn row(&self, year: i32) -> Option<&PivotRow> {
        self.rows
            .binary_search_by_key(&year, |row| row.year)
            .ok()
            .map(|i| &self.rows[i])
    }

    /// Value of `measure` in `year`, if both exist
    pub fn value(&self, year: i32, measure: Measure) -> Option<f64> {
        let idx = self.index_of(measure)?;
        self.row(year).map(|row| row.values[idx])
    }

    /// Value of `measure` in the latest year
    pub fn latest(&self, measure: Measure) -> Option<f64> {
        let idx = self.index_of(measure)?;
        self.rows.last().map(|row| row.values[idx])
    }

    /// `(year, value)` pairs for one measure
    pub fn column(&self, measure: Measure) -> Result<Vec<(i32, f64)>> {
        let idx = self
            .index_of(measure)
            .ok_or_else(|| DataError::MissingColumn(measure.header().to_string()))?;
        Ok(self
            .rows
            .iter()
            .map(|row| (row.year, row.values[idx]))
            .collect())
    }

    fn index_of(&self, measure: Measure) -> Option<usize> {
        self.measures.iter().position(|m| *m == measure)
    }

    /// Write with a leading `Year` column and one column per measure
    pub fn write_csv<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        create_parent(path)?;
        let mut writer = csv::Writer::from_path(path)?;

        let mut header = vec![YEAR_HEADER.to_string()];
        header.extend(self.measures.iter().map(|m| m.header().to_string()));
        writer.write_record(&header)?;

        for row in &self.rows {
            let mut record = vec![row.year.to_string()];
            record.extend(row.values.iter().map(|v| v.to_string()));
            writer.write_record(&record)?;
        }
        writer.flush()?;
        info!(path = %path.display(), rows = self.rows.len(), "saved pivot table");
        Ok(())
    }

    /// Read a table written by [`PivotTable::write_csv`].
    ///
    /// Unknown columns are ignored; a missing `Year` column is an error.
    pub fn from_csv<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|e| {
            DataError::DataLoad(format!("failed to open {}: {}", path.display(), e))
        })?;
        let mut reader = csv::Reader::from_reader(file);
        let headers = reader.headers()?.clone();

        let year_idx = headers
            .iter()
            .position(|h| h.trim() == YEAR_HEADER)
            .ok_or_else(|| DataError::MissingColumn(YEAR_HEADER.to_string()))?;
        let columns: Vec<(usize, Measure)> = headers
            .iter()
            .enumerate()
            .filter_map(|(i, h)| Measure::from_header(h).map(|m| (i, m)))
            .collect();

        let mut rows = Vec::new();
        for record in reader.records() {
            let record = record?;
            let year = parse_year(record.get(year_idx))?;
            let values = columns
                .iter()
                .map(|(i, measure)| parse_value(record.get(*i), year, *measure))
                .collect::<Result<Vec<_>>>()?;
            rows.push(PivotRow { year, values });
        }

        Self::new(columns.into_iter().map(|(_, m)| m).collect(), rows)
    }
}

/// The joined country rows before pivoting, as persisted alongside the pivot
#[derive(Debug, Clone, PartialEq)]
pub struct MergedTable {
    country: String,
    table: PivotTable,
}

impl MergedTable {
    pub fn new(country: impl Into<String>, table: PivotTable) -> Self {
        Self {
            country: country.into(),
            table,
        }
    }

    pub fn country(&self) -> &str {
        &self.country
    }

    pub fn table(&self) -> &PivotTable {
        &self.table
    }

    pub fn len(&self) -> usize {
        self.table.len()
    }

    pub fn is_empty(&self) -> bool {
        self.table.is_empty()
    }

    /// Write with `country`, `Year`, then the source measures
    pub fn write_csv<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        create_parent(path)?;
        let mut writer = csv::Writer::from_path(path)?;

        let mut header = vec![COUNTRY_HEADER.to_string(), YEAR_HEADER.to_string()];
        header.extend(self.table.measures().iter().map(|m| m.header().to_string()));
        writer.write_record(&header)?;

        for row in self.table.rows() {
            let mut record = vec![self.country.clone(), row.year.to_string()];
            record.extend(row.values.iter().map(|v| v.to_string()));
            writer.write_record(&record)?;
        }
        writer.flush()?;
        info!(path = %path.display(), rows = self.len(), "saved merged table");
        Ok(())
    }
}

fn create_parent(path: &Path) -> Result<()> {
    match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => {
            fs::create_dir_all(parent)?;
            Ok(())
        }
        _ => Ok(()),
    }
}

fn parse_year(field: Option<&str>) -> Result<i32> {
    let field = field.unwrap_or("").trim();
    // Years may have been written as floats by other tools
    field
        .parse::<i32>()
        .ok()
        .or_else(|| {
            field
                .parse::<f64>()
                .ok()
                .filter(|v| v.fract() == 0.0 && *v >= i32::MIN as f64 && *v <= i32::MAX as f64)
                .map(|v| v as i32)
        })
        .ok_or_else(|| DataError::Parse(format!("invalid year '{}'", field)))
}

fn parse_value(field: Option<&str>, year: i32, measure: Measure) -> Result<f64> {
    let field = field.unwrap_or("").trim();
    field
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
        .ok_or_else(|| {
            DataError::Parse(format!(
                "invalid value '{}' for {} in {}",
                field, measure, year
            ))
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table() -> PivotTable {
        PivotTable::new(
            vec![Measure::Coal, Measure::Gas],
            vec![
                PivotRow { year: 2001, values: vec![3.0, 4.0] },
                PivotRow { year: 2000, values: vec![1.0, 2.0] },
            ],
        )
        .unwrap()
    }

    #[test]
    fn test_rows_sorted_by_year() {
        let table = table();
        assert_eq!(table.years(), vec![2000, 2001]);
        assert_eq!(table.latest_year(), Some(2001));
        assert_eq!(table.value(2000, Measure::Gas), Some(2.0));
        assert_eq!(table.latest(Measure::Coal), Some(3.0));
        assert_eq!(table.value(2000, Measure::TotalCo2), None);
    }

    #[test]
    fn test_duplicate_year_rejected() {
        let result = PivotTable::new(
            vec![Measure::Coal],
            vec![
                PivotRow { year: 2000, values: vec![1.0] },
                PivotRow { year: 2000, values: vec![2.0] },
            ],
        );
        assert!(matches!(result, Err(DataError::Parse(_))));
    }

    #[test]
    fn test_missing_measure_column() {
        let err = table().column(Measure::Renewables).unwrap_err();
        assert!(matches!(err, DataError::MissingColumn(_)));
    }

    #[test]
    fn test_parse_year_accepts_float_text() {
        assert_eq!(parse_year(Some("2015.0")).unwrap(), 2015);
        assert!(parse_year(Some("")).is_err());
    }

    #[test]
    fn test_parse_year_rejects_fractional_text() {
        assert!(matches!(parse_year(Some("2015.7")), Err(DataError::Parse(_))));
        assert!(matches!(parse_year(Some("NaN")), Err(DataError::Parse(_))));
    }
}

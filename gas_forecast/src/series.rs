//! Yearly time series and train/test partitioning

use crate::error::{ForecastError, Result};

/// Yearly series: one finite value per year, years strictly increasing
#[derive(Debug, Clone, PartialEq)]
pub struct TimeSeries {
    years: Vec<i32>,
    values: Vec<f64>,
}

impl TimeSeries {
    /// Create a series from `(year, value)` pairs in any order
    ///
    /// Pairs are sorted by year. Duplicate years and non-finite values are
    /// rejected rather than silently merged.
    pub fn from_pairs<I>(pairs: I) -> Result<Self>
    where
        I: IntoIterator<Item = (i32, f64)>,
    {
        let mut pairs: Vec<(i32, f64)> = pairs.into_iter().collect();
        pairs.sort_by_key(|(year, _)| *year);

        if let Some(w) = pairs.windows(2).find(|w| w[0].0 == w[1].0) {
            return Err(ForecastError::ValidationError(format!(
                "Duplicate year {} in time series",
                w[0].0
            )));
        }

        if let Some((year, value)) = pairs.iter().find(|(_, v)| !v.is_finite()) {
            return Err(ForecastError::ValidationError(format!(
                "Non-finite value {} for year {}",
                value, year
            )));
        }

        let (years, values) = pairs.into_iter().unzip();
        Ok(Self { years, values })
    }

    /// Create a series from parallel year and value vectors
    pub fn new(years: Vec<i32>, values: Vec<f64>) -> Result<Self> {
        if years.len() != values.len() {
            return Err(ForecastError::ValidationError(format!(
                "Years length ({}) doesn't match values length ({})",
                years.len(),
                values.len()
            )));
        }

        Self::from_pairs(years.into_iter().zip(values))
    }

    /// Years in ascending order
    pub fn years(&self) -> &[i32] {
        &self.years
    }

    /// Values aligned with [`TimeSeries::years`]
    pub fn values(&self) -> &[f64] {
        &self.values
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// First year of the series, if any
    pub fn first_year(&self) -> Option<i32> {
        self.years.first().copied()
    }

    /// Last year of the series, if any
    pub fn last_year(&self) -> Option<i32> {
        self.years.last().copied()
    }

    /// Value recorded for `year`
    pub fn value_at(&self, year: i32) -> Option<f64> {
        self.years
            .binary_search(&year)
            .ok()
            .map(|idx| self.values[idx])
    }

    /// Partition into years `<= cutoff_year` and years `> cutoff_year`
    pub fn split_at_year(&self, cutoff_year: i32) -> TrainTestSplit {
        let boundary = self.years.partition_point(|&year| year <= cutoff_year);

        TrainTestSplit {
            cutoff_year,
            train: TimeSeries {
                years: self.years[..boundary].to_vec(),
                values: self.values[..boundary].to_vec(),
            },
            test: TimeSeries {
                years: self.years[boundary..].to_vec(),
                values: self.values[boundary..].to_vec(),
            },
        }
    }

    /// Iterate over `(year, value)` pairs
    pub fn iter(&self) -> impl Iterator<Item = (i32, f64)> + '_ {
        self.years.iter().copied().zip(self.values.iter().copied())
    }
}

/// Disjoint train/test partition of a [`TimeSeries`] at a cutoff year
#[derive(Debug, Clone, PartialEq)]
pub struct TrainTestSplit {
    cutoff_year: i32,
    train: TimeSeries,
    test: TimeSeries,
}

impl TrainTestSplit {
    pub fn cutoff_year(&self) -> i32 {
        self.cutoff_year
    }

    /// Observations with year <= cutoff
    pub fn train(&self) -> &TimeSeries {
        &self.train
    }

    /// Observations with year > cutoff
    pub fn test(&self) -> &TimeSeries {
        &self.test
    }

    /// Fail unless both sides hold at least one observation
    pub fn ensure_non_empty(&self) -> Result<()> {
        if self.train.is_empty() {
            return Err(ForecastError::InsufficientData(format!(
                "No observations at or before cutoff year {}",
                self.cutoff_year
            )));
        }
        if self.test.is_empty() {
            return Err(ForecastError::InsufficientData(format!(
                "No observations after cutoff year {}",
                self.cutoff_year
            )));
        }
        Ok(())
    }
}

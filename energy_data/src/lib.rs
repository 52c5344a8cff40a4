//! # Energy Data
//!
//! Loads the Our World in Data energy and CO₂ datasets, narrows them to one
//! country and joins them into a yearly table of fuel consumption and
//! emissions.
//!
//! ## Features
//!
//! - Download with a local cache, or read files already on disk
//! - Wide CSV reading with polars
//! - Inner join on year with incomplete rows dropped
//! - Derived Total Electricity and Emissions Intensity
//! - Merged and pivot tables persisted as CSV

pub mod error;
pub mod loader;
pub mod measure;
pub mod owid;
pub mod pivot;
pub mod source;

pub use error::{DataError, Result};
pub use loader::{merge_and_clean, DatasetLoader, EnergyDataset, DEFAULT_COUNTRY};
pub use measure::Measure;
pub use owid::{read_emissions, read_energy, CountryFrame};
pub use pivot::{MergedTable, PivotRow, PivotTable};
pub use source::{DatasetFetcher, DatasetSource};

/// Upstream energy dataset
pub const ENERGY_CSV_URL: &str =
    "https://raw.githubusercontent.com/owid/energy-data/master/owid-energy-data.csv";

/// Upstream CO₂ dataset
pub const CO2_CSV_URL: &str =
    "https://raw.githubusercontent.com/owid/co2-data/master/owid-co2-data.csv";

//! Measures carried by the merged and pivot tables

use serde::{Deserialize, Serialize};
use std::fmt;

/// One column of the yearly pivot table
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Measure {
    Coal,
    Gas,
    Renewables,
    CoalCo2,
    GasCo2,
    OtherCo2,
    TotalCo2,
    TotalElectricity,
    EmissionsIntensity,
}

impl Measure {
    /// Fuel consumption columns of the energy dataset, all required
    pub const FUELS: [Measure; 3] = [Measure::Coal, Measure::Gas, Measure::Renewables];

    /// Emission columns of the CO₂ dataset, each optional
    pub const EMISSIONS: [Measure; 4] = [
        Measure::CoalCo2,
        Measure::GasCo2,
        Measure::OtherCo2,
        Measure::TotalCo2,
    ];

    /// Every measure in table order
    pub const ALL: [Measure; 9] = [
        Measure::Coal,
        Measure::Gas,
        Measure::Renewables,
        Measure::CoalCo2,
        Measure::GasCo2,
        Measure::OtherCo2,
        Measure::TotalCo2,
        Measure::TotalElectricity,
        Measure::EmissionsIntensity,
    ];

    /// Column header used in persisted tables
    pub fn header(&self) -> &'static str {
        match self {
            Measure::Coal => "Coal (TWh)",
            Measure::Gas => "Gas (TWh)",
            Measure::Renewables => "Renewables (TWh)",
            Measure::CoalCo2 => "Coal CO₂ (Mt)",
            Measure::GasCo2 => "Gas CO₂ (Mt)",
            Measure::OtherCo2 => "Other CO₂ (Mt)",
            Measure::TotalCo2 => "Total CO₂ (Mt)",
            Measure::TotalElectricity => "Total Electricity (TWh)",
            Measure::EmissionsIntensity => "Emissions_Intensity (Mt/TWh)",
        }
    }

    /// Column name in the upstream dataset; derived measures have none
    pub fn source_column(&self) -> Option<&'static str> {
        match self {
            Measure::Coal => Some("coal_consumption"),
            Measure::Gas => Some("gas_consumption"),
            Measure::Renewables => Some("renewables_consumption"),
            Measure::CoalCo2 => Some("coal_co2"),
            Measure::GasCo2 => Some("gas_co2"),
            Measure::OtherCo2 => Some("other_industry_co2"),
            Measure::TotalCo2 => Some("co2"),
            Measure::TotalElectricity | Measure::EmissionsIntensity => None,
        }
    }

    /// Inverse of [`Measure::header`]
    pub fn from_header(header: &str) -> Option<Measure> {
        let header = header.trim();
        Measure::ALL.into_iter().find(|m| m.header() == header)
    }
}

impl fmt::Display for Measure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.header())
    }
}

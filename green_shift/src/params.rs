//! Scenario parameters

use crate::{Result, ScenarioError};
use serde::{Deserialize, Serialize};

/// Emission factor, prices and shift levels used by the simulator.
///
/// Every field has a default, so a partial `[scenario]` table deserializes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScenarioParameters {
    /// Mt CO₂ per TWh of gas
    pub gas_co2_factor: f64,
    /// $ per Mt CO₂
    pub co2_tax_rate: f64,
    /// $ per unit of gas energy
    pub gas_unit_cost: f64,
    /// $ per unit of renewable energy
    pub renewables_unit_cost: f64,
    /// Fractions of gas moved to renewables, each in [0, 1]
    pub shift_levels: Vec<f64>,
}

impl Default for ScenarioParameters {
    fn default() -> Self {
        Self {
            gas_co2_factor: 0.41,
            co2_tax_rate: 100.0,
            gas_unit_cost: 60.0,
            renewables_unit_cost: 40.0,
            shift_levels: vec![0.05, 0.10, 0.20, 0.30],
        }
    }
}

impl ScenarioParameters {
    /// Same parameters with a different set of shift levels
    pub fn with_shift_levels(mut self, levels: Vec<f64>) -> Self {
        self.shift_levels = levels;
        self
    }

    /// Check factors and prices are finite and non-negative and levels lie in [0, 1]
    pub fn validate(&self) -> Result<()> {
        let scalars = [
            ("gas_co2_factor", self.gas_co2_factor),
            ("co2_tax_rate", self.co2_tax_rate),
            ("gas_unit_cost", self.gas_unit_cost),
            ("renewables_unit_cost", self.renewables_unit_cost),
        ];
        for (name, value) in scalars {
            if !value.is_finite() || value < 0.0 {
                return Err(ScenarioError::InvalidParameter(format!(
                    "{} must be a non-negative number, got {}",
                    name, value
                )));
            }
        }
        validate_levels(&self.shift_levels)
    }
}

pub(crate) fn validate_levels(levels: &[f64]) -> Result<()> {
    for level in levels {
        if !level.is_finite() || !(0.0..=1.0).contains(level) {
            return Err(ScenarioError::InvalidParameter(format!(
                "shift level must be within [0, 1], got {}",
                level
            )));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        assert!(ScenarioParameters::default().validate().is_ok());
    }

    #[test]
    fn test_rejects_out_of_range_level() {
        let params = ScenarioParameters::default().with_shift_levels(vec![0.1, 1.5]);
        assert!(matches!(
            params.validate(),
            Err(ScenarioError::InvalidParameter(_))
        ));

        let params = ScenarioParameters::default().with_shift_levels(vec![f64::NAN]);
        assert!(params.validate().is_err());
    }

    #[test]
    fn test_rejects_negative_price() {
        let params = ScenarioParameters {
            gas_unit_cost: -1.0,
            ..ScenarioParameters::default()
        };
        assert!(params.validate().is_err());
    }
}

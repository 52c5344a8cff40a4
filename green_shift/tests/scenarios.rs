use approx::assert_relative_eq;
use energy_data::{Measure, PivotRow, PivotTable};
use gas_forecast::{ForecastRecord, ForecastTable};
use green_shift::{
    from_tables, render_summary, simulate, ScenarioError, ScenarioMatrix, ScenarioParameters,
};
use pretty_assertions::assert_eq;
use rstest::rstest;
use tempfile::tempdir;

const GAS: [f64; 5] = [100.0, 110.0, 120.0, 130.0, 140.0];

fn pivot() -> PivotTable {
    PivotTable::new(
        vec![Measure::Coal, Measure::Gas, Measure::Renewables],
        vec![
            PivotRow { year: 2021, values: vec![900.0, 1500.0, 45.0] },
            PivotRow { year: 2022, values: vec![850.0, 1550.0, 50.0] },
        ],
    )
    .unwrap()
}

fn forecast_table() -> ForecastTable {
    ForecastTable::new(
        GAS.iter()
            .enumerate()
            .map(|(i, &gas)| ForecastRecord {
                year: 2023 + i as i32,
                gas_forecast_twh: gas,
                ci_lower: gas - 10.0,
                ci_upper: gas + 10.0,
            })
            .collect(),
    )
}

#[test]
fn test_worked_example() {
    let params = ScenarioParameters::default();
    let outcome = simulate(&GAS, 50.0, &[0.10], &params).unwrap();

    assert_relative_eq!(outcome.baseline.mean_gas, 120.0);
    assert_relative_eq!(outcome.baseline.emissions, 49.2, epsilon = 1e-9);
    assert_relative_eq!(outcome.baseline.cost, 7200.0, epsilon = 1e-9);
    assert_relative_eq!(outcome.baseline.tax, 4920.0, epsilon = 1e-9);
    assert_relative_eq!(outcome.baseline.intensity, 49.2 / 170.0, epsilon = 1e-12);

    let s = outcome.scenarios[0];
    assert_eq!(s.shift_pct, 10);
    assert_relative_eq!(s.emissions, 44.28, epsilon = 1e-9);
    assert_relative_eq!(s.cost, 6960.0, epsilon = 1e-9);
    assert_relative_eq!(s.savings, 240.0, epsilon = 1e-9);
    assert_relative_eq!(s.delta_emissions, -4.92, epsilon = 1e-9);
    assert_relative_eq!(s.tax_delta, 492.0, epsilon = 1e-9);
    // Total energy is unchanged by a shift
    assert_relative_eq!(s.intensity, 44.28 / 170.0, epsilon = 1e-12);
}

#[test]
fn test_zero_shift_matches_baseline() {
    let outcome = simulate(&GAS, 50.0, &[0.0], &ScenarioParameters::default()).unwrap();
    let s = outcome.scenarios[0];
    assert_eq!(s.shift_pct, 0);
    assert_eq!(s.delta_emissions, 0.0);
    assert_eq!(s.delta_intensity, 0.0);
    assert_eq!(s.savings, 0.0);
    assert_eq!(s.tax_delta, 0.0);
}

#[test]
fn test_emissions_non_increasing_in_shift() {
    let levels = [0.0, 0.05, 0.10, 0.20, 0.30, 0.5, 1.0];
    let outcome = simulate(&GAS, 50.0, &levels, &ScenarioParameters::default()).unwrap();
    for pair in outcome.scenarios.windows(2) {
        assert!(pair[1].emissions <= pair[0].emissions);
        assert!(pair[1].tax <= pair[0].tax);
    }
    assert_eq!(outcome.scenarios.last().unwrap().emissions, 0.0);
}

#[test]
fn test_output_follows_input_order() {
    let levels = [0.30, 0.05, 0.20];
    let outcome = simulate(&GAS, 50.0, &levels, &ScenarioParameters::default()).unwrap();
    let pcts: Vec<u32> = outcome.scenarios.iter().map(|s| s.shift_pct).collect();
    assert_eq!(pcts, vec![30, 5, 20]);
}

#[rstest]
#[case(0.07, 7)]
#[case(0.29, 29)]
#[case(0.57, 57)]
#[case(1.0, 100)]
fn test_shift_pct_rounds(#[case] shift: f64, #[case] expected: u32) {
    let outcome = simulate(&GAS, 50.0, &[shift], &ScenarioParameters::default()).unwrap();
    assert_eq!(outcome.scenarios[0].shift_pct, expected);
}

#[rstest]
#[case(-0.1)]
#[case(1.01)]
#[case(f64::INFINITY)]
fn test_invalid_shift_level(#[case] shift: f64) {
    let err = simulate(&GAS, 50.0, &[shift], &ScenarioParameters::default()).unwrap_err();
    assert!(matches!(err, ScenarioError::InvalidParameter(_)));
}

#[test]
fn test_empty_forecast() {
    let err = simulate(&[], 50.0, &[0.1], &ScenarioParameters::default()).unwrap_err();
    assert!(matches!(err, ScenarioError::EmptyForecast));

    let err = from_tables(&pivot(), &ForecastTable::new(vec![]), None).unwrap_err();
    assert!(matches!(err, ScenarioError::EmptyForecast));
}

#[test]
fn test_from_tables_uses_latest_year() {
    let inputs = from_tables(&pivot(), &forecast_table(), None).unwrap();
    assert_eq!(inputs.year, 2022);
    assert_eq!(inputs.renewables_baseline, 50.0);
    assert_eq!(inputs.gas_forecast, GAS.to_vec());

    let earlier = from_tables(&pivot(), &forecast_table(), Some(2021)).unwrap();
    assert_eq!(earlier.renewables_baseline, 45.0);
}

#[test]
fn test_missing_baseline_year() {
    let err = from_tables(&pivot(), &forecast_table(), Some(1990)).unwrap_err();
    assert!(matches!(err, ScenarioError::MissingBaselineYear(1990)));
}

#[test]
fn test_matrix_round_trip() {
    let inputs = from_tables(&pivot(), &forecast_table(), None).unwrap();
    let params = ScenarioParameters::default();
    let outcome = inputs.simulate(&params.shift_levels, &params).unwrap();
    let matrix = outcome.matrix();
    assert_eq!(matrix.len(), 4);

    let dir = tempdir().unwrap();
    let path = dir.path().join("scenario_matrix.csv");
    matrix.write_csv(&path).unwrap();

    let contents = std::fs::read_to_string(&path).unwrap();
    assert!(contents.starts_with(
        "Shift_%,Scenario_Emissions,Delta_Emissions,Emissions_Intensity,Energy_Cost,CO2_Tax_Exposure"
    ));

    let loaded = ScenarioMatrix::from_csv(&path).unwrap();
    assert_eq!(loaded.len(), matrix.len());
    for (read, written) in loaded.rows().iter().zip(matrix.rows()) {
        assert_eq!(read.shift_pct, written.shift_pct);
        assert_relative_eq!(read.scenario_emissions, written.scenario_emissions, epsilon = 1e-9);
        assert_relative_eq!(read.energy_cost, written.energy_cost, epsilon = 1e-9);
        assert_relative_eq!(read.co2_tax_exposure, written.co2_tax_exposure, epsilon = 1e-9);
    }
}

#[test]
fn test_summary_text() {
    let outcome = simulate(&GAS, 50.0, &[0.10], &ScenarioParameters::default()).unwrap();
    let text = render_summary(&outcome);

    assert!(text.starts_with("Green Shift Scenario Comparison\n\n"));
    assert!(text.contains("Baseline Gas Forecast: 120.0 TWh\n"));
    assert!(text.contains("Baseline Emissions: 49.2 Mt CO₂\n"));
    assert!(text.contains("Baseline Cost: $7,200\n"));
    assert!(text.contains("Baseline CO₂ Tax: $4,920\n"));
    assert!(text.contains("Scenario Comparisons:\n"));
    assert!(text.contains(
        "10% shift → Δ Emissions: -4.9 Mt CO₂, Δ Intensity: -0.029, Savings: $240, Tax Δ: $492"
    ));
}

#[test]
fn test_parameters_from_partial_toml() {
    let params: ScenarioParameters =
        toml::from_str("co2_tax_rate = 50.0\nshift_levels = [0.15]").unwrap();
    assert_eq!(params.co2_tax_rate, 50.0);
    assert_eq!(params.gas_co2_factor, 0.41);
    assert_eq!(params.shift_levels, vec![0.15]);
}

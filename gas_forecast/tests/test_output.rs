use approx::assert_abs_diff_eq;
use gas_forecast::{
    ForecastEvaluator, ForecastOutput, ForecastRecord, ForecastTable, ModelComparison, TimeSeries,
};
use std::fs;
use tempfile::tempdir;

fn sample_output() -> ForecastOutput {
    ForecastOutput::new_with_intervals(
        "ETS".to_string(),
        vec![2024, 2025, 2026],
        vec![8200.5, 8371.25, 8542.125],
        vec![(8000.1, 8400.9), (8170.85, 8571.65), (8341.725, 8742.525)],
        102.04,
    )
    .unwrap()
}

#[test]
fn test_forecast_table_round_trip() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("us_gas_forecast_with_ci.csv");

    let table = sample_output().to_table();
    table.write_csv(&path).unwrap();

    let contents = fs::read_to_string(&path).unwrap();
    assert!(contents.starts_with("Year,Gas_Forecast_TWh,CI_Lower,CI_Upper"));

    let loaded = ForecastTable::from_csv(&path).unwrap();
    assert_eq!(loaded.len(), 3);
    assert_eq!(loaded.years(), vec![2024, 2025, 2026]);
    for (read, written) in loaded.records().iter().zip(table.records()) {
        assert_eq!(read.year, written.year);
        assert_abs_diff_eq!(read.gas_forecast_twh, written.gas_forecast_twh, epsilon = 1e-9);
        assert_abs_diff_eq!(read.ci_lower, written.ci_lower, epsilon = 1e-9);
        assert_abs_diff_eq!(read.ci_upper, written.ci_upper, epsilon = 1e-9);
    }
}

#[test]
fn test_interval_must_contain_point() {
    let result = ForecastOutput::new_with_intervals(
        "ARIMA".to_string(),
        vec![2024],
        vec![10.0],
        vec![(11.0, 12.0)],
        0.5,
    );
    assert!(result.is_err());

    let mismatched = ForecastOutput::new_with_intervals(
        "ARIMA".to_string(),
        vec![2024, 2025],
        vec![10.0],
        vec![(9.0, 11.0)],
        0.5,
    );
    assert!(mismatched.is_err());
}

#[test]
fn test_gas_forecast_column() {
    let table = ForecastTable::new(vec![
        ForecastRecord { year: 2024, gas_forecast_twh: 1.0, ci_lower: 0.5, ci_upper: 1.5 },
        ForecastRecord { year: 2025, gas_forecast_twh: 2.0, ci_lower: 1.5, ci_upper: 2.5 },
    ]);
    assert_eq!(table.gas_forecast(), vec![1.0, 2.0]);
    assert!(!table.is_empty());
}

#[test]
fn test_model_comparison_json() {
    let series = TimeSeries::from_pairs(
        (2000..2020).map(|year| (year, 300.0 + 7.5 * (year - 2000) as f64 + (year % 3) as f64)),
    )
    .unwrap();
    let report = ForecastEvaluator::default().evaluate(&series, 2015).unwrap();
    let comparison = report.comparison().unwrap();

    let dir = tempdir().unwrap();
    let path = dir.path().join("model_comparison.json");
    comparison.write_json(&path).unwrap();

    let loaded: ModelComparison =
        serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
    assert_eq!(loaded.selected, comparison.selected);
    assert_eq!(loaded.cutoff_year, 2015);
    for (read, written) in loaded.models.iter().zip(&comparison.models) {
        assert_eq!(read.name, written.name);
        assert_abs_diff_eq!(read.rmse, written.rmse, epsilon = 1e-9);
        assert_abs_diff_eq!(read.mae, written.mae, epsilon = 1e-9);
    }
}

#[test]
fn test_missing_forecast_file() {
    assert!(ForecastTable::from_csv("/nonexistent/forecast.csv").is_err());
}

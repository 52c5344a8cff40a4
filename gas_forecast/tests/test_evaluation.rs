use approx::assert_abs_diff_eq;
use gas_forecast::models::arima::ArimaModel;
use gas_forecast::models::exponential_smoothing::ExponentialSmoothing;
use gas_forecast::{select_best, ForecastError, ForecastEvaluator, ModelFamily, TimeSeries};
use rstest::rstest;

/// Gas consumption shaped like the U.S. series: steady growth with wobble
fn gas_series() -> TimeSeries {
    let values = [
        5400.0, 5520.0, 5390.0, 5610.0, 5580.0, 5490.0, 5700.0, 5650.0, 5810.0, 5760.0, 6020.0,
        6180.0, 6350.0, 6290.0, 6480.0, 6700.0, 6850.0, 6790.0, 7320.0, 7560.0, 7490.0, 7710.0,
        7950.0, 8120.0,
    ];
    TimeSeries::from_pairs((2000..).zip(values)).unwrap()
}

#[test]
fn test_evaluate_returns_one_result_per_candidate() {
    let series = gas_series();
    let evaluator = ForecastEvaluator::default();

    let report = evaluator.evaluate(&series, 2015).unwrap();
    assert_eq!(report.len(), 2);

    let names: Vec<&str> = report.iter().map(|r| r.name()).collect();
    assert_eq!(names, vec!["ETS", "ARIMA"]);

    let test_len = report.split().test().len();
    assert_eq!(test_len, 8);
    for result in report.iter() {
        assert_eq!(result.point_forecast().len(), test_len);
        assert!(result.mae() >= 0.0);
        assert!(result.rmse() >= 0.0);
        // RMSE never undercuts MAE
        assert!(result.rmse() + 1e-9 >= result.mae());
    }
}

#[rstest]
#[case(1999)]
#[case(2023)]
#[case(2050)]
fn test_empty_side_is_insufficient_data(#[case] cutoff: i32) {
    let series = gas_series();
    let result = ForecastEvaluator::default().evaluate(&series, cutoff);
    assert!(matches!(result, Err(ForecastError::InsufficientData(_))));
}

#[test]
fn test_too_short_training_window_is_model_fit_error() {
    let series = gas_series();
    // Three training points satisfy ETS but not ARIMA(1,1,1)
    let result = ForecastEvaluator::default().evaluate(&series, 2002);
    match result {
        Err(ForecastError::ModelFit(msg)) => assert!(msg.contains("ARIMA")),
        other => panic!("expected ModelFit, got {:?}", other),
    }
}

#[test]
fn test_select_best_is_lowest_rmse_and_deterministic() {
    let series = gas_series();
    let report = ForecastEvaluator::default().evaluate(&series, 2015).unwrap();

    let best = select_best(&report).unwrap();
    assert_eq!(best, select_best(&report).unwrap());

    let best_rmse = report.get(best).unwrap().rmse();
    for result in report.iter() {
        assert!(best_rmse <= result.rmse());
    }
}

#[test]
fn test_select_best_tie_keeps_first_candidate() {
    // Two identical random walks score exactly the same
    let evaluator = ForecastEvaluator::new(vec![
        ModelFamily::Arima(ArimaModel::new(0, 1, 0).unwrap()),
        ModelFamily::ExponentialSmoothing(ExponentialSmoothing::new(1.0, 0.0).unwrap()),
    ])
    .unwrap();

    let series =
        TimeSeries::from_pairs((2000..).zip([10.0, 10.0, 10.0, 10.0, 12.0, 14.0])).unwrap();
    let report = evaluator.evaluate(&series, 2003).unwrap();

    let arima = report.get("ARIMA").unwrap().rmse();
    let ets = report.get("ETS").unwrap().rmse();
    assert_abs_diff_eq!(arima, ets, epsilon = 0.0);
    assert_eq!(select_best(&report).unwrap(), "ARIMA");
}

#[test]
fn test_forecast_band_is_constant_and_contains_point() {
    let series = gas_series();
    let evaluator = ForecastEvaluator::default();
    let report = evaluator.evaluate(&series, 2015).unwrap();

    let forecast = evaluator.forecast_best(&report, 5).unwrap();
    assert_eq!(forecast.horizon(), 5);
    assert_eq!(forecast.years(), &[2024, 2025, 2026, 2027, 2028]);
    assert_eq!(forecast.model_name(), select_best(&report).unwrap());

    let width = forecast.ci_upper()[0] - forecast.ci_lower()[0];
    assert_abs_diff_eq!(width, 2.0 * 1.96 * forecast.residual_std(), epsilon = 1e-9);
    for i in 0..forecast.horizon() {
        assert!(forecast.ci_lower()[i] <= forecast.point_forecast()[i]);
        assert!(forecast.point_forecast()[i] <= forecast.ci_upper()[i]);
        assert_abs_diff_eq!(forecast.ci_upper()[i] - forecast.ci_lower()[i], width, epsilon = 1e-9);
    }
}

#[test]
fn test_forecast_extends_training_fit_without_refit() {
    let series = gas_series();
    let evaluator = ForecastEvaluator::default();
    let report = evaluator.evaluate(&series, 2015).unwrap();
    let ets = report.get("ETS").unwrap();

    // The first forecast steps repeat the test-window forecast of the training fit
    let forecast = evaluator.forecast(ets, 3, 2024).unwrap();
    for i in 0..3 {
        assert_abs_diff_eq!(forecast.point_forecast()[i], ets.point_forecast()[i], epsilon = 1e-9);
    }
}

#[test]
fn test_zero_horizon_is_rejected() {
    let series = gas_series();
    let evaluator = ForecastEvaluator::default();
    let report = evaluator.evaluate(&series, 2015).unwrap();
    let arima = report.get("ARIMA").unwrap();

    assert!(matches!(
        evaluator.forecast(arima, 0, 2024),
        Err(ForecastError::ValidationError(_))
    ));
}

#[test]
fn test_candidate_list_validation() {
    assert!(ForecastEvaluator::new(Vec::new()).is_err());
    assert!(ForecastEvaluator::new(vec![
        ModelFamily::Arima(ArimaModel::arima_111()),
        ModelFamily::Arima(ArimaModel::new(0, 1, 1).unwrap()),
    ])
    .is_err());
}

#[test]
fn test_comparison_marks_selected_model() {
    let series = gas_series();
    let report = ForecastEvaluator::default().evaluate(&series, 2015).unwrap();
    let comparison = report.comparison().unwrap();

    assert_eq!(comparison.cutoff_year, 2015);
    assert_eq!(comparison.train_years, (Some(2000), Some(2015)));
    assert_eq!(comparison.test_years, (Some(2016), Some(2023)));
    assert_eq!(comparison.selected, select_best(&report).unwrap());
    assert_eq!(comparison.models.len(), 2);
    assert!(comparison.to_string().contains("Selected model"));
}

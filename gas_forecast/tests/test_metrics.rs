use approx::assert_abs_diff_eq;
use gas_forecast::metrics::{
    evaluate_forecast, mean_absolute_error, mean_squared_error, root_mean_squared_error,
};

#[test]
fn test_regression_metrics() {
    let actual = vec![10.0, 20.0, 30.0, 40.0, 50.0];
    let predicted = vec![12.0, 18.0, 33.0, 37.0, 52.0];

    // Test MAE
    let mae = mean_absolute_error(&actual, &predicted);
    assert_abs_diff_eq!(mae, 2.4, epsilon = 1e-12);

    // Test MSE
    let mse = mean_squared_error(&actual, &predicted);
    assert_abs_diff_eq!(mse, 6.0, epsilon = 1e-12);

    // Test RMSE
    let rmse = root_mean_squared_error(&actual, &predicted);
    assert_abs_diff_eq!(rmse, 6.0_f64.sqrt(), epsilon = 1e-12);

    let metrics = evaluate_forecast(&actual, &predicted).unwrap();
    assert_abs_diff_eq!(metrics.mae, mae);
    assert_abs_diff_eq!(metrics.rmse, rmse);
    assert_eq!(metrics.to_string(), "MAE=2.4  RMSE=2.4");
}

#[test]
fn test_perfect_forecast() {
    let values = vec![1.5, 2.5, 3.5];
    let metrics = evaluate_forecast(&values, &values).unwrap();
    assert_eq!(metrics.mae, 0.0);
    assert_eq!(metrics.rmse, 0.0);
}

#[test]
fn test_error_handling() {
    // Test with empty vectors
    let empty: Vec<f64> = vec![];
    assert!(evaluate_forecast(&empty, &empty).is_err());

    // Test with mismatched lengths
    assert!(evaluate_forecast(&[1.0, 2.0], &[1.0]).is_err());
}

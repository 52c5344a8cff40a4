//! Back-testing, model selection and forecasting with confidence intervals

use crate::error::{ForecastError, Result};
use crate::metrics::{evaluate_forecast, ErrorMetrics};
use crate::models::{ModelFamily, TrainedForecastModel};
use crate::output::{ForecastOutput, ModelComparison, ModelScore};
use crate::series::{TimeSeries, TrainTestSplit};
use energy_math::sample_std_dev;
use indexmap::IndexMap;
use tracing::{debug, info};

/// Two-sided 95% normal quantile used for the forecast band
pub const CONFIDENCE_Z: f64 = 1.96;

/// Outcome of back-testing one model family
#[derive(Debug)]
pub struct ModelResult {
    name: String,
    point_forecast: Vec<f64>,
    metrics: ErrorMetrics,
    model: Box<dyn TrainedForecastModel>,
}

impl ModelResult {
    /// Family label, e.g. `ETS` or `ARIMA`
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Forecast over the test window, aligned with the test years
    pub fn point_forecast(&self) -> &[f64] {
        &self.point_forecast
    }

    pub fn mae(&self) -> f64 {
        self.metrics.mae
    }

    pub fn rmse(&self) -> f64 {
        self.metrics.rmse
    }

    pub fn metrics(&self) -> ErrorMetrics {
        self.metrics
    }

    /// Model fitted on the training window
    pub fn model(&self) -> &dyn TrainedForecastModel {
        self.model.as_ref()
    }
}

/// Results of [`ForecastEvaluator::evaluate`], keyed by model label in candidate order
#[derive(Debug)]
pub struct EvaluationReport {
    split: TrainTestSplit,
    results: IndexMap<String, ModelResult>,
}

impl EvaluationReport {
    pub fn split(&self) -> &TrainTestSplit {
        &self.split
    }

    pub fn get(&self, name: &str) -> Option<&ModelResult> {
        self.results.get(name)
    }

    /// Results in candidate order
    pub fn iter(&self) -> impl Iterator<Item = &ModelResult> {
        self.results.values()
    }

    pub fn len(&self) -> usize {
        self.results.len()
    }

    pub fn is_empty(&self) -> bool {
        self.results.is_empty()
    }

    /// First year after the full (train + test) series
    pub fn next_year(&self) -> Result<i32> {
        self.split
            .test()
            .last_year()
            .or_else(|| self.split.train().last_year())
            .map(|year| year + 1)
            .ok_or_else(|| ForecastError::InsufficientData("Evaluated series is empty".to_string()))
    }

    /// Serializable summary of the back-test and the selected model
    pub fn comparison(&self) -> Result<ModelComparison> {
        let selected = select_best(self)?.to_string();
        let train = self.split.train();
        let test = self.split.test();

        Ok(ModelComparison {
            cutoff_year: self.split.cutoff_year(),
            train_years: (train.first_year(), train.last_year()),
            test_years: (test.first_year(), test.last_year()),
            selected,
            models: self
                .iter()
                .map(|result| ModelScore {
                    name: result.name().to_string(),
                    description: result.model().name().to_string(),
                    mae: result.mae(),
                    rmse: result.rmse(),
                })
                .collect(),
        })
    }
}

/// Pick the model with the strictly lowest test RMSE
///
/// RMSE is the only ranking key. On an exact tie the earlier candidate wins,
/// and a NaN RMSE never replaces a finite one.
pub fn select_best(report: &EvaluationReport) -> Result<&str> {
    let mut best: Option<&ModelResult> = None;
    for result in report.iter() {
        if best.map_or(true, |current| beats(result.rmse(), current.rmse())) {
            best = Some(result);
        }
    }

    best.map(|result| result.name()).ok_or_else(|| {
        ForecastError::InsufficientData("No model results to select from".to_string())
    })
}

/// Strictly lower RMSE wins; a NaN never beats a number
fn beats(candidate: f64, current: f64) -> bool {
    candidate < current || (current.is_nan() && !candidate.is_nan())
}

/// Fits candidate model families on a training window and scores them on the test window
#[derive(Debug, Clone)]
pub struct ForecastEvaluator {
    candidates: Vec<ModelFamily>,
}

impl Default for ForecastEvaluator {
    fn default() -> Self {
        Self {
            candidates: ModelFamily::default_candidates(),
        }
    }
}

impl ForecastEvaluator {
    /// Create an evaluator over a custom, non-empty candidate list
    pub fn new(candidates: Vec<ModelFamily>) -> Result<Self> {
        if candidates.is_empty() {
            return Err(ForecastError::InvalidParameter(
                "At least one candidate model family is required".to_string(),
            ));
        }

        let mut labels: Vec<&str> = candidates.iter().map(|c| c.label()).collect();
        labels.sort_unstable();
        if let Some(w) = labels.windows(2).find(|w| w[0] == w[1]) {
            return Err(ForecastError::InvalidParameter(format!(
                "Candidate family {} listed more than once",
                w[0]
            )));
        }

        Ok(Self { candidates })
    }

    pub fn candidates(&self) -> &[ModelFamily] {
        &self.candidates
    }

    /// Split `series` at `cutoff_year`, fit every candidate on the training
    /// window and score its forecast of the test window.
    ///
    /// Any candidate failing to fit aborts the evaluation.
    pub fn evaluate(&self, series: &TimeSeries, cutoff_year: i32) -> Result<EvaluationReport> {
        let split = series.split_at_year(cutoff_year);
        split.ensure_non_empty()?;

        let test = split.test();
        info!(
            cutoff_year,
            train = split.train().len(),
            test = test.len(),
            "evaluating {} candidate models",
            self.candidates.len()
        );

        let mut results = IndexMap::with_capacity(self.candidates.len());
        for family in &self.candidates {
            let model = family.fit(split.train()).map_err(|e| match e {
                ForecastError::ModelFit(msg) | ForecastError::InsufficientData(msg) => {
                    ForecastError::ModelFit(format!("{}: {}", family.label(), msg))
                }
                other => other,
            })?;

            let point_forecast = model.forecast(test.len())?;
            let metrics = evaluate_forecast(test.values(), &point_forecast)?;
            debug!(
                model = family.label(),
                mae = metrics.mae,
                rmse = metrics.rmse,
                "scored candidate"
            );

            results.insert(
                family.label().to_string(),
                ModelResult {
                    name: family.label().to_string(),
                    point_forecast,
                    metrics,
                    model,
                },
            );
        }

        Ok(EvaluationReport { split, results })
    }

    /// Extend the training-window fit of `model` by `horizon` years
    ///
    /// The model is not refitted on the test window. The band is
    /// `point ± 1.96 * s`, where `s` is the sample standard deviation of the
    /// training residuals, so its width is the same for every year.
    pub fn forecast(
        &self,
        model: &ModelResult,
        horizon: usize,
        first_year: i32,
    ) -> Result<ForecastOutput> {
        if horizon == 0 {
            return Err(ForecastError::ValidationError(
                "Forecast horizon must be at least one year".to_string(),
            ));
        }

        let residuals = model.model().residuals();
        let residual_std = sample_std_dev(&residuals).map_err(|e| {
            ForecastError::ModelFit(format!("{} residual spread: {}", model.name(), e))
        })?;

        let point_forecast = model.model().forecast(horizon)?;
        let margin = CONFIDENCE_Z * residual_std;
        let intervals = point_forecast
            .iter()
            .map(|value| (value - margin, value + margin))
            .collect();

        let years = (0..horizon as i32).map(|offset| first_year + offset).collect();

        ForecastOutput::new_with_intervals(
            model.name().to_string(),
            years,
            point_forecast,
            intervals,
            residual_std,
        )
    }

    /// Select the best model of `report` and forecast `horizon` years after the full series
    pub fn forecast_best(
        &self,
        report: &EvaluationReport,
        horizon: usize,
    ) -> Result<ForecastOutput> {
        let best = select_best(report)?;
        let result = report
            .get(best)
            .ok_or_else(|| ForecastError::ValidationError(format!("Unknown model {}", best)))?;

        info!(model = best, horizon, "forecasting with selected model");
        self.forecast(result, horizon, report.next_year()?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lower_rmse_beats_current() {
        assert!(beats(1.0, 2.0));
        assert!(!beats(2.0, 2.0));
        assert!(!beats(3.0, 2.0));
    }

    #[test]
    fn test_nan_rmse_never_selected_over_finite() {
        assert!(!beats(f64::NAN, 2.0));
        assert!(beats(2.0, f64::NAN));
        assert!(!beats(f64::NAN, f64::NAN));
    }
}

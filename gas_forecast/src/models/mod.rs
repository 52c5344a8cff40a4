//! Forecasting models for yearly series
//!
//! Every model family implements [`ForecastModel`], which trains on a
//! [`TimeSeries`] and yields a [`TrainedForecastModel`]. The evaluator only
//! talks to families through [`ModelFamily`], so a new family is added by
//! extending that enum and nothing else.

use crate::error::{ForecastError, Result};
use crate::series::TimeSeries;
use std::fmt::{self, Debug};

pub mod arima;
pub mod exponential_smoothing;

pub use arima::{ArimaModel, TrainedArimaModel};
pub use exponential_smoothing::{ExponentialSmoothing, TrainedExponentialSmoothing};

/// One-step-ahead in-sample fit of a trained model
///
/// The first `warm_up` observations only seed the model state and have no
/// fitted value; `fitted[i]` belongs to `observed[warm_up + i]`.
#[derive(Debug, Clone, PartialEq)]
pub struct InSampleFit {
    observed: Vec<f64>,
    fitted: Vec<f64>,
    warm_up: usize,
}

impl InSampleFit {
    pub(crate) fn new(observed: Vec<f64>, fitted: Vec<f64>, warm_up: usize) -> Result<Self> {
        if warm_up + fitted.len() != observed.len() {
            return Err(ForecastError::ValidationError(format!(
                "Fitted values ({}) plus warm-up ({}) don't cover {} observations",
                fitted.len(),
                warm_up,
                observed.len()
            )));
        }

        Ok(Self {
            observed,
            fitted,
            warm_up,
        })
    }

    /// Training observations the model was fitted on
    pub fn observed(&self) -> &[f64] {
        &self.observed
    }

    /// One-step-ahead fitted values after the warm-up
    pub fn fitted(&self) -> &[f64] {
        &self.fitted
    }

    /// Number of leading observations without a fitted value
    pub fn warm_up(&self) -> usize {
        self.warm_up
    }

    /// Residuals `actual - fitted` over the fitted span
    pub fn residuals(&self) -> Vec<f64> {
        self.observed[self.warm_up..]
            .iter()
            .zip(&self.fitted)
            .map(|(actual, fitted)| actual - fitted)
            .collect()
    }

    /// Sum of squared residuals
    pub fn sse(&self) -> f64 {
        self.residuals().iter().map(|r| r * r).sum()
    }
}

/// Trained forecast model
pub trait TrainedForecastModel: Debug {
    /// Generate point forecasts for the `horizon` periods after the training window
    fn forecast(&self, horizon: usize) -> Result<Vec<f64>>;

    /// In-sample one-step-ahead fit on the training window
    fn in_sample(&self) -> &InSampleFit;

    /// Training residuals (actual minus fitted)
    fn residuals(&self) -> Vec<f64> {
        self.in_sample().residuals()
    }

    /// Name of the model including its fitted parameters
    fn name(&self) -> &str;
}

/// Forecast model that can be trained on time series data
pub trait ForecastModel: Debug + Clone {
    /// The type of trained model produced
    type Trained: TrainedForecastModel + 'static;

    /// Train the model on time series data
    fn train(&self, data: &TimeSeries) -> Result<Self::Trained>;

    /// Smallest number of observations the model can be trained on
    fn min_observations(&self) -> usize;

    /// Get the name of the model
    fn name(&self) -> &str;
}

/// Closed set of candidate model families
#[derive(Debug, Clone)]
pub enum ModelFamily {
    /// Holt exponential smoothing: additive trend, no seasonal component
    ExponentialSmoothing(ExponentialSmoothing),
    /// Non-seasonal ARIMA
    Arima(ArimaModel),
}

impl ModelFamily {
    /// Additive-trend exponential smoothing followed by ARIMA(1,1,1)
    pub fn default_candidates() -> Vec<ModelFamily> {
        vec![
            ModelFamily::ExponentialSmoothing(ExponentialSmoothing::additive_trend()),
            ModelFamily::Arima(ArimaModel::arima_111()),
        ]
    }

    /// Short identifier used as the key of evaluation results
    pub fn label(&self) -> &'static str {
        match self {
            ModelFamily::ExponentialSmoothing(_) => "ETS",
            ModelFamily::Arima(_) => "ARIMA",
        }
    }

    /// Smallest training window the family accepts
    pub fn min_observations(&self) -> usize {
        match self {
            ModelFamily::ExponentialSmoothing(model) => model.min_observations(),
            ModelFamily::Arima(model) => model.min_observations(),
        }
    }

    /// Fit the family on `data`
    pub fn fit(&self, data: &TimeSeries) -> Result<Box<dyn TrainedForecastModel>> {
        match self {
            ModelFamily::ExponentialSmoothing(model) => fit_boxed(model, data),
            ModelFamily::Arima(model) => fit_boxed(model, data),
        }
    }
}

impl fmt::Display for ModelFamily {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ModelFamily::ExponentialSmoothing(model) => write!(f, "{}", model.name()),
            ModelFamily::Arima(model) => write!(f, "{}", model.name()),
        }
    }
}

fn fit_boxed<M: ForecastModel>(
    model: &M,
    data: &TimeSeries,
) -> Result<Box<dyn TrainedForecastModel>> {
    if data.len() < model.min_observations() {
        return Err(ForecastError::ModelFit(format!(
            "{} needs at least {} observations, got {}",
            model.name(),
            model.min_observations(),
            data.len()
        )));
    }

    let trained = model.train(data)?;
    Ok(Box::new(trained))
}

//! Holt exponential smoothing with an additive trend

use crate::error::{ForecastError, Result};
use crate::models::{ForecastModel, InSampleFit, TrainedForecastModel};
use crate::series::TimeSeries;
use energy_math::GridSearch;
use tracing::debug;

const PARAMETER_BOUNDS: (f64, f64) = (0.01, 0.99);

/// Additive-trend, non-seasonal exponential smoothing model
///
/// Smoothing parameters are either fixed up front or chosen during training
/// by minimising the in-sample sum of squared one-step errors.
#[derive(Debug, Clone)]
pub struct ExponentialSmoothing {
    /// Name of the model
    name: String,
    /// Level smoothing parameter, `None` when estimated
    alpha: Option<f64>,
    /// Trend smoothing parameter, `None` when estimated
    beta: Option<f64>,
}

/// Trained exponential smoothing model
#[derive(Debug, Clone)]
pub struct TrainedExponentialSmoothing {
    /// Name of the model
    name: String,
    /// Level smoothing parameter
    alpha: f64,
    /// Trend smoothing parameter
    beta: f64,
    /// Level at the end of the training window
    level: f64,
    /// Trend at the end of the training window
    trend: f64,
    /// One-step-ahead in-sample fit
    fit: InSampleFit,
}

/// Final state of one smoothing pass
struct SmoothingPass {
    level: f64,
    trend: f64,
    fitted: Vec<f64>,
}

impl ExponentialSmoothing {
    /// Model whose smoothing parameters are estimated from the data
    pub fn additive_trend() -> Self {
        Self {
            name: "Exponential Smoothing (additive trend)".to_string(),
            alpha: None,
            beta: None,
        }
    }

    /// Model with fixed smoothing parameters
    pub fn new(alpha: f64, beta: f64) -> Result<Self> {
        if alpha <= 0.0 || alpha > 1.0 {
            return Err(ForecastError::InvalidParameter(
                "Alpha must be in (0, 1]".to_string(),
            ));
        }
        if beta < 0.0 || beta > 1.0 {
            return Err(ForecastError::InvalidParameter(
                "Beta must be in [0, 1]".to_string(),
            ));
        }

        Ok(Self {
            name: format!("Exponential Smoothing (alpha={}, beta={})", alpha, beta),
            alpha: Some(alpha),
            beta: Some(beta),
        })
    }

    /// Run the Holt recursions over `values` (at least two observations)
    fn smooth(values: &[f64], alpha: f64, beta: f64) -> SmoothingPass {
        let mut level = values[0];
        let mut trend = values[1] - values[0];
        let mut fitted = Vec::with_capacity(values.len() - 1);

        for &value in &values[1..] {
            let forecast = level + trend;
            fitted.push(forecast);

            let previous_level = level;
            level = alpha * value + (1.0 - alpha) * forecast;
            trend = beta * (level - previous_level) + (1.0 - beta) * trend;
        }

        SmoothingPass {
            level,
            trend,
            fitted,
        }
    }

    fn sse(values: &[f64], fitted: &[f64]) -> f64 {
        values[1..]
            .iter()
            .zip(fitted)
            .map(|(v, f)| (v - f).powi(2))
            .sum()
    }
}

impl ForecastModel for ExponentialSmoothing {
    type Trained = TrainedExponentialSmoothing;

    fn train(&self, data: &TimeSeries) -> Result<Self::Trained> {
        let values = data.values();
        if values.len() < self.min_observations() {
            return Err(ForecastError::ModelFit(format!(
                "Exponential smoothing needs at least {} observations, got {}",
                self.min_observations(),
                values.len()
            )));
        }

        let (alpha, beta) = match (self.alpha, self.beta) {
            (Some(alpha), Some(beta)) => (alpha, beta),
            _ => {
                let outcome = GridSearch::new(PARAMETER_BOUNDS, PARAMETER_BOUNDS)
                    .map_err(|e| ForecastError::ModelFit(e.to_string()))?
                    .minimize(|alpha, beta| {
                        let pass = Self::smooth(values, alpha, beta);
                        Self::sse(values, &pass.fitted)
                    })
                    .map_err(|e| ForecastError::ModelFit(format!("Exponential smoothing: {}", e)))?;
                outcome.params
            }
        };

        let pass = Self::smooth(values, alpha, beta);
        if !pass.level.is_finite() || !pass.trend.is_finite() {
            return Err(ForecastError::ModelFit(
                "Exponential smoothing state diverged".to_string(),
            ));
        }

        debug!(alpha, beta, level = pass.level, trend = pass.trend, "fitted exponential smoothing");

        Ok(TrainedExponentialSmoothing {
            name: format!("ETS(A,A,N) alpha={:.3} beta={:.3}", alpha, beta),
            alpha,
            beta,
            level: pass.level,
            trend: pass.trend,
            fit: InSampleFit::new(values.to_vec(), pass.fitted, 1)?,
        })
    }

    fn min_observations(&self) -> usize {
        3
    }

    fn name(&self) -> &str {
        &self.name
    }
}

impl TrainedExponentialSmoothing {
    /// Level smoothing parameter used
    pub fn alpha(&self) -> f64 {
        self.alpha
    }

    /// Trend smoothing parameter used
    pub fn beta(&self) -> f64 {
        self.beta
    }

    /// Level at the end of the training window
    pub fn level(&self) -> f64 {
        self.level
    }

    /// Trend at the end of the training window
    pub fn trend(&self) -> f64 {
        self.trend
    }
}

impl TrainedForecastModel for TrainedExponentialSmoothing {
    fn forecast(&self, horizon: usize) -> Result<Vec<f64>> {
        Ok((1..=horizon)
            .map(|h| self.level + h as f64 * self.trend)
            .collect())
    }

    fn in_sample(&self) -> &InSampleFit {
        &self.fit
    }

    fn name(&self) -> &str {
        &self.name
    }
}

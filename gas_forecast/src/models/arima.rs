//! ARIMA models for time series forecasting
//!
//! Only the low orders used for short annual series are supported:
//! p, d, q each 0 or 1. Coefficients are estimated by conditional sum of
//! squares, with pre-sample errors set to zero.

use crate::error::{ForecastError, Result};
use crate::models::{ForecastModel, InSampleFit, TrainedForecastModel};
use crate::series::TimeSeries;
use energy_math::{difference, GridSearch};
use tracing::debug;

/// Bounds keeping the AR part stationary and the MA part invertible
const COEFFICIENT_BOUNDS: (f64, f64) = (-0.99, 0.99);

/// ARIMA model (AutoRegressive Integrated Moving Average)
#[derive(Debug, Clone)]
pub struct ArimaModel {
    /// Name of the model
    name: String,
    /// AR order (p)
    p: usize,
    /// Differencing order (d)
    d: usize,
    /// MA order (q)
    q: usize,
}

/// Trained ARIMA model
#[derive(Debug, Clone)]
pub struct TrainedArimaModel {
    /// Name of the model
    name: String,
    /// Differencing order (d)
    d: usize,
    /// Fitted AR coefficient (0 when p = 0)
    phi: f64,
    /// Fitted MA coefficient (0 when q = 0)
    theta: f64,
    /// Level the differenced process is measured against
    anchor: f64,
    /// Last value of the working (differenced or demeaned) series
    last_working: f64,
    /// Last one-step error on the working series
    last_error: f64,
    /// One-step-ahead in-sample fit in original units
    fit: InSampleFit,
}

/// Result of running the ARMA(1,1) error recursion over the working series
struct ConditionalFit {
    predictions: Vec<f64>,
    errors: Vec<f64>,
}

impl ArimaModel {
    /// Create a new ARIMA model
    pub fn new(p: usize, d: usize, q: usize) -> Result<Self> {
        if p > 1 || d > 1 || q > 1 {
            return Err(ForecastError::InvalidParameter(format!(
                "ARIMA({},{},{}) is not supported; orders must be 0 or 1",
                p, d, q
            )));
        }

        Ok(Self {
            name: format!("ARIMA({},{},{})", p, d, q),
            p,
            d,
            q,
        })
    }

    /// The ARIMA(1,1,1) model used as a default candidate
    pub fn arima_111() -> Self {
        Self {
            name: "ARIMA(1,1,1)".to_string(),
            p: 1,
            d: 1,
            q: 1,
        }
    }

    pub fn order(&self) -> (usize, usize, usize) {
        (self.p, self.d, self.q)
    }

    /// Index of the first working observation with a prediction
    fn start(&self) -> usize {
        self.p
    }

    /// Run the conditional recursion for fixed coefficients
    fn recurse(&self, working: &[f64], phi: f64, theta: f64) -> ConditionalFit {
        let start = self.start();
        let mut predictions = Vec::with_capacity(working.len().saturating_sub(start));
        let mut errors = vec![0.0; working.len()];

        for t in start..working.len() {
            let ar = if self.p == 1 { phi * working[t - 1] } else { 0.0 };
            let ma = if self.q == 1 && t > 0 { theta * errors[t - 1] } else { 0.0 };
            let prediction = ar + ma;
            errors[t] = working[t] - prediction;
            predictions.push(prediction);
        }

        ConditionalFit { predictions, errors }
    }

    fn coefficients(&self, a: f64, b: f64) -> (f64, f64) {
        let phi = if self.p == 1 { a } else { 0.0 };
        let theta = if self.q == 1 { b } else { 0.0 };
        (phi, theta)
    }
}

impl ForecastModel for ArimaModel {
    type Trained = TrainedArimaModel;

    fn train(&self, data: &TimeSeries) -> Result<TrainedArimaModel> {
        let values = data.values();
        if values.len() < self.min_observations() {
            return Err(ForecastError::ModelFit(format!(
                "Insufficient data for {}. Need at least {} observations.",
                self.name,
                self.min_observations()
            )));
        }

        // Working series: first differences, or deviations from the mean when d = 0
        let (working, anchor) = if self.d == 1 {
            (difference(values, 1)?, values[values.len() - 1])
        } else {
            let mean = energy_math::mean(values)?;
            (values.iter().map(|v| v - mean).collect::<Vec<_>>(), mean)
        };

        let (phi, theta) = if self.p == 0 && self.q == 0 {
            (0.0, 0.0)
        } else {
            let outcome = GridSearch::new(COEFFICIENT_BOUNDS, COEFFICIENT_BOUNDS)
                .map_err(|e| ForecastError::ModelFit(e.to_string()))?
                .minimize(|a, b| {
                    let (phi, theta) = self.coefficients(a, b);
                    self.recurse(&working, phi, theta)
                        .errors
                        .iter()
                        .map(|e| e * e)
                        .sum()
                })
                .map_err(|e| ForecastError::ModelFit(format!("{}: {}", self.name, e)))?;
            self.coefficients(outcome.params.0, outcome.params.1)
        };

        let conditional = self.recurse(&working, phi, theta);
        let start = self.start();

        // Map working-series predictions back to the original units
        let fitted: Vec<f64> = conditional
            .predictions
            .iter()
            .enumerate()
            .map(|(i, prediction)| {
                let t = start + i;
                if self.d == 1 {
                    values[t] + prediction
                } else {
                    anchor + prediction
                }
            })
            .collect();

        debug!(phi, theta, model = %self.name, "fitted ARIMA by conditional sum of squares");

        Ok(TrainedArimaModel {
            name: format!("{} phi={:.3} theta={:.3}", self.name, phi, theta),
            d: self.d,
            phi,
            theta,
            anchor,
            last_working: working[working.len() - 1],
            last_error: conditional.errors[conditional.errors.len() - 1],
            fit: InSampleFit::new(values.to_vec(), fitted, start + self.d)?,
        })
    }

    fn min_observations(&self) -> usize {
        self.p + self.d + self.q + 1
    }

    fn name(&self) -> &str {
        &self.name
    }
}

impl TrainedArimaModel {
    /// Fitted AR coefficient
    pub fn phi(&self) -> f64 {
        self.phi
    }

    /// Fitted MA coefficient
    pub fn theta(&self) -> f64 {
        self.theta
    }
}

impl TrainedForecastModel for TrainedArimaModel {
    fn forecast(&self, horizon: usize) -> Result<Vec<f64>> {
        let mut forecasts = Vec::with_capacity(horizon);
        let mut previous = self.last_working;
        let mut level = self.anchor;

        for h in 0..horizon {
            // The MA term only reaches one step past the last known error
            let next = if h == 0 {
                self.phi * previous + self.theta * self.last_error
            } else {
                self.phi * previous
            };
            previous = next;

            if self.d == 1 {
                level += next;
                forecasts.push(level);
            } else {
                forecasts.push(self.anchor + next);
            }
        }

        Ok(forecasts)
    }

    fn in_sample(&self) -> &InSampleFit {
        &self.fit
    }

    fn name(&self) -> &str {
        &self.name
    }
}

//! Sample autocorrelation and partial autocorrelation
//!
//! Used for the lag diagnostics of annual series. The ACF uses the usual
//! biased estimator (denominator n); the PACF is obtained from the ACF with
//! the Durbin-Levinson recursion.

use crate::{MathError, Result};
use serde::Serialize;

/// Correlation coefficients per lag, starting at lag 0
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Correlogram {
    /// Coefficient at each lag; `values[0]` is always 1
    pub values: Vec<f64>,
    /// Approximate 95% significance band (1.96 / sqrt(n))
    pub confidence_band: f64,
}

impl Correlogram {
    /// Highest lag contained in the correlogram
    pub fn max_lag(&self) -> usize {
        self.values.len().saturating_sub(1)
    }
}

/// Sample autocorrelation function up to `max_lag`
pub fn acf(data: &[f64], max_lag: usize) -> Result<Correlogram> {
    let n = data.len();
    if n < 2 {
        return Err(MathError::InsufficientData(
            "Autocorrelation needs at least 2 observations".to_string(),
        ));
    }
    if max_lag >= n {
        return Err(MathError::InvalidInput(format!(
            "Lag {} is not smaller than the series length {}",
            max_lag, n
        )));
    }

    let mean = data.iter().sum::<f64>() / n as f64;
    let denominator: f64 = data.iter().map(|v| (v - mean).powi(2)).sum();
    if denominator.abs() < f64::EPSILON {
        return Err(MathError::InvalidInput(
            "Autocorrelation is undefined for a constant series".to_string(),
        ));
    }

    let values = (0..=max_lag)
        .map(|lag| {
            let numerator: f64 = (lag..n)
                .map(|t| (data[t] - mean) * (data[t - lag] - mean))
                .sum();
            numerator / denominator
        })
        .collect();

    Ok(Correlogram {
        values,
        confidence_band: 1.96 / (n as f64).sqrt(),
    })
}

/// Sample partial autocorrelation function up to `max_lag`
pub fn pacf(data: &[f64], max_lag: usize) -> Result<Correlogram> {
    let n = data.len();
    if max_lag >= n / 2 {
        return Err(MathError::InvalidInput(format!(
            "Partial autocorrelation lag {} must be below half the series length ({})",
            max_lag, n
        )));
    }

    let rho = acf(data, max_lag)?;
    let r = &rho.values;

    let mut values = vec![1.0];
    let mut phi_prev: Vec<f64> = Vec::new();

    for k in 1..=max_lag {
        let phi_kk = if k == 1 {
            r[1]
        } else {
            let num = r[k] - (1..k).map(|j| phi_prev[j - 1] * r[k - j]).sum::<f64>();
            let den = 1.0 - (1..k).map(|j| phi_prev[j - 1] * r[j]).sum::<f64>();
            if den.abs() < f64::EPSILON {
                0.0
            } else {
                num / den
            }
        };

        let mut phi = Vec::with_capacity(k);
        for j in 1..k {
            phi.push(phi_prev[j - 1] - phi_kk * phi_prev[k - j - 1]);
        }
        phi.push(phi_kk);

        values.push(phi_kk);
        phi_prev = phi;
    }

    Ok(Correlogram {
        values,
        confidence_band: rho.confidence_band,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_acf_lag_zero_is_one() {
        let data = [1.0, 3.0, 2.0, 5.0, 4.0, 6.0];
        let correlogram = acf(&data, 3).unwrap();

        assert_eq!(correlogram.max_lag(), 3);
        assert!((correlogram.values[0] - 1.0).abs() < 1e-12);
        for v in &correlogram.values {
            assert!(v.abs() <= 1.0 + 1e-12);
        }
    }

    #[test]
    fn test_acf_alternating_series() {
        let data = [1.0, -1.0, 1.0, -1.0, 1.0, -1.0, 1.0, -1.0];
        let correlogram = acf(&data, 1).unwrap();

        // Lag-1 correlation of a perfect alternation is (n - 1) / n negative
        assert!((correlogram.values[1] + 7.0 / 8.0).abs() < 1e-12);
    }

    #[test]
    fn test_pacf_first_lag_matches_acf() {
        let data = [2.0, 4.0, 3.0, 6.0, 5.0, 8.0, 7.0, 9.0, 11.0, 10.0];
        let a = acf(&data, 3).unwrap();
        let p = pacf(&data, 3).unwrap();

        assert!((a.values[1] - p.values[1]).abs() < 1e-12);
        assert_eq!(p.values.len(), 4);
    }

    #[test]
    fn test_invalid_lags() {
        let data = [1.0, 2.0, 3.0, 4.0];
        assert!(acf(&data, 4).is_err());
        assert!(pacf(&data, 2).is_err());
        assert!(acf(&[5.0, 5.0, 5.0], 1).is_err());
    }
}

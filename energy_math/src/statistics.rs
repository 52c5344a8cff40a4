//! Descriptive statistics over plain `f64` slices

use crate::{MathError, Result};
use statrs::statistics::Statistics;

/// Arithmetic mean of a non-empty slice
pub fn mean(values: &[f64]) -> Result<f64> {
    if values.is_empty() {
        return Err(MathError::InsufficientData(
            "Cannot take the mean of an empty sequence".to_string(),
        ));
    }

    Ok(values.iter().mean())
}

/// Sample standard deviation (n - 1 denominator)
///
/// Needs at least two observations; a single value has no spread to estimate.
pub fn sample_std_dev(values: &[f64]) -> Result<f64> {
    if values.len() < 2 {
        return Err(MathError::InsufficientData(format!(
            "Standard deviation needs at least 2 observations, got {}",
            values.len()
        )));
    }

    Ok(values.iter().std_dev())
}

/// Apply `order` rounds of first differencing
pub fn difference(values: &[f64], order: usize) -> Result<Vec<f64>> {
    if values.len() <= order {
        return Err(MathError::InsufficientData(format!(
            "Differencing of order {} needs more than {} observations",
            order, order
        )));
    }

    let mut current = values.to_vec();
    for _ in 0..order {
        current = current.windows(2).map(|w| w[1] - w[0]).collect();
    }

    Ok(current)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mean() {
        assert!((mean(&[1.0, 2.0, 3.0, 4.0]).unwrap() - 2.5).abs() < 1e-12);
        assert!(mean(&[]).is_err());
    }

    #[test]
    fn test_sample_std_dev() {
        // Sample variance of 2, 4, 4, 4, 5, 5, 7, 9 is 32 / 7
        let data = [2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0];
        let expected = (32.0_f64 / 7.0).sqrt();
        assert!((sample_std_dev(&data).unwrap() - expected).abs() < 1e-12);

        assert!(sample_std_dev(&[1.0]).is_err());
    }

    #[test]
    fn test_difference() {
        let data = [1.0, 4.0, 9.0, 16.0];
        assert_eq!(difference(&data, 1).unwrap(), vec![3.0, 5.0, 7.0]);
        assert_eq!(difference(&data, 2).unwrap(), vec![2.0, 2.0]);
        assert_eq!(difference(&data, 0).unwrap(), data.to_vec());
        assert!(difference(&data, 4).is_err());
    }
}

//! Statistical utility functions.

use crate::error::{BacktestError, Result};
use statrs::distribution::{ContinuousCDF, Normal};

/// Two-sided standard normal critical value for a central interval.
///
/// # Example
/// ```
/// use forecast_backtest::utils::normal_critical_value;
///
/// // 95% interval -> z ≈ 1.96
/// let z = normal_critical_value(0.95).unwrap();
/// assert!((z - 1.96).abs() < 0.01);
/// ```
pub fn normal_critical_value(level: f64) -> Result<f64> {
    if !(level > 0.0 && level < 1.0) {
        return Err(BacktestError::InvalidParameter(format!(
            "interval level must be in (0, 1), got {}",
            level
        )));
    }
    let normal = Normal::new(0.0, 1.0)
        .map_err(|e| BacktestError::ComputationError(e.to_string()))?;
    Ok(normal.inverse_cdf((1.0 + level) / 2.0))
}

/// Calculate the mean of a slice.
pub fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return f64::NAN;
    }
    values.iter().sum::<f64>() / values.len() as f64
}

/// Sample variance (n-1 denominator); zero below two observations.
pub fn variance(values: &[f64]) -> f64 {
    if values.len() < 2 {
        return 0.0;
    }
    let m = mean(values);
    values.iter().map(|x| (x - m).powi(2)).sum::<f64>() / (values.len() - 1) as f64
}

/// Sample standard deviation.
pub fn std_dev(values: &[f64]) -> f64 {
    variance(values).sqrt()
}

/// Median of a slice; NaN for empty input.
pub fn median(values: &[f64]) -> f64 {
    if values.is_empty() {
        return f64::NAN;
    }
    let mut sorted = values.to_vec();
    sorted.sort_by(|a, b| a.total_cmp(b));
    let mid = sorted.len() / 2;
    if sorted.len() % 2 == 0 {
        (sorted[mid - 1] + sorted[mid]) / 2.0
    } else {
        sorted[mid]
    }
}

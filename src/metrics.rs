//! Error metrics for forecast evaluation.
//!
//! The [`Metric`] trait is what the backtest harness scores each horizon
//! offset with. Any `Fn(&[f64], &[f64]) -> f64` closure is a metric; the
//! built-in unit structs cover the common cases. Metric outputs are passed
//! through as-is, so a degenerate score (for example a percentage error
//! against a zero actual) surfaces as a non-finite value.

use crate::error::{BacktestError, Result};

/// Scalar error between equal-length, non-empty actual and predicted values.
pub trait Metric {
    fn score(&self, actual: &[f64], predicted: &[f64]) -> f64;

    /// Display name used in logs and reports.
    fn name(&self) -> &str {
        "custom"
    }
}

impl<F> Metric for F
where
    F: Fn(&[f64], &[f64]) -> f64,
{
    fn score(&self, actual: &[f64], predicted: &[f64]) -> f64 {
        self(actual, predicted)
    }
}

/// Mean absolute residual. Scored per horizon offset this is `|actual - predicted|`.
#[derive(Debug, Clone, Copy, Default)]
pub struct AbsoluteError;

impl Metric for AbsoluteError {
    fn score(&self, actual: &[f64], predicted: &[f64]) -> f64 {
        mean_of(actual, predicted, |a, p| (a - p).abs())
    }

    fn name(&self) -> &str {
        "absolute_error"
    }
}

/// Mean squared residual.
#[derive(Debug, Clone, Copy, Default)]
pub struct SquaredError;

impl Metric for SquaredError {
    fn score(&self, actual: &[f64], predicted: &[f64]) -> f64 {
        mean_of(actual, predicted, |a, p| (a - p).powi(2))
    }

    fn name(&self) -> &str {
        "squared_error"
    }
}

/// Mean absolute percentage error, in percent.
///
/// Unlike [`mape`], this does not guard against zero actuals: the score is
/// infinite or NaN in that case.
#[derive(Debug, Clone, Copy, Default)]
pub struct PercentageError;

impl Metric for PercentageError {
    fn score(&self, actual: &[f64], predicted: &[f64]) -> f64 {
        100.0 * mean_of(actual, predicted, |a, p| ((a - p) / a).abs())
    }

    fn name(&self) -> &str {
        "percentage_error"
    }
}

fn mean_of(actual: &[f64], predicted: &[f64], f: impl Fn(f64, f64) -> f64) -> f64 {
    let n = actual.len().min(predicted.len());
    if n == 0 {
        return f64::NAN;
    }
    actual
        .iter()
        .zip(predicted)
        .map(|(&a, &p)| f(a, p))
        .sum::<f64>()
        / n as f64
}

fn check_inputs(actual: &[f64], predicted: &[f64]) -> Result<()> {
    if actual.is_empty() || predicted.is_empty() {
        return Err(BacktestError::EmptyData);
    }
    if actual.len() != predicted.len() {
        return Err(BacktestError::DimensionMismatch {
            expected: actual.len(),
            got: predicted.len(),
        });
    }
    Ok(())
}

/// Mean absolute error.
pub fn mae(actual: &[f64], predicted: &[f64]) -> Result<f64> {
    check_inputs(actual, predicted)?;
    Ok(AbsoluteError.score(actual, predicted))
}

/// Mean squared error.
pub fn mse(actual: &[f64], predicted: &[f64]) -> Result<f64> {
    check_inputs(actual, predicted)?;
    Ok(SquaredError.score(actual, predicted))
}

/// Root mean squared error.
pub fn rmse(actual: &[f64], predicted: &[f64]) -> Result<f64> {
    mse(actual, predicted).map(f64::sqrt)
}

/// Mean absolute percentage error, in percent.
///
/// Fails with [`BacktestError::DivisionByZero`] naming the first zero actual.
pub fn mape(actual: &[f64], predicted: &[f64]) -> Result<f64> {
    check_inputs(actual, predicted)?;
    if let Some(index) = actual.iter().position(|&a| a == 0.0) {
        return Err(BacktestError::DivisionByZero { index });
    }
    Ok(PercentageError.score(actual, predicted))
}

/// Symmetric mean absolute percentage error, in percent (0..=200).
pub fn smape(actual: &[f64], predicted: &[f64]) -> Result<f64> {
    check_inputs(actual, predicted)?;
    Ok(100.0
        * mean_of(actual, predicted, |a, p| {
            let denom = a.abs() + p.abs();
            if denom == 0.0 {
                0.0
            } else {
                2.0 * (a - p).abs() / denom
            }
        }))
}

/// Held-out accuracy of one model's forecast.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ForecastAccuracy {
    pub model: String,
    pub rmse: f64,
    pub mae: f64,
    pub mape: f64,
}

/// Score several models' forecasts of the same held-out actuals.
///
/// Results keep the order of `forecasts`.
///
/// # Example
/// ```
/// use forecast_backtest::metrics::compare_forecasts;
///
/// let actual = [10.0, 20.0];
/// let table = compare_forecasts(&actual, &[("a", &[11.0, 18.0][..]), ("b", &[10.0, 20.0][..])]).unwrap();
/// assert_eq!(table[0].mae, 1.5);
/// assert_eq!(table[1].rmse, 0.0);
/// ```
pub fn compare_forecasts(
    actual: &[f64],
    forecasts: &[(&str, &[f64])],
) -> Result<Vec<ForecastAccuracy>> {
    forecasts
        .iter()
        .map(|(model, predicted)| {
            Ok(ForecastAccuracy {
                model: model.to_string(),
                rmse: rmse(actual, predicted)?,
                mae: mae(actual, predicted)?,
                mape: mape(actual, predicted)?,
            })
        })
        .collect()
}

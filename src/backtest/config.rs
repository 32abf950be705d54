//! Backtest configuration.

use crate::error::{BacktestError, Result};
use crate::utils::{mean, median};

/// How per-fold errors at one horizon offset are reduced to a single score.
///
/// Every variant yields NaN when any input is NaN.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Aggregation {
    #[default]
    Mean,
    Median,
    /// Square root of the mean of squared errors.
    RootMeanSquare,
    Max,
}

impl Aggregation {
    /// Reduce a non-empty group of errors.
    pub fn reduce(&self, values: &[f64]) -> f64 {
        if values.is_empty() || values.iter().any(|v| v.is_nan()) {
            return f64::NAN;
        }
        match self {
            Aggregation::Mean => mean(values),
            Aggregation::Median => median(values),
            Aggregation::RootMeanSquare => {
                (values.iter().map(|v| v * v).sum::<f64>() / values.len() as f64).sqrt()
            }
            Aggregation::Max => values.iter().copied().fold(f64::NEG_INFINITY, f64::max),
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Aggregation::Mean => "mean",
            Aggregation::Median => "median",
            Aggregation::RootMeanSquare => "rms",
            Aggregation::Max => "max",
        }
    }
}

/// Configuration for an expanding-window backtest.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BacktestConfig {
    /// Observations in the first training window.
    pub initial_window: usize,
    /// Periods forecast per fold.
    pub horizon: usize,
    /// Periods the training cutoff advances between folds.
    pub step: usize,
    /// Reduction applied per horizon offset.
    pub aggregation: Aggregation,
    /// Request prediction intervals at this coverage level.
    pub interval_level: Option<f64>,
}

impl Default for BacktestConfig {
    fn default() -> Self {
        Self {
            initial_window: 10,
            horizon: 1,
            step: 1,
            aggregation: Aggregation::Mean,
            interval_level: None,
        }
    }
}

impl BacktestConfig {
    /// Expanding-window configuration with a step of one period.
    pub fn expanding(initial_window: usize, horizon: usize) -> Self {
        Self {
            initial_window,
            horizon,
            ..Self::default()
        }
    }

    /// Set the step between fold cutoffs.
    pub fn with_step(mut self, step: usize) -> Self {
        self.step = step;
        self
    }

    pub fn with_aggregation(mut self, aggregation: Aggregation) -> Self {
        self.aggregation = aggregation;
        self
    }

    /// Request prediction intervals at the given level, e.g. 0.95.
    pub fn with_interval_level(mut self, level: f64) -> Self {
        self.interval_level = Some(level);
        self
    }

    /// Shortest series that yields at least one fold.
    ///
    /// `None` when `initial_window + horizon` overflows `usize`.
    pub fn min_total_length(&self) -> Option<usize> {
        self.initial_window.checked_add(self.horizon)
    }

    /// Check the configuration independently of any series.
    pub fn validate(&self) -> Result<()> {
        if self.initial_window == 0 {
            return Err(BacktestError::InvalidParameter(
                "initial_window must be positive".to_string(),
            ));
        }
        if self.horizon == 0 {
            return Err(BacktestError::InvalidParameter(
                "horizon must be positive".to_string(),
            ));
        }
        if self.step == 0 {
            return Err(BacktestError::InvalidParameter(
                "step must be positive".to_string(),
            ));
        }
        if self.min_total_length().is_none() {
            return Err(BacktestError::InvalidParameter(format!(
                "initial_window + horizon overflows: {} + {}",
                self.initial_window, self.horizon
            )));
        }
        if let Some(level) = self.interval_level {
            if !(level > 0.0 && level < 1.0) {
                return Err(BacktestError::InvalidParameter(format!(
                    "interval level must be in (0, 1), got {}",
                    level
                )));
            }
        }
        Ok(())
    }
}

//! Forecast result structure for holding predictions.

use crate::error::{BacktestError, Result};

/// A forecast containing point predictions and optional interval bounds.
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Forecast {
    point: Vec<f64>,
    lower: Option<Vec<f64>>,
    upper: Option<Vec<f64>>,
}

impl Forecast {
    /// Create an empty forecast.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a forecast from point predictions.
    pub fn from_values(values: Vec<f64>) -> Self {
        Self {
            point: values,
            lower: None,
            upper: None,
        }
    }

    /// Create a forecast with prediction intervals.
    ///
    /// All three vectors must have the same length.
    pub fn from_values_with_intervals(
        values: Vec<f64>,
        lower: Vec<f64>,
        upper: Vec<f64>,
    ) -> Result<Self> {
        for bound in [&lower, &upper] {
            if bound.len() != values.len() {
                return Err(BacktestError::DimensionMismatch {
                    expected: values.len(),
                    got: bound.len(),
                });
            }
        }
        Ok(Self {
            point: values,
            lower: Some(lower),
            upper: Some(upper),
        })
    }

    /// Get the forecast horizon (number of steps).
    pub fn horizon(&self) -> usize {
        self.point.len()
    }

    pub fn is_empty(&self) -> bool {
        self.point.is_empty()
    }

    /// Point predictions.
    pub fn point(&self) -> &[f64] {
        &self.point
    }

    pub fn lower(&self) -> Option<&[f64]> {
        self.lower.as_deref()
    }

    pub fn upper(&self) -> Option<&[f64]> {
        self.upper.as_deref()
    }

    /// Check if interval bounds are available.
    pub fn has_intervals(&self) -> bool {
        self.lower.is_some() && self.upper.is_some()
    }

    /// Interval bounds at a 1-based horizon offset.
    pub fn interval_at(&self, offset: usize) -> Option<(f64, f64)> {
        let idx = offset.checked_sub(1)?;
        let lower = self.lower.as_ref()?.get(idx)?;
        let upper = self.upper.as_ref()?.get(idx)?;
        Some((*lower, *upper))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn forecast_empty_state() {
        let forecast = Forecast::new();
        assert!(forecast.is_empty());
        assert_eq!(forecast.horizon(), 0);
        assert!(!forecast.has_intervals());
    }

    #[test]
    fn forecast_from_values_has_no_intervals() {
        let forecast = Forecast::from_values(vec![1.0, 2.0, 3.0]);
        assert_eq!(forecast.horizon(), 3);
        assert_eq!(forecast.point(), &[1.0, 2.0, 3.0]);
        assert!(forecast.lower().is_none());
        assert_eq!(forecast.interval_at(1), None);
    }

    #[test]
    fn forecast_with_intervals() {
        let forecast =
            Forecast::from_values_with_intervals(vec![2.0, 3.0], vec![1.0, 2.0], vec![3.0, 4.0])
                .unwrap();

        assert!(forecast.has_intervals());
        assert_eq!(forecast.lower().unwrap(), &[1.0, 2.0]);
        assert_eq!(forecast.upper().unwrap(), &[3.0, 4.0]);
        assert_eq!(forecast.interval_at(2), Some((2.0, 4.0)));
        assert_eq!(forecast.interval_at(0), None);
        assert_eq!(forecast.interval_at(3), None);
    }

    #[test]
    fn forecast_rejects_mismatched_bounds() {
        let result = Forecast::from_values_with_intervals(vec![2.0, 3.0], vec![1.0], vec![3.0, 4.0]);
        assert_eq!(
            result.unwrap_err(),
            BacktestError::DimensionMismatch {
                expected: 2,
                got: 1
            }
        );
    }
}

//! Naive forecasting model.
//!
//! The naive method simply forecasts the last observed value for all future periods.

use crate::core::{CovariateWindow, Forecast, SeriesWindow};
use crate::error::{BacktestError, Result};
use crate::models::Forecaster;
use crate::utils::normal_critical_value;

/// Naive forecaster that repeats the last value.
#[derive(Debug, Clone, Default)]
pub struct Naive {
    last_value: Option<f64>,
    sigma: f64,
}

impl Naive {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Forecaster for Naive {
    fn fit(
        &mut self,
        train: &SeriesWindow<'_>,
        _covariates: Option<&CovariateWindow<'_>>,
    ) -> Result<()> {
        let values = train.values();
        let last = *values.last().ok_or(BacktestError::EmptyData)?;

        // Residuals of the in-sample one-step naive forecast are first differences
        let diffs: Vec<f64> = values.windows(2).map(|w| w[1] - w[0]).collect();
        self.sigma = if diffs.is_empty() {
            0.0
        } else {
            (diffs.iter().map(|d| d * d).sum::<f64>() / diffs.len() as f64).sqrt()
        };
        self.last_value = Some(last);
        Ok(())
    }

    fn predict(&self, horizon: usize, _future: Option<&CovariateWindow<'_>>) -> Result<Forecast> {
        let last = self.last_value.ok_or(BacktestError::FitRequired)?;
        Ok(Forecast::from_values(vec![last; horizon]))
    }

    fn predict_with_intervals(
        &self,
        horizon: usize,
        _future: Option<&CovariateWindow<'_>>,
        level: f64,
    ) -> Result<Forecast> {
        let last = self.last_value.ok_or(BacktestError::FitRequired)?;
        let z = normal_critical_value(level)?;

        let mut lower = Vec::with_capacity(horizon);
        let mut upper = Vec::with_capacity(horizon);
        for h in 1..=horizon {
            // Random walk error grows with sqrt(h)
            let se = self.sigma * (h as f64).sqrt();
            lower.push(last - z * se);
            upper.push(last + z * se);
        }

        Forecast::from_values_with_intervals(vec![last; horizon], lower, upper)
    }

    fn name(&self) -> &str {
        "Naive"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::TimeSeries;
    use chrono::{Duration, TimeZone, Utc};

    fn series(values: Vec<f64>) -> TimeSeries {
        let base = Utc.with_ymd_and_hms(2022, 1, 3, 0, 0, 0).unwrap();
        TimeSeries::regular(base, Duration::weeks(1), values).unwrap()
    }

    #[test]
    fn naive_repeats_last_value() {
        let ts = series(vec![1.0, 2.0, 3.0, 4.0, 5.0]);
        let mut model = Naive::new();
        model.fit(&ts.as_window(), None).unwrap();

        let forecast = model.predict(3, None).unwrap();
        assert_eq!(forecast.point(), &[5.0, 5.0, 5.0]);
    }

    #[test]
    fn naive_intervals_widen_with_horizon() {
        let ts = series(vec![10.0, 12.0, 11.0, 13.0, 12.0, 14.0]);
        let mut model = Naive::new();
        model.fit(&ts.as_window(), None).unwrap();

        let forecast = model.predict_with_intervals(4, None, 0.95).unwrap();
        let width = |h: usize| {
            let (lo, hi) = forecast.interval_at(h).unwrap();
            hi - lo
        };
        assert!(width(4) > width(1));
        assert!(width(2) > width(1));
    }

    #[test]
    fn naive_single_point_has_zero_width_intervals() {
        let ts = series(vec![7.0]);
        let mut model = Naive::new();
        model.fit(&ts.as_window(), None).unwrap();
        let forecast = model.predict_with_intervals(2, None, 0.9).unwrap();
        assert_eq!(forecast.interval_at(2), Some((7.0, 7.0)));
    }

    #[test]
    fn naive_requires_fit_and_data() {
        let model = Naive::new();
        assert_eq!(model.predict(2, None).unwrap_err(), BacktestError::FitRequired);

        let ts = series(vec![1.0]);
        let mut model = Naive::new();
        assert_eq!(
            model.fit(&ts.window(0..0).unwrap(), None).unwrap_err(),
            BacktestError::EmptyData
        );
    }
}

//! Historic mean forecaster.
//!
//! Forecasts the mean of the training window for every future period.

use crate::core::{CovariateWindow, Forecast, SeriesWindow};
use crate::error::{BacktestError, Result};
use crate::models::Forecaster;
use crate::utils::{mean, normal_critical_value, std_dev};

/// Forecaster that repeats the training mean.
#[derive(Debug, Clone, Default)]
pub struct HistoricMean {
    mean: Option<f64>,
    sigma: f64,
    n: usize,
}

impl HistoricMean {
    pub fn new() -> Self {
        Self::default()
    }

    /// Mean of the last training window, if fitted.
    pub fn mean(&self) -> Option<f64> {
        self.mean
    }
}

impl Forecaster for HistoricMean {
    fn fit(
        &mut self,
        train: &SeriesWindow<'_>,
        _covariates: Option<&CovariateWindow<'_>>,
    ) -> Result<()> {
        let values = train.values();
        if values.is_empty() {
            return Err(BacktestError::EmptyData);
        }
        self.mean = Some(mean(values));
        self.sigma = std_dev(values);
        self.n = values.len();
        Ok(())
    }

    fn predict(&self, horizon: usize, _future: Option<&CovariateWindow<'_>>) -> Result<Forecast> {
        let m = self.mean.ok_or(BacktestError::FitRequired)?;
        Ok(Forecast::from_values(vec![m; horizon]))
    }

    fn predict_with_intervals(
        &self,
        horizon: usize,
        future: Option<&CovariateWindow<'_>>,
        level: f64,
    ) -> Result<Forecast> {
        let point = self.predict(horizon, future)?;
        let z = normal_critical_value(level)?;
        // Forecast error of a mean includes the uncertainty of the mean itself.
        let half_width = z * self.sigma * (1.0 + 1.0 / self.n as f64).sqrt();

        let values = point.point().to_vec();
        let lower = values.iter().map(|v| v - half_width).collect();
        let upper = values.iter().map(|v| v + half_width).collect();
        Forecast::from_values_with_intervals(values, lower, upper)
    }

    fn name(&self) -> &str {
        "HistoricMean"
    }
}

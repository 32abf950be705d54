//! Seasonal naive forecasting model.
//!
//! Forecasts each future period with the value observed one season earlier.

use crate::core::{CovariateWindow, Forecast, SeriesWindow};
use crate::error::{BacktestError, Result};
use crate::models::Forecaster;
use crate::utils::normal_critical_value;

/// Seasonal naive forecaster: `y[t + h] = y[t + h - m * k]`.
#[derive(Debug, Clone)]
pub struct SeasonalNaive {
    period: usize,
    last_season: Option<Vec<f64>>,
    sigma: f64,
}

impl SeasonalNaive {
    pub fn new(period: usize) -> Self {
        Self {
            period,
            last_season: None,
            sigma: 0.0,
        }
    }

    pub fn period(&self) -> usize {
        self.period
    }
}

impl Forecaster for SeasonalNaive {
    fn fit(
        &mut self,
        train: &SeriesWindow<'_>,
        _covariates: Option<&CovariateWindow<'_>>,
    ) -> Result<()> {
        if self.period == 0 {
            return Err(BacktestError::InvalidParameter(
                "seasonal period must be positive".to_string(),
            ));
        }
        let values = train.values();
        if values.len() < self.period {
            return Err(BacktestError::InsufficientData {
                needed: self.period,
                got: values.len(),
            });
        }

        let diffs: Vec<f64> = values
            .iter()
            .skip(self.period)
            .zip(values)
            .map(|(curr, prev)| curr - prev)
            .collect();
        self.sigma = if diffs.is_empty() {
            0.0
        } else {
            (diffs.iter().map(|d| d * d).sum::<f64>() / diffs.len() as f64).sqrt()
        };
        self.last_season = Some(values[values.len() - self.period..].to_vec());
        Ok(())
    }

    fn predict(&self, horizon: usize, _future: Option<&CovariateWindow<'_>>) -> Result<Forecast> {
        let season = self.last_season.as_ref().ok_or(BacktestError::FitRequired)?;
        let values = (0..horizon).map(|h| season[h % self.period]).collect();
        Ok(Forecast::from_values(values))
    }

    fn predict_with_intervals(
        &self,
        horizon: usize,
        future: Option<&CovariateWindow<'_>>,
        level: f64,
    ) -> Result<Forecast> {
        let point = self.predict(horizon, future)?;
        let z = normal_critical_value(level)?;

        let values = point.point().to_vec();
        let mut lower = Vec::with_capacity(horizon);
        let mut upper = Vec::with_capacity(horizon);
        for (i, v) in values.iter().enumerate() {
            // Number of full seasons ahead
            let k = (i / self.period + 1) as f64;
            let se = self.sigma * k.sqrt();
            lower.push(v - z * se);
            upper.push(v + z * se);
        }
        Forecast::from_values_with_intervals(values, lower, upper)
    }

    fn name(&self) -> &str {
        "SeasonalNaive"
    }
}

//! Additive curve decomposition forecaster.
//!
//! Models the series as
//!
//! ```text
//! y(t) = intercept + trend * t + sum_k [a_k sin(2πkt/P) + b_k cos(2πkt/P)] + X(t) β
//! ```
//!
//! where `P` is the seasonal period in observations and `X(t)` the covariate
//! design. All terms are estimated jointly by least squares.
//!
//! With [`Seasonality::Auto`] the Fourier terms are only included when the
//! training window spans at least two full periods.

use crate::core::{CovariateWindow, Forecast, SeriesWindow};
use crate::error::{BacktestError, Result};
use crate::models::Forecaster;
use crate::utils::{fit_linear, normal_critical_value, LinearFit};
use std::collections::HashMap;
use std::f64::consts::PI;

const TREND: &str = "~trend";
const RESERVED_PREFIX: char = '~';

/// Average number of weeks in a year.
pub const WEEKS_PER_YEAR: f64 = 365.25 / 7.0;

/// When to include the Fourier seasonal terms.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Seasonality {
    /// Include seasonality when the training window covers two full periods.
    #[default]
    Auto,
    Enabled,
    Disabled,
}

/// Trend + Fourier seasonality + covariate regression.
#[derive(Debug, Clone)]
pub struct CurveDecomposition {
    seasonal_period: f64,
    fourier_order: usize,
    seasonality: Seasonality,
    regression: Option<LinearFit>,
    scale: f64,
    n: usize,
    seasonal_active: bool,
    uses_covariates: bool,
    sigma: f64,
}

impl CurveDecomposition {
    /// Create a model with a seasonal period measured in observations.
    pub fn new(seasonal_period: f64) -> Self {
        Self {
            seasonal_period,
            fourier_order: 10,
            seasonality: Seasonality::Auto,
            regression: None,
            scale: 1.0,
            n: 0,
            seasonal_active: false,
            uses_covariates: false,
            sigma: 0.0,
        }
    }

    /// Yearly seasonality on weekly data.
    pub fn weekly_yearly() -> Self {
        Self::new(WEEKS_PER_YEAR)
    }

    /// Set the number of Fourier harmonics.
    pub fn with_fourier_order(mut self, order: usize) -> Self {
        self.fourier_order = order;
        self
    }

    pub fn with_seasonality(mut self, seasonality: Seasonality) -> Self {
        self.seasonality = seasonality;
        self
    }

    /// Whether the last fit included the seasonal terms.
    pub fn seasonal_active(&self) -> bool {
        self.seasonal_active
    }

    /// Fitted coefficient of a covariate design column.
    pub fn covariate_effect(&self, name: &str) -> Option<f64> {
        self.regression.as_ref()?.coefficient(name)
    }

    /// Harmonics actually used: at most `order`, and below the Nyquist limit.
    fn effective_order(&self) -> usize {
        let nyquist = ((self.seasonal_period / 2.0).ceil() as usize).saturating_sub(1);
        self.fourier_order.min(nyquist)
    }

    fn time_terms(&self, steps: std::ops::Range<usize>) -> HashMap<String, Vec<f64>> {
        let mut design = HashMap::new();
        design.insert(
            TREND.to_string(),
            steps.clone().map(|t| t as f64 / self.scale).collect(),
        );
        if self.seasonal_active {
            for k in 1..=self.effective_order() {
                let freq = 2.0 * PI * k as f64 / self.seasonal_period;
                design.insert(
                    format!("~sin{}", k),
                    steps.clone().map(|t| (freq * t as f64).sin()).collect(),
                );
                design.insert(
                    format!("~cos{}", k),
                    steps.clone().map(|t| (freq * t as f64).cos()).collect(),
                );
            }
        }
        design
    }
}

fn covariate_design(
    covariates: &CovariateWindow<'_>,
    expected_len: usize,
) -> Result<HashMap<String, Vec<f64>>> {
    if covariates.len() != expected_len {
        return Err(BacktestError::DimensionMismatch {
            expected: expected_len,
            got: covariates.len(),
        });
    }
    let design = covariates.design();
    if let Some(name) = design.keys().find(|k| k.starts_with(RESERVED_PREFIX)) {
        return Err(BacktestError::InvalidParameter(format!(
            "covariate name '{}' uses the reserved '~' prefix",
            name
        )));
    }
    Ok(design)
}

impl Default for CurveDecomposition {
    fn default() -> Self {
        Self::weekly_yearly()
    }
}

impl Forecaster for CurveDecomposition {
    fn fit(
        &mut self,
        train: &SeriesWindow<'_>,
        covariates: Option<&CovariateWindow<'_>>,
    ) -> Result<()> {
        if !(self.seasonal_period > 1.0) {
            return Err(BacktestError::InvalidParameter(
                "seasonal period must exceed one observation".to_string(),
            ));
        }
        let values = train.values();
        let n = values.len();
        if n < 2 {
            return Err(BacktestError::InsufficientData { needed: 2, got: n });
        }

        self.n = n;
        self.scale = n as f64;
        self.seasonal_active = match self.seasonality {
            Seasonality::Auto => n as f64 >= 2.0 * self.seasonal_period,
            Seasonality::Enabled => true,
            Seasonality::Disabled => false,
        } && self.effective_order() > 0;

        let mut design = self.time_terms(0..n);
        self.uses_covariates = false;
        if let Some(cov) = covariates {
            let cov_design = covariate_design(cov, n)?;
            self.uses_covariates = !cov_design.is_empty();
            design.extend(cov_design);
        }

        let regression = fit_linear(values, &design)?;
        let fitted = regression.predict(&design, n)?;
        let sse: f64 = values
            .iter()
            .zip(&fitted)
            .map(|(y, f)| (y - f).powi(2))
            .sum();
        let dof = n.saturating_sub(design.len() + 1).max(1);
        self.sigma = (sse / dof as f64).sqrt();
        self.regression = Some(regression);
        Ok(())
    }

    fn predict(&self, horizon: usize, future: Option<&CovariateWindow<'_>>) -> Result<Forecast> {
        let regression = self.regression.as_ref().ok_or(BacktestError::FitRequired)?;

        let mut design = self.time_terms(self.n..self.n + horizon);
        if self.uses_covariates {
            let future = future.ok_or(BacktestError::MissingCovariates)?;
            design.extend(covariate_design(future, horizon)?);
        }

        Ok(Forecast::from_values(regression.predict(&design, horizon)?))
    }

    fn predict_with_intervals(
        &self,
        horizon: usize,
        future: Option<&CovariateWindow<'_>>,
        level: f64,
    ) -> Result<Forecast> {
        let point = self.predict(horizon, future)?;
        let half_width = normal_critical_value(level)? * self.sigma;

        let values = point.point().to_vec();
        let lower = values.iter().map(|v| v - half_width).collect();
        let upper = values.iter().map(|v| v + half_width).collect();
        Forecast::from_values_with_intervals(values, lower, upper)
    }

    fn requires_covariates(&self) -> bool {
        self.uses_covariates
    }

    fn name(&self) -> &str {
        "CurveDecomposition"
    }
}

//! Structural time series forecaster.
//!
//! Decomposes the series into explicit components:
//!
//! - a regression on the covariates, estimated by least squares,
//! - a local linear trend (level + slope),
//! - an additive seasonal state,
//!
//! and filters the regression residuals through the innovations state-space
//! recursions
//!
//! ```text
//! e_t   = r_t - (l_{t-1} + b_{t-1} + s_{t-m})
//! l_t   = l_{t-1} + b_{t-1} + α e_t
//! b_t   = b_{t-1} + β e_t
//! s_t   = s_{t-m} + γ e_t
//! ```
//!
//! Forecast variance at step h is `σ² [1 + Σ_{j=1}^{h-1} (α + jβ + γ·1{j mod m = 0})²]`.

use crate::core::{CovariateWindow, Forecast, SeriesWindow};
use crate::error::{BacktestError, Result};
use crate::models::Forecaster;
use crate::utils::{fit_linear, normal_critical_value, LinearFit};

#[derive(Debug, Clone, PartialEq)]
struct State {
    level: f64,
    slope: f64,
    /// Seasonal effects indexed by `t mod m`; empty when no season is modelled.
    seasonals: Vec<f64>,
}

/// Regression + local linear trend + seasonal state-space model.
#[derive(Debug, Clone)]
pub struct StructuralModel {
    seasonal_period: Option<usize>,
    alpha: f64,
    beta: f64,
    gamma: f64,
    regression: Option<LinearFit>,
    state: Option<State>,
    n: usize,
    sigma2: f64,
}

impl StructuralModel {
    /// Model with a seasonal component of `period` observations.
    pub fn new(seasonal_period: usize) -> Self {
        Self {
            seasonal_period: Some(seasonal_period),
            alpha: 0.3,
            beta: 0.05,
            gamma: 0.1,
            regression: None,
            state: None,
            n: 0,
            sigma2: 0.0,
        }
    }

    /// Model without a seasonal component.
    pub fn nonseasonal() -> Self {
        Self {
            seasonal_period: None,
            ..Self::new(1)
        }
    }

    /// Set the level, slope and seasonal smoothing weights.
    pub fn with_smoothing(mut self, alpha: f64, beta: f64, gamma: f64) -> Self {
        self.alpha = alpha;
        self.beta = beta;
        self.gamma = gamma;
        self
    }

    pub fn level(&self) -> Option<f64> {
        self.state.as_ref().map(|s| s.level)
    }

    pub fn slope(&self) -> Option<f64> {
        self.state.as_ref().map(|s| s.slope)
    }

    /// Whether the last fit estimated seasonal states.
    pub fn seasonal_active(&self) -> bool {
        self.state.as_ref().is_some_and(|s| !s.seasonals.is_empty())
    }

    /// Fitted coefficient of a covariate design column.
    pub fn covariate_effect(&self, name: &str) -> Option<f64> {
        self.regression.as_ref()?.coefficient(name)
    }

    fn validate(&self) -> Result<()> {
        for (name, value) in [("alpha", self.alpha), ("beta", self.beta), ("gamma", self.gamma)] {
            if !(0.0..=1.0).contains(&value) {
                return Err(BacktestError::InvalidParameter(format!(
                    "{} must be in [0, 1], got {}",
                    name, value
                )));
            }
        }
        if self.seasonal_period == Some(0) {
            return Err(BacktestError::InvalidParameter(
                "seasonal period must be positive".to_string(),
            ));
        }
        Ok(())
    }

    /// Initial states from the start of the residual series.
    fn initialize(residuals: &[f64], period: Option<usize>) -> State {
        match period {
            Some(m) => {
                let level = residuals[..m].iter().sum::<f64>() / m as f64;
                let slope = (0..m)
                    .map(|i| (residuals[m + i] - residuals[i]) / m as f64)
                    .sum::<f64>()
                    / m as f64;
                let mut seasonals: Vec<f64> = residuals[..m].iter().map(|y| y - level).collect();
                let adjustment = seasonals.iter().sum::<f64>() / m as f64;
                for s in &mut seasonals {
                    *s -= adjustment;
                }
                // Level estimate sits mid-season; move it back to before t = 0.
                let level = level - slope * (m as f64 + 1.0) / 2.0;
                State {
                    level,
                    slope,
                    seasonals,
                }
            }
            None => State {
                level: residuals[0] - (residuals[1] - residuals[0]),
                slope: residuals[1] - residuals[0],
                seasonals: Vec::new(),
            },
        }
    }

    fn seasonal_at(state: &State, t: usize) -> f64 {
        if state.seasonals.is_empty() {
            0.0
        } else {
            state.seasonals[t % state.seasonals.len()]
        }
    }
}

impl Default for StructuralModel {
    fn default() -> Self {
        Self::new(52)
    }
}

impl Forecaster for StructuralModel {
    fn fit(
        &mut self,
        train: &SeriesWindow<'_>,
        covariates: Option<&CovariateWindow<'_>>,
    ) -> Result<()> {
        self.validate()?;
        let values = train.values();
        let n = values.len();
        if n < 2 {
            return Err(BacktestError::InsufficientData { needed: 2, got: n });
        }

        // Regression component; the intercept is absorbed by the level.
        self.regression = None;
        let mut residuals = values.to_vec();
        if let Some(cov) = covariates {
            if cov.len() != n {
                return Err(BacktestError::DimensionMismatch {
                    expected: n,
                    got: cov.len(),
                });
            }
            let design = cov.design();
            if !design.is_empty() {
                let regression = fit_linear(values, &design)?;
                let effect = regression.regression_effect(&design, n)?;
                for (r, e) in residuals.iter_mut().zip(&effect) {
                    *r -= e;
                }
                self.regression = Some(regression);
            }
        }

        // Seasonal states need two full seasons to initialise.
        let period = self.seasonal_period.filter(|&m| m > 1 && n >= 2 * m);
        let mut state = Self::initialize(&residuals, period);

        let mut sse = 0.0;
        for (t, &r) in residuals.iter().enumerate() {
            let s = Self::seasonal_at(&state, t);
            let error = r - (state.level + state.slope + s);
            sse += error * error;

            state.level += state.slope + self.alpha * error;
            state.slope += self.beta * error;
            if !state.seasonals.is_empty() {
                let m = state.seasonals.len();
                state.seasonals[t % m] = s + self.gamma * error;
            }
        }

        if !sse.is_finite() {
            return Err(BacktestError::ComputationError(
                "state recursion diverged".to_string(),
            ));
        }

        self.sigma2 = sse / n as f64;
        self.n = n;
        self.state = Some(state);
        Ok(())
    }

    fn predict(&self, horizon: usize, future: Option<&CovariateWindow<'_>>) -> Result<Forecast> {
        let state = self.state.as_ref().ok_or(BacktestError::FitRequired)?;

        let effect = match &self.regression {
            Some(regression) => {
                let future = future.ok_or(BacktestError::MissingCovariates)?;
                if future.len() != horizon {
                    return Err(BacktestError::DimensionMismatch {
                        expected: horizon,
                        got: future.len(),
                    });
                }
                regression.regression_effect(&future.design(), horizon)?
            }
            None => vec![0.0; horizon],
        };

        let values = (1..=horizon)
            .map(|h| {
                state.level
                    + h as f64 * state.slope
                    + Self::seasonal_at(state, self.n + h - 1)
                    + effect[h - 1]
            })
            .collect();
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
        let m = self
            .state
            .as_ref()
            .map(|s| s.seasonals.len())
            .unwrap_or(0);

        let values = point.point().to_vec();
        let mut lower = Vec::with_capacity(horizon);
        let mut upper = Vec::with_capacity(horizon);
        let mut cumulative = 1.0;
        for (j, v) in values.iter().enumerate() {
            if j > 0 {
                let seasonal = if m > 0 && j % m == 0 { self.gamma } else { 0.0 };
                let c = self.alpha + j as f64 * self.beta + seasonal;
                cumulative += c * c;
            }
            let se = (self.sigma2 * cumulative).sqrt();
            lower.push(v - z * se);
            upper.push(v + z * se);
        }
        Forecast::from_values_with_intervals(values, lower, upper)
    }

    fn requires_covariates(&self) -> bool {
        self.regression.is_some()
    }

    fn name(&self) -> &str {
        "StructuralModel"
    }
}

//! Forecaster trait defining the capability the backtest harness drives.

use crate::core::{CovariateWindow, Forecast, SeriesWindow};
use crate::error::Result;

/// Common interface for all forecasting models.
///
/// A model is fitted on a training window (optionally with the aligned
/// covariate rows) and then forecasts `horizon` steps past the end of that
/// window, given the covariates of those future steps.
///
/// This trait is object-safe and can be used with `Box<dyn Forecaster>`.
pub trait Forecaster {
    /// Fit the model to the training window.
    fn fit(&mut self, train: &SeriesWindow<'_>, covariates: Option<&CovariateWindow<'_>>)
        -> Result<()>;

    /// Generate point predictions for the specified horizon.
    fn predict(&self, horizon: usize, future: Option<&CovariateWindow<'_>>) -> Result<Forecast>;

    /// Generate predictions with intervals at the given coverage level.
    fn predict_with_intervals(
        &self,
        horizon: usize,
        future: Option<&CovariateWindow<'_>>,
        level: f64,
    ) -> Result<Forecast> {
        // Default implementation just returns point predictions
        let _ = level;
        self.predict(horizon, future)
    }

    /// Whether this model needs covariates to forecast.
    ///
    /// Checked after `fit`; the harness refuses to predict without covariates
    /// when this returns true.
    fn requires_covariates(&self) -> bool {
        false
    }

    /// Get the model name.
    fn name(&self) -> &str;
}

/// Type alias for boxed forecaster trait objects.
///
/// # Example
///
/// ```
/// use forecast_backtest::models::{BoxedForecaster, Forecaster};
/// use forecast_backtest::models::baseline::Naive;
///
/// let model: BoxedForecaster = Box::new(Naive::new());
/// assert_eq!(model.name(), "Naive");
/// ```
pub type BoxedForecaster = Box<dyn Forecaster + Send>;

impl<F: Forecaster + ?Sized> Forecaster for Box<F> {
    fn fit(
        &mut self,
        train: &SeriesWindow<'_>,
        covariates: Option<&CovariateWindow<'_>>,
    ) -> Result<()> {
        (**self).fit(train, covariates)
    }

    fn predict(&self, horizon: usize, future: Option<&CovariateWindow<'_>>) -> Result<Forecast> {
        (**self).predict(horizon, future)
    }

    fn predict_with_intervals(
        &self,
        horizon: usize,
        future: Option<&CovariateWindow<'_>>,
        level: f64,
    ) -> Result<Forecast> {
        (**self).predict_with_intervals(horizon, future, level)
    }

    fn requires_covariates(&self) -> bool {
        (**self).requires_covariates()
    }

    fn name(&self) -> &str {
        (**self).name()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::TimeSeries;
    use crate::models::baseline::{HistoricMean, Naive};
    use chrono::{Duration, TimeZone, Utc};

    fn make_test_series(n: usize) -> TimeSeries {
        let base = Utc.with_ymd_and_hms(2020, 1, 6, 0, 0, 0).unwrap();
        let values: Vec<f64> = (1..=n).map(|i| i as f64).collect();
        TimeSeries::regular(base, Duration::weeks(1), values).unwrap()
    }

    #[test]
    fn boxed_forecaster_fit_predict() {
        let mut model: BoxedForecaster = Box::new(Naive::new());
        let ts = make_test_series(20);

        model.fit(&ts.as_window(), None).unwrap();
        let forecast = model.predict(5, None).unwrap();
        assert_eq!(forecast.horizon(), 5);
        assert_eq!(model.name(), "Naive");
        assert!(!model.requires_covariates());
    }

    #[test]
    fn boxed_forecaster_with_intervals() {
        let mut model: BoxedForecaster = Box::new(HistoricMean::new());
        let ts = make_test_series(20);

        model.fit(&ts.as_window(), None).unwrap();
        let forecast = model.predict_with_intervals(5, None, 0.95).unwrap();
        assert_eq!(forecast.horizon(), 5);
        assert!(forecast.has_intervals());
    }

    #[test]
    fn default_interval_method_returns_points() {
        struct Constant;
        impl Forecaster for Constant {
            fn fit(
                &mut self,
                _train: &SeriesWindow<'_>,
                _covariates: Option<&CovariateWindow<'_>>,
            ) -> Result<()> {
                Ok(())
            }
            fn predict(
                &self,
                horizon: usize,
                _future: Option<&CovariateWindow<'_>>,
            ) -> Result<Forecast> {
                Ok(Forecast::from_values(vec![1.0; horizon]))
            }
            fn name(&self) -> &str {
                "Constant"
            }
        }

        let forecast = Constant.predict_with_intervals(3, None, 0.9).unwrap();
        assert_eq!(forecast.point(), &[1.0, 1.0, 1.0]);
        assert!(!forecast.has_intervals());
    }
}

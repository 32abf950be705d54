//! The backtest loop.

use crate::backtest::fold::plan_folds;
use crate::backtest::score::ErrorAccumulator;
use crate::backtest::{BacktestConfig, Fold, ScoreTable};
use crate::core::{CovariateFrame, Forecast, TimeSeries};
use crate::error::{BacktestError, FoldWindow, Result};
use crate::metrics::Metric;
use crate::models::Forecaster;
use chrono::{DateTime, Utc};
use tracing::{debug, info, warn};

/// Forecast of one fold next to what actually happened.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct FoldForecast {
    pub fold: usize,
    /// Timestamp of the first forecast period.
    pub cutoff: DateTime<Utc>,
    pub timestamps: Vec<DateTime<Utc>>,
    pub actual: Vec<f64>,
    pub forecast: Forecast,
    /// Metric value per horizon offset.
    pub errors: Vec<f64>,
}

/// One row of a [`FoldForecast`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ForecastPoint {
    /// 1-based horizon offset.
    pub offset: usize,
    pub timestamp: DateTime<Utc>,
    pub actual: f64,
    pub point: f64,
    pub interval: Option<(f64, f64)>,
}

impl FoldForecast {
    /// Rows of `(offset, timestamp, actual, point, interval)`.
    pub fn points(&self) -> impl Iterator<Item = ForecastPoint> + '_ {
        self.timestamps
            .iter()
            .zip(&self.actual)
            .zip(self.forecast.point())
            .enumerate()
            .map(|(i, ((&timestamp, &actual), &point))| ForecastPoint {
                offset: i + 1,
                timestamp,
                actual,
                point,
                interval: self.forecast.interval_at(i + 1),
            })
    }

    /// Count of actuals inside the forecast interval, if intervals exist.
    pub fn covered(&self) -> Option<usize> {
        if !self.forecast.has_intervals() {
            return None;
        }
        Some(
            self.points()
                .filter(|p| {
                    p.interval
                        .is_some_and(|(lo, hi)| p.actual >= lo && p.actual <= hi)
                })
                .count(),
        )
    }
}

/// Everything a backtest run produced.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BacktestReport {
    pub model: String,
    pub metric: String,
    pub folds: Vec<Fold>,
    pub forecasts: Vec<FoldForecast>,
    pub scores: ScoreTable,
}

impl BacktestReport {
    pub fn n_folds(&self) -> usize {
        self.folds.len()
    }

    /// Share of actuals inside the forecast intervals across all folds.
    ///
    /// `None` when the model produced no intervals.
    pub fn interval_coverage(&self) -> Option<f64> {
        let mut covered = 0;
        let mut total = 0;
        for f in &self.forecasts {
            covered += f.covered()?;
            total += f.actual.len();
        }
        if total == 0 {
            None
        } else {
            Some(covered as f64 / total as f64)
        }
    }
}

/// First fold whose training or test window contains series index `index`.
fn locate(folds: &[Fold], index: usize) -> Option<FoldWindow> {
    folds
        .iter()
        .find(|f| index < f.test_range().end)
        .map(|f| {
            if index < f.cutoff {
                FoldWindow::Train { fold: f.index }
            } else {
                FoldWindow::Test { fold: f.index }
            }
        })
}

/// Series, covariate rows and fold plan resolved for one run.
struct Prepared<'a> {
    series: &'a TimeSeries,
    covariates: Option<(&'a CovariateFrame, Vec<usize>)>,
    folds: Vec<Fold>,
}

/// Runs expanding-window backtests of a forecasting model.
///
/// For every fold a fresh model is created from the factory, fitted on
/// `series[0..cutoff]` and asked for `horizon` forecasts, which are scored
/// offset by offset with the metric. Any failure aborts the whole run.
///
/// # Example
/// ```
/// use forecast_backtest::backtest::{BacktestConfig, BacktestHarness};
/// use forecast_backtest::core::TimeSeries;
/// use forecast_backtest::metrics::AbsoluteError;
/// use forecast_backtest::models::baseline::Naive;
/// use chrono::{Duration, TimeZone, Utc};
///
/// let start = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
/// let values: Vec<f64> = (0..20).map(|i| i as f64).collect();
/// let series = TimeSeries::regular(start, Duration::weeks(1), values).unwrap();
///
/// let harness = BacktestHarness::new(BacktestConfig::expanding(10, 3)).unwrap();
/// let scores = harness.run(&series, None, Naive::new, &AbsoluteError).unwrap();
///
/// // Naive on a unit-slope line is off by exactly h at offset h.
/// assert_eq!(scores.get(1), Some(1.0));
/// assert_eq!(scores.get(3), Some(3.0));
/// ```
#[derive(Debug, Clone)]
pub struct BacktestHarness {
    config: BacktestConfig,
}

impl BacktestHarness {
    /// Create a harness, validating the configuration.
    pub fn new(config: BacktestConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &BacktestConfig {
        &self.config
    }

    /// Fold plan for a series of `len` observations.
    pub fn folds(&self, len: usize) -> Result<Vec<Fold>> {
        plan_folds(&self.config, len)
    }

    /// Run the backtest and return the per-offset score table.
    pub fn run<F, Factory, M>(
        &self,
        series: &TimeSeries,
        covariates: Option<&CovariateFrame>,
        model_factory: Factory,
        metric: &M,
    ) -> Result<ScoreTable>
    where
        F: Forecaster,
        Factory: Fn() -> F,
        M: Metric + ?Sized,
    {
        Ok(self
            .run_detailed(series, covariates, model_factory, metric)?
            .scores)
    }

    /// Run the backtest and keep every fold's forecast.
    pub fn run_detailed<F, Factory, M>(
        &self,
        series: &TimeSeries,
        covariates: Option<&CovariateFrame>,
        model_factory: Factory,
        metric: &M,
    ) -> Result<BacktestReport>
    where
        F: Forecaster,
        Factory: Fn() -> F,
        M: Metric + ?Sized,
    {
        let prepared = self.prepare(series, covariates)?;
        let model_name = model_factory().name().to_string();
        info!(
            model = %model_name,
            metric = metric.name(),
            folds = prepared.folds.len(),
            horizon = self.config.horizon,
            "starting backtest"
        );

        let (accumulator, forecasts) = prepared.folds.iter().try_fold(
            (ErrorAccumulator::new(), Vec::with_capacity(prepared.folds.len())),
            |(acc, mut forecasts), fold| {
                let outcome = self.evaluate_fold(&prepared, fold, &model_factory, metric)?;
                let acc = acc.with_fold(fold.index, &outcome.errors);
                forecasts.push(outcome);
                Ok::<_, BacktestError>((acc, forecasts))
            },
        )?;

        Ok(self.finish(model_name, metric, prepared.folds, forecasts, accumulator))
    }

    /// Run folds concurrently on the rayon thread pool.
    ///
    /// Produces the same table as [`run_detailed`](Self::run_detailed). When
    /// several folds fail, the error of the lowest fold index is returned.
    #[cfg(feature = "parallel")]
    pub fn run_parallel<F, Factory, M>(
        &self,
        series: &TimeSeries,
        covariates: Option<&CovariateFrame>,
        model_factory: Factory,
        metric: &M,
    ) -> Result<BacktestReport>
    where
        F: Forecaster,
        Factory: Fn() -> F + Sync,
        M: Metric + Sync + ?Sized,
    {
        use rayon::prelude::*;

        let prepared = self.prepare(series, covariates)?;
        let model_name = model_factory().name().to_string();
        info!(
            model = %model_name,
            metric = metric.name(),
            folds = prepared.folds.len(),
            horizon = self.config.horizon,
            "starting parallel backtest"
        );

        let outcomes: Vec<Result<FoldForecast>> = prepared
            .folds
            .par_iter()
            .map(|fold| self.evaluate_fold(&prepared, fold, &model_factory, metric))
            .collect();

        let mut accumulator = ErrorAccumulator::new();
        let mut forecasts = Vec::with_capacity(outcomes.len());
        for outcome in outcomes {
            let outcome = outcome?;
            accumulator.push_fold(outcome.fold, &outcome.errors);
            forecasts.push(outcome);
        }

        Ok(self.finish(model_name, metric, prepared.folds, forecasts, accumulator))
    }

    fn finish<M: Metric + ?Sized>(
        &self,
        model: String,
        metric: &M,
        folds: Vec<Fold>,
        forecasts: Vec<FoldForecast>,
        accumulator: ErrorAccumulator,
    ) -> BacktestReport {
        let scores = accumulator.into_score_table(self.config.aggregation);
        info!(
            model = %model,
            folds = folds.len(),
            offsets = scores.len(),
            aggregation = self.config.aggregation.name(),
            "backtest complete"
        );
        BacktestReport {
            model,
            metric: metric.name().to_string(),
            folds,
            forecasts,
            scores,
        }
    }

    /// Plan folds and align covariates before any model is fitted.
    fn prepare<'a>(
        &self,
        series: &'a TimeSeries,
        covariates: Option<&'a CovariateFrame>,
    ) -> Result<Prepared<'a>> {
        let folds = plan_folds(&self.config, series.len())?;
        // Only the rows the last fold reaches are ever requested.
        let reach = folds.last().map(|f| f.test_range().end).unwrap_or(0);

        let covariates = match covariates {
            Some(frame) => {
                let rows = frame.aligned_prefix(&series.timestamps()[..reach]);
                if rows.len() < reach {
                    let missing = rows.len();
                    let timestamp = series.timestamps()[missing];
                    let location = locate(&folds, missing);
                    warn!(%timestamp, ?location, "covariate row missing inside backtest range");
                    return Err(BacktestError::CovariateAlignment {
                        timestamp,
                        location,
                    });
                }
                Some((frame, rows))
            }
            None => None,
        };

        Ok(Prepared {
            series,
            covariates,
            folds,
        })
    }

    fn evaluate_fold<F, Factory, M>(
        &self,
        prepared: &Prepared<'_>,
        fold: &Fold,
        model_factory: &Factory,
        metric: &M,
    ) -> Result<FoldForecast>
    where
        F: Forecaster,
        Factory: Fn() -> F,
        M: Metric + ?Sized,
    {
        let series = prepared.series;
        let train = series.window(fold.train_range())?;
        let test = series.window(fold.test_range())?;
        let timestamps = series.timestamps();
        let train_start = timestamps[0];
        let train_end = timestamps[fold.cutoff - 1];
        let test_start = timestamps[fold.cutoff];
        let test_end = timestamps[fold.test_range().end - 1];

        let (train_cov, test_cov) = match &prepared.covariates {
            Some((frame, rows)) => (
                Some(frame.window(&rows[fold.train_range()])),
                Some(frame.window(&rows[fold.test_range()])),
            ),
            None => (None, None),
        };

        debug!(
            fold = fold.index,
            train_len = train.len(),
            %test_start,
            "fitting fold"
        );

        let mut model = model_factory();
        model
            .fit(&train, train_cov.as_ref())
            .map_err(|e| BacktestError::ModelFit {
                fold: fold.index,
                train_start,
                train_end,
                source: Box::new(e),
            })?;

        let predict_error = |e: BacktestError| BacktestError::ModelPredict {
            fold: fold.index,
            test_start,
            test_end,
            source: Box::new(e),
        };

        if test_cov.is_none() && model.requires_covariates() {
            return Err(predict_error(BacktestError::MissingCovariates));
        }

        let forecast = match self.config.interval_level {
            Some(level) => model.predict_with_intervals(fold.horizon, test_cov.as_ref(), level),
            None => model.predict(fold.horizon, test_cov.as_ref()),
        }
        .map_err(&predict_error)?;

        if forecast.horizon() != fold.horizon {
            return Err(predict_error(BacktestError::DimensionMismatch {
                expected: fold.horizon,
                got: forecast.horizon(),
            }));
        }

        let actual = test.values();
        let errors: Vec<f64> = actual
            .iter()
            .zip(forecast.point())
            .map(|(a, p)| metric.score(std::slice::from_ref(a), std::slice::from_ref(p)))
            .collect();

        if let Some(offset) = errors.iter().position(|e| !e.is_finite()) {
            warn!(
                fold = fold.index,
                offset = offset + 1,
                metric = metric.name(),
                "metric returned a non-finite value"
            );
        }

        Ok(FoldForecast {
            fold: fold.index,
            cutoff: test_start,
            timestamps: test.timestamps().to_vec(),
            actual: actual.to_vec(),
            forecast,
            errors,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{CovariateWindow, SeriesWindow};
    use crate::metrics::{AbsoluteError, SquaredError};
    use crate::models::baseline::{HistoricMean, Naive};
    use crate::models::CurveDecomposition;
    use approx::assert_relative_eq;
    use chrono::{Duration, TimeZone};
    use std::cell::RefCell;

    fn weekly(values: Vec<f64>) -> TimeSeries {
        let base = Utc.with_ymd_and_hms(2021, 1, 4, 0, 0, 0).unwrap();
        TimeSeries::regular(base, Duration::weeks(1), values).unwrap()
    }

    fn linear(n: usize) -> TimeSeries {
        weekly((0..n).map(|i| i as f64).collect())
    }

    /// Forecasts a scripted value per fold, keyed by training length.
    struct Scripted {
        train_len: usize,
    }

    impl Forecaster for Scripted {
        fn fit(
            &mut self,
            train: &SeriesWindow<'_>,
            _covariates: Option<&CovariateWindow<'_>>,
        ) -> Result<()> {
            self.train_len = train.len();
            Ok(())
        }

        fn predict(
            &self,
            horizon: usize,
            _future: Option<&CovariateWindow<'_>>,
        ) -> Result<Forecast> {
            Ok(Forecast::from_values(vec![self.train_len as f64; horizon]))
        }

        fn name(&self) -> &str {
            "Scripted"
        }
    }

    struct FailingFit;

    impl Forecaster for FailingFit {
        fn fit(
            &mut self,
            train: &SeriesWindow<'_>,
            _covariates: Option<&CovariateWindow<'_>>,
        ) -> Result<()> {
            if train.len() > 6 {
                Err(BacktestError::ComputationError("did not converge".to_string()))
            } else {
                Ok(())
            }
        }

        fn predict(
            &self,
            horizon: usize,
            _future: Option<&CovariateWindow<'_>>,
        ) -> Result<Forecast> {
            Ok(Forecast::from_values(vec![0.0; horizon]))
        }

        fn name(&self) -> &str {
            "FailingFit"
        }
    }

    struct ShortForecast;

    impl Forecaster for ShortForecast {
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
            Ok(Forecast::from_values(vec![0.0; horizon - 1]))
        }

        fn name(&self) -> &str {
            "ShortForecast"
        }
    }

    #[test]
    fn harness_rejects_invalid_config() {
        assert!(BacktestHarness::new(BacktestConfig::expanding(0, 1)).is_err());
        assert!(BacktestHarness::new(BacktestConfig::expanding(5, 1)).is_ok());
    }

    #[test]
    fn naive_scores_grow_with_offset_on_a_line() {
        let harness = BacktestHarness::new(BacktestConfig::expanding(10, 4)).unwrap();
        let table = harness
            .run(&linear(20), None, Naive::new, &AbsoluteError)
            .unwrap();

        assert_eq!(table.len(), 4);
        for h in 1..=4 {
            assert_relative_eq!(table.get(h).unwrap(), h as f64);
            assert_eq!(table.observations(h), Some(7));
        }
    }

    #[test]
    fn training_window_expands_by_step() {
        let seen = RefCell::new(Vec::new());
        let harness =
            BacktestHarness::new(BacktestConfig::expanding(5, 2).with_step(3)).unwrap();

        let report = harness
            .run_detailed(
                &linear(16),
                None,
                || {
                    seen.borrow_mut().push(());
                    Scripted { train_len: 0 }
                },
                &AbsoluteError,
            )
            .unwrap();

        // Cutoffs 5, 8, 11, 14
        assert_eq!(report.n_folds(), 4);
        let predicted: Vec<f64> = report.forecasts.iter().map(|f| f.forecast.point()[0]).collect();
        assert_eq!(predicted, vec![5.0, 8.0, 11.0, 14.0]);
        // One probe for the model name plus one fresh model per fold
        assert_eq!(seen.borrow().len(), 5);
    }

    #[test]
    fn scores_are_metric_of_actual_against_forecast() {
        let harness = BacktestHarness::new(BacktestConfig::expanding(4, 2)).unwrap();
        let series = weekly(vec![1.0, 1.0, 1.0, 1.0, 3.0, 5.0, 2.0]);
        let report = harness
            .run_detailed(&series, None, HistoricMean::new, &SquaredError)
            .unwrap();

        // Fold 0: mean 1 vs [3, 5]; fold 1: mean 1.4 vs [5, 2]
        assert_eq!(report.forecasts[0].errors, vec![4.0, 16.0]);
        assert_relative_eq!(report.forecasts[1].errors[0], 3.6 * 3.6, epsilon = 1e-12);
        assert_relative_eq!(
            report.scores.get(1).unwrap(),
            (4.0 + 3.6 * 3.6) / 2.0,
            epsilon = 1e-12
        );
        assert_eq!(report.metric, "squared_error");
        assert_eq!(report.model, "HistoricMean");
    }

    #[test]
    fn insufficient_data_fails_before_any_fit() {
        let harness = BacktestHarness::new(BacktestConfig::expanding(10, 5)).unwrap();
        let fits = RefCell::new(0);
        let result = harness.run(
            &linear(14),
            None,
            || {
                *fits.borrow_mut() += 1;
                Naive::new()
            },
            &AbsoluteError,
        );
        assert_eq!(
            result.unwrap_err(),
            BacktestError::InsufficientData { needed: 15, got: 14 }
        );
        assert_eq!(*fits.borrow(), 0);
    }

    #[test]
    fn fit_failure_aborts_and_names_fold() {
        let harness = BacktestHarness::new(BacktestConfig::expanding(5, 1)).unwrap();
        let series = linear(10);
        let err = harness
            .run(&series, None, || FailingFit, &AbsoluteError)
            .unwrap_err();

        assert_eq!(
            err,
            BacktestError::ModelFit {
                fold: 2,
                train_start: series.timestamps()[0],
                train_end: series.timestamps()[6],
                source: Box::new(BacktestError::ComputationError(
                    "did not converge".to_string()
                )),
            }
        );
    }

    #[test]
    fn model_errors_keep_their_variant() {
        let series = linear(12);
        let frame = CovariateFrame::new(series.timestamps().to_vec())
            .unwrap()
            .with_numeric("~x", vec![1.0; 12])
            .unwrap();
        let harness = BacktestHarness::new(BacktestConfig::expanding(8, 2)).unwrap();
        let err = harness
            .run(
                &series,
                Some(&frame),
                CurveDecomposition::weekly_yearly,
                &AbsoluteError,
            )
            .unwrap_err();

        assert!(matches!(err, BacktestError::ModelFit { fold: 0, .. }));
        assert!(matches!(
            err.model_error(),
            Some(BacktestError::InvalidParameter(_))
        ));
        assert!(err.to_string().contains("reserved '~' prefix"));
    }

    #[test]
    fn covariate_model_without_frame_fails_before_predicting() {
        let predicted = RefCell::new(false);

        struct NeedsCovariates<'a> {
            predicted: &'a RefCell<bool>,
        }

        impl Forecaster for NeedsCovariates<'_> {
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
                *self.predicted.borrow_mut() = true;
                Ok(Forecast::from_values(vec![0.0; horizon]))
            }

            fn requires_covariates(&self) -> bool {
                true
            }

            fn name(&self) -> &str {
                "NeedsCovariates"
            }
        }

        let harness = BacktestHarness::new(BacktestConfig::expanding(5, 2)).unwrap();
        let series = linear(9);
        let err = harness
            .run(
                &series,
                None,
                || NeedsCovariates {
                    predicted: &predicted,
                },
                &AbsoluteError,
            )
            .unwrap_err();

        assert_eq!(
            err,
            BacktestError::ModelPredict {
                fold: 0,
                test_start: series.timestamps()[5],
                test_end: series.timestamps()[6],
                source: Box::new(BacktestError::MissingCovariates),
            }
        );
        assert!(!*predicted.borrow());
    }

    #[test]
    fn missing_covariate_row_is_attributed_to_a_fold_window() {
        let series = linear(12);
        let harness = BacktestHarness::new(BacktestConfig::expanding(4, 2).with_step(3)).unwrap();
        // Cutoffs 4, 7, 10
        let without = |skip: usize| {
            let stamps: Vec<_> = series
                .timestamps()
                .iter()
                .enumerate()
                .filter(|&(i, _)| i != skip)
                .map(|(_, &t)| t)
                .collect();
            let n = stamps.len();
            CovariateFrame::new(stamps)
                .unwrap()
                .with_numeric("price", vec![1.0; n])
                .unwrap()
        };

        let cases = [
            (1, FoldWindow::Train { fold: 0 }),
            (5, FoldWindow::Test { fold: 0 }),
            // Falls between the test windows of folds 0 and 1
            (6, FoldWindow::Train { fold: 1 }),
            (11, FoldWindow::Test { fold: 2 }),
        ];
        for (skip, window) in cases {
            let frame = without(skip);
            let err = harness
                .run(&series, Some(&frame), Naive::new, &AbsoluteError)
                .unwrap_err();
            assert_eq!(
                err,
                BacktestError::CovariateAlignment {
                    timestamp: series.timestamps()[skip],
                    location: Some(window),
                }
            );
        }
    }

    #[test]
    fn wrong_forecast_length_is_a_predict_failure() {
        let harness = BacktestHarness::new(BacktestConfig::expanding(5, 3)).unwrap();
        let series = linear(8);
        let err = harness
            .run(&series, None, || ShortForecast, &AbsoluteError)
            .unwrap_err();

        match err {
            BacktestError::ModelPredict {
                fold,
                test_start,
                test_end,
                source,
            } => {
                assert_eq!(fold, 0);
                assert_eq!(test_start, series.timestamps()[5]);
                assert_eq!(test_end, series.timestamps()[7]);
                assert_eq!(
                    *source,
                    BacktestError::DimensionMismatch {
                        expected: 3,
                        got: 2
                    }
                );
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn non_finite_metric_values_pass_through() {
        let harness = BacktestHarness::new(BacktestConfig::expanding(3, 1)).unwrap();
        let nan_metric = |_: &[f64], _: &[f64]| f64::NAN;
        let table = harness.run(&linear(5), None, Naive::new, &nan_metric).unwrap();
        assert!(table.get(1).unwrap().is_nan());
    }

    #[test]
    fn interval_level_requests_intervals() {
        let values: Vec<f64> = (0..30).map(|i| 10.0 + ((i * 7) % 5) as f64).collect();
        let harness = BacktestHarness::new(
            BacktestConfig::expanding(20, 3).with_interval_level(0.95),
        )
        .unwrap();
        let report = harness
            .run_detailed(&weekly(values), None, HistoricMean::new, &AbsoluteError)
            .unwrap();

        assert!(report.forecasts.iter().all(|f| f.forecast.has_intervals()));
        let coverage = report.interval_coverage().unwrap();
        assert!((0.0..=1.0).contains(&coverage));

        let point = report.forecasts[0].points().next().unwrap();
        assert_eq!(point.offset, 1);
        assert_eq!(point.timestamp, report.forecasts[0].cutoff);
        assert!(point.interval.is_some());
    }

    #[test]
    fn coverage_is_none_without_intervals() {
        let harness = BacktestHarness::new(BacktestConfig::expanding(5, 2)).unwrap();
        let report = harness
            .run_detailed(&linear(10), None, Naive::new, &AbsoluteError)
            .unwrap();
        assert_eq!(report.interval_coverage(), None);
        assert_eq!(report.forecasts[0].covered(), None);
    }

    #[test]
    fn folds_match_plan() {
        let harness = BacktestHarness::new(BacktestConfig::expanding(104, 52)).unwrap();
        assert_eq!(harness.folds(160).unwrap().len(), 5);
        assert_eq!(harness.config().horizon, 52);
    }
}

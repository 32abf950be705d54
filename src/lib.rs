//! # forecast-backtest
//!
//! Expanding-window backtesting for time series forecasting models with
//! exogenous covariates.
//!
//! The [`backtest::BacktestHarness`] splits a series into folds whose
//! training windows all start at the first observation, fits a fresh model
//! per fold through the [`models::Forecaster`] trait and aggregates a
//! pointwise [`metrics::Metric`] per forecast horizon offset.

#![allow(clippy::needless_range_loop)]

pub mod backtest;
pub mod core;
pub mod error;
pub mod metrics;
pub mod models;
pub mod utils;

pub use error::{BacktestError, FoldWindow, Result};

pub mod prelude {
    pub use crate::backtest::{Aggregation, BacktestConfig, BacktestHarness, ScoreTable};
    pub use crate::core::{CovariateFrame, Forecast, TimeSeries};
    pub use crate::error::{BacktestError, Result};
    pub use crate::metrics::{AbsoluteError, Metric, PercentageError, SquaredError};
    pub use crate::models::Forecaster;
}

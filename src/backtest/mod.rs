//! Rolling-origin evaluation of forecasting models.
//!
//! A backtest repeatedly fits a model on an expanding prefix of the series,
//! forecasts the next `horizon` periods and scores each forecast against the
//! held-out actuals. Errors are aggregated per horizon offset, so the result
//! shows how accuracy degrades the further ahead the model looks.

mod config;
mod fold;
mod harness;
mod score;

pub use config::{Aggregation, BacktestConfig};
pub use fold::{plan_folds, Fold};
pub use harness::{BacktestHarness, BacktestReport, FoldForecast, ForecastPoint};
pub use score::{ErrorAccumulator, FoldError, ScoreEntry, ScoreTable};

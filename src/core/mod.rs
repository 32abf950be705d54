//! Core data structures: target series, covariates and forecasts.

mod covariates;
mod forecast;
mod time_series;

pub use covariates::{Covariate, CovariateFrame, CovariateWindow};
pub use forecast::Forecast;
pub use time_series::{SeriesWindow, TimeSeries};

//! Baseline forecasting models.
//!
//! Simple methods that serve as benchmarks for more complex models. They
//! ignore covariates.

mod mean;
mod naive;
mod seasonal_naive;

pub use mean::HistoricMean;
pub use naive::Naive;
pub use seasonal_naive::SeasonalNaive;

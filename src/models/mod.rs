//! Forecasting models.
//!
//! The harness only depends on the [`Forecaster`] trait; the models here are
//! reference implementations of it.

mod traits;

pub mod baseline;
pub mod decomposition;
pub mod structural;

pub use decomposition::{CurveDecomposition, Seasonality, WEEKS_PER_YEAR};
pub use structural::StructuralModel;
pub use traits::{BoxedForecaster, Forecaster};

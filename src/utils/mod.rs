//! Numerical helpers shared by the reference models.

pub mod ols;
pub mod stats;

pub use ols::{fit_linear, LinearFit};
pub use stats::{mean, median, normal_critical_value, std_dev, variance};

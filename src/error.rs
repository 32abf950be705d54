//! Error types for the forecast-backtest library.

use chrono::{DateTime, Utc};
use std::fmt;
use thiserror::Error;

/// Result type alias for backtest operations.
pub type Result<T> = std::result::Result<T, BacktestError>;

/// Errors that can occur while building inputs, fitting models or running a backtest.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum BacktestError {
    /// Input data is empty.
    #[error("empty input data")]
    EmptyData,

    /// Insufficient data points for the operation.
    #[error("insufficient data: need at least {needed}, got {got}")]
    InsufficientData { needed: usize, got: usize },

    /// Invalid parameter value.
    #[error("invalid parameter: {0}")]
    InvalidParameter(String),

    /// Dimension mismatch between data structures.
    #[error("dimension mismatch: expected {expected}, got {got}")]
    DimensionMismatch { expected: usize, got: usize },

    /// Timestamp-related error.
    #[error("timestamp error: {0}")]
    TimestampError(String),

    /// Frequency inference failed.
    #[error("could not infer frequency: {0}")]
    FrequencyInference(String),

    /// Model has not been fitted yet.
    #[error("model must be fitted before prediction")]
    FitRequired,

    /// The model was fitted with covariates but none were supplied for prediction.
    #[error("model was fitted with covariates but none were supplied")]
    MissingCovariates,

    /// A covariate column was requested that the frame does not carry.
    #[error("unknown covariate '{0}'")]
    UnknownCovariate(String),

    /// A series timestamp has no matching covariate row.
    ///
    /// `location` is set when the timestamp falls inside a planned fold.
    #[error("no covariate row for timestamp {timestamp}{}", located(.location))]
    CovariateAlignment {
        timestamp: DateTime<Utc>,
        location: Option<FoldWindow>,
    },

    /// The model failed to fit on a fold's training window.
    #[error("fold {fold}: model fit failed on training window {train_start}..={train_end}: {source}")]
    ModelFit {
        fold: usize,
        train_start: DateTime<Utc>,
        train_end: DateTime<Utc>,
        #[source]
        source: Box<BacktestError>,
    },

    /// The model failed to forecast a fold's test window.
    #[error("fold {fold}: model prediction failed for test window {test_start}..={test_end}: {source}")]
    ModelPredict {
        fold: usize,
        test_start: DateTime<Utc>,
        test_end: DateTime<Utc>,
        #[source]
        source: Box<BacktestError>,
    },

    /// A percentage metric met a zero actual value.
    #[error("division by zero: actual value at index {index} is zero")]
    DivisionByZero { index: usize },

    /// Computation error (e.g., numerical issues).
    #[error("computation error: {0}")]
    ComputationError(String),
}

impl BacktestError {
    /// The model's own error behind a `ModelFit` or `ModelPredict` failure.
    pub fn model_error(&self) -> Option<&BacktestError> {
        match self {
            BacktestError::ModelFit { source, .. } | BacktestError::ModelPredict { source, .. } => {
                Some(source.as_ref())
            }
            _ => None,
        }
    }
}

/// Window of a fold that a timestamp belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FoldWindow {
    Train { fold: usize },
    Test { fold: usize },
}

impl fmt::Display for FoldWindow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FoldWindow::Train { fold } => write!(f, "training window of fold {}", fold),
            FoldWindow::Test { fold } => write!(f, "test window of fold {}", fold),
        }
    }
}

fn located(location: &Option<FoldWindow>) -> String {
    match location {
        Some(window) => format!(" in {}", window),
        None => String::new(),
    }
}

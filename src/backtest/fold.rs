//! Fold generation for expanding-window backtests.

use crate::backtest::BacktestConfig;
use crate::error::{BacktestError, Result};
use std::ops::Range;

/// One train/test split, as index ranges into the series.
///
/// Training always starts at index 0; only the cutoff moves.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Fold {
    /// Position of this fold in the plan, starting at 0.
    pub index: usize,
    /// First test index; equals the training length.
    pub cutoff: usize,
    pub horizon: usize,
}

impl Fold {
    pub fn train_range(&self) -> Range<usize> {
        0..self.cutoff
    }

    pub fn test_range(&self) -> Range<usize> {
        self.cutoff..self.cutoff + self.horizon
    }

    pub fn train_len(&self) -> usize {
        self.cutoff
    }
}

/// Folds for a series of `len` observations.
///
/// Cutoffs are `initial_window, initial_window + step, ...` while the test
/// window fits inside the series, giving
/// `(len - initial_window - horizon) / step + 1` folds.
pub fn plan_folds(config: &BacktestConfig, len: usize) -> Result<Vec<Fold>> {
    config.validate()?;
    let needed = config.min_total_length().ok_or_else(|| {
        BacktestError::InvalidParameter("initial_window + horizon overflows".to_string())
    })?;
    if len < needed {
        return Err(BacktestError::InsufficientData { needed, got: len });
    }

    let folds = (config.initial_window..=len - config.horizon)
        .step_by(config.step)
        .enumerate()
        .map(|(index, cutoff)| Fold {
            index,
            cutoff,
            horizon: config.horizon,
        })
        .collect();
    Ok(folds)
}

//! TimeSeries data structure and borrowed windows over it.

use crate::error::{BacktestError, Result};
use chrono::{DateTime, Duration, Utc};
use std::collections::BTreeMap;
use std::ops::Range;

/// A univariate time series with strictly increasing timestamps.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TimeSeries {
    timestamps: Vec<DateTime<Utc>>,
    values: Vec<f64>,
    name: Option<String>,
}

impl TimeSeries {
    /// Create a series from parallel timestamp and value vectors.
    pub fn new(timestamps: Vec<DateTime<Utc>>, values: Vec<f64>) -> Result<Self> {
        if values.len() != timestamps.len() {
            return Err(BacktestError::DimensionMismatch {
                expected: timestamps.len(),
                got: values.len(),
            });
        }
        validate_increasing(&timestamps)?;

        Ok(Self {
            timestamps,
            values,
            name: None,
        })
    }

    /// Create a fixed-frequency series starting at `start`.
    pub fn regular(start: DateTime<Utc>, frequency: Duration, values: Vec<f64>) -> Result<Self> {
        if frequency <= Duration::zero() {
            return Err(BacktestError::InvalidParameter(
                "frequency must be positive".to_string(),
            ));
        }
        let timestamps = (0..values.len())
            .map(|i| {
                i32::try_from(i)
                    .ok()
                    .and_then(|k| frequency.checked_mul(k))
                    .and_then(|offset| start.checked_add_signed(offset))
                    .ok_or_else(|| {
                        BacktestError::InvalidParameter(format!(
                            "timestamp {} of a regular series is out of range",
                            i
                        ))
                    })
            })
            .collect::<Result<Vec<_>>>()?;
        Self::new(timestamps, values)
    }

    /// Attach a display name (carried through to reports).
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    /// Get the number of observations.
    pub fn len(&self) -> usize {
        self.timestamps.len()
    }

    /// Check if the series is empty.
    pub fn is_empty(&self) -> bool {
        self.timestamps.is_empty()
    }

    pub fn timestamps(&self) -> &[DateTime<Utc>] {
        &self.timestamps
    }

    pub fn values(&self) -> &[f64] {
        &self.values
    }

    /// Borrow a contiguous index range of the series without copying.
    pub fn window(&self, range: Range<usize>) -> Result<SeriesWindow<'_>> {
        if range.start > range.end {
            return Err(BacktestError::InvalidParameter(
                "window start must be <= end".to_string(),
            ));
        }
        if range.end > self.len() {
            return Err(BacktestError::InsufficientData {
                needed: range.end,
                got: self.len(),
            });
        }

        Ok(SeriesWindow {
            timestamps: &self.timestamps[range.clone()],
            values: &self.values[range.clone()],
            offset: range.start,
        })
    }

    /// Borrow the whole series as a window.
    pub fn as_window(&self) -> SeriesWindow<'_> {
        SeriesWindow {
            timestamps: &self.timestamps,
            values: &self.values,
            offset: 0,
        }
    }

    /// Check if series has missing values (NaN or Inf).
    pub fn has_missing_values(&self) -> bool {
        self.values.iter().any(|v| !v.is_finite())
    }

    /// Infer the nominal frequency as the modal spacing between timestamps.
    ///
    /// `tolerance` is the minimum share of gaps that must equal the modal
    /// spacing for the inference to succeed.
    pub fn infer_frequency(&self, tolerance: f64) -> Result<Duration> {
        if self.len() < 2 {
            return Err(BacktestError::InsufficientData {
                needed: 2,
                got: self.len(),
            });
        }

        let mut counts: BTreeMap<i64, usize> = BTreeMap::new();
        for w in self.timestamps.windows(2) {
            *counts.entry((w[1] - w[0]).num_seconds()).or_insert(0) += 1;
        }

        let (modal_diff, modal_count) = counts
            .iter()
            .max_by_key(|(_, &count)| count)
            .map(|(&diff, &count)| (diff, count))
            .ok_or_else(|| BacktestError::FrequencyInference("empty spacing data".to_string()))?;

        let total: usize = counts.values().sum();
        if (modal_count as f64 / total as f64) < tolerance {
            return Err(BacktestError::FrequencyInference(
                "no unique modal spacing found".to_string(),
            ));
        }

        Ok(Duration::seconds(modal_diff))
    }

    /// Verify the series has no gaps at the given nominal frequency.
    pub fn check_regular(&self, frequency: Duration) -> Result<()> {
        for w in self.timestamps.windows(2) {
            if w[1] - w[0] != frequency {
                return Err(BacktestError::TimestampError(format!(
                    "gap before {}: expected spacing of {} seconds, got {}",
                    w[1],
                    frequency.num_seconds(),
                    (w[1] - w[0]).num_seconds()
                )));
            }
        }
        Ok(())
    }
}

/// Borrowed view of a contiguous range of a [`TimeSeries`].
#[derive(Debug, Clone, Copy)]
pub struct SeriesWindow<'a> {
    timestamps: &'a [DateTime<Utc>],
    values: &'a [f64],
    offset: usize,
}

impl<'a> SeriesWindow<'a> {
    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn timestamps(&self) -> &'a [DateTime<Utc>] {
        self.timestamps
    }

    pub fn values(&self) -> &'a [f64] {
        self.values
    }

    /// Index of the first observation in the parent series.
    pub fn offset(&self) -> usize {
        self.offset
    }

    pub fn first_timestamp(&self) -> Option<DateTime<Utc>> {
        self.timestamps.first().copied()
    }

    pub fn last_timestamp(&self) -> Option<DateTime<Utc>> {
        self.timestamps.last().copied()
    }
}

pub(crate) fn validate_increasing(timestamps: &[DateTime<Utc>]) -> Result<()> {
    for w in timestamps.windows(2) {
        if w[1] <= w[0] {
            return Err(BacktestError::TimestampError(format!(
                "timestamps must be strictly increasing ({} follows {})",
                w[1], w[0]
            )));
        }
    }
    Ok(())
}

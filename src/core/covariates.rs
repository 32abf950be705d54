//! Exogenous covariates keyed by timestamp.

use crate::core::time_series::validate_increasing;
use crate::error::{BacktestError, Result};
use chrono::{DateTime, Utc};
use std::collections::{BTreeMap, BTreeSet, HashMap};

/// One named covariate column.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Covariate {
    Numeric(Vec<f64>),
    Categorical(Vec<String>),
}

impl Covariate {
    pub fn len(&self) -> usize {
        match self {
            Covariate::Numeric(v) => v.len(),
            Covariate::Categorical(v) => v.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// A table of named covariates with one row per timestamp.
///
/// Rows are looked up by timestamp, so the frame may cover a wider or
/// narrower range than the target series. Categorical levels are computed
/// over the whole frame; every window therefore expands to the same design
/// columns.
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CovariateFrame {
    timestamps: Vec<DateTime<Utc>>,
    columns: BTreeMap<String, Covariate>,
    levels: BTreeMap<String, Vec<String>>,
}

impl CovariateFrame {
    /// Create an empty frame over the given timestamps.
    pub fn new(timestamps: Vec<DateTime<Utc>>) -> Result<Self> {
        validate_increasing(&timestamps)?;
        Ok(Self {
            timestamps,
            columns: BTreeMap::new(),
            levels: BTreeMap::new(),
        })
    }

    /// Add a numeric column.
    pub fn with_numeric(mut self, name: impl Into<String>, values: Vec<f64>) -> Result<Self> {
        self.insert(name.into(), Covariate::Numeric(values))?;
        Ok(self)
    }

    /// Add a categorical column.
    pub fn with_categorical(
        mut self,
        name: impl Into<String>,
        values: Vec<String>,
    ) -> Result<Self> {
        self.insert(name.into(), Covariate::Categorical(values))?;
        Ok(self)
    }

    fn insert(&mut self, name: String, column: Covariate) -> Result<()> {
        if column.len() != self.timestamps.len() {
            return Err(BacktestError::DimensionMismatch {
                expected: self.timestamps.len(),
                got: column.len(),
            });
        }
        if self.columns.contains_key(&name) {
            return Err(BacktestError::InvalidParameter(format!(
                "duplicate covariate '{}'",
                name
            )));
        }
        if let Covariate::Categorical(values) = &column {
            let levels: BTreeSet<&String> = values.iter().collect();
            self.levels
                .insert(name.clone(), levels.into_iter().cloned().collect());
        }
        self.columns.insert(name, column);
        Ok(())
    }

    /// Number of rows.
    pub fn len(&self) -> usize {
        self.timestamps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.timestamps.is_empty()
    }

    pub fn timestamps(&self) -> &[DateTime<Utc>] {
        &self.timestamps
    }

    /// Column names in sorted order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.columns.keys().map(|k| k.as_str())
    }

    pub fn column(&self, name: &str) -> Option<&Covariate> {
        self.columns.get(name)
    }

    /// Sorted distinct levels of a categorical column.
    pub fn levels(&self, name: &str) -> Option<&[String]> {
        self.levels.get(name).map(|l| l.as_slice())
    }

    /// Row holding the given timestamp, if any.
    pub fn row_index(&self, timestamp: &DateTime<Utc>) -> Option<usize> {
        self.timestamps.binary_search(timestamp).ok()
    }

    /// Map every timestamp to its covariate row.
    ///
    /// Fails with [`BacktestError::CovariateAlignment`] on the first timestamp
    /// without a row.
    pub fn align(&self, timestamps: &[DateTime<Utc>]) -> Result<Vec<usize>> {
        let rows = self.aligned_prefix(timestamps);
        match timestamps.get(rows.len()) {
            Some(&timestamp) => Err(BacktestError::CovariateAlignment {
                timestamp,
                location: None,
            }),
            None => Ok(rows),
        }
    }

    /// Map timestamps to rows, stopping at the first timestamp without a row.
    pub fn aligned_prefix(&self, timestamps: &[DateTime<Utc>]) -> Vec<usize> {
        timestamps
            .iter()
            .map_while(|t| self.row_index(t))
            .collect()
    }

    /// Borrow the given rows as a window.
    pub fn window<'a>(&'a self, rows: &'a [usize]) -> CovariateWindow<'a> {
        CovariateWindow { frame: self, rows }
    }
}

/// Borrowed view of selected rows of a [`CovariateFrame`].
#[derive(Debug, Clone, Copy)]
pub struct CovariateWindow<'a> {
    frame: &'a CovariateFrame,
    rows: &'a [usize],
}

impl<'a> CovariateWindow<'a> {
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn frame(&self) -> &'a CovariateFrame {
        self.frame
    }

    pub fn timestamps(&self) -> impl Iterator<Item = DateTime<Utc>> + 'a {
        let frame = self.frame;
        self.rows.iter().map(move |&r| frame.timestamps[r])
    }

    /// Values of a numeric column for the window's rows.
    pub fn numeric(&self, name: &str) -> Result<Vec<f64>> {
        match self.frame.column(name) {
            Some(Covariate::Numeric(values)) => Ok(self.rows.iter().map(|&r| values[r]).collect()),
            Some(Covariate::Categorical(_)) => Err(BacktestError::InvalidParameter(format!(
                "covariate '{}' is categorical",
                name
            ))),
            None => Err(BacktestError::UnknownCovariate(name.to_string())),
        }
    }

    /// Values of a categorical column for the window's rows.
    pub fn categorical(&self, name: &str) -> Result<Vec<&'a str>> {
        match self.frame.column(name) {
            Some(Covariate::Categorical(values)) => {
                Ok(self.rows.iter().map(|&r| values[r].as_str()).collect())
            }
            Some(Covariate::Numeric(_)) => Err(BacktestError::InvalidParameter(format!(
                "covariate '{}' is numeric",
                name
            ))),
            None => Err(BacktestError::UnknownCovariate(name.to_string())),
        }
    }

    /// Numeric regression inputs for the window.
    ///
    /// Numeric columns keep their name. Categorical columns are one-hot
    /// encoded as `name=level`, omitting the first (reference) level.
    pub fn design(&self) -> HashMap<String, Vec<f64>> {
        let mut design = HashMap::new();
        for (name, column) in &self.frame.columns {
            match column {
                Covariate::Numeric(values) => {
                    design.insert(
                        name.clone(),
                        self.rows.iter().map(|&r| values[r]).collect(),
                    );
                }
                Covariate::Categorical(values) => {
                    let levels = self.frame.levels(name).unwrap_or(&[]);
                    for level in levels.iter().skip(1) {
                        let indicator = self
                            .rows
                            .iter()
                            .map(|&r| if values[r] == *level { 1.0 } else { 0.0 })
                            .collect();
                        design.insert(format!("{}={}", name, level), indicator);
                    }
                }
            }
        }
        design
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};

    fn weeks(n: usize) -> Vec<DateTime<Utc>> {
        let base = Utc.with_ymd_and_hms(2023, 1, 2, 0, 0, 0).unwrap();
        (0..n).map(|i| base + Duration::weeks(i as i64)).collect()
    }

    fn frame() -> CovariateFrame {
        CovariateFrame::new(weeks(4))
            .unwrap()
            .with_numeric("temperature", vec![10.0, 12.0, 9.0, 15.0])
            .unwrap()
            .with_categorical(
                "promo",
                vec!["none", "tv", "radio", "tv"]
                    .into_iter()
                    .map(String::from)
                    .collect(),
            )
            .unwrap()
    }

    #[test]
    fn frame_validates_column_lengths_and_names() {
        let f = CovariateFrame::new(weeks(3)).unwrap();
        assert_eq!(
            f.clone().with_numeric("x", vec![1.0]).unwrap_err(),
            BacktestError::DimensionMismatch {
                expected: 3,
                got: 1
            }
        );

        let f = f.with_numeric("x", vec![1.0, 2.0, 3.0]).unwrap();
        assert!(matches!(
            f.with_numeric("x", vec![1.0, 2.0, 3.0]),
            Err(BacktestError::InvalidParameter(_))
        ));
    }

    #[test]
    fn frame_rejects_unsorted_timestamps() {
        let mut ts = weeks(3);
        ts.swap(0, 2);
        assert!(CovariateFrame::new(ts).is_err());
    }

    #[test]
    fn categorical_levels_are_sorted_and_distinct() {
        let f = frame();
        assert_eq!(
            f.levels("promo").unwrap(),
            &["none".to_string(), "radio".to_string(), "tv".to_string()]
        );
        assert!(f.levels("temperature").is_none());
        assert_eq!(f.names().collect::<Vec<_>>(), vec!["promo", "temperature"]);
    }

    #[test]
    fn align_names_first_missing_timestamp() {
        let f = frame();
        let mut requested = weeks(4);
        let missing = requested[3] + Duration::weeks(1);
        requested.push(missing);

        assert_eq!(f.aligned_prefix(&requested), vec![0, 1, 2, 3]);
        assert_eq!(
            f.align(&requested).unwrap_err(),
            BacktestError::CovariateAlignment {
                timestamp: missing,
                location: None,
            }
        );
        assert_eq!(f.align(&weeks(2)).unwrap(), vec![0, 1]);
    }

    #[test]
    fn window_reads_selected_rows() {
        let f = frame();
        let rows = [1, 3];
        let w = f.window(&rows);

        assert_eq!(w.len(), 2);
        assert_eq!(w.numeric("temperature").unwrap(), vec![12.0, 15.0]);
        assert_eq!(w.categorical("promo").unwrap(), vec!["tv", "tv"]);
        assert_eq!(w.timestamps().collect::<Vec<_>>(), vec![weeks(4)[1], weeks(4)[3]]);
        assert!(matches!(
            w.numeric("promo"),
            Err(BacktestError::InvalidParameter(_))
        ));
        assert_eq!(
            w.numeric("price").unwrap_err(),
            BacktestError::UnknownCovariate("price".to_string())
        );
    }

    #[test]
    fn design_one_hot_encodes_categoricals() {
        let f = frame();
        let rows = [0, 1, 2];
        let design = f.window(&rows).design();

        assert_eq!(design.len(), 3);
        assert_eq!(design["temperature"], vec![10.0, 12.0, 9.0]);
        assert_eq!(design["promo=radio"], vec![0.0, 0.0, 1.0]);
        assert_eq!(design["promo=tv"], vec![0.0, 1.0, 0.0]);
        assert!(!design.contains_key("promo=none"));
    }
}

//! Per-offset error accumulation and the resulting score table.

use crate::backtest::Aggregation;
use std::collections::BTreeMap;

/// Error of one fold at one horizon offset.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct FoldError {
    pub fold: usize,
    /// 1-based horizon offset.
    pub offset: usize,
    pub error: f64,
}

/// Append-only collection of fold errors.
///
/// Aggregation sorts records by offset and fold before reducing, so the
/// resulting table does not depend on the order folds were recorded in.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ErrorAccumulator {
    records: Vec<FoldError>,
}

impl ErrorAccumulator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record the errors of one fold, offsets starting at 1.
    pub fn with_fold(mut self, fold: usize, errors: &[f64]) -> Self {
        self.push_fold(fold, errors);
        self
    }

    pub fn push_fold(&mut self, fold: usize, errors: &[f64]) {
        self.records
            .extend(errors.iter().enumerate().map(|(i, &error)| FoldError {
                fold,
                offset: i + 1,
                error,
            }));
    }

    /// Merge another accumulator, e.g. one filled by a different worker.
    pub fn merge(mut self, other: ErrorAccumulator) -> Self {
        self.records.extend(other.records);
        self
    }

    pub fn records(&self) -> &[FoldError] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Group by offset and reduce each group.
    pub fn into_score_table(self, aggregation: Aggregation) -> ScoreTable {
        let mut groups: BTreeMap<usize, Vec<(usize, f64)>> = BTreeMap::new();
        for r in self.records {
            groups.entry(r.offset).or_default().push((r.fold, r.error));
        }

        let entries = groups
            .into_iter()
            .map(|(offset, mut group)| {
                group.sort_by_key(|&(fold, _)| fold);
                let errors: Vec<f64> = group.into_iter().map(|(_, e)| e).collect();
                ScoreEntry {
                    offset,
                    value: aggregation.reduce(&errors),
                    observations: errors.len(),
                }
            })
            .collect();

        ScoreTable {
            aggregation,
            entries,
        }
    }
}

/// Aggregated error at one horizon offset.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ScoreEntry {
    pub offset: usize,
    pub value: f64,
    /// Number of folds contributing to `value`.
    pub observations: usize,
}

/// Aggregated error per horizon offset, ordered by offset.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ScoreTable {
    aggregation: Aggregation,
    entries: Vec<ScoreEntry>,
}

impl ScoreTable {
    pub fn aggregation(&self) -> Aggregation {
        self.aggregation
    }

    /// Score at a 1-based horizon offset.
    pub fn get(&self, offset: usize) -> Option<f64> {
        self.entry(offset).map(|e| e.value)
    }

    pub fn observations(&self, offset: usize) -> Option<usize> {
        self.entry(offset).map(|e| e.observations)
    }

    fn entry(&self, offset: usize) -> Option<&ScoreEntry> {
        self.entries
            .binary_search_by_key(&offset, |e| e.offset)
            .ok()
            .map(|i| &self.entries[i])
    }

    pub fn entries(&self) -> &[ScoreEntry] {
        &self.entries
    }

    /// Scores in offset order.
    pub fn values(&self) -> Vec<f64> {
        self.entries.iter().map(|e| e.value).collect()
    }

    /// Number of horizon offsets.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn groups_by_offset_and_averages() {
        let table = ErrorAccumulator::new()
            .with_fold(0, &[2.0, 1.0, 5.0])
            .with_fold(1, &[4.0, 3.0, 7.0])
            .into_score_table(Aggregation::Mean);

        assert_eq!(table.len(), 3);
        assert_relative_eq!(table.get(1).unwrap(), 3.0);
        assert_relative_eq!(table.get(2).unwrap(), 2.0);
        assert_relative_eq!(table.get(3).unwrap(), 6.0);
        assert_eq!(table.observations(1), Some(2));
        assert_eq!(table.get(0), None);
        assert_eq!(table.get(4), None);
        assert_eq!(table.aggregation(), Aggregation::Mean);
    }

    #[test]
    fn recording_order_does_not_change_table() {
        let errors = [
            vec![0.1, 0.7, 1e16],
            vec![0.2, 0.3, 1.0],
            vec![0.3, 1e-9, -1e16],
        ];

        let mut forward = ErrorAccumulator::new();
        for (fold, e) in errors.iter().enumerate() {
            forward.push_fold(fold, e);
        }
        let mut backward = ErrorAccumulator::new();
        for (fold, e) in errors.iter().enumerate().rev() {
            backward.push_fold(fold, e);
        }

        let a = forward.into_score_table(Aggregation::Mean);
        let b = backward.into_score_table(Aggregation::Mean);
        for (x, y) in a.values().iter().zip(b.values()) {
            assert_eq!(x.to_bits(), y.to_bits());
        }
    }

    #[test]
    fn merge_combines_partitions() {
        let left = ErrorAccumulator::new().with_fold(0, &[1.0]);
        let right = ErrorAccumulator::new().with_fold(1, &[3.0]);
        let merged = right.merge(left);
        assert_eq!(merged.len(), 2);
        assert_eq!(merged.into_score_table(Aggregation::Max).get(1), Some(3.0));
    }

    #[test]
    fn empty_accumulator_gives_empty_table() {
        let acc = ErrorAccumulator::new();
        assert!(acc.is_empty());
        assert!(acc.into_score_table(Aggregation::Mean).is_empty());
    }
}

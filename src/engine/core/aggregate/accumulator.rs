use std::collections::HashSet;

use ahash::RandomState as AHashRandomState;

use crate::engine::core::aggregate::group_key::GroupValue;

/// Running statistics for one measure, in fixed-point minor units.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct MeasureState {
    sum: i128,
    non_null: i64,
    min: Option<i64>,
    max: Option<i64>,
}

impl MeasureState {
    /// A NULL value leaves every statistic untouched.
    #[inline]
    pub fn update(&mut self, value: Option<i64>) {
        let Some(v) = value else {
            return;
        };
        self.sum += i128::from(v);
        self.non_null += 1;
        match self.min {
            Some(cur) if v >= cur => {}
            _ => self.min = Some(v),
        }
        match self.max {
            Some(cur) if v <= cur => {}
            _ => self.max = Some(v),
        }
    }

    #[inline]
    pub fn merge(&mut self, other: &MeasureState) {
        self.sum += other.sum;
        self.non_null += other.non_null;
        self.min = match (self.min, other.min) {
            (Some(a), Some(b)) => Some(a.min(b)),
            (a, b) => a.or(b),
        };
        self.max = match (self.max, other.max) {
            (Some(a), Some(b)) => Some(a.max(b)),
            (a, b) => a.or(b),
        };
    }

    pub fn non_null(&self) -> i64 {
        self.non_null
    }

    pub fn sum(&self) -> Option<i128> {
        (self.non_null > 0).then_some(self.sum)
    }

    /// `sum / non_null`, or `None` when no row carried a value.
    pub fn avg(&self) -> Option<f64> {
        if self.non_null == 0 {
            return None;
        }
        Some(self.sum as f64 / self.non_null as f64)
    }

    pub fn min(&self) -> Option<i64> {
        self.min
    }

    pub fn max(&self) -> Option<i64> {
        self.max
    }
}

/// What one input row adds to every group it fans out to. Computed once per
/// row, then applied to each of the row's grouping-set keys.
#[derive(Clone, Debug, PartialEq)]
pub struct RowContribution {
    pub(crate) measures: Vec<Option<i64>>,
    pub(crate) distinct: Vec<Option<GroupValue>>,
}

impl RowContribution {
    pub fn new(measures: Vec<Option<i64>>, distinct: Vec<Option<GroupValue>>) -> Self {
        Self { measures, distinct }
    }
}

/// Per-group running state: row count, per-measure statistics and
/// distinct-value sets.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Accumulator {
    count: i64,
    measures: Vec<MeasureState>,
    distinct: Vec<HashSet<GroupValue, AHashRandomState>>,
}

impl Accumulator {
    pub fn new(measure_count: usize, distinct_count: usize) -> Self {
        Self {
            count: 0,
            measures: vec![MeasureState::default(); measure_count],
            distinct: vec![HashSet::with_hasher(AHashRandomState::new()); distinct_count],
        }
    }

    #[inline]
    pub fn absorb(&mut self, row: &RowContribution) {
        self.count += 1;
        for (state, value) in self.measures.iter_mut().zip(row.measures.iter()) {
            state.update(*value);
        }
        for (set, value) in self.distinct.iter_mut().zip(row.distinct.iter()) {
            if let Some(v) = value {
                if !set.contains(v) {
                    set.insert(v.clone());
                }
            }
        }
    }

    /// Folds another partial accumulator of the same shape into this one.
    pub fn merge(&mut self, other: Accumulator) {
        self.count += other.count;
        for (a, b) in self.measures.iter_mut().zip(other.measures.iter()) {
            a.merge(b);
        }
        for (a, mut b) in self.distinct.iter_mut().zip(other.distinct) {
            if b.len() > a.len() {
                std::mem::swap(a, &mut b);
            }
            a.extend(b);
        }
    }

    pub fn count(&self) -> i64 {
        self.count
    }

    pub fn measure(&self, position: usize) -> Option<&MeasureState> {
        self.measures.get(position)
    }

    pub fn measures(&self) -> &[MeasureState] {
        &self.measures
    }

    pub fn distinct_count(&self, position: usize) -> usize {
        self.distinct.get(position).map(HashSet::len).unwrap_or(0)
    }
}

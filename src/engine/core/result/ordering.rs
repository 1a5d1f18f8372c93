use std::cmp::Ordering;

use serde::Deserialize;

use crate::engine::core::aggregate::{AggregateRef, BoundAggregate};
use crate::engine::core::filter::Probe;

/// Placement of NULL and aggregated-away values in a sort.
///
/// The aggregated sentinel always sits at the outer edge: with `Last` the
/// order is values, NULL, aggregated; with `First` it is aggregated, NULL,
/// values. Placement does not flip with the sort direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NullOrder {
    First,
    #[default]
    Last,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortDirection {
    #[default]
    Asc,
    Desc,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OrderKey {
    Dimension(String),
    Aggregate(AggregateRef),
    /// Quantile bucket assigned by ranking
    Bucket,
}

impl OrderKey {
    pub fn dimension(name: &str) -> Self {
        OrderKey::Dimension(name.to_string())
    }

    pub fn aggregate(&self) -> Option<&AggregateRef> {
        match self {
            OrderKey::Aggregate(agg) => Some(agg),
            _ => None,
        }
    }
}

impl From<AggregateRef> for OrderKey {
    fn from(agg: AggregateRef) -> Self {
        OrderKey::Aggregate(agg)
    }
}

impl From<&str> for OrderKey {
    fn from(name: &str) -> Self {
        OrderKey::Dimension(name.to_string())
    }
}

/// One ORDER BY term. `nulls: None` uses the configured default.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderSpec {
    pub key: OrderKey,
    pub direction: SortDirection,
    pub nulls: Option<NullOrder>,
}

impl OrderSpec {
    pub fn asc(key: impl Into<OrderKey>) -> Self {
        Self {
            key: key.into(),
            direction: SortDirection::Asc,
            nulls: None,
        }
    }

    pub fn desc(key: impl Into<OrderKey>) -> Self {
        Self {
            key: key.into(),
            direction: SortDirection::Desc,
            nulls: None,
        }
    }

    pub fn nulls_first(mut self) -> Self {
        self.nulls = Some(NullOrder::First);
        self
    }

    pub fn nulls_last(mut self) -> Self {
        self.nulls = Some(NullOrder::Last);
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BoundOrderKey {
    SetIndex,
    Slot(usize),
    Aggregate(BoundAggregate),
    Bucket,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BoundOrder {
    pub key: BoundOrderKey,
    pub direction: SortDirection,
    pub nulls: NullOrder,
}

impl BoundOrder {
    pub fn asc(key: BoundOrderKey, nulls: NullOrder) -> Self {
        Self {
            key,
            direction: SortDirection::Asc,
            nulls,
        }
    }
}

fn edge_rank(probe: &Probe<'_>, nulls: NullOrder) -> u8 {
    match (probe, nulls) {
        (Probe::Value(_), NullOrder::Last) => 0,
        (Probe::Null, _) => 1,
        (Probe::Aggregated, NullOrder::Last) => 2,
        (Probe::Aggregated, NullOrder::First) => 0,
        (Probe::Value(_), NullOrder::First) => 2,
    }
}

/// Orders two cells under one sort term.
pub fn compare_probes(
    a: &Probe<'_>,
    b: &Probe<'_>,
    direction: SortDirection,
    nulls: NullOrder,
) -> Ordering {
    match (a, b) {
        (Probe::Value(x), Probe::Value(y)) => {
            let ord = x.compare(y).unwrap_or(Ordering::Equal);
            match direction {
                SortDirection::Asc => ord,
                SortDirection::Desc => ord.reverse(),
            }
        }
        _ => edge_rank(a, nulls).cmp(&edge_rank(b, nulls)),
    }
}

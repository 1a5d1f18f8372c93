use std::fmt;

use crate::engine::core::aggregate::accumulator::Accumulator;
use crate::engine::types::{LogicalType, ScalarValue};

/// Derived value read from a group's accumulator, as named by callers
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum AggregateRef {
    /// COUNT(*)
    Count,
    /// COUNT(measure): rows where the measure is present
    CountNonNull(String),
    Sum(String),
    Avg(String),
    Min(String),
    Max(String),
    /// COUNT(DISTINCT attribute)
    CountDistinct(String),
}

impl AggregateRef {
    pub fn sum(measure: &str) -> Self {
        AggregateRef::Sum(measure.to_string())
    }

    pub fn avg(measure: &str) -> Self {
        AggregateRef::Avg(measure.to_string())
    }

    pub fn min(measure: &str) -> Self {
        AggregateRef::Min(measure.to_string())
    }

    pub fn max(measure: &str) -> Self {
        AggregateRef::Max(measure.to_string())
    }

    pub fn count_non_null(measure: &str) -> Self {
        AggregateRef::CountNonNull(measure.to_string())
    }

    pub fn count_distinct(attribute: &str) -> Self {
        AggregateRef::CountDistinct(attribute.to_string())
    }

    /// Output column name, e.g. `avg_rating`
    pub fn label(&self) -> String {
        match self {
            AggregateRef::Count => "count".to_string(),
            AggregateRef::CountNonNull(m) => format!("count_{}", m),
            AggregateRef::Sum(m) => format!("sum_{}", m),
            AggregateRef::Avg(m) => format!("avg_{}", m),
            AggregateRef::Min(m) => format!("min_{}", m),
            AggregateRef::Max(m) => format!("max_{}", m),
            AggregateRef::CountDistinct(a) => format!("count_distinct_{}", a),
        }
    }
}

impl fmt::Display for AggregateRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AggregateRef::Count => f.write_str("COUNT(*)"),
            AggregateRef::CountNonNull(m) => write!(f, "COUNT({m})"),
            AggregateRef::Sum(m) => write!(f, "SUM({m})"),
            AggregateRef::Avg(m) => write!(f, "AVG({m})"),
            AggregateRef::Min(m) => write!(f, "MIN({m})"),
            AggregateRef::Max(m) => write!(f, "MAX({m})"),
            AggregateRef::CountDistinct(a) => write!(f, "COUNT(DISTINCT {a})"),
        }
    }
}

/// An `AggregateRef` resolved against a plan's measure and distinct positions
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BoundAggregate {
    Count,
    CountNonNull { measure: usize },
    Sum { measure: usize, scale: u32 },
    Avg { measure: usize, scale: u32 },
    Min { measure: usize, scale: u32 },
    Max { measure: usize, scale: u32 },
    CountDistinct { distinct: usize },
}

impl BoundAggregate {
    pub fn logical_type(&self) -> LogicalType {
        match self {
            BoundAggregate::Count
            | BoundAggregate::CountNonNull { .. }
            | BoundAggregate::CountDistinct { .. } => LogicalType::Integer,
            _ => LogicalType::Float,
        }
    }

    /// Reads the derived value; `Null` when the measure had no values.
    pub fn read(&self, acc: &Accumulator) -> ScalarValue {
        match *self {
            BoundAggregate::Count => ScalarValue::Int64(acc.count()),
            BoundAggregate::CountNonNull { measure } => {
                ScalarValue::Int64(acc.measure(measure).map(|m| m.non_null()).unwrap_or(0))
            }
            BoundAggregate::Sum { measure, scale } => acc
                .measure(measure)
                .and_then(|m| m.sum())
                .map(|s| unscale(s as f64, scale))
                .into(),
            BoundAggregate::Avg { measure, scale } => acc
                .measure(measure)
                .and_then(|m| m.avg())
                .map(|a| unscale(a, scale))
                .into(),
            BoundAggregate::Min { measure, scale } => acc
                .measure(measure)
                .and_then(|m| m.min())
                .map(|v| unscale(v as f64, scale))
                .into(),
            BoundAggregate::Max { measure, scale } => acc
                .measure(measure)
                .and_then(|m| m.max())
                .map(|v| unscale(v as f64, scale))
                .into(),
            BoundAggregate::CountDistinct { distinct } => {
                ScalarValue::Int64(acc.distinct_count(distinct) as i64)
            }
        }
    }
}

#[inline]
pub(crate) fn unscale(value: f64, scale: u32) -> f64 {
    if scale == 0 {
        value
    } else {
        value / 10f64.powi(scale as i32)
    }
}

use crate::engine::core::aggregate::accumulator::Accumulator;
use crate::engine::core::aggregate::agg_ref::{AggregateRef, BoundAggregate};
use crate::engine::core::aggregate::group_key::{GroupKey, KeySlot};
use crate::engine::core::aggregate::plan::{DimensionBinding, DistinctBinding, MeasureBinding};
use crate::engine::core::filter::{BindScope, BoundOperand, Probe, ValueSource};
use crate::engine::errors::ConfigurationError;
use crate::engine::schema::RowSchema;
use crate::engine::types::LogicalType;

/// Binding scope of HAVING, ranking and ordering: grouping dimensions plus
/// the aggregates the plan tracks.
pub struct GroupScope<'a> {
    pub(crate) schema: &'a RowSchema,
    pub(crate) dimensions: &'a [DimensionBinding],
    pub(crate) measures: &'a [MeasureBinding],
    pub(crate) distinct: &'a [DistinctBinding],
}

impl GroupScope<'_> {
    pub fn dimension_index(&self, name: &str) -> Result<usize, ConfigurationError> {
        match self.dimensions.iter().position(|d| d.name == name) {
            Some(i) => Ok(i),
            None if self.schema.column_index(name).is_some() => {
                Err(ConfigurationError::NotGrouped(name.to_string()))
            }
            None => Err(ConfigurationError::UnknownAttribute(name.to_string())),
        }
    }

    fn measure(&self, name: &str) -> Result<(usize, u32), ConfigurationError> {
        self.measures
            .iter()
            .position(|m| m.name == name)
            .map(|i| (i, self.measures[i].scale))
            .ok_or_else(|| match self.schema.measure_position(name) {
                Err(e) => e,
                Ok(_) => ConfigurationError::UnknownMeasure(name.to_string()),
            })
    }

    pub fn resolve_aggregate(&self, agg: &AggregateRef) -> Result<BoundAggregate, ConfigurationError> {
        let bound = match agg {
            AggregateRef::Count => BoundAggregate::Count,
            AggregateRef::CountNonNull(m) => BoundAggregate::CountNonNull {
                measure: self.measure(m)?.0,
            },
            AggregateRef::Sum(m) => {
                let (measure, scale) = self.measure(m)?;
                BoundAggregate::Sum { measure, scale }
            }
            AggregateRef::Avg(m) => {
                let (measure, scale) = self.measure(m)?;
                BoundAggregate::Avg { measure, scale }
            }
            AggregateRef::Min(m) => {
                let (measure, scale) = self.measure(m)?;
                BoundAggregate::Min { measure, scale }
            }
            AggregateRef::Max(m) => {
                let (measure, scale) = self.measure(m)?;
                BoundAggregate::Max { measure, scale }
            }
            AggregateRef::CountDistinct(a) => BoundAggregate::CountDistinct {
                distinct: self
                    .distinct
                    .iter()
                    .position(|d| &d.name == a)
                    .ok_or_else(|| ConfigurationError::UnknownAttribute(a.clone()))?,
            },
        };
        Ok(bound)
    }
}

impl BindScope for GroupScope<'_> {
    fn bind_field(&self, name: &str) -> Result<(BoundOperand, LogicalType), ConfigurationError> {
        let idx = self.dimension_index(name)?;
        Ok((BoundOperand::Slot(idx), self.dimensions[idx].logical_type))
    }

    fn bind_aggregate(
        &self,
        agg: &AggregateRef,
    ) -> Result<(BoundOperand, LogicalType), ConfigurationError> {
        let bound = self.resolve_aggregate(agg)?;
        Ok((BoundOperand::Aggregate(bound), bound.logical_type()))
    }

    fn bind_total(&self, name: &str) -> Result<usize, ConfigurationError> {
        self.dimension_index(name)
    }
}

/// A finished group as seen by HAVING and the result sort.
#[derive(Clone, Copy)]
pub struct GroupView<'a> {
    pub key: &'a GroupKey,
    pub acc: &'a Accumulator,
}

impl<'a> GroupView<'a> {
    pub fn new(key: &'a GroupKey, acc: &'a Accumulator) -> Self {
        Self { key, acc }
    }
}

pub(crate) fn slot_probe(slot: Option<&KeySlot>) -> Probe<'static> {
    match slot {
        Some(KeySlot::Value(v)) => Probe::owned(v.to_scalar()),
        Some(KeySlot::Aggregated) => Probe::Aggregated,
        Some(KeySlot::Null) | None => Probe::Null,
    }
}

impl ValueSource for GroupView<'_> {
    fn probe(&self, operand: &BoundOperand) -> Probe<'_> {
        match operand {
            BoundOperand::Slot(i) => slot_probe(self.key.slot(*i)),
            BoundOperand::Aggregate(agg) => Probe::owned(agg.read(self.acc)),
            BoundOperand::Column(_) => Probe::Null,
        }
    }
}

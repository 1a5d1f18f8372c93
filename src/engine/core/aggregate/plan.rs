use tracing::debug;

use crate::engine::core::aggregate::accumulator::{Accumulator, RowContribution};
use crate::engine::core::aggregate::agg_ref::{AggregateRef, BoundAggregate};
use crate::engine::core::aggregate::fanout::KeyFanout;
use crate::engine::core::aggregate::group_key::{GroupKey, GroupValue, KeySlot};
use crate::engine::core::aggregate::group_scope::GroupScope;
use crate::engine::core::aggregate::grouping_set::GroupingSets;
use crate::engine::core::filter::{CompiledPredicate, RowScope};
use crate::engine::core::rank::Ranker;
use crate::engine::core::result::{BoundOrder, BoundOrderKey, OrderKey, OrderSpec};
use crate::engine::errors::{ConfigurationError, EngineError};
use crate::engine::query::{AggregateRequest, EngineOptions};
use crate::engine::schema::{Row, RowSchema};
use crate::engine::types::LogicalType;
use crate::shared::datetime::{DateGranularity, bucket_of};

/// A grouping dimension resolved to its source column.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DimensionBinding {
    pub name: String,
    pub column: usize,
    /// Set for derived date-bucket dimensions
    pub bucket: Option<DateGranularity>,
    pub logical_type: LogicalType,
}

impl DimensionBinding {
    #[inline]
    pub fn resolve(&self, row: &Row) -> KeySlot {
        let value = row.value(self.column);
        match self.bucket {
            None => KeySlot::from_scalar(value),
            Some(granularity) => match value.as_date() {
                Some(d) => KeySlot::Value(GroupValue::Date(bucket_of(d, granularity))),
                None => KeySlot::Null,
            },
        }
    }
}

/// A tracked measure; `position` indexes the row's scaled measures.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MeasureBinding {
    pub name: String,
    pub position: usize,
    pub scale: u32,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DistinctBinding {
    pub name: String,
    pub column: usize,
}

#[derive(Debug, Clone, PartialEq)]
pub struct RankingPlan {
    pub aggregate: BoundAggregate,
    pub ranker: Ranker,
}

/// A validated, fully bound aggregation query. Built once before any row is
/// read; every configuration and type error surfaces here.
#[derive(Debug, Clone, PartialEq)]
pub struct AggregatePlan {
    dimensions: Vec<DimensionBinding>,
    sets: GroupingSets,
    measures: Vec<MeasureBinding>,
    distinct: Vec<DistinctBinding>,
    row_filter: Option<CompiledPredicate>,
    having: Option<CompiledPredicate>,
    ranking: Option<RankingPlan>,
    order: Vec<BoundOrder>,
    limit: Option<usize>,
}

impl AggregatePlan {
    pub fn new(
        schema: &RowSchema,
        request: &AggregateRequest,
        options: &EngineOptions,
    ) -> Result<Self, EngineError> {
        let sets = request.grouping.enumerate(options.max_dimensions)?;
        let dimensions = bind_dimensions(schema, request)?;
        let (measures, distinct) = bind_tracked(schema, request)?;

        let row_filter = request
            .filter
            .as_ref()
            .map(|p| CompiledPredicate::compile(p, &RowScope::new(schema)))
            .transpose()?;

        let scope = GroupScope {
            schema,
            dimensions: &dimensions,
            measures: &measures,
            distinct: &distinct,
        };

        let having = request
            .having
            .as_ref()
            .map(|p| CompiledPredicate::compile(p, &scope))
            .transpose()?;

        let ranking = match &request.ranking {
            Some(r) => Some(RankingPlan {
                ranker: Ranker::new(r.buckets)?,
                aggregate: scope.resolve_aggregate(&r.aggregate)?,
            }),
            None => None,
        };

        let order = bind_order(&scope, request, options, ranking.is_some())?;

        debug!(
            dimensions = dimensions.len(),
            grouping_sets = sets.len(),
            measures = measures.len(),
            distinct = distinct.len(),
            "Aggregate plan built"
        );

        Ok(Self {
            dimensions,
            sets,
            measures,
            distinct,
            row_filter,
            having,
            ranking,
            order,
            limit: request.limit,
        })
    }

    /// Row filter verdict; rows without a filter always pass.
    #[inline]
    pub fn accepts(&self, row: &Row) -> bool {
        self.row_filter.as_ref().is_none_or(|f| f.matches(row))
    }

    /// Everything the row adds to its groups, computed once per row.
    pub fn contribution(&self, row: &Row) -> RowContribution {
        let measures = self
            .measures
            .iter()
            .map(|m| row.scaled_measure(m.position))
            .collect();
        let distinct = self
            .distinct
            .iter()
            .map(|d| GroupValue::from_scalar(row.value(d.column)))
            .collect();
        RowContribution::new(measures, distinct)
    }

    /// One `(set_index, key)` per grouping set for this row.
    pub fn fanout(&self, row: &Row) -> KeyFanout<'_> {
        let slots = self.dimensions.iter().map(|d| d.resolve(row)).collect();
        KeyFanout::new(self.sets.as_slice(), slots)
    }

    pub fn new_accumulator(&self) -> Accumulator {
        Accumulator::new(self.measures.len(), self.distinct.len())
    }

    pub fn set_index_of(&self, key: &GroupKey) -> Option<usize> {
        self.sets.index_of_mask(key.grouped_mask())
    }

    pub fn dimensions(&self) -> &[DimensionBinding] {
        &self.dimensions
    }

    pub fn dimension_names(&self) -> Vec<String> {
        self.dimensions.iter().map(|d| d.name.clone()).collect()
    }

    pub fn sets(&self) -> &GroupingSets {
        &self.sets
    }

    pub fn measures(&self) -> &[MeasureBinding] {
        &self.measures
    }

    pub fn distinct(&self) -> &[DistinctBinding] {
        &self.distinct
    }

    pub fn having(&self) -> Option<&CompiledPredicate> {
        self.having.as_ref()
    }

    pub fn ranking(&self) -> Option<&RankingPlan> {
        self.ranking.as_ref()
    }

    pub fn order(&self) -> &[BoundOrder] {
        &self.order
    }

    pub fn limit(&self) -> Option<usize> {
        self.limit
    }
}

fn bind_dimensions(
    schema: &RowSchema,
    request: &AggregateRequest,
) -> Result<Vec<DimensionBinding>, ConfigurationError> {
    let mut out = Vec::with_capacity(request.grouping.dimensions().len());
    for name in request.grouping.dimensions() {
        let bucket = request.date_buckets.iter().find(|b| &b.name == name);
        let binding = match bucket {
            Some(spec) => {
                let column = schema
                    .column_index(&spec.source)
                    .ok_or_else(|| ConfigurationError::UnknownAttribute(spec.source.clone()))?;
                let is_date = schema
                    .column(column)
                    .is_some_and(|(_, def)| def.logical_type == LogicalType::Date);
                if !is_date {
                    return Err(ConfigurationError::DateBucketOnNonDate(spec.source.clone()));
                }
                DimensionBinding {
                    name: name.clone(),
                    column,
                    bucket: Some(spec.granularity),
                    logical_type: LogicalType::Date,
                }
            }
            None => {
                let (column, def) = schema
                    .column_index(name)
                    .and_then(|i| schema.column(i).map(|(_, def)| (i, def)))
                    .ok_or_else(|| ConfigurationError::UnknownAttribute(name.clone()))?;
                if !def.logical_type.is_groupable() {
                    return Err(ConfigurationError::NotGroupable {
                        attribute: name.clone(),
                        logical_type: def.logical_type,
                    });
                }
                DimensionBinding {
                    name: name.clone(),
                    column,
                    bucket: None,
                    logical_type: def.logical_type,
                }
            }
        };
        out.push(binding);
    }
    Ok(out)
}

fn bind_tracked(
    schema: &RowSchema,
    request: &AggregateRequest,
) -> Result<(Vec<MeasureBinding>, Vec<DistinctBinding>), ConfigurationError> {
    let mut measure_names: Vec<String> = if request.measures.is_empty() {
        (0..schema.measure_count())
            .filter_map(|p| schema.measure_at(p).map(|(_, name, _)| name.to_string()))
            .collect()
    } else {
        request.measures.clone()
    };
    let mut distinct_names = request.distinct.clone();

    for agg in request.referenced_aggregates() {
        match agg {
            AggregateRef::Count => {}
            AggregateRef::CountDistinct(a) => distinct_names.push(a.clone()),
            AggregateRef::CountNonNull(m)
            | AggregateRef::Sum(m)
            | AggregateRef::Avg(m)
            | AggregateRef::Min(m)
            | AggregateRef::Max(m) => measure_names.push(m.clone()),
        }
    }

    let mut measures: Vec<MeasureBinding> = Vec::with_capacity(measure_names.len());
    for name in measure_names {
        if measures.iter().any(|m| m.name == name) {
            continue;
        }
        let position = schema.measure_position(&name)?;
        let scale = schema.measure_at(position).map(|(_, _, def)| def.scale).unwrap_or(0);
        measures.push(MeasureBinding {
            name,
            position,
            scale,
        });
    }

    let mut distinct: Vec<DistinctBinding> = Vec::with_capacity(distinct_names.len());
    for name in distinct_names {
        if distinct.iter().any(|d| d.name == name) {
            continue;
        }
        let column = schema
            .column_index(&name)
            .ok_or_else(|| ConfigurationError::UnknownAttribute(name.clone()))?;
        if let Some((_, def)) = schema.column(column) {
            if !def.logical_type.is_groupable() {
                return Err(ConfigurationError::NotGroupable {
                    attribute: name,
                    logical_type: def.logical_type,
                });
            }
        }
        distinct.push(DistinctBinding { name, column });
    }

    Ok((measures, distinct))
}

fn bind_order(
    scope: &GroupScope<'_>,
    request: &AggregateRequest,
    options: &EngineOptions,
    has_ranking: bool,
) -> Result<Vec<BoundOrder>, ConfigurationError> {
    let default_nulls = options.display.null_order;
    if request.order_by.is_empty() {
        let mut order = vec![BoundOrder::asc(BoundOrderKey::SetIndex, default_nulls)];
        order.extend(
            (0..scope.dimensions.len())
                .map(|i| BoundOrder::asc(BoundOrderKey::Slot(i), default_nulls)),
        );
        return Ok(order);
    }

    request
        .order_by
        .iter()
        .map(|spec: &OrderSpec| {
            let key = match &spec.key {
                OrderKey::Dimension(name) => BoundOrderKey::Slot(scope.dimension_index(name)?),
                OrderKey::Aggregate(agg) => BoundOrderKey::Aggregate(scope.resolve_aggregate(agg)?),
                OrderKey::Bucket if has_ranking => BoundOrderKey::Bucket,
                OrderKey::Bucket => {
                    return Err(ConfigurationError::UnknownAttribute("bucket".to_string()));
                }
            };
            Ok(BoundOrder {
                key,
                direction: spec.direction,
                nulls: spec.nulls.unwrap_or(default_nulls),
            })
        })
        .collect()
}

use crate::engine::core::aggregate::{AggregateRef, GroupingSetSpec};
use crate::engine::core::filter::{Operand, Predicate};
use crate::engine::core::result::OrderSpec;
use crate::shared::datetime::DateGranularity;

/// Declares a derived dimension: the calendar bucket of a date column.
#[derive(Debug, Clone, PartialEq)]
pub struct DateBucketSpec {
    pub name: String,
    pub source: String,
    pub granularity: DateGranularity,
}

/// NTILE over one aggregate, partitioned by grouping set.
#[derive(Debug, Clone, PartialEq)]
pub struct RankingRequest {
    pub aggregate: AggregateRef,
    pub buckets: usize,
}

/// Everything a caller configures for one aggregation query.
///
/// When no measure is named, every measure of the row schema is tracked.
/// Measures and distinct counters referenced only from HAVING, ranking or
/// ordering are tracked implicitly.
#[derive(Debug, Clone, PartialEq)]
pub struct AggregateRequest {
    pub grouping: GroupingSetSpec,
    pub measures: Vec<String>,
    pub distinct: Vec<String>,
    pub date_buckets: Vec<DateBucketSpec>,
    pub filter: Option<Predicate>,
    pub having: Option<Predicate>,
    pub ranking: Option<RankingRequest>,
    pub order_by: Vec<OrderSpec>,
    pub limit: Option<usize>,
}

impl AggregateRequest {
    pub fn new(grouping: GroupingSetSpec) -> Self {
        Self {
            grouping,
            measures: Vec::new(),
            distinct: Vec::new(),
            date_buckets: Vec::new(),
            filter: None,
            having: None,
            ranking: None,
            order_by: Vec::new(),
            limit: None,
        }
    }

    pub fn measure(mut self, name: &str) -> Self {
        self.measures.push(name.to_string());
        self
    }

    pub fn count_distinct(mut self, attribute: &str) -> Self {
        self.distinct.push(attribute.to_string());
        self
    }

    /// Makes `name` usable as a grouping dimension holding the
    /// `granularity` bucket start of `source`.
    pub fn date_bucket(mut self, name: &str, source: &str, granularity: DateGranularity) -> Self {
        self.date_buckets.push(DateBucketSpec {
            name: name.to_string(),
            source: source.to_string(),
            granularity,
        });
        self
    }

    pub fn filter(mut self, predicate: Predicate) -> Self {
        self.filter = Some(predicate);
        self
    }

    pub fn having(mut self, predicate: Predicate) -> Self {
        self.having = Some(predicate);
        self
    }

    pub fn rank_by(mut self, aggregate: AggregateRef, buckets: usize) -> Self {
        self.ranking = Some(RankingRequest { aggregate, buckets });
        self
    }

    pub fn order_by(mut self, spec: OrderSpec) -> Self {
        self.order_by.push(spec);
        self
    }

    pub fn limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }

    /// Every aggregate the request reads after grouping.
    pub(crate) fn referenced_aggregates(&self) -> Vec<&AggregateRef> {
        let mut out = Vec::new();
        if let Some(having) = &self.having {
            collect_aggregates(having, &mut out);
        }
        if let Some(ranking) = &self.ranking {
            out.push(&ranking.aggregate);
        }
        for spec in &self.order_by {
            if let Some(agg) = spec.key.aggregate() {
                out.push(agg);
            }
        }
        out
    }
}

fn collect_aggregates<'a>(predicate: &'a Predicate, out: &mut Vec<&'a AggregateRef>) {
    match predicate {
        Predicate::Compare { operand, .. }
        | Predicate::Between { operand, .. }
        | Predicate::InList { operand, .. }
        | Predicate::IsNull(operand)
        | Predicate::IsNotNull(operand) => {
            if let Operand::Aggregate(agg) = operand {
                out.push(agg);
            }
        }
        Predicate::IsTotal(_) | Predicate::DateRange { .. } => {}
        Predicate::And(children) | Predicate::Or(children) => {
            for child in children {
                collect_aggregates(child, out);
            }
        }
        Predicate::Not(inner) => collect_aggregates(inner, out),
    }
}

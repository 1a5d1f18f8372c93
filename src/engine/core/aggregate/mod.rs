pub mod accumulator;
pub mod agg_ref;
pub mod fanout;
pub mod group_key;
pub mod group_scope;
pub mod grouping_set;
pub mod partial;
pub mod plan;
pub mod sink;

pub use accumulator::{Accumulator, MeasureState, RowContribution};
pub use agg_ref::{AggregateRef, BoundAggregate};
pub use fanout::KeyFanout;
pub use group_key::{GroupKey, GroupValue, KeySlot};
pub use group_scope::{GroupScope, GroupView};
pub use grouping_set::{
    GroupingMode, GroupingSet, GroupingSetSpec, GroupingSets, MAX_GROUPING_DIMENSIONS,
};
pub use partial::AggPartial;
pub use plan::{AggregatePlan, DimensionBinding, DistinctBinding, MeasureBinding, RankingPlan};
pub use sink::AggregateSink;

#[cfg(test)]
mod grouping_set_test;
#[cfg(test)]
mod sink_test;

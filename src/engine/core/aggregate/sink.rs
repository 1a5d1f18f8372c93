use tracing::debug;

use crate::engine::core::aggregate::partial::AggPartial;
use crate::engine::core::aggregate::plan::AggregatePlan;
use crate::engine::schema::Row;

/// Single-partition aggregation state. Each worker owns one sink; nothing in
/// here is shared across threads.
pub struct AggregateSink<'a> {
    plan: &'a AggregatePlan,
    partial: AggPartial,
}

impl<'a> AggregateSink<'a> {
    pub fn new(plan: &'a AggregatePlan) -> Self {
        Self {
            plan,
            partial: AggPartial::new(),
        }
    }

    /// Applies the row filter, then adds the row to one accumulator per grouping set.
    #[inline]
    pub fn consume(&mut self, row: &Row) {
        if !self.plan.accepts(row) {
            return;
        }
        self.partial.record_row();

        let contribution = self.plan.contribution(row);
        for (_, key) in self.plan.fanout(row) {
            self.partial
                .entry(key)
                .or_insert_with(|| self.plan.new_accumulator())
                .absorb(&contribution);
        }
    }

    pub fn consume_batch(&mut self, rows: &[Row]) {
        for row in rows {
            self.consume(row);
        }
    }

    pub fn group_count(&self) -> usize {
        self.partial.len()
    }

    pub fn into_partial(self) -> AggPartial {
        debug!(
            groups = self.partial.len(),
            rows = self.partial.rows_seen(),
            "Partition aggregation finished"
        );
        self.partial
    }
}

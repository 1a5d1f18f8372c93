use std::time::Instant;

use rayon::prelude::*;
use tracing::{debug, info, warn};

use crate::engine::core::aggregate::{AggPartial, AggregatePlan, AggregateSink};
use crate::engine::core::result::{ResultAssembler, ResultSet};
use crate::engine::errors::EngineError;
use crate::engine::query::context::QueryContext;
use crate::engine::query::options::EngineOptions;
use crate::engine::query::request::AggregateRequest;
use crate::engine::schema::{Row, RowSchema};

/// Entry point for aggregation queries.
///
/// `execute` partitions a materialized row slice across rayon workers, each
/// with its own group map, and merges the partials by value once every
/// partition has finished. `execute_stream` aggregates an iterator on the
/// calling thread. Both check cancellation between batches and discard all
/// partial state when cancelled.
#[derive(Debug, Clone, Default)]
pub struct AggregationEngine {
    options: EngineOptions,
}

impl AggregationEngine {
    pub fn new(options: EngineOptions) -> Self {
        Self { options }
    }

    pub fn from_app_config() -> Self {
        Self::new(EngineOptions::from_app_config())
    }

    pub fn options(&self) -> &EngineOptions {
        &self.options
    }

    /// Validates and binds a request. All configuration and type errors
    /// surface here, before any row is read.
    pub fn prepare(
        &self,
        schema: &RowSchema,
        request: &AggregateRequest,
    ) -> Result<AggregatePlan, EngineError> {
        AggregatePlan::new(schema, request, &self.options).inspect_err(|e| e.log_error())
    }

    pub fn execute(
        &self,
        schema: &RowSchema,
        request: &AggregateRequest,
        rows: &[Row],
        ctx: &QueryContext,
    ) -> Result<ResultSet, EngineError> {
        let plan = self.prepare(schema, request)?;
        let started = Instant::now();
        let partial = self.aggregate(&plan, rows, ctx)?;
        let result = self.finish(&plan, partial, ctx)?;
        info!(
            rows = rows.len(),
            groups = result.len(),
            elapsed_ms = started.elapsed().as_millis() as u64,
            "Aggregation query completed"
        );
        Ok(result)
    }

    pub fn execute_stream<I>(
        &self,
        schema: &RowSchema,
        request: &AggregateRequest,
        rows: I,
        ctx: &QueryContext,
    ) -> Result<ResultSet, EngineError>
    where
        I: IntoIterator<Item = Result<Row, EngineError>>,
    {
        let plan = self.prepare(schema, request)?;
        let started = Instant::now();
        let partial = self.aggregate_stream(&plan, rows, ctx)?;
        let seen = partial.rows_seen();
        let result = self.finish(&plan, partial, ctx)?;
        info!(
            rows = seen,
            groups = result.len(),
            elapsed_ms = started.elapsed().as_millis() as u64,
            "Streaming aggregation query completed"
        );
        Ok(result)
    }

    /// Partial phase plus merge over a materialized slice.
    pub fn aggregate(
        &self,
        plan: &AggregatePlan,
        rows: &[Row],
        ctx: &QueryContext,
    ) -> Result<AggPartial, EngineError> {
        let partitions = self.partition_count();
        let chunk = rows.len().div_ceil(partitions).max(1);
        let batch = self.options.batch_size.max(1);
        debug!(
            rows = rows.len(),
            partitions,
            chunk,
            grouping_sets = plan.sets().len(),
            "Starting partitioned aggregation"
        );

        let partials = rows
            .par_chunks(chunk)
            .map(|partition| {
                let mut sink = AggregateSink::new(plan);
                for rows in partition.chunks(batch) {
                    ctx.check()?;
                    sink.consume_batch(rows);
                }
                Ok(sink.into_partial())
            })
            .collect::<Result<Vec<AggPartial>, EngineError>>()
            .inspect_err(|e| e.log_error())?;

        ctx.check().inspect_err(|e| e.log_error())?;
        let mut merged = AggPartial::new();
        for partial in partials {
            merged.merge(partial);
        }
        debug!(groups = merged.len(), "Partials merged");
        Ok(merged)
    }

    /// Partial phase over an iterator on the calling thread.
    pub fn aggregate_stream<I>(
        &self,
        plan: &AggregatePlan,
        rows: I,
        ctx: &QueryContext,
    ) -> Result<AggPartial, EngineError>
    where
        I: IntoIterator<Item = Result<Row, EngineError>>,
    {
        let batch = self.options.batch_size.max(1);
        let mut sink = AggregateSink::new(plan);
        for (i, row) in rows.into_iter().enumerate() {
            if i % batch == 0 {
                ctx.check().inspect_err(|e| e.log_error())?;
            }
            let row = row.inspect_err(|e| e.log_error())?;
            sink.consume(&row);
        }
        ctx.check().inspect_err(|e| e.log_error())?;
        Ok(sink.into_partial())
    }

    /// Synchronization point: HAVING, ranking, sort and rendering run on the
    /// fully merged map only.
    pub fn finish(
        &self,
        plan: &AggregatePlan,
        partial: AggPartial,
        ctx: &QueryContext,
    ) -> Result<ResultSet, EngineError> {
        if let Err(e) = ctx.check() {
            warn!(groups = partial.len(), "Cancelled before assembly");
            return Err(e);
        }
        Ok(ResultAssembler::new(plan, &self.options.display).assemble(partial))
    }

    fn partition_count(&self) -> usize {
        match self.options.worker_threads {
            0 => rayon::current_num_threads().max(1),
            n => n,
        }
    }
}

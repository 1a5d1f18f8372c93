use std::cmp::Ordering;
use std::collections::BTreeMap;

use tracing::debug;

use crate::engine::core::aggregate::agg_ref::unscale;
use crate::engine::core::aggregate::group_scope::slot_probe;
use crate::engine::core::aggregate::{
    Accumulator, AggPartial, AggregatePlan, GroupKey, GroupView, RankingPlan,
};
use crate::engine::core::filter::Probe;
use crate::engine::core::result::ordering::{BoundOrderKey, SortDirection, compare_probes};
use crate::engine::core::result::result_row::{MeasureSummary, ResultRow, ResultSet};
use crate::engine::query::DisplayOptions;
use crate::engine::types::ScalarValue;

struct GroupEntry {
    set_index: usize,
    key: GroupKey,
    acc: Accumulator,
    bucket: Option<usize>,
}

/// Turns the merged group map into ordered result rows: HAVING, ranking,
/// sort, limit, then rendering.
pub struct ResultAssembler<'a> {
    plan: &'a AggregatePlan,
    display: &'a DisplayOptions,
}

impl<'a> ResultAssembler<'a> {
    pub fn new(plan: &'a AggregatePlan, display: &'a DisplayOptions) -> Self {
        Self { plan, display }
    }

    pub fn assemble(&self, partial: AggPartial) -> ResultSet {
        let rows_aggregated = partial.rows_seen();
        let dimension_count = self.plan.dimensions().len();
        let mut groups = partial.into_groups();

        // The grand total exists even when no row survived the filter
        if self.plan.sets().index_of_mask(0).is_some() {
            groups
                .entry(GroupKey::grand_total(dimension_count))
                .or_insert_with(|| self.plan.new_accumulator());
        }

        let mut entries: Vec<GroupEntry> = groups
            .into_iter()
            .filter_map(|(key, acc)| {
                let set_index = self.plan.set_index_of(&key)?;
                Some(GroupEntry {
                    set_index,
                    key,
                    acc,
                    bucket: None,
                })
            })
            .collect();

        if let Some(having) = self.plan.having() {
            let before = entries.len();
            entries.retain(|e| having.matches(&GroupView::new(&e.key, &e.acc)));
            debug!(before, after = entries.len(), "HAVING applied");
        }

        if let Some(ranking) = self.plan.ranking() {
            assign_buckets(&mut entries, ranking);
        }

        entries.sort_by(|a, b| self.compare(a, b));

        if let Some(limit) = self.plan.limit() {
            entries.truncate(limit);
        }

        let rows = entries.into_iter().map(|e| self.render(e)).collect();
        ResultSet {
            dimensions: self.plan.dimension_names(),
            grouping_sets: self
                .plan
                .sets()
                .iter()
                .map(|set| {
                    set.members(dimension_count)
                        .map(|i| self.plan.dimensions()[i].name.clone())
                        .collect()
                })
                .collect(),
            rows,
            rows_aggregated,
            aggregated_marker: self.display.aggregated_marker.clone(),
        }
    }

    fn compare(&self, a: &GroupEntry, b: &GroupEntry) -> Ordering {
        for term in self.plan.order() {
            let ord = match term.key {
                BoundOrderKey::SetIndex => match term.direction {
                    SortDirection::Asc => a.set_index.cmp(&b.set_index),
                    SortDirection::Desc => b.set_index.cmp(&a.set_index),
                },
                BoundOrderKey::Slot(i) => compare_probes(
                    &slot_probe(a.key.slot(i)),
                    &slot_probe(b.key.slot(i)),
                    term.direction,
                    term.nulls,
                ),
                BoundOrderKey::Aggregate(agg) => compare_probes(
                    &Probe::owned(agg.read(&a.acc)),
                    &Probe::owned(agg.read(&b.acc)),
                    term.direction,
                    term.nulls,
                ),
                BoundOrderKey::Bucket => compare_probes(
                    &bucket_probe(a.bucket),
                    &bucket_probe(b.bucket),
                    term.direction,
                    term.nulls,
                ),
            };
            if ord != Ordering::Equal {
                return ord;
            }
        }
        a.set_index
            .cmp(&b.set_index)
            .then_with(|| a.key.cmp(&b.key))
    }

    fn render(&self, entry: GroupEntry) -> ResultRow {
        let dimension_count = self.plan.dimensions().len();
        let grouping_id = self
            .plan
            .sets()
            .get(entry.set_index)
            .map(|s| s.grouping_id(dimension_count))
            .unwrap_or(0);

        let dimensions = self
            .plan
            .dimensions()
            .iter()
            .zip(entry.key.slots().iter())
            .map(|(d, slot)| (d.name.clone(), slot.clone()))
            .collect();

        let measures = self
            .plan
            .measures()
            .iter()
            .zip(entry.acc.measures().iter())
            .map(|(binding, state)| {
                let scale = binding.scale;
                let summary = MeasureSummary {
                    non_null: state.non_null(),
                    sum: state.sum().map(|s| unscale(s as f64, scale)),
                    avg: state.avg().map(|a| unscale(a, scale)),
                    min: state.min().map(|v| unscale(v as f64, scale)),
                    max: state.max().map(|v| unscale(v as f64, scale)),
                };
                (binding.name.clone(), summary)
            })
            .collect();

        let distinct = self
            .plan
            .distinct()
            .iter()
            .enumerate()
            .map(|(i, d)| (d.name.clone(), entry.acc.distinct_count(i) as i64))
            .collect();

        ResultRow {
            set_index: entry.set_index,
            grouping_id,
            dimensions,
            count: entry.acc.count(),
            measures,
            distinct,
            bucket: entry.bucket,
        }
    }
}

fn bucket_probe(bucket: Option<usize>) -> Probe<'static> {
    match bucket {
        Some(b) => Probe::owned(ScalarValue::Int64(b as i64)),
        None => Probe::Null,
    }
}

/// NTILE partitioned by grouping set.
fn assign_buckets(entries: &mut [GroupEntry], ranking: &RankingPlan) {
    let assignments: Vec<(usize, usize)> = {
        let mut by_set: BTreeMap<usize, Vec<((&GroupKey, usize), Option<f64>)>> = BTreeMap::new();
        for (i, e) in entries.iter().enumerate() {
            let value = ranking.aggregate.read(&e.acc).as_f64();
            by_set.entry(e.set_index).or_default().push(((&e.key, i), value));
        }
        by_set
            .into_values()
            .flat_map(|members| ranking.ranker.assign(members))
            .map(|r| (r.entity.1, r.bucket))
            .collect()
    };
    for (i, bucket) in assignments {
        entries[i].bucket = Some(bucket);
    }
}

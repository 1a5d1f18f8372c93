use std::collections::HashMap;
use std::collections::hash_map::Entry;

use ahash::RandomState as AHashRandomState;

use crate::engine::core::aggregate::accumulator::Accumulator;
use crate::engine::core::aggregate::group_key::GroupKey;

pub type GroupMap = HashMap<GroupKey, Accumulator, AHashRandomState>;

/// Group map produced by one partition; owned outright and moved into the merge.
#[derive(Debug, Clone, Default)]
pub struct AggPartial {
    groups: GroupMap,
    rows_seen: u64,
}

impl PartialEq for AggPartial {
    fn eq(&self, other: &Self) -> bool {
        self.rows_seen == other.rows_seen && self.groups == other.groups
    }
}

impl AggPartial {
    pub fn new() -> Self {
        Self {
            groups: HashMap::with_hasher(AHashRandomState::new()),
            rows_seen: 0,
        }
    }

    /// Folds `other` into `self`. Counts and sums add, min/max combine and
    /// distinct sets union, so merge order never changes the result.
    pub fn merge(&mut self, mut other: AggPartial) {
        if other.groups.len() > self.groups.len() {
            std::mem::swap(&mut self.groups, &mut other.groups);
        }
        self.rows_seen += other.rows_seen;
        for (key, acc) in other.groups {
            match self.groups.get_mut(&key) {
                Some(existing) => existing.merge(acc),
                None => {
                    self.groups.insert(key, acc);
                }
            }
        }
    }

    pub(crate) fn entry(&mut self, key: GroupKey) -> Entry<'_, GroupKey, Accumulator> {
        self.groups.entry(key)
    }

    pub(crate) fn record_row(&mut self) {
        self.rows_seen += 1;
    }

    pub fn rows_seen(&self) -> u64 {
        self.rows_seen
    }

    pub fn len(&self) -> usize {
        self.groups.len()
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    pub fn get(&self, key: &GroupKey) -> Option<&Accumulator> {
        self.groups.get(key)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&GroupKey, &Accumulator)> {
        self.groups.iter()
    }

    pub fn into_groups(self) -> GroupMap {
        self.groups
    }
}

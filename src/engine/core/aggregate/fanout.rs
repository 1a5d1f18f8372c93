use crate::engine::core::aggregate::group_key::{GroupKey, KeySlot};
use crate::engine::core::aggregate::grouping_set::GroupingSet;

/// Lazy replication of one row across the grouping sets.
///
/// Yields `(set_index, key)` once per set, masking excluded slots with
/// `KeySlot::Aggregated`. Only one key is alive at a time; `restart` rewinds.
#[derive(Debug, Clone)]
pub struct KeyFanout<'a> {
    sets: &'a [GroupingSet],
    slots: Vec<KeySlot>,
    next: usize,
}

impl<'a> KeyFanout<'a> {
    pub fn new(sets: &'a [GroupingSet], slots: Vec<KeySlot>) -> Self {
        Self {
            sets,
            slots,
            next: 0,
        }
    }

    pub fn restart(&mut self) {
        self.next = 0;
    }

    /// Resolved slots of the row before masking
    pub fn slots(&self) -> &[KeySlot] {
        &self.slots
    }
}

impl Iterator for KeyFanout<'_> {
    type Item = (usize, GroupKey);

    fn next(&mut self) -> Option<Self::Item> {
        let set = self.sets.get(self.next)?;
        let index = self.next;
        self.next += 1;

        let masked = self
            .slots
            .iter()
            .enumerate()
            .map(|(i, slot)| {
                if set.contains(i) {
                    slot.clone()
                } else {
                    KeySlot::Aggregated
                }
            })
            .collect();
        Some((index, GroupKey::new(masked)))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.sets.len().saturating_sub(self.next);
        (remaining, Some(remaining))
    }
}

impl ExactSizeIterator for KeyFanout<'_> {}

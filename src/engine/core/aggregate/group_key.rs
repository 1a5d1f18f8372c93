use std::cmp::Ordering;
use std::fmt;
use std::hash::{BuildHasher, Hash, Hasher};

use ahash::RandomState as AHashRandomState;
use chrono::NaiveDate;

use crate::engine::types::ScalarValue;

/// Concrete, hashable value of a grouping attribute
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum GroupValue {
    Bool(bool),
    Int(i64),
    Str(String),
    Date(NaiveDate),
}

impl GroupValue {
    /// `None` for NULL. Floats are not groupable and the plan rejects them;
    /// if one slips through it keys by its textual form.
    pub fn from_scalar(value: &ScalarValue) -> Option<Self> {
        match value {
            ScalarValue::Null => None,
            ScalarValue::Boolean(b) => Some(GroupValue::Bool(*b)),
            ScalarValue::Int64(i) => Some(GroupValue::Int(*i)),
            ScalarValue::Float64(f) => Some(GroupValue::Str(f.to_string())),
            ScalarValue::Utf8(s) => Some(GroupValue::Str(s.clone())),
            ScalarValue::Date(d) => Some(GroupValue::Date(*d)),
        }
    }

    pub fn to_scalar(&self) -> ScalarValue {
        match self {
            GroupValue::Bool(b) => ScalarValue::Boolean(*b),
            GroupValue::Int(i) => ScalarValue::Int64(*i),
            GroupValue::Str(s) => ScalarValue::Utf8(s.clone()),
            GroupValue::Date(d) => ScalarValue::Date(*d),
        }
    }
}

impl fmt::Display for GroupValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GroupValue::Bool(b) => write!(f, "{b}"),
            GroupValue::Int(i) => write!(f, "{i}"),
            GroupValue::Str(s) => f.write_str(s),
            GroupValue::Date(d) => write!(f, "{}", d.format("%Y-%m-%d")),
        }
    }
}

/// One dimension slot of a group key.
///
/// `Null` is the attribute's own missing value; `Aggregated` means the
/// grouping set that produced the key rolled this attribute away. The two
/// are never interchangeable. Derived ordering puts values first, then
/// `Null`, then `Aggregated`.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum KeySlot {
    Value(GroupValue),
    Null,
    Aggregated,
}

impl KeySlot {
    pub fn from_scalar(value: &ScalarValue) -> Self {
        GroupValue::from_scalar(value)
            .map(KeySlot::Value)
            .unwrap_or(KeySlot::Null)
    }

    pub fn value(&self) -> Option<&GroupValue> {
        match self {
            KeySlot::Value(v) => Some(v),
            _ => None,
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, KeySlot::Null)
    }

    pub fn is_aggregated(&self) -> bool {
        matches!(self, KeySlot::Aggregated)
    }
}

#[derive(Clone, Debug, Eq)]
pub struct GroupKey {
    // Precomputed 64-bit hash; the fan-out builds several keys per row
    pub(crate) prehash: u64,
    pub(crate) slots: Vec<KeySlot>,
}

impl PartialEq for GroupKey {
    fn eq(&self, other: &Self) -> bool {
        self.slots == other.slots
    }
}

impl Hash for GroupKey {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.prehash.hash(state);
    }
}

impl PartialOrd for GroupKey {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for GroupKey {
    fn cmp(&self, other: &Self) -> Ordering {
        self.slots.cmp(&other.slots)
    }
}

impl GroupKey {
    pub fn new(slots: Vec<KeySlot>) -> Self {
        let prehash = Self::compute_prehash(&slots);
        Self { prehash, slots }
    }

    /// Key of the empty grouping set over `dimension_count` dimensions
    pub fn grand_total(dimension_count: usize) -> Self {
        Self::new(vec![KeySlot::Aggregated; dimension_count])
    }

    #[inline]
    fn compute_prehash(slots: &[KeySlot]) -> u64 {
        let mut hasher = AHashRandomState::with_seeds(0, 0, 0, 0).build_hasher();
        for s in slots {
            s.hash(&mut hasher);
        }
        hasher.finish()
    }

    pub fn slots(&self) -> &[KeySlot] {
        &self.slots
    }

    pub fn slot(&self, index: usize) -> Option<&KeySlot> {
        self.slots.get(index)
    }

    /// Mask of non-aggregated slots, matching `GroupingSet::mask`
    pub fn grouped_mask(&self) -> u32 {
        self.slots
            .iter()
            .enumerate()
            .filter(|(_, s)| !s.is_aggregated())
            .fold(0u32, |m, (i, _)| m | (1 << i))
    }
}

use indexmap::IndexMap;
use serde::Serialize;
use serde_json::{Map, Value as JsonValue, json};

use crate::engine::core::aggregate::KeySlot;

/// Derived statistics of one measure within one group, in measure units.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MeasureSummary {
    /// Rows where the measure was present
    pub non_null: i64,
    pub sum: Option<f64>,
    pub avg: Option<f64>,
    pub min: Option<f64>,
    pub max: Option<f64>,
}

/// One output group.
#[derive(Debug, Clone, PartialEq)]
pub struct ResultRow {
    /// Position of the producing grouping set in enumeration order
    pub set_index: usize,
    /// SQL `GROUPING_ID`: bit set per aggregated dimension, first dimension most significant
    pub grouping_id: u32,
    pub dimensions: IndexMap<String, KeySlot>,
    pub count: i64,
    pub measures: IndexMap<String, MeasureSummary>,
    pub distinct: IndexMap<String, i64>,
    pub bucket: Option<usize>,
}

impl ResultRow {
    pub fn dimension(&self, name: &str) -> Option<&KeySlot> {
        self.dimensions.get(name)
    }

    pub fn measure(&self, name: &str) -> Option<&MeasureSummary> {
        self.measures.get(name)
    }

    pub fn distinct_count(&self, name: &str) -> Option<i64> {
        self.distinct.get(name).copied()
    }

    pub fn is_grand_total(&self) -> bool {
        self.dimensions.values().all(KeySlot::is_aggregated)
    }

    /// Flat JSON object. Aggregated slots render as `marker`, domain NULLs as `null`.
    pub fn to_json(&self, marker: &str) -> JsonValue {
        let mut obj = Map::new();
        for (name, slot) in &self.dimensions {
            let value = match slot {
                KeySlot::Value(v) => v.to_scalar().to_json(),
                KeySlot::Null => JsonValue::Null,
                KeySlot::Aggregated => JsonValue::String(marker.to_string()),
            };
            obj.insert(name.clone(), value);
        }
        obj.insert("grouping_id".to_string(), json!(self.grouping_id));
        obj.insert("count".to_string(), json!(self.count));
        for (name, m) in &self.measures {
            obj.insert(format!("count_{name}"), json!(m.non_null));
            obj.insert(format!("sum_{name}"), json!(m.sum));
            obj.insert(format!("avg_{name}"), json!(m.avg));
            obj.insert(format!("min_{name}"), json!(m.min));
            obj.insert(format!("max_{name}"), json!(m.max));
        }
        for (name, n) in &self.distinct {
            obj.insert(format!("count_distinct_{name}"), json!(n));
        }
        if let Some(bucket) = self.bucket {
            obj.insert("bucket".to_string(), json!(bucket));
        }
        JsonValue::Object(obj)
    }
}

/// Ordered output of one query.
#[derive(Debug, Clone, PartialEq)]
pub struct ResultSet {
    pub dimensions: Vec<String>,
    /// Dimension names of each grouping set, in enumeration order
    pub grouping_sets: Vec<Vec<String>>,
    pub rows: Vec<ResultRow>,
    /// Input rows that passed the row filter
    pub rows_aggregated: u64,
    pub aggregated_marker: String,
}

impl ResultSet {
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &ResultRow> {
        self.rows.iter()
    }

    pub fn rows_for_set(&self, set_index: usize) -> impl Iterator<Item = &ResultRow> {
        self.rows.iter().filter(move |r| r.set_index == set_index)
    }

    pub fn grand_total(&self) -> Option<&ResultRow> {
        self.rows.iter().find(|r| r.is_grand_total())
    }

    /// Row whose dimension slots equal `slots`, in dimension order.
    pub fn group(&self, slots: &[KeySlot]) -> Option<&ResultRow> {
        self.rows
            .iter()
            .find(|r| r.dimensions.values().eq(slots.iter()))
    }

    pub fn to_json(&self) -> JsonValue {
        JsonValue::Array(
            self.rows
                .iter()
                .map(|r| r.to_json(&self.aggregated_marker))
                .collect(),
        )
    }

    pub fn into_rows(self) -> Vec<ResultRow> {
        self.rows
    }
}

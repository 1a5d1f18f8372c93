use indexmap::IndexMap;
use serde_json::json;

use crate::engine::core::aggregate::{GroupValue, KeySlot};
use crate::engine::core::result::{MeasureSummary, ResultRow, ResultSet};

fn row(country: KeySlot, genre: KeySlot, set_index: usize, grouping_id: u32) -> ResultRow {
    let mut dimensions = IndexMap::new();
    dimensions.insert("country".to_string(), country);
    dimensions.insert("genre".to_string(), genre);
    let mut measures = IndexMap::new();
    measures.insert(
        "rating".to_string(),
        MeasureSummary {
            non_null: 2,
            sum: Some(13.0),
            avg: Some(6.5),
            min: Some(5.0),
            max: Some(8.0),
        },
    );
    let mut distinct = IndexMap::new();
    distinct.insert("customer_id".to_string(), 2);
    ResultRow {
        set_index,
        grouping_id,
        dimensions,
        count: 3,
        measures,
        distinct,
        bucket: None,
    }
}

fn s(v: &str) -> KeySlot {
    KeySlot::Value(GroupValue::Str(v.to_string()))
}

#[test]
fn renders_marker_for_aggregated_and_null_for_missing() {
    let r = row(KeySlot::Null, KeySlot::Aggregated, 1, 1);
    let json = r.to_json("ALL");
    assert_eq!(json["country"], serde_json::Value::Null);
    assert_eq!(json["genre"], json!("ALL"));
    assert_eq!(json["grouping_id"], json!(1));
    assert_eq!(json["count"], json!(3));
    assert_eq!(json["avg_rating"], json!(6.5));
    assert_eq!(json["count_rating"], json!(2));
    assert_eq!(json["count_distinct_customer_id"], json!(2));
    assert!(json.get("bucket").is_none());
}

#[test]
fn absent_average_renders_as_null() {
    let mut r = row(s("US"), s("Drama"), 0, 0);
    r.measures.insert(
        "rating".to_string(),
        MeasureSummary {
            non_null: 0,
            sum: None,
            avg: None,
            min: None,
            max: None,
        },
    );
    r.bucket = Some(4);
    let json = r.to_json("TOTAL");
    assert_eq!(json["avg_rating"], serde_json::Value::Null);
    assert_eq!(json["bucket"], json!(4));
    assert_eq!(json["country"], json!("US"));
}

#[test]
fn measure_summary_serializes() {
    let summary = MeasureSummary {
        non_null: 1,
        sum: Some(2.5),
        avg: Some(2.5),
        min: Some(2.5),
        max: Some(2.5),
    };
    assert_eq!(
        serde_json::to_value(&summary).unwrap(),
        json!({"non_null": 1, "sum": 2.5, "avg": 2.5, "min": 2.5, "max": 2.5})
    );
}

#[test]
fn result_set_lookups() {
    let set = ResultSet {
        dimensions: vec!["country".into(), "genre".into()],
        grouping_sets: vec![
            vec!["country".into(), "genre".into()],
            vec!["country".into()],
            vec![],
        ],
        rows: vec![
            row(s("US"), s("Drama"), 0, 0),
            row(s("US"), KeySlot::Aggregated, 1, 1),
            row(KeySlot::Aggregated, KeySlot::Aggregated, 2, 3),
        ],
        rows_aggregated: 3,
        aggregated_marker: "TOTAL".into(),
    };

    assert_eq!(set.len(), 3);
    assert_eq!(set.grand_total().unwrap().set_index, 2);
    assert_eq!(set.rows_for_set(1).count(), 1);
    assert_eq!(set.group(&[s("US"), KeySlot::Aggregated]).unwrap().grouping_id, 1);
    assert!(set.group(&[s("FR"), KeySlot::Aggregated]).is_none());

    let json = set.to_json();
    assert_eq!(json.as_array().unwrap().len(), 3);
    assert_eq!(json[2]["country"], json!("TOTAL"));
}

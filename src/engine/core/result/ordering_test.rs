use std::cmp::Ordering;

use crate::engine::core::aggregate::AggregateRef;
use crate::engine::core::filter::Probe;
use crate::engine::core::result::{NullOrder, OrderKey, OrderSpec, SortDirection, compare_probes};
use crate::engine::types::ScalarValue;

fn v(x: i64) -> Probe<'static> {
    Probe::owned(ScalarValue::Int64(x))
}

fn sorted(mut cells: Vec<Probe<'static>>, direction: SortDirection, nulls: NullOrder) -> Vec<Probe<'static>> {
    cells.sort_by(|a, b| compare_probes(a, b, direction, nulls));
    cells
}

#[test]
fn nulls_last_puts_aggregated_outermost() {
    let cells = vec![Probe::Aggregated, v(2), Probe::Null, v(1)];
    assert_eq!(
        sorted(cells, SortDirection::Asc, NullOrder::Last),
        vec![v(1), v(2), Probe::Null, Probe::Aggregated]
    );
}

#[test]
fn nulls_first_puts_aggregated_outermost() {
    let cells = vec![v(1), Probe::Null, v(2), Probe::Aggregated];
    assert_eq!(
        sorted(cells, SortDirection::Asc, NullOrder::First),
        vec![Probe::Aggregated, Probe::Null, v(1), v(2)]
    );
}

#[test]
fn descending_flips_values_only() {
    let cells = vec![v(1), Probe::Aggregated, v(3), Probe::Null, v(2)];
    assert_eq!(
        sorted(cells, SortDirection::Desc, NullOrder::Last),
        vec![v(3), v(2), v(1), Probe::Null, Probe::Aggregated]
    );
}

#[test]
fn mixed_numeric_values_compare_numerically() {
    let a = Probe::owned(ScalarValue::Float64(2.5));
    let b = Probe::owned(ScalarValue::Int64(3));
    assert_eq!(
        compare_probes(&a, &b, SortDirection::Asc, NullOrder::Last),
        Ordering::Less
    );
}

#[test]
fn order_spec_builders() {
    let spec = OrderSpec::desc(AggregateRef::sum("price")).nulls_first();
    assert_eq!(spec.key, OrderKey::Aggregate(AggregateRef::sum("price")));
    assert_eq!(spec.direction, SortDirection::Desc);
    assert_eq!(spec.nulls, Some(NullOrder::First));

    let spec = OrderSpec::asc("country");
    assert_eq!(spec.key, OrderKey::dimension("country"));
    assert_eq!(spec.nulls, None);
}

#[test]
fn null_order_deserializes_lowercase() {
    let first: NullOrder = serde_json::from_str("\"first\"").unwrap();
    let last: NullOrder = serde_json::from_str("\"last\"").unwrap();
    assert_eq!(first, NullOrder::First);
    assert_eq!(last, NullOrder::Last);
    assert_eq!(NullOrder::default(), NullOrder::Last);
}

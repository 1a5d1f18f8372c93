use crate::engine::core::aggregate::group_key::{GroupKey, GroupValue, KeySlot};
use crate::engine::core::aggregate::plan::AggregatePlan;
use crate::engine::core::aggregate::sink::AggregateSink;
use crate::engine::core::filter::Operand;
use crate::engine::query::EngineOptions;
use crate::engine::schema::Row;
use crate::test_helpers::factories::{RentalFactory, RequestFactory, RowFactory, SchemaFactory};

fn plan(request: crate::engine::query::AggregateRequest) -> AggregatePlan {
    AggregatePlan::new(&SchemaFactory::rentals(), &request, &EngineOptions::default()).unwrap()
}

fn customer(id: i64) -> KeySlot {
    KeySlot::Value(GroupValue::Int(id))
}

#[test]
fn rollup_over_customers_matches_worked_example() {
    let plan = plan(RequestFactory::rollup(&["customer_id"]));
    let mut sink = AggregateSink::new(&plan);
    sink.consume_batch(&RentalFactory::customer_example());
    assert_eq!(sink.group_count(), 3);
    let partial = sink.into_partial();

    let c1 = partial.get(&GroupKey::new(vec![customer(1)])).unwrap();
    assert_eq!(c1.count(), 2);
    assert_eq!(c1.measure(0).unwrap().sum(), Some(500));
    assert_eq!(c1.measure(1).unwrap().avg(), Some(8.0));
    assert_eq!(c1.measure(1).unwrap().non_null(), 1);

    let c2 = partial.get(&GroupKey::new(vec![customer(2)])).unwrap();
    assert_eq!(c2.count(), 1);
    assert_eq!(c2.measure(0).unwrap().sum(), Some(100));

    let total = partial.get(&GroupKey::grand_total(1)).unwrap();
    assert_eq!(total.count(), 3);
    assert_eq!(total.measure(0).unwrap().sum(), Some(600));
    assert_eq!(total.measure(1).unwrap().avg(), Some(6.5));
}

#[test]
fn each_row_touches_one_accumulator_per_set() {
    let plan = plan(RequestFactory::cube(&["country", "genre", "gender"]));
    let mut sink = AggregateSink::new(&plan);
    sink.consume(&RowFactory::new().create());
    assert_eq!(sink.group_count(), 8);

    let partial = sink.into_partial();
    assert!(partial.iter().all(|(_, acc)| acc.count() == 1));
    assert_eq!(partial.rows_seen(), 1);
}

#[test]
fn filtered_rows_do_not_contribute() {
    let plan = plan(RequestFactory::rollup(&["country"]).filter(Operand::field("country").equals("US")));
    let rows: Vec<Row> = vec![
        RowFactory::new().with("country", "US").create(),
        RowFactory::new().with("country", "FR").create(),
        RowFactory::new().with("country", None::<String>).create(),
    ];
    let mut sink = AggregateSink::new(&plan);
    sink.consume_batch(&rows);
    let partial = sink.into_partial();

    assert_eq!(partial.rows_seen(), 1);
    assert_eq!(partial.get(&GroupKey::grand_total(1)).unwrap().count(), 1);
    assert!(
        partial
            .get(&GroupKey::new(vec![KeySlot::Value(GroupValue::Str("FR".into()))]))
            .is_none()
    );
}

#[test]
fn null_dimension_groups_apart_from_total() {
    let plan = plan(RequestFactory::rollup(&["country"]));
    let rows = vec![
        RowFactory::new().with("country", None::<String>).create(),
        RowFactory::new().with("country", None::<String>).create(),
        RowFactory::new().with("country", "US").create(),
    ];
    let mut sink = AggregateSink::new(&plan);
    sink.consume_batch(&rows);
    let partial = sink.into_partial();

    assert_eq!(partial.get(&GroupKey::new(vec![KeySlot::Null])).unwrap().count(), 2);
    assert_eq!(partial.get(&GroupKey::grand_total(1)).unwrap().count(), 3);
}

#[test]
fn aggregating_twice_is_bit_identical() {
    let plan = plan(RequestFactory::cube(&["country", "genre"]).count_distinct("customer_id"));
    let rows = RentalFactory::grid(&["US", "FR"], &["Drama", "Comedy", "Horror"], 4);

    let run = || {
        let mut sink = AggregateSink::new(&plan);
        sink.consume_batch(&rows);
        sink.into_partial()
    };
    assert_eq!(run(), run());
}

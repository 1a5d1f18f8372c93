use crate::engine::types::ScalarValue;
use crate::test_helpers::factories::{RentalFactory, SchemaFactory};

#[test]
fn grid_covers_every_cell() {
    let rows = RentalFactory::grid(&["US", "FR"], &["Drama", "Comedy"], 3);
    assert_eq!(rows.len(), 12);

    let schema = SchemaFactory::rentals();
    let country = schema.column_index("country").unwrap();
    let rating = schema.column_index("rating").unwrap();
    let fr = rows
        .iter()
        .filter(|r| r.value(country) == &ScalarValue::Utf8("FR".into()))
        .count();
    assert_eq!(fr, 6);
    assert_eq!(rows.iter().filter(|r| r.value(rating).is_null()).count(), 4);
}

#[test]
fn customer_example_has_one_missing_rating() {
    let rows = RentalFactory::customer_example();
    let rating = SchemaFactory::rentals().column_index("rating").unwrap();
    assert_eq!(rows.len(), 3);
    assert!(rows[1].value(rating).is_null());
}

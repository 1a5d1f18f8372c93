use crate::engine::types::ScalarValue;
use crate::test_helpers::factories::{RowFactory, SchemaFactory};

#[test]
fn overrides_defaults_by_name() {
    let row = RowFactory::new()
        .with("country", "FR")
        .with("price", 4.25)
        .create();
    let schema = SchemaFactory::rentals();
    assert_eq!(
        row.value(schema.column_index("country").unwrap()),
        &ScalarValue::Utf8("FR".into())
    );
    assert_eq!(
        row.value(schema.column_index("genre").unwrap()),
        &ScalarValue::Utf8("Drama".into())
    );
    assert_eq!(
        row.value(schema.column_index("price").unwrap()),
        &ScalarValue::Float64(4.25)
    );
}

#[test]
fn create_list_repeats_the_row() {
    let rows = RowFactory::new().with("rental_id", 7).create_list(3);
    assert_eq!(rows.len(), 3);
    assert!(rows.iter().all(|r| r == &rows[0]));
}

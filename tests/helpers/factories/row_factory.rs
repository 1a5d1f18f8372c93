use chrono::NaiveDate;
use indexmap::IndexMap;

use crate::engine::schema::{Row, RowSchema};
use crate::engine::types::ScalarValue;
use crate::test_helpers::factories::SchemaFactory;

/// Builds rental rows with sensible defaults; override with `with`.
pub struct RowFactory {
    schema: RowSchema,
    params: IndexMap<String, ScalarValue>,
}

impl RowFactory {
    pub fn new() -> Self {
        Self::for_schema(SchemaFactory::rentals())
    }

    pub fn for_schema(schema: RowSchema) -> Self {
        let mut params = IndexMap::new();
        let defaults: [(&str, ScalarValue); 12] = [
            ("rental_id", 1.into()),
            ("customer_id", 1.into()),
            ("movie_id", 1.into()),
            ("rental_date", NaiveDate::from_ymd_opt(2024, 1, 15).unwrap().into()),
            ("country", "US".into()),
            ("gender", "F".into()),
            ("birth_decade", 1980.into()),
            ("genre", "Drama".into()),
            ("year_of_release", 2010.into()),
            ("price_tier", "standard".into()),
            ("price", 2.5.into()),
            ("rating", 7.into()),
        ];
        for (name, value) in defaults {
            if schema.column_index(name).is_some() {
                params.insert(name.to_string(), value);
            }
        }
        Self { schema, params }
    }

    pub fn with(mut self, key: &str, value: impl Into<ScalarValue>) -> Self {
        self.params.insert(key.to_string(), value.into());
        self
    }

    pub fn create(self) -> Row {
        self.params
            .iter()
            .fold(self.schema.row(), |b, (k, v)| b.set(k, v.clone()))
            .build()
            .unwrap()
    }

    /// `count` rows with consecutive rental ids starting at 1
    pub fn create_list(self, count: usize) -> Vec<Row> {
        (0..count)
            .map(|i| {
                let mut params = self.params.clone();
                params.insert("rental_id".to_string(), ScalarValue::Int64(i as i64 + 1));
                params
                    .iter()
                    .fold(self.schema.row(), |b, (k, v)| b.set(k, v.clone()))
                    .build()
                    .unwrap()
            })
            .collect()
    }
}

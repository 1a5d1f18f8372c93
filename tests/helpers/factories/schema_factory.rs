use crate::engine::schema::RowSchema;
use crate::engine::source::{JoinMode, RentalSource};
use crate::engine::types::LogicalType;

pub struct SchemaFactory;

impl SchemaFactory {
    /// Denormalized rental schema under a strict join
    pub fn rentals() -> RowSchema {
        RentalSource::rental_schema(JoinMode::Strict)
    }

    pub fn rentals_left() -> RowSchema {
        RentalSource::rental_schema(JoinMode::Left)
    }

    /// Small schema with a float attribute, for groupability checks
    pub fn with_float_attribute() -> RowSchema {
        RowSchema::builder()
            .attribute("country", LogicalType::String)
            .attribute("discount", LogicalType::Float)
            .measure("price", LogicalType::Float, 2, false)
            .build()
            .unwrap()
    }
}

pub mod rental_factory;
pub mod request_factory;
pub mod row_factory;
pub mod schema_factory;

pub use rental_factory::RentalFactory;
pub use request_factory::RequestFactory;
pub use row_factory::RowFactory;
pub use schema_factory::SchemaFactory;

#[cfg(test)]
mod rental_factory_test;
#[cfg(test)]
mod row_factory_test;

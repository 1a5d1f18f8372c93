pub mod core;
pub mod errors;
pub mod query;
pub mod schema;
pub mod source;
pub mod types;

pub use errors::*;

use thiserror::Error;
use tracing::{debug, error, warn};

use crate::engine::types::LogicalType;

/// Top-level error returned by plan preparation and execution.
#[derive(Debug, Error)]
pub enum EngineError {
    #[error("Configuration error: {0}")]
    Configuration(#[from] ConfigurationError),

    #[error("Type error: {0}")]
    Type(#[from] TypeError),

    #[error("Referential error: {0}")]
    Referential(#[from] ReferentialError),

    #[error("Query cancelled")]
    Cancelled,
}

/// Invalid grouping request or schema declaration.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigurationError {
    #[error("grouping requires at least one dimension")]
    EmptyDimensions,

    #[error("{count} grouping dimensions exceed the limit of {max}")]
    TooManyDimensions { count: usize, max: usize },

    #[error("dimension listed more than once: {0}")]
    DuplicateDimension(String),

    #[error("column declared more than once: {0}")]
    DuplicateColumn(String),

    #[error("unknown attribute: {0}")]
    UnknownAttribute(String),

    #[error("unknown measure: {0}")]
    UnknownMeasure(String),

    #[error("column {0} is not a measure")]
    NotAMeasure(String),

    #[error("measure {name} must be numeric, found {found}")]
    NonNumericMeasure { name: String, found: LogicalType },

    #[error("attribute {attribute} of type {logical_type} cannot be grouped on")]
    NotGroupable {
        attribute: String,
        logical_type: LogicalType,
    },

    #[error("grouping set references attribute outside the dimension list: {0}")]
    ForeignSubset(String),

    #[error("grouping set listed more than once: {0:?}")]
    DuplicateSubset(Vec<String>),

    #[error("explicit grouping requires at least one grouping set")]
    EmptyExplicitSets,

    #[error("bucket count must be at least 1")]
    InvalidBucketCount,

    #[error("date bucket source {0} is not a date attribute")]
    DateBucketOnNonDate(String),

    #[error("aggregate {0} is not allowed in a row filter")]
    AggregateInRowFilter(String),

    #[error("attribute {0} is not a grouping dimension")]
    NotGrouped(String),
}

/// A predicate or row value disagrees with the declared column types.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum TypeError {
    #[error("cannot compare {operand} ({left}) with {right}")]
    IncompatibleComparison {
        operand: String,
        left: LogicalType,
        right: LogicalType,
    },

    #[error("IN list for {0} is empty")]
    EmptyInList(String),

    #[error("range on {0} has its lower bound above its upper bound")]
    InvalidRange(String),

    #[error("measure {measure} is declared non-nullable but the row has no value")]
    NullMeasure { measure: String },

    #[error("value {value} of measure {measure} does not fit at its declared scale")]
    MeasureOutOfRange { measure: String, value: String },

    #[error("rating {rating} of rental {rental_id} is outside 1..=10")]
    RatingOutOfRange { rental_id: u64, rating: u8 },

    #[error("value for column {column} has type {found}, expected {expected}")]
    ColumnType {
        column: String,
        expected: LogicalType,
        found: LogicalType,
    },
}

/// Raised by the row source when a strict join finds no dimension row.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ReferentialError {
    #[error("rental {rental_id} references unknown customer {customer_id}")]
    MissingCustomer { rental_id: u64, customer_id: u64 },

    #[error("rental {rental_id} references unknown movie {movie_id}")]
    MissingMovie { rental_id: u64, movie_id: u64 },

    #[error("rental id {0} appears more than once")]
    DuplicateRental(u64),
}

impl EngineError {
    pub fn log_error(&self) {
        match self {
            EngineError::Configuration(e) => {
                error!("Invalid query configuration: {}", e);
                debug!("Configuration error details: {:?}", e);
            }
            EngineError::Type(e) => {
                error!("Type error: {}", e);
                debug!("Type error details: {:?}", e);
            }
            EngineError::Referential(e) => {
                error!("Row source rejected a row: {}", e);
                debug!("Referential error details: {:?}", e);
            }
            EngineError::Cancelled => {
                warn!("Query was cancelled");
                debug!("Partial aggregation state discarded");
            }
        }
    }
}

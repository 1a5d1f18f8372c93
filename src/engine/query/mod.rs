pub mod context;
pub mod executor;
pub mod options;
pub mod request;

pub use context::{CancellationToken, QueryContext};
pub use executor::AggregationEngine;
pub use options::{DisplayOptions, EngineOptions};
pub use request::{AggregateRequest, DateBucketSpec, RankingRequest};

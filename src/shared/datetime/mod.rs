pub mod date_bucketing;

pub use date_bucketing::{DateGranularity, bucket_of};

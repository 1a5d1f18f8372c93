pub mod aggregate;
pub mod filter;
pub mod rank;
pub mod result;

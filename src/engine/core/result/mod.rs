pub mod assembler;
pub mod ordering;
pub mod result_row;

pub use assembler::ResultAssembler;
pub use ordering::{
    BoundOrder, BoundOrderKey, NullOrder, OrderKey, OrderSpec, SortDirection, compare_probes,
};
pub use result_row::{MeasureSummary, ResultRow, ResultSet};

#[cfg(test)]
mod ordering_test;
#[cfg(test)]
mod result_row_test;

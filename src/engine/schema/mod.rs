mod row;
mod row_schema;

pub use row::{Row, RowBuilder};
pub use row_schema::{ColumnDef, ColumnRole, MeasureDef, RowSchema, RowSchemaBuilder};

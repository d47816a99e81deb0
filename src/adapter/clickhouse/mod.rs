pub mod row;
pub mod schema;
pub mod sink;

pub use schema::{ColumnSchema, ColumnSpec, ColumnType};
pub use sink::ClickHouseSink;

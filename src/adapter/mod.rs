pub mod clickhouse;
pub mod json_file;

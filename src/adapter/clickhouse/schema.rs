use crate::error::PipelineError;
use std::collections::HashSet;

/// Storage type of a declared usage column. Values land in the table's
/// `fields Map(String, String)` column, so the type mainly drives validation
/// and DDL for data-skipping indexes.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ColumnType {
    String,
    Int64,
    Float64,
    Bool,
    DateTime,
}

impl std::str::FromStr for ColumnType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "string" => Ok(ColumnType::String),
            "int64" | "int" => Ok(ColumnType::Int64),
            "float64" | "float" => Ok(ColumnType::Float64),
            "bool" | "boolean" => Ok(ColumnType::Bool),
            "datetime" => Ok(ColumnType::DateTime),
            other => Err(format!("Unknown column type: {other}")),
        }
    }
}

/// One declared usage column: which event property it captures and how.
#[derive(Clone, Debug)]
pub struct ColumnSpec {
    pub name: String,
    pub data_type: ColumnType,
    pub allow_null: bool,
    pub max_length: Option<usize>,
    pub indexed: bool,
}

impl ColumnSpec {
    #[must_use]
    pub fn string(name: &str) -> Self {
        Self {
            name: name.to_string(),
            data_type: ColumnType::String,
            allow_null: false,
            max_length: None,
            indexed: false,
        }
    }

    #[must_use]
    pub fn nullable(mut self) -> Self {
        self.allow_null = true;
        self
    }

    #[must_use]
    pub fn with_max_length(mut self, max_length: usize) -> Self {
        self.max_length = Some(max_length);
        self
    }

    #[must_use]
    pub fn indexed(mut self) -> Self {
        self.indexed = true;
        self
    }
}

/// Ordered set of declared usage columns.
///
/// Every event property persisted by the ClickHouse sink must be declared
/// here; undeclared properties are dropped (and traced), never silently
/// truncated into the table.
#[derive(Clone, Debug)]
pub struct ColumnSchema {
    columns: Vec<ColumnSpec>,
}

/// Column names are interpolated into DDL, so they must be plain
/// identifiers — anything else is a malformed sink parameter.
fn validate_column_name(name: &str) -> Result<(), PipelineError> {
    let mut chars = name.chars();
    let head_ok = chars
        .next()
        .is_some_and(|c| c.is_ascii_alphabetic() || c == '_');
    if !head_ok || !chars.all(|c| c.is_ascii_alphanumeric() || c == '_') {
        return Err(PipelineError::Config(format!(
            "Invalid column name: {name:?}"
        )));
    }
    Ok(())
}

impl ColumnSchema {
    /// Builds a schema, rejecting malformed or duplicate column names.
    pub fn new(columns: Vec<ColumnSpec>) -> Result<Self, PipelineError> {
        let mut seen = HashSet::new();
        for column in &columns {
            validate_column_name(&column.name)?;
            if !seen.insert(column.name.as_str()) {
                return Err(PipelineError::Config(format!(
                    "Duplicate column name: {}",
                    column.name
                )));
            }
        }
        Ok(Self { columns })
    }

    /// The original usage-log column set.
    #[must_use]
    pub fn default_usage() -> Self {
        Self {
            columns: vec![
                ColumnSpec::string("UsageName")
                    .with_max_length(200)
                    .indexed(),
                ColumnSpec::string("ActionName"),
                ColumnSpec::string("MachineName"),
                ColumnSpec::string("ClientIP").nullable(),
            ],
        }
    }

    #[must_use]
    pub fn columns(&self) -> &[ColumnSpec] {
        &self.columns
    }

    #[must_use]
    pub fn get(&self, name: &str) -> Option<&ColumnSpec> {
        self.columns.iter().find(|c| c.name == name)
    }

    /// `CREATE TABLE IF NOT EXISTS` DDL for the usage table. Declared
    /// columns are stored in the `fields` map; indexed columns get a
    /// bloom-filter data-skipping index over their map entry.
    #[must_use]
    pub fn create_table_ddl(&self, table: &str) -> String {
        let mut ddl = format!(
            "CREATE TABLE IF NOT EXISTS {table} (\n\
             \x20   timestamp DateTime64(3, 'UTC'),\n\
             \x20   level Int8,\n\
             \x20   message String,\n\
             \x20   exception String,\n\
             \x20   event String,\n\
             \x20   fields Map(String, String)"
        );
        for column in self.columns.iter().filter(|c| c.indexed) {
            ddl.push_str(&format!(
                ",\n    INDEX idx_{name} fields['{name}'] TYPE bloom_filter GRANULARITY 4",
                name = column.name
            ));
        }
        ddl.push_str("\n) ENGINE = MergeTree ORDER BY timestamp");
        ddl
    }
}

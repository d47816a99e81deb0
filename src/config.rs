use std::env;
use std::fs;

use serde::Deserialize;

use crate::adapter::clickhouse::{ColumnSchema, ColumnSpec, ColumnType};
use crate::domain::Level;
use crate::error::PipelineError;

/// Declarative column definition, usually supplied as JSON through
/// `APP_USAGE_COLUMNS`.
#[derive(Debug, Clone, Deserialize)]
pub struct ColumnSettings {
    pub name: String,
    #[serde(default)]
    pub allow_null: bool,
    #[serde(default = "default_column_type")]
    pub data_type: String,
    #[serde(default)]
    pub max_length: Option<usize>,
    #[serde(default)]
    pub indexed: bool,
}

fn default_column_type() -> String {
    "string".to_string()
}

impl TryFrom<&ColumnSettings> for ColumnSpec {
    type Error = PipelineError;

    fn try_from(settings: &ColumnSettings) -> Result<Self, Self::Error> {
        let data_type = settings
            .data_type
            .parse::<ColumnType>()
            .map_err(PipelineError::Config)?;
        Ok(ColumnSpec {
            name: settings.name.clone(),
            data_type,
            allow_null: settings.allow_null,
            max_length: settings.max_length,
            indexed: settings.indexed,
        })
    }
}

#[derive(Debug)]
pub struct Settings {
    pub application_name: String,
    pub application_version: Option<String>,
    /// Events below this level are never enriched or routed.
    pub minimum_level: Level,
    /// Per-source overrides, matched by `SourceContext` prefix.
    pub level_overrides: Vec<(String, Level)>,
    pub clickhouse_host: String,
    pub clickhouse_port: u16,
    pub clickhouse_user: String,
    pub clickhouse_password: String,
    pub clickhouse_database: String,
    pub usage_table: String,
    pub auto_create_table: bool,
    pub usage_columns: Vec<ColumnSettings>,
    /// Base path of the ND-JSON diagnostics files.
    pub diagnostics_path: String,
}

impl Settings {
    /// Validates the settings and returns an error if invalid.
    pub fn validate(&self) -> Result<(), PipelineError> {
        if self.application_name.trim().is_empty() {
            return Err(PipelineError::Config(
                "Application name cannot be empty".into(),
            ));
        }
        validate_host(&self.clickhouse_host)?;
        validate_port(self.clickhouse_port)?;
        validate_identifier(&self.usage_table)?;
        if self.diagnostics_path.trim().is_empty() {
            return Err(PipelineError::Config(
                "Diagnostics path cannot be empty".into(),
            ));
        }
        Ok(())
    }

    /// The declared column schema, falling back to the original usage-log
    /// column set when no columns are configured.
    pub fn column_schema(&self) -> Result<ColumnSchema, PipelineError> {
        if self.usage_columns.is_empty() {
            return Ok(ColumnSchema::default_usage());
        }
        let columns = self
            .usage_columns
            .iter()
            .map(ColumnSpec::try_from)
            .collect::<Result<Vec<_>, _>>()?;
        ColumnSchema::new(columns)
    }
}

/// Validates that the host is not empty or whitespace-only.
fn validate_host(host: &str) -> Result<(), PipelineError> {
    if host.trim().is_empty() {
        return Err(PipelineError::Config("Host cannot be empty".into()));
    }
    Ok(())
}

/// Validates that the port is in valid range (1-65535).
fn validate_port(port: u16) -> Result<(), PipelineError> {
    if port == 0 {
        return Err(PipelineError::Config("Port cannot be 0".into()));
    }
    Ok(())
}

/// Validates a SQL identifier (table name).
fn validate_identifier(name: &str) -> Result<(), PipelineError> {
    let mut chars = name.chars();
    let head_ok = chars
        .next()
        .is_some_and(|c| c.is_ascii_alphabetic() || c == '_');
    if !head_ok || !chars.all(|c| c.is_ascii_alphanumeric() || c == '_') {
        return Err(PipelineError::Config(format!(
            "Invalid table name: {name:?}"
        )));
    }
    Ok(())
}

/// Read a value from environment variable, with support for _FILE suffix
/// (Docker Secrets). Credentials are always injected this way, never
/// embedded in code or checked-in configuration.
fn get_env_or_file(env_name: &str) -> Result<String, Box<dyn std::error::Error>> {
    // First check for _FILE suffix (Docker Secrets support)
    let file_env = format!("{env_name}_FILE");
    if let Ok(file_path) = env::var(&file_env) {
        match fs::read_to_string(&file_path) {
            Ok(content) => return Ok(content.trim().to_string()),
            Err(e) => return Err(format!("Failed to read {file_env}: {e}").into()),
        }
    }

    // Fallback to standard environment variable
    env::var(env_name).map_err(|_| {
        format!("Missing required environment variable: {env_name} or {file_env}").into()
    })
}

/// Parses boolean settings, accepting the usual spellings
/// case-insensitively and rejecting anything else.
fn parse_bool(raw: &str) -> Result<bool, String> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "true" | "1" | "yes" | "on" => Ok(true),
        "false" | "0" | "no" | "off" => Ok(false),
        other => Err(format!("Invalid boolean value: {other}")),
    }
}

/// Parses `"source=level,source2=level2"` override lists.
fn parse_level_overrides(raw: &str) -> Result<Vec<(String, Level)>, Box<dyn std::error::Error>> {
    let mut overrides = Vec::new();
    for entry in raw.split(',').filter(|s| !s.trim().is_empty()) {
        let (source, level) = entry
            .split_once('=')
            .ok_or_else(|| format!("Malformed level override: {entry}"))?;
        overrides.push((source.trim().to_string(), level.parse::<Level>()?));
    }
    Ok(overrides)
}

pub fn get_configuration() -> Result<Settings, Box<dyn std::error::Error>> {
    let application_name = env::var("APP_NAME")?;
    let application_version = env::var("APP_VERSION").ok();

    let minimum_level = env::var("APP_MINIMUM_LEVEL")
        .unwrap_or_else(|_| "Information".to_string())
        .parse::<Level>()?;
    let level_overrides = match env::var("APP_LEVEL_OVERRIDES") {
        Ok(raw) => parse_level_overrides(&raw)?,
        Err(_) => Vec::new(),
    };

    let clickhouse_host = env::var("APP_CLICKHOUSE_HOST")?;
    let clickhouse_port = env::var("APP_CLICKHOUSE_PORT")?.parse::<u16>()?;
    let clickhouse_user = env::var("APP_CLICKHOUSE_USER")?;
    let clickhouse_password = get_env_or_file("APP_CLICKHOUSE_PASSWORD")?;
    let clickhouse_database = env::var("APP_CLICKHOUSE_DATABASE")?;

    let usage_table = env::var("APP_USAGE_TABLE").unwrap_or_else(|_| "usage_log".to_string());
    let auto_create_table = match env::var("APP_AUTO_CREATE_TABLE") {
        Ok(raw) => parse_bool(&raw)?,
        Err(_) => true,
    };
    let usage_columns: Vec<ColumnSettings> = match env::var("APP_USAGE_COLUMNS") {
        Ok(raw) => serde_json::from_str(&raw)?,
        Err(_) => Vec::new(),
    };

    let diagnostics_path =
        env::var("APP_DIAGNOSTICS_PATH").unwrap_or_else(|_| "logs/diagnostics.json".to_string());

    let settings = Settings {
        application_name,
        application_version,
        minimum_level,
        level_overrides,
        clickhouse_host,
        clickhouse_port,
        clickhouse_user,
        clickhouse_password,
        clickhouse_database,
        usage_table,
        auto_create_table,
        usage_columns,
        diagnostics_path,
    };

    // Validate settings before returning
    settings.validate()?;

    Ok(settings)
}

use crate::adapter::clickhouse::schema::ColumnSchema;
use crate::domain::{Level, LogEvent};
use chrono::{DateTime, Utc};
use clickhouse::serde::chrono::datetime64::millis;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, trace};

#[derive(clickhouse::Row, Serialize, Deserialize, Clone, Debug)]
pub struct UsageRow {
    #[serde(with = "millis")]
    pub timestamp: DateTime<Utc>, // DateTime64(3,'UTC')
    pub level: i8,         // Int8
    pub message: String,   // String
    pub exception: String, // String, empty when absent
    pub event: String,     // String, full event as JSON
    pub fields: Vec<(String, String)>, // Map(String,String), declared columns only
}

impl UsageRow {
    /// Projects an event onto the declared column set.
    ///
    /// Only declared properties reach `fields`; anything else is dropped and
    /// traced. Values exceeding a column's `max_length` are truncated to
    /// exactly that many characters, with a debug record of the cut. A
    /// missing non-nullable column is stored as an empty string so the map
    /// key still exists.
    #[must_use]
    pub fn from_event(event: &LogEvent, schema: &ColumnSchema) -> Self {
        let mut fields = Vec::with_capacity(schema.columns().len());

        for column in schema.columns() {
            match event.property(&column.name) {
                Some(value) => {
                    let mut text = property_to_string(value);
                    if let Some(max) = column.max_length {
                        if text.chars().count() > max {
                            debug!(
                                column = %column.name,
                                max_length = max,
                                "Truncating oversized column value"
                            );
                            text = text.chars().take(max).collect();
                        }
                    }
                    fields.push((column.name.clone(), text));
                }
                None if !column.allow_null => {
                    debug!(column = %column.name, "Non-nullable column missing from event");
                    fields.push((column.name.clone(), String::new()));
                }
                None => {}
            }
        }

        for name in event.properties.keys() {
            if schema.get(name).is_none() {
                trace!(property = %name, "Dropping property with no declared column");
            }
        }

        Self {
            timestamp: event.timestamp,
            level: match event.level {
                Level::Verbose => 0,
                Level::Debug => 1,
                Level::Information => 2,
                Level::Warning => 3,
                Level::Error => 4,
                Level::Fatal => 5,
            },
            message: event.message.clone(),
            exception: event.exception.clone().unwrap_or_default(),
            event: serde_json::to_string(event).unwrap_or_default(),
            fields,
        }
    }
}

/// String projection of a property value: strings verbatim, everything else
/// as compact JSON.
fn property_to_string(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

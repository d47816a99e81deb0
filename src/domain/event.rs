use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;

/// Event severity, ordered from most to least verbose.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Level {
    Verbose,
    Debug,
    Information,
    Warning,
    Error,
    Fatal,
}

impl Level {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Level::Verbose => "Verbose",
            Level::Debug => "Debug",
            Level::Information => "Information",
            Level::Warning => "Warning",
            Level::Error => "Error",
            Level::Fatal => "Fatal",
        }
    }
}

impl std::str::FromStr for Level {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "verbose" | "trace" => Ok(Level::Verbose),
            "debug" => Ok(Level::Debug),
            "information" | "info" => Ok(Level::Information),
            "warning" | "warn" => Ok(Level::Warning),
            "error" => Ok(Level::Error),
            "fatal" => Ok(Level::Fatal),
            other => Err(format!("Unknown level: {other}")),
        }
    }
}

/// Well-known property carrying the emitting source (module/logger name),
/// consulted by per-source minimum-level overrides.
pub const SOURCE_CONTEXT: &str = "SourceContext";

/// A single structured log event.
///
/// Properties are only ever written through [`LogEvent::add_property_if_absent`],
/// so a value set by an earlier pipeline stage is never overwritten by a
/// later one (first writer wins).
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct LogEvent {
    pub timestamp: DateTime<Utc>,
    pub level: Level,
    pub message: String,
    pub properties: HashMap<String, Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub exception: Option<String>,
}

impl LogEvent {
    #[must_use]
    pub fn new(level: Level, message: impl Into<String>) -> Self {
        Self {
            timestamp: Utc::now(),
            level,
            message: message.into(),
            properties: HashMap::new(),
            exception: None,
        }
    }

    /// Builder-style property add; same add-if-absent semantics as
    /// [`LogEvent::add_property_if_absent`].
    #[must_use]
    pub fn with_property(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.add_property_if_absent(name, value);
        self
    }

    #[must_use]
    pub fn with_exception(mut self, exception: impl Into<String>) -> Self {
        self.exception = Some(exception.into());
        self
    }

    /// Adds a property unless one with the same name already exists.
    /// Returns `true` if the property was added.
    pub fn add_property_if_absent(
        &mut self,
        name: impl Into<String>,
        value: impl Into<Value>,
    ) -> bool {
        let name = name.into();
        if self.properties.contains_key(&name) {
            return false;
        }
        self.properties.insert(name, value.into());
        true
    }

    #[must_use]
    pub fn has_property(&self, name: &str) -> bool {
        self.properties.contains_key(name)
    }

    #[must_use]
    pub fn property(&self, name: &str) -> Option<&Value> {
        self.properties.get(name)
    }

    /// The `SourceContext` property as a string, if present.
    #[must_use]
    pub fn source(&self) -> Option<&str> {
        self.properties.get(SOURCE_CONTEXT).and_then(Value::as_str)
    }
}

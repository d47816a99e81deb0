use thiserror::Error;

/// Fatal pipeline assembly errors. Only raised at startup; once a
/// `Pipeline` is built, nothing from this enum can occur again.
#[derive(Error, Debug)]
pub enum PipelineError {
    #[error("Failed to load configuration: {0}")]
    Config(String),
}

/// Per-sink dispatch errors. Always caught at the router level and
/// reported through `tracing`; never surfaced to the logging caller.
#[derive(Error, Debug)]
pub enum SinkError {
    #[error("ClickHouse error: {0}")]
    ClickHouse(#[from] clickhouse::error::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error("Sink unavailable: {0}")]
    Unavailable(String),
}

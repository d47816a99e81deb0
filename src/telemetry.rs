use tracing::Level;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

/// Initialize the tracing subscriber used for the pipeline's own
/// diagnostics (this is also where swallowed sink errors end up).
/// Uses JSON format unless `RUST_LOG_FORMAT` selects something else.
///
/// Initialization is best-effort: when the embedding application has
/// already installed its own subscriber (or this is called twice), the
/// call is a no-op rather than a panic.
pub fn init_tracing() {
    let use_json = std::env::var("RUST_LOG_FORMAT")
        .map(|v| v == "json")
        .unwrap_or(true); // Default to JSON for production

    let filter = EnvFilter::from_default_env().add_directive(Level::INFO.into());

    let result = if use_json {
        tracing_subscriber::registry()
            .with(
                fmt::layer()
                    .json()
                    .flatten_event(true)
                    .with_current_span(true),
            )
            .with(filter)
            .try_init()
    } else {
        tracing_subscriber::registry()
            .with(fmt::layer())
            .with(filter)
            .try_init()
    };
    result.ok();
}

use crate::domain::LogEvent;
use crate::error::SinkError;
use std::future::Future;
use std::pin::Pin;

/// Destination for enriched log events (ClickHouse, JSON file, etc.)
///
/// This trait is dyn-compatible by using boxed futures instead of `impl Future`.
pub trait Sink: Send + Sync {
    fn write(
        &self,
        event: LogEvent,
    ) -> Pin<Box<dyn Future<Output = Result<(), SinkError>> + Send + '_>>;
}

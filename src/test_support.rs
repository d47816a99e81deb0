//! Shared test support utilities
//!
//! Provides a `MockSink` implementing [`Sink`] for use in unit and
//! integration tests, with a switchable failure mode.

use crate::domain::LogEvent;
use crate::error::SinkError;
use crate::port::Sink;
use std::future::Future;
use std::pin::Pin;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

/// Mock sink that captures written events for testing.
pub struct MockSink {
    written: Arc<Mutex<Vec<LogEvent>>>,
    should_fail: AtomicBool,
}

impl MockSink {
    #[must_use]
    pub fn new() -> Self {
        Self {
            written: Arc::new(Mutex::new(Vec::new())),
            should_fail: AtomicBool::new(false),
        }
    }

    /// A sink whose every write fails.
    #[must_use]
    pub fn failing() -> Self {
        let sink = Self::new();
        sink.should_fail.store(true, Ordering::SeqCst);
        sink
    }

    pub fn set_should_fail(&self, fail: bool) {
        self.should_fail.store(fail, Ordering::SeqCst);
    }

    #[must_use]
    pub fn written(&self) -> Vec<LogEvent> {
        self.written.lock().unwrap().clone()
    }
}

impl Default for MockSink {
    fn default() -> Self {
        Self::new()
    }
}

impl Sink for MockSink {
    fn write(
        &self,
        event: LogEvent,
    ) -> Pin<Box<dyn Future<Output = Result<(), SinkError>> + Send + '_>> {
        let written = self.written.clone();
        Box::pin(async move {
            if self.should_fail.load(Ordering::SeqCst) {
                return Err(SinkError::Unavailable("Mock write failure".to_string()));
            }
            let mut guard = written.lock().unwrap();
            guard.push(event);
            Ok(())
        })
    }
}

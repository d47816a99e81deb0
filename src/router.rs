use crate::domain::LogEvent;
use crate::port::Sink;
use std::sync::Arc;
use tracing::error;

/// Pure predicate deciding whether a sink receives an event.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SinkFilter {
    /// Matches every event.
    Accept,
    /// Matches events carrying the named property.
    HasProperty(String),
    /// Matches events lacking the named property.
    LacksProperty(String),
}

impl SinkFilter {
    #[must_use]
    pub fn matches(&self, event: &LogEvent) -> bool {
        match self {
            SinkFilter::Accept => true,
            SinkFilter::HasProperty(name) => event.has_property(name),
            SinkFilter::LacksProperty(name) => !event.has_property(name),
        }
    }
}

/// One routing table entry; the name only appears in diagnostics.
pub struct SinkRoute {
    pub name: String,
    pub filter: SinkFilter,
    pub sink: Arc<dyn Sink>,
}

/// Fans one enriched event out to every sink whose filter matches.
///
/// Routes are tried strictly in table order. Sinks are independent: a
/// failing dispatch is reported through `tracing` and the router moves on,
/// so the caller of the original log call never sees a sink error.
pub struct SinkRouter {
    routes: Vec<SinkRoute>,
}

impl SinkRouter {
    #[must_use]
    pub fn new(routes: Vec<SinkRoute>) -> Self {
        Self { routes }
    }

    #[must_use]
    pub fn routes(&self) -> &[SinkRoute] {
        &self.routes
    }

    /// Dispatches the event to each matching sink in order and returns the
    /// number of successful deliveries.
    pub async fn route(&self, event: &LogEvent) -> usize {
        let mut delivered = 0;
        for route in &self.routes {
            if !route.filter.matches(event) {
                continue;
            }
            match route.sink.write(event.clone()).await {
                Ok(()) => delivered += 1,
                Err(e) => {
                    error!(sink = %route.name, "Failed to dispatch log event: {e}");
                }
            }
        }
        delivered
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Level;

    #[test]
    fn test_has_property_filter() {
        let event = LogEvent::new(Level::Information, "m").with_property("UsageName", "Search");
        assert!(SinkFilter::HasProperty("UsageName".into()).matches(&event));
        assert!(!SinkFilter::HasProperty("ClientIP".into()).matches(&event));
    }

    #[test]
    fn test_lacks_property_filter_is_complement() {
        let event = LogEvent::new(Level::Information, "m").with_property("UsageName", "Search");
        let has = SinkFilter::HasProperty("UsageName".into());
        let lacks = SinkFilter::LacksProperty("UsageName".into());
        assert_ne!(has.matches(&event), lacks.matches(&event));
    }

    #[test]
    fn test_accept_matches_everything() {
        let event = LogEvent::new(Level::Verbose, "m");
        assert!(SinkFilter::Accept.matches(&event));
    }
}

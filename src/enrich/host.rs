use crate::domain::{LogEvent, RequestContext};
use crate::enrich::Enricher;

/// Adds the `MachineName` property from the OS hostname.
///
/// The hostname is resolved once at construction; if the lookup fails (or
/// yields a non-UTF-8 name) the enricher becomes a no-op rather than an
/// error source.
pub struct HostEnricher {
    machine_name: Option<String>,
}

impl HostEnricher {
    #[must_use]
    pub fn new() -> Self {
        let machine_name = hostname::get()
            .ok()
            .and_then(|h| h.to_str().map(|s| s.to_string()));
        Self { machine_name }
    }

    #[cfg(test)]
    fn with_machine_name(machine_name: Option<String>) -> Self {
        Self { machine_name }
    }
}

impl Default for HostEnricher {
    fn default() -> Self {
        Self::new()
    }
}

impl Enricher for HostEnricher {
    fn enrich(&self, event: &mut LogEvent, _ctx: Option<&RequestContext>) {
        if let Some(name) = &self.machine_name {
            event.add_property_if_absent("MachineName", name.as_str());
        }
    }
}

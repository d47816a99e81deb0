use crate::domain::{LogEvent, RequestContext};
use crate::enrich::Enricher;

/// Adds fixed application identity properties: `Application` (the configured
/// application name, used to segregate applications sharing one sink),
/// `ProcessName` (the running executable's file stem) and `Version`.
///
/// `ProcessName` lookup can fail on exotic deployments; the property is then
/// simply absent.
pub struct AppIdentityEnricher {
    application: String,
    version: Option<String>,
    process_name: Option<String>,
}

impl AppIdentityEnricher {
    #[must_use]
    pub fn new(application: impl Into<String>, version: Option<String>) -> Self {
        let process_name = std::env::current_exe().ok().and_then(|p| {
            p.file_stem()
                .map(|s| s.to_string_lossy().to_string())
        });
        Self {
            application: application.into(),
            version,
            process_name,
        }
    }
}

impl Enricher for AppIdentityEnricher {
    fn enrich(&self, event: &mut LogEvent, _ctx: Option<&RequestContext>) {
        event.add_property_if_absent("Application", self.application.as_str());
        if let Some(version) = &self.version {
            event.add_property_if_absent("Version", version.as_str());
        }
        if let Some(process) = &self.process_name {
            event.add_property_if_absent("ProcessName", process.as_str());
        }
    }
}

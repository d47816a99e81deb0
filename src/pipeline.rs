use crate::adapter::clickhouse::ClickHouseSink;
use crate::adapter::json_file::JsonFileSink;
use crate::config::Settings;
use crate::domain::{Level, LogEvent, RequestContext};
use crate::enrich::{
    AppIdentityEnricher, Enricher, HostEnricher, RequestContextEnricher, run_chain,
};
use crate::error::PipelineError;
use crate::port::Sink;
use crate::router::{SinkFilter, SinkRoute, SinkRouter};
use clickhouse::Client;
use std::sync::Arc;
use tracing::{error, info};

/// Name of the property that routes an event to the structured usage sink.
pub const USAGE_PROPERTY: &str = "UsageName";

/// Accumulates enrichers and routes, then turns into an immutable
/// [`Pipeline`]. Insertion order is preserved on both, and matters:
/// enrichment is add-if-absent (first writer wins) and sinks are tried in
/// table order.
pub struct PipelineBuilder {
    minimum_level: Level,
    level_overrides: Vec<(String, Level)>,
    enrichers: Vec<Box<dyn Enricher>>,
    routes: Vec<SinkRoute>,
}

impl PipelineBuilder {
    #[must_use]
    pub fn new() -> Self {
        Self {
            minimum_level: Level::Information,
            level_overrides: Vec::new(),
            enrichers: Vec::new(),
            routes: Vec::new(),
        }
    }

    #[must_use]
    pub fn minimum_level(mut self, level: Level) -> Self {
        self.minimum_level = level;
        self
    }

    #[must_use]
    pub fn level_override(mut self, source: impl Into<String>, level: Level) -> Self {
        self.level_overrides.push((source.into(), level));
        self
    }

    #[must_use]
    pub fn enrich_with(mut self, enricher: Box<dyn Enricher>) -> Self {
        self.enrichers.push(enricher);
        self
    }

    #[must_use]
    pub fn route(
        mut self,
        name: impl Into<String>,
        filter: SinkFilter,
        sink: Arc<dyn Sink>,
    ) -> Self {
        self.routes.push(SinkRoute {
            name: name.into(),
            filter,
            sink,
        });
        self
    }

    /// Consumes the builder. The pipeline accepts no further
    /// reconfiguration after this point.
    #[must_use]
    pub fn build(self) -> Pipeline {
        Pipeline {
            minimum_level: self.minimum_level,
            level_overrides: self.level_overrides,
            enrichers: self.enrichers,
            router: SinkRouter::new(self.routes),
        }
    }
}

impl Default for PipelineBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// The built logging pipeline: enricher chain plus sink routing table.
/// Created once at startup and shared read-only for the process lifetime.
pub struct Pipeline {
    minimum_level: Level,
    level_overrides: Vec<(String, Level)>,
    enrichers: Vec<Box<dyn Enricher>>,
    router: SinkRouter,
}

impl Pipeline {
    /// Assembles the standard pipeline from validated settings:
    /// host, application-identity and request-context enrichers in that
    /// order, a ClickHouse usage sink for events carrying `UsageName`, and
    /// an ND-JSON diagnostics sink for everything else.
    ///
    /// Missing or malformed sink parameters fail here, before any event is
    /// processed. A failed `CREATE TABLE` is reported but not fatal: the
    /// per-event writes surface it as routine sink errors.
    pub async fn build_from_settings(settings: &Settings) -> Result<Self, PipelineError> {
        settings.validate()?;
        let schema = settings.column_schema()?;

        let client = Client::default()
            .with_url(format!(
                "http://{}:{}",
                settings.clickhouse_host, settings.clickhouse_port
            ))
            .with_user(&settings.clickhouse_user)
            .with_password(&settings.clickhouse_password)
            .with_database(&settings.clickhouse_database);

        let usage_sink = ClickHouseSink::new(client, settings.usage_table.clone(), schema);

        if settings.auto_create_table {
            if let Err(e) = usage_sink.ensure_table().await {
                error!("Failed to auto-create table {}: {e}", settings.usage_table);
            }
        }

        let diagnostics_sink = JsonFileSink::new(&settings.diagnostics_path)
            .await
            .map_err(|e| {
                PipelineError::Config(format!(
                    "Diagnostics sink setup failed for {}: {e}",
                    settings.diagnostics_path
                ))
            })?;

        let mut builder = PipelineBuilder::new()
            .minimum_level(settings.minimum_level)
            .enrich_with(Box::new(HostEnricher::new()))
            .enrich_with(Box::new(AppIdentityEnricher::new(
                settings.application_name.clone(),
                settings.application_version.clone(),
            )))
            .enrich_with(Box::new(RequestContextEnricher))
            .route(
                "usage",
                SinkFilter::HasProperty(USAGE_PROPERTY.into()),
                Arc::new(usage_sink),
            )
            .route(
                "diagnostics",
                SinkFilter::LacksProperty(USAGE_PROPERTY.into()),
                Arc::new(diagnostics_sink),
            );
        for (source, level) in &settings.level_overrides {
            builder = builder.level_override(source.clone(), *level);
        }

        info!(
            application = %settings.application_name,
            table = %settings.usage_table,
            "Logging pipeline built"
        );
        Ok(builder.build())
    }

    /// Whether an event from `source` at `level` would be processed.
    /// The override with the longest matching source prefix wins.
    #[must_use]
    pub fn is_enabled(&self, source: Option<&str>, level: Level) -> bool {
        let minimum = source
            .and_then(|source| {
                self.level_overrides
                    .iter()
                    .filter(|(prefix, _)| source.starts_with(prefix.as_str()))
                    .max_by_key(|(prefix, _)| prefix.len())
                    .map(|(_, level)| *level)
            })
            .unwrap_or(self.minimum_level);
        level >= minimum
    }

    /// Enriches and routes one event. Never fails from the caller's point
    /// of view: sink errors are contained by the router, enrichment skips
    /// fields it cannot compute. Returns the number of sinks that accepted
    /// the event.
    pub async fn dispatch(&self, mut event: LogEvent, ctx: Option<&RequestContext>) -> usize {
        if !self.is_enabled(event.source(), event.level) {
            return 0;
        }
        run_chain(&self.enrichers, &mut event, ctx);
        self.router.route(&event).await
    }

    #[must_use]
    pub fn router(&self) -> &SinkRouter {
        &self.router
    }
}

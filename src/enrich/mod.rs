pub mod app_identity;
pub mod host;
pub mod request;

use crate::domain::{LogEvent, RequestContext};

pub use app_identity::AppIdentityEnricher;
pub use host::HostEnricher;
pub use request::RequestContextEnricher;

/// A single stage of the enrichment chain.
///
/// Enrichers add properties through add-if-absent semantics, so chain order
/// decides which stage wins for a contested property name. An enricher must
/// be reentrant, must not mutate the context, and must never fail the event:
/// a field it cannot compute is skipped, nothing else.
pub trait Enricher: Send + Sync {
    fn enrich(&self, event: &mut LogEvent, ctx: Option<&RequestContext>);
}

/// Runs every enricher against the event, in order.
pub fn run_chain(
    enrichers: &[Box<dyn Enricher>],
    event: &mut LogEvent,
    ctx: Option<&RequestContext>,
) {
    for enricher in enrichers {
        enricher.enrich(event, ctx);
    }
}

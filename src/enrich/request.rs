use crate::domain::{LogEvent, RequestContext};
use crate::enrich::Enricher;
use serde_json::{Map, Value};

/// Copies HTTP-request context into the event: `ClientIP` from the
/// connection's remote address and, for authenticated callers, a structured
/// `UserInfo` property carrying the identity name and claims.
///
/// With no active request (context absent) the event passes through
/// unchanged. All properties are add-if-absent, so a `ClientIP` captured by
/// an earlier stage is preserved.
pub struct RequestContextEnricher;

impl Enricher for RequestContextEnricher {
    fn enrich(&self, event: &mut LogEvent, ctx: Option<&RequestContext>) {
        let Some(ctx) = ctx else {
            return;
        };

        if let Some(addr) = ctx.remote_addr {
            event.add_property_if_absent("ClientIP", addr.to_string());
        }

        if let Some(identity) = &ctx.identity {
            // Claims are keyed "{type} ({ordinal})" so repeated claim types
            // stay distinguishable.
            let mut claims = Map::new();
            for (i, (claim_type, value)) in identity.claims.iter().enumerate() {
                claims.insert(format!("{claim_type} ({i})"), Value::from(value.as_str()));
            }

            let mut user_info = Map::new();
            user_info.insert("Name".into(), Value::from(identity.name.as_str()));
            user_info.insert("Claims".into(), Value::Object(claims));
            event.add_property_if_absent("UserInfo", Value::Object(user_info));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Identity, Level};
    use std::net::{IpAddr, Ipv4Addr};

    fn ctx_with_ip(octets: [u8; 4]) -> RequestContext {
        RequestContext::new().with_remote_addr(IpAddr::V4(Ipv4Addr::from(octets)))
    }

    #[test]
    fn test_absent_context_leaves_event_unchanged() {
        let mut event = LogEvent::new(Level::Information, "test");
        let before = event.clone();
        RequestContextEnricher.enrich(&mut event, None);
        assert_eq!(event, before);
    }

    #[test]
    fn test_adds_client_ip_from_connection() {
        let mut event = LogEvent::new(Level::Information, "test");
        RequestContextEnricher.enrich(&mut event, Some(&ctx_with_ip([192, 168, 1, 10])));
        assert_eq!(
            event.property("ClientIP"),
            Some(&Value::from("192.168.1.10"))
        );
    }

    #[test]
    fn test_client_ip_is_add_if_absent() {
        let mut event =
            LogEvent::new(Level::Information, "test").with_property("ClientIP", "10.0.0.1");
        RequestContextEnricher.enrich(&mut event, Some(&ctx_with_ip([192, 168, 1, 10])));
        assert_eq!(event.property("ClientIP"), Some(&Value::from("10.0.0.1")));
    }

    #[test]
    fn test_enrichment_is_idempotent_on_client_ip() {
        let ctx = ctx_with_ip([172, 16, 0, 9]);
        let mut event = LogEvent::new(Level::Information, "test");
        RequestContextEnricher.enrich(&mut event, Some(&ctx));
        let once = event.clone();
        RequestContextEnricher.enrich(&mut event, Some(&ctx));
        assert_eq!(event, once);
    }

    #[test]
    fn test_anonymous_context_adds_no_user_info() {
        let mut event = LogEvent::new(Level::Information, "test");
        RequestContextEnricher.enrich(&mut event, Some(&ctx_with_ip([10, 1, 1, 1])));
        assert!(!event.has_property("UserInfo"));
    }

    #[test]
    fn test_authenticated_context_adds_user_info_with_ordinal_claim_keys() {
        let ctx = ctx_with_ip([10, 1, 1, 1]).with_identity(Identity {
            name: "alice".into(),
            claims: vec![
                ("role".into(), "admin".into()),
                ("role".into(), "auditor".into()),
            ],
        });
        let mut event = LogEvent::new(Level::Information, "test");
        RequestContextEnricher.enrich(&mut event, Some(&ctx));

        let user_info = event.property("UserInfo").unwrap();
        assert_eq!(user_info["Name"], Value::from("alice"));
        assert_eq!(user_info["Claims"]["role (0)"], Value::from("admin"));
        assert_eq!(user_info["Claims"]["role (1)"], Value::from("auditor"));
    }
}

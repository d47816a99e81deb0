use std::net::IpAddr;

/// Per-request ambient data, created by the request-handling layer and
/// passed explicitly into enrichment. The pipeline only reads it and never
/// retains it beyond a single event.
#[derive(Clone, Debug, Default)]
pub struct RequestContext {
    pub remote_addr: Option<IpAddr>,
    pub identity: Option<Identity>,
}

/// Authenticated caller identity with its claims in presentation order.
#[derive(Clone, Debug)]
pub struct Identity {
    pub name: String,
    pub claims: Vec<(String, String)>,
}

impl RequestContext {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_remote_addr(mut self, addr: IpAddr) -> Self {
        self.remote_addr = Some(addr);
        self
    }

    #[must_use]
    pub fn with_identity(mut self, identity: Identity) -> Self {
        self.identity = Some(identity);
        self
    }

    #[must_use]
    pub fn is_authenticated(&self) -> bool {
        self.identity.is_some()
    }
}

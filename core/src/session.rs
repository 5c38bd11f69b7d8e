//! Reusable request context: a transport plus default headers.
//!
//! A `Session` is cheap to clone; clones share the same transport and
//! therefore the same connection pool. When a caller does not supply one,
//! `validated_request` creates a fresh session for that single call.

use std::sync::Arc;
use std::time::Duration;

use crate::http::{set_header, HttpMethod, HttpRequest};
use crate::transport::{Transport, UreqTransport};

#[derive(Debug, Clone)]
pub struct Session {
    transport: Arc<dyn Transport>,
    headers: Vec<(String, String)>,
}

impl Session {
    /// A session over the default ureq transport with no default headers.
    pub fn new() -> Self {
        Self::with_transport(UreqTransport::default())
    }

    pub fn builder() -> SessionBuilder {
        SessionBuilder::default()
    }

    /// A session over a caller-provided transport.
    pub fn with_transport(transport: impl Transport + 'static) -> Self {
        Self {
            transport: Arc::new(transport),
            headers: Vec::new(),
        }
    }

    /// Headers sent on every request made through this session.
    pub fn headers(&self) -> &[(String, String)] {
        &self.headers
    }

    /// Add or replace a default header.
    pub fn set_header(&mut self, name: &str, value: &str) {
        set_header(&mut self.headers, name, value);
    }

    pub(crate) fn transport(&self) -> &dyn Transport {
        self.transport.as_ref()
    }

    /// Merge session defaults with per-call headers into a request. Per-call
    /// headers win over defaults of the same name.
    pub(crate) fn prepare(
        &self,
        method: HttpMethod,
        url: &str,
        headers: &[(String, String)],
        body: Option<Vec<u8>>,
    ) -> HttpRequest {
        let mut merged = self.headers.clone();
        for (name, value) in headers {
            set_header(&mut merged, name, value);
        }
        HttpRequest {
            method,
            url: url.to_string(),
            headers: merged,
            body,
        }
    }
}

impl Default for Session {
    fn default() -> Self {
        Self::new()
    }
}

/// Builder for a [`Session`] over the ureq transport.
#[derive(Debug, Default, Clone)]
pub struct SessionBuilder {
    headers: Vec<(String, String)>,
    timeout: Option<Duration>,
}

impl SessionBuilder {
    pub fn header(mut self, name: &str, value: &str) -> Self {
        set_header(&mut self.headers, name, value);
        self
    }

    pub fn user_agent(self, value: &str) -> Self {
        self.header("user-agent", value)
    }

    /// Overall deadline for each request. Without one the transport default
    /// applies.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    pub fn build(self) -> Session {
        Session {
            transport: Arc::new(UreqTransport::new(self.timeout)),
            headers: self.headers,
        }
    }
}

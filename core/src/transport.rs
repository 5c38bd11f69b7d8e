//! The seam between request validation and the HTTP library doing the I/O.
//!
//! # Design
//! `Transport` takes a fully assembled `HttpRequest` and returns whatever the
//! server said, status and all. It never interprets status codes; that is the
//! job of `validated_request`. `UreqTransport` is the production
//! implementation. Tests substitute an in-memory one.

use std::fmt;
use std::io::Read as _;
use std::time::Duration;

use ureq::http;

use crate::http::HttpRequest;

/// Raw response data produced by a `Transport`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransportResponse {
    pub status: u16,
    pub headers: Vec<(String, String)>,
    pub body: Vec<u8>,
}

/// Errors a transport can report.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransportError {
    /// The server could not be reached: DNS failure, refused connection,
    /// socket I/O failure or timeout.
    Connect(String),
    /// Anything else that went wrong around the exchange.
    Other(String),
}

impl fmt::Display for TransportError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TransportError::Connect(msg) => write!(f, "connection failed: {msg}"),
            TransportError::Other(msg) => f.write_str(msg),
        }
    }
}

impl std::error::Error for TransportError {}

/// Executes one HTTP exchange.
pub trait Transport: Send + Sync + fmt::Debug {
    fn send(&self, request: &HttpRequest) -> Result<TransportResponse, TransportError>;
}

/// A [`Transport`] backed by a blocking [`ureq::Agent`].
///
/// Certificate verification is always on; the agent is built from ureq's
/// verifying TLS defaults and nothing here can turn that off.
#[derive(Clone)]
pub struct UreqTransport {
    agent: ureq::Agent,
}

impl UreqTransport {
    pub fn new(timeout: Option<Duration>) -> Self {
        let agent = ureq::Agent::config_builder()
            .timeout_global(timeout)
            // Status codes are validated by the caller, not the transport.
            .http_status_as_error(false)
            .build()
            .new_agent();
        Self { agent }
    }
}

impl Default for UreqTransport {
    fn default() -> Self {
        Self::new(None)
    }
}

impl fmt::Debug for UreqTransport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("UreqTransport").finish_non_exhaustive()
    }
}

impl Transport for UreqTransport {
    fn send(&self, request: &HttpRequest) -> Result<TransportResponse, TransportError> {
        let mut builder = http::Request::builder()
            .method(request.method.as_str())
            .uri(request.url.as_str());

        for (name, value) in &request.headers {
            builder = builder.header(name.as_str(), value.as_str());
        }

        let result = match &request.body {
            Some(body) => builder.body(body.clone()).map(|req| self.agent.run(req)),
            None => builder.body(()).map(|req| self.agent.run(req)),
        }
        .map_err(|e| TransportError::Other(format!("could not build request: {e}")))?;

        match result {
            Ok(response) => convert_response(response),
            Err(
                e @ (ureq::Error::Timeout(_)
                | ureq::Error::HostNotFound
                | ureq::Error::ConnectionFailed
                | ureq::Error::Io(_)),
            ) => Err(TransportError::Connect(e.to_string())),
            Err(e) => Err(TransportError::Other(e.to_string())),
        }
    }
}

fn convert_response(
    response: http::Response<ureq::Body>,
) -> Result<TransportResponse, TransportError> {
    let (parts, body) = response.into_parts();

    let mut body_bytes = Vec::new();
    body.into_reader()
        .read_to_end(&mut body_bytes)
        .map_err(|e| TransportError::Other(format!("failed to read response body: {e}")))?;

    let headers = parts
        .headers
        .iter()
        .map(|(name, value)| {
            (
                name.as_str().to_string(),
                String::from_utf8_lossy(value.as_bytes()).into_owned(),
            )
        })
        .collect();

    Ok(TransportResponse {
        status: parts.status.as_u16(),
        headers,
        body: body_bytes,
    })
}

//! Error type shared by every fallible operation in the crate.
//!
//! # Design
//! A single enum covers all failures so callers have one thing to match on.
//! `UnexpectedStatus` boxes its context because it carries several owned
//! strings and would otherwise inflate every `Result` in the crate.

use std::fmt;

use thiserror::Error;

/// Number of characters of the response body kept in `FailedRequest`.
pub const RESPONSE_EXCERPT_CHARS: usize = 500;

#[derive(Debug, Error)]
pub enum SlimpointError {
    /// The transport could not reach the target at all.
    #[error("Unable to connect to {url}. Is it available? ({reason})")]
    ConnectionFailure { url: String, reason: String },

    /// A response arrived but its status differs from the expected one.
    #[error("{0}")]
    UnexpectedStatus(Box<FailedRequest>),

    /// An `Endpoint` could not resolve a base URL.
    #[error("{0}")]
    Configuration(String),

    /// The request could not be built (unknown method, empty URL, bad header).
    #[error("invalid request: {0}")]
    InvalidRequest(String),

    /// The transport failed after connecting, e.g. a malformed response.
    #[error("transport error while requesting {url}: {reason}")]
    Transport { url: String, reason: String },

    #[error("failed to serialize request body: {0}")]
    Serialization(#[source] serde_json::Error),

    #[error("failed to deserialize response body: {0}")]
    Deserialization(#[source] serde_json::Error),
}

impl SlimpointError {
    /// The mismatch details, if this is an `UnexpectedStatus` error.
    pub fn failed_request(&self) -> Option<&FailedRequest> {
        match self {
            SlimpointError::UnexpectedStatus(failed) => Some(&**failed),
            _ => None,
        }
    }
}

/// Context captured when a response status does not match the expectation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FailedRequest {
    pub expected: u16,
    pub actual: u16,
    pub description: String,
    pub url: String,
    /// Default headers of the session the request went through.
    pub headers: Vec<(String, String)>,
    pub body: Option<String>,
    /// At most `RESPONSE_EXCERPT_CHARS` characters of the response text.
    pub response_excerpt: String,
}

impl FailedRequest {
    pub(crate) fn excerpt(text: &str) -> String {
        text.chars().take(RESPONSE_EXCERPT_CHARS).collect()
    }
}

impl fmt::Display for FailedRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "Expected a response of {}, got {}",
            self.expected, self.actual
        )?;
        writeln!(f, "While trying to: {}", self.description)?;
        writeln!(f, "Req URL: {}", self.url)?;
        write!(f, "Req Headers: {{")?;
        for (i, (name, value)) in self.headers.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{name:?}: {value:?}")?;
        }
        writeln!(f, "}}")?;
        writeln!(f, "Req Body: {}", self.body.as_deref().unwrap_or("None"))?;
        write!(f, "Response: {}", self.response_excerpt)
    }
}

//! In-memory transport for unit tests.

use std::sync::{Arc, Mutex};

use crate::http::HttpRequest;
use crate::transport::{Transport, TransportError, TransportResponse};

/// Answers every request with the same canned outcome and records what it saw.
#[derive(Debug, Clone)]
pub(crate) struct ScriptedTransport {
    outcome: Result<TransportResponse, TransportError>,
    seen: Arc<Mutex<Vec<HttpRequest>>>,
}

impl ScriptedTransport {
    pub(crate) fn always(status: u16) -> Self {
        Self::with_body(status, "")
    }

    pub(crate) fn with_body(status: u16, body: &str) -> Self {
        Self {
            outcome: Ok(TransportResponse {
                status,
                headers: vec![("content-type".to_string(), "text/plain".to_string())],
                body: body.as_bytes().to_vec(),
            }),
            seen: Arc::default(),
        }
    }

    pub(crate) fn refusing() -> Self {
        Self {
            outcome: Err(TransportError::Connect("connection refused".to_string())),
            seen: Arc::default(),
        }
    }

    pub(crate) fn broken(reason: &str) -> Self {
        Self {
            outcome: Err(TransportError::Other(reason.to_string())),
            seen: Arc::default(),
        }
    }

    pub(crate) fn requests(&self) -> Vec<HttpRequest> {
        self.seen.lock().unwrap().clone()
    }
}

impl Transport for ScriptedTransport {
    fn send(&self, request: &HttpRequest) -> Result<TransportResponse, TransportError> {
        self.seen.lock().unwrap().push(request.clone());
        self.outcome.clone()
    }
}

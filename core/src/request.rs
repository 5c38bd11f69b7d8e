//! One HTTP call whose response status is checked before it is returned.

use serde::Serialize;
use tracing::debug;

use crate::error::{FailedRequest, SlimpointError};
use crate::http::{set_header, HttpMethod, HttpResponse};
use crate::session::Session;
use crate::transport::TransportError;

/// Optional inputs to [`validated_request`].
///
/// Everything here is passed through to the transport untouched, except
/// `description`, which only appears in error messages.
#[derive(Debug, Clone, Default)]
pub struct RequestOptions<'s> {
    pub description: String,
    /// Session to send through. A fresh one is created per call when absent.
    pub session: Option<&'s Session>,
    pub headers: Vec<(String, String)>,
    pub body: Option<Vec<u8>>,
}

impl<'s> RequestOptions<'s> {
    pub fn new() -> Self {
        Self::default()
    }

    /// What the request is trying to accomplish, e.g. "Publish a post".
    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn session(mut self, session: &'s Session) -> Self {
        self.session = Some(session);
        self
    }

    pub fn header(mut self, name: &str, value: &str) -> Self {
        set_header(&mut self.headers, name, value);
        self
    }

    pub fn body(mut self, body: impl Into<Vec<u8>>) -> Self {
        self.body = Some(body.into());
        self
    }

    /// Serialize `value` as the JSON body. Sets `content-type` unless the
    /// caller already chose one.
    pub fn json<T: Serialize + ?Sized>(mut self, value: &T) -> Result<Self, SlimpointError> {
        let body = serde_json::to_vec(value).map_err(SlimpointError::Serialization)?;
        if !self
            .headers
            .iter()
            .any(|(n, _)| n.eq_ignore_ascii_case("content-type"))
        {
            self.headers
                .push(("content-type".to_string(), "application/json".to_string()));
        }
        self.body = Some(body);
        Ok(self)
    }
}

/// Perform one HTTP request and fail unless the response status equals
/// `expect`.
///
/// `method` is matched case-insensitively. On a status mismatch the error
/// carries the expected and actual codes, `options.description`, the request
/// URL, the session's default headers, the request body, and the first 500
/// characters of the response text.
/// A transport that cannot reach `url` yields
/// [`SlimpointError::ConnectionFailure`]. There are no retries.
pub fn validated_request(
    method: &str,
    url: &str,
    expect: u16,
    options: RequestOptions<'_>,
) -> Result<HttpResponse, SlimpointError> {
    let method: HttpMethod = method.parse()?;
    execute(method, url, expect, options)
}

pub(crate) fn execute(
    method: HttpMethod,
    url: &str,
    expect: u16,
    options: RequestOptions<'_>,
) -> Result<HttpResponse, SlimpointError> {
    if url.is_empty() {
        return Err(SlimpointError::InvalidRequest("request URL is empty".to_string()));
    }

    let transient;
    let session = match options.session {
        Some(session) => session,
        None => {
            transient = Session::new();
            &transient
        }
    };

    let request = session.prepare(method, url, &options.headers, options.body);
    debug!(%method, url, expect, "sending request");

    let raw = session.transport().send(&request).map_err(|e| match e {
        TransportError::Connect(reason) => SlimpointError::ConnectionFailure {
            url: url.to_string(),
            reason,
        },
        TransportError::Other(reason) => SlimpointError::Transport {
            url: url.to_string(),
            reason,
        },
    })?;

    debug!(%method, url, status = raw.status, "received response");

    let response = HttpResponse {
        status: raw.status,
        headers: raw.headers,
        body: raw.body,
        request,
    };

    if response.status != expect {
        return Err(SlimpointError::UnexpectedStatus(Box::new(FailedRequest {
            expected: expect,
            actual: response.status,
            description: options.description,
            url: url.to_string(),
            headers: session.headers().to_vec(),
            body: response.request.body_text(),
            response_excerpt: FailedRequest::excerpt(&response.text()),
        })));
    }

    Ok(response)
}

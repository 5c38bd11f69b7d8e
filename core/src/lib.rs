//! Slim, readable interactions with backend services.
//!
//! # Overview
//! - [`validated_request`] performs one HTTP call and fails with a
//!   descriptive [`SlimpointError`] unless the response status matches the
//!   expected one.
//! - [`Endpoint`] binds a base URL and path and exposes `get`, `post`, `put`,
//!   `patch` and `delete`, each delegating to `validated_request` with an
//!   optional query string.
//!
//! # Design
//! - Calls are synchronous and stateless; the only shared state is a
//!   caller-owned [`Session`].
//! - The HTTP library sits behind the [`Transport`] trait. The default is
//!   [`UreqTransport`], which always verifies TLS certificates.
//! - Nothing is retried and nothing is logged above `debug`; errors go
//!   straight back to the caller.

pub mod endpoint;
pub mod error;
pub mod http;
pub mod request;
pub mod session;
pub mod transport;

#[cfg(test)]
mod testing;

pub use endpoint::{encode_query, Call, Endpoint, EndpointConfig};
pub use error::{FailedRequest, SlimpointError};
pub use http::{HttpMethod, HttpRequest, HttpResponse};
pub use request::{validated_request, RequestOptions};
pub use session::{Session, SessionBuilder};
pub use transport::{Transport, TransportError, TransportResponse, UreqTransport};

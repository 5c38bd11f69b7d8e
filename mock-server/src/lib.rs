use std::{net::SocketAddr, sync::Arc};

use axum::{
    body::Bytes,
    extract::State,
    http::{HeaderMap, StatusCode, Uri},
    Router,
};
use serde::{Deserialize, Serialize};
use tokio::{net::TcpListener, sync::RwLock};

pub use axum::http::Method;

/// A canned answer for requests matching `method` and `path`.
///
/// `None` in either field matches anything. A `path` containing `?` must
/// match the request's path and query exactly; otherwise only the path is
/// compared.
#[derive(Clone, Debug)]
pub struct Stub {
    pub method: Option<Method>,
    pub path: Option<String>,
    pub status: u16,
    pub body: String,
}

impl Stub {
    pub fn new(method: Method, path: &str, status: u16) -> Self {
        Self {
            method: Some(method),
            path: Some(path.to_string()),
            status,
            body: String::new(),
        }
    }

    /// Answer every request with `status`.
    pub fn any(status: u16) -> Self {
        Self {
            method: None,
            path: None,
            status,
            body: String::new(),
        }
    }

    pub fn with_body(mut self, body: &str) -> Self {
        self.body = body.to_string();
        self
    }

    fn matches(&self, method: &Method, uri: &Uri) -> bool {
        if self.method.as_ref().is_some_and(|m| m != method) {
            return false;
        }
        match &self.path {
            None => true,
            Some(path) if path.contains('?') => {
                uri.path_and_query().map(|pq| pq.as_str()) == Some(path.as_str())
            }
            Some(path) => uri.path() == path,
        }
    }
}

/// A request as the server saw it.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct ReceivedRequest {
    pub method: String,
    pub uri: String,
    pub headers: Vec<(String, String)>,
    pub body: String,
}

impl ReceivedRequest {
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(n, _)| n.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }
}

/// Every request received by an app, in arrival order.
#[derive(Clone, Debug, Default)]
pub struct Journal(Arc<RwLock<Vec<ReceivedRequest>>>);

impl Journal {
    pub async fn snapshot(&self) -> Vec<ReceivedRequest> {
        self.0.read().await.clone()
    }

    /// For callers outside the runtime, e.g. plain `#[test]` functions.
    pub fn blocking_snapshot(&self) -> Vec<ReceivedRequest> {
        self.0.blocking_read().clone()
    }
}

#[derive(Clone)]
struct AppState {
    stubs: Arc<Vec<Stub>>,
    journal: Journal,
}

/// Build a router that answers with the first matching stub. Unmatched
/// requests get `404` with a body naming the request.
pub fn app(stubs: Vec<Stub>) -> (Router, Journal) {
    let journal = Journal::default();
    let state = AppState {
        stubs: Arc::new(stubs),
        journal: journal.clone(),
    };
    let router = Router::new().fallback(respond).with_state(state);
    (router, journal)
}

pub async fn run(listener: TcpListener, router: Router) -> Result<(), std::io::Error> {
    axum::serve(listener, router).await
}

/// Serve `router` on a random local port from a background thread and return
/// the bound address.
pub fn spawn(router: Router) -> std::io::Result<SocketAddr> {
    let std_listener = std::net::TcpListener::bind("127.0.0.1:0")?;
    let addr = std_listener.local_addr()?;
    std_listener.set_nonblocking(true)?;

    std::thread::spawn(move || -> std::io::Result<()> {
        let rt = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()?;
        rt.block_on(async {
            let listener = TcpListener::from_std(std_listener)?;
            run(listener, router).await
        })
    });

    Ok(addr)
}

async fn respond(
    State(state): State<AppState>,
    method: Method,
    uri: Uri,
    headers: HeaderMap,
    body: Bytes,
) -> (StatusCode, String) {
    let received = ReceivedRequest {
        method: method.to_string(),
        uri: uri.to_string(),
        headers: headers
            .iter()
            .map(|(n, v)| {
                (
                    n.as_str().to_string(),
                    String::from_utf8_lossy(v.as_bytes()).into_owned(),
                )
            })
            .collect(),
        body: String::from_utf8_lossy(&body).into_owned(),
    };
    tracing::info!(method = %received.method, uri = %received.uri, "stub request");
    state.journal.0.write().await.push(received);

    match state.stubs.iter().find(|s| s.matches(&method, &uri)) {
        Some(stub) => (
            StatusCode::from_u16(stub.status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR),
            stub.body.clone(),
        ),
        None => (StatusCode::NOT_FOUND, format!("no stub for {method} {uri}")),
    }
}

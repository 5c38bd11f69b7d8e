//! A single endpoint of a web service: base URL plus path, with one method
//! per HTTP verb.
//!
//! # Design
//! Service-wide defaults live in an [`EndpointConfig`] instead of being baked
//! into a type, so a family of endpoints can share one config loaded from
//! JSON. The URL is recomputed on every call; changing the base URL or path
//! affects the next request immediately.

use serde::Deserialize;

use crate::error::SlimpointError;
use crate::http::{HttpMethod, HttpResponse};
use crate::request::{execute, RequestOptions};
use crate::session::Session;

/// Status expected by verb methods unless a call says otherwise.
pub const DEFAULT_EXPECT: u16 = 200;

/// Defaults an [`Endpoint`] falls back to when constructed without explicit
/// values.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct EndpointConfig {
    pub base_url: Option<String>,
    pub path: String,
}

impl EndpointConfig {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: Some(base_url.into()),
            path: String::new(),
        }
    }

    pub fn with_path(mut self, path: impl Into<String>) -> Self {
        self.path = path.into();
        self
    }

    pub fn from_json(raw: &str) -> Result<Self, SlimpointError> {
        serde_json::from_str(raw).map_err(SlimpointError::Deserialization)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Endpoint {
    base_url: String,
    path: String,
}

impl Endpoint {
    /// An endpoint at `base_url` with an empty path.
    pub fn new(base_url: &str) -> Result<Self, SlimpointError> {
        Self::from_config(Some(base_url), None, &EndpointConfig::default())
    }

    pub fn with_path(base_url: &str, path: &str) -> Result<Self, SlimpointError> {
        Self::from_config(Some(base_url), Some(path), &EndpointConfig::default())
    }

    /// Resolve base URL and path from explicit arguments, falling back to
    /// `defaults`. Empty strings count as absent.
    pub fn from_config(
        base_url: Option<&str>,
        path: Option<&str>,
        defaults: &EndpointConfig,
    ) -> Result<Self, SlimpointError> {
        let base_url = base_url
            .filter(|s| !s.is_empty())
            .or_else(|| defaults.base_url.as_deref().filter(|s| !s.is_empty()))
            .ok_or_else(missing_base_url)?;
        let path = path.filter(|s| !s.is_empty()).unwrap_or(&defaults.path);

        Ok(Self {
            base_url: base_url.to_string(),
            path: path.to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn set_base_url(&mut self, base_url: &str) -> Result<(), SlimpointError> {
        if base_url.is_empty() {
            return Err(missing_base_url());
        }
        self.base_url = base_url.to_string();
        Ok(())
    }

    pub fn set_path(&mut self, path: &str) {
        self.path = path.to_string();
    }

    /// `base_url` followed directly by `path`.
    pub fn url(&self) -> String {
        format!("{}{}", self.base_url, self.path)
    }

    /// The URL a call with these query arguments is sent to.
    pub fn target_url(&self, qs_args: &[(String, String)]) -> String {
        let url = self.url();
        if qs_args.is_empty() {
            url
        } else {
            format!("{url}?{}", encode_query(qs_args))
        }
    }

    pub fn get(&self, call: Call<'_>) -> Result<HttpResponse, SlimpointError> {
        self.request(HttpMethod::Get, call)
    }

    pub fn post(&self, call: Call<'_>) -> Result<HttpResponse, SlimpointError> {
        self.request(HttpMethod::Post, call)
    }

    pub fn put(&self, call: Call<'_>) -> Result<HttpResponse, SlimpointError> {
        self.request(HttpMethod::Put, call)
    }

    pub fn patch(&self, call: Call<'_>) -> Result<HttpResponse, SlimpointError> {
        self.request(HttpMethod::Patch, call)
    }

    pub fn delete(&self, call: Call<'_>) -> Result<HttpResponse, SlimpointError> {
        self.request(HttpMethod::Delete, call)
    }

    pub fn request(
        &self,
        method: HttpMethod,
        call: Call<'_>,
    ) -> Result<HttpResponse, SlimpointError> {
        let url = self.target_url(&call.qs_args);
        execute(method, &url, call.expect, call.options)
    }
}

fn missing_base_url() -> SlimpointError {
    SlimpointError::Configuration(
        "Must provide a base_url explicitly or through the endpoint config".to_string(),
    )
}

/// Encode pairs as a query string, keeping their order. Letters, digits and
/// `_ . - ~` pass through, a space becomes `+`, every other byte is
/// percent-escaped.
pub fn encode_query(pairs: &[(String, String)]) -> String {
    pairs
        .iter()
        .map(|(key, value)| format!("{}={}", quote_plus(key), quote_plus(value)))
        .collect::<Vec<_>>()
        .join("&")
}

// `%` itself is escaped to `%25`, so every `%20` left is an encoded space.
fn quote_plus(s: &str) -> String {
    urlencoding::encode(s).replace("%20", "+")
}

/// Per-call options for the verb methods of an [`Endpoint`].
#[derive(Debug, Clone)]
pub struct Call<'s> {
    pub qs_args: Vec<(String, String)>,
    pub expect: u16,
    pub options: RequestOptions<'s>,
}

impl Default for Call<'_> {
    fn default() -> Self {
        Self {
            qs_args: Vec::new(),
            expect: DEFAULT_EXPECT,
            options: RequestOptions::default(),
        }
    }
}

impl<'s> Call<'s> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn qs_arg(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.qs_args.push((key.into(), value.into()));
        self
    }

    pub fn qs_args<K, V>(mut self, args: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: Into<String>,
    {
        self.qs_args
            .extend(args.into_iter().map(|(k, v)| (k.into(), v.into())));
        self
    }

    pub fn expect(mut self, status: u16) -> Self {
        self.expect = status;
        self
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.options = self.options.description(description);
        self
    }

    pub fn session(mut self, session: &'s Session) -> Self {
        self.options = self.options.session(session);
        self
    }

    pub fn header(mut self, name: &str, value: &str) -> Self {
        self.options = self.options.header(name, value);
        self
    }

    pub fn body(mut self, body: impl Into<Vec<u8>>) -> Self {
        self.options = self.options.body(body);
        self
    }

    pub fn json<T: serde::Serialize + ?Sized>(mut self, value: &T) -> Result<Self, SlimpointError> {
        self.options = self.options.json(value)?;
        Ok(self)
    }
}

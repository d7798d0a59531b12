//! Content store transport.
//!
//! The [`Transport`] trait is the single point where a query leaves the
//! process. The gateway hands it a fully-described [`QueryRequest`] (text,
//! parameters, cache policy) and gets back the raw JSON `result`.
//!
//! The production implementation is [`HttpTransport`], which speaks the
//! Sanity HTTP query API:
//!
//! ```text
//! GET https://<project>.api.sanity.io/<version>/data/query/<dataset>
//!     ?query=<GROQ>&$slug="hello-world"&perspective=published
//! Authorization: Bearer <token>            (only when a token is configured)
//! ```
//!
//! Parameter values are JSON-encoded and sent as `$name` query pairs, so a
//! value can never change the meaning of the query text.
//!
//! [`CachingTransport`](crate::cache::CachingTransport) wraps any transport
//! with revalidation windows and tag invalidation.

use crate::config::Settings;
use reqwest::Url;
use serde_json::Value;
use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tracing::debug;

#[derive(Error, Debug)]
pub enum TransportError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
    #[error("content store returned {status}: {message}")]
    Status { status: u16, message: String },
    #[error("malformed response: {0}")]
    Malformed(String),
    #[error("no content store configured")]
    NoStore,
}

/// Caching directives attached to a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CachePolicy<'a> {
    /// Maximum age of a cached result before it must be re-fetched.
    pub revalidate: Duration,
    /// Labels that let publishing bust this result selectively.
    pub tags: &'a [String],
}

/// Everything a transport needs to run one query.
#[derive(Debug, Clone, Copy)]
pub struct QueryRequest<'a> {
    pub name: &'a str,
    pub text: &'a str,
    pub params: &'a BTreeMap<&'static str, String>,
    pub cache: CachePolicy<'a>,
}

/// Something that can run a query against the content store.
///
/// Implementations must be safe to call from several threads at once.
pub trait Transport: Send + Sync {
    /// Run the query and return the `result` member of the response.
    fn query(&self, request: &QueryRequest<'_>) -> Result<Value, TransportError>;
}

impl<T: Transport + ?Sized> Transport for Arc<T> {
    fn query(&self, request: &QueryRequest<'_>) -> Result<Value, TransportError> {
        (**self).query(request)
    }
}

impl<T: Transport + ?Sized> Transport for Box<T> {
    fn query(&self, request: &QueryRequest<'_>) -> Result<Value, TransportError> {
        (**self).query(request)
    }
}

/// Blocking HTTP transport for the Sanity query API.
pub struct HttpTransport {
    settings: Arc<Settings>,
    client: reqwest::blocking::Client,
}

impl HttpTransport {
    /// Build a client with the configured request timeout.
    pub fn new(settings: Arc<Settings>) -> Result<Self, TransportError> {
        let client = reqwest::blocking::Client::builder()
            .timeout(settings.timeout())
            .user_agent(concat!("folio-content/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self { settings, client })
    }
}

impl Transport for HttpTransport {
    fn query(&self, request: &QueryRequest<'_>) -> Result<Value, TransportError> {
        let url = query_url(&self.settings, request)?;
        debug!(query = request.name, host = url.host_str(), "querying content store");

        let mut builder = self.client.get(url);
        if let Some(token) = self.settings.api_token() {
            builder = builder.bearer_auth(token);
        }
        let response = builder.send()?;
        let status = response.status().as_u16();
        let body = response.text()?;
        extract_result(status, &body)
    }
}

/// Build the request URL for a query.
pub fn query_url(settings: &Settings, request: &QueryRequest<'_>) -> Result<Url, TransportError> {
    let store = settings.store().ok_or(TransportError::NoStore)?;
    let host = if settings.use_cdn() {
        "apicdn.sanity.io"
    } else {
        "api.sanity.io"
    };
    let base = format!(
        "https://{}.{}/{}/data/query/{}",
        store.project_id,
        host,
        settings.api_version(),
        store.dataset
    );
    let mut url = Url::parse(&base).map_err(|e| TransportError::Malformed(e.to_string()))?;
    {
        let mut pairs = url.query_pairs_mut();
        pairs.append_pair("query", request.text);
        for (name, value) in request.params {
            let encoded = Value::String(value.clone()).to_string();
            pairs.append_pair(&format!("${name}"), &encoded);
        }
        pairs.append_pair("perspective", "published");
    }
    Ok(url)
}

/// Turn a raw response into the query result.
///
/// Non-2xx responses become [`TransportError::Status`] carrying the store's
/// error description when it sent one.
pub fn extract_result(status: u16, body: &str) -> Result<Value, TransportError> {
    let parsed: Result<Value, _> = serde_json::from_str(body);

    if !(200..300).contains(&status) {
        let message = parsed
            .ok()
            .and_then(|v| error_message(&v))
            .unwrap_or_else(|| truncate(body, 200));
        return Err(TransportError::Status { status, message });
    }

    let mut value = parsed.map_err(|e| TransportError::Malformed(e.to_string()))?;
    if let Some(message) = error_message(&value) {
        return Err(TransportError::Status { status, message });
    }
    value
        .get_mut("result")
        .map(Value::take)
        .ok_or_else(|| TransportError::Malformed("response has no `result` member".into()))
}

fn error_message(value: &Value) -> Option<String> {
    let error = value.get("error")?;
    error
        .get("description")
        .or_else(|| error.get("message"))
        .and_then(Value::as_str)
        .or_else(|| error.as_str())
        .map(String::from)
}

fn truncate(text: &str, max: usize) -> String {
    match text.char_indices().nth(max) {
        Some((idx, _)) => format!("{}...", &text[..idx]),
        None => text.to_string(),
    }
}

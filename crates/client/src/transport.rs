//! HTTP transport against the storage endpoint.
//!
//! Executes signed request descriptors, streaming bodies in both directions.
//! Nothing here retries: connection, timeout, and mid-stream failures all
//! surface as [`Error::Transport`] for the caller to report.

use std::pin::Pin;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::task::{Context, Poll};
use std::time::Duration;

use bytes::Bytes;
use chrono::{DateTime, Utc};
use futures::{Stream, StreamExt};
use percent_encoding::{AsciiSet, NON_ALPHANUMERIC, utf8_percent_encode};
use reqwest::header::HeaderMap;
use reqwest::{Body, Method, StatusCode, Url};
use tracing::debug;

use s3ctl_core::{Error, Result, Settings};

/// Characters percent-encoded in object keys. `/` stays verbatim as the
/// path delimiter.
const KEY_ENCODE: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'/')
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'~');

/// Resource path for an object: `/bucket/encoded-key`
pub fn object_path(bucket: &str, key: &str) -> String {
    format!("/{bucket}/{}", utf8_percent_encode(key, KEY_ENCODE))
}

/// Resource path for a bucket root: `/bucket/`
pub fn bucket_path(bucket: &str) -> String {
    format!("/{bucket}/")
}

/// Render a timestamp as an RFC 1123 `Date` header value.
pub fn http_date(when: DateTime<Utc>) -> String {
    when.format("%a, %d %b %Y %T GMT").to_string()
}

/// One HTTP call, assembled by the operation layer and signed before
/// execution. Discarded after the call completes.
#[derive(Debug)]
pub struct RequestDescriptor {
    pub method: Method,
    /// Encoded resource path, always starting with `/`
    pub path: String,
    /// Query parameters; never signed sub-resources
    pub query: Vec<(String, String)>,
    pub headers: HeaderMap,
    /// Optional streamed request body
    pub body: Option<Body>,
    /// Declared upload length, sent as `Content-Length`
    pub content_length: Option<u64>,
    /// Total deadline; left unset for transfers
    pub timeout: Option<Duration>,
}

impl RequestDescriptor {
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            query: Vec::new(),
            headers: HeaderMap::new(),
            body: None,
            content_length: None,
            timeout: None,
        }
    }

    pub fn with_query(mut self, name: &str, value: impl Into<String>) -> Self {
        self.query.push((name.to_string(), value.into()));
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    pub fn with_body(mut self, body: Body, content_length: u64) -> Self {
        self.body = Some(body);
        self.content_length = Some(content_length);
        self
    }
}

/// Wraps an upload stream, counting the bytes actually handed to the
/// transport so partial transfers can be reported exactly.
pub struct CountingStream<S> {
    inner: S,
    counter: Arc<AtomicU64>,
}

impl<S> CountingStream<S> {
    /// Returns the wrapped stream and a shared handle to its byte counter.
    pub fn new(inner: S) -> (Self, Arc<AtomicU64>) {
        let counter = Arc::new(AtomicU64::new(0));
        (
            Self {
                inner,
                counter: Arc::clone(&counter),
            },
            counter,
        )
    }
}

impl<S, E> Stream for CountingStream<S>
where
    S: Stream<Item = std::result::Result<Bytes, E>> + Unpin,
{
    type Item = std::result::Result<Bytes, E>;

    fn poll_next(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        let polled = self.inner.poll_next_unpin(cx);
        if let Poll::Ready(Some(Ok(chunk))) = &polled {
            self.counter.fetch_add(chunk.len() as u64, Ordering::Relaxed);
        }
        polled
    }
}

/// HTTP client bound to one service endpoint.
#[derive(Debug, Clone)]
pub struct Transport {
    http: reqwest::Client,
    endpoint: Url,
}

impl Transport {
    pub fn new(settings: &Settings) -> Result<Self> {
        let endpoint = settings.endpoint_url()?;
        let http = reqwest::Client::builder()
            .user_agent(concat!("s3ctl/", env!("CARGO_PKG_VERSION")))
            .connect_timeout(Duration::from_secs(settings.timeouts.connect_secs))
            .build()
            .map_err(|e| Error::Transport(format!("failed to build HTTP client: {e}")))?;
        Ok(Self { http, endpoint })
    }

    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }

    /// Execute a signed descriptor and surface the raw response.
    pub async fn execute(&self, descriptor: RequestDescriptor) -> Result<ServiceResponse> {
        let url = self.url_for(&descriptor)?;
        debug!(method = %descriptor.method, %url, "dispatching request");

        let RequestDescriptor {
            method,
            headers,
            body,
            content_length,
            timeout,
            ..
        } = descriptor;

        let mut request = self.http.request(method, url).headers(headers);
        if let Some(length) = content_length {
            request = request.header(reqwest::header::CONTENT_LENGTH, length);
        }
        if let Some(body) = body {
            request = request.body(body);
        }
        if let Some(timeout) = timeout {
            request = request.timeout(timeout);
        }

        let response = request.send().await.map_err(map_send_error)?;
        debug!(status = %response.status(), "response received");
        Ok(ServiceResponse { inner: response })
    }

    fn url_for(&self, descriptor: &RequestDescriptor) -> Result<Url> {
        let base = self.endpoint.as_str().trim_end_matches('/');
        let mut url = Url::parse(&format!("{base}{}", descriptor.path))?;
        if !descriptor.query.is_empty() {
            url.query_pairs_mut().extend_pairs(
                descriptor
                    .query
                    .iter()
                    .map(|(name, value)| (name.as_str(), value.as_str())),
            );
        }
        Ok(url)
    }
}

/// A raw service response: status, headers, and a body that can be buffered
/// or drained chunk by chunk.
#[derive(Debug)]
pub struct ServiceResponse {
    inner: reqwest::Response,
}

impl ServiceResponse {
    pub fn status(&self) -> StatusCode {
        self.inner.status()
    }

    pub fn header(&self, name: &str) -> Option<&str> {
        self.inner.headers().get(name).and_then(|v| v.to_str().ok())
    }

    /// Buffer the whole body. Only for listing and error documents, never
    /// for object payloads.
    pub async fn bytes(self) -> Result<Bytes> {
        self.inner
            .bytes()
            .await
            .map_err(|e| Error::Transport(format!("error reading response body: {e}")))
    }

    /// Next chunk of the body stream, `None` once the stream ends.
    pub async fn chunk(&mut self) -> Result<Option<Bytes>> {
        self.inner
            .chunk()
            .await
            .map_err(|e| Error::Transport(e.to_string()))
    }
}

fn map_send_error(err: reqwest::Error) -> Error {
    if err.is_timeout() {
        Error::Transport(format!("request timed out: {err}"))
    } else if err.is_connect() {
        Error::Transport(format!("connection failed: {err}"))
    } else {
        Error::Transport(err.to_string())
    }
}

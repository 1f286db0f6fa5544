//! Outbound fetch with host-specific headers and bounded retry.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use bytes::Bytes;
use http::header::{HeaderMap, HeaderValue, ACCEPT, ORIGIN, USER_AGENT};
use http::StatusCode;
use reqwest::Client;
use thiserror::Error;
use tracing::debug;
use url::Url;

use super::error::{ProxyError, ProxyResult};

/// Total attempts per fetch, including the first.
pub const MAX_ATTEMPTS: usize = 3;

/// The NWS API wants callers to identify themselves.
const NWS_API_HOST: &str = "api.weather.gov";
const NWS_USER_AGENT: &str =
    "(WeatherStar 4000+/v1 (https://battaglia.ddns.net/twc; vbguyny@gmail.com)";
const NWS_ACCEPT: &str = "application/vnd.noaa.dwml+xml";

/// Everyone else gets a browser-like user-agent so third-party sites don't
/// block us as automation.
const BROWSER_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) \
     AppleWebKit/537.36 (KHTML, like Gecko) Chrome/87.0.4280.88 Safari/537.36";

/// A transport-level failure: connect, DNS, TLS. Retryable.
#[derive(Debug, Error)]
#[error("{0}")]
pub struct TransportError(pub String);

/// Outcome of a single GET attempt that produced an HTTP response.
#[derive(Debug, Clone)]
pub enum Attempt {
    /// 200 with the fully read body.
    Body(Bytes),
    /// 200 whose body could not be fully read. Not retried.
    ReadError(String),
    /// Any non-200 status.
    Status(StatusCode),
}

/// One GET attempt against an upstream. The real implementation rides on
/// `reqwest`; tests script attempts through [`MockTransport`].
#[async_trait]
pub trait UpstreamTransport: Send + Sync {
    async fn get(&self, url: &Url, headers: &HeaderMap) -> Result<Attempt, TransportError>;
}

/// `reqwest`-backed transport.
pub struct HttpTransport {
    client: Client,
}

impl HttpTransport {
    pub fn new(client: Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl UpstreamTransport for HttpTransport {
    async fn get(&self, url: &Url, headers: &HeaderMap) -> Result<Attempt, TransportError> {
        let response = self
            .client
            .get(url.clone())
            .headers(headers.clone())
            .send()
            .await
            .map_err(|e| TransportError(e.to_string()))?;

        let status = response.status();
        if status != StatusCode::OK {
            return Ok(Attempt::Status(status));
        }

        match response.bytes().await {
            Ok(body) => Ok(Attempt::Body(body)),
            Err(e) => Ok(Attempt::ReadError(e.to_string())),
        }
    }
}

/// Scripted transport for tests: pops one outcome per attempt and counts
/// calls. An exhausted script behaves like a dead network.
pub struct MockTransport {
    script: Mutex<VecDeque<Result<Attempt, TransportError>>>,
    calls: AtomicUsize,
}

impl MockTransport {
    pub fn new(script: Vec<Result<Attempt, TransportError>>) -> Self {
        Self {
            script: Mutex::new(script.into_iter().collect()),
            calls: AtomicUsize::new(0),
        }
    }

    /// A transport that serves each given body once, in order.
    pub fn bodies(bodies: Vec<&'static [u8]>) -> Self {
        Self::new(
            bodies
                .into_iter()
                .map(|b| Ok(Attempt::Body(Bytes::from_static(b))))
                .collect(),
        )
    }

    /// Number of attempts made so far.
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl UpstreamTransport for MockTransport {
    async fn get(&self, _url: &Url, _headers: &HeaderMap) -> Result<Attempt, TransportError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let mut script = self.script.lock().expect("mock script lock poisoned");
        script
            .pop_front()
            .unwrap_or_else(|| Err(TransportError("mock script exhausted".to_string())))
    }
}

/// Fetches upstream URLs with up to [`MAX_ATTEMPTS`] tries.
///
/// Transport failures and 5xx responses retry immediately, with no backoff;
/// any other non-200 status fails the fetch on the spot.
pub struct Fetcher {
    transport: Arc<dyn UpstreamTransport>,
}

impl Fetcher {
    pub fn new() -> Self {
        let client = Client::builder()
            .build()
            .expect("Failed to create HTTP client");
        Self {
            transport: Arc::new(HttpTransport::new(client)),
        }
    }

    /// Builds a fetcher over a custom transport.
    pub fn with_transport(transport: Arc<dyn UpstreamTransport>) -> Self {
        Self { transport }
    }

    /// Performs the GET, returning the response body on a 200.
    pub async fn fetch(&self, url: &Url) -> ProxyResult<Bytes> {
        let host = url.host_str().unwrap_or_default().to_string();
        let headers = request_headers(url);

        for attempt in 1..=MAX_ATTEMPTS {
            match self.transport.get(url, &headers).await {
                Err(e) => {
                    debug!(host = %host, attempt, error = %e, "transport failure, retrying");
                }
                Ok(Attempt::Body(body)) => return Ok(body),
                Ok(Attempt::ReadError(e)) => return Err(ProxyError::Io(e)),
                Ok(Attempt::Status(status)) => {
                    if status.is_server_error() {
                        debug!(host = %host, attempt, %status, "server error, retrying");
                        continue;
                    }
                    return Err(ProxyError::Upstream {
                        host,
                        status: status.to_string(),
                    });
                }
            }
        }

        Err(ProxyError::FetchFailed)
    }
}

impl Default for Fetcher {
    fn default() -> Self {
        Self::new()
    }
}

/// Headers for one upstream request: an `Origin` reflecting the target, and
/// either the identifying NWS user-agent plus its DWML `Accept`, or the
/// generic browser user-agent for everyone else.
fn request_headers(url: &Url) -> HeaderMap {
    let mut headers = HeaderMap::new();

    let host = url.host_str().unwrap_or_default();
    let origin = format!("{}://{}", url.scheme(), host);
    if let Ok(value) = HeaderValue::from_str(&origin) {
        headers.insert(ORIGIN, value);
    }

    if host == NWS_API_HOST {
        headers.insert(USER_AGENT, HeaderValue::from_static(NWS_USER_AGENT));
        headers.insert(ACCEPT, HeaderValue::from_static(NWS_ACCEPT));
    } else {
        headers.insert(USER_AGENT, HeaderValue::from_static(BROWSER_USER_AGENT));
    }

    headers
}

//! Proxy error handling module.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;

/// Errors produced while relaying a cross-origin request.
#[derive(Error, Debug)]
pub enum ProxyError {
    /// The `u` query parameter was not a parseable URL.
    #[error("invalid url: {0}")]
    ParseUrl(#[from] url::ParseError),

    /// Target scheme is neither `http` nor `https`.
    #[error("unsupported scheme")]
    UnsupportedScheme,

    /// Target host is not on the allow-list.
    #[error("invalid host")]
    InvalidHost,

    /// Upstream answered with a non-200, non-5xx status. Not retried.
    #[error("{host} says: {status}")]
    Upstream { host: String, status: String },

    /// All fetch attempts were exhausted without a usable response.
    #[error("failed to get")]
    FetchFailed,

    /// The upstream response body could not be read.
    #[error("error reading response: {0}")]
    Io(String),
}

impl ProxyError {
    /// HTTP status this error surfaces as: request-side failures are 400,
    /// upstream failures are 500.
    pub fn status_code(&self) -> StatusCode {
        match self {
            ProxyError::ParseUrl(_)
            | ProxyError::UnsupportedScheme
            | ProxyError::InvalidHost => StatusCode::BAD_REQUEST,
            ProxyError::Upstream { .. } | ProxyError::FetchFailed | ProxyError::Io(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

impl IntoResponse for ProxyError {
    fn into_response(self) -> Response {
        // The client consumes plain text, not a JSON envelope.
        (self.status_code(), self.to_string()).into_response()
    }
}

/// Result type for proxy operations.
pub type ProxyResult<T> = Result<T, ProxyError>;

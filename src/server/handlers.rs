//! HTTP request handlers.

use std::sync::Arc;

use axum::{
    extract::{Query, State},
    http::{header, StatusCode, Uri},
    response::{IntoResponse, Response},
};
use serde::Deserialize;
use tracing::{error, warn};
use url::Url;

use crate::assets::AssetIndex;
use crate::proxy::{allowlist, ProxyError, SharedCacheStore};

/// Application state shared across handlers.
pub struct AppState {
    /// The proxy cache.
    pub cache: SharedCacheStore,

    /// Bundled client files.
    pub assets: AssetIndex,
}

/// Thread-safe shared state.
pub type SharedState = Arc<AppState>;

/// Query parameters of the proxy endpoint.
#[derive(Debug, Deserialize)]
pub struct CorsQuery {
    /// URL-encoded target URL.
    #[serde(default)]
    pub u: String,
}

/// `GET /cors?u=<target>` — relays an allow-listed upstream URL through the
/// cache and returns its bytes verbatim.
pub async fn cors_proxy(
    State(state): State<SharedState>,
    Query(query): Query<CorsQuery>,
) -> Result<Response, ProxyError> {
    let target = Url::parse(&query.u).map_err(|e| {
        warn!(raw = %query.u, "unparseable CORS target");
        e
    })?;
    if let Err(err) = allowlist::validate(&target) {
        warn!(
            host = target.host_str().unwrap_or_default(),
            error = %err,
            "rejected CORS target"
        );
        return Err(err);
    }

    match state.cache.get(target.clone()).await {
        Ok(content) => {
            // Pass the bytes through without forcing a content-type.
            let mut response = content.into_response();
            response.headers_mut().remove(header::CONTENT_TYPE);
            Ok(response)
        }
        Err(err) => {
            error!(
                host = target.host_str().unwrap_or_default(),
                error = %err,
                "error serving CORS request"
            );
            Err(err)
        }
    }
}

/// Fallback handler: serves the bundled client, resolving paths
/// case-insensitively.
pub async fn serve_asset(State(state): State<SharedState>, uri: Uri) -> Response {
    let Some(path) = state.assets.resolve(uri.path()) else {
        return (StatusCode::NOT_FOUND, "404 page not found").into_response();
    };

    match tokio::fs::read(path).await {
        Ok(content) => {
            let mime = mime_guess::from_path(path).first_or_octet_stream();
            ([(header::CONTENT_TYPE, mime.as_ref())], content).into_response()
        }
        Err(err) => {
            warn!(path = %path.display(), error = %err, "failed to read indexed asset");
            (StatusCode::NOT_FOUND, "404 page not found").into_response()
        }
    }
}

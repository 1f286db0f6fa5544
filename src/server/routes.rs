//! Router definition.

use axum::{routing::get, Router};
use tower_http::trace::TraceLayer;

use super::handlers::{self, SharedState};

/// Creates the router: the proxy endpoint plus a catch-all for the bundled
/// client.
pub fn create_router(state: SharedState) -> Router {
    Router::new()
        .route("/cors", get(handlers::cors_proxy))
        .fallback(get(handlers::serve_asset))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

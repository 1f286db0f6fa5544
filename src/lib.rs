//! Weatherdeck: serves a bundled weather client and relays its cross-origin
//! data requests through a per-URL cache with host-specific expiry.

pub mod assets;
pub mod proxy;
pub mod server;
pub mod stations;

pub use assets::AssetIndex;
pub use proxy::allowlist::ALLOWED_HOSTS;
pub use proxy::{
    CacheStore, ExpiryPolicy, Fetcher, HttpTransport, MockTransport, ProxyError, ProxyResult,
    SharedCacheStore, UpstreamTransport,
};
pub use server::{create_router, AppState, SharedState};
pub use stations::{Station, StationError};

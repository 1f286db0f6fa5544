//! The proxy cache: allow-list validation, bounded-retry fetch, and per-URL
//! memoization with host-specific expiry.

pub mod allowlist;
pub mod cache;
pub mod error;
pub mod expiry;
pub mod fetch;

pub use cache::{CacheStore, SharedCacheStore};
pub use error::{ProxyError, ProxyResult};
pub use expiry::ExpiryPolicy;
pub use fetch::{Fetcher, HttpTransport, MockTransport, UpstreamTransport};

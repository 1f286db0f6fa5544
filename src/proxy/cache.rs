//! Per-URL cache over the fetcher.

use std::sync::Arc;
use std::time::Instant;

use bytes::Bytes;
use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use tokio::sync::RwLock;
use tracing::debug;
use url::Url;

use super::error::{ProxyError, ProxyResult};
use super::expiry::ExpiryPolicy;
use super::fetch::Fetcher;

/// One cached upstream response, guarded by its own lock.
///
/// The lock covers both fields; they are never touched without it.
pub struct CacheEntry {
    state: RwLock<EntryState>,
}

#[derive(Default)]
struct EntryState {
    content: Bytes,
    expires_at: Option<Instant>,
}

impl EntryState {
    /// A never-fetched entry has no expiry and counts as already stale.
    fn is_fresh(&self, now: Instant) -> bool {
        matches!(self.expires_at, Some(at) if now < at)
    }
}

impl CacheEntry {
    fn empty() -> Self {
        Self {
            state: RwLock::new(EntryState::default()),
        }
    }
}

/// Concurrent URL-to-entry cache. Entries are created on first request and
/// live for the process lifetime; there is no eviction.
///
/// Lookups on different URLs never contend. Lookups on the same URL serialize
/// only while one of them holds the entry's write lock for a fetch.
pub struct CacheStore {
    entries: DashMap<String, Arc<CacheEntry>>,
    fetcher: Fetcher,
    expiry: ExpiryPolicy,
}

/// Shared handle to a [`CacheStore`].
pub type SharedCacheStore = Arc<CacheStore>;

impl CacheStore {
    pub fn new(fetcher: Fetcher) -> Self {
        Self::with_expiry(fetcher, ExpiryPolicy::default())
    }

    pub fn with_expiry(fetcher: Fetcher, expiry: ExpiryPolicy) -> Self {
        Self {
            entries: DashMap::new(),
            fetcher,
            expiry,
        }
    }

    /// Number of distinct URLs seen so far.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Returns cached content for `url`, fetching upstream if the entry is
    /// missing or stale.
    ///
    /// The fetch runs on its own task so it completes even when the caller
    /// goes away mid-request; the next request then finds a warm cache.
    pub async fn get(self: &Arc<Self>, url: Url) -> ProxyResult<Bytes> {
        let store = Arc::clone(self);
        tokio::spawn(async move { store.get_inner(&url).await })
            .await
            .map_err(|e| ProxyError::Io(e.to_string()))?
    }

    async fn get_inner(&self, url: &Url) -> ProxyResult<Bytes> {
        let key = url.as_str();
        let (entry, existed) = self.entry(key);

        if existed {
            let state = entry.state.read().await;
            if state.is_fresh(Instant::now()) {
                debug!(url = key, "cache hit");
                return Ok(state.content.clone());
            }
        }

        // Callers that raced on the same stale key each refetch here,
        // serialized by the write lock; freshness is deliberately not
        // re-checked after acquiring it.
        let mut state = entry.state.write().await;
        debug!(url = key, "cache miss, fetching");
        let content = self.fetcher.fetch(url).await?;

        let ttl = self.expiry.ttl(url.host_str().unwrap_or_default());
        state.content = content.clone();
        state.expires_at = Some(Instant::now() + ttl);
        Ok(content)
    }

    /// Atomic load-or-create. Two callers racing on an unseen key observe
    /// the same entry; the flag reports whether it pre-existed.
    fn entry(&self, key: &str) -> (Arc<CacheEntry>, bool) {
        match self.entries.entry(key.to_string()) {
            Entry::Occupied(slot) => (Arc::clone(slot.get()), true),
            Entry::Vacant(slot) => {
                let entry = Arc::new(CacheEntry::empty());
                slot.insert(Arc::clone(&entry));
                (entry, false)
            }
        }
    }
}

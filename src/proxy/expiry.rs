//! Per-host cache expiry policy.

use std::collections::HashMap;
use std::time::Duration;

/// TTL applied to hosts without an override.
pub const DEFAULT_TTL: Duration = Duration::from_secs(3600);

/// Maps an upstream host to the time-to-live of its cached responses.
///
/// Immutable after construction; lookups have no side effects.
#[derive(Debug, Clone)]
pub struct ExpiryPolicy {
    default: Duration,
    overrides: HashMap<String, Duration>,
}

impl Default for ExpiryPolicy {
    /// The standard policy: one hour for everything, except the NIU air
    /// quality feed (5 minutes, it updates often) and the USNO almanac
    /// (3 hours, it barely changes).
    fn default() -> Self {
        let mut overrides = HashMap::new();
        overrides.insert("www2.ehs.niu.edu".to_string(), Duration::from_secs(300));
        overrides.insert("api.usno.navy.mil".to_string(), Duration::from_secs(10800));
        Self {
            default: DEFAULT_TTL,
            overrides,
        }
    }
}

impl ExpiryPolicy {
    /// A policy that applies one TTL to every host. Used by tests to force
    /// fast expiry.
    pub fn fixed(ttl: Duration) -> Self {
        Self {
            default: ttl,
            overrides: HashMap::new(),
        }
    }

    /// Returns the TTL for content fetched from `host`.
    pub fn ttl(&self, host: &str) -> Duration {
        self.overrides.get(host).copied().unwrap_or(self.default)
    }
}

//! In-memory TTL cache for extraction results.
//!
//! Process-lifetime key -> (payload, expiry) store. Entries expire lazily
//! on lookup; there is no background sweeper and no capacity bound (TTL
//! bounds growth, but a high task-diversity workload will grow the map;
//! see DESIGN.md).

pub mod clock;
pub mod key;

pub use clock::{Clock, SystemClock};
pub use key::{cache_key, content_hash};

use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

struct CacheEntry {
    payload: Vec<String>,
    expires_at: Instant,
}

/// Shared, mutable TTL cache.
///
/// Interior mutability behind a `Mutex` so one instance can be shared
/// across concurrently running handlers. Each `get`/`set` is a single
/// short critical section.
pub struct MemoryCache {
    entries: Mutex<HashMap<String, CacheEntry>>,
    clock: Arc<dyn Clock>,
    default_ttl: Duration,
}

impl MemoryCache {
    /// Create a cache using the system clock.
    pub fn new(default_ttl: Duration) -> Self {
        Self::with_clock(default_ttl, Arc::new(SystemClock))
    }

    /// Create a cache with an injected clock, for deterministic tests.
    pub fn with_clock(default_ttl: Duration, clock: Arc<dyn Clock>) -> Self {
        Self { entries: Mutex::new(HashMap::new()), clock, default_ttl }
    }

    /// Look up a payload. An entry whose expiry has passed is removed and
    /// reported as absent.
    pub fn get(&self, key: &str) -> Option<Vec<String>> {
        let now = self.clock.now();
        let mut entries = self.entries.lock().expect("cache lock poisoned");

        match entries.get(key) {
            Some(entry) if now < entry.expires_at => Some(entry.payload.clone()),
            Some(_) => {
                entries.remove(key);
                tracing::debug!(key, "cache entry expired");
                None
            }
            None => None,
        }
    }

    /// Store a payload under the default TTL.
    pub fn set(&self, key: &str, payload: Vec<String>) {
        self.set_with_ttl(key, payload, self.default_ttl);
    }

    /// Store a payload with an explicit TTL.
    pub fn set_with_ttl(&self, key: &str, payload: Vec<String>, ttl: Duration) {
        let expires_at = self.clock.now() + ttl;
        let mut entries = self.entries.lock().expect("cache lock poisoned");
        entries.insert(key.to_string(), CacheEntry { payload, expires_at });
    }

    /// Number of stored entries, including not-yet-purged expired ones.
    pub fn len(&self) -> usize {
        self.entries.lock().expect("cache lock poisoned").len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use super::clock::ManualClock;

    #[test]
    fn test_round_trip() {
        let cache = MemoryCache::new(Duration::from_secs(60));
        cache.set("k", vec!["a".into(), "b".into()]);
        assert_eq!(cache.get("k"), Some(vec!["a".to_string(), "b".to_string()]));
    }

    #[test]
    fn test_miss_on_unknown_key() {
        let cache = MemoryCache::new(Duration::from_secs(60));
        assert_eq!(cache.get("nope"), None);
    }

    #[test]
    fn test_entry_expires_after_ttl() {
        let clock = Arc::new(ManualClock::new());
        let cache = MemoryCache::with_clock(Duration::from_secs(60), clock.clone());

        cache.set("k", vec!["v".into()]);
        clock.advance(Duration::from_secs(59));
        assert!(cache.get("k").is_some());

        clock.advance(Duration::from_secs(1));
        assert_eq!(cache.get("k"), None);
    }

    #[test]
    fn test_expired_entry_purged_lazily() {
        let clock = Arc::new(ManualClock::new());
        let cache = MemoryCache::with_clock(Duration::from_secs(10), clock.clone());

        cache.set("k", vec!["v".into()]);
        assert_eq!(cache.len(), 1);

        // Still present in the map until the next lookup touches it.
        clock.advance(Duration::from_secs(11));
        assert_eq!(cache.len(), 1);
        assert_eq!(cache.get("k"), None);
        assert_eq!(cache.len(), 0);
    }

    #[test]
    fn test_explicit_ttl_overrides_default() {
        let clock = Arc::new(ManualClock::new());
        let cache = MemoryCache::with_clock(Duration::from_secs(60), clock.clone());

        cache.set_with_ttl("k", vec!["v".into()], Duration::from_secs(300));
        clock.advance(Duration::from_secs(120));
        assert!(cache.get("k").is_some());
    }

    #[test]
    fn test_overwrite_refreshes_expiry() {
        let clock = Arc::new(ManualClock::new());
        let cache = MemoryCache::with_clock(Duration::from_secs(10), clock.clone());

        cache.set("k", vec!["old".into()]);
        clock.advance(Duration::from_secs(8));
        cache.set("k", vec!["new".into()]);
        clock.advance(Duration::from_secs(8));
        assert_eq!(cache.get("k"), Some(vec!["new".to_string()]));
    }
}

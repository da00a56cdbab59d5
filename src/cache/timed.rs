//! In-memory cache with per-entry expiry
//!
//! Provides a `TimedCache` that keeps values for a fixed time-to-live and
//! evicts them lazily the next time they are read after expiring.

use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};
use std::time::Duration;

use tokio::time::Instant;
use tracing::debug;

/// Default time-to-live for cached entries (5 minutes)
pub const DEFAULT_TTL: Duration = Duration::from_secs(5 * 60);

/// A single cached value together with its storage and expiry times
#[derive(Debug, Clone)]
struct CacheEntry<V> {
    /// The cached value
    value: V,
    /// When the value was stored
    stored_at: Instant,
    /// When the value stops being served
    expires_at: Instant,
}

/// Key/value store with time-based expiry
///
/// Entries are never evicted for capacity reasons; the key space is bounded by
/// the fixed set of backend endpoints. An expired entry is removed the first
/// time it is read after its deadline.
///
/// All operations take `&self` and lock an internal mutex that is never held
/// across an `.await`, so a single instance can be shared through an `Arc`
/// between concurrent loads.
#[derive(Debug)]
pub struct TimedCache<V> {
    entries: Mutex<HashMap<String, CacheEntry<V>>>,
    default_ttl: Duration,
}

impl<V: Clone> Default for TimedCache<V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<V: Clone> TimedCache<V> {
    /// Creates an empty cache using the 5 minute default TTL
    pub fn new() -> Self {
        Self::with_ttl(DEFAULT_TTL)
    }

    /// Creates an empty cache with a custom default TTL
    pub fn with_ttl(default_ttl: Duration) -> Self {
        Self {
            entries: Mutex::new(HashMap::new()),
            default_ttl,
        }
    }

    /// TTL applied by [`TimedCache::set`]
    pub fn default_ttl(&self) -> Duration {
        self.default_ttl
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<String, CacheEntry<V>>> {
        // A panic while holding the lock cannot leave a half-written entry,
        // so a poisoned map is still consistent.
        self.entries
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Returns the value stored under `key` if it has not expired
    ///
    /// An expired entry is removed and `None` is returned.
    pub fn get(&self, key: &str) -> Option<V> {
        let mut entries = self.lock();
        let now = Instant::now();

        match entries.get(key) {
            Some(entry) if now <= entry.expires_at => Some(entry.value.clone()),
            Some(entry) => {
                let age = now.duration_since(entry.stored_at);
                debug!(key, age_ms = age.as_millis() as u64, "evicting expired cache entry");
                entries.remove(key);
                None
            }
            None => None,
        }
    }

    /// How long ago the value under `key` was stored, if it has not expired
    pub fn age(&self, key: &str) -> Option<Duration> {
        let now = Instant::now();
        self.lock()
            .get(key)
            .filter(|entry| now <= entry.expires_at)
            .map(|entry| now.duration_since(entry.stored_at))
    }

    /// Stores `value` under `key` with the default TTL, replacing any previous entry
    pub fn set(&self, key: impl Into<String>, value: V) {
        self.set_with_ttl(key, value, self.default_ttl);
    }

    /// Stores `value` under `key` with an explicit TTL, replacing any previous entry
    pub fn set_with_ttl(&self, key: impl Into<String>, value: V, ttl: Duration) {
        let stored_at = Instant::now();
        let entry = CacheEntry {
            value,
            stored_at,
            expires_at: stored_at + ttl,
        };
        self.lock().insert(key.into(), entry);
    }

    /// Removes every entry
    pub fn clear(&self) {
        self.lock().clear();
    }

    /// Number of stored entries, including expired ones not yet read
    pub fn len(&self) -> usize {
        self.lock().len()
    }

    /// Whether the cache holds no entries at all
    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }
}

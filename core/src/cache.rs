//! Process-wide response cache with a fixed time-to-live.
//!
//! # Design
//! `ResponseCache` is a cheap handle around shared state: cloning it shares
//! the same entries, which is how one cache is handed to every resource
//! client. Values are stored type-erased and cloned out on read; a read with
//! the wrong type is a miss. Expiry is passive: an entry older than the TTL
//! reads as absent but stays until overwritten or cleared.
//!
//! Timestamps use `tokio::time::Instant` so paused-clock tests can move past
//! the TTL without sleeping.

use std::any::Any;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use parking_lot::Mutex;
use tokio::time::Instant;
use tracing::trace;

pub const DEFAULT_TTL: Duration = Duration::from_secs(5 * 60);

/// Deterministic key for one logical read.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CacheKey(String);

impl CacheKey {
    /// `base`, for listing every record.
    pub fn list(base: &str) -> Self {
        Self(base.to_string())
    }

    /// `base/id`.
    pub fn by_id(base: &str, id: u64) -> Self {
        Self(format!("{base}/{id}"))
    }

    /// `base?field=value`.
    pub fn by_field(base: &str, field: &str, value: &str) -> Self {
        Self(format!("{base}?{field}={value}"))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CacheKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

struct CacheEntry {
    value: Box<dyn Any + Send + Sync>,
    stored_at: Instant,
}

/// Shared key/value store with TTL.
#[derive(Clone)]
pub struct ResponseCache {
    entries: Arc<Mutex<HashMap<CacheKey, CacheEntry>>>,
    ttl: Duration,
}

impl Default for ResponseCache {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for ResponseCache {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ResponseCache")
            .field("entries", &self.entries.lock().len())
            .field("ttl", &self.ttl)
            .finish()
    }
}

impl ResponseCache {
    pub fn new() -> Self {
        Self::with_ttl(DEFAULT_TTL)
    }

    pub fn with_ttl(ttl: Duration) -> Self {
        Self {
            entries: Arc::new(Mutex::new(HashMap::new())),
            ttl,
        }
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// The stored value, unless missing, expired, or of another type.
    pub fn get<T>(&self, key: &CacheKey) -> Option<T>
    where
        T: Clone + Send + Sync + 'static,
    {
        let entries = self.entries.lock();
        let entry = entries.get(key)?;
        if entry.stored_at.elapsed() > self.ttl {
            trace!(%key, "cache entry expired");
            return None;
        }
        entry.value.downcast_ref::<T>().cloned()
    }

    /// Store `value`, replacing any previous entry for `key`.
    pub fn set<T>(&self, key: CacheKey, value: T)
    where
        T: Send + Sync + 'static,
    {
        let entry = CacheEntry {
            value: Box::new(value),
            stored_at: Instant::now(),
        };
        self.entries.lock().insert(key, entry);
    }

    pub fn clear(&self) {
        self.entries.lock().clear();
    }

    /// Number of stored entries, expired ones included.
    pub fn len(&self) -> usize {
        self.entries.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

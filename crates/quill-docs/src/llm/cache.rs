//! In-memory response cache with sliding expiry, keyed by a BLAKE3 hash of the source text.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use blake3::Hasher;
use dashmap::DashMap;
use tokio::sync::Mutex;
use tokio::time::Instant;
use tracing::trace;

use super::config::LlmConfig;
use super::error::Result;

/// Default sliding expiry of a cached comment.
pub const DEFAULT_TTL: Duration = Duration::from_secs(30);

/// A cached comment block.
#[derive(Debug, Clone)]
pub struct CacheEntry {
    /// Canonical comment text, unindented.
    pub value: String,
    /// When the entry was first stored.
    pub created_at: Instant,
    /// Last successful lookup; expiry is measured from here.
    pub last_access: Instant,
}

/// Cache of generated comments.
///
/// Every lookup that hits resets the entry's clock. Expired entries are
/// dropped lazily when a lookup finds them, or by [`ResponseCache::purge_expired`].
/// Concurrent generations for the same key are serialized so only one of them
/// reaches the generator.
#[derive(Debug)]
pub struct ResponseCache {
    entries: DashMap<String, CacheEntry>,
    in_flight: DashMap<String, Arc<Mutex<()>>>,
    ttl: Duration,
    enabled: bool,
}

impl Default for ResponseCache {
    fn default() -> Self {
        Self::new(DEFAULT_TTL)
    }
}

impl ResponseCache {
    /// Creates an enabled cache with the given sliding expiry.
    pub fn new(ttl: Duration) -> Self {
        Self {
            entries: DashMap::new(),
            in_flight: DashMap::new(),
            ttl,
            enabled: true,
        }
    }

    /// Creates a cache that never stores anything.
    pub fn disabled() -> Self {
        Self {
            enabled: false,
            ..Self::default()
        }
    }

    pub fn from_config(config: &LlmConfig) -> Self {
        if config.cache_enabled {
            Self::new(config.cache_ttl())
        } else {
            Self::disabled()
        }
    }

    /// Cache key for a declaration's source text: the BLAKE3 hex digest.
    pub fn cache_key(source_text: &str) -> String {
        let mut hasher = Hasher::new();
        hasher.update(source_text.as_bytes());
        hasher.finalize().to_hex().to_string()
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Number of stored entries, expired ones included until they are evicted.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Returns the cached value and resets its clock, or `None` on a miss.
    pub fn get(&self, key: &str) -> Option<String> {
        if !self.enabled {
            return None;
        }

        let now = Instant::now();
        match self.entries.get_mut(key) {
            Some(mut entry) if now.duration_since(entry.last_access) < self.ttl => {
                entry.last_access = now;
                return Some(entry.value.clone());
            }
            Some(_) => {}
            None => return None,
        }

        let ttl = self.ttl;
        if self
            .entries
            .remove_if(key, |_, entry| now.duration_since(entry.last_access) >= ttl)
            .is_some()
        {
            trace!(key, "evicted expired cache entry");
        }
        None
    }

    /// Stores a value, replacing any previous entry for the key.
    pub fn insert(&self, key: impl Into<String>, value: impl Into<String>) {
        if !self.enabled {
            return;
        }

        let now = Instant::now();
        self.entries.insert(
            key.into(),
            CacheEntry {
                value: value.into(),
                created_at: now,
                last_access: now,
            },
        );
    }

    /// Removes every expired entry and returns how many were dropped.
    pub fn purge_expired(&self) -> usize {
        let now = Instant::now();
        let before = self.entries.len();
        self.entries
            .retain(|_, entry| now.duration_since(entry.last_access) < self.ttl);
        before.saturating_sub(self.entries.len())
    }

    /// Returns the cached value for `key`, or runs `generate` and stores its output.
    ///
    /// The boolean is `true` on a cache hit. Callers racing on the same key
    /// wait for the first generation and then read its result. A failed or
    /// cancelled generation stores nothing.
    pub async fn get_or_try_insert_with<F, Fut>(&self, key: &str, generate: F) -> Result<(String, bool)>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<String>>,
    {
        if !self.enabled {
            return generate().await.map(|value| (value, false));
        }

        if let Some(hit) = self.get(key) {
            return Ok((hit, true));
        }

        let slot = InFlightSlot::claim(self, key);
        let _guard = slot.lock.lock().await;

        if let Some(hit) = self.get(key) {
            return Ok((hit, true));
        }

        let value = generate().await?;
        self.insert(key, value.clone());
        Ok((value, false))
    }
}

/// Membership in the in-flight map for one key. The last holder removes the map entry.
struct InFlightSlot<'a> {
    cache: &'a ResponseCache,
    key: &'a str,
    lock: Arc<Mutex<()>>,
}

impl<'a> InFlightSlot<'a> {
    fn claim(cache: &'a ResponseCache, key: &'a str) -> Self {
        let lock = cache
            .in_flight
            .entry(key.to_string())
            .or_insert_with(|| Arc::new(Mutex::new(())))
            .clone();
        Self { cache, key, lock }
    }
}

impl Drop for InFlightSlot<'_> {
    fn drop(&mut self) {
        // The map and this slot hold two references; more means someone else is waiting.
        self.cache.in_flight.remove_if(self.key, |_, lock| {
            Arc::ptr_eq(lock, &self.lock) && Arc::strong_count(lock) <= 2
        });
    }
}

//! Namespaced key-value cache with a flat time-to-live.
//!
//! Every slot holds a `{ "data": ..., "expiresAt": <epoch ms> }` envelope
//! stored under `namespace + key`. Expiry is lazy: a read that finds an
//! expired envelope deletes the slot and reports a miss. There is no
//! background sweep.

use std::fmt;
use std::marker::PhantomData;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::backend::StorageBackend;
use crate::clock::Clock;
use crate::error::{StorageError, StorageResult};

/// Prefix for every slot the cache owns.
pub const DEFAULT_NAMESPACE: &str = "bento_cache_";

/// Time-to-live applied when neither the key nor the call supplies one.
pub const DEFAULT_TTL: Duration = Duration::from_millis(3_600_000);

/// Stored envelope.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CacheEntry<T> {
    pub data: T,
    pub expires_at: i64,
}

impl<T> CacheEntry<T> {
    pub fn is_expired(&self, now_ms: i64) -> bool {
        self.expires_at < now_ms
    }
}

/// Typed handle to one cache slot.
///
/// The type parameter fixes what the slot holds; a key may also carry its
/// own TTL, which takes precedence over the cache default.
pub struct CacheKey<T> {
    name: &'static str,
    ttl: Option<Duration>,
    _marker: PhantomData<fn() -> T>,
}

impl<T> CacheKey<T> {
    pub const fn new(name: &'static str) -> Self {
        Self {
            name,
            ttl: None,
            _marker: PhantomData,
        }
    }

    pub const fn with_ttl(name: &'static str, ttl: Duration) -> Self {
        Self {
            name,
            ttl: Some(ttl),
            _marker: PhantomData,
        }
    }

    pub const fn name(&self) -> &'static str {
        self.name
    }

    pub const fn ttl(&self) -> Option<Duration> {
        self.ttl
    }
}

impl<T> Clone for CacheKey<T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for CacheKey<T> {}

impl<T> fmt::Debug for CacheKey<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CacheKey")
            .field("name", &self.name)
            .field("ttl", &self.ttl)
            .finish()
    }
}

/// Configuration for the cache.
#[derive(Debug, Clone)]
pub struct CacheConfig {
    /// Prefix applied to every slot name.
    pub namespace: String,
    /// TTL used when neither the key nor the call supplies one.
    pub default_ttl: Duration,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            namespace: DEFAULT_NAMESPACE.to_string(),
            default_ttl: DEFAULT_TTL,
        }
    }
}

impl CacheConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_namespace(mut self, namespace: impl Into<String>) -> Self {
        self.namespace = namespace.into();
        self
    }

    pub fn with_default_ttl(mut self, ttl: Duration) -> Self {
        self.default_ttl = ttl;
        self
    }
}

/// Statistics about cache usage.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CacheStats {
    pub hits: u64,
    pub misses: u64,
    /// Reads that found and purged an expired slot.
    pub expirations: u64,
}

impl CacheStats {
    /// Calculate the hit rate (0.0 to 1.0).
    pub fn hit_rate(&self) -> f64 {
        let total = self.hits + self.misses;
        if total == 0 {
            0.0
        } else {
            self.hits as f64 / total as f64
        }
    }
}

#[derive(Debug, Default)]
struct Counters {
    hits: AtomicU64,
    misses: AtomicU64,
    expirations: AtomicU64,
}

struct CacheInner {
    backend: Arc<dyn StorageBackend>,
    clock: Arc<dyn Clock>,
    config: CacheConfig,
    counters: Counters,
}

/// Namespaced TTL cache. Cloning is cheap and clones share state.
#[derive(Clone)]
pub struct Cache {
    inner: Arc<CacheInner>,
}

impl fmt::Debug for Cache {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Cache")
            .field("config", &self.inner.config)
            .field("stats", &self.stats())
            .finish()
    }
}

impl Cache {
    pub fn new(backend: Arc<dyn StorageBackend>, clock: Arc<dyn Clock>, config: CacheConfig) -> Self {
        Self {
            inner: Arc::new(CacheInner {
                backend,
                clock,
                config,
                counters: Counters::default(),
            }),
        }
    }

    pub fn config(&self) -> &CacheConfig {
        &self.inner.config
    }

    pub fn backend(&self) -> &Arc<dyn StorageBackend> {
        &self.inner.backend
    }

    pub fn now_ms(&self) -> i64 {
        self.inner.clock.now_ms()
    }

    /// Backend key for a logical slot name.
    pub fn slot(&self, name: &str) -> String {
        format!("{}{}", self.inner.config.namespace, name)
    }

    // ------------------------------------------------------------------------
    // Typed access
    // ------------------------------------------------------------------------

    /// Store a value with the key's TTL, or the cache default.
    pub fn set<T: Serialize>(&self, key: &CacheKey<T>, value: &T) -> StorageResult<()> {
        let ttl = key.ttl().unwrap_or(self.inner.config.default_ttl);
        self.set_with_ttl(key, value, ttl)
    }

    pub fn set_with_ttl<T: Serialize>(
        &self,
        key: &CacheKey<T>,
        value: &T,
        ttl: Duration,
    ) -> StorageResult<()> {
        let data = serde_json::to_value(value)?;
        self.write_entry(key.name(), data, ttl)
    }

    /// Read a live value. Expired slots are deleted and read as `None`.
    ///
    /// A slot whose envelope or payload does not decode is reported as
    /// [`StorageError::Corrupt`] and left untouched.
    pub fn get<T: DeserializeOwned>(&self, key: &CacheKey<T>) -> StorageResult<Option<T>> {
        match self.read_entry(key.name())? {
            Some(data) => serde_json::from_value(data)
                .map(Some)
                .map_err(|e| self.corrupt(key.name(), format!("unexpected shape: {}", e))),
            None => Ok(None),
        }
    }

    pub fn remove<T>(&self, key: &CacheKey<T>) -> StorageResult<()> {
        self.remove_value(key.name())
    }

    /// True when the slot holds a live value of any shape.
    pub fn contains<T>(&self, key: &CacheKey<T>) -> StorageResult<bool> {
        Ok(self.read_entry(key.name())?.is_some())
    }

    // ------------------------------------------------------------------------
    // Untyped access
    // ------------------------------------------------------------------------

    pub fn set_value(&self, name: &str, value: Value, ttl: Option<Duration>) -> StorageResult<()> {
        let ttl = ttl.unwrap_or(self.inner.config.default_ttl);
        self.write_entry(name, value, ttl)
    }

    pub fn get_value(&self, name: &str) -> StorageResult<Option<Value>> {
        self.read_entry(name)
    }

    pub fn remove_value(&self, name: &str) -> StorageResult<()> {
        self.inner.backend.remove_item(&self.slot(name))
    }

    /// Delete every slot under this cache's namespace. Other keys in the
    /// backend are left alone. Returns the number of slots removed.
    pub fn clear(&self) -> StorageResult<usize> {
        let namespace = &self.inner.config.namespace;
        let mut removed = 0;
        for key in self.inner.backend.keys()? {
            if key.starts_with(namespace.as_str()) {
                self.inner.backend.remove_item(&key)?;
                removed += 1;
            }
        }
        tracing::debug!(namespace = %namespace, removed, "Cleared cache namespace");
        Ok(removed)
    }

    pub fn stats(&self) -> CacheStats {
        let counters = &self.inner.counters;
        CacheStats {
            hits: counters.hits.load(Ordering::Relaxed),
            misses: counters.misses.load(Ordering::Relaxed),
            expirations: counters.expirations.load(Ordering::Relaxed),
        }
    }

    // ------------------------------------------------------------------------
    // Internals
    // ------------------------------------------------------------------------

    fn write_entry(&self, name: &str, data: Value, ttl: Duration) -> StorageResult<()> {
        let ttl_ms = i64::try_from(ttl.as_millis()).unwrap_or(i64::MAX);
        let entry = CacheEntry {
            data,
            expires_at: self.now_ms().saturating_add(ttl_ms),
        };
        let raw = serde_json::to_string(&entry)?;
        self.inner.backend.set_item(&self.slot(name), &raw)
    }

    fn read_entry(&self, name: &str) -> StorageResult<Option<Value>> {
        let slot = self.slot(name);
        let counters = &self.inner.counters;

        let Some(raw) = self.inner.backend.get_item(&slot)? else {
            counters.misses.fetch_add(1, Ordering::Relaxed);
            return Ok(None);
        };

        let entry: CacheEntry<Value> = serde_json::from_str(&raw)
            .map_err(|e| self.corrupt(name, format!("invalid envelope: {}", e)))?;

        if entry.is_expired(self.now_ms()) {
            self.inner.backend.remove_item(&slot)?;
            counters.expirations.fetch_add(1, Ordering::Relaxed);
            counters.misses.fetch_add(1, Ordering::Relaxed);
            tracing::debug!(key = name, expires_at = entry.expires_at, "Purged expired cache entry");
            return Ok(None);
        }

        counters.hits.fetch_add(1, Ordering::Relaxed);
        Ok(Some(entry.data))
    }

    fn corrupt(&self, name: &str, reason: String) -> StorageError {
        tracing::warn!(key = name, reason = %reason, "Corrupt cache entry");
        StorageError::Corrupt {
            key: name.to_string(),
            reason,
        }
    }
}

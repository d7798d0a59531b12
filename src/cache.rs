//! Query result cache with revalidation windows and tag invalidation.
//!
//! Every request carries a [`CachePolicy`]: how long its result may be reused
//! (the *revalidation window*) and which *invalidation tags* it belongs to.
//! [`CachingTransport`] wraps another [`Transport`] and honors both, so a page
//! build that asks for the post list five times hits the network once, and a
//! publish webhook can drop just the `post` results with
//! [`CachingTransport::invalidate_tag`].
//!
//! # Design
//!
//! ## Cache keys
//!
//! The cache is **content-addressed**: the key is a SHA-256 over the query
//! text and its parameters, not the query name. Two catalog entries with the
//! same text and parameters share a slot; the same query with a different
//! `$slug` does not.
//!
//! ## Freshness
//!
//! A hit requires an entry younger than the request's revalidation window. A
//! zero window disables caching for that request. An expired entry is never
//! served: a failed refetch surfaces the error, which the gateway turns into
//! an empty result like any other transport failure.
//!
//! Each entry remembers the window it was stored under, and every refetch
//! evicts all entries past their window, so one-off `$slug` lookups do not
//! accumulate.
//!
//! Transport errors are never cached.
//!
//! ## Scope
//!
//! The cache is the only shared mutable state in the crate. It sits outside
//! the gateway and is opt-in: the CLI uses it unless `--no-cache` is given.

use crate::transport::{CachePolicy, QueryRequest, Transport, TransportError};
use serde_json::Value;
use sha2::{Digest, Sha256};
use std::collections::HashMap;
use std::fmt;
use std::sync::{Mutex, MutexGuard, PoisonError};
use std::time::{Duration, Instant};
use tracing::debug;

/// A cached query result.
#[derive(Debug, Clone)]
struct CacheEntry {
    value: Value,
    fetched_at: Instant,
    window: Duration,
    tags: Vec<String>,
}

impl CacheEntry {
    fn is_fresh(&self, window: Duration) -> bool {
        self.fetched_at.elapsed() < window
    }
}

/// Transport wrapper that caches results per [`CachePolicy`].
pub struct CachingTransport<T> {
    inner: T,
    entries: Mutex<HashMap<String, CacheEntry>>,
    stats: Mutex<CacheStats>,
}

impl<T: Transport> CachingTransport<T> {
    pub fn new(inner: T) -> Self {
        Self {
            inner,
            entries: Mutex::new(HashMap::new()),
            stats: Mutex::new(CacheStats::default()),
        }
    }

    pub fn inner(&self) -> &T {
        &self.inner
    }

    /// Drop every entry carrying `tag`. Returns how many were dropped.
    pub fn invalidate_tag(&self, tag: &str) -> usize {
        let mut entries = self.entries();
        let before = entries.len();
        entries.retain(|_, entry| !entry.tags.iter().any(|t| t == tag));
        let dropped = before - entries.len();
        debug!(tag, dropped, "invalidated cached queries");
        dropped
    }

    pub fn clear(&self) {
        self.entries().clear();
    }

    pub fn len(&self) -> usize {
        self.entries().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn stats(&self) -> CacheStats {
        lock(&self.stats).clone()
    }

    fn entries(&self) -> MutexGuard<'_, HashMap<String, CacheEntry>> {
        lock(&self.entries)
    }

    /// Drop entries older than the window they were stored under.
    fn evict_expired(&self) -> usize {
        let mut entries = self.entries();
        let before = entries.len();
        entries.retain(|_, entry| entry.is_fresh(entry.window));
        before - entries.len()
    }

    fn record(&self, f: impl FnOnce(&mut CacheStats)) {
        let mut stats = lock(&self.stats);
        f(&mut *stats);
    }
}

impl<T: Transport> Transport for CachingTransport<T> {
    fn query(&self, request: &QueryRequest<'_>) -> Result<Value, TransportError> {
        let CachePolicy { revalidate, tags } = request.cache;
        if revalidate.is_zero() {
            self.record(CacheStats::bypass);
            return self.inner.query(request);
        }

        let key = cache_key(request);
        let cached = self
            .entries()
            .get(&key)
            .filter(|entry| entry.is_fresh(revalidate))
            .map(|entry| entry.value.clone());
        if let Some(value) = cached {
            debug!(query = request.name, "cache hit");
            self.record(CacheStats::hit);
            return Ok(value);
        }

        self.record(CacheStats::miss);
        let evicted = self.evict_expired();
        if evicted > 0 {
            debug!(evicted, "evicted expired queries");
        }
        let value = self.inner.query(request)?;
        self.entries().insert(
            key,
            CacheEntry {
                value: value.clone(),
                fetched_at: Instant::now(),
                window: revalidate,
                tags: tags.to_vec(),
            },
        );
        Ok(value)
    }
}

fn lock<V>(mutex: &Mutex<V>) -> MutexGuard<'_, V> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

/// SHA-256 over query text and parameters, returned as a hex string.
pub fn cache_key(request: &QueryRequest<'_>) -> String {
    let mut hasher = Sha256::new();
    hasher.update(request.text.as_bytes());
    for (name, value) in request.params {
        hasher.update(b"\0");
        hasher.update(name.as_bytes());
        hasher.update(b"=");
        hasher.update(value.as_bytes());
    }
    format!("{:x}", hasher.finalize())
}

/// Summary of cache behaviour over the transport's lifetime.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct CacheStats {
    pub hits: u32,
    pub misses: u32,
    pub bypassed: u32,
}

impl CacheStats {
    pub fn hit(&mut self) {
        self.hits += 1;
    }

    pub fn miss(&mut self) {
        self.misses += 1;
    }

    pub fn bypass(&mut self) {
        self.bypassed += 1;
    }

    pub fn total(&self) -> u32 {
        self.hits + self.misses + self.bypassed
    }
}

impl fmt::Display for CacheStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.hits > 0 {
            write!(
                f,
                "{} cached, {} fetched ({} total)",
                self.hits,
                self.misses + self.bypassed,
                self.total()
            )
        } else {
            write!(f, "{} fetched", self.misses + self.bypassed)
        }
    }
}

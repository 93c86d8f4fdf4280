//! In-memory response cache with TTL support.
//!
//! A present, unexpired entry is always preferred over a network call, so
//! this layer sits in front of the rate limiter in the fetch pipeline.

use dashmap::DashMap;
use serde_json::Value;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{debug, info};

#[derive(Debug, Clone)]
struct CacheEntry {
    payload: Value,
    created_at: Instant,
    ttl: Duration,
}

impl CacheEntry {
    fn new(payload: Value, ttl: Duration) -> Self {
        Self {
            payload,
            created_at: Instant::now(),
            ttl,
        }
    }

    fn is_expired(&self) -> bool {
        self.created_at.elapsed() > self.ttl
    }
}

/// Cache statistics for monitoring
#[derive(Debug, Clone, Default)]
pub struct CacheStats {
    pub hits: u64,
    pub misses: u64,
    pub entries_count: usize,
}

impl CacheStats {
    pub fn hit_rate(&self) -> f64 {
        if self.hits + self.misses == 0 {
            0.0
        } else {
            self.hits as f64 / (self.hits + self.misses) as f64
        }
    }
}

/// Shared TTL cache for upstream payloads, keyed by logical request key.
#[derive(Debug)]
pub struct ResponseCache {
    entries: Arc<DashMap<String, CacheEntry>>,
    hits: Arc<AtomicU64>,
    misses: Arc<AtomicU64>,
    max_entries: usize,
}

impl ResponseCache {
    pub fn new(max_entries: usize) -> Self {
        Self {
            entries: Arc::new(DashMap::new()),
            hits: Arc::new(AtomicU64::new(0)),
            misses: Arc::new(AtomicU64::new(0)),
            max_entries: max_entries.max(1),
        }
    }

    /// Get a cached payload if present and not expired. Expired entries are
    /// removed on the way out.
    pub fn get(&self, key: &str) -> Option<Value> {
        let mut expired = false;
        if let Some(entry) = self.entries.get(key) {
            if !entry.is_expired() {
                self.hits.fetch_add(1, Ordering::Relaxed);
                debug!("Cache hit for key: {}", key);
                return Some(entry.payload.clone());
            }
            expired = true;
        }

        if expired {
            self.entries.remove(key);
            debug!("Removed expired cache entry for key: {}", key);
        }

        self.misses.fetch_add(1, Ordering::Relaxed);
        debug!("Cache miss for key: {}", key);
        None
    }

    /// Store a payload under the given key with the given freshness window.
    pub fn set(&self, key: &str, payload: Value, ttl: Duration) {
        if self.entries.len() >= self.max_entries {
            self.evict_oldest_entries();
        }

        self.entries
            .insert(key.to_string(), CacheEntry::new(payload, ttl));
        debug!("Cached payload for key: {} with TTL: {:?}", key, ttl);
    }

    pub fn stats(&self) -> CacheStats {
        CacheStats {
            hits: self.hits.load(Ordering::Relaxed),
            misses: self.misses.load(Ordering::Relaxed),
            entries_count: self.entries.len(),
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn clear(&self) {
        self.entries.clear();
        self.hits.store(0, Ordering::Relaxed);
        self.misses.store(0, Ordering::Relaxed);
        info!("Cache cleared");
    }

    /// Evict oldest entries down to 90% of capacity when the cache is full.
    fn evict_oldest_entries(&self) {
        let current_size = self.entries.len();

        let mut by_age: Vec<(String, Instant)> = self
            .entries
            .iter()
            .map(|entry| (entry.key().clone(), entry.value().created_at))
            .collect();
        by_age.sort_by_key(|(_, created_at)| *created_at);

        let target_size = (self.max_entries * 9) / 10;
        let to_evict = current_size.saturating_sub(target_size).max(1);

        for (key, _) in by_age.into_iter().take(to_evict) {
            self.entries.remove(&key);
        }

        debug!(
            "Evicted {} old cache entries (was {}, now {})",
            to_evict,
            current_size,
            self.entries.len()
        );
    }
}

impl Default for ResponseCache {
    fn default() -> Self {
        Self::new(1000)
    }
}

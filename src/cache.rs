//! TTL cache for expensive boundary-processing results.
//!
//! The cache is the only shared mutable state in the engine. A single
//! cache-wide `RwLock` guards the map; contention is low because the
//! workload is read-heavy with rare writes. Concurrent misses for the same
//! key are tolerated (each recomputes and the last insert wins); the cost of
//! a stampede is bounded by the cost of one recomputation per worker.
//!
//! Values are a closed set of tagged variants rather than opaque blobs, so
//! retrieval is type-checked at compile time. Expired entries are never
//! returned; they are dropped lazily on overwrite or by [`GeometryCache::cleanup_expired`].

use crate::boundary::DistrictGeometry;
use geodispatch_types::{BoundarySummary, CacheStatistics};
use parking_lot::RwLock;
use rustc_hash::FxHashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{Duration, SystemTime};

/// The payload stored under a cache key.
#[derive(Debug, Clone, PartialEq)]
pub enum CachedValue {
    /// Parsed fire-district geometry (the expensive load).
    Districts(Vec<DistrictGeometry>),
    /// A per-query boundary list, keyed by the query parameters.
    BoundaryList(Vec<BoundarySummary>),
    /// A derived GeoJSON feature collection.
    #[cfg(feature = "geojson")]
    FeatureCollection(geojson::FeatureCollection),
}

/// Eviction hint. The current policy is TTL-only, so the hint is carried but
/// not acted on; it exists so entries can declare importance once a bounded
/// cache needs to shed load.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CachePriority {
    #[default]
    Default,
    High,
}

#[derive(Debug, Clone, PartialEq)]
struct CacheEntry {
    value: CachedValue,
    created_at: SystemTime,
    expires_at: SystemTime,
    priority: CachePriority,
}

impl CacheEntry {
    fn is_expired_at(&self, now: SystemTime) -> bool {
        now >= self.expires_at
    }
}

/// Counters for cache behavior, cheap enough to keep unconditionally.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CacheStats {
    pub entry_count: usize,
    pub hits: u64,
    pub misses: u64,
    pub expired_evictions: u64,
}

/// Internally synchronized TTL cache.
///
/// # Examples
///
/// ```rust
/// use geodispatch::cache::{CachedValue, GeometryCache};
/// use std::time::Duration;
///
/// let cache = GeometryCache::new();
/// cache.set("districts", CachedValue::Districts(vec![]), Duration::from_secs(60));
/// assert!(cache.get("districts").is_some());
///
/// cache.invalidate_all();
/// assert!(cache.get("districts").is_none());
/// ```
pub struct GeometryCache {
    entries: RwLock<FxHashMap<String, CacheEntry>>,
    hits: AtomicU64,
    misses: AtomicU64,
    expired_evictions: AtomicU64,
}

impl GeometryCache {
    pub fn new() -> Self {
        Self {
            entries: RwLock::new(FxHashMap::default()),
            hits: AtomicU64::new(0),
            misses: AtomicU64::new(0),
            expired_evictions: AtomicU64::new(0),
        }
    }

    /// Look up a key, treating expired entries as misses.
    pub fn get(&self, key: &str) -> Option<CachedValue> {
        self.get_at(key, SystemTime::now())
    }

    /// Look up a key against a supplied clock. Expiry tests use this instead
    /// of sleeping.
    pub fn get_at(&self, key: &str, now: SystemTime) -> Option<CachedValue> {
        let entries = self.entries.read();
        match entries.get(key) {
            Some(entry) if !entry.is_expired_at(now) => {
                self.hits.fetch_add(1, Ordering::Relaxed);
                log::debug!("cache hit: {key}");
                Some(entry.value.clone())
            }
            _ => {
                self.misses.fetch_add(1, Ordering::Relaxed);
                log::debug!("cache miss: {key}");
                None
            }
        }
    }

    /// Store a value with an absolute expiry of now + `ttl`, overwriting any
    /// existing entry.
    pub fn set(&self, key: impl Into<String>, value: CachedValue, ttl: Duration) {
        self.set_at(key, value, ttl, SystemTime::now());
    }

    /// Store a value against a supplied clock.
    pub fn set_at(&self, key: impl Into<String>, value: CachedValue, ttl: Duration, now: SystemTime) {
        self.set_with_priority_at(key, value, ttl, CachePriority::Default, now);
    }

    /// Store a value with an explicit eviction hint.
    pub fn set_with_priority(
        &self,
        key: impl Into<String>,
        value: CachedValue,
        ttl: Duration,
        priority: CachePriority,
    ) {
        self.set_with_priority_at(key, value, ttl, priority, SystemTime::now());
    }

    fn set_with_priority_at(
        &self,
        key: impl Into<String>,
        value: CachedValue,
        ttl: Duration,
        priority: CachePriority,
        now: SystemTime,
    ) {
        let entry = CacheEntry {
            value,
            created_at: now,
            expires_at: now + ttl,
            priority,
        };
        self.entries.write().insert(key.into(), entry);
    }

    /// Remove a single key. Returns whether an entry (live or expired) was
    /// present.
    pub fn invalidate(&self, key: &str) -> bool {
        self.entries.write().remove(key).is_some()
    }

    /// Remove every entry. Used when the underlying station data changes or
    /// on a manual cache-clear request.
    pub fn invalidate_all(&self) {
        self.entries.write().clear();
    }

    /// Drop every expired entry and return how many were removed.
    pub fn cleanup_expired(&self) -> usize {
        self.cleanup_expired_at(SystemTime::now())
    }

    /// Drop entries expired as of a supplied clock.
    pub fn cleanup_expired_at(&self, now: SystemTime) -> usize {
        let mut entries = self.entries.write();
        let before = entries.len();
        entries.retain(|_, entry| !entry.is_expired_at(now));
        let removed = before - entries.len();
        self.expired_evictions
            .fetch_add(removed as u64, Ordering::Relaxed);
        removed
    }

    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.read().is_empty()
    }

    /// The eviction hint a live entry was stored with.
    pub fn entry_priority(&self, key: &str) -> Option<CachePriority> {
        self.entries.read().get(key).map(|entry| entry.priority)
    }

    /// Aggregate hit/miss counters plus the current entry count.
    pub fn stats(&self) -> CacheStats {
        CacheStats {
            entry_count: self.entries.read().len(),
            hits: self.hits.load(Ordering::Relaxed),
            misses: self.misses.load(Ordering::Relaxed),
            expired_evictions: self.expired_evictions.load(Ordering::Relaxed),
        }
    }

    /// Diagnostic snapshot for a single key, without counting a hit or miss.
    pub fn entry_statistics(&self, key: &str) -> CacheStatistics {
        self.entry_statistics_at(key, SystemTime::now())
    }

    fn entry_statistics_at(&self, key: &str, now: SystemTime) -> CacheStatistics {
        let entries = self.entries.read();
        match entries.get(key) {
            Some(entry) if !entry.is_expired_at(now) => CacheStatistics {
                cached: true,
                cache_key: key.to_string(),
                timestamp: Some(entry.created_at),
            },
            _ => CacheStatistics {
                cached: false,
                cache_key: key.to_string(),
                timestamp: None,
            },
        }
    }
}

impl Default for GeometryCache {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn boundary_list() -> CachedValue {
        CachedValue::BoundaryList(vec![])
    }

    #[test]
    fn test_set_then_get_returns_value() {
        let cache = GeometryCache::new();
        cache.set("key", boundary_list(), Duration::from_secs(60));
        assert_eq!(cache.get("key"), Some(boundary_list()));
    }

    #[test]
    fn test_expired_entry_is_a_miss() {
        let cache = GeometryCache::new();
        let start = SystemTime::UNIX_EPOCH + Duration::from_secs(1_000);
        cache.set_at("key", boundary_list(), Duration::from_secs(600), start);

        // Live just before expiry, gone exactly at it and beyond.
        assert!(cache.get_at("key", start + Duration::from_secs(599)).is_some());
        assert!(cache.get_at("key", start + Duration::from_secs(600)).is_none());
        assert!(cache.get_at("key", start + Duration::from_secs(601)).is_none());
    }

    #[test]
    fn test_overwrite_refreshes_expiry() {
        let cache = GeometryCache::new();
        let start = SystemTime::UNIX_EPOCH + Duration::from_secs(1_000);
        cache.set_at("key", boundary_list(), Duration::from_secs(10), start);

        let later = start + Duration::from_secs(8);
        cache.set_at("key", boundary_list(), Duration::from_secs(10), later);

        // Past the first expiry but inside the refreshed one.
        assert!(cache.get_at("key", start + Duration::from_secs(15)).is_some());
    }

    #[test]
    fn test_invalidate_single_key() {
        let cache = GeometryCache::new();
        cache.set("a", boundary_list(), Duration::from_secs(60));
        cache.set("b", boundary_list(), Duration::from_secs(60));

        assert!(cache.invalidate("a"));
        assert!(!cache.invalidate("a"));
        assert!(cache.get("a").is_none());
        assert!(cache.get("b").is_some());
    }

    #[test]
    fn test_invalidate_all() {
        let cache = GeometryCache::new();
        cache.set("a", boundary_list(), Duration::from_secs(60));
        cache.set("b", boundary_list(), Duration::from_secs(60));

        cache.invalidate_all();
        assert!(cache.is_empty());
    }

    #[test]
    fn test_cleanup_expired_removes_only_expired() {
        let cache = GeometryCache::new();
        let start = SystemTime::UNIX_EPOCH + Duration::from_secs(1_000);
        cache.set_at("short", boundary_list(), Duration::from_secs(10), start);
        cache.set_at("long", boundary_list(), Duration::from_secs(1_000), start);

        let removed = cache.cleanup_expired_at(start + Duration::from_secs(60));
        assert_eq!(removed, 1);
        assert_eq!(cache.len(), 1);
        assert!(cache.get_at("long", start + Duration::from_secs(60)).is_some());
    }

    #[test]
    fn test_stats_count_hits_and_misses() {
        let cache = GeometryCache::new();
        cache.set("key", boundary_list(), Duration::from_secs(60));

        cache.get("key");
        cache.get("key");
        cache.get("absent");

        let stats = cache.stats();
        assert_eq!(stats.entry_count, 1);
        assert_eq!(stats.hits, 2);
        assert_eq!(stats.misses, 1);
    }

    #[test]
    fn test_entry_statistics_reports_timestamp() {
        let cache = GeometryCache::new();
        let start = SystemTime::UNIX_EPOCH + Duration::from_secs(1_000);
        cache.set_at("key", boundary_list(), Duration::from_secs(60), start);

        let stats = cache.entry_statistics_at("key", start + Duration::from_secs(1));
        assert!(stats.cached);
        assert_eq!(stats.cache_key, "key");
        assert_eq!(stats.timestamp, Some(start));

        let missing = cache.entry_statistics_at("absent", start);
        assert!(!missing.cached);
        assert!(missing.timestamp.is_none());
    }

    #[test]
    fn test_entry_statistics_treats_expired_as_uncached() {
        let cache = GeometryCache::new();
        let start = SystemTime::UNIX_EPOCH + Duration::from_secs(1_000);
        cache.set_at("key", boundary_list(), Duration::from_secs(10), start);

        let stats = cache.entry_statistics_at("key", start + Duration::from_secs(60));
        assert!(!stats.cached);
    }

    #[test]
    fn test_priority_hint_is_stored() {
        let cache = GeometryCache::new();
        cache.set_with_priority(
            "key",
            boundary_list(),
            Duration::from_secs(60),
            CachePriority::High,
        );
        assert_eq!(cache.entry_priority("key"), Some(CachePriority::High));
        assert!(cache.entry_priority("absent").is_none());
    }

    #[test]
    fn test_concurrent_access() {
        use std::sync::Arc;

        let cache = Arc::new(GeometryCache::new());
        let mut handles = Vec::new();
        for worker in 0..8 {
            let cache = Arc::clone(&cache);
            handles.push(std::thread::spawn(move || {
                for i in 0..100 {
                    let key = format!("key:{}", i % 10);
                    if worker % 2 == 0 {
                        cache.set(key, CachedValue::BoundaryList(vec![]), Duration::from_secs(60));
                    } else {
                        let _ = cache.get(&key);
                    }
                }
            }));
        }
        for handle in handles {
            handle.join().unwrap();
        }
        assert!(cache.len() <= 10);
    }
}

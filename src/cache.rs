//! Expiring key/value store for rendered pages.
//!
//! Eviction is lazy: an expired entry is invisible to `get` immediately but
//! only leaves storage when `get` is next called for that key (or on
//! `clear`). Keys that are set once and never read again stay resident.

use std::time::Duration;

use dashmap::DashMap;
use tokio::time::Instant;

/// Upper bound for a single entry's lifetime; larger TTLs are clamped.
const MAX_TTL: Duration = Duration::from_secs(100 * 365 * 24 * 60 * 60);

#[derive(Debug, Clone)]
struct CacheEntry<V> {
    value: V,
    expires_at: Instant,
}

/// Thread-safe TTL cache keyed by string.
///
/// Backed by a sharded map, so operations on different keys do not contend
/// on a single lock, and each per-key operation is atomic.
#[derive(Debug)]
pub struct TtlCache<V> {
    entries: DashMap<String, CacheEntry<V>>,
}

impl<V> Default for TtlCache<V> {
    fn default() -> Self {
        Self {
            entries: DashMap::new(),
        }
    }
}

impl<V: Clone> TtlCache<V> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stores `value`, replacing any existing entry and its expiry.
    ///
    /// `ttl_seconds <= 0` stores an entry that is already expired.
    pub fn set(&self, key: &str, value: V, ttl_seconds: i64) {
        let now = Instant::now();
        let expires_at = if ttl_seconds <= 0 {
            now
        } else {
            let ttl = Duration::from_secs(ttl_seconds.unsigned_abs()).min(MAX_TTL);
            now + ttl
        };
        self.entries
            .insert(key.to_string(), CacheEntry { value, expires_at });
        tracing::trace!(key, ttl_seconds, "Cache set");
    }

    /// Returns the value if present and unexpired; otherwise evicts any stale entry.
    pub fn get(&self, key: &str) -> Option<V> {
        let now = Instant::now();
        if let Some(entry) = self.entries.get(key) {
            if entry.expires_at > now {
                return Some(entry.value.clone());
            }
        }
        // A concurrent `set` may have replaced the stale entry since the read
        // guard dropped; only remove what is still expired.
        if self
            .entries
            .remove_if(key, |_, entry| entry.expires_at <= now)
            .is_some()
        {
            tracing::trace!(key, "Evicted expired cache entry");
        }
        None
    }

    pub fn clear(&self) {
        self.entries.clear();
    }

    /// Physically stored entries, including expired ones not yet evicted.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    #[tokio::test(start_paused = true)]
    async fn value_is_returned_until_ttl_elapses() {
        let cache = TtlCache::new();
        cache.set("k", "v".to_string(), 1);
        assert_eq!(cache.get("k").as_deref(), Some("v"));

        tokio::time::advance(Duration::from_millis(999)).await;
        assert_eq!(cache.get("k").as_deref(), Some("v"));

        tokio::time::advance(Duration::from_millis(1)).await;
        assert_eq!(cache.get("k"), None);
        tokio::time::advance(Duration::from_secs(5)).await;
        assert_eq!(cache.get("k"), None);
    }

    #[test]
    fn second_set_overwrites_value() {
        let cache = TtlCache::new();
        cache.set("k", "v1", 10);
        cache.set("k", "v2", 10);
        assert_eq!(cache.get("k"), Some("v2"));
        assert_eq!(cache.len(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn overwrite_resets_expiry_instead_of_extending() {
        let cache = TtlCache::new();
        cache.set("k", 1, 100);
        cache.set("k", 2, 1);

        tokio::time::advance(Duration::from_secs(2)).await;
        assert_eq!(cache.get("k"), None);
    }

    #[test]
    fn clear_removes_everything() {
        let cache = TtlCache::new();
        cache.set("fresh", 1, 60);
        cache.set("stale", 2, 0);
        cache.clear();
        assert!(cache.is_empty());
        assert_eq!(cache.get("fresh"), None);
        assert_eq!(cache.get("stale"), None);
    }

    #[test]
    fn non_positive_ttl_is_immediately_absent() {
        let cache = TtlCache::new();
        for ttl in [0, -1, -3600, i64::MIN] {
            cache.set("k", "v", ttl);
            assert_eq!(cache.get("k"), None, "ttl {ttl} should be expired");
        }
    }

    #[tokio::test(start_paused = true)]
    async fn expired_entries_stay_resident_until_read() {
        let cache = TtlCache::new();
        cache.set("read", 1, 1);
        cache.set("unread", 2, 1);
        tokio::time::advance(Duration::from_secs(2)).await;

        assert_eq!(cache.len(), 2);
        assert_eq!(cache.get("read"), None);
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn missing_key_is_none() {
        let cache: TtlCache<String> = TtlCache::new();
        assert_eq!(cache.get("nope"), None);
        assert!(cache.is_empty());
    }

    #[test]
    fn huge_ttl_does_not_overflow() {
        let cache = TtlCache::new();
        cache.set("k", "v", i64::MAX);
        assert_eq!(cache.get("k"), Some("v"));
    }

    #[test]
    fn concurrent_writers_on_distinct_keys() {
        let cache = Arc::new(TtlCache::new());
        let handles: Vec<_> = (0..8)
            .map(|i| {
                let cache = Arc::clone(&cache);
                std::thread::spawn(move || {
                    for j in 0..100 {
                        cache.set(&format!("{i}-{j}"), j, 60);
                    }
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }
        assert_eq!(cache.len(), 800);
        assert_eq!(cache.get("3-42"), Some(42));
    }
}

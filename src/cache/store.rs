//! Bounded TTL + LRU store.

use std::borrow::Borrow;
use std::hash::Hash;
use std::num::NonZeroUsize;
use std::time::Duration;

use lru::LruCache;
use tokio::time::Instant;

struct Entry<V> {
    value: V,
    inserted_at: Instant,
}

impl<V> Entry<V> {
    fn is_expired(&self, ttl: Duration, now: Instant) -> bool {
        now.saturating_duration_since(self.inserted_at) > ttl
    }
}

/// Key/value store with a hard capacity and per-entry expiry.
///
/// Entries older than `ttl` are never returned; they are dropped the next
/// time `get` touches them. When a `set` pushes the store past capacity the
/// least-recently-used entry is evicted. Both reads and writes count as use.
pub struct TtlLruCache<K: Hash + Eq, V> {
    entries: LruCache<K, Entry<V>>,
    ttl: Duration,
}

impl<K: Hash + Eq, V: Clone> TtlLruCache<K, V> {
    /// Create a store holding at most `max_size` entries for at most `ttl` each.
    pub fn new(max_size: NonZeroUsize, ttl: Duration) -> Self {
        Self {
            entries: LruCache::new(max_size),
            ttl,
        }
    }

    /// Return a live value and mark it most-recently-used.
    pub fn get<Q>(&mut self, key: &Q) -> Option<V>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        let expired = self.entries.peek(key)?.is_expired(self.ttl, Instant::now());
        if expired {
            self.entries.pop(key);
            return None;
        }
        self.entries.get(key).map(|entry| entry.value.clone())
    }

    /// Insert or overwrite `key`, stamping it with the current time.
    ///
    /// Returns the key evicted to keep the store within capacity, if any.
    pub fn set(&mut self, key: K, value: V) -> Option<K> {
        let replacing = self.entries.contains(&key);
        let entry = Entry {
            value,
            inserted_at: Instant::now(),
        };
        match self.entries.push(key, entry) {
            Some((evicted, _)) if !replacing => Some(evicted),
            _ => None,
        }
    }

    /// True if `key` holds a live value. Does not affect recency.
    pub fn contains<Q>(&self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.entries
            .peek(key)
            .is_some_and(|entry| !entry.is_expired(self.ttl, Instant::now()))
    }

    /// Number of stored entries, including expired ones not yet collected.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.entries.cap().get()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cache(max_size: usize, ttl_ms: u64) -> TtlLruCache<String, String> {
        TtlLruCache::new(
            NonZeroUsize::new(max_size).unwrap(),
            Duration::from_millis(ttl_ms),
        )
    }

    #[test]
    fn test_capacity_bound_holds_after_every_set() {
        let mut cache = cache(3, 60_000);
        for i in 0..10 {
            cache.set(format!("/page-{i}"), format!("<p>{i}</p>"));
            assert!(cache.len() <= 3);
        }
        assert_eq!(cache.len(), 3);
        assert_eq!(cache.get("/page-9").as_deref(), Some("<p>9</p>"));
        assert!(cache.get("/page-0").is_none());
    }

    #[test]
    fn test_evicts_least_recently_inserted() {
        let mut cache = cache(2, 60_000);
        assert_eq!(cache.set("/a".into(), "a".into()), None);
        assert_eq!(cache.set("/b".into(), "b".into()), None);
        assert_eq!(cache.set("/c".into(), "c".into()), Some("/a".to_string()));

        assert!(!cache.contains("/a"));
        assert!(cache.contains("/b"));
        assert!(cache.contains("/c"));
    }

    #[test]
    fn test_get_refreshes_recency() {
        let mut cache = cache(2, 60_000);
        cache.set("/a".into(), "a".into());
        cache.set("/b".into(), "b".into());

        // Touch /a so /b becomes the eviction candidate.
        assert_eq!(cache.get("/a").as_deref(), Some("a"));
        assert_eq!(cache.set("/c".into(), "c".into()), Some("/b".to_string()));

        assert_eq!(cache.get("/a").as_deref(), Some("a"));
        assert!(cache.get("/b").is_none());
    }

    #[test]
    fn test_reset_counts_as_most_recent() {
        let mut cache = cache(2, 60_000);
        cache.set("/a".into(), "a1".into());
        cache.set("/b".into(), "b".into());
        assert_eq!(cache.set("/a".into(), "a2".into()), None);
        assert_eq!(cache.len(), 2);

        assert_eq!(cache.set("/c".into(), "c".into()), Some("/b".to_string()));
        assert_eq!(cache.get("/a").as_deref(), Some("a2"));
    }

    #[test]
    fn test_contains_does_not_refresh_recency() {
        let mut cache = cache(2, 60_000);
        cache.set("/a".into(), "a".into());
        cache.set("/b".into(), "b".into());

        assert!(cache.contains("/a"));
        assert_eq!(cache.set("/c".into(), "c".into()), Some("/a".to_string()));
    }

    #[tokio::test(start_paused = true)]
    async fn test_expired_entry_is_absent_and_removed() {
        let mut cache = cache(4, 1_000);
        cache.set("/x".into(), "<main>x</main>".into());

        tokio::time::advance(Duration::from_millis(1_000)).await;
        assert_eq!(cache.get("/x").as_deref(), Some("<main>x</main>"));

        tokio::time::advance(Duration::from_millis(1)).await;
        assert!(!cache.contains("/x"));
        assert_eq!(cache.len(), 1);
        assert!(cache.get("/x").is_none());
        assert_eq!(cache.len(), 0);
        assert!(cache.get("/x").is_none());
    }

    #[tokio::test(start_paused = true)]
    async fn test_set_restamps_expiry() {
        let mut cache = cache(4, 1_000);
        cache.set("/x".into(), "old".into());
        tokio::time::advance(Duration::from_millis(800)).await;
        cache.set("/x".into(), "new".into());
        tokio::time::advance(Duration::from_millis(800)).await;

        assert_eq!(cache.get("/x").as_deref(), Some("new"));
    }
}

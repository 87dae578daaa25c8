//! In-memory key/value store with an absolute expiry per entry.
//!
//! Expiry is only checked on read: an expired entry is removed the first
//! time somebody asks for it. There is no size bound and no sweeper.
//! The cache itself is not synchronised; share it behind a lock.

use std::borrow::Borrow;
use std::collections::HashMap;
use std::hash::Hash;
use std::time::Duration;
use tokio::time::Instant;

struct CacheEntry<V> {
    value: V,
    expires_at: Instant,
}

pub struct ExpiringCache<K, V> {
    ttl: Duration,
    entries: HashMap<K, CacheEntry<V>>,
}

impl<K, V> ExpiringCache<K, V>
where
    K: Eq + Hash,
    V: Clone,
{
    pub fn new(ttl: Duration) -> Self {
        Self {
            ttl,
            entries: HashMap::new(),
        }
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Return the stored value unless it has expired, evicting it if so.
    pub fn get<Q>(&mut self, key: &Q) -> Option<V>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        let expires_at = self.entries.get(key)?.expires_at;
        if Instant::now() > expires_at {
            self.entries.remove(key);
            return None;
        }
        self.entries.get(key).map(|entry| entry.value.clone())
    }

    /// Store `value` until now + TTL, replacing whatever was there.
    pub fn set(&mut self, key: K, value: V) {
        let expires_at = Instant::now() + self.ttl;
        self.entries.insert(key, CacheEntry { value, expires_at });
    }

    /// Number of entries held, expired-but-unread ones included.
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

    const TTL: Duration = Duration::from_secs(45);

    #[tokio::test(start_paused = true)]
    async fn test_get_within_ttl_returns_value() {
        let mut cache = ExpiringCache::new(TTL);
        cache.set("endpoints", vec![1, 2, 3]);

        assert_eq!(cache.get("endpoints"), Some(vec![1, 2, 3]));

        tokio::time::advance(Duration::from_secs(44)).await;
        assert_eq!(cache.get("endpoints"), Some(vec![1, 2, 3]));
    }

    #[tokio::test(start_paused = true)]
    async fn test_expiry_boundary_is_inclusive() {
        let mut cache = ExpiringCache::new(TTL);
        cache.set("k", 1);

        tokio::time::advance(TTL).await;
        assert_eq!(cache.get("k"), Some(1));
    }

    #[tokio::test(start_paused = true)]
    async fn test_expired_entry_is_evicted_on_read() {
        let mut cache = ExpiringCache::new(TTL);
        cache.set("k", 1);

        tokio::time::advance(TTL + Duration::from_millis(1)).await;
        assert_eq!(cache.len(), 1);
        assert_eq!(cache.get("k"), None);
        assert!(cache.is_empty());
        assert_eq!(cache.get("k"), None);
    }

    #[tokio::test(start_paused = true)]
    async fn test_set_overwrites_and_restarts_expiry() {
        let mut cache = ExpiringCache::new(TTL);
        cache.set("k", 1);

        tokio::time::advance(Duration::from_secs(30)).await;
        cache.set("k", 2);

        tokio::time::advance(Duration::from_secs(30)).await;
        assert_eq!(cache.get("k"), Some(2));
    }

    #[test]
    fn test_missing_key() {
        let mut cache: ExpiringCache<String, u8> = ExpiringCache::new(TTL);
        assert_eq!(cache.get("nothing"), None);
        assert_eq!(cache.ttl(), TTL);
    }
}

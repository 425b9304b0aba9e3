//! Cache store backed by Moka.
//!
//! Each entry carries its own TTL; there is no single-flight, so racing
//! misses for the same key may both compute and both `put`.

use std::time::{Duration, Instant};

use async_trait::async_trait;
use moka::future::Cache;
use moka::Expiry;
use tracing::debug;

use super::{CacheKey, CachedPayload};
use crate::domain::SiteId;

/// Storage for shaped payloads.
#[async_trait]
pub trait CacheStore: Send + Sync {
    /// Return the payload for `key` if present and unexpired.
    async fn get(&self, key: &CacheKey) -> Option<CachedPayload>;

    /// Store `payload` under `key`, replacing any previous entry.
    async fn put(&self, key: CacheKey, payload: CachedPayload, ttl: Duration);

    /// Drop a single entry.
    async fn invalidate(&self, key: &CacheKey);

    /// Drop every entry belonging to `site`.
    async fn invalidate_site(&self, site: SiteId);
}

#[derive(Debug, Clone)]
struct CacheEntry {
    payload: CachedPayload,
    ttl: Duration,
}

/// Expires each entry after the TTL it was stored with.
struct PerEntryTtl;

impl Expiry<CacheKey, CacheEntry> for PerEntryTtl {
    fn expire_after_create(
        &self,
        _key: &CacheKey,
        value: &CacheEntry,
        _created_at: Instant,
    ) -> Option<Duration> {
        Some(value.ttl)
    }

    fn expire_after_update(
        &self,
        _key: &CacheKey,
        value: &CacheEntry,
        _updated_at: Instant,
        _duration_until_expiry: Option<Duration>,
    ) -> Option<Duration> {
        Some(value.ttl)
    }
}

/// In-process cache store.
#[derive(Clone)]
pub struct MokaCacheStore {
    cache: Cache<CacheKey, CacheEntry>,
}

impl MokaCacheStore {
    /// Create a store holding at most `max_capacity` payloads.
    pub fn new(max_capacity: u64) -> Self {
        let cache = Cache::builder()
            .max_capacity(max_capacity)
            .expire_after(PerEntryTtl)
            .build();

        Self { cache }
    }
}

#[async_trait]
impl CacheStore for MokaCacheStore {
    async fn get(&self, key: &CacheKey) -> Option<CachedPayload> {
        let entry = self.cache.get(key).await;
        debug!(key = %key, hit = entry.is_some(), "cache lookup");
        entry.map(|e| e.payload)
    }

    async fn put(&self, key: CacheKey, payload: CachedPayload, ttl: Duration) {
        debug!(key = %key, ttl_secs = ttl.as_secs(), "cache set");
        self.cache.insert(key, CacheEntry { payload, ttl }).await;
    }

    async fn invalidate(&self, key: &CacheKey) {
        self.cache.invalidate(key).await;
    }

    async fn invalidate_site(&self, site: SiteId) {
        let keys: Vec<CacheKey> = self
            .cache
            .iter()
            .filter(|(k, _)| k.site == site)
            .map(|(k, _)| (*k).clone())
            .collect();

        for key in &keys {
            self.cache.invalidate(key).await;
        }

        debug!(site = %site, dropped = keys.len(), "cache invalidated for site");
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::domain::MenuLocations;

    fn menus_payload() -> CachedPayload {
        CachedPayload::Menus(Arc::new(Vec::new()))
    }

    #[tokio::test]
    async fn test_get_after_put() {
        let store = MokaCacheStore::new(100);
        let key = CacheKey::all_menus(SiteId::new(1));

        assert!(store.get(&key).await.is_none());

        store
            .put(key.clone(), menus_payload(), Duration::from_secs(60))
            .await;

        assert!(matches!(
            store.get(&key).await,
            Some(CachedPayload::Menus(menus)) if menus.is_empty()
        ));
    }

    #[tokio::test]
    async fn test_entry_expires_after_ttl() {
        let store = MokaCacheStore::new(100);
        let key = CacheKey::menu(SiteId::new(1), 4);

        store
            .put(
                key.clone(),
                CachedPayload::Menu(Arc::new(None)),
                Duration::from_millis(50),
            )
            .await;
        assert!(store.get(&key).await.is_some());

        tokio::time::sleep(Duration::from_millis(150)).await;
        assert!(store.get(&key).await.is_none());
    }

    #[tokio::test]
    async fn test_invalidate_site_leaves_other_sites() {
        let store = MokaCacheStore::new(100);
        let one = SiteId::new(1);
        let two = SiteId::new(2);
        let ttl = Duration::from_secs(60);

        store.put(CacheKey::all_menus(one), menus_payload(), ttl).await;
        store
            .put(
                CacheKey::all_locations(one),
                CachedPayload::Locations(Arc::new(MenuLocations::default())),
                ttl,
            )
            .await;
        store.put(CacheKey::all_menus(two), menus_payload(), ttl).await;

        store.invalidate_site(one).await;

        assert!(store.get(&CacheKey::all_menus(one)).await.is_none());
        assert!(store.get(&CacheKey::all_locations(one)).await.is_none());
        assert!(store.get(&CacheKey::all_menus(two)).await.is_some());
    }

    #[tokio::test]
    async fn test_invalidate_single_key() {
        let store = MokaCacheStore::new(100);
        let key = CacheKey::location(SiteId::new(1), "primary");

        store
            .put(
                key.clone(),
                CachedPayload::LocationItems(Arc::new(Vec::new())),
                Duration::from_secs(60),
            )
            .await;
        store.invalidate(&key).await;

        assert!(store.get(&key).await.is_none());
    }

    #[tokio::test]
    async fn test_concurrent_puts_do_not_corrupt() {
        let store = Arc::new(MokaCacheStore::new(100));
        let key = CacheKey::all_menus(SiteId::new(9));

        let mut handles = Vec::new();
        for _ in 0..16 {
            let store = store.clone();
            let key = key.clone();
            handles.push(tokio::spawn(async move {
                store.put(key.clone(), menus_payload(), Duration::from_secs(60)).await;
                store.get(&key).await.is_some()
            }));
        }

        for handle in handles {
            assert!(handle.await.unwrap());
        }
    }
}

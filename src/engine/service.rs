//! Menu Service - read-through orchestration of the menu endpoints.
//!
//! Each operation checks the cache first; on a miss it reads the content
//! store, shapes the records, rebuilds item trees, and caches the result.
//! Concurrent misses for one key may both compute; the last `put` wins.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use crate::cache::{CacheKey, CacheStore, CachedPayload};
use crate::domain::{FormattedMenuItem, Menu, MenuItemRaw, MenuLocations, MenuSummary, SiteId};
use crate::engine::{build_tree, MenuHooks, ResponseShaper};
use crate::error::MenuResult;
use crate::storage::ContentStore;

/// Serves menus and locations for any site.
pub struct MenuService {
    store: Arc<dyn ContentStore>,
    cache: Arc<dyn CacheStore>,
    shaper: ResponseShaper,
    hooks: Arc<dyn MenuHooks>,
    ttl: Duration,
}

impl MenuService {
    /// Create a new service with the given collaborators.
    pub fn new(
        store: Arc<dyn ContentStore>,
        cache: Arc<dyn CacheStore>,
        shaper: ResponseShaper,
        hooks: Arc<dyn MenuHooks>,
        ttl: Duration,
    ) -> Self {
        Self {
            store,
            cache,
            shaper,
            hooks,
            ttl,
        }
    }

    /// All menus of a site.
    pub async fn get_menus(&self, site: SiteId) -> MenuResult<Vec<MenuSummary>> {
        let key = CacheKey::all_menus(site);

        let cached = self.cache.get(&key).await;
        let menus = match cached {
            Some(CachedPayload::Menus(menus)) => menus,
            _ => {
                tracing::debug!(key = %key, "Computing menus collection");
                let menus: Vec<MenuSummary> = self
                    .store
                    .list_menus(site)
                    .await?
                    .iter()
                    .map(|m| self.shaper.menu_summary(m))
                    .collect();
                let menus = Arc::new(menus);
                self.cache
                    .put(key, CachedPayload::Menus(menus.clone()), self.ttl)
                    .await;
                menus
            }
        };

        Ok(self.hooks.format_menus(site, (*menus).clone()))
    }

    /// A single menu with nested items, or `None` if it does not exist.
    pub async fn get_menu(&self, site: SiteId, id: u64) -> MenuResult<Option<Menu>> {
        if id == 0 {
            return Ok(None);
        }

        let key = CacheKey::menu(site, id);

        let cached = self.cache.get(&key).await;
        let menu = match cached {
            Some(CachedPayload::Menu(menu)) => menu,
            _ => {
                tracing::debug!(key = %key, "Computing menu");
                let menu = Arc::new(self.compute_menu(site, id).await?);
                self.cache
                    .put(key, CachedPayload::Menu(menu.clone()), self.ttl)
                    .await;
                menu
            }
        };

        Ok((*menu)
            .clone()
            .map(|menu| self.hooks.format_menu(site, menu)))
    }

    /// All bound locations of a site.
    pub async fn get_menu_locations(&self, site: SiteId) -> MenuResult<MenuLocations> {
        let key = CacheKey::all_locations(site);

        if let Some(CachedPayload::Locations(locations)) = self.cache.get(&key).await {
            return Ok((*locations).clone());
        }

        tracing::debug!(key = %key, "Computing locations collection");
        let registered = self.store.get_registered_locations(site).await?;
        let bindings = self.store.get_location_bindings(site).await?;
        let locations = self.shaper.locations(&registered, &bindings);
        if locations.is_empty() {
            tracing::debug!(site = %site, "No bound menu locations");
        }

        self.cache
            .put(
                key,
                CachedPayload::Locations(Arc::new(locations.clone())),
                self.ttl,
            )
            .await;

        Ok(locations)
    }

    /// Item tree of the menu bound to `location`.
    ///
    /// An unbound location, or one bound to a deleted menu, yields an
    /// empty list.
    pub async fn get_menu_location(
        &self,
        site: SiteId,
        location: &str,
    ) -> MenuResult<Vec<FormattedMenuItem>> {
        let key = CacheKey::location(site, location);

        if let Some(CachedPayload::LocationItems(items)) = self.cache.get(&key).await {
            return Ok((*items).clone());
        }

        let bindings = self.store.get_location_bindings(site).await?;
        let Some(&menu_id) = bindings.get(location) else {
            tracing::debug!(site = %site, location = %location, "Location has no menu");
            return Ok(Vec::new());
        };

        tracing::debug!(key = %key, menu_id, "Computing location items");
        let items = match self.store.get_menu(site, menu_id).await? {
            Some(menu) => self.menu_tree(site, menu.term_id.unsigned_abs()).await?,
            None => {
                tracing::warn!(
                    site = %site,
                    location = %location,
                    menu_id,
                    "Location bound to a missing menu"
                );
                Vec::new()
            }
        };

        self.cache
            .put(
                key,
                CachedPayload::LocationItems(Arc::new(items.clone())),
                self.ttl,
            )
            .await;

        Ok(items)
    }

    /// Drop every cached payload of a site.
    pub async fn invalidate_site(&self, site: SiteId) {
        tracing::info!(site = %site, "Invalidating cached menus");
        self.cache.invalidate_site(site).await;
    }

    async fn compute_menu(&self, site: SiteId, id: u64) -> MenuResult<Option<Menu>> {
        let Some(raw) = self.store.get_menu(site, id).await? else {
            return Ok(None);
        };

        let items = self.menu_tree(site, id).await?;
        Ok(Some(self.shaper.menu(&raw, items)))
    }

    /// Fetch, format, and nest the items of a menu.
    async fn menu_tree(&self, site: SiteId, menu_id: u64) -> MenuResult<Vec<FormattedMenuItem>> {
        let raw_items = self.store.list_menu_items(site, menu_id).await?;
        let slugs = self.resolve_slugs(site, &raw_items).await;

        let formatted = raw_items
            .iter()
            .map(|raw| {
                let slug = slugs
                    .get(&raw.object_id.unsigned_abs())
                    .cloned()
                    .unwrap_or_default();
                let item = self.shaper.format_menu_item(raw, slug);
                self.hooks.format_menu_item(site, item)
            })
            .collect();

        let tree = build_tree(formatted);
        if !tree.is_well_formed() {
            tracing::warn!(
                site = %site,
                menu_id,
                orphaned = ?tree.orphaned,
                cyclic = ?tree.cyclic,
                too_deep = ?tree.too_deep,
                "Menu items with broken or overly deep parent references promoted to root"
            );
        }

        Ok(tree.roots)
    }

    /// Resolve each distinct linked object once. Failures degrade to an
    /// empty slug.
    async fn resolve_slugs(&self, site: SiteId, items: &[MenuItemRaw]) -> HashMap<u64, String> {
        let mut slugs = HashMap::new();

        for item in items {
            let object_id = item.object_id.unsigned_abs();
            if object_id == 0 || slugs.contains_key(&object_id) {
                continue;
            }

            let slug = match self.store.resolve_object_slug(site, object_id).await {
                Ok(slug) => slug.unwrap_or_default(),
                Err(e) => {
                    tracing::warn!(
                        site = %site,
                        object_id,
                        error = %e,
                        "Failed to resolve object slug"
                    );
                    String::new()
                }
            };
            slugs.insert(object_id, slug);
        }

        slugs
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use async_trait::async_trait;

    use super::*;
    use crate::cache::MokaCacheStore;
    use crate::domain::MenuRaw;
    use crate::engine::NoopHooks;
    use crate::error::MenuError;

    /// In-memory content store that counts upstream reads.
    #[derive(Default)]
    struct FakeStore {
        menus: Vec<MenuRaw>,
        items: HashMap<u64, Vec<MenuItemRaw>>,
        registered: Vec<(String, String)>,
        bindings: HashMap<String, u64>,
        slugs: HashMap<u64, String>,
        failing_slugs: Vec<u64>,
        unavailable: bool,
        list_menus_calls: AtomicUsize,
        get_menu_calls: AtomicUsize,
        location_calls: AtomicUsize,
    }

    impl FakeStore {
        fn check(&self) -> MenuResult<()> {
            if self.unavailable {
                Err(MenuError::Upstream(sqlx::Error::PoolTimedOut))
            } else {
                Ok(())
            }
        }
    }

    #[async_trait]
    impl ContentStore for FakeStore {
        async fn list_menus(&self, _site: SiteId) -> MenuResult<Vec<MenuRaw>> {
            self.list_menus_calls.fetch_add(1, Ordering::SeqCst);
            self.check()?;
            Ok(self.menus.clone())
        }

        async fn get_menu(&self, _site: SiteId, id: u64) -> MenuResult<Option<MenuRaw>> {
            self.get_menu_calls.fetch_add(1, Ordering::SeqCst);
            self.check()?;
            Ok(self
                .menus
                .iter()
                .find(|m| m.term_id.unsigned_abs() == id)
                .cloned())
        }

        async fn list_menu_items(
            &self,
            _site: SiteId,
            menu_id: u64,
        ) -> MenuResult<Vec<MenuItemRaw>> {
            self.check()?;
            Ok(self.items.get(&menu_id).cloned().unwrap_or_default())
        }

        async fn get_registered_locations(
            &self,
            _site: SiteId,
        ) -> MenuResult<Vec<(String, String)>> {
            self.location_calls.fetch_add(1, Ordering::SeqCst);
            self.check()?;
            Ok(self.registered.clone())
        }

        async fn get_location_bindings(&self, _site: SiteId) -> MenuResult<HashMap<String, u64>> {
            self.check()?;
            Ok(self.bindings.clone())
        }

        async fn resolve_object_slug(
            &self,
            _site: SiteId,
            object_id: u64,
        ) -> MenuResult<Option<String>> {
            if self.failing_slugs.contains(&object_id) {
                return Err(MenuError::Upstream(sqlx::Error::RowNotFound));
            }
            Ok(self.slugs.get(&object_id).cloned())
        }
    }

    fn raw_menu(id: i64, name: &str) -> MenuRaw {
        MenuRaw {
            term_id: id,
            name: name.to_string(),
            slug: name.to_lowercase(),
            description: String::new(),
            count: 4,
        }
    }

    fn raw_item(id: i64, parent: i64, object_id: i64) -> MenuItemRaw {
        MenuItemRaw {
            id,
            menu_item_parent: parent,
            menu_order: id,
            title: format!("Item {}", id),
            url: format!("/item-{}", id),
            attr_title: String::new(),
            target: String::new(),
            classes: vec!["menu-item".to_string()],
            xfn: String::new(),
            description: String::new(),
            object_id,
            object: "page".to_string(),
            item_type: "post_type".to_string(),
            type_label: "Page".to_string(),
        }
    }

    fn populated_store() -> FakeStore {
        FakeStore {
            menus: vec![raw_menu(2, "Main"), raw_menu(5, "Footer")],
            items: HashMap::from([(
                2,
                vec![
                    raw_item(1, 0, 100),
                    raw_item(2, 1, 101),
                    raw_item(3, 1, 102),
                    raw_item(4, 2, 100),
                ],
            )]),
            registered: vec![
                ("primary".to_string(), "Primary".to_string()),
                ("footer".to_string(), "Footer".to_string()),
                ("sidebar".to_string(), "Sidebar".to_string()),
            ],
            bindings: HashMap::from([
                ("primary".to_string(), 2),
                ("sidebar".to_string(), 404),
            ]),
            slugs: HashMap::from([(100, "home".to_string()), (101, "team".to_string())]),
            failing_slugs: vec![102],
            ..FakeStore::default()
        }
    }

    fn service_with(store: Arc<FakeStore>, hooks: Arc<dyn MenuHooks>, ttl: Duration) -> MenuService {
        MenuService::new(
            store,
            Arc::new(MokaCacheStore::new(1_000)),
            ResponseShaper::new("http://cms.test/wp-json/wp-api-menus/v2"),
            hooks,
            ttl,
        )
    }

    fn service(store: Arc<FakeStore>) -> MenuService {
        service_with(store, Arc::new(NoopHooks), Duration::from_secs(3600))
    }

    fn site() -> SiteId {
        SiteId::new(1)
    }

    #[tokio::test]
    async fn test_get_menus_is_cached() {
        let store = Arc::new(populated_store());
        let service = service(store.clone());

        let first = service.get_menus(site()).await.unwrap();
        let second = service.get_menus(site()).await.unwrap();

        assert_eq!(first.len(), 2);
        assert_eq!(first, second);
        assert_eq!(first[0].meta.links.self_link, "http://cms.test/wp-json/wp-api-menus/v2/menus/2");
        assert_eq!(store.list_menus_calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_empty_menus_result_is_cached() {
        let store = Arc::new(FakeStore::default());
        let service = service(store.clone());

        assert!(service.get_menus(site()).await.unwrap().is_empty());
        assert!(service.get_menus(site()).await.unwrap().is_empty());
        assert_eq!(store.list_menus_calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_recomputes_after_ttl() {
        let store = Arc::new(populated_store());
        let service = service_with(store.clone(), Arc::new(NoopHooks), Duration::from_millis(50));

        service.get_menus(site()).await.unwrap();
        tokio::time::sleep(Duration::from_millis(150)).await;
        service.get_menus(site()).await.unwrap();

        assert_eq!(store.list_menus_calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_sites_are_cached_separately() {
        let store = Arc::new(populated_store());
        let service = service(store.clone());

        service.get_menus(SiteId::new(1)).await.unwrap();
        service.get_menus(SiteId::new(2)).await.unwrap();

        assert_eq!(store.list_menus_calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_get_menu_builds_nested_items() {
        let service = service(Arc::new(populated_store()));

        let menu = service.get_menu(site(), 2).await.unwrap().unwrap();
        assert_eq!(menu.id, 2);
        assert_eq!(menu.items.len(), 1);

        let root = &menu.items[0];
        assert_eq!(root.id, 1);
        assert_eq!(root.object_slug, "home");
        let child_ids: Vec<u64> = root.children.iter().map(|c| c.id).collect();
        assert_eq!(child_ids, vec![2, 3]);
        assert_eq!(root.children[0].children[0].id, 4);
        assert_eq!(root.children[0].object_slug, "team");
    }

    #[tokio::test]
    async fn test_failed_slug_lookup_yields_empty_slug() {
        let service = service(Arc::new(populated_store()));

        let menu = service.get_menu(site(), 2).await.unwrap().unwrap();
        let failing = &menu.items[0].children[1];
        assert_eq!(failing.object_id, 102);
        assert_eq!(failing.object_slug, "");
    }

    #[tokio::test]
    async fn test_missing_menu_is_none_and_cached() {
        let store = Arc::new(populated_store());
        let service = service(store.clone());

        assert!(service.get_menu(site(), 77).await.unwrap().is_none());
        assert!(service.get_menu(site(), 77).await.unwrap().is_none());
        assert_eq!(store.get_menu_calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_menu_zero_skips_store() {
        let store = Arc::new(populated_store());
        let service = service(store.clone());

        assert!(service.get_menu(site(), 0).await.unwrap().is_none());
        assert_eq!(store.get_menu_calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_upstream_failure_propagates() {
        let store = Arc::new(FakeStore {
            unavailable: true,
            ..FakeStore::default()
        });
        let service = service(store);

        assert!(matches!(
            service.get_menus(site()).await,
            Err(MenuError::Upstream(_))
        ));
        assert!(service.get_menu(site(), 2).await.is_err());
    }

    #[tokio::test]
    async fn test_menu_locations() {
        let store = Arc::new(populated_store());
        let service = service(store.clone());

        let locations = service.get_menu_locations(site()).await.unwrap();
        let slugs: Vec<&str> = locations.iter().map(|l| l.slug.as_str()).collect();
        assert_eq!(slugs, vec!["primary", "sidebar"]);
        assert_eq!(locations.get("primary").unwrap().label, "Primary");

        service.get_menu_locations(site()).await.unwrap();
        assert_eq!(store.location_calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_unbound_location_is_empty() {
        let service = service(Arc::new(populated_store()));

        assert!(service
            .get_menu_location(site(), "footer")
            .await
            .unwrap()
            .is_empty());
        assert!(service
            .get_menu_location(site(), "nowhere")
            .await
            .unwrap()
            .is_empty());
    }

    #[tokio::test]
    async fn test_location_bound_to_missing_menu_is_empty() {
        let service = service(Arc::new(populated_store()));

        assert!(service
            .get_menu_location(site(), "sidebar")
            .await
            .unwrap()
            .is_empty());
    }

    #[tokio::test]
    async fn test_location_items_match_menu_items() {
        let store = Arc::new(populated_store());
        let service = service(store.clone());

        let items = service.get_menu_location(site(), "primary").await.unwrap();
        let menu = service.get_menu(site(), 2).await.unwrap().unwrap();
        assert_eq!(items, menu.items);

        service.get_menu_location(site(), "primary").await.unwrap();
        // One lookup for the location, one for the menu endpoint.
        assert_eq!(store.get_menu_calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_invalidate_site_forces_recompute() {
        let store = Arc::new(populated_store());
        let service = service(store.clone());

        service.get_menus(site()).await.unwrap();
        service.invalidate_site(site()).await;
        service.get_menus(site()).await.unwrap();

        assert_eq!(store.list_menus_calls.load(Ordering::SeqCst), 2);
    }

    struct UppercaseHooks;

    impl MenuHooks for UppercaseHooks {
        fn format_menus(&self, _site: SiteId, menus: Vec<MenuSummary>) -> Vec<MenuSummary> {
            menus.into_iter().filter(|m| m.slug != "footer").collect()
        }

        fn format_menu(&self, _site: SiteId, mut menu: Menu) -> Menu {
            menu.description = "hooked".to_string();
            menu
        }

        fn format_menu_item(&self, _site: SiteId, mut item: FormattedMenuItem) -> FormattedMenuItem {
            item.title = item.title.to_uppercase();
            item
        }
    }

    #[tokio::test]
    async fn test_hooks_applied() {
        let store = Arc::new(populated_store());
        let service = service_with(store, Arc::new(UppercaseHooks), Duration::from_secs(60));

        let menus = service.get_menus(site()).await.unwrap();
        assert_eq!(menus.len(), 1);

        let menu = service.get_menu(site(), 2).await.unwrap().unwrap();
        assert_eq!(menu.description, "hooked");
        assert_eq!(menu.items[0].title, "ITEM 1");
        assert_eq!(menu.items[0].children[0].children[0].title, "ITEM 4");

        let items = service.get_menu_location(site(), "primary").await.unwrap();
        assert_eq!(items[0].title, "ITEM 1");
    }

    #[tokio::test]
    async fn test_menus_hook_runs_after_cache() {
        let store = Arc::new(populated_store());
        let cache: Arc<dyn CacheStore> = Arc::new(MokaCacheStore::new(100));
        let shaper = ResponseShaper::new("http://cms.test/wp-json/wp-api-menus/v2");
        let ttl = Duration::from_secs(60);

        let plain = MenuService::new(
            store.clone(),
            cache.clone(),
            shaper.clone(),
            Arc::new(NoopHooks),
            ttl,
        );
        let hooked = MenuService::new(store, cache, shaper, Arc::new(UppercaseHooks), ttl);

        assert_eq!(hooked.get_menus(site()).await.unwrap().len(), 1);
        // The cached collection is unfiltered.
        assert_eq!(plain.get_menus(site()).await.unwrap().len(), 2);
    }
}

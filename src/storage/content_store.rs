//! Content store interface.
//!
//! The system of record for menus, items, and locations. Every call is
//! scoped to an explicit site.

use std::collections::HashMap;

use async_trait::async_trait;

use crate::domain::{MenuItemRaw, MenuRaw, SiteId};
use crate::error::MenuResult;

/// Read access to a site's menu data.
#[async_trait]
pub trait ContentStore: Send + Sync {
    /// All menus of the site.
    async fn list_menus(&self, site: SiteId) -> MenuResult<Vec<MenuRaw>>;

    /// A single menu, or `None` if it does not exist.
    async fn get_menu(&self, site: SiteId, id: u64) -> MenuResult<Option<MenuRaw>>;

    /// Items of a menu in display order (by `menu_order`, then ID).
    async fn list_menu_items(&self, site: SiteId, menu_id: u64) -> MenuResult<Vec<MenuItemRaw>>;

    /// Registered location slugs with their labels, in registration order.
    async fn get_registered_locations(&self, site: SiteId) -> MenuResult<Vec<(String, String)>>;

    /// Location slug to bound menu ID.
    async fn get_location_bindings(&self, site: SiteId) -> MenuResult<HashMap<String, u64>>;

    /// Slug of a linked object, or `None` if the object no longer exists.
    async fn resolve_object_slug(&self, site: SiteId, object_id: u64)
        -> MenuResult<Option<String>>;
}

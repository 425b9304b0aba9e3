//! Cache keys and cached payloads.

use std::sync::Arc;

use crate::domain::{FormattedMenuItem, Menu, MenuLocations, MenuSummary, SiteId};

/// Kind of resource a cached payload belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ResourceKind {
    /// The menus collection.
    AllMenus,
    /// A single menu by ID.
    Menu,
    /// The locations collection.
    AllLocations,
    /// The item tree of a single location by slug.
    Location,
}

impl std::fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ResourceKind::AllMenus => write!(f, "get_menus"),
            ResourceKind::Menu => write!(f, "get_menu"),
            ResourceKind::AllLocations => write!(f, "menu_locations"),
            ResourceKind::Location => write!(f, "menu_location"),
        }
    }
}

/// Key of one cached payload: (site, resource kind, resource id).
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CacheKey {
    pub site: SiteId,
    pub kind: ResourceKind,
    pub resource: Option<String>,
}

impl CacheKey {
    pub fn all_menus(site: SiteId) -> Self {
        Self {
            site,
            kind: ResourceKind::AllMenus,
            resource: None,
        }
    }

    pub fn menu(site: SiteId, id: u64) -> Self {
        Self {
            site,
            kind: ResourceKind::Menu,
            resource: Some(id.to_string()),
        }
    }

    pub fn all_locations(site: SiteId) -> Self {
        Self {
            site,
            kind: ResourceKind::AllLocations,
            resource: None,
        }
    }

    pub fn location(site: SiteId, slug: &str) -> Self {
        Self {
            site,
            kind: ResourceKind::Location,
            resource: Some(slug.to_string()),
        }
    }
}

impl std::fmt::Display for CacheKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.resource {
            Some(resource) => write!(f, "site-{}:{}_{}", self.site, self.kind, resource),
            None => write!(f, "site-{}:{}", self.site, self.kind),
        }
    }
}

/// A shaped payload held by the cache.
///
/// Payloads are shared behind `Arc`; callers clone out what they return.
#[derive(Debug, Clone)]
pub enum CachedPayload {
    Menus(Arc<Vec<MenuSummary>>),
    /// `None` records that the menu does not exist.
    Menu(Arc<Option<Menu>>),
    Locations(Arc<MenuLocations>),
    LocationItems(Arc<Vec<FormattedMenuItem>>),
}

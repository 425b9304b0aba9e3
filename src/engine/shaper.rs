//! Response Shaper - maps content store records to API payloads.

use std::collections::HashMap;

use crate::config::ApiConfig;
use crate::domain::{
    FormattedMenuItem, Menu, MenuItemRaw, MenuLocation, MenuLocations, MenuRaw, MenuSummary,
    ResourceMeta,
};

/// Builds public payloads and their `meta.links`.
#[derive(Debug, Clone)]
pub struct ResponseShaper {
    menus_url: String,
    locations_url: String,
}

impl ResponseShaper {
    /// Create a shaper whose links point below `rest_url`.
    pub fn new(rest_url: &str) -> Self {
        let rest_url = rest_url.trim_end_matches('/');
        Self {
            menus_url: format!("{}/menus/", rest_url),
            locations_url: format!("{}/menu-locations/", rest_url),
        }
    }

    pub fn from_config(api: &ApiConfig) -> Self {
        Self::new(&api.rest_url())
    }

    /// Shape one raw item. `object_slug` is the already resolved slug of
    /// the linked object, empty when unknown.
    pub fn format_menu_item(&self, item: &MenuItemRaw, object_slug: String) -> FormattedMenuItem {
        FormattedMenuItem {
            id: item.id.unsigned_abs(),
            order: item.menu_order,
            parent: item.menu_item_parent.unsigned_abs(),
            title: item.title.clone(),
            url: item.url.clone(),
            attr: item.attr_title.clone(),
            target: item.target.clone(),
            classes: item.classes.join(" "),
            xfn: item.xfn.clone(),
            description: item.description.clone(),
            object_id: item.object_id.unsigned_abs(),
            object: item.object.clone(),
            object_slug,
            item_type: item.item_type.clone(),
            type_label: item.type_label.clone(),
            children: Vec::new(),
        }
    }

    /// Entry of the menus collection.
    pub fn menu_summary(&self, menu: &MenuRaw) -> MenuSummary {
        let id = menu.term_id.unsigned_abs();
        MenuSummary {
            id,
            name: menu.name.clone(),
            slug: menu.slug.clone(),
            description: menu.description.clone(),
            count: menu.count.unsigned_abs(),
            meta: ResourceMeta::new(&self.menus_url, id),
        }
    }

    /// A full menu with its root-level items.
    pub fn menu(&self, menu: &MenuRaw, items: Vec<FormattedMenuItem>) -> Menu {
        let id = menu.term_id.unsigned_abs();
        Menu {
            id,
            name: menu.name.clone(),
            slug: menu.slug.clone(),
            description: menu.description.clone(),
            count: menu.count.unsigned_abs(),
            items,
            meta: ResourceMeta::new(&self.menus_url, id),
        }
    }

    /// Bound locations in registration order.
    ///
    /// Registered slugs without a binding are skipped.
    pub fn locations(
        &self,
        registered: &[(String, String)],
        bindings: &HashMap<String, u64>,
    ) -> MenuLocations {
        let locations = registered
            .iter()
            .filter_map(|(slug, label)| {
                bindings.get(slug).map(|&menu_id| MenuLocation {
                    slug: slug.clone(),
                    id: menu_id,
                    label: label.clone(),
                    meta: ResourceMeta::new(&self.locations_url, slug),
                })
            })
            .collect();

        MenuLocations::new(locations)
    }
}

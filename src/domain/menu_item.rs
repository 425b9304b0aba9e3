//! Menu item domain types.
//!
//! `MenuItemRaw` is what the content store hands back; `FormattedMenuItem`
//! is the public API shape.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// A menu item as stored by the content store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MenuItemRaw {
    /// Item identifier, unique within its menu.
    pub id: i64,
    /// Identifier of the parent item (0 for top level).
    #[serde(default)]
    pub menu_item_parent: i64,
    /// Sibling sort key.
    #[serde(default)]
    pub menu_order: i64,
    pub title: String,
    pub url: String,
    #[serde(default)]
    pub attr_title: String,
    #[serde(default)]
    pub target: String,
    #[serde(default)]
    pub classes: Vec<String>,
    #[serde(default)]
    pub xfn: String,
    #[serde(default)]
    pub description: String,
    /// Identifier of the linked object (post, page, term...).
    #[serde(default)]
    pub object_id: i64,
    /// Linked object type, e.g. `page` or `category`.
    #[serde(default)]
    pub object: String,
    /// Item type, e.g. `post_type`, `taxonomy`, `custom`.
    #[serde(default, rename = "type")]
    pub item_type: String,
    #[serde(default)]
    pub type_label: String,
}

/// A menu item shaped for API consumers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct FormattedMenuItem {
    pub id: u64,
    pub order: i64,
    /// Parent item ID, 0 for root items.
    pub parent: u64,
    pub title: String,
    pub url: String,
    /// Title attribute of the link.
    pub attr: String,
    pub target: String,
    /// CSS classes joined by single spaces.
    pub classes: String,
    pub xfn: String,
    pub description: String,
    pub object_id: u64,
    pub object: String,
    /// Slug of the linked object, empty when it cannot be resolved.
    pub object_slug: String,
    #[serde(rename = "type")]
    pub item_type: String,
    pub type_label: String,
    /// Nested items, in display order.
    #[schema(no_recursion)]
    pub children: Vec<FormattedMenuItem>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_raw_item_defaults() {
        let raw: MenuItemRaw = serde_json::from_value(serde_json::json!({
            "id": 5,
            "title": "Home",
            "url": "https://example.test/"
        }))
        .unwrap();

        assert_eq!(raw.menu_item_parent, 0);
        assert!(raw.classes.is_empty());
        assert_eq!(raw.item_type, "");
    }

    #[test]
    fn test_formatted_item_field_names() {
        let item = FormattedMenuItem {
            id: 3,
            order: 1,
            parent: 0,
            title: "About".to_string(),
            url: "/about".to_string(),
            attr: String::new(),
            target: "_blank".to_string(),
            classes: "menu-item nav".to_string(),
            xfn: String::new(),
            description: String::new(),
            object_id: 42,
            object: "page".to_string(),
            object_slug: "about".to_string(),
            item_type: "post_type".to_string(),
            type_label: "Page".to_string(),
            children: Vec::new(),
        };

        let json = serde_json::to_value(&item).unwrap();
        assert_eq!(json["type"], "post_type");
        assert_eq!(json["object_slug"], "about");
        assert_eq!(json["children"], serde_json::json!([]));
        assert!(json.get("item_type").is_none());
    }
}

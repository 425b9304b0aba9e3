//! Database models for the content store.
//!
//! These are the row types returned by SQLx queries.

use sqlx::FromRow;

use crate::domain::{MenuItemRaw, MenuRaw};

/// Database row for the menus table, with its item count.
#[derive(Debug, Clone, FromRow)]
pub struct MenuRow {
    pub term_id: i64,
    pub name: String,
    pub slug: String,
    pub description: String,
    pub count: i64,
}

impl From<MenuRow> for MenuRaw {
    fn from(row: MenuRow) -> Self {
        MenuRaw {
            term_id: row.term_id,
            name: row.name,
            slug: row.slug,
            description: row.description,
            count: row.count,
        }
    }
}

/// Database row for the menu_items table.
#[derive(Debug, Clone, FromRow)]
pub struct MenuItemRow {
    pub id: i64,
    pub menu_item_parent: i64,
    pub menu_order: i64,
    pub title: String,
    pub url: String,
    pub attr_title: String,
    pub target: String,
    /// JSON array of class names.
    pub classes: String,
    pub xfn: String,
    pub description: String,
    pub object_id: i64,
    pub object: String,
    pub item_type: String,
    pub type_label: String,
}

impl TryFrom<MenuItemRow> for MenuItemRaw {
    type Error = crate::error::MenuError;

    fn try_from(row: MenuItemRow) -> Result<Self, Self::Error> {
        Ok(MenuItemRaw {
            id: row.id,
            menu_item_parent: row.menu_item_parent,
            menu_order: row.menu_order,
            title: row.title,
            url: row.url,
            attr_title: row.attr_title,
            target: row.target,
            classes: serde_json::from_str(&row.classes)?,
            xfn: row.xfn,
            description: row.description,
            object_id: row.object_id,
            object: row.object,
            item_type: row.item_type,
            type_label: row.type_label,
        })
    }
}

/// Database row for the menu_locations table.
#[derive(Debug, Clone, FromRow)]
pub struct LocationRow {
    pub slug: String,
    pub label: String,
}

/// Database row for the location_bindings table.
#[derive(Debug, Clone, FromRow)]
pub struct BindingRow {
    pub slug: String,
    pub menu_id: i64,
}

//! Menu domain types.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::{FormattedMenuItem, ResourceMeta};

/// A menu as stored by the content store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MenuRaw {
    pub term_id: i64,
    pub name: String,
    pub slug: String,
    #[serde(default)]
    pub description: String,
    /// Number of items in the menu.
    #[serde(default)]
    pub count: i64,
}

/// Entry of the menus collection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct MenuSummary {
    #[serde(rename = "ID")]
    pub id: u64,
    pub name: String,
    pub slug: String,
    pub description: String,
    pub count: u64,
    pub meta: ResourceMeta,
}

/// A single menu with its nested items.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct Menu {
    #[serde(rename = "ID")]
    pub id: u64,
    pub name: String,
    pub slug: String,
    pub description: String,
    pub count: u64,
    /// Root-level items; each carries its own children.
    pub items: Vec<FormattedMenuItem>,
    pub meta: ResourceMeta,
}

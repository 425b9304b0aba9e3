//! Repository layer for database operations.

use std::collections::HashMap;

use async_trait::async_trait;
use sqlx::sqlite::SqlitePool;

use crate::domain::{MenuItemRaw, MenuRaw, SiteId};
use crate::error::MenuResult;
use crate::storage::models::{BindingRow, LocationRow, MenuItemRow, MenuRow};
use crate::storage::ContentStore;

/// SQLite-backed content store.
#[derive(Clone)]
pub struct MenuRepository {
    pool: SqlitePool,
}

impl MenuRepository {
    /// Get a reference to the underlying pool.
    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }
}

fn site_param(site: SiteId) -> i64 {
    site.get()
}

/// Content IDs are SQLite integers; anything above `i64::MAX` cannot exist.
fn id_param(id: u64) -> Option<i64> {
    i64::try_from(id).ok()
}

impl MenuRepository {
    /// Create a new repository with the given connection pool.
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Initialize the database schema.
    pub async fn init_schema(&self) -> MenuResult<()> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS menus (
                site_id INTEGER NOT NULL,
                term_id INTEGER NOT NULL,
                name TEXT NOT NULL,
                slug TEXT NOT NULL,
                description TEXT NOT NULL DEFAULT '',
                PRIMARY KEY (site_id, term_id)
            );
            "#,
        )
        .execute(&self.pool)
        .await?;

        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS menu_items (
                site_id INTEGER NOT NULL,
                id INTEGER NOT NULL,
                menu_id INTEGER NOT NULL,
                menu_item_parent INTEGER NOT NULL DEFAULT 0,
                menu_order INTEGER NOT NULL DEFAULT 0,
                title TEXT NOT NULL,
                url TEXT NOT NULL,
                attr_title TEXT NOT NULL DEFAULT '',
                target TEXT NOT NULL DEFAULT '',
                classes TEXT NOT NULL DEFAULT '[]',
                xfn TEXT NOT NULL DEFAULT '',
                description TEXT NOT NULL DEFAULT '',
                object_id INTEGER NOT NULL DEFAULT 0,
                object TEXT NOT NULL DEFAULT '',
                item_type TEXT NOT NULL DEFAULT '',
                type_label TEXT NOT NULL DEFAULT '',
                PRIMARY KEY (site_id, id)
            );

            CREATE INDEX IF NOT EXISTS idx_menu_items_menu ON menu_items(site_id, menu_id, menu_order);
            "#,
        )
        .execute(&self.pool)
        .await?;

        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS objects (
                site_id INTEGER NOT NULL,
                id INTEGER NOT NULL,
                slug TEXT NOT NULL,
                PRIMARY KEY (site_id, id)
            );
            "#,
        )
        .execute(&self.pool)
        .await?;

        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS menu_locations (
                site_id INTEGER NOT NULL,
                slug TEXT NOT NULL,
                label TEXT NOT NULL,
                position INTEGER NOT NULL DEFAULT 0,
                PRIMARY KEY (site_id, slug)
            );

            CREATE TABLE IF NOT EXISTS location_bindings (
                site_id INTEGER NOT NULL,
                slug TEXT NOT NULL,
                menu_id INTEGER NOT NULL,
                PRIMARY KEY (site_id, slug)
            );
            "#,
        )
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    // ==================== Fixture Writes ====================

    /// Insert or replace a menu.
    pub async fn save_menu(&self, site: SiteId, menu: &MenuRaw) -> MenuResult<()> {
        sqlx::query(
            r#"
            INSERT OR REPLACE INTO menus (site_id, term_id, name, slug, description)
            VALUES (?, ?, ?, ?, ?)
            "#,
        )
        .bind(site_param(site))
        .bind(menu.term_id)
        .bind(&menu.name)
        .bind(&menu.slug)
        .bind(&menu.description)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// Insert or replace a menu item belonging to `menu_id`.
    pub async fn save_menu_item(
        &self,
        site: SiteId,
        menu_id: i64,
        item: &MenuItemRaw,
    ) -> MenuResult<()> {
        sqlx::query(
            r#"
            INSERT OR REPLACE INTO menu_items (
                site_id, id, menu_id, menu_item_parent, menu_order, title, url,
                attr_title, target, classes, xfn, description, object_id, object,
                item_type, type_label
            )
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(site_param(site))
        .bind(item.id)
        .bind(menu_id)
        .bind(item.menu_item_parent)
        .bind(item.menu_order)
        .bind(&item.title)
        .bind(&item.url)
        .bind(&item.attr_title)
        .bind(&item.target)
        .bind(serde_json::to_string(&item.classes)?)
        .bind(&item.xfn)
        .bind(&item.description)
        .bind(item.object_id)
        .bind(&item.object)
        .bind(&item.item_type)
        .bind(&item.type_label)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// Insert or replace a linkable object's slug.
    pub async fn save_object(&self, site: SiteId, id: i64, slug: &str) -> MenuResult<()> {
        sqlx::query("INSERT OR REPLACE INTO objects (site_id, id, slug) VALUES (?, ?, ?)")
            .bind(site_param(site))
            .bind(id)
            .bind(slug)
            .execute(&self.pool)
            .await?;

        Ok(())
    }

    /// Register a theme location; `position` orders the collection.
    pub async fn register_location(
        &self,
        site: SiteId,
        slug: &str,
        label: &str,
        position: i64,
    ) -> MenuResult<()> {
        sqlx::query(
            r#"
            INSERT OR REPLACE INTO menu_locations (site_id, slug, label, position)
            VALUES (?, ?, ?, ?)
            "#,
        )
        .bind(site_param(site))
        .bind(slug)
        .bind(label)
        .bind(position)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// Bind a menu to a location.
    pub async fn bind_location(&self, site: SiteId, slug: &str, menu_id: i64) -> MenuResult<()> {
        sqlx::query(
            "INSERT OR REPLACE INTO location_bindings (site_id, slug, menu_id) VALUES (?, ?, ?)",
        )
        .bind(site_param(site))
        .bind(slug)
        .bind(menu_id)
        .execute(&self.pool)
        .await?;

        Ok(())
    }
}

// ==================== Content Store Reads ====================

const MENU_COLUMNS: &str = r#"
    m.term_id, m.name, m.slug, m.description,
    (SELECT COUNT(*) FROM menu_items i
        WHERE i.site_id = m.site_id AND i.menu_id = m.term_id) AS count
"#;

#[async_trait]
impl ContentStore for MenuRepository {
    async fn list_menus(&self, site: SiteId) -> MenuResult<Vec<MenuRaw>> {
        let rows = sqlx::query_as::<_, MenuRow>(&format!(
            "SELECT {} FROM menus m WHERE m.site_id = ? ORDER BY m.name, m.term_id",
            MENU_COLUMNS
        ))
        .bind(site_param(site))
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(MenuRaw::from).collect())
    }

    async fn get_menu(&self, site: SiteId, id: u64) -> MenuResult<Option<MenuRaw>> {
        let Some(id) = id_param(id) else {
            return Ok(None);
        };

        let row = sqlx::query_as::<_, MenuRow>(&format!(
            "SELECT {} FROM menus m WHERE m.site_id = ? AND m.term_id = ?",
            MENU_COLUMNS
        ))
        .bind(site_param(site))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(MenuRaw::from))
    }

    async fn list_menu_items(&self, site: SiteId, menu_id: u64) -> MenuResult<Vec<MenuItemRaw>> {
        let Some(menu_id) = id_param(menu_id) else {
            return Ok(Vec::new());
        };

        let rows = sqlx::query_as::<_, MenuItemRow>(
            r#"
            SELECT id, menu_item_parent, menu_order, title, url, attr_title, target,
                   classes, xfn, description, object_id, object, item_type, type_label
            FROM menu_items
            WHERE site_id = ? AND menu_id = ?
            ORDER BY menu_order, id
            "#,
        )
        .bind(site_param(site))
        .bind(menu_id)
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(MenuItemRaw::try_from).collect()
    }

    async fn get_registered_locations(&self, site: SiteId) -> MenuResult<Vec<(String, String)>> {
        let rows = sqlx::query_as::<_, LocationRow>(
            "SELECT slug, label FROM menu_locations WHERE site_id = ? ORDER BY position, rowid",
        )
        .bind(site_param(site))
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(|r| (r.slug, r.label)).collect())
    }

    async fn get_location_bindings(&self, site: SiteId) -> MenuResult<HashMap<String, u64>> {
        let rows = sqlx::query_as::<_, BindingRow>(
            "SELECT slug, menu_id FROM location_bindings WHERE site_id = ?",
        )
        .bind(site_param(site))
        .fetch_all(&self.pool)
        .await?;

        Ok(rows
            .into_iter()
            .map(|r| (r.slug, r.menu_id.unsigned_abs()))
            .collect())
    }

    async fn resolve_object_slug(
        &self,
        site: SiteId,
        object_id: u64,
    ) -> MenuResult<Option<String>> {
        let Some(object_id) = id_param(object_id) else {
            return Ok(None);
        };

        let slug = sqlx::query_scalar::<_, String>(
            "SELECT slug FROM objects WHERE site_id = ? AND id = ?",
        )
        .bind(site_param(site))
        .bind(object_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(slug)
    }
}

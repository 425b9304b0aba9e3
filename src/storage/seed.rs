//! JSON fixture loader for the content store.
//!
//! Lets the service run standalone against a local SQLite file.

use std::path::Path;

use serde::Deserialize;

use crate::domain::{MenuItemRaw, MenuRaw, SiteId};
use crate::error::MenuResult;
use crate::storage::MenuRepository;

/// Top-level fixture document.
#[derive(Debug, Deserialize)]
pub struct Fixture {
    pub sites: Vec<SiteFixture>,
}

/// Content of one site.
#[derive(Debug, Deserialize)]
pub struct SiteFixture {
    pub id: SiteId,
    #[serde(default)]
    pub menus: Vec<MenuFixture>,
    #[serde(default)]
    pub objects: Vec<ObjectFixture>,
    #[serde(default)]
    pub locations: Vec<LocationFixture>,
}

#[derive(Debug, Deserialize)]
pub struct MenuFixture {
    #[serde(flatten)]
    pub menu: MenuRaw,
    #[serde(default)]
    pub items: Vec<MenuItemRaw>,
}

#[derive(Debug, Deserialize)]
pub struct ObjectFixture {
    pub id: i64,
    pub slug: String,
}

#[derive(Debug, Deserialize)]
pub struct LocationFixture {
    pub slug: String,
    pub label: String,
    /// Bound menu, if any.
    #[serde(default)]
    pub menu_id: Option<i64>,
}

impl Fixture {
    /// Read and parse a fixture file.
    pub async fn read(path: &Path) -> MenuResult<Self> {
        let contents = tokio::fs::read_to_string(path).await.map_err(|e| {
            crate::error::MenuError::Config(format!(
                "cannot read seed file {}: {}",
                path.display(),
                e
            ))
        })?;

        Ok(serde_json::from_str(&contents)?)
    }

    /// Write every site of the fixture into the repository.
    ///
    /// Returns the IDs of the sites that were written.
    pub async fn apply(&self, repo: &MenuRepository) -> MenuResult<Vec<SiteId>> {
        let mut sites = Vec::with_capacity(self.sites.len());

        for site in &self.sites {
            for menu in &site.menus {
                repo.save_menu(site.id, &menu.menu).await?;
                for item in &menu.items {
                    repo.save_menu_item(site.id, menu.menu.term_id, item).await?;
                }
            }

            for object in &site.objects {
                repo.save_object(site.id, object.id, &object.slug).await?;
            }

            for (position, location) in site.locations.iter().enumerate() {
                repo.register_location(site.id, &location.slug, &location.label, position as i64)
                    .await?;
                if let Some(menu_id) = location.menu_id {
                    repo.bind_location(site.id, &location.slug, menu_id).await?;
                }
            }

            tracing::info!(
                site = %site.id,
                menus = site.menus.len(),
                locations = site.locations.len(),
                "Seeded site content"
            );
            sites.push(site.id);
        }

        Ok(sites)
    }
}

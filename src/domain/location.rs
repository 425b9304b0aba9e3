//! Menu location domain types.

use serde::ser::{Serialize, SerializeMap, SerializeSeq, Serializer};
use utoipa::ToSchema;

use super::ResourceMeta;

/// A theme location with the menu bound to it.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, ToSchema)]
pub struct MenuLocation {
    /// Location slug; serialized as the key of the collection map.
    #[serde(skip)]
    pub slug: String,
    /// ID of the bound menu.
    #[serde(rename = "ID")]
    pub id: u64,
    /// Human readable label registered for the location.
    pub label: String,
    pub meta: ResourceMeta,
}

/// All bound locations of a site, in registration order.
///
/// Serializes as a JSON object keyed by slug, or as `[]` when no location
/// is bound.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MenuLocations(Vec<MenuLocation>);

impl MenuLocations {
    pub fn new(locations: Vec<MenuLocation>) -> Self {
        Self(locations)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    #[cfg(test)]
    pub fn get(&self, slug: &str) -> Option<&MenuLocation> {
        self.0.iter().find(|l| l.slug == slug)
    }

    #[cfg(test)]
    pub fn iter(&self) -> impl Iterator<Item = &MenuLocation> {
        self.0.iter()
    }
}

impl Serialize for MenuLocations {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        if self.0.is_empty() {
            return serializer.serialize_seq(Some(0))?.end();
        }

        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for location in &self.0 {
            map.serialize_entry(&location.slug, location)?;
        }
        map.end()
    }
}

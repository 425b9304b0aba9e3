//! Hypermedia metadata attached to top-level payloads.

use serde::Serialize;
use utoipa::ToSchema;

/// `meta` block of a menu or location payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct ResourceMeta {
    pub links: ResourceLinks,
}

/// Links to the owning collection and to the resource itself.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct ResourceLinks {
    /// URL of the collection endpoint (always ends with `/`).
    pub collection: String,
    /// URL of this resource.
    #[serde(rename = "self")]
    pub self_link: String,
}

impl ResourceMeta {
    /// Build links for a resource living under `collection`.
    pub fn new(collection: &str, resource: impl std::fmt::Display) -> Self {
        Self {
            links: ResourceLinks {
                collection: collection.to_string(),
                self_link: format!("{}{}", collection, resource),
            },
        }
    }
}

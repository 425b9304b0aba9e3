//! HTTP request handlers.
//!
//! Every menu endpoint answers 200 with JSON. Missing menus and unbound
//! locations produce empty payloads rather than 404s.

use std::collections::HashMap;

use axum::{
    extract::{Path, State},
    response::{IntoResponse, Response},
    Extension, Json,
};

use crate::api::types::*;
use crate::domain::{FormattedMenuItem, Menu, MenuLocation, MenuLocations, MenuSummary, SiteId};
use crate::error::{MenuError, MenuResult};
use crate::AppState;

/// Whether `location` is a valid location slug (`[a-zA-Z0-9_-]+`).
fn is_location_slug(location: &str) -> bool {
    !location.is_empty()
        && location
            .bytes()
            .all(|b| b.is_ascii_alphanumeric() || b == b'_' || b == b'-')
}

/// List all menus of the site.
///
/// GET /menus
#[utoipa::path(
    get,
    path = "/wp-json/wp-api-menus/v2/menus",
    params(
        ("X-Site-Id" = Option<u64>, Header, description = "Site to serve (defaults to the configured site)")
    ),
    responses(
        (status = 200, description = "All menus", body = Vec<MenuSummary>),
        (status = 400, description = "Invalid site header"),
        (status = 500, description = "Content store unavailable")
    ),
    tag = "menus"
)]
pub async fn get_menus(
    State(state): State<AppState>,
    Extension(site): Extension<SiteId>,
) -> MenuResult<Json<Vec<MenuSummary>>> {
    let menus = state.menus.get_menus(site).await?;

    tracing::debug!(site = %site, count = menus.len(), "Served menus");

    Ok(Json(menus))
}

/// Get a single menu with nested items.
///
/// GET /menus/{id}
#[utoipa::path(
    get,
    path = "/wp-json/wp-api-menus/v2/menus/{id}",
    params(
        ("id" = u64, Path, description = "Menu ID"),
        ("X-Site-Id" = Option<u64>, Header, description = "Site to serve (defaults to the configured site)")
    ),
    responses(
        (status = 200, description = "Menu, or an empty array if it does not exist", body = Menu),
        (status = 400, description = "Invalid menu ID or site header"),
        (status = 500, description = "Content store unavailable")
    ),
    tag = "menus"
)]
pub async fn get_menu(
    State(state): State<AppState>,
    Extension(site): Extension<SiteId>,
    Path(id): Path<u64>,
) -> MenuResult<Response> {
    match state.menus.get_menu(site, id).await? {
        Some(menu) => Ok(Json(menu).into_response()),
        None => {
            tracing::debug!(site = %site, menu_id = id, "Menu not found");
            Ok(Json(serde_json::Value::Array(Vec::new())).into_response())
        }
    }
}

/// List all bound menu locations, keyed by slug.
///
/// GET /menu-locations
#[utoipa::path(
    get,
    path = "/wp-json/wp-api-menus/v2/menu-locations",
    params(
        ("X-Site-Id" = Option<u64>, Header, description = "Site to serve (defaults to the configured site)")
    ),
    responses(
        (status = 200, description = "Locations keyed by slug", body = HashMap<String, MenuLocation>),
        (status = 400, description = "Invalid site header"),
        (status = 500, description = "Content store unavailable")
    ),
    tag = "locations"
)]
pub async fn get_menu_locations(
    State(state): State<AppState>,
    Extension(site): Extension<SiteId>,
) -> MenuResult<Json<MenuLocations>> {
    let locations = state.menus.get_menu_locations(site).await?;

    Ok(Json(locations))
}

/// Get the item tree of the menu bound to a location.
///
/// GET /menu-locations/{location}
#[utoipa::path(
    get,
    path = "/wp-json/wp-api-menus/v2/menu-locations/{location}",
    params(
        ("location" = String, Path, description = "Location slug ([a-zA-Z0-9_-]+)"),
        ("X-Site-Id" = Option<u64>, Header, description = "Site to serve (defaults to the configured site)")
    ),
    responses(
        (status = 200, description = "Root items with nested children, empty if unbound", body = Vec<FormattedMenuItem>),
        (status = 400, description = "Invalid site header"),
        (status = 404, description = "Malformed location slug"),
        (status = 500, description = "Content store unavailable")
    ),
    tag = "locations"
)]
pub async fn get_menu_location(
    State(state): State<AppState>,
    Extension(site): Extension<SiteId>,
    Path(location): Path<String>,
) -> MenuResult<Json<Vec<FormattedMenuItem>>> {
    if !is_location_slug(&location) {
        return Err(MenuError::NotFound(format!(
            "No route for location '{}'",
            location
        )));
    }

    let items = state.menus.get_menu_location(site, &location).await?;

    Ok(Json(items))
}

/// Health check endpoint.
///
/// GET /health
#[utoipa::path(
    get,
    path = "/health",
    responses(
        (status = 200, description = "Service is healthy", body = HealthResponse)
    ),
    tag = "health"
)]
pub async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    // Check database connectivity
    let db_status = match sqlx::query("SELECT 1")
        .fetch_one(state.repository.pool())
        .await
    {
        Ok(_) => "connected".to_string(),
        Err(e) => format!("error: {}", e),
    };

    Json(HealthResponse {
        status: "healthy".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        database: db_status,
        timestamp: chrono::Utc::now().to_rfc3339(),
    })
}

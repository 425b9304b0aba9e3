//! Route definitions for the API.

use axum::{http::Method, middleware, routing::get, Router};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::api::handlers;
use crate::api::site::resolve_site;
use crate::domain::SiteId;
use crate::AppState;

/// OpenAPI documentation.
#[derive(OpenApi)]
#[openapi(
    paths(
        handlers::get_menus,
        handlers::get_menu,
        handlers::get_menu_locations,
        handlers::get_menu_location,
        handlers::health_check,
    ),
    components(schemas(
        crate::api::types::HealthResponse,
        crate::domain::MenuSummary,
        crate::domain::Menu,
        crate::domain::FormattedMenuItem,
        crate::domain::MenuLocation,
        crate::domain::ResourceMeta,
        crate::domain::ResourceLinks,
    )),
    tags(
        (name = "menus", description = "Navigation menus"),
        (name = "locations", description = "Theme menu locations"),
        (name = "health", description = "Health and status endpoints")
    ),
    info(
        title = "Menu API",
        version = "0.1.0",
        description = "Read-only REST API for CMS navigation menus and menu locations",
        license(name = "MIT")
    )
)]
pub struct ApiDoc;

/// Build the API router.
///
/// Menu endpoints are nested under `mount_path`; requests without an
/// `X-Site-Id` header are served for `default_site`.
pub fn build_router(state: AppState, mount_path: &str, default_site: SiteId) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::HEAD, Method::OPTIONS])
        .allow_headers(Any);

    let menu_routes = Router::new()
        .route("/menus", get(handlers::get_menus))
        .route("/menus/:id", get(handlers::get_menu))
        .route("/menu-locations", get(handlers::get_menu_locations))
        .route("/menu-locations/:location", get(handlers::get_menu_location))
        .layer(middleware::from_fn_with_state(default_site, resolve_site));

    Router::new()
        .nest(mount_path, menu_routes)
        // Health
        .route("/health", get(handlers::health_check))
        .with_state(state)
        // OpenAPI docs
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        // Middleware
        .layer(TraceLayer::new_for_http())
        .layer(cors)
}

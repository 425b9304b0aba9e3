//! Menu API - read-only REST API for CMS navigation menus
//!
//! Serves menus, nested menu items, and theme menu locations per site,
//! with a read-through TTL cache in front of the content store.

use std::path::Path;
use std::sync::Arc;

use sqlx::sqlite::{SqliteConnectOptions, SqlitePool};
use tokio::net::TcpListener;

mod api;
mod cache;
mod config;
mod domain;
mod engine;
mod error;
mod logging;
mod storage;

use crate::api::build_router;
use crate::cache::MokaCacheStore;
use crate::config::Config;
use crate::engine::{MenuService, NoopHooks, ResponseShaper};
use crate::storage::{Fixture, MenuRepository};

/// Application state shared across handlers.
#[derive(Clone)]
pub struct AppState {
    /// Read-through menu service.
    pub menus: Arc<MenuService>,
    /// Content store repository.
    pub repository: MenuRepository,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables from .env file (if present)
    // This is optional and won't fail if .env doesn't exist
    if let Err(e) = dotenvy::dotenv() {
        eprintln!("Note: No .env file loaded ({e})");
    }

    // Initialize logging
    logging::init();

    tracing::info!("Starting Menu API v{}", env!("CARGO_PKG_VERSION"));

    // Load configuration
    let config = Config::load().map_err(|e| {
        tracing::error!(error = %e, "Failed to load configuration");
        anyhow::anyhow!("Configuration error: {}", e)
    })?;

    tracing::info!(
        host = %config.server.host,
        port = %config.server.port,
        database = %config.database.url,
        namespace = %config.api.namespace,
        cache_ttl_secs = config.cache.ttl_secs,
        default_site = %config.site.default_id,
        "Configuration loaded"
    );

    // Connect to database
    let options = config
        .database
        .url
        .parse::<SqliteConnectOptions>()
        .map_err(|e| anyhow::anyhow!("Invalid database URL: {}", e))?
        .create_if_missing(true);
    let pool = SqlitePool::connect_with(options).await.map_err(|e| {
        tracing::error!(error = %e, "Failed to connect to database");
        anyhow::anyhow!("Database connection error: {}", e)
    })?;

    // Initialize repository and schema
    let repository = MenuRepository::new(pool);
    repository.init_schema().await.map_err(|e| {
        tracing::error!(error = %e, "Failed to initialize database schema");
        anyhow::anyhow!("Schema initialization error: {}", e)
    })?;

    tracing::info!("Database connected and schema initialized");

    // Build the menu service
    let menus = Arc::new(MenuService::new(
        Arc::new(repository.clone()),
        Arc::new(MokaCacheStore::new(config.cache.max_capacity)),
        ResponseShaper::from_config(&config.api),
        Arc::new(NoopHooks),
        config.cache.ttl(),
    ));

    // Seed content if a fixture is configured
    if let Some(seed_path) = &config.database.seed_path {
        let fixture = Fixture::read(Path::new(seed_path)).await.map_err(|e| {
            tracing::error!(error = %e, path = %seed_path, "Failed to read seed file");
            anyhow::anyhow!("Seed error: {}", e)
        })?;
        for site in fixture.apply(&repository).await? {
            menus.invalidate_site(site).await;
        }
    }

    // Build application state
    let state = AppState { menus, repository };

    // Build router
    let mount_path = config.api.mount_path();
    let app = build_router(state, &mount_path, config.site.default_id);

    // Start server
    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = TcpListener::bind(&addr).await?;

    tracing::info!(address = %addr, mount_path = %mount_path, "Server listening");
    tracing::info!("Swagger UI available at http://{}/swagger-ui/", addr);

    axum::serve(listener, app).await?;

    Ok(())
}

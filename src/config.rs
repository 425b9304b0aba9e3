//! Configuration module for the Menu API.
//!
//! Loads configuration from YAML files and environment variables.

use config::{Config as ConfigLoader, ConfigError, Environment, File};
use serde::Deserialize;

use crate::domain::SiteId;

/// Root configuration structure.
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    #[serde(default)]
    pub api: ApiConfig,
    #[serde(default)]
    pub cache: CacheConfig,
    #[serde(default)]
    pub site: SiteConfig,
}

/// Server configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

/// Database configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    pub url: String,
    /// JSON fixture loaded into the content store at startup.
    #[serde(default)]
    pub seed_path: Option<String>,
}

/// Public URL layout of the API.
#[derive(Debug, Clone, Deserialize)]
pub struct ApiConfig {
    /// Scheme and host used when building `meta.links`.
    pub public_url: String,
    /// Prefix under which all REST namespaces are mounted.
    pub route_prefix: String,
    /// Namespace of this API below the route prefix.
    pub namespace: String,
}

/// Cache configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct CacheConfig {
    /// Time-to-live of every cached payload.
    pub ttl_secs: u64,
    /// Maximum number of cached payloads across all sites.
    pub max_capacity: u64,
}

/// Site selection configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct SiteConfig {
    /// Site served when a request carries no `X-Site-Id` header.
    pub default_id: SiteId,
}

impl Config {
    /// Load configuration from files and environment.
    ///
    /// Priority (highest to lowest):
    /// 1. Environment variables (MENUS__*)
    /// 2. config/local.yaml (if exists)
    /// 3. config/default.yaml
    pub fn load() -> Result<Self, ConfigError> {
        let config = ConfigLoader::builder()
            // Start with default config
            .add_source(File::with_name("config/default").required(false))
            // Layer on local overrides
            .add_source(File::with_name("config/local").required(false))
            // Layer on environment variables with MENUS_ prefix
            .add_source(
                Environment::with_prefix("MENUS")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        config.try_deserialize()
    }
}

impl ApiConfig {
    /// Base REST URL of the namespace, without trailing slash.
    pub fn rest_url(&self) -> String {
        format!(
            "{}{}",
            self.public_url.trim_end_matches('/'),
            self.mount_path()
        )
    }

    /// Path the router nests the API under, e.g. `/wp-json/wp-api-menus/v2`.
    pub fn mount_path(&self) -> String {
        let segments: Vec<&str> = [&self.route_prefix, &self.namespace]
            .into_iter()
            .map(|segment| segment.trim_matches('/'))
            .filter(|segment| !segment.is_empty())
            .collect();

        format!("/{}", segments.join("/"))
    }
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            public_url: "http://localhost:8080".to_string(),
            route_prefix: "/wp-json".to_string(),
            namespace: "wp-api-menus/v2".to_string(),
        }
    }
}

impl CacheConfig {
    pub fn ttl(&self) -> std::time::Duration {
        std::time::Duration::from_secs(self.ttl_secs)
    }
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            ttl_secs: 24 * 60 * 60,
            max_capacity: 10_000,
        }
    }
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            default_id: SiteId::default(),
        }
    }
}

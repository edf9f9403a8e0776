//! Application configuration.

use serde::Deserialize;
use std::path::Path;

use crate::storage::StorageConfig;

/// Application configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    /// Server configuration.
    pub server: ServerConfig,
    /// Database configuration.
    pub database: DatabaseConfig,
    /// Blob storage configuration.
    #[serde(default)]
    pub storage: StorageConfig,
    /// Cascade tuning.
    #[serde(default)]
    pub cascade: CascadeConfig,
    /// Authentication configuration.
    pub auth: AuthConfig,
}

/// Server configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    /// Host to bind to.
    #[serde(default = "default_host")]
    pub host: String,
    /// Port to bind to.
    #[serde(default = "default_port")]
    pub port: u16,
    /// Public URL of this instance.
    pub url: String,
}

/// Database connection configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    /// `PostgreSQL` connection URL.
    pub url: String,
    /// Maximum number of connections in the pool.
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
    /// Minimum number of connections in the pool.
    #[serde(default = "default_min_connections")]
    pub min_connections: u32,
}

/// Bounds and schedules for the deletion cascade.
#[derive(Debug, Clone, Deserialize)]
pub struct CascadeConfig {
    /// Maximum number of blob deletions in flight for one trigger.
    #[serde(default = "default_blob_concurrency")]
    pub blob_concurrency: usize,
    /// Maximum number of frame subtrees purged concurrently.
    #[serde(default = "default_frame_concurrency")]
    pub frame_concurrency: usize,
    /// Interval of the orphaned image sweep; disabled when unset.
    #[serde(default)]
    pub orphan_sweep_interval_secs: Option<u64>,
    /// Number of orphaned images handled per sweep.
    #[serde(default = "default_orphan_sweep_batch")]
    pub orphan_sweep_batch: u64,
}

impl Default for CascadeConfig {
    fn default() -> Self {
        Self {
            blob_concurrency: default_blob_concurrency(),
            frame_concurrency: default_frame_concurrency(),
            orphan_sweep_interval_secs: None,
            orphan_sweep_batch: default_orphan_sweep_batch(),
        }
    }
}

/// Authentication configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct AuthConfig {
    /// HMAC secret used to verify bearer tokens.
    pub jwt_secret: String,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

const fn default_port() -> u16 {
    5000
}

const fn default_max_connections() -> u32 {
    20
}

const fn default_min_connections() -> u32 {
    2
}

const fn default_blob_concurrency() -> usize {
    8
}

const fn default_frame_concurrency() -> usize {
    4
}

const fn default_orphan_sweep_batch() -> u64 {
    100
}

impl Config {
    /// Load configuration from files and environment variables.
    ///
    /// Configuration is loaded in the following order:
    /// 1. `.env` (if present)
    /// 2. `config/default.toml`
    /// 3. `config/{environment}.toml` (based on `GALERIE_ENV`)
    /// 4. Environment variables with `GALERIE__` prefix
    pub fn load() -> Result<Self, config::ConfigError> {
        dotenvy::dotenv().ok();
        let env = std::env::var("GALERIE_ENV").unwrap_or_else(|_| "development".to_string());

        let config = config::Config::builder()
            .add_source(config::File::with_name("config/default").required(false))
            .add_source(config::File::with_name(&format!("config/{env}")).required(false))
            .add_source(
                config::Environment::with_prefix("GALERIE")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        config.try_deserialize()
    }

    /// Load configuration from a specific file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, config::ConfigError> {
        let config = config::Config::builder()
            .add_source(config::File::from(path.as_ref()))
            .add_source(
                config::Environment::with_prefix("GALERIE")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        config.try_deserialize()
    }
}

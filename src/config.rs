use config::{Config, Environment, File};
use serde::Deserialize;
use std::env;
use tracing_subscriber::EnvFilter;
use url::Url;
use validator::{Validate, ValidationError};

use crate::errors::ServiceError;

const DEFAULT_LOG_LEVEL: &str = "info";
const DEFAULT_ENV: &str = "development";
const DEFAULT_TIMEOUT_SECS: u64 = 30;
const DEFAULT_CACHE_TTL_SECS: u64 = 300;
const DEFAULT_CACHE_CAPACITY: usize = 1000;
const CONFIG_DIR: &str = "config";
const ENV_PREFIX: &str = "SPROUT";

/// Connection settings for the commerce backend.
#[derive(Clone, Debug, Deserialize, Validate)]
#[serde(deny_unknown_fields)]
pub struct BackendConfig {
    /// Base URL of the backend API, e.g. `https://api.sproutgrocer.example/v1`.
    #[validate(custom = "validate_base_url")]
    pub base_url: String,

    /// Per-request timeout in seconds.
    #[serde(default = "default_timeout_secs")]
    #[validate(range(min = 1, max = 300))]
    pub timeout_secs: u64,
}

/// Query cache settings.
#[derive(Clone, Debug, Deserialize, Validate)]
#[serde(deny_unknown_fields)]
pub struct CacheConfig {
    #[serde(default = "default_cache_enabled")]
    pub enabled: bool,

    /// Default TTL for cached queries in seconds. `None` caches forever
    /// (until invalidated by a mutation).
    #[serde(default = "default_cache_ttl")]
    pub default_ttl_secs: Option<u64>,

    /// Maximum number of cached entries.
    #[serde(default = "default_cache_capacity")]
    pub capacity: usize,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            enabled: default_cache_enabled(),
            default_ttl_secs: default_cache_ttl(),
            capacity: default_cache_capacity(),
        }
    }
}

/// Application configuration.
#[derive(Clone, Debug, Deserialize, Validate)]
#[serde(deny_unknown_fields)]
pub struct AppConfig {
    #[validate]
    pub backend: BackendConfig,

    #[serde(default)]
    #[validate]
    pub cache: CacheConfig,

    #[serde(default = "default_log_level")]
    pub log_level: String,

    #[serde(default = "default_environment")]
    pub environment: String,
}

fn default_timeout_secs() -> u64 {
    DEFAULT_TIMEOUT_SECS
}

fn default_cache_enabled() -> bool {
    true
}

fn default_cache_ttl() -> Option<u64> {
    Some(DEFAULT_CACHE_TTL_SECS)
}

fn default_cache_capacity() -> usize {
    DEFAULT_CACHE_CAPACITY
}

fn default_log_level() -> String {
    DEFAULT_LOG_LEVEL.to_string()
}

fn default_environment() -> String {
    DEFAULT_ENV.to_string()
}

fn validate_base_url(value: &str) -> Result<(), ValidationError> {
    Url::parse(value).map_err(|_| ValidationError::new("base_url"))?;
    Ok(())
}

/// Loads configuration from `config/default.toml`, then
/// `config/{APP_ENV}.toml`, then `SPROUT_*` environment variables
/// (`SPROUT_BACKEND__BASE_URL=...`). Later sources win.
pub fn load_config() -> Result<AppConfig, ServiceError> {
    let environment = env::var("APP_ENV").unwrap_or_else(|_| DEFAULT_ENV.to_string());

    let config = Config::builder()
        .add_source(File::with_name(&format!("{CONFIG_DIR}/default")).required(false))
        .add_source(File::with_name(&format!("{CONFIG_DIR}/{environment}")).required(false))
        .add_source(Environment::with_prefix(ENV_PREFIX).separator("__"))
        .build()
        .map_err(|e| ServiceError::ConfigError(e.to_string()))?;

    let app_config: AppConfig = config
        .try_deserialize()
        .map_err(|e| ServiceError::ConfigError(e.to_string()))?;

    app_config
        .validate()
        .map_err(|e| ServiceError::ConfigError(e.to_string()))?;

    Ok(app_config)
}

/// Installs the global tracing subscriber. `RUST_LOG` wins over the
/// configured level.
pub fn init_tracing(log_level: &str) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(log_level.to_string()));
    tracing_subscriber::fmt().with_env_filter(filter).init();
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config_with_url(base_url: &str) -> AppConfig {
        AppConfig {
            backend: BackendConfig {
                base_url: base_url.to_string(),
                timeout_secs: 30,
            },
            cache: CacheConfig::default(),
            log_level: default_log_level(),
            environment: default_environment(),
        }
    }

    #[test]
    fn cache_defaults() {
        let cache = CacheConfig::default();
        assert!(cache.enabled);
        assert_eq!(cache.default_ttl_secs, Some(300));
        assert_eq!(cache.capacity, 1000);
    }

    #[test]
    fn rejects_unparseable_base_url() {
        assert!(config_with_url("not a url").validate().is_err());
        assert!(config_with_url("http://localhost:8080/api").validate().is_ok());
    }

    #[test]
    fn rejects_out_of_range_timeout() {
        let mut config = config_with_url("http://localhost:8080");
        config.backend.timeout_secs = 0;
        assert!(config.validate().is_err());
    }
}

//! Application configuration
//!
//! Built once at startup from defaults layered under `CATALOG_*`
//! environment variables, then handed around read-only.

use config::{Config, ConfigError, Environment};
use serde::Deserialize;
use std::time::Duration;

const ENV_PREFIX: &str = "CATALOG";

pub const DEFAULT_BASE_URL: &str = "http://localhost:5189/api";
pub const DEFAULT_APP_NAME: &str = "Million";
pub const DEFAULT_APP_VERSION: &str = "1.0.0";

#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct ApiConfig {
    /// Backend root, e.g. `http://localhost:5189/api`
    pub base_url: String,
    /// Per-request timeout in seconds
    pub timeout_secs: u64,
}

#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct AppInfo {
    pub name: String,
    pub version: String,
}

#[derive(Debug, Clone, Default, Deserialize, PartialEq, Eq)]
pub struct FeatureFlags {
    #[serde(default)]
    pub enable_analytics: bool,
    #[serde(default)]
    pub enable_debug: bool,
}

/// Immutable application configuration
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct AppConfig {
    pub api: ApiConfig,
    pub app: AppInfo,
    #[serde(default)]
    pub features: FeatureFlags,
    pub log_level: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            api: ApiConfig {
                base_url: DEFAULT_BASE_URL.to_string(),
                timeout_secs: 30,
            },
            app: AppInfo {
                name: DEFAULT_APP_NAME.to_string(),
                version: DEFAULT_APP_VERSION.to_string(),
            },
            features: FeatureFlags::default(),
            log_level: "info".to_string(),
        }
    }
}

impl AppConfig {
    /// Load configuration from `CATALOG_*` environment variables
    ///
    /// Nested keys use `__`, e.g. `CATALOG_API__BASE_URL`.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a variable cannot be converted to its field type.
    pub fn load() -> Result<Self, ConfigError> {
        Self::from_env_prefix(ENV_PREFIX)
    }

    /// Load configuration using a custom environment prefix
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a variable cannot be converted to its field type.
    pub fn from_env_prefix(prefix: &str) -> Result<Self, ConfigError> {
        let settings = Config::builder()
            .set_default("api.base_url", DEFAULT_BASE_URL)?
            .set_default("api.timeout_secs", 30)?
            .set_default("app.name", DEFAULT_APP_NAME)?
            .set_default("app.version", DEFAULT_APP_VERSION)?
            .set_default("features.enable_analytics", false)?
            .set_default("features.enable_debug", false)?
            .set_default("log_level", "info")?
            .add_source(
                Environment::with_prefix(prefix)
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        settings.try_deserialize()
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.api.timeout_secs)
    }

    /// Default tracing directive when `RUST_LOG` is unset
    pub fn log_directive(&self) -> &str {
        if self.features.enable_debug {
            "debug"
        } else {
            &self.log_level
        }
    }
}

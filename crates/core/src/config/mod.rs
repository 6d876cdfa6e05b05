//! Application configuration with layered loading.
//!
//! This module provides configuration management using figment for layered
//! configuration loading from multiple sources:
//!
//! 1. Environment variables (FOLIO_SW_*)
//! 2. TOML config file (if FOLIO_SW_CONFIG_FILE set)
//! 3. Built-in defaults

use std::path::PathBuf;
use std::time::Duration;

use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};

mod validation;

pub use validation::ConfigError;

/// Application configuration with layered loading.
///
/// Loading precedence (highest wins):
/// 1. Environment variables (FOLIO_SW_*)
/// 2. TOML config file (if FOLIO_SW_CONFIG_FILE set)
/// 3. Built-in defaults
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Path to the SQLite store.
    ///
    /// Set via FOLIO_SW_DB_PATH environment variable.
    #[serde(default = "default_db_path")]
    pub db_path: PathBuf,

    /// User-Agent string for network requests.
    #[serde(default = "default_user_agent")]
    pub user_agent: String,

    /// Maximum bytes to read per response.
    #[serde(default = "default_max_bytes")]
    pub max_bytes: usize,

    /// Network request timeout in milliseconds.
    ///
    /// Set via FOLIO_SW_TIMEOUT_MS environment variable.
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,

    /// Origin of the site the worker serves, e.g. `https://example.com`.
    ///
    /// Set via FOLIO_SW_ORIGIN environment variable.
    #[serde(default = "default_origin")]
    pub origin: String,

    /// Prefix of cache bucket names.
    #[serde(default = "default_cache_prefix")]
    pub cache_prefix: String,

    /// Deploy version baked into the bucket name.
    ///
    /// Set via FOLIO_SW_CACHE_VERSION environment variable.
    #[serde(default = "default_cache_version")]
    pub cache_version: String,

    /// Origin-relative paths fetched into the bucket on install.
    #[serde(default = "default_precache")]
    pub precache: Vec<String>,

    /// Path prefix of backend API calls, never cached.
    #[serde(default = "default_api_prefix")]
    pub api_prefix: String,

    /// Path that queued contact-form submissions are POSTed to.
    #[serde(default = "default_contact_endpoint")]
    pub contact_endpoint: String,

    /// Network timeout in milliseconds for uncached static assets.
    #[serde(default = "default_asset_timeout_ms")]
    pub asset_timeout_ms: u64,

    /// Cached document served to navigations while offline.
    #[serde(default = "default_offline_document")]
    pub offline_document: String,

    /// Cached image served when an image request fails.
    #[serde(default = "default_placeholder_image")]
    pub placeholder_image: String,

    /// Background sync tag that triggers a submission replay.
    #[serde(default = "default_sync_tag")]
    pub sync_tag: String,

    /// Attempts before a submission is abandoned; 0 retries forever.
    #[serde(default = "default_max_replay_attempts")]
    pub max_replay_attempts: u32,

    /// Title of push notifications.
    #[serde(default = "default_notification_title")]
    pub notification_title: String,

    /// Reject contact-form payloads that fail field validation.
    #[serde(default)]
    pub validate_submissions: bool,
}

fn default_db_path() -> PathBuf {
    PathBuf::from("./folio-sw.sqlite")
}

fn default_user_agent() -> String {
    "folio-sw/0.1".into()
}

fn default_max_bytes() -> usize {
    10_485_760 // 10MB
}

fn default_timeout_ms() -> u64 {
    20_000
}

fn default_origin() -> String {
    "http://localhost:3000".into()
}

fn default_cache_prefix() -> String {
    "portfolio".into()
}

fn default_cache_version() -> String {
    env!("CARGO_PKG_VERSION").into()
}

fn default_precache() -> Vec<String> {
    ["/", "/index.html", "/favicon.svg", "/resume.pdf", "/manifest.json"]
        .into_iter()
        .map(String::from)
        .collect()
}

fn default_api_prefix() -> String {
    "/api/".into()
}

fn default_contact_endpoint() -> String {
    "/api/contact".into()
}

fn default_asset_timeout_ms() -> u64 {
    5_000
}

fn default_offline_document() -> String {
    "/index.html".into()
}

fn default_placeholder_image() -> String {
    "/favicon.svg".into()
}

fn default_sync_tag() -> String {
    "contact-form-sync".into()
}

fn default_max_replay_attempts() -> u32 {
    10
}

fn default_notification_title() -> String {
    "Portfolio".into()
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            db_path: default_db_path(),
            user_agent: default_user_agent(),
            max_bytes: default_max_bytes(),
            timeout_ms: default_timeout_ms(),
            origin: default_origin(),
            cache_prefix: default_cache_prefix(),
            cache_version: default_cache_version(),
            precache: default_precache(),
            api_prefix: default_api_prefix(),
            contact_endpoint: default_contact_endpoint(),
            asset_timeout_ms: default_asset_timeout_ms(),
            offline_document: default_offline_document(),
            placeholder_image: default_placeholder_image(),
            sync_tag: default_sync_tag(),
            max_replay_attempts: default_max_replay_attempts(),
            notification_title: default_notification_title(),
            validate_submissions: false,
        }
    }
}

impl AppConfig {
    /// Timeout as Duration for use with reqwest/tokio.
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }

    /// Static asset race window as Duration.
    pub fn asset_timeout(&self) -> Duration {
        Duration::from_millis(self.asset_timeout_ms)
    }

    /// Name of the bucket owned by this deploy.
    pub fn cache_name(&self) -> String {
        format!("{}-v{}", self.cache_prefix, self.cache_version)
    }

    /// Load configuration from all sources with layered precedence.
    ///
    /// Priority (highest wins):
    /// 1. Environment variables prefixed with `FOLIO_SW_`
    /// 2. TOML file from `FOLIO_SW_CONFIG_FILE` (if set)
    /// 3. Built-in defaults via `Default::default()`
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if:
    /// - Configuration file cannot be read
    /// - Environment variables cannot be parsed
    /// - Validation fails after loading
    pub fn load() -> Result<Self, ConfigError> {
        let mut figment = Figment::from(Serialized::defaults(Self::default()));

        if let Ok(config_path) = std::env::var("FOLIO_SW_CONFIG_FILE") {
            figment = figment.merge(Toml::file(&config_path));
        }

        figment = figment.merge(
            Env::prefixed("FOLIO_SW_")
                .ignore(&["CONFIG_FILE"])
                .map(|key| key.as_str().to_lowercase().into())
                .split("__"),
        );

        let config: Self = figment.extract().map_err(|e| ConfigError::LoadFailed(e.to_string()))?;

        config.validate()?;

        Ok(config)
    }
}

//! Explicit worker configuration.

use std::time::Duration;

use folio_core::{AppConfig, Error};
use url::{Origin, Url};

use crate::fetch::is_same_origin;

/// Everything the worker needs to know about its deploy.
///
/// Built once from [`AppConfig`] and handed to [`super::Worker::new`].
#[derive(Debug, Clone)]
pub struct WorkerConfig {
    /// Bucket owned by this deploy, e.g. `portfolio-v1.2.0`.
    pub cache_name: String,
    pub origin: Url,
    pub precache: Vec<String>,
    pub api_prefix: String,
    pub contact_endpoint: String,
    pub asset_timeout: Duration,
    pub offline_document: String,
    pub placeholder_image: String,
    pub sync_tag: String,
    /// 0 means retry forever.
    pub max_replay_attempts: u32,
    pub notification_title: String,
    pub validate_submissions: bool,
}

impl WorkerConfig {
    pub fn from_app_config(config: &AppConfig) -> Result<Self, Error> {
        let origin = Url::parse(&config.origin).map_err(|e| Error::InvalidUrl(format!("{}: {e}", config.origin)))?;
        Ok(Self {
            cache_name: config.cache_name(),
            origin,
            precache: config.precache.clone(),
            api_prefix: config.api_prefix.clone(),
            contact_endpoint: config.contact_endpoint.clone(),
            asset_timeout: config.asset_timeout(),
            offline_document: config.offline_document.clone(),
            placeholder_image: config.placeholder_image.clone(),
            sync_tag: config.sync_tag.clone(),
            max_replay_attempts: config.max_replay_attempts,
            notification_title: config.notification_title.clone(),
            validate_submissions: config.validate_submissions,
        })
    }

    /// Resolve an origin-relative path to an absolute URL.
    pub fn resolve(&self, path: &str) -> Result<Url, Error> {
        self.origin
            .join(path)
            .map_err(|e| Error::InvalidUrl(format!("{path}: {e}")))
    }

    pub fn site_origin(&self) -> Origin {
        self.origin.origin()
    }

    pub fn is_same_origin(&self, url: &Url) -> bool {
        is_same_origin(url, &self.site_origin())
    }
}

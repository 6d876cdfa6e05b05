//! Install and activate handlers.

use futures_util::future::join_all;
use serde::Serialize;

use super::Worker;
use super::intercept::is_cacheable;
use crate::fetch::Request;
use folio_core::Error;

/// One precache asset that could not be stored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PrecacheFailure {
    pub path: String,
    pub reason: String,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct InstallReport {
    pub bucket: String,
    /// False when the bucket could not be opened; nothing was precached.
    pub opened: bool,
    pub cached: Vec<String>,
    pub failed: Vec<PrecacheFailure>,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct ActivateReport {
    pub current: String,
    pub deleted: Vec<String>,
}

impl Worker {
    /// Open the current bucket and precache the manifest.
    ///
    /// Assets are fetched concurrently and stored independently. Any failure
    /// is logged and recorded in the report; install itself never fails.
    pub async fn install(&self) -> InstallReport {
        let bucket = self.config.cache_name.clone();
        let mut report = InstallReport { bucket: bucket.clone(), ..Default::default() };

        if let Err(e) = self.cache.open_bucket(&bucket).await {
            tracing::error!(bucket = %bucket, error = %e, "failed to open cache bucket");
            return report;
        }
        report.opened = true;

        let tasks = self.config.precache.iter().map(|path| async move {
            let result = self.precache_one(path).await;
            (path.clone(), result)
        });

        for (path, result) in join_all(tasks).await {
            match result {
                Ok(()) => report.cached.push(path),
                Err(e) => {
                    tracing::warn!(path = %path, error = %e, "precache failed");
                    report.failed.push(PrecacheFailure { path, reason: e.to_string() });
                }
            }
        }

        tracing::info!(
            bucket = %report.bucket,
            cached = report.cached.len(),
            failed = report.failed.len(),
            "install complete"
        );
        report
    }

    async fn precache_one(&self, path: &str) -> Result<(), Error> {
        let url = self.config.resolve(path)?;
        let request = Request::get(url);
        let response = self.network.fetch(&request).await?;

        if !is_cacheable(&self.config, &request, &response) {
            return Err(Error::HttpError(format!(
                "{} returned {} {}, not cacheable",
                request.url,
                response.status.as_u16(),
                response.response_type
            )));
        }

        let cache_url = request.cache_url();
        let entry = response.to_entry(request.method.as_str(), &cache_url);
        self.cache.put_entry(&self.config.cache_name, &entry).await
    }

    /// Delete every bucket that does not belong to the current version.
    pub async fn activate(&self) -> Result<ActivateReport, Error> {
        let current = self.config.cache_name.clone();
        let mut deleted = Vec::new();

        for name in self.cache.bucket_names().await? {
            if name == current {
                continue;
            }
            if self.cache.delete_bucket(&name).await? {
                tracing::info!(bucket = %name, "deleted stale cache bucket");
                deleted.push(name);
            }
        }

        Ok(ActivateReport { current, deleted })
    }
}

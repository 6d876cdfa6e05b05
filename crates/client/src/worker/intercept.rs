//! Request interception: picks a serving strategy per request class.
//!
//! ### Strategies (first match wins)
//! - Non-HTTP(S) and extension schemes pass through untouched.
//! - Navigations are network-first with the offline document as fallback.
//! - API paths and non-GET requests are network-only and never cached.
//! - Everything else is cache-first, racing the network against the asset
//!   timeout on a miss. Images fall back to the placeholder.

use std::sync::Arc;

use reqwest::{Method, StatusCode};
use serde::Serialize;

use super::{Outcome, Worker, WorkerConfig};
use crate::fetch::{Destination, Network, Request, Response, is_interceptable};
use crate::race::{Race, race_timeout};
use folio_core::{CacheDb, Error, ResponseType};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Strategy {
    Passthrough,
    NetworkFirst,
    NetworkOnly,
    CacheFirst,
}

/// Where a served response came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ResponseSource {
    Cache,
    Network,
    OfflineDocument,
    Placeholder,
}

impl Worker {
    pub fn strategy_for(&self, request: &Request) -> Strategy {
        if !is_interceptable(&request.url) {
            Strategy::Passthrough
        } else if request.is_navigation() {
            Strategy::NetworkFirst
        } else if request.url.path().starts_with(&self.config.api_prefix) || request.method != Method::GET {
            Strategy::NetworkOnly
        } else {
            Strategy::CacheFirst
        }
    }

    /// Serve a page request according to its strategy.
    pub async fn handle_fetch(&self, request: Request) -> Result<Outcome, Error> {
        let strategy = self.strategy_for(&request);
        tracing::debug!(request = %request, ?strategy, "intercepted");

        let (response, source) = match strategy {
            Strategy::Passthrough => return Ok(Outcome::Passthrough),
            Strategy::NetworkFirst => self.network_first(request).await?,
            Strategy::NetworkOnly => (self.network.fetch(&request).await?, ResponseSource::Network),
            Strategy::CacheFirst => self.cache_first(request).await?,
        };

        Ok(Outcome::Response { response, source })
    }

    async fn network_first(&self, request: Request) -> Result<(Response, ResponseSource), Error> {
        match fetch_and_store(self.network.clone(), self.cache.clone(), self.config.clone(), request).await {
            Ok(response) => Ok((response, ResponseSource::Network)),
            Err(e) => {
                tracing::info!(error = %e, "navigation failed, serving offline document");
                let path = &self.config.offline_document;
                match self.cached_path(path).await {
                    Some(response) => Ok((response, ResponseSource::OfflineDocument)),
                    None => Err(Error::CacheMiss(format!("offline document {path} is not cached"))),
                }
            }
        }
    }

    async fn cache_first(&self, request: Request) -> Result<(Response, ResponseSource), Error> {
        if let Some(response) = self.lookup(request.method.as_str(), &request.cache_url()).await {
            tracing::debug!(url = %request.url, "cache hit");
            return Ok((response, ResponseSource::Cache));
        }
        tracing::debug!(url = %request.url, "cache miss");

        let is_image = request.destination == Destination::Image;
        let url = request.url.clone();
        let limit = self.config.asset_timeout;
        let task = fetch_and_store(self.network.clone(), self.cache.clone(), self.config.clone(), request);

        let err = match race_timeout(task, limit).await {
            Race::Settled(Ok(response)) => return Ok((response, ResponseSource::Network)),
            Race::Settled(Err(e)) => e,
            Race::TimedOut => Error::FetchTimeout(format!("{url}: no response within {}ms", limit.as_millis())),
            Race::Aborted(reason) => Error::Network(format!("{url}: {reason}")),
        };

        if is_image && let Some(response) = self.cached_path(&self.config.placeholder_image).await {
            tracing::debug!(url = %url, error = %err, "serving placeholder image");
            return Ok((response, ResponseSource::Placeholder));
        }

        Err(err)
    }

    /// Look up a request in the current bucket. Lookup failures count as a miss.
    async fn lookup(&self, method: &str, url: &str) -> Option<Response> {
        let entry = match self.cache.match_entry(&self.config.cache_name, method, url).await {
            Ok(entry) => entry?,
            Err(e) => {
                tracing::warn!(url = %url, error = %e, "cache lookup failed");
                return None;
            }
        };

        match Response::try_from(entry) {
            Ok(response) => Some(response),
            Err(e) => {
                tracing::warn!(url = %url, error = %e, "discarding unreadable cache entry");
                None
            }
        }
    }

    async fn cached_path(&self, path: &str) -> Option<Response> {
        let url = self.config.resolve(path).ok()?;
        self.lookup("GET", url.as_str()).await
    }
}

/// Fetch and, when cacheable, store the response before returning it.
///
/// Owns its inputs so it can run as a detached task that outlives a lost race.
async fn fetch_and_store(
    network: Arc<dyn Network>, cache: CacheDb, config: Arc<WorkerConfig>, request: Request,
) -> Result<Response, Error> {
    let response = network.fetch(&request).await?;
    store_if_cacheable(&cache, &config, &request, &response).await;
    Ok(response)
}

/// Only same-origin `200 basic` GET responses are cached.
pub(super) fn is_cacheable(config: &WorkerConfig, request: &Request, response: &Response) -> bool {
    request.method == Method::GET
        && response.status == StatusCode::OK
        && response.response_type == ResponseType::Basic
        && config.is_same_origin(&request.url)
}

/// Write errors are logged, never returned.
async fn store_if_cacheable(cache: &CacheDb, config: &WorkerConfig, request: &Request, response: &Response) {
    if !is_cacheable(config, request, response) {
        return;
    }

    let url = request.cache_url();
    let entry = response.to_entry(request.method.as_str(), &url);
    if let Err(e) = cache.put_entry(&config.cache_name, &entry).await {
        tracing::warn!(url = %url, error = %e, "cache write failed");
    }
}

#[cfg(test)]
mod tests {
    use super::super::testing::{StubNetwork, worker_for, worker_with};
    use super::*;
    use folio_core::AppConfig;
    use std::time::Duration;
    use url::Url;

    fn url(path: &str) -> Url {
        Url::parse("http://localhost:3000").unwrap().join(path).unwrap()
    }

    fn served(outcome: Outcome) -> (Response, ResponseSource) {
        match outcome {
            Outcome::Response { response, source } => (response, source),
            other => panic!("expected a response, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_strategy_selection() {
        let worker = worker_with(StubNetwork::new()).await;

        let ext = Request::get(Url::parse("chrome-extension://abc/script.js").unwrap());
        assert_eq!(worker.strategy_for(&ext), Strategy::Passthrough);
        let data = Request::get(Url::parse("data:text/plain,hi").unwrap());
        assert_eq!(worker.strategy_for(&data), Strategy::Passthrough);

        assert_eq!(worker.strategy_for(&Request::navigate(url("/about"))), Strategy::NetworkFirst);
        assert_eq!(worker.strategy_for(&Request::get(url("/api/projects"))), Strategy::NetworkOnly);
        let post = Request::get(url("/upload")).with_method(Method::POST);
        assert_eq!(worker.strategy_for(&post), Strategy::NetworkOnly);
        assert_eq!(worker.strategy_for(&Request::get(url("/assets/app.css"))), Strategy::CacheFirst);
    }

    #[tokio::test]
    async fn test_extension_request_passes_through() {
        let network = StubNetwork::new();
        let worker = worker_with(network.clone()).await;
        let request = Request::get(Url::parse("moz-extension://abc/x.js").unwrap());
        assert!(matches!(worker.handle_fetch(request).await.unwrap(), Outcome::Passthrough));
        assert_eq!(network.calls(), 0);
    }

    #[tokio::test]
    async fn test_uncached_asset_is_fetched_and_stored() {
        let network = StubNetwork::new();
        network.reply("/assets/js/main-abc123.js", 200, b"console.log(1)");
        let worker = worker_with(network.clone()).await;

        let (response, source) = served(worker.handle_fetch(Request::get(url("/assets/js/main-abc123.js"))).await.unwrap());
        assert_eq!(source, ResponseSource::Network);
        assert_eq!(&response.body[..], b"console.log(1)");

        let stored = worker
            .cache()
            .match_entry(&worker.config().cache_name, "GET", url("/assets/js/main-abc123.js").as_str())
            .await
            .unwrap()
            .unwrap();
        assert_eq!(stored.body, b"console.log(1)");
    }

    #[tokio::test]
    async fn test_cached_asset_skips_network() {
        let network = StubNetwork::new();
        network.reply("/assets/app.css", 200, b"body{}");
        let worker = worker_with(network.clone()).await;

        worker.handle_fetch(Request::get(url("/assets/app.css"))).await.unwrap();
        assert_eq!(network.calls(), 1);

        let (response, source) = served(worker.handle_fetch(Request::get(url("/assets/app.css"))).await.unwrap());
        assert_eq!(source, ResponseSource::Cache);
        assert_eq!(&response.body[..], b"body{}");
        assert_eq!(network.calls(), 1);
    }

    #[tokio::test]
    async fn test_fragment_ignored_for_cache_key() {
        let network = StubNetwork::new();
        network.reply("/resume.pdf", 200, b"%PDF");
        let worker = worker_with(network.clone()).await;

        worker.handle_fetch(Request::get(url("/resume.pdf"))).await.unwrap();
        let (_, source) = served(worker.handle_fetch(Request::get(url("/resume.pdf#page=2"))).await.unwrap());
        assert_eq!(source, ResponseSource::Cache);
    }

    #[tokio::test]
    async fn test_non_ok_responses_not_cached() {
        let network = StubNetwork::new();
        network.reply("/missing.js", 404, b"nope");
        let worker = worker_with(network.clone()).await;

        let (response, _) = served(worker.handle_fetch(Request::get(url("/missing.js"))).await.unwrap());
        assert_eq!(response.status, StatusCode::NOT_FOUND);
        worker.handle_fetch(Request::get(url("/missing.js"))).await.unwrap();
        assert_eq!(network.calls(), 2);
    }

    #[tokio::test]
    async fn test_cross_origin_not_cached() {
        let network = StubNetwork::new();
        network.reply("/lib.js", 200, b"lib");
        let worker = worker_with(network.clone()).await;
        let request = Request::get(Url::parse("https://cdn.test/lib.js").unwrap());

        worker.handle_fetch(request.clone()).await.unwrap();
        worker.handle_fetch(request).await.unwrap();
        assert_eq!(network.calls(), 2);
    }

    #[tokio::test]
    async fn test_slow_asset_times_out_and_late_write_lands() {
        let network = StubNetwork::new();
        network.reply_slowly("/assets/big.js", b"late", Duration::from_millis(300));
        let app = AppConfig { asset_timeout_ms: 100, ..Default::default() };
        let cache = CacheDb::open_in_memory().await.unwrap();
        let worker = worker_for(cache, network.clone(), &app);

        let result = worker.handle_fetch(Request::get(url("/assets/big.js"))).await;
        assert!(matches!(result, Err(Error::FetchTimeout(_))));

        tokio::time::sleep(Duration::from_millis(600)).await;
        let (response, source) = served(worker.handle_fetch(Request::get(url("/assets/big.js"))).await.unwrap());
        assert_eq!(source, ResponseSource::Cache);
        assert_eq!(&response.body[..], b"late");
        assert_eq!(network.calls(), 1);
    }

    #[tokio::test]
    async fn test_image_failure_serves_placeholder() {
        let network = StubNetwork::new();
        network.reply("/favicon.svg", 200, b"<svg/>");
        let worker = worker_with(network.clone()).await;
        worker.install().await;

        let request = Request::get(url("/img/project.png"));
        assert_eq!(request.destination, Destination::Image);
        let (response, source) = served(worker.handle_fetch(request).await.unwrap());
        assert_eq!(source, ResponseSource::Placeholder);
        assert_eq!(&response.body[..], b"<svg/>");
    }

    #[tokio::test]
    async fn test_script_failure_propagates() {
        let network = StubNetwork::new();
        network.fail("/assets/gone.js");
        let worker = worker_with(network).await;
        let result = worker.handle_fetch(Request::get(url("/assets/gone.js"))).await;
        assert!(matches!(result, Err(e) if e.is_connectivity()));
    }

    #[tokio::test]
    async fn test_navigation_online_refreshes_cache() {
        let network = StubNetwork::new();
        network.reply("/about", 200, b"<h1>v2</h1>");
        let worker = worker_with(network.clone()).await;

        let (response, source) = served(worker.handle_fetch(Request::navigate(url("/about"))).await.unwrap());
        assert_eq!(source, ResponseSource::Network);
        assert_eq!(&response.body[..], b"<h1>v2</h1>");

        let stored = worker
            .cache()
            .match_entry(&worker.config().cache_name, "GET", url("/about").as_str())
            .await
            .unwrap();
        assert!(stored.is_some());
    }

    #[tokio::test]
    async fn test_navigation_offline_serves_index() {
        let network = StubNetwork::new();
        network.reply("/index.html", 200, b"<html>offline shell</html>");
        let worker = worker_with(network.clone()).await;
        worker.install().await;

        network.set_down(true);
        let (response, source) = served(worker.handle_fetch(Request::navigate(url("/projects"))).await.unwrap());
        assert_eq!(source, ResponseSource::OfflineDocument);
        assert_eq!(&response.body[..], b"<html>offline shell</html>");
    }

    #[tokio::test]
    async fn test_navigation_offline_without_shell_is_cache_miss() {
        let worker = worker_with(StubNetwork::new()).await;
        let result = worker.handle_fetch(Request::navigate(url("/projects"))).await;
        assert!(matches!(result, Err(Error::CacheMiss(_))));
    }

    #[tokio::test]
    async fn test_api_requests_never_cached() {
        let network = StubNetwork::new();
        network.reply("/api/projects", 200, b"[]");
        let worker = worker_with(network.clone()).await;

        worker.handle_fetch(Request::get(url("/api/projects"))).await.unwrap();
        worker.handle_fetch(Request::get(url("/api/projects"))).await.unwrap();
        assert_eq!(network.calls(), 2);
        assert!(worker.cache().entry_urls(&worker.config().cache_name).await.unwrap().is_empty());
    }
}

//! In-process network double for worker tests.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use bytes::Bytes;
use folio_core::{AppConfig, CacheDb, Error, ResponseType};
use reqwest::StatusCode;

use super::{Worker, WorkerConfig};
use crate::fetch::{Network, Request, Response};

#[derive(Clone)]
enum Reply {
    Respond { status: u16, body: Bytes, delay: Duration },
    Fail,
}

/// Answers by request path. Unknown paths fail like an unreachable host.
#[derive(Clone, Default)]
pub struct StubNetwork {
    replies: Arc<Mutex<HashMap<String, Reply>>>,
    requests: Arc<Mutex<Vec<Request>>>,
    calls: Arc<AtomicUsize>,
    down: Arc<AtomicBool>,
}

impl StubNetwork {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn reply(&self, path: &str, status: u16, body: impl AsRef<[u8]>) {
        self.set(path, Reply::Respond { status, body: Bytes::copy_from_slice(body.as_ref()), delay: Duration::ZERO });
    }

    pub fn reply_slowly(&self, path: &str, body: impl AsRef<[u8]>, delay: Duration) {
        self.set(path, Reply::Respond { status: 200, body: Bytes::copy_from_slice(body.as_ref()), delay });
    }

    pub fn fail(&self, path: &str) {
        self.set(path, Reply::Fail);
    }

    /// Fail every request regardless of configured replies.
    pub fn set_down(&self, down: bool) {
        self.down.store(down, Ordering::SeqCst);
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn requests(&self) -> Vec<Request> {
        self.requests.lock().unwrap().clone()
    }

    fn set(&self, path: &str, reply: Reply) {
        self.replies.lock().unwrap().insert(path.to_string(), reply);
    }
}

#[async_trait::async_trait]
impl Network for StubNetwork {
    async fn fetch(&self, request: &Request) -> Result<Response, Error> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.requests.lock().unwrap().push(request.clone());

        let reply = self.replies.lock().unwrap().get(request.url.path()).cloned();
        if self.down.load(Ordering::SeqCst) {
            return Err(Error::Network(format!("{}: network down", request.url)));
        }

        match reply {
            Some(Reply::Respond { status, body, delay }) => {
                if !delay.is_zero() {
                    tokio::time::sleep(delay).await;
                }
                Ok(Response {
                    url: request.url.clone(),
                    status: StatusCode::from_u16(status).unwrap(),
                    response_type: ResponseType::Basic,
                    headers: vec![("content-type".into(), "text/plain".into())],
                    body,
                })
            }
            Some(Reply::Fail) | None => Err(Error::Network(format!("{}: connection refused", request.url))),
        }
    }
}

pub fn worker_for(cache: CacheDb, network: StubNetwork, app: &AppConfig) -> Worker {
    let config = WorkerConfig::from_app_config(app).unwrap();
    Worker::new(config, cache, Arc::new(network))
}

pub fn worker_for_version(cache: CacheDb, network: StubNetwork, version: &str) -> Worker {
    let app = AppConfig { cache_version: version.to_string(), ..Default::default() };
    worker_for(cache, network, &app)
}

/// Worker over a fresh in-memory store and the default configuration.
pub async fn worker_with(network: StubNetwork) -> Worker {
    let cache = CacheDb::open_in_memory().await.unwrap();
    worker_for(cache, network, &AppConfig::default())
}

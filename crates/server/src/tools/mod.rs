//! MCP tool implementations.
//!
//! Each tool turns its arguments into a worker [`Event`](folio_client::Event),
//! dispatches it, and returns the outcome as pretty-printed JSON.

pub mod contact;
pub mod events;
pub mod fetch;
pub mod lifecycle;
pub mod message;
pub mod queue;

use rmcp::{
    ErrorData as McpError,
    model::{CallToolResult, Content},
};
use serde::Serialize;

use crate::error::ToolError;

pub use contact::ContactSubmitParams;
pub use events::{ConnectivityParams, NotificationClickParams, PushParams, SyncParams};
pub use fetch::FetchParams;
pub use message::MessageParams;
pub use queue::QueueListParams;

/// Encode a tool output as a single text content block.
pub(crate) fn json_result<T: Serialize>(output: &T) -> Result<CallToolResult, McpError> {
    let json = serde_json::to_string_pretty(output).map_err(|e| ToolError::SerializeFailed(e.to_string()))?;
    Ok(CallToolResult::success(vec![Content::text(json)]))
}

/// Outcome variant the tool did not expect from the worker.
pub(crate) fn unexpected(tool: &str, outcome: &folio_client::Outcome) -> McpError {
    tracing::error!(tool, ?outcome, "unexpected worker outcome");
    McpError::internal_error(format!("{tool}: unexpected worker outcome"), None)
}

#[cfg(test)]
pub(crate) mod test_support {
    use std::collections::HashMap;
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::sync::{Arc, Mutex};

    use folio_client::{Network, Request, Response, Worker, WorkerConfig};
    use folio_core::{AppConfig, CacheDb, Error, ResponseType};
    use rmcp::model::CallToolResult;

    /// Serves fixed bodies by path; anything else is unreachable.
    #[derive(Clone, Default)]
    pub struct FixedNetwork {
        bodies: Arc<Mutex<HashMap<String, (u16, Vec<u8>)>>>,
        down: Arc<AtomicBool>,
    }

    impl FixedNetwork {
        pub fn serve(&self, path: &str, status: u16, body: &[u8]) {
            self.bodies.lock().unwrap().insert(path.to_string(), (status, body.to_vec()));
        }

        pub fn set_down(&self, down: bool) {
            self.down.store(down, Ordering::SeqCst);
        }
    }

    #[async_trait::async_trait]
    impl Network for FixedNetwork {
        async fn fetch(&self, request: &Request) -> Result<Response, Error> {
            if self.down.load(Ordering::SeqCst) {
                return Err(Error::Network("network down".into()));
            }
            let found = self.bodies.lock().unwrap().get(request.url.path()).cloned();
            let (status, body) = found.ok_or_else(|| Error::Network(format!("{}: unreachable", request.url)))?;
            Ok(Response {
                url: request.url.clone(),
                status: status.try_into().unwrap(),
                response_type: ResponseType::Basic,
                headers: vec![("content-type".into(), "text/html".into())],
                body: body.into(),
            })
        }
    }

    pub async fn worker(network: FixedNetwork) -> Arc<Worker> {
        let cache = CacheDb::open_in_memory().await.unwrap();
        let config = WorkerConfig::from_app_config(&AppConfig::default()).unwrap();
        Arc::new(Worker::new(config, cache, Arc::new(network)))
    }

    /// Parse the JSON text block of a tool result.
    pub fn output(result: &CallToolResult) -> serde_json::Value {
        let content = serde_json::to_value(&result.content[0]).unwrap();
        let text = content.get("text").and_then(|v| v.as_str()).expect("Expected text field in content");
        serde_json::from_str(text).unwrap()
    }
}

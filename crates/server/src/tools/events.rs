//! Runtime signal tools: sw_sync, sw_connectivity, sw_push, sw_notification_click.

use folio_client::{Event, Outcome, Worker};
use rmcp::{ErrorData as McpError, model::CallToolResult};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use super::{json_result, unexpected};

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct SyncParams {
    /// Background sync tag. Only the configured tag replays the queue.
    pub tag: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct ConnectivityParams {
    /// True when the network came back, false when it was lost.
    pub online: bool,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema)]
pub struct PushParams {
    /// Optional text payload used as the notification body.
    #[serde(default)]
    pub data: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema)]
pub struct NotificationClickParams {
    /// Action id ("explore" or "close"); omitted for a click on the body.
    #[serde(default)]
    pub action: Option<String>,
}

/// Output for signals that may or may not trigger a replay.
#[derive(Debug, Clone, Serialize)]
pub struct SignalOutput {
    pub online: bool,
    pub replay: Option<folio_client::ReplayReport>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum ClickOutput {
    OpenWindow { url: String },
    Dismissed,
}

async fn signal(worker: &Worker, tool: &str, event: Event) -> Result<CallToolResult, McpError> {
    let replay = match worker.dispatch(event).await? {
        Outcome::Replayed(report) => Some(report),
        Outcome::Ignored => None,
        other => return Err(unexpected(tool, &other)),
    };
    json_result(&SignalOutput { online: worker.is_online(), replay })
}

pub async fn sync_impl(worker: &Worker, params: SyncParams) -> Result<CallToolResult, McpError> {
    signal(worker, "sw_sync", Event::Sync { tag: params.tag }).await
}

pub async fn connectivity_impl(worker: &Worker, params: ConnectivityParams) -> Result<CallToolResult, McpError> {
    let event = if params.online { Event::Online } else { Event::Offline };
    signal(worker, "sw_connectivity", event).await
}

pub async fn push_impl(worker: &Worker, params: PushParams) -> Result<CallToolResult, McpError> {
    match worker.dispatch(Event::Push { data: params.data }).await? {
        Outcome::Notification(notification) => json_result(&notification),
        other => Err(unexpected("sw_push", &other)),
    }
}

pub async fn notification_click_impl(
    worker: &Worker, params: NotificationClickParams,
) -> Result<CallToolResult, McpError> {
    let output = match worker.dispatch(Event::NotificationClick { action: params.action }).await? {
        Outcome::OpenWindow(url) => ClickOutput::OpenWindow { url },
        Outcome::Dismissed => ClickOutput::Dismissed,
        other => return Err(unexpected("sw_notification_click", &other)),
    };
    json_result(&output)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tools::test_support::{FixedNetwork, output, worker};
    use serde_json::json;

    #[tokio::test]
    async fn test_offline_then_online_replays() {
        let network = FixedNetwork::default();
        network.serve("/api/contact", 200, b"{}");
        let worker = worker(network).await;

        let value = output(&connectivity_impl(&worker, ConnectivityParams { online: false }).await.unwrap());
        assert_eq!(value, json!({"online": false, "replay": null}));

        worker.store_submission(&json!({"name": "Ada"})).await.unwrap();
        let value = output(&connectivity_impl(&worker, ConnectivityParams { online: true }).await.unwrap());
        assert_eq!(value["online"], true);
        assert_eq!(value["replay"]["sent"].as_array().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_sync_tag_matching() {
        let worker = worker(FixedNetwork::default()).await;

        let value = output(&sync_impl(&worker, SyncParams { tag: "other".into() }).await.unwrap());
        assert!(value["replay"].is_null());

        let value = output(&sync_impl(&worker, SyncParams { tag: "contact-form-sync".into() }).await.unwrap());
        assert_eq!(value["replay"]["attempted"], 0);
    }

    #[tokio::test]
    async fn test_push_and_click() {
        let worker = worker(FixedNetwork::default()).await;

        let value = output(&push_impl(&worker, PushParams::default()).await.unwrap());
        assert_eq!(value["body"], "New update available!");
        assert_eq!(value["vibrate"], json!([100, 50, 100]));

        let params = NotificationClickParams { action: Some("explore".into()) };
        let value = output(&notification_click_impl(&worker, params).await.unwrap());
        assert_eq!(value, json!({"action": "open_window", "url": "http://localhost:3000/"}));

        let value = output(&notification_click_impl(&worker, NotificationClickParams::default()).await.unwrap());
        assert_eq!(value, json!({"action": "dismissed"}));
    }
}

//! MCP server handler implementation.
//!
//! Each tool delivers one worker event (or inspects the queue) and returns
//! the outcome as JSON.
use std::sync::Arc;

use crate::tools::{
    ConnectivityParams, ContactSubmitParams, FetchParams, MessageParams, NotificationClickParams, PushParams,
    QueueListParams, SyncParams, contact, events, fetch, lifecycle, message, queue,
};
use folio_client::Worker;

use rmcp::{
    ErrorData as McpError, ServerHandler,
    handler::server::{
        tool::{ToolCallContext, ToolRouter},
        wrapper::Parameters,
    },
    model::{
        CallToolRequestParam, CallToolResult, Implementation, ListToolsResult, PaginatedRequestParam, ProtocolVersion,
        ServerCapabilities, ServerInfo,
    },
    service::{RequestContext, RoleServer},
    tool, tool_router,
};

/// The MCP server handler for folio-sw.
#[derive(Clone)]
pub struct FolioServer {
    worker: Arc<Worker>,
    tool_router: ToolRouter<Self>,
}

#[tool_router]
impl FolioServer {
    pub fn new(worker: Arc<Worker>) -> Self {
        Self { worker, tool_router: Self::tool_router() }
    }

    #[tool(description = "Install the worker: open the current cache bucket and precache the manifest.")]
    async fn sw_install(&self) -> Result<CallToolResult, McpError> {
        lifecycle::install_impl(&self.worker).await
    }

    #[tool(description = "Activate the worker: delete every cache bucket except the current version.")]
    async fn sw_activate(&self) -> Result<CallToolResult, McpError> {
        lifecycle::activate_impl(&self.worker).await
    }

    #[tool(
        description = "Offer a page request to the interceptor. Returns the response, its source (cache, network, offline_document, placeholder), or handled=false for passthrough."
    )]
    async fn sw_fetch(&self, params: Parameters<FetchParams>) -> Result<CallToolResult, McpError> {
        fetch::fetch_impl(&self.worker, params.0).await
    }

    #[tool(description = "Post a page message such as STORE_CONTACT_FORM. Returns {success, error?}.")]
    async fn sw_message(&self, params: Parameters<MessageParams>) -> Result<CallToolResult, McpError> {
        message::message_impl(&self.worker, params.0).await
    }

    #[tool(description = "Fire a background sync. The configured tag replays queued contact forms.")]
    async fn sw_sync(&self, params: Parameters<SyncParams>) -> Result<CallToolResult, McpError> {
        events::sync_impl(&self.worker, params.0).await
    }

    #[tool(description = "Report connectivity changes. Going online replays queued contact forms.")]
    async fn sw_connectivity(&self, params: Parameters<ConnectivityParams>) -> Result<CallToolResult, McpError> {
        events::connectivity_impl(&self.worker, params.0).await
    }

    #[tool(description = "Deliver a push message. Returns the notification to display.")]
    async fn sw_push(&self, params: Parameters<PushParams>) -> Result<CallToolResult, McpError> {
        events::push_impl(&self.worker, params.0).await
    }

    #[tool(description = "Handle a notification click. The explore action opens the site root.")]
    async fn sw_notification_click(
        &self, params: Parameters<NotificationClickParams>,
    ) -> Result<CallToolResult, McpError> {
        events::notification_click_impl(&self.worker, params.0).await
    }

    #[tool(description = "Submit a contact form now. Queued for replay when offline or unreachable.")]
    async fn contact_submit(&self, params: Parameters<ContactSubmitParams>) -> Result<CallToolResult, McpError> {
        contact::submit_impl(&self.worker, params.0).await
    }

    #[tool(description = "List queued contact form submissions, optionally filtered by status.")]
    async fn queue_list(&self, params: Parameters<QueueListParams>) -> Result<CallToolResult, McpError> {
        queue::list_impl(self.worker.cache(), params.0).await
    }

    #[tool(description = "Delete abandoned contact form submissions.")]
    async fn queue_purge(&self) -> Result<CallToolResult, McpError> {
        queue::purge_impl(self.worker.cache()).await
    }
}

impl ServerHandler for FolioServer {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            server_info: Implementation {
                name: "folio-sw".into(),
                version: env!("CARGO_PKG_VERSION").into(),
                ..Default::default()
            },
            protocol_version: ProtocolVersion::LATEST,
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            ..Default::default()
        }
    }

    async fn list_tools(
        &self, _request: Option<PaginatedRequestParam>, _context: RequestContext<RoleServer>,
    ) -> Result<ListToolsResult, rmcp::model::ErrorData> {
        Ok(ListToolsResult { meta: None, tools: self.tool_router.list_all(), next_cursor: None })
    }

    async fn call_tool(
        &self, request: CallToolRequestParam, context: RequestContext<RoleServer>,
    ) -> Result<CallToolResult, rmcp::model::ErrorData> {
        self.tool_router
            .call(ToolCallContext::new(self, request, context))
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tools::test_support::{FixedNetwork, worker};

    #[tokio::test]
    async fn test_all_tools_registered() {
        let server = FolioServer::new(worker(FixedNetwork::default()).await);
        let mut names: Vec<String> = server.tool_router.list_all().into_iter().map(|t| t.name.to_string()).collect();
        names.sort();
        assert_eq!(
            names,
            vec![
                "contact_submit",
                "queue_list",
                "queue_purge",
                "sw_activate",
                "sw_connectivity",
                "sw_fetch",
                "sw_install",
                "sw_message",
                "sw_notification_click",
                "sw_push",
                "sw_sync",
            ]
        );
    }

    #[tokio::test]
    async fn test_server_info() {
        let server = FolioServer::new(worker(FixedNetwork::default()).await);
        assert_eq!(server.get_info().server_info.name, "folio-sw");
    }
}

//! sw_install and sw_activate tool implementations.

use folio_client::{Event, Outcome, Worker};
use rmcp::{ErrorData as McpError, model::CallToolResult};

use super::{json_result, unexpected};

/// Open the current bucket and precache the manifest.
pub async fn install_impl(worker: &Worker) -> Result<CallToolResult, McpError> {
    match worker.dispatch(Event::Install).await? {
        Outcome::Installed(report) => json_result(&report),
        other => Err(unexpected("sw_install", &other)),
    }
}

/// Delete every bucket other than the current one.
pub async fn activate_impl(worker: &Worker) -> Result<CallToolResult, McpError> {
    match worker.dispatch(Event::Activate).await? {
        Outcome::Activated(report) => json_result(&report),
        other => Err(unexpected("sw_activate", &other)),
    }
}

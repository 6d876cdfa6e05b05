//! queue_list and queue_purge tool implementations.
//!
//! Inspect the offline submission queue and drop abandoned records.

use folio_core::{CacheDb, QueuedSubmission, SubmissionStatus};
use rmcp::{ErrorData as McpError, model::CallToolResult};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use super::json_result;

#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema)]
pub struct QueueListParams {
    /// Only list submissions in this state: "pending" or "abandoned".
    #[serde(default)]
    pub status: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct QueueListOutput {
    pub count: usize,
    pub submissions: Vec<QueuedSubmission>,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct QueuePurgeOutput {
    /// Number of abandoned submissions deleted.
    pub deleted: u64,
}

pub async fn list_impl(cache: &CacheDb, params: QueueListParams) -> Result<CallToolResult, McpError> {
    let status = params.status.as_deref().map(str::parse::<SubmissionStatus>).transpose()?;
    let submissions = cache.list_submissions(status).await?;
    json_result(&QueueListOutput { count: submissions.len(), submissions })
}

pub async fn purge_impl(cache: &CacheDb) -> Result<CallToolResult, McpError> {
    let deleted = cache.purge_abandoned_submissions().await?;
    tracing::info!(deleted, "purged abandoned submissions");
    json_result(&QueuePurgeOutput { deleted })
}

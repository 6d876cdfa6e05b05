//! contact_submit tool implementation.

use folio_client::{Event, Outcome, Worker};
use rmcp::{ErrorData as McpError, model::CallToolResult};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use super::{json_result, unexpected};

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct ContactSubmitParams {
    /// Contact form payload: name, email, subject, message.
    pub form_data: serde_json::Value,
}

/// Send a contact form now, or queue it for replay when offline.
pub async fn submit_impl(worker: &Worker, params: ContactSubmitParams) -> Result<CallToolResult, McpError> {
    match worker.dispatch(Event::Submit { form_data: params.form_data }).await? {
        Outcome::Submitted(outcome) => json_result(&outcome),
        other => Err(unexpected("contact_submit", &other)),
    }
}

//! sw_message tool implementation.
//!
//! Delivers a page message and returns the worker's reply. Malformed
//! messages are answered on the reply channel rather than as tool errors.

use folio_client::{ClientMessage, Event, MessageReply, Outcome, Worker};
use rmcp::{ErrorData as McpError, model::CallToolResult};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use super::{json_result, unexpected};

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct MessageParams {
    /// The message object, e.g. `{"type": "STORE_CONTACT_FORM", "formData": {...}}`.
    pub message: serde_json::Value,
}

pub async fn message_impl(worker: &Worker, params: MessageParams) -> Result<CallToolResult, McpError> {
    let message: ClientMessage = match serde_json::from_value(params.message) {
        Ok(message) => message,
        Err(e) => return json_result(&MessageReply::failed(format!("INVALID_INPUT: unsupported message: {e}"))),
    };

    match worker.dispatch(Event::Message(message)).await? {
        Outcome::Reply(reply) => json_result(&reply),
        other => Err(unexpected("sw_message", &other)),
    }
}

//! sw_fetch tool implementation.
//!
//! Offers a page request to the interceptor and reports how it was served.

use folio_client::fetch::{Destination, Request, RequestMode, parse_method, parse_request_url};
use folio_client::{Event, Outcome, ResponseSource, Worker};
use folio_core::ResponseType;
use rmcp::{ErrorData as McpError, model::CallToolResult};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use super::{json_result, unexpected};
use crate::error::ToolError;

/// Input parameters for sw_fetch.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct FetchParams {
    /// Absolute URL, or a path resolved against the site origin.
    pub url: String,

    /// HTTP method. Defaults to POST when a body is given, GET otherwise.
    #[serde(default)]
    pub method: Option<String>,

    /// Request mode: "navigate", "same-origin", "no-cors" or "cors" (default).
    #[serde(default)]
    pub mode: Option<String>,

    /// Destination such as "image" or "script". Inferred from the path when omitted.
    #[serde(default)]
    pub destination: Option<String>,

    /// Optional JSON body, sent with `Content-Type: application/json`.
    #[serde(default)]
    pub body: Option<serde_json::Value>,
}

/// Output structure for sw_fetch.
#[derive(Debug, Clone, Serialize)]
pub struct FetchOutput {
    /// False when the request is outside the worker's scope.
    pub handled: bool,
    pub source: Option<ResponseSource>,
    pub url: Option<String>,
    pub status: Option<u16>,
    pub response_type: Option<ResponseType>,
    pub content_type: Option<String>,
    pub body_bytes: usize,
    /// Body decoded as UTF-8, lossily.
    pub body: Option<String>,
}

fn build_request(worker: &Worker, params: &FetchParams) -> Result<Request, McpError> {
    let url = parse_request_url(&params.url, &worker.config().origin)
        .map_err(|e| ToolError::InvalidInput(e.to_string()))?;
    let mode = params.mode.as_deref().map(str::parse::<RequestMode>).transpose()?;

    let mut request = match &params.body {
        Some(body) => Request::post_json(url, body)?,
        None if mode == Some(RequestMode::Navigate) => Request::navigate(url),
        None => Request::get(url),
    };

    if let Some(method) = params.method.as_deref() {
        request = request.with_method(parse_method(method)?);
    }
    if let Some(mode) = mode {
        request = request.with_mode(mode);
    }
    if let Some(destination) = params.destination.as_deref() {
        request = request.with_destination(destination.parse::<Destination>()?);
    }

    Ok(request)
}

pub async fn fetch_impl(worker: &Worker, params: FetchParams) -> Result<CallToolResult, McpError> {
    let request = build_request(worker, &params)?;

    let output = match worker.dispatch(Event::Fetch(request)).await? {
        Outcome::Passthrough => FetchOutput {
            handled: false,
            source: None,
            url: None,
            status: None,
            response_type: None,
            content_type: None,
            body_bytes: 0,
            body: None,
        },
        Outcome::Response { response, source } => FetchOutput {
            handled: true,
            source: Some(source),
            url: Some(response.url.to_string()),
            status: Some(response.status.as_u16()),
            response_type: Some(response.response_type),
            content_type: response.content_type().map(str::to_string),
            body_bytes: response.body.len(),
            body: Some(String::from_utf8_lossy(&response.body).into_owned()),
        },
        other => return Err(unexpected("sw_fetch", &other)),
    };

    json_result(&output)
}

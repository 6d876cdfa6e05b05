//! Events the worker reacts to and the outcomes it produces.

use serde::{Deserialize, Serialize};

use super::intercept::ResponseSource;
use super::lifecycle::{ActivateReport, InstallReport};
use super::notify::Notification;
use super::queue::{ReplayReport, SubmitOutcome};
use crate::fetch::{Request, Response};

/// Every signal the host runtime can deliver to the worker.
#[derive(Debug, Clone)]
pub enum Event {
    Install,
    Activate,
    Fetch(Request),
    Message(ClientMessage),
    /// Background sync fired with the given tag.
    Sync { tag: String },
    /// Connectivity came back.
    Online,
    /// Connectivity was lost.
    Offline,
    /// The page asks the worker to send a contact form now.
    Submit { form_data: serde_json::Value },
    Push { data: Option<String> },
    NotificationClick { action: Option<String> },
}

impl Event {
    pub fn kind(&self) -> &'static str {
        match self {
            Event::Install => "install",
            Event::Activate => "activate",
            Event::Fetch(_) => "fetch",
            Event::Message(_) => "message",
            Event::Sync { .. } => "sync",
            Event::Online => "online",
            Event::Offline => "offline",
            Event::Submit { .. } => "submit",
            Event::Push { .. } => "push",
            Event::NotificationClick { .. } => "notificationclick",
        }
    }
}

/// Page-to-worker message.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum ClientMessage {
    #[serde(rename = "STORE_CONTACT_FORM")]
    StoreContactForm {
        #[serde(rename = "formData")]
        form_data: serde_json::Value,
    },
}

/// Worker-to-page reply on the message's reply channel.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessageReply {
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl MessageReply {
    pub fn ok() -> Self {
        Self { success: true, error: None }
    }

    pub fn failed(error: impl Into<String>) -> Self {
        Self { success: false, error: Some(error.into()) }
    }
}

/// What the worker did with an event.
#[derive(Debug, Clone)]
pub enum Outcome {
    Installed(InstallReport),
    Activated(ActivateReport),
    /// The request is not handled; the host lets it through untouched.
    Passthrough,
    Response {
        response: Response,
        source: ResponseSource,
    },
    Reply(MessageReply),
    Replayed(ReplayReport),
    Submitted(SubmitOutcome),
    Notification(Notification),
    OpenWindow(String),
    Dismissed,
    /// Event understood but nothing to do (unknown sync tag, going offline).
    Ignored,
}

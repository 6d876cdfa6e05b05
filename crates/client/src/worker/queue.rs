//! Offline submission queue: store, submit, and replay contact forms.

use reqwest::StatusCode;
use serde::Serialize;
use serde_json::Value;

use super::Worker;
use super::event::{ClientMessage, MessageReply};
use crate::contact::validate_payload;
use crate::fetch::{Request, Response};
use folio_core::{Error, SubmissionStatus};

/// Result of draining the queue once.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ReplayReport {
    pub attempted: usize,
    pub sent: Vec<i64>,
    pub pending: Vec<i64>,
    pub abandoned: Vec<i64>,
    /// Sent or failed, but the outcome could not be written back.
    pub store_errors: Vec<i64>,
}

/// Result of a direct submission.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum SubmitOutcome {
    Sent,
    /// Stored for replay on reconnect.
    Queued { id: i64 },
    /// The server refused the payload; it was not queued.
    Rejected { status: u16 },
}

/// 4xx other than 408 and 429 will never succeed on retry.
fn is_permanent_rejection(status: StatusCode) -> bool {
    status.is_client_error() && status != StatusCode::REQUEST_TIMEOUT && status != StatusCode::TOO_MANY_REQUESTS
}

impl Worker {
    /// Answer a page message on its reply channel.
    pub async fn handle_message(&self, message: ClientMessage) -> MessageReply {
        match message {
            ClientMessage::StoreContactForm { form_data } => match self.store_submission(&form_data).await {
                Ok(id) => {
                    tracing::info!(id, "stored contact form for later delivery");
                    MessageReply::ok()
                }
                Err(e) => {
                    tracing::warn!(error = %e, "failed to store contact form");
                    MessageReply::failed(e.to_string())
                }
            },
        }
    }

    /// Persist a payload as a pending submission.
    pub async fn store_submission(&self, form_data: &Value) -> Result<i64, Error> {
        if self.config.validate_submissions {
            validate_payload(form_data)?;
        }
        self.cache.enqueue_submission(form_data).await
    }

    /// Send a contact form now, queueing it when the network is unavailable.
    ///
    /// Offline workers queue without attempting delivery. Transport failures
    /// and transient statuses (5xx, 408, 429) queue; other 4xx are rejected.
    pub async fn submit_contact_form(&self, form_data: Value) -> Result<SubmitOutcome, Error> {
        if self.config.validate_submissions {
            validate_payload(&form_data)?;
        }

        if !self.is_online() {
            let id = self.cache.enqueue_submission(&form_data).await?;
            tracing::info!(id, "offline, queued contact form");
            return Ok(SubmitOutcome::Queued { id });
        }

        match self.send(&form_data).await {
            Ok(response) if response.status.is_success() => Ok(SubmitOutcome::Sent),
            Ok(response) if is_permanent_rejection(response.status) => {
                tracing::warn!(status = response.status.as_u16(), "contact form rejected");
                Ok(SubmitOutcome::Rejected { status: response.status.as_u16() })
            }
            Ok(response) => {
                let id = self.cache.enqueue_submission(&form_data).await?;
                tracing::info!(id, status = response.status.as_u16(), "server unavailable, queued contact form");
                Ok(SubmitOutcome::Queued { id })
            }
            Err(e) if e.is_connectivity() => {
                let id = self.cache.enqueue_submission(&form_data).await?;
                tracing::info!(id, error = %e, "send failed, queued contact form");
                Ok(SubmitOutcome::Queued { id })
            }
            Err(e) => Err(e),
        }
    }

    /// Attempt every pending submission once.
    ///
    /// Each record is independent: a 2xx deletes it, anything else records
    /// the attempt and leaves it pending unless it is now abandoned. A store
    /// failure on one record is reported and the rest are still attempted.
    pub async fn replay_submissions(&self) -> Result<ReplayReport, Error> {
        let _guard = self.replay_lock.lock().await;
        let pending = self.cache.list_submissions(Some(SubmissionStatus::Pending)).await?;
        let mut report = ReplayReport { attempted: pending.len(), ..Default::default() };

        for submission in pending {
            let id = submission.id;
            let (reason, permanent) = match self.send(&submission.form_data).await {
                Ok(response) if response.status.is_success() => {
                    match self.cache.delete_submission(id).await {
                        Ok(_) => {
                            tracing::info!(id, "replayed contact form");
                            report.sent.push(id);
                        }
                        Err(e) => {
                            tracing::warn!(id, error = %e, "replayed contact form but could not remove it");
                            report.store_errors.push(id);
                        }
                    }
                    continue;
                }
                Ok(response) => (format!("HTTP {}", response.status.as_u16()), is_permanent_rejection(response.status)),
                Err(e) => (e.to_string(), false),
            };

            let max = self.config.max_replay_attempts;
            let exhausted = max > 0 && submission.attempts + 1 >= max;
            let abandon = permanent || exhausted;
            let attempts = match self.cache.record_failed_attempt(id, &reason, abandon).await {
                Ok(attempts) => attempts,
                Err(e) => {
                    tracing::warn!(id, error = %e, reason = %reason, "could not record replay failure");
                    report.store_errors.push(id);
                    continue;
                }
            };

            if abandon {
                tracing::warn!(id, attempts, reason = %reason, "abandoned contact form");
                report.abandoned.push(id);
            } else {
                tracing::debug!(id, attempts, reason = %reason, "replay failed, keeping submission");
                report.pending.push(id);
            }
        }

        Ok(report)
    }

    async fn send(&self, form_data: &Value) -> Result<Response, Error> {
        let url = self.config.resolve(&self.config.contact_endpoint)?;
        let request = Request::post_json(url, form_data)?;
        self.network.fetch(&request).await
    }
}

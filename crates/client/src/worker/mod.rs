//! The background worker.
//!
//! A [`Worker`] owns the durable store, the network seam, and an explicit
//! [`WorkerConfig`]. Hosts feed it [`Event`]s through [`Worker::dispatch`]
//! and act on the returned [`Outcome`].
//!
//! ### Lifecycle
//! - `Install` opens the current bucket and precaches the manifest.
//! - `Activate` deletes every other bucket.
//!
//! ### Connectivity
//! - `Offline` makes direct submissions queue without a network attempt.
//! - `Online` and a `Sync` with the configured tag replay the queue.

pub mod config;
pub mod event;
pub mod intercept;
pub mod lifecycle;
pub mod notify;
pub mod queue;

#[cfg(test)]
mod testing;

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use folio_core::{CacheDb, Error};
use tokio::sync::Mutex;

pub use config::WorkerConfig;
pub use event::{ClientMessage, Event, MessageReply, Outcome};
pub use intercept::{ResponseSource, Strategy};
pub use lifecycle::{ActivateReport, InstallReport, PrecacheFailure};
pub use notify::Notification;
pub use queue::{ReplayReport, SubmitOutcome};

use crate::fetch::Network;

pub struct Worker {
    config: Arc<WorkerConfig>,
    cache: CacheDb,
    network: Arc<dyn Network>,
    online: AtomicBool,
    replay_lock: Mutex<()>,
}

impl Worker {
    pub fn new(config: WorkerConfig, cache: CacheDb, network: Arc<dyn Network>) -> Self {
        Self { config: Arc::new(config), cache, network, online: AtomicBool::new(true), replay_lock: Mutex::new(()) }
    }

    pub fn config(&self) -> &WorkerConfig {
        &self.config
    }

    pub fn cache(&self) -> &CacheDb {
        &self.cache
    }

    pub fn is_online(&self) -> bool {
        self.online.load(Ordering::SeqCst)
    }

    pub fn set_online(&self, online: bool) {
        self.online.store(online, Ordering::SeqCst);
    }

    /// Route one event to its handler.
    pub async fn dispatch(&self, event: Event) -> Result<Outcome, Error> {
        tracing::debug!(kind = event.kind(), "dispatching event");

        match event {
            Event::Install => Ok(Outcome::Installed(self.install().await)),
            Event::Activate => Ok(Outcome::Activated(self.activate().await?)),
            Event::Fetch(request) => self.handle_fetch(request).await,
            Event::Message(message) => Ok(Outcome::Reply(self.handle_message(message).await)),
            Event::Sync { tag } if tag == self.config.sync_tag => {
                Ok(Outcome::Replayed(self.replay_submissions().await?))
            }
            Event::Sync { tag } => {
                tracing::debug!(tag = %tag, "ignoring unknown sync tag");
                Ok(Outcome::Ignored)
            }
            Event::Online => {
                self.set_online(true);
                Ok(Outcome::Replayed(self.replay_submissions().await?))
            }
            Event::Offline => {
                self.set_online(false);
                Ok(Outcome::Ignored)
            }
            Event::Submit { form_data } => Ok(Outcome::Submitted(self.submit_contact_form(form_data).await?)),
            Event::Push { data } => Ok(Outcome::Notification(Notification::for_push(&self.config, data.as_deref()))),
            Event::NotificationClick { action } => Ok(notify::notification_click(&self.config, action.as_deref())),
        }
    }
}

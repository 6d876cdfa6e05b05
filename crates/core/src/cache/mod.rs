//! SQLite-backed store for cache buckets and queued submissions.
//!
//! This module provides a persistent store using SQLite with async access via
//! tokio-rusqlite. It supports:
//!
//! - Named, versioned cache buckets of request/response pairs
//! - Entries keyed by a SHA-256 digest of method and URL
//! - An auto-incrementing queue of form submissions awaiting replay
//! - Automatic schema migrations and WAL mode

pub mod buckets;
pub mod connection;
pub mod entries;
pub mod hash;
pub mod migrations;
pub mod queue;

pub use crate::Error;

pub use connection::CacheDb;
pub use entries::{CachedEntry, ResponseType};
pub use queue::{QueuedSubmission, SubmissionStatus};

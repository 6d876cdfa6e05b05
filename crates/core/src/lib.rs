//! Core types and shared functionality for folio-sw.
//!
//! This crate provides:
//! - Durable store with SQLite backend (cache buckets and the submission queue)
//! - Unified error types
//! - Configuration structures

pub mod cache;
pub mod config;
pub mod error;

pub use cache::{CacheDb, CachedEntry, QueuedSubmission, ResponseType, SubmissionStatus};
pub use config::{AppConfig, ConfigError};
pub use error::Error;

//! Worker runtime for folio-sw.
//!
//! This crate provides the network seam, the request interceptor, the
//! offline submission queue, and the event-driven [`Worker`] shared by the
//! server.

pub mod contact;
pub mod fetch;
pub mod race;
pub mod worker;

pub use contact::{ContactForm, FormErrors, validate_payload};
pub use fetch::{Destination, FetchConfig, HttpNetwork, Network, Request, RequestMode, Response};
pub use race::{Race, race_timeout};
pub use worker::{
    ClientMessage, Event, MessageReply, Notification, Outcome, ReplayReport, ResponseSource, SubmitOutcome, Worker,
    WorkerConfig,
};

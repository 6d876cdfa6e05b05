//! First-of combinator between a task and a timer.
//!
//! The task is spawned onto the runtime before the race starts. When the
//! timer wins, the task is detached rather than aborted: it keeps running to
//! completion and any side effects it performs (such as a cache write) still
//! happen after the caller has moved on.

use std::future::Future;
use std::time::Duration;

/// Result of [`race_timeout`].
#[derive(Debug)]
pub enum Race<T> {
    /// The task finished first.
    Settled(T),
    /// The timer fired first; the task is still running.
    TimedOut,
    /// The task panicked or was cancelled by the runtime.
    Aborted(String),
}

/// Run `future` as a detached task and wait at most `limit` for its output.
pub async fn race_timeout<F>(future: F, limit: Duration) -> Race<F::Output>
where
    F: Future + Send + 'static,
    F::Output: Send + 'static,
{
    let handle = tokio::spawn(future);

    match tokio::time::timeout(limit, handle).await {
        Ok(Ok(output)) => Race::Settled(output),
        Ok(Err(join_err)) => Race::Aborted(join_err.to_string()),
        Err(_) => Race::TimedOut,
    }
}

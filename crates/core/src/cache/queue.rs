//! Submission queue operations.
//!
//! Form submissions that could not be delivered are stored here with an
//! auto-incrementing id until a replay succeeds. A record is only ever
//! deleted by [`CacheDb::delete_submission`] after a successful send, or by
//! an explicit purge of abandoned records.

use std::fmt;
use std::str::FromStr;

use super::connection::CacheDb;
use crate::Error;
use serde::{Deserialize, Serialize};
use tokio_rusqlite::params;
use tokio_rusqlite::rusqlite;

/// Delivery state of a queued submission.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, schemars::JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum SubmissionStatus {
    /// Waiting for the next replay.
    Pending,
    /// Permanently rejected or out of attempts; skipped by replays.
    Abandoned,
}

impl SubmissionStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            SubmissionStatus::Pending => "pending",
            SubmissionStatus::Abandoned => "abandoned",
        }
    }
}

impl fmt::Display for SubmissionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SubmissionStatus {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(SubmissionStatus::Pending),
            "abandoned" => Ok(SubmissionStatus::Abandoned),
            other => Err(Error::CorruptEntry(format!("unknown submission status: {other}"))),
        }
    }
}

/// A form submission waiting to be delivered.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, schemars::JsonSchema)]
pub struct QueuedSubmission {
    pub id: i64,
    pub form_data: serde_json::Value,
    pub queued_at: String,
    pub attempts: u32,
    pub last_attempt_at: Option<String>,
    pub last_error: Option<String>,
    pub status: SubmissionStatus,
}

const SELECT_COLUMNS: &str =
    "SELECT id, form_json, queued_at, attempts, last_attempt_at, last_error, status FROM submission_queue";

type RawRow = (i64, String, String, u32, Option<String>, Option<String>, String);

fn read_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<RawRow> {
    Ok((row.get(0)?, row.get(1)?, row.get(2)?, row.get(3)?, row.get(4)?, row.get(5)?, row.get(6)?))
}

fn decode((id, form_json, queued_at, attempts, last_attempt_at, last_error, status): RawRow) -> Result<QueuedSubmission, Error> {
    Ok(QueuedSubmission {
        id,
        form_data: serde_json::from_str(&form_json)?,
        queued_at,
        attempts,
        last_attempt_at,
        last_error,
        status: status.parse()?,
    })
}

impl CacheDb {
    /// Persist a submission and return its assigned id.
    pub async fn enqueue_submission(&self, form_data: &serde_json::Value) -> Result<i64, Error> {
        let form_json = serde_json::to_string(form_data).map_err(|e| Error::Queue(e.to_string()))?;
        let queued_at = chrono::Utc::now().to_rfc3339();
        self.conn
            .call(move |conn| -> Result<i64, Error> {
                conn.execute(
                    "INSERT INTO submission_queue (form_json, queued_at, status) VALUES (?1, ?2, ?3)",
                    params![form_json, queued_at, SubmissionStatus::Pending.as_str()],
                )?;
                Ok(conn.last_insert_rowid())
            })
            .await
            .map_err(Error::from)
    }

    /// Get one submission by id.
    pub async fn get_submission(&self, id: i64) -> Result<Option<QueuedSubmission>, Error> {
        self.conn
            .call(move |conn| -> Result<Option<QueuedSubmission>, Error> {
                let mut stmt = conn.prepare(&format!("{SELECT_COLUMNS} WHERE id = ?1"))?;
                let result = stmt.query_row(params![id], read_row);
                match result {
                    Ok(raw) => Ok(Some(decode(raw)?)),
                    Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
                    Err(e) => Err(e.into()),
                }
            })
            .await
            .map_err(Error::from)
    }

    /// List submissions in id order, optionally filtered by status.
    pub async fn list_submissions(&self, status: Option<SubmissionStatus>) -> Result<Vec<QueuedSubmission>, Error> {
        self.conn
            .call(move |conn| -> Result<Vec<QueuedSubmission>, Error> {
                let filter = status.map(|s| s.as_str());
                let mut stmt =
                    conn.prepare(&format!("{SELECT_COLUMNS} WHERE ?1 IS NULL OR status = ?1 ORDER BY id ASC"))?;
                let raw = stmt
                    .query_map(params![filter], read_row)?
                    .collect::<Result<Vec<_>, _>>()?;
                raw.into_iter().map(decode).collect()
            })
            .await
            .map_err(Error::from)
    }

    /// Delete a delivered submission. Returns false if it was already gone.
    pub async fn delete_submission(&self, id: i64) -> Result<bool, Error> {
        self.conn
            .call(move |conn| -> Result<bool, Error> {
                let count = conn.execute("DELETE FROM submission_queue WHERE id = ?1", params![id])?;
                Ok(count > 0)
            })
            .await
            .map_err(Error::from)
    }

    /// Record a failed delivery attempt, optionally abandoning the record.
    ///
    /// Returns the updated attempt count.
    pub async fn record_failed_attempt(&self, id: i64, error: &str, abandon: bool) -> Result<u32, Error> {
        let error = error.to_string();
        let now = chrono::Utc::now().to_rfc3339();
        let status = if abandon { SubmissionStatus::Abandoned } else { SubmissionStatus::Pending };
        self.conn
            .call(move |conn| -> Result<u32, Error> {
                let updated = conn.execute(
                    "UPDATE submission_queue
                    SET attempts = attempts + 1, last_attempt_at = ?2, last_error = ?3, status = ?4
                    WHERE id = ?1",
                    params![id, now, error, status.as_str()],
                )?;
                if updated == 0 {
                    return Err(Error::Queue(format!("submission {id} not found")));
                }
                let attempts: u32 =
                    conn.query_row("SELECT attempts FROM submission_queue WHERE id = ?1", params![id], |row| {
                        row.get(0)
                    })?;
                Ok(attempts)
            })
            .await
            .map_err(Error::from)
    }

    /// Delete every abandoned submission.
    ///
    /// Returns the number of deleted records.
    pub async fn purge_abandoned_submissions(&self) -> Result<u64, Error> {
        self.conn
            .call(|conn| -> Result<u64, Error> {
                let count = conn.execute(
                    "DELETE FROM submission_queue WHERE status = ?1",
                    params![SubmissionStatus::Abandoned.as_str()],
                )?;
                Ok(count as u64)
            })
            .await
            .map_err(Error::from)
    }
}

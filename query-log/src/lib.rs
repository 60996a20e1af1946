//! Query log: one immutable record per answered question.
//!
//! Records are appended as JSON lines. Each stored row carries an internal
//! `id` next to the public fields; [`QueryLog::list`] strips it and returns
//! records in insertion order.
//!
//! Reading is tolerant: blank lines are ignored and rows that fail to parse
//! are skipped with a warning, so one damaged line never hides the rest.

pub mod errors;

use std::{io::ErrorKind, path::PathBuf};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tokio::{io::AsyncWriteExt, sync::Mutex};
use tracing::{debug, warn};
use uuid::Uuid;

pub use errors::{QueryLogError, Result};

/// Public shape of a logged exchange.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LogRecord {
    /// Question as received.
    pub query: String,
    /// Answer returned to the caller (may be the fallback apology).
    pub response: String,
    /// UTC instant the record was written.
    pub timestamp: DateTime<Utc>,
}

/// On-disk row: record plus storage identifier.
#[derive(Serialize, Deserialize)]
struct StoredRow {
    id: Uuid,
    #[serde(flatten)]
    record: LogRecord,
}

/// Append-only log collection stored at a JSONL path.
#[derive(Debug)]
pub struct QueryLog {
    path: PathBuf,
    /// Keeps concurrent appends from interleaving.
    append_lock: Mutex<()>,
}

impl QueryLog {
    /// Prepares the collection at `path`, creating parent directories.
    ///
    /// The file itself is created on the first append.
    pub async fn open(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        if let Some(dir) = path.parent().filter(|d| !d.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(dir).await.map_err(|source| QueryLogError::Io {
                path: dir.to_path_buf(),
                source,
            })?;
        }
        Ok(Self {
            path,
            append_lock: Mutex::new(()),
        })
    }

    /// Appends one record stamped with the current UTC time.
    pub async fn record(&self, query: &str, response: &str) -> Result<LogRecord> {
        let row = StoredRow {
            id: Uuid::new_v4(),
            record: LogRecord {
                query: query.to_string(),
                response: response.to_string(),
                timestamp: Utc::now(),
            },
        };
        let mut line = serde_json::to_vec(&row)?;
        line.push(b'\n');

        let io_err = |source| QueryLogError::Io {
            path: self.path.clone(),
            source,
        };

        let _guard = self.append_lock.lock().await;
        let mut file = tokio::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .await
            .map_err(io_err)?;
        file.write_all(&line).await.map_err(io_err)?;
        file.flush().await.map_err(io_err)?;

        debug!(id = %row.id, "query log record appended");
        Ok(row.record)
    }

    /// All records in insertion order, without storage identifiers.
    pub async fn list(&self) -> Result<Vec<LogRecord>> {
        let text = match tokio::fs::read_to_string(&self.path).await {
            Ok(t) => t,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
            Err(source) => {
                return Err(QueryLogError::Io {
                    path: self.path.clone(),
                    source,
                });
            }
        };

        let mut out = Vec::new();
        for (i, line) in text.lines().enumerate() {
            if line.trim().is_empty() {
                continue;
            }
            match serde_json::from_str::<StoredRow>(line) {
                Ok(row) => out.push(row.record),
                Err(e) => warn!(line = i + 1, error = %e, "skipping unreadable query log row"),
            }
        }

        debug!(records = out.len(), "query log read");
        Ok(out)
    }
}

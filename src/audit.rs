//! Append-only audit log of classification decisions.
//!
//! One JSON object per line. Each entry is written with a single append
//! while holding a mutex, so concurrent calls never interleave inside a
//! line. The timestamp is taken under the lock, which keeps timestamp order
//! equal to append order.

use std::fs::{File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::AuditError;
use crate::pipeline::types::{Category, ConfidenceBasis};

/// Longest input excerpt stored per entry.
const MAX_EXCERPT_CHARS: usize = 200;

/// One audit record. Never mutated or deleted after being written;
/// retention and rotation are the operator's concern.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogEntry {
    pub id: Uuid,
    pub timestamp: DateTime<Utc>,
    pub category: Category,
    pub basis: ConfidenceBasis,
    pub excerpt: String,
}

/// Append-only JSON-lines audit log.
pub struct AuditLog {
    path: PathBuf,
    file: Mutex<File>,
}

impl AuditLog {
    /// Open (or create) the audit log at `path` for appending.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, AuditError> {
        let path = path.as_ref().to_path_buf();
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&path)
            .map_err(|e| AuditError::Persistence {
                path: path.display().to_string(),
                source: e,
            })?;
        Ok(Self {
            path,
            file: Mutex::new(file),
        })
    }

    /// Path this log appends to.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Append one entry, returning it as written.
    pub fn record(
        &self,
        id: Uuid,
        category: Category,
        basis: ConfidenceBasis,
        input_text: &str,
    ) -> Result<LogEntry, AuditError> {
        let excerpt = excerpt(input_text);

        let mut file = self.file.lock().expect("audit log lock poisoned");
        // Timestamp under the lock: append order == timestamp order.
        let entry = LogEntry {
            id,
            timestamp: Utc::now(),
            category,
            basis,
            excerpt,
        };
        let mut line = serde_json::to_string(&entry)?;
        line.push('\n');
        file.write_all(line.as_bytes())
            .and_then(|()| file.flush())
            .map_err(|e| AuditError::Persistence {
                path: self.path.display().to_string(),
                source: e,
            })?;
        Ok(entry)
    }
}

/// Input excerpt for an audit entry: newlines flattened, bounded length.
fn excerpt(text: &str) -> String {
    text.chars()
        .take(MAX_EXCERPT_CHARS)
        .map(|c| if c == '\n' || c == '\r' { ' ' } else { c })
        .collect()
}

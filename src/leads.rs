use std::fs::{File, OpenOptions};
use std::io::{self, Write};
use std::path::Path;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tokio::sync::Mutex;
use uuid::Uuid;

/// One accepted lead, serialized as a single NDJSON line.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LeadRecord {
    pub id: Uuid,
    pub received_at: DateTime<Utc>,
    pub ip: String,
    /// The submitted payload, verbatim.
    pub payload: Value,
}

impl LeadRecord {
    pub fn new(ip: String, payload: Value) -> Self {
        Self {
            id: Uuid::new_v4(),
            received_at: Utc::now(),
            ip,
            payload,
        }
    }
}

/// Append-only journal of accepted leads. Records are never updated or
/// deleted; each append is a single whole-line write under the lock, so
/// concurrent requests cannot interleave partial lines.
pub struct LeadLog {
    file: Mutex<File>,
}

impl LeadLog {
    pub fn open(path: &Path) -> io::Result<Self> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        let file = OpenOptions::new().create(true).append(true).open(path)?;
        Ok(Self {
            file: Mutex::new(file),
        })
    }

    pub async fn append(&self, record: &LeadRecord) -> io::Result<()> {
        let mut line = serde_json::to_string(record).map_err(io::Error::other)?;
        line.push('\n');

        let mut file = self.file.lock().await;
        file.write_all(line.as_bytes())
    }
}

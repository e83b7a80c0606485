//! Persistent record of warnings and errors raised during a run

use crate::types::{MirrorError, Severity};
use chrono::{DateTime, SecondsFormat, Utc};
use serde::Serialize;
use std::fs::{File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

#[derive(Debug, Serialize)]
struct FailureRecord<'a> {
    timestamp: String,
    severity: Severity,
    message: &'a str,
}

/// Append-only JSON-lines log shared by every group of a run
#[derive(Debug, Clone)]
pub struct FailureLog {
    path: PathBuf,
    file: Arc<Mutex<File>>,
}

impl FailureLog {
    /// Open `path` for appending, creating it and its parent folders
    pub fn open(path: &Path) -> Result<Self, MirrorError> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }
        let file = OpenOptions::new().create(true).append(true).open(path)?;
        Ok(Self {
            path: path.to_path_buf(),
            file: Arc::new(Mutex::new(file)),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Append one record. Write errors are reported through tracing only.
    pub fn record(&self, severity: Severity, message: &str) {
        self.record_at(Utc::now(), severity, message);
    }

    fn record_at(&self, at: DateTime<Utc>, severity: Severity, message: &str) {
        let record = FailureRecord {
            timestamp: at.to_rfc3339_opts(SecondsFormat::Secs, true),
            severity,
            message,
        };
        let line = match serde_json::to_string(&record) {
            Ok(line) => line,
            Err(e) => {
                tracing::error!("Cannot encode failure record: {}", e);
                return;
            }
        };

        let Ok(mut file) = self.file.lock() else {
            return;
        };
        if let Err(e) = writeln!(file, "{}", line) {
            tracing::error!("Cannot write failure log {}: {}", self.path.display(), e);
        }
    }
}

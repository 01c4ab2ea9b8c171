//! Append-only CSV audit trail of webhook calls (`webhook_log.csv`).

use chrono::Utc;
use std::{
    fs::{self, OpenOptions},
    io,
    path::{Path, PathBuf},
    sync::{Arc, Mutex},
};

use crate::models::webhook::AuditLogRecord;

pub const WEBHOOK_LOG_FILE: &str = "webhook_log.csv";

#[derive(Debug, thiserror::Error)]
pub enum EventLogError {
    #[error("failed to open webhook log {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("failed to write webhook log row: {0}")]
    Csv(#[from] csv::Error),
}

#[derive(Debug, Clone)]
pub struct EventLogger {
    dir: PathBuf,
    // Serializes header detection and appends within this process.
    write_lock: Arc<Mutex<()>>,
}

impl EventLogger {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            write_lock: Arc::new(Mutex::new(())),
        }
    }

    pub fn path(&self) -> PathBuf {
        self.dir.join(WEBHOOK_LOG_FILE)
    }

    pub fn log(&self, source: &str, status_code: u16) -> Result<(), EventLogError> {
        self.append(&AuditLogRecord::new(source, status_code, Utc::now()))
    }

    pub fn append(&self, record: &AuditLogRecord) -> Result<(), EventLogError> {
        let _guard = self
            .write_lock
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());

        fs::create_dir_all(&self.dir).map_err(|source| EventLogError::Io {
            path: self.dir.clone(),
            source,
        })?;

        let path = self.path();
        // Must be checked before the append-mode open creates the file.
        let exists = path.exists();
        let file = open_append(&path)?;

        let mut writer = csv::WriterBuilder::new()
            .has_headers(!exists)
            .from_writer(file);
        writer.serialize(record)?;
        writer.flush().map_err(|source| EventLogError::Io {
            path: path.clone(),
            source,
        })?;
        Ok(())
    }
}

fn open_append(path: &Path) -> Result<fs::File, EventLogError> {
    OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .map_err(|source| EventLogError::Io {
            path: path.to_path_buf(),
            source,
        })
}

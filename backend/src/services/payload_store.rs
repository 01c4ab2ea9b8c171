//! Captures raw webhook bodies to `{root}/raw/webhooks/{source}/{stem}.json`.

use chrono::{DateTime, Utc};
use serde_json::Value;
use std::{
    fs, io,
    path::{Path, PathBuf},
};

use crate::{
    config::PayloadFileNaming, models::webhook::WebhookEvent,
    validation::rules::validate_source_token,
};

#[derive(Debug, thiserror::Error)]
pub enum PayloadStoreError {
    #[error("invalid webhook source: {0:?}")]
    InvalidSource(String),
    #[error("failed to write webhook payload to {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("failed to serialize webhook payload: {0}")]
    Serialize(#[from] serde_json::Error),
}

#[derive(Debug, Clone)]
pub struct PayloadStore {
    root: PathBuf,
    naming: PayloadFileNaming,
}

impl PayloadStore {
    pub fn new(root: impl Into<PathBuf>, naming: PayloadFileNaming) -> Self {
        Self {
            root: root.into(),
            naming,
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn source_dir(&self, source: &str) -> PathBuf {
        self.root.join("raw").join("webhooks").join(source)
    }

    pub fn save(&self, source: &str, payload: &Value) -> Result<PathBuf, PayloadStoreError> {
        self.save_event(&WebhookEvent::new(source, payload.clone()))
    }

    pub fn save_event(&self, event: &WebhookEvent) -> Result<PathBuf, PayloadStoreError> {
        validate_source_token(&event.source)
            .map_err(|_| PayloadStoreError::InvalidSource(event.source.clone()))?;

        let dir = self.source_dir(&event.source);
        fs::create_dir_all(&dir).map_err(|source| PayloadStoreError::Io {
            path: dir.clone(),
            source,
        })?;

        let path = dir.join(format!("{}.json", file_stem(self.naming, event.received_at)));
        let body = serde_json::to_vec_pretty(&event.payload)?;
        fs::write(&path, body).map_err(|source| PayloadStoreError::Io {
            path: path.clone(),
            source,
        })?;

        tracing::debug!(source = %event.source, path = %path.display(), "stored webhook payload");
        Ok(path)
    }
}

pub fn file_stem(naming: PayloadFileNaming, at: DateTime<Utc>) -> String {
    let base = at.format("%Y%m%d_%H%M%S");
    match naming {
        PayloadFileNaming::Second => base.to_string(),
        PayloadFileNaming::Unique => format!(
            "{}_{}_{:08x}",
            base,
            at.format("%6f"),
            rand::random::<u32>()
        ),
    }
}

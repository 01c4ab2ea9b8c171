use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use utoipa::ToSchema;

/// An inbound webhook body as captured by the listener.
#[derive(Debug, Clone, PartialEq)]
pub struct WebhookEvent {
    pub source: String,
    pub payload: Value,
    pub received_at: DateTime<Utc>,
}

impl WebhookEvent {
    pub fn new(source: impl Into<String>, payload: Value) -> Self {
        Self {
            source: source.into(),
            payload,
            received_at: Utc::now(),
        }
    }
}

/// One row of `webhook_log.csv`. Field order and names define the CSV header.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuditLogRecord {
    pub timestamp: String,
    pub source: String,
    pub status_code: u16,
}

impl AuditLogRecord {
    pub fn new(source: &str, status_code: u16, at: DateTime<Utc>) -> Self {
        Self {
            timestamp: at.to_rfc3339_opts(SecondsFormat::Micros, true),
            source: source.to_string(),
            status_code,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct WebhookReceipt {
    pub status: String,
    pub file: String,
}

impl WebhookReceipt {
    pub fn received(file: String) -> Self {
        Self {
            status: "received".to_string(),
            file,
        }
    }
}

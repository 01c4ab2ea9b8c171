//! Webhook listener: signature gate, challenge handshake, payload capture and
//! CSV audit logging for `POST /webhooks/{source}`.

use axum::http::{HeaderMap, StatusCode};
use serde::Serialize;
use serde_json::Value;
use std::{
    panic::{self, AssertUnwindSafe},
    path::PathBuf,
};

use crate::{
    error::AppError,
    models::webhook::{WebhookEvent, WebhookReceipt},
    services::{
        challenge::handle_challenge,
        event_logger::EventLogger,
        payload_store::{PayloadStore, PayloadStoreError},
        verifier::VerifierRegistry,
    },
    validation::rules::validate_source_token,
};

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum WebhookOutcome {
    /// Ownership handshake; the body is the echoed challenge.
    Challenge(Value),
    Received(WebhookReceipt),
}

#[derive(Debug, thiserror::Error)]
pub enum WebhookError {
    #[error("invalid webhook source: {0:?}")]
    InvalidSource(String),
    #[error("Invalid {} signature", display_source(.0))]
    InvalidSignature(String),
    #[error("{0}")]
    InvalidJson(#[from] serde_json::Error),
    #[error("{0}")]
    Store(#[from] PayloadStoreError),
    #[error("webhook processing panicked")]
    Panicked,
}

fn display_source(source: &str) -> String {
    let mut chars = source.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

impl WebhookError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            WebhookError::InvalidSource(_) | WebhookError::InvalidSignature(_) => {
                StatusCode::BAD_REQUEST
            }
            WebhookError::Store(PayloadStoreError::InvalidSource(_)) => StatusCode::BAD_REQUEST,
            WebhookError::InvalidJson(_) | WebhookError::Store(_) | WebhookError::Panicked => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

impl From<WebhookError> for AppError {
    fn from(err: WebhookError) -> Self {
        match err {
            WebhookError::InvalidSignature(_) => AppError::InvalidSignature(err.to_string()),
            WebhookError::InvalidSource(_) | WebhookError::Store(PayloadStoreError::InvalidSource(_)) => {
                AppError::BadRequest(err.to_string())
            }
            WebhookError::InvalidJson(_) | WebhookError::Store(_) | WebhookError::Panicked => {
                AppError::Internal(err.to_string())
            }
        }
    }
}

#[derive(Clone)]
pub struct WebhookDispatcher {
    payload_store: PayloadStore,
    event_logger: EventLogger,
    verifiers: VerifierRegistry,
}

impl WebhookDispatcher {
    pub fn new(
        payload_store: PayloadStore,
        event_logger: EventLogger,
        verifiers: VerifierRegistry,
    ) -> Self {
        Self {
            payload_store,
            event_logger,
            verifiers,
        }
    }

    pub fn payload_store(&self) -> &PayloadStore {
        &self.payload_store
    }

    pub fn event_logger(&self) -> &EventLogger {
        &self.event_logger
    }

    /// Runs one webhook call to completion and appends exactly one audit row
    /// carrying the resulting status code.
    pub fn dispatch(
        &self,
        source: &str,
        headers: &HeaderMap,
        body: &[u8],
    ) -> Result<WebhookOutcome, WebhookError> {
        // A panic in a verifier or the store still gets its 500 audit row.
        let result = panic::catch_unwind(AssertUnwindSafe(|| self.process(source, headers, body)))
            .unwrap_or(Err(WebhookError::Panicked));
        let status = match &result {
            Ok(_) => StatusCode::OK,
            Err(err) => err.status_code(),
        };
        self.record(source, status);

        match &result {
            Ok(WebhookOutcome::Challenge(_)) => {
                tracing::info!(source, "answered webhook challenge")
            }
            Ok(WebhookOutcome::Received(receipt)) => {
                tracing::info!(source, file = %receipt.file, "webhook received")
            }
            Err(err) => tracing::warn!(source, status = status.as_u16(), error = %err, "webhook rejected"),
        }
        result
    }

    fn process(
        &self,
        source: &str,
        headers: &HeaderMap,
        body: &[u8],
    ) -> Result<WebhookOutcome, WebhookError> {
        validate_source_token(source).map_err(|_| WebhookError::InvalidSource(source.to_string()))?;

        let payload: Value = serde_json::from_slice(body)?;

        if let Some(verifier) = self.verifiers.verifier_for(source) {
            if !verifier.verify(headers, body) {
                return Err(WebhookError::InvalidSignature(source.to_string()));
            }
        }

        if let Some(challenge) = handle_challenge(&payload) {
            return Ok(WebhookOutcome::Challenge(challenge));
        }

        let path: PathBuf = self
            .payload_store
            .save_event(&WebhookEvent::new(source, payload))?;
        Ok(WebhookOutcome::Received(WebhookReceipt::received(
            path.display().to_string(),
        )))
    }

    fn record(&self, source: &str, status: StatusCode) {
        if let Err(err) = self.event_logger.log(source, status.as_u16()) {
            tracing::error!(source, status = status.as_u16(), error = %err, "failed to append webhook log row");
        }
    }
}

#![allow(dead_code)]
use async_trait::async_trait;
use axum::{
    body::{to_bytes, Body},
    http::{Request, StatusCode},
    Router,
};
use leadcommander_backend::{
    build_router,
    config::{Config, PayloadFileNaming},
    models::agent_log::AgentLogEntry,
    services::{
        agent_log::{AgentLogStore, PersistenceError},
        completion::{CompletionError, CompletionPrompt, CompletionService},
    },
    state::AppState,
};
use serde_json::Value;
use sqlx::{postgres::PgPoolOptions, PgPool};
use std::{
    env,
    path::Path,
    sync::{Arc, Mutex},
    time::Duration,
};
use tower::ServiceExt;
use uuid::Uuid;

pub const STRIPE_TEST_SECRET: &str = "whsec_test_secret";

pub fn test_config(root: &Path) -> Config {
    Config {
        bind_addr: "127.0.0.1:0".parse().expect("bind addr"),
        database_url: None,
        openai_api_key: None,
        openai_base_url: "http://127.0.0.1:9/v1".into(),
        openai_model: "gpt-4".into(),
        openai_max_tokens: 300,
        openai_timeout_seconds: 1,
        data_dir: root.join("data"),
        log_dir: root.join("logs"),
        payload_file_naming: PayloadFileNaming::Unique,
        stripe_webhook_secret: Some(STRIPE_TEST_SECRET.into()),
        stripe_signature_tolerance_seconds: 300,
        cors_allow_origins: vec!["http://localhost:5173".into()],
    }
}

/// Completion double: answers with `reply`, or fails when it is `None`.
pub struct StubCompletion {
    reply: Option<String>,
    prompts: Mutex<Vec<CompletionPrompt>>,
}

impl StubCompletion {
    pub fn replying(text: &str) -> Arc<Self> {
        Arc::new(Self {
            reply: Some(text.to_string()),
            prompts: Mutex::new(Vec::new()),
        })
    }

    pub fn failing() -> Arc<Self> {
        Arc::new(Self {
            reply: None,
            prompts: Mutex::new(Vec::new()),
        })
    }

    pub fn prompts(&self) -> Vec<CompletionPrompt> {
        self.prompts.lock().expect("lock prompts").clone()
    }
}

#[async_trait]
impl CompletionService for StubCompletion {
    async fn generate(&self, prompt: &CompletionPrompt) -> Result<String, CompletionError> {
        self.prompts.lock().expect("lock prompts").push(prompt.clone());
        match &self.reply {
            Some(text) => Ok(text.clone()),
            None => Err(CompletionError::Status {
                status: reqwest::StatusCode::UNAUTHORIZED,
                body: "invalid api key".into(),
            }),
        }
    }
}

#[derive(Default)]
pub struct RecordingAgentLogStore {
    fail: bool,
    entries: Mutex<Vec<AgentLogEntry>>,
}

impl RecordingAgentLogStore {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn failing() -> Arc<Self> {
        Arc::new(Self {
            fail: true,
            entries: Mutex::new(Vec::new()),
        })
    }

    pub fn entries(&self) -> Vec<AgentLogEntry> {
        self.entries.lock().expect("lock entries").clone()
    }
}

#[async_trait]
impl AgentLogStore for RecordingAgentLogStore {
    async fn insert_log(&self, entry: &AgentLogEntry) -> Result<Uuid, PersistenceError> {
        self.entries.lock().expect("lock entries").push(entry.clone());
        if self.fail {
            Err(PersistenceError::NotConfigured)
        } else {
            Ok(Uuid::new_v4())
        }
    }
}

pub fn test_app(
    config: Config,
    completion: Arc<dyn CompletionService>,
    agent_logs: Arc<dyn AgentLogStore>,
) -> Router {
    build_router(AppState::new(config, completion, agent_logs))
}

/// App with a failing completion client and a recording store.
pub fn default_app(root: &Path) -> Router {
    test_app(
        test_config(root),
        StubCompletion::failing(),
        RecordingAgentLogStore::new(),
    )
}

pub async fn send(app: &Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = app.clone().oneshot(request).await.expect("call app");
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("read body");
    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or_else(|_| Value::String(String::from_utf8_lossy(&bytes).into()))
    };
    (status, body)
}

pub fn json_request(uri: &str, body: impl Into<Body>) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json")
        .body(body.into())
        .expect("build request")
}

pub async fn post_json(app: &Router, uri: &str, body: &Value) -> (StatusCode, Value) {
    send(app, json_request(uri, body.to_string())).await
}

/// CSV rows of `webhook_log.csv`, header excluded.
pub fn webhook_log_rows(root: &Path) -> Vec<Vec<String>> {
    let path = root.join("logs").join("webhook_log.csv");
    let Ok(mut reader) = csv::Reader::from_path(path) else {
        return Vec::new();
    };
    reader
        .records()
        .map(|record| {
            record
                .expect("csv record")
                .iter()
                .map(str::to_string)
                .collect()
        })
        .collect()
}

/// Pool for repository tests; `None` when `TEST_DATABASE_URL` is not set.
pub async fn test_pool() -> Option<PgPool> {
    let url = env::var("TEST_DATABASE_URL").ok()?;
    let pool = PgPoolOptions::new()
        .max_connections(5)
        .acquire_timeout(Duration::from_secs(30))
        .connect(&url)
        .await
        .expect("connect to TEST_DATABASE_URL");
    sqlx::migrate!("./migrations")
        .run(&pool)
        .await
        .expect("run migrations");
    Some(pool)
}

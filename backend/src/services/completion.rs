//! Client for the external text-completion API (OpenAI-compatible
//! `/chat/completions`).

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::Instrument;

use crate::config::Config;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompletionPrompt {
    pub system: String,
    pub user: String,
}

impl CompletionPrompt {
    pub fn new(system: impl Into<String>, user: impl Into<String>) -> Self {
        Self {
            system: system.into(),
            user: user.into(),
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum CompletionError {
    #[error("completion API key is not configured")]
    NotConfigured,
    #[error("completion request failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("completion API returned {status}: {body}")]
    Status { status: StatusCode, body: String },
    #[error("completion response was malformed: {0}")]
    Malformed(String),
}

/// Result of asking for a completion: either generated text or a marker that
/// the caller must answer with its canned fallback.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CompletionOutcome {
    Generated(String),
    Fallback { reason: String },
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CompletionService: Send + Sync {
    async fn generate(&self, prompt: &CompletionPrompt) -> Result<String, CompletionError>;
}

/// Calls `service` and folds every failure, including blank text, into
/// [`CompletionOutcome::Fallback`].
pub async fn complete(service: &dyn CompletionService, prompt: &CompletionPrompt) -> CompletionOutcome {
    match service.generate(prompt).await {
        Ok(text) => {
            let text = text.trim();
            if text.is_empty() {
                tracing::warn!("completion returned empty text; using fallback");
                CompletionOutcome::Fallback {
                    reason: "empty completion".to_string(),
                }
            } else {
                CompletionOutcome::Generated(text.to_string())
            }
        }
        Err(err) => {
            tracing::warn!(error = %err, "completion failed; using fallback");
            CompletionOutcome::Fallback {
                reason: err.to_string(),
            }
        }
    }
}

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    max_tokens: u32,
}

#[derive(Serialize)]
struct ChatMessage<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Deserialize)]
struct ChatChoice {
    message: ChatMessageResponse,
}

#[derive(Deserialize)]
struct ChatMessageResponse {
    content: Option<String>,
}

#[derive(Clone)]
pub struct OpenAiCompletionService {
    client: Client,
    api_key: Option<String>,
    base_url: String,
    model: String,
    max_tokens: u32,
}

impl OpenAiCompletionService {
    pub fn from_config(config: &Config) -> anyhow::Result<Self> {
        let client = Client::builder()
            .user_agent("leadcommander-backend/0.1")
            .timeout(Duration::from_secs(config.openai_timeout_seconds))
            .build()
            .map_err(|e| anyhow::anyhow!("Failed to initialize HTTP client: {}", e))?;

        if config.openai_api_key.is_none() {
            tracing::warn!("OPENAI_API_KEY not set; agent endpoints will answer with fallbacks");
        }

        Ok(Self {
            client,
            api_key: config.openai_api_key.clone(),
            base_url: config.openai_base_url.clone(),
            model: config.openai_model.clone(),
            max_tokens: config.openai_max_tokens,
        })
    }
}

#[async_trait]
impl CompletionService for OpenAiCompletionService {
    async fn generate(&self, prompt: &CompletionPrompt) -> Result<String, CompletionError> {
        let api_key = self.api_key.as_deref().ok_or(CompletionError::NotConfigured)?;

        let body = ChatRequest {
            model: &self.model,
            messages: vec![
                ChatMessage {
                    role: "system",
                    content: &prompt.system,
                },
                ChatMessage {
                    role: "user",
                    content: &prompt.user,
                },
            ],
            max_tokens: self.max_tokens,
        };

        let resp = self
            .client
            .post(format!("{}/chat/completions", self.base_url))
            .bearer_auth(api_key)
            .json(&body)
            .send()
            .instrument(tracing::debug_span!("completion_request", model = %self.model))
            .await?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(CompletionError::Status { status, body });
        }

        let parsed: ChatResponse = resp
            .json()
            .await
            .map_err(|e| CompletionError::Malformed(e.to_string()))?;

        parsed
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .ok_or_else(|| CompletionError::Malformed("no choices in response".to_string()))
    }
}

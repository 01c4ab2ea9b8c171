//! Agent handlers: each builds a prompt from its input, asks the completion
//! service, answers with a canned fallback on failure and records the
//! invocation in the remote audit store.

pub mod insight;
pub mod lead_intelligence;
pub mod ltv;

use serde::Serialize;
use serde_json::Value;
use std::sync::Arc;

use crate::{
    models::{
        agent_log::{AgentLogEntry, AgentType},
        lead::AnswerSource,
    },
    services::{
        agent_log::{record_agent_activity, AgentLogStore},
        completion::{complete, CompletionOutcome, CompletionPrompt, CompletionService},
    },
};

#[derive(Clone)]
pub struct AgentContext {
    pub completion: Arc<dyn CompletionService>,
    pub agent_logs: Arc<dyn AgentLogStore>,
}

impl AgentContext {
    pub fn new(completion: Arc<dyn CompletionService>, agent_logs: Arc<dyn AgentLogStore>) -> Self {
        Self {
            completion,
            agent_logs,
        }
    }

    async fn answer(&self, prompt: &CompletionPrompt, fallback: &str) -> (String, AnswerSource) {
        match complete(self.completion.as_ref(), prompt).await {
            CompletionOutcome::Generated(text) => (text, AnswerSource::Gpt),
            CompletionOutcome::Fallback { .. } => (fallback.to_string(), AnswerSource::Fallback),
        }
    }

    async fn audit<I: Serialize, O: Serialize>(&self, agent_type: AgentType, input: &I, output: &O) {
        let entry = AgentLogEntry::new(agent_type, to_json(input), to_json(output));
        record_agent_activity(self.agent_logs.as_ref(), &entry).await;
    }
}

fn to_json<T: Serialize>(value: &T) -> Value {
    serde_json::to_value(value).unwrap_or_else(|err| {
        tracing::warn!(error = %err, "failed to serialize agent log payload");
        Value::Null
    })
}

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use sqlx::{types::Json, FromRow};
use std::{fmt, str::FromStr};
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AgentType {
    Insight,
    LeadScore,
    Ltv,
}

impl AgentType {
    pub fn as_str(&self) -> &'static str {
        match self {
            AgentType::Insight => "insight",
            AgentType::LeadScore => "lead_score",
            AgentType::Ltv => "ltv",
        }
    }
}

impl fmt::Display for AgentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AgentType {
    type Err = anyhow::Error;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "insight" => Ok(AgentType::Insight),
            "lead_score" => Ok(AgentType::LeadScore),
            "ltv" => Ok(AgentType::Ltv),
            other => Err(anyhow::anyhow!("unknown agent type: {}", other)),
        }
    }
}

/// One agent invocation, as forwarded to the remote `agent_logs` table.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AgentLogEntry {
    pub agent_type: AgentType,
    pub input_payload: Value,
    pub output: Value,
    pub created_at: DateTime<Utc>,
}

impl AgentLogEntry {
    pub fn new(agent_type: AgentType, input_payload: Value, output: Value) -> Self {
        Self {
            agent_type,
            input_payload,
            output,
            created_at: Utc::now(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct AgentLog {
    pub id: Uuid,
    pub agent_type: String,
    pub input_payload: Json<Value>,
    pub output: Json<Value>,
    pub created_at: DateTime<Utc>,
}

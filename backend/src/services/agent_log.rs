//! Remote audit trail of agent invocations (`agent_logs`).

use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use crate::{models::agent_log::AgentLogEntry, repositories::agent_log};

#[derive(Debug, thiserror::Error)]
pub enum PersistenceError {
    #[error("agent log store is not configured")]
    NotConfigured,
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AgentLogStore: Send + Sync {
    async fn insert_log(&self, entry: &AgentLogEntry) -> Result<Uuid, PersistenceError>;
}

#[derive(Debug, Clone)]
pub struct PgAgentLogStore {
    pool: PgPool,
}

impl PgAgentLogStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl AgentLogStore for PgAgentLogStore {
    async fn insert_log(&self, entry: &AgentLogEntry) -> Result<Uuid, PersistenceError> {
        Ok(agent_log::insert_agent_log(&self.pool, entry).await?)
    }
}

/// Used when no `DATABASE_URL` is configured.
#[derive(Debug, Clone, Copy, Default)]
pub struct DisabledAgentLogStore;

#[async_trait]
impl AgentLogStore for DisabledAgentLogStore {
    async fn insert_log(&self, _entry: &AgentLogEntry) -> Result<Uuid, PersistenceError> {
        Err(PersistenceError::NotConfigured)
    }
}

/// Best-effort insert: failures are logged and never reach the caller.
pub async fn record_agent_activity(store: &dyn AgentLogStore, entry: &AgentLogEntry) -> Option<Uuid> {
    match store.insert_log(entry).await {
        Ok(id) => {
            tracing::debug!(agent_type = %entry.agent_type, %id, "recorded agent activity");
            Some(id)
        }
        Err(err) => {
            tracing::error!(agent_type = %entry.agent_type, error = %err, "failed to record agent activity");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::agent_log::AgentType;
    use serde_json::json;

    fn entry() -> AgentLogEntry {
        AgentLogEntry::new(AgentType::Ltv, json!({"deal_amount": 1}), json!({"ltv_estimate": "x"}))
    }

    #[tokio::test]
    async fn record_agent_activity_returns_inserted_id() {
        let id = Uuid::new_v4();
        let mut store = MockAgentLogStore::new();
        store
            .expect_insert_log()
            .withf(|entry| entry.agent_type == AgentType::Ltv)
            .times(1)
            .returning(move |_| Ok(id));

        assert_eq!(record_agent_activity(&store, &entry()).await, Some(id));
    }

    #[tokio::test]
    async fn record_agent_activity_swallows_failures() {
        assert_eq!(record_agent_activity(&DisabledAgentLogStore, &entry()).await, None);
    }
}

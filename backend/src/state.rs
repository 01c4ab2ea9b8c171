use std::sync::Arc;

use crate::{
    agents::AgentContext,
    config::Config,
    db::connection::{create_pool, run_migrations},
    services::{
        agent_log::{AgentLogStore, DisabledAgentLogStore, PgAgentLogStore},
        completion::{CompletionService, OpenAiCompletionService},
        event_logger::EventLogger,
        payload_store::PayloadStore,
        verifier::VerifierRegistry,
        webhook::WebhookDispatcher,
    },
};

/// Process-wide dependencies, created once at startup and shared by handlers.
#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    pub agents: AgentContext,
    pub webhooks: WebhookDispatcher,
}

impl AppState {
    pub fn new(
        config: Config,
        completion: Arc<dyn CompletionService>,
        agent_logs: Arc<dyn AgentLogStore>,
    ) -> Self {
        let webhooks = WebhookDispatcher::new(
            PayloadStore::new(config.data_dir.clone(), config.payload_file_naming),
            EventLogger::new(config.log_dir.clone()),
            VerifierRegistry::from_config(&config),
        );
        Self {
            agents: AgentContext::new(completion, agent_logs),
            webhooks,
            config,
        }
    }

    /// Wires the production clients: OpenAI-compatible completions and the
    /// Postgres `agent_logs` store when `DATABASE_URL` is set. Migration
    /// failures are logged and do not abort startup.
    pub async fn from_config(config: Config) -> anyhow::Result<Self> {
        let completion: Arc<dyn CompletionService> =
            Arc::new(OpenAiCompletionService::from_config(&config)?);

        let agent_logs: Arc<dyn AgentLogStore> = match config.database_url.as_deref() {
            Some(url) => {
                let pool = create_pool(url)?;
                if let Err(err) = run_migrations(&pool).await {
                    tracing::error!(error = %err, "agent_logs migrations failed; inserts may fail");
                }
                Arc::new(PgAgentLogStore::new(pool))
            }
            None => {
                tracing::warn!("DATABASE_URL not set; agent activity will not be persisted");
                Arc::new(DisabledAgentLogStore)
            }
        };

        Ok(Self::new(config, completion, agent_logs))
    }
}

use sqlx::{types::Json, PgPool};
use uuid::Uuid;

use crate::models::agent_log::{AgentLog, AgentLogEntry};

pub async fn insert_agent_log(pool: &PgPool, entry: &AgentLogEntry) -> Result<Uuid, sqlx::Error> {
    let id = Uuid::new_v4();
    sqlx::query(
        "INSERT INTO agent_logs (id, agent_type, input_payload, output, created_at) \
         VALUES ($1, $2, $3, $4, $5)",
    )
    .bind(id)
    .bind(entry.agent_type.as_str())
    .bind(Json(entry.input_payload.clone()))
    .bind(Json(entry.output.clone()))
    .bind(entry.created_at)
    .execute(pool)
    .await?;
    Ok(id)
}

pub async fn fetch_agent_log(pool: &PgPool, id: Uuid) -> Result<Option<AgentLog>, sqlx::Error> {
    sqlx::query_as::<_, AgentLog>(
        "SELECT id, agent_type, input_payload, output, created_at FROM agent_logs WHERE id = $1",
    )
    .bind(id)
    .fetch_optional(pool)
    .await
}

use axum::{
    body::Bytes,
    extract::{Path, State},
    http::HeaderMap,
    Json,
};

use crate::{error::AppError, services::webhook::WebhookOutcome, state::AppState};

/// `POST /webhooks/{source}`. Dispatch does blocking file IO, so it runs on
/// the blocking pool.
pub async fn receive_webhook(
    State(state): State<AppState>,
    Path(source): Path<String>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Json<WebhookOutcome>, AppError> {
    let dispatcher = state.webhooks.clone();
    let task_source = source.clone();
    let joined =
        tokio::task::spawn_blocking(move || dispatcher.dispatch(&task_source, &headers, &body)).await;

    match joined {
        Ok(outcome) => Ok(Json(outcome?)),
        Err(err) => {
            if let Err(log_err) = state.webhooks.event_logger().log(&source, 500) {
                tracing::error!(source, error = %log_err, "failed to append webhook log row");
            }
            Err(AppError::InternalServerError(anyhow::anyhow!(
                "webhook task failed: {err}"
            )))
        }
    }
}

use axum::{extract::rejection::JsonRejection, extract::State, Json};
use validator::Validate;

use crate::{
    agents::{insight, lead_intelligence, ltv},
    error::AppError,
    models::lead::{
        InsightRequest, InsightResponse, LeadAnalysisRequest, LeadAnalysisResponse, LtvRequest,
        LtvResponse,
    },
    state::AppState,
};

// Malformed bodies are the only error path; upstream failures answer 200 with
// a fallback body.

pub async fn generate_insight(
    State(state): State<AppState>,
    payload: Result<Json<InsightRequest>, JsonRejection>,
) -> Result<Json<InsightResponse>, AppError> {
    let Json(payload) = payload?;
    payload.validate()?;
    Ok(Json(insight::generate_insight(&state.agents, payload).await))
}

pub async fn analyze_lead(
    State(state): State<AppState>,
    payload: Result<Json<LeadAnalysisRequest>, JsonRejection>,
) -> Result<Json<LeadAnalysisResponse>, AppError> {
    let Json(payload) = payload?;
    payload.validate()?;
    Ok(Json(lead_intelligence::analyze_lead(&state.agents, payload).await))
}

pub async fn estimate_ltv(
    State(state): State<AppState>,
    payload: Result<Json<LtvRequest>, JsonRejection>,
) -> Result<Json<LtvResponse>, AppError> {
    let Json(payload) = payload?;
    payload.validate()?;
    Ok(Json(ltv::estimate_ltv(&state.agents, payload).await))
}

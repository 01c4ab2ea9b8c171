#![allow(dead_code)] // OpenAPI doc stubs are only referenced by utoipa macros.

use crate::{
    error::ErrorResponse,
    handlers::health::{BannerResponse, HealthResponse},
    models::{
        lead::{
            AnswerSource, InsightRequest, InsightResponse, LeadAnalysisRequest,
            LeadAnalysisResponse, LeadEnrichment, LtvRequest, LtvResponse,
        },
        webhook::WebhookReceipt,
    },
};
use utoipa::OpenApi;

#[derive(OpenApi)]
#[openapi(
    info(title = "Lead Commander Backend"),
    paths(
        banner_doc,
        health_doc,
        generate_insight_doc,
        analyze_lead_doc,
        estimate_ltv_doc,
        receive_webhook_doc
    ),
    components(schemas(
        AnswerSource,
        InsightRequest,
        InsightResponse,
        LeadAnalysisRequest,
        LeadAnalysisResponse,
        LeadEnrichment,
        LtvRequest,
        LtvResponse,
        WebhookReceipt,
        HealthResponse,
        BannerResponse,
        ErrorResponse
    )),
    tags(
        (name = "Agents", description = "Insight, lead intelligence and LTV agents"),
        (name = "Webhooks", description = "Inbound third-party webhooks"),
        (name = "System", description = "Liveness")
    )
)]
pub struct ApiDoc;

#[utoipa::path(
    get,
    path = "/",
    responses((status = 200, body = BannerResponse)),
    tag = "System"
)]
fn banner_doc() {}

#[utoipa::path(
    get,
    path = "/health",
    responses((status = 200, body = HealthResponse)),
    tag = "System"
)]
fn health_doc() {}

#[utoipa::path(
    post,
    path = "/insights/generate",
    request_body = InsightRequest,
    responses(
        (status = 200, description = "Generated or fallback insight", body = InsightResponse),
        (status = 400, description = "Malformed request", body = ErrorResponse)
    ),
    tag = "Agents"
)]
fn generate_insight_doc() {}

#[utoipa::path(
    post,
    path = "/leads/analyze",
    request_body = LeadAnalysisRequest,
    responses(
        (status = 200, description = "Scored lead with assessment", body = LeadAnalysisResponse),
        (status = 400, description = "Malformed request", body = ErrorResponse)
    ),
    tag = "Agents"
)]
fn analyze_lead_doc() {}

#[utoipa::path(
    post,
    path = "/leads/ltv",
    request_body = LtvRequest,
    responses(
        (status = 200, description = "Lifetime value estimate", body = LtvResponse),
        (status = 400, description = "Malformed request", body = ErrorResponse)
    ),
    tag = "Agents"
)]
fn estimate_ltv_doc() {}

#[utoipa::path(
    post,
    path = "/webhooks/{source}",
    params(("source" = String, Path, description = "Sending platform, e.g. stripe")),
    request_body = serde_json::Value,
    responses(
        (status = 200, description = "Payload stored, or `{\"challenge\": ...}` echoed", body = WebhookReceipt),
        (status = 400, description = "Invalid source or signature", body = ErrorResponse),
        (status = 500, description = "Unparseable body or storage failure", body = ErrorResponse)
    ),
    tag = "Webhooks"
)]
fn receive_webhook_doc() {}

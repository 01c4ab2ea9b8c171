use crate::{
    agents::AgentContext,
    models::{
        agent_log::AgentType,
        lead::{InsightRequest, InsightResponse},
    },
    services::completion::CompletionPrompt,
};

pub const FALLBACK_INSIGHT: &str =
    "Insight generation is temporarily unavailable. Review the submitted data manually and try again later.";

const SYSTEM_PROMPT: &str = "You are a business analyst. Generate actionable insights from \
user-provided business data or statements.";

pub fn build_prompt(request: &InsightRequest) -> CompletionPrompt {
    CompletionPrompt::new(
        SYSTEM_PROMPT,
        format!(
            "Analyze the following and answer with three to five concise, actionable insights.\n\n{}",
            request.input.trim()
        ),
    )
}

pub async fn generate_insight(ctx: &AgentContext, request: InsightRequest) -> InsightResponse {
    let (insight, source) = ctx.answer(&build_prompt(&request), FALLBACK_INSIGHT).await;

    let response = InsightResponse {
        input: request.input.clone(),
        insight,
        source,
    };
    ctx.audit(AgentType::Insight, &request, &response).await;
    response
}

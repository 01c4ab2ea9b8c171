use crate::{
    agents::AgentContext,
    models::{
        agent_log::AgentType,
        lead::{LtvRequest, LtvResponse},
    },
    services::completion::CompletionPrompt,
};

pub const FALLBACK_LTV: &str =
    "LTV estimate is unavailable right now. Multiply the deal amount by expected repeat purchases for a rough figure.";

const SYSTEM_PROMPT: &str = "You are a revenue analyst estimating customer lifetime value for a B2B sales team.";

pub fn build_prompt(request: &LtvRequest) -> CompletionPrompt {
    CompletionPrompt::new(
        SYSTEM_PROMPT,
        format!(
            "Estimate the customer lifetime value.\n\
             - Deal amount: {:.2}\n\
             - Repeat purchases: {}\n\
             - Contract length: {} months\n\n\
             Answer with a single estimated figure followed by one sentence of reasoning.",
            request.deal_amount_value(), request.repeat_purchases, request.contract_length_months
        ),
    )
}

pub async fn estimate_ltv(ctx: &AgentContext, request: LtvRequest) -> LtvResponse {
    let (ltv_estimate, source) = ctx.answer(&build_prompt(&request), FALLBACK_LTV).await;

    let response = LtvResponse {
        deal: request.clone(),
        ltv_estimate,
        source,
    };
    ctx.audit(AgentType::Ltv, &request, &response).await;
    response
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        models::lead::AnswerSource,
        services::{
            agent_log::MockAgentLogStore,
            completion::{CompletionError, MockCompletionService},
        },
    };
    use std::sync::Arc;
    use uuid::Uuid;

    fn request() -> LtvRequest {
        LtvRequest {
            deal_amount: serde_json::Number::from(4500),
            repeat_purchases: 3,
            contract_length_months: 12,
        }
    }

    #[test]
    fn prompt_carries_all_deal_fields() {
        let prompt = build_prompt(&request());
        assert!(prompt.user.contains("4500.00"));
        assert!(prompt.user.contains("Repeat purchases: 3"));
        assert!(prompt.user.contains("12 months"));
    }

    #[tokio::test]
    async fn fallback_result_is_logged_with_ltv_type() {
        let mut completion = MockCompletionService::new();
        completion
            .expect_generate()
            .returning(|_| Err(CompletionError::NotConfigured));
        let mut store = MockAgentLogStore::new();
        store
            .expect_insert_log()
            .withf(|entry| {
                entry.agent_type == AgentType::Ltv
                    && entry.input_payload["repeat_purchases"] == 3
                    && entry.output["source"] == "fallback"
            })
            .times(1)
            .returning(|_| Ok(Uuid::new_v4()));

        let ctx = AgentContext::new(Arc::new(completion), Arc::new(store));
        let response = estimate_ltv(&ctx, request()).await;

        assert_eq!(response.ltv_estimate, FALLBACK_LTV);
        assert_eq!(response.source, AnswerSource::Fallback);
        assert_eq!(response.deal.contract_length_months, 12);
    }
}

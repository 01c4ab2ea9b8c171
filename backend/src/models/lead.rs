use serde::{Deserialize, Serialize};
use serde_json::Number;
use utoipa::ToSchema;
use validator::{Validate, ValidationError};

/// Where an agent's answer came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum AnswerSource {
    Gpt,
    Fallback,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, Validate)]
pub struct InsightRequest {
    #[validate(length(min = 1, max = 8000))]
    pub input: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct InsightResponse {
    pub input: String,
    pub insight: String,
    pub source: AnswerSource,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, Validate)]
pub struct LeadAnalysisRequest {
    #[validate(length(min = 1, max = 200))]
    pub name: String,
    #[validate(length(max = 200))]
    pub title: String,
    #[validate(length(max = 200))]
    pub company: String,
    #[validate(length(max = 2000))]
    pub intent: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[validate(length(max = 320))]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[validate(range(min = 0))]
    pub company_size: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[validate(length(max = 50))]
    pub phone: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct LeadEnrichment {
    pub industry: String,
    pub employee_size: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct LeadAnalysisResponse {
    #[serde(flatten)]
    pub lead: LeadAnalysisRequest,
    /// Local heuristic score in 0..=100.
    pub score: u8,
    pub enriched: LeadEnrichment,
    pub assessment: String,
    pub source: AnswerSource,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, Validate)]
pub struct LtvRequest {
    /// Kept as the caller's JSON number so the echo matches the input exactly.
    #[schema(value_type = f64)]
    #[validate(custom(function = "validate_non_negative"))]
    pub deal_amount: Number,
    pub repeat_purchases: u32,
    pub contract_length_months: u32,
}

impl LtvRequest {
    pub fn deal_amount_value(&self) -> f64 {
        self.deal_amount.as_f64().unwrap_or_default()
    }
}

fn validate_non_negative(amount: &Number) -> Result<(), ValidationError> {
    match amount.as_f64() {
        Some(value) if value >= 0.0 => Ok(()),
        _ => Err(ValidationError::new("amount_negative")),
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct LtvResponse {
    #[serde(flatten)]
    pub deal: LtvRequest,
    pub ltv_estimate: String,
    pub source: AnswerSource,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn insight_request_rejects_empty_input() {
        let payload = InsightRequest {
            input: String::new(),
        };
        assert!(payload.validate().is_err());
    }

    #[test]
    fn ltv_request_rejects_negative_amount() {
        let payload = LtvRequest {
            deal_amount: Number::from(-1),
            repeat_purchases: 0,
            contract_length_months: 12,
        };
        assert!(payload.validate().is_err());
    }

    #[test]
    fn ltv_response_flattens_echoed_fields() {
        let response = LtvResponse {
            deal: LtvRequest {
                deal_amount: Number::from(4500),
                repeat_purchases: 3,
                contract_length_months: 12,
            },
            ltv_estimate: "about 18000".into(),
            source: AnswerSource::Fallback,
        };
        let value = serde_json::to_value(&response).unwrap();
        assert_eq!(value["deal_amount"], json!(4500));
        assert_eq!(value["repeat_purchases"], json!(3));
        assert_eq!(value["contract_length_months"], json!(12));
        assert_eq!(value["source"], json!("fallback"));
    }

    #[test]
    fn ltv_request_echoes_integer_and_fractional_amounts_as_sent() {
        for raw in [json!(4500), json!(4500.5), json!(0)] {
            let request: LtvRequest = serde_json::from_value(json!({
                "deal_amount": raw.clone(),
                "repeat_purchases": 3,
                "contract_length_months": 12
            }))
            .unwrap();
            assert!(request.validate().is_ok());
            assert_eq!(serde_json::to_value(&request).unwrap()["deal_amount"], raw);
        }
    }

    #[test]
    fn lead_request_optional_fields_default_to_none() {
        let lead: LeadAnalysisRequest = serde_json::from_value(json!({
            "name": "Carol Lee",
            "title": "CTO",
            "company": "Gamma Health",
            "intent": "pricing page visit"
        }))
        .unwrap();
        assert!(lead.email.is_none());
        assert!(lead.company_size.is_none());
        assert!(lead.phone.is_none());
        assert!(lead.validate().is_ok());
    }
}

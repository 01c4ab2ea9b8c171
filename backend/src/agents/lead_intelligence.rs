//! Lead Intelligence agent: local scoring and enrichment plus a generated
//! assessment of the lead's opportunity potential.

use crate::{
    agents::AgentContext,
    models::{
        agent_log::AgentType,
        lead::{LeadAnalysisRequest, LeadAnalysisResponse, LeadEnrichment},
    },
    services::completion::CompletionPrompt,
};

pub const FALLBACK_ASSESSMENT: &str =
    "Automated assessment is unavailable right now. Prioritize this lead using its score and follow up manually.";

const SYSTEM_PROMPT: &str = "You are a B2B sales intelligence assistant. Assess how promising \
a lead is and recommend the next sales action.";

const WEIGHT_COMPANY_SIZE: u32 = 40;
const WEIGHT_TITLE: u32 = 30;
const WEIGHT_EMAIL: u32 = 20;
const WEIGHT_PHONE: u32 = 10;

const FREE_EMAIL_DOMAINS: [&str; 4] = ["gmail.com", "yahoo.com", "hotmail.com", "outlook.com"];
const EXECUTIVE_ABBREVIATIONS: [&str; 5] = ["ceo", "cfo", "coo", "cto", "cmo"];

// Factors are percentages so the sum stays in integer arithmetic.

fn company_size_factor(size: Option<i64>) -> u32 {
    match size.unwrap_or(0) {
        s if s >= 1000 => 100,
        s if s >= 250 => 70,
        s if s >= 50 => 40,
        s if s > 0 => 10,
        _ => 0,
    }
}

/// Abbreviations match whole words only, so "Director" does not count as "cto".
fn title_factor(title: &str) -> u32 {
    let title = title.trim().to_lowercase();
    if title.is_empty() {
        return 0;
    }
    let words: Vec<&str> = title
        .split(|c: char| !c.is_ascii_alphanumeric())
        .filter(|w| !w.is_empty())
        .collect();
    let has_word = |needle: &str| words.iter().any(|w| *w == needle);

    if title.contains("chief") || EXECUTIVE_ABBREVIATIONS.iter().any(|abbr| has_word(*abbr)) {
        100
    } else if has_word("vp") || title.contains("vice president") || title.contains("director") {
        70
    } else if title.contains("manager") {
        40
    } else {
        10
    }
}

fn email_domain(email: Option<&str>) -> Option<String> {
    email
        .and_then(|e| e.trim().rsplit_once('@'))
        .map(|(_, domain)| domain.to_lowercase())
}

fn email_factor(email: Option<&str>) -> u32 {
    match email_domain(email) {
        None => 0,
        Some(domain) if FREE_EMAIL_DOMAINS.contains(&domain.as_str()) => 30,
        Some(_) => 100,
    }
}

fn phone_factor(phone: Option<&str>) -> u32 {
    match phone.map(str::trim) {
        Some(p) if !p.is_empty() => 100,
        _ => 0,
    }
}

/// Deterministic 0..=100 score from the optional contact and firmographic fields.
pub fn score_lead(lead: &LeadAnalysisRequest) -> u8 {
    let weighted = WEIGHT_COMPANY_SIZE * company_size_factor(lead.company_size)
        + WEIGHT_TITLE * title_factor(&lead.title)
        + WEIGHT_EMAIL * email_factor(lead.email.as_deref())
        + WEIGHT_PHONE * phone_factor(lead.phone.as_deref());
    (weighted / 100).min(100) as u8
}

pub fn enrich_lead(lead: &LeadAnalysisRequest) -> LeadEnrichment {
    let industry = match email_domain(lead.email.as_deref()) {
        Some(d) if d.contains("finance") => "Finance",
        Some(d) if d.contains("tech") || d.contains("software") => "Technology",
        Some(d) if d.contains("health") => "Healthcare",
        _ => "General",
    };
    let employee_size = match lead.company_size.unwrap_or(0) {
        s if s >= 1000 => "Enterprise",
        s if s >= 250 => "Mid-Market",
        s if s >= 50 => "SMB",
        _ => "Small Business",
    };
    LeadEnrichment {
        industry: industry.to_string(),
        employee_size: employee_size.to_string(),
    }
}

pub fn build_prompt(lead: &LeadAnalysisRequest, score: u8, enriched: &LeadEnrichment) -> CompletionPrompt {
    CompletionPrompt::new(
        SYSTEM_PROMPT,
        format!(
            "Lead:\n\
             - Name: {}\n\
             - Title: {}\n\
             - Company: {}\n\
             - Intent: {}\n\
             - Industry: {}\n\
             - Company size: {}\n\
             - Heuristic score: {}/100\n\n\
             In three to five sentences, assess this lead's opportunity potential \
             and suggest the next step.",
            lead.name, lead.title, lead.company, lead.intent, enriched.industry, enriched.employee_size, score
        ),
    )
}

pub async fn analyze_lead(ctx: &AgentContext, lead: LeadAnalysisRequest) -> LeadAnalysisResponse {
    let score = score_lead(&lead);
    let enriched = enrich_lead(&lead);
    tracing::debug!(score, industry = %enriched.industry, "scored lead");

    let (assessment, source) = ctx
        .answer(&build_prompt(&lead, score, &enriched), FALLBACK_ASSESSMENT)
        .await;

    let response = LeadAnalysisResponse {
        lead: lead.clone(),
        score,
        enriched,
        assessment,
        source,
    };
    ctx.audit(AgentType::LeadScore, &lead, &response).await;
    response
}

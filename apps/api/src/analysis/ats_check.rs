//! ATS (applicant tracking system) compatibility check.

use serde::Deserialize;
use tracing::{info, warn};

use crate::ai_parser::parse_ats_check;
use crate::analysis::load_resume_text;
use crate::analysis::prompts::ats_check_prompt;
use crate::errors::AppError;
use crate::llm_client::prompts::JSON_ONLY_SYSTEM;
use crate::models::resume::{AtsCheckRow, NewAtsCheck};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct AtsCheckRequest {
    pub resume_id: i64,
}

pub async fn check_ats(
    state: &AppState,
    user_id: i64,
    request: AtsCheckRequest,
) -> Result<AtsCheckRow, AppError> {
    let (resume, resume_text) = load_resume_text(state, user_id, request.resume_id).await?;

    let completion = state
        .llm
        .complete(&ats_check_prompt(&resume_text), JSON_ONLY_SYSTEM)
        .await?;
    let parsed = parse_ats_check(&completion, state.config.ats_friendly_policy)?;
    if !parsed.parsed_fully() {
        warn!(
            "ATS check for résumé {} degraded: {}",
            resume.id,
            parsed.describe_degradations()
        );
    }
    let parsed_fully = parsed.parsed_fully();
    let result = parsed.value;

    let row = state
        .store
        .insert_ats_check(NewAtsCheck {
            user_id,
            resume_id: resume.id,
            ats_score: result.ats_score,
            issues_found: result.issues_found,
            recommendations: result.recommendations,
            is_ats_friendly: result.is_ats_friendly,
            parsed_fully,
        })
        .await?;

    info!(
        "Stored ATS check {} for user {user_id} (score {})",
        row.id, row.ats_score
    );
    Ok(row)
}

//! Cover letter generation from a stored résumé and a target job.

use serde::Deserialize;
use tracing::info;

use crate::analysis::load_resume_text;
use crate::analysis::prompts::cover_letter_prompt;
use crate::errors::AppError;
use crate::llm_client::prompts::CAREER_COACH_SYSTEM;
use crate::models::resume::{CoverLetterRow, NewCoverLetter};
use crate::state::AppState;
use crate::validation::require_non_blank;

#[derive(Debug, Deserialize)]
pub struct CoverLetterRequest {
    pub resume_id: i64,
    pub job_title: String,
    pub company_name: String,
    pub job_description: String,
}

pub async fn generate_cover_letter(
    state: &AppState,
    user_id: i64,
    request: CoverLetterRequest,
) -> Result<CoverLetterRow, AppError> {
    let job_title = require_non_blank("job_title", &request.job_title)?;
    let company_name = require_non_blank("company_name", &request.company_name)?;
    let job_description = require_non_blank("job_description", &request.job_description)?;

    let (resume, resume_text) = load_resume_text(state, user_id, request.resume_id).await?;

    let prompt = cover_letter_prompt(&job_title, &company_name, &job_description, &resume_text);
    let completion = state.llm.complete(&prompt, CAREER_COACH_SYSTEM).await?;
    let cover_letter_text = completion.trim().to_string();
    if cover_letter_text.is_empty() {
        return Err(AppError::MalformedAiResponse(
            "cover letter completion was blank".to_string(),
        ));
    }

    let row = state
        .store
        .insert_cover_letter(NewCoverLetter {
            user_id,
            resume_id: resume.id,
            job_title,
            company_name,
            cover_letter_text,
        })
        .await?;

    info!("Stored cover letter {} for user {user_id}", row.id);
    Ok(row)
}

//! Axum route handlers for résumés, cover letters, job matches and ATS checks.

use axum::{
    extract::{multipart::MultipartRejection, Multipart, State},
    http::StatusCode,
    Json,
};

use crate::analysis::ats_check::{check_ats, AtsCheckRequest};
use crate::analysis::cover_letter::{generate_cover_letter, CoverLetterRequest};
use crate::analysis::job_match::{analyze_job_match, JobMatchRequest};
use crate::analysis::resume::{delete_resume, get_resume, upload_resume};
use crate::errors::AppError;
use crate::models::resume::{AtsCheckRow, CoverLetterRow, JobMatchRow, ResumeAnalysisRow};
use crate::state::AppState;
use crate::validation::{AppJson, AppPath, AppQuery, UserScope};

/// Multipart field carrying the résumé file.
const FILE_FIELD: &str = "file";

// ────────────────────────────────────────────────────────────────────────────
// Résumés
// ────────────────────────────────────────────────────────────────────────────

/// POST /api/resume/upload?user_id=
///
/// Accepts a `.pdf` or `.docx` in the `file` field, analyzes it and returns the
/// stored analysis.
pub async fn handle_upload_resume(
    State(state): State<AppState>,
    AppQuery(scope): AppQuery<UserScope>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<(StatusCode, Json<ResumeAnalysisRow>), AppError> {
    let mut multipart = multipart?;

    while let Some(field) = multipart.next_field().await? {
        if field.name() != Some(FILE_FIELD) {
            continue;
        }
        let filename = field
            .file_name()
            .map(str::to_string)
            .ok_or_else(|| AppError::InvalidInput("Uploaded file has no filename".to_string()))?;
        let bytes = field.bytes().await?;

        let row = upload_resume(&state, scope.user_id, &filename, bytes).await?;
        return Ok((StatusCode::CREATED, Json(row)));
    }

    Err(AppError::InvalidInput(format!(
        "Multipart field '{FILE_FIELD}' is required"
    )))
}

/// GET /api/resume/user/:user_id
pub async fn handle_list_resumes(
    State(state): State<AppState>,
    AppPath(user_id): AppPath<i64>,
) -> Result<Json<Vec<ResumeAnalysisRow>>, AppError> {
    Ok(Json(state.store.list_resumes(user_id).await?))
}

/// GET /api/resume/:id?user_id=
pub async fn handle_get_resume(
    State(state): State<AppState>,
    AppPath(resume_id): AppPath<i64>,
    AppQuery(scope): AppQuery<UserScope>,
) -> Result<Json<ResumeAnalysisRow>, AppError> {
    Ok(Json(get_resume(&state, scope.user_id, resume_id).await?))
}

/// DELETE /api/resume/:id?user_id=
pub async fn handle_delete_resume(
    State(state): State<AppState>,
    AppPath(resume_id): AppPath<i64>,
    AppQuery(scope): AppQuery<UserScope>,
) -> Result<StatusCode, AppError> {
    delete_resume(&state, scope.user_id, resume_id).await?;
    Ok(StatusCode::NO_CONTENT)
}

// ────────────────────────────────────────────────────────────────────────────
// Cover letters
// ────────────────────────────────────────────────────────────────────────────

/// POST /api/cover-letter/generate?user_id=
pub async fn handle_generate_cover_letter(
    State(state): State<AppState>,
    AppQuery(scope): AppQuery<UserScope>,
    AppJson(request): AppJson<CoverLetterRequest>,
) -> Result<(StatusCode, Json<CoverLetterRow>), AppError> {
    let row = generate_cover_letter(&state, scope.user_id, request).await?;
    Ok((StatusCode::CREATED, Json(row)))
}

/// GET /api/cover-letter/user/:user_id
pub async fn handle_list_cover_letters(
    State(state): State<AppState>,
    AppPath(user_id): AppPath<i64>,
) -> Result<Json<Vec<CoverLetterRow>>, AppError> {
    Ok(Json(state.store.list_cover_letters(user_id).await?))
}

// ────────────────────────────────────────────────────────────────────────────
// Job matches
// ────────────────────────────────────────────────────────────────────────────

/// POST /api/job-match/analyze?user_id=
pub async fn handle_analyze_job_match(
    State(state): State<AppState>,
    AppQuery(scope): AppQuery<UserScope>,
    AppJson(request): AppJson<JobMatchRequest>,
) -> Result<(StatusCode, Json<JobMatchRow>), AppError> {
    let row = analyze_job_match(&state, scope.user_id, request).await?;
    Ok((StatusCode::CREATED, Json(row)))
}

/// GET /api/job-match/user/:user_id
pub async fn handle_list_job_matches(
    State(state): State<AppState>,
    AppPath(user_id): AppPath<i64>,
) -> Result<Json<Vec<JobMatchRow>>, AppError> {
    Ok(Json(state.store.list_job_matches(user_id).await?))
}

// ────────────────────────────────────────────────────────────────────────────
// ATS checks
// ────────────────────────────────────────────────────────────────────────────

/// POST /api/ats-check/check?user_id=
pub async fn handle_check_ats(
    State(state): State<AppState>,
    AppQuery(scope): AppQuery<UserScope>,
    AppJson(request): AppJson<AtsCheckRequest>,
) -> Result<(StatusCode, Json<AtsCheckRow>), AppError> {
    let row = check_ats(&state, scope.user_id, request).await?;
    Ok((StatusCode::CREATED, Json(row)))
}

/// GET /api/ats-check/user/:user_id
pub async fn handle_list_ats_checks(
    State(state): State<AppState>,
    AppPath(user_id): AppPath<i64>,
) -> Result<Json<Vec<AtsCheckRow>>, AppError> {
    Ok(Json(state.store.list_ats_checks(user_id).await?))
}

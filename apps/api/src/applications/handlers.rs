//! Axum route handlers for the job application tracker.

use axum::{extract::State, http::StatusCode, Json};
use chrono::{NaiveDate, Utc};
use serde::Deserialize;
use tracing::info;

use crate::applications::analytics::{compute_analytics, ApplicationAnalytics};
use crate::applications::patch::ApplicationPatch;
use crate::applications::status::ApplicationStatus;
use crate::errors::AppError;
use crate::models::application::{JobApplicationRow, NewApplication};
use crate::state::AppState;
use crate::validation::{normalize_optional, require_non_blank, AppJson, AppPath, AppQuery, UserScope};

// ────────────────────────────────────────────────────────────────────────────
// Request types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct CreateApplicationRequest {
    pub company_name: String,
    pub job_title: String,
    pub job_url: Option<String>,
    /// Defaults to `Applied`.
    pub status: Option<String>,
    pub location: Option<String>,
    pub salary_range: Option<String>,
    /// Defaults to today (UTC).
    pub application_date: Option<NaiveDate>,
    pub notes: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct StatusUpdateQuery {
    pub user_id: i64,
    pub status_value: String,
}

fn not_found() -> AppError {
    AppError::NotFound("Application not found".to_string())
}

// ────────────────────────────────────────────────────────────────────────────
// Handlers
// ────────────────────────────────────────────────────────────────────────────

/// POST /api/applications?user_id=
pub async fn handle_create_application(
    State(state): State<AppState>,
    AppQuery(scope): AppQuery<UserScope>,
    AppJson(request): AppJson<CreateApplicationRequest>,
) -> Result<(StatusCode, Json<JobApplicationRow>), AppError> {
    let status = match request.status.as_deref() {
        Some(s) => s.parse::<ApplicationStatus>()?,
        None => ApplicationStatus::Applied,
    };

    let row = state
        .store
        .insert_application(NewApplication {
            user_id: scope.user_id,
            company_name: require_non_blank("company_name", &request.company_name)?,
            job_title: require_non_blank("job_title", &request.job_title)?,
            job_url: normalize_optional(request.job_url),
            status: status.as_str().to_string(),
            location: normalize_optional(request.location),
            salary_range: normalize_optional(request.salary_range),
            application_date: request
                .application_date
                .unwrap_or_else(|| Utc::now().date_naive()),
            notes: normalize_optional(request.notes),
        })
        .await?;

    info!("Created application {} for user {}", row.id, row.user_id);
    Ok((StatusCode::CREATED, Json(row)))
}

/// GET /api/applications/user/:user_id
///
/// Newest first.
pub async fn handle_list_applications(
    State(state): State<AppState>,
    AppPath(user_id): AppPath<i64>,
) -> Result<Json<Vec<JobApplicationRow>>, AppError> {
    Ok(Json(state.store.list_applications(user_id).await?))
}

/// GET /api/applications/:id?user_id=
pub async fn handle_get_application(
    State(state): State<AppState>,
    AppPath(application_id): AppPath<i64>,
    AppQuery(scope): AppQuery<UserScope>,
) -> Result<Json<JobApplicationRow>, AppError> {
    state
        .store
        .get_application(scope.user_id, application_id)
        .await?
        .map(Json)
        .ok_or_else(not_found)
}

/// PUT /api/applications/:id?user_id=
///
/// Partial update: only keys present in the body change. `null` clears a
/// nullable field.
pub async fn handle_update_application(
    State(state): State<AppState>,
    AppPath(application_id): AppPath<i64>,
    AppQuery(scope): AppQuery<UserScope>,
    AppJson(patch): AppJson<ApplicationPatch>,
) -> Result<Json<JobApplicationRow>, AppError> {
    let patch = patch.validated()?;
    let row = state
        .store
        .update_application(scope.user_id, application_id, &patch)
        .await?
        .ok_or_else(not_found)?;

    info!("Updated application {application_id}");
    Ok(Json(row))
}

/// PATCH /api/applications/:id/status?user_id=&status_value=
pub async fn handle_update_status(
    State(state): State<AppState>,
    AppPath(application_id): AppPath<i64>,
    AppQuery(query): AppQuery<StatusUpdateQuery>,
) -> Result<Json<JobApplicationRow>, AppError> {
    let status = query.status_value.parse::<ApplicationStatus>()?;
    let row = state
        .store
        .update_application(
            query.user_id,
            application_id,
            &ApplicationPatch::status_only(status),
        )
        .await?
        .ok_or_else(not_found)?;

    info!("Application {application_id} moved to {status}");
    Ok(Json(row))
}

/// DELETE /api/applications/:id?user_id=
pub async fn handle_delete_application(
    State(state): State<AppState>,
    AppPath(application_id): AppPath<i64>,
    AppQuery(scope): AppQuery<UserScope>,
) -> Result<StatusCode, AppError> {
    if !state
        .store
        .delete_application(scope.user_id, application_id)
        .await?
    {
        return Err(not_found());
    }
    info!("Deleted application {application_id}");
    Ok(StatusCode::NO_CONTENT)
}

/// GET /api/applications/analytics/:user_id
pub async fn handle_analytics(
    State(state): State<AppState>,
    AppPath(user_id): AppPath<i64>,
) -> Result<Json<ApplicationAnalytics>, AppError> {
    let applications = state.store.list_applications(user_id).await?;
    Ok(Json(compute_analytics(&applications)))
}

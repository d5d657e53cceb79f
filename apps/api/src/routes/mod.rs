pub mod health;

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, patch, post},
    Router,
};

use crate::analysis::handlers as analysis;
use crate::applications::handlers as applications;
use crate::auth::handlers as auth;
use crate::state::AppState;

/// Largest accepted résumé upload.
pub const MAX_UPLOAD_BYTES: usize = 10 * 1024 * 1024;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        // Auth
        .route("/api/auth/register", post(auth::handle_register))
        .route("/api/auth/login", post(auth::handle_login))
        .route("/api/auth/user", get(auth::handle_get_user))
        // Résumés
        .route(
            "/api/resume/upload",
            post(analysis::handle_upload_resume).layer(DefaultBodyLimit::max(MAX_UPLOAD_BYTES)),
        )
        .route("/api/resume/user/:user_id", get(analysis::handle_list_resumes))
        .route(
            "/api/resume/:id",
            get(analysis::handle_get_resume).delete(analysis::handle_delete_resume),
        )
        // AI-backed operations on a stored résumé
        .route(
            "/api/cover-letter/generate",
            post(analysis::handle_generate_cover_letter),
        )
        .route(
            "/api/cover-letter/user/:user_id",
            get(analysis::handle_list_cover_letters),
        )
        .route("/api/job-match/analyze", post(analysis::handle_analyze_job_match))
        .route(
            "/api/job-match/user/:user_id",
            get(analysis::handle_list_job_matches),
        )
        .route("/api/ats-check/check", post(analysis::handle_check_ats))
        .route(
            "/api/ats-check/user/:user_id",
            get(analysis::handle_list_ats_checks),
        )
        // Application tracker
        .route(
            "/api/applications",
            post(applications::handle_create_application),
        )
        .route(
            "/api/applications/user/:user_id",
            get(applications::handle_list_applications),
        )
        .route(
            "/api/applications/analytics/:user_id",
            get(applications::handle_analytics),
        )
        .route(
            "/api/applications/:id",
            get(applications::handle_get_application)
                .put(applications::handle_update_application)
                .delete(applications::handle_delete_application),
        )
        .route(
            "/api/applications/:id/status",
            patch(applications::handle_update_status),
        )
        .with_state(state)
}

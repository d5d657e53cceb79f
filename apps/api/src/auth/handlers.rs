//! Axum route handlers for the Auth API.

use axum::{extract::State, http::StatusCode, Json};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::auth::password::{hash_password, verify_password, MIN_PASSWORD_LEN};
use crate::auth::token::issue_access_token;
use crate::errors::AppError;
use crate::models::user::{NewUser, User};
use crate::state::AppState;
use crate::validation::{require_non_blank, validate_email, AppJson, AppQuery};

#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    pub email: String,
    pub full_name: String,
    pub password: String,
}

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct TokenResponse {
    pub access_token: String,
    pub token_type: &'static str,
    pub user: User,
}

#[derive(Debug, Deserialize)]
pub struct UserLookupQuery {
    pub email: String,
}

/// POST /api/auth/register
pub async fn handle_register(
    State(state): State<AppState>,
    AppJson(request): AppJson<RegisterRequest>,
) -> Result<(StatusCode, Json<User>), AppError> {
    let email = validate_email(&request.email)?;
    let full_name = require_non_blank("full_name", &request.full_name)?;
    if request.password.chars().count() < MIN_PASSWORD_LEN {
        return Err(AppError::InvalidInput(format!(
            "password must be at least {MIN_PASSWORD_LEN} characters"
        )));
    }
    if state.store.find_user_by_email(&email).await?.is_some() {
        return Err(AppError::InvalidInput("Email is already registered".to_string()));
    }

    let password_hash = hash_password(request.password).await?;
    let user = state
        .store
        .create_user(NewUser {
            email,
            full_name,
            password_hash,
        })
        .await?;

    Ok((StatusCode::CREATED, Json(user)))
}

/// POST /api/auth/login
///
/// Unknown or malformed email and wrong password produce the same response.
pub async fn handle_login(
    State(state): State<AppState>,
    AppJson(request): AppJson<LoginRequest>,
) -> Result<Json<TokenResponse>, AppError> {
    let invalid = || AppError::Unauthorized("Incorrect email or password".to_string());

    let email = request.email.trim().to_lowercase();
    let user = state
        .store
        .find_user_by_email(&email)
        .await?
        .ok_or_else(invalid)?;

    if !verify_password(request.password, user.password_hash.clone()).await? {
        warn!("Failed login for user {}", user.id);
        return Err(invalid());
    }
    if !user.is_active {
        return Err(AppError::Unauthorized("Account is disabled".to_string()));
    }

    let access_token = issue_access_token(
        &user,
        &state.config.secret_key,
        state.config.access_token_expire_minutes,
    )?;
    info!("User {} logged in", user.id);

    Ok(Json(TokenResponse {
        access_token,
        token_type: "bearer",
        user,
    }))
}

/// GET /api/auth/user?email=
///
/// Resolves the numeric user id the other endpoints are scoped by.
pub async fn handle_get_user(
    State(state): State<AppState>,
    AppQuery(query): AppQuery<UserLookupQuery>,
) -> Result<Json<User>, AppError> {
    let email = validate_email(&query.email)?;
    state
        .store
        .find_user_by_email(&email)
        .await?
        .map(Json)
        .ok_or_else(|| AppError::NotFound("User not found".to_string()))
}

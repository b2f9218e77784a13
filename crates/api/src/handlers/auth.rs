//! Handlers for the `/auth` resource (signup, login, current profile).

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use serde::{Deserialize, Serialize};
use taskboard_core::authz::Identity;
use taskboard_core::error::CoreError;
use taskboard_core::roles::UserRole;
use taskboard_db::models::profile::{CreateProfile, Profile};
use taskboard_db::repositories::ProfileRepo;
use validator::Validate;

use crate::auth::jwt::issue_access_token;
use crate::auth::password::{check_new_password, hash_password, verify_password};
use crate::error::{AppError, AppResult};
use crate::extract::AppJson;
use crate::state::AppState;

const INVALID_CREDENTIALS: &str = "Invalid email or password";

// ---------------------------------------------------------------------------
// Request / response types
// ---------------------------------------------------------------------------

/// Request body for `POST /auth/signup`.
#[derive(Debug, Deserialize, Validate)]
pub struct SignupRequest {
    #[validate(length(max = 200, message = "Full name must be at most 200 characters"))]
    #[serde(default)]
    pub full_name: String,
    #[validate(email(message = "Invalid email address"))]
    pub email: String,
    pub password: String,
}

/// Request body for `POST /auth/login`.
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Successful authentication response returned by signup and login.
#[derive(Debug, Serialize)]
pub struct AuthResponse {
    pub access_token: String,
    pub token_type: &'static str,
    /// Access token lifetime in seconds.
    pub expires_in: i64,
    pub user: Profile,
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// POST /api/v1/auth/signup
///
/// Register a new `user`-role profile and sign it in.
pub async fn signup(
    State(state): State<AppState>,
    AppJson(input): AppJson<SignupRequest>,
) -> AppResult<(StatusCode, Json<AuthResponse>)> {
    input.validate()?;
    check_new_password(&input.password)?;

    let email = normalize_email(&input.email);
    if ProfileRepo::find_by_email(&state.pool, &email).await?.is_some() {
        return Err(AppError::Core(CoreError::Conflict(
            "Email is already registered".into(),
        )));
    }

    let password_hash = hash_password(&input.password)
        .map_err(|e| AppError::InternalError(format!("Password hashing error: {e}")))?;

    let profile = ProfileRepo::create(
        &state.pool,
        &CreateProfile {
            full_name: input.full_name.trim().to_string(),
            email,
            password_hash,
            role: UserRole::User,
        },
    )
    .await?;

    tracing::info!(user_id = profile.id, "Profile registered");

    Ok((StatusCode::CREATED, Json(auth_response(&state, profile)?)))
}

/// POST /api/v1/auth/login
///
/// Authenticate with email + password.
pub async fn login(
    State(state): State<AppState>,
    AppJson(input): AppJson<LoginRequest>,
) -> AppResult<Json<AuthResponse>> {
    let email = normalize_email(&input.email);

    let credentials = ProfileRepo::find_credentials_by_email(&state.pool, &email)
        .await?
        .ok_or_else(|| AppError::Core(CoreError::Unauthorized(INVALID_CREDENTIALS.into())))?;

    if !credentials.is_active {
        return Err(AppError::Core(CoreError::Forbidden(
            "Account is deactivated".into(),
        )));
    }

    let password_valid = verify_password(&input.password, &credentials.password_hash)
        .map_err(|e| AppError::InternalError(format!("Password verification error: {e}")))?;
    if !password_valid {
        tracing::debug!(user_id = credentials.id, "Rejected login: wrong password");
        return Err(AppError::Core(CoreError::Unauthorized(
            INVALID_CREDENTIALS.into(),
        )));
    }

    let profile = ProfileRepo::find_by_id(&state.pool, credentials.id)
        .await?
        .ok_or_else(|| AppError::Core(CoreError::Unauthorized(INVALID_CREDENTIALS.into())))?;

    tracing::info!(user_id = profile.id, "Login succeeded");

    Ok(Json(auth_response(&state, profile)?))
}

/// GET /api/v1/auth/me
///
/// The caller's own profile.
pub async fn me(State(state): State<AppState>, identity: Identity) -> AppResult<Json<Profile>> {
    let profile = ProfileRepo::find_by_id(&state.pool, identity.user_id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Profile",
            id: identity.user_id,
        }))?;
    Ok(Json(profile))
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

fn auth_response(state: &AppState, user: Profile) -> AppResult<AuthResponse> {
    let access_token = issue_access_token(&user, &state.config.jwt)
        .map_err(|e| AppError::InternalError(format!("Token generation error: {e}")))?;

    Ok(AuthResponse {
        access_token,
        token_type: "Bearer",
        expires_in: state.config.jwt.expires_in_secs(),
        user,
    })
}

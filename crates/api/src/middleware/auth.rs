//! JWT-based identity extractor for Axum handlers.

use axum::extract::FromRequestParts;
use axum::http::header::AUTHORIZATION;
use axum::http::request::Parts;
use taskboard_core::authz::Identity;
use taskboard_core::error::CoreError;
use taskboard_db::repositories::ProfileRepo;

use crate::auth::jwt::decode_access_token;
use crate::error::AppError;
use crate::state::AppState;

/// Resolves the caller of a request.
///
/// The token only proves who the caller is. Role and active flag come from
/// the profile row at request time, so a demotion or deactivation takes
/// effect on the caller's next request.
///
/// ```ignore
/// async fn my_handler(identity: Identity) -> AppResult<Json<()>> {
///     tracing::info!(user_id = identity.user_id, "handling request");
///     Ok(Json(()))
/// }
/// ```
impl FromRequestParts<AppState> for Identity {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let auth_header = parts
            .headers
            .get(AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
            .ok_or_else(|| unauthorized("Missing Authorization header"))?;

        let token = auth_header
            .strip_prefix("Bearer ")
            .ok_or_else(|| unauthorized("Invalid Authorization format. Expected: Bearer <token>"))?;

        let claims = decode_access_token(token, &state.config.jwt)
            .map_err(|_| unauthorized("Invalid or expired token"))?;

        let profile = ProfileRepo::find_by_id(&state.pool, claims.sub)
            .await?
            .ok_or_else(|| unauthorized("Account no longer exists"))?;

        if !profile.is_active {
            return Err(AppError::Core(CoreError::Forbidden(
                "Account is deactivated".into(),
            )));
        }

        Ok(Identity {
            user_id: profile.id,
            role: profile.role,
            is_active: profile.is_active,
        })
    }
}

fn unauthorized(message: &str) -> AppError {
    AppError::Core(CoreError::Unauthorized(message.into()))
}

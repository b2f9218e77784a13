//! Handlers for `/admin/users` (account directory management).
//!
//! Admin only. The only editable fields are `role` and `is_active`;
//! anything else in the request body is ignored.

use axum::extract::{Path, State};
use axum::Json;
use taskboard_core::authz::{Action, Identity, Resource};
use taskboard_core::error::CoreError;
use taskboard_core::types::DbId;
use taskboard_db::models::profile::{Profile, UpdateProfileAccess};
use taskboard_db::repositories::ProfileRepo;

use crate::error::{AppError, AppResult};
use crate::extract::AppJson;
use crate::middleware::rbac::authorize;
use crate::response::Patched;
use crate::state::AppState;

/// GET /api/v1/admin/users
///
/// All profiles, newest first.
pub async fn list_users(
    State(state): State<AppState>,
    identity: Identity,
) -> AppResult<Json<Vec<Profile>>> {
    authorize(&identity, Action::Read, Resource::UserAccounts)?;
    Ok(Json(ProfileRepo::list(&state.pool).await?))
}

/// PATCH /api/v1/admin/users/{id}
pub async fn update_user(
    State(state): State<AppState>,
    identity: Identity,
    Path(id): Path<DbId>,
    AppJson(input): AppJson<UpdateProfileAccess>,
) -> AppResult<Json<Patched<Profile>>> {
    authorize(&identity, Action::Update, Resource::UserAccounts)?;

    if input.is_empty() {
        return Ok(Json(Patched::unchanged()));
    }

    let profile = ProfileRepo::update_access(&state.pool, id, &input)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Profile",
            id,
        }))?;

    tracing::info!(
        user_id = id,
        admin_id = identity.user_id,
        role = %profile.role,
        is_active = profile.is_active,
        "Profile access updated",
    );

    Ok(Json(Patched::Updated(profile)))
}

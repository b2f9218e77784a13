//! Handler for the `/profiles` directory.

use axum::extract::State;
use axum::Json;
use taskboard_core::authz::{Action, Identity, Resource};
use taskboard_db::models::profile::Profile;
use taskboard_db::repositories::ProfileRepo;

use crate::error::AppResult;
use crate::middleware::rbac::authorize;
use crate::state::AppState;

/// GET /api/v1/profiles
///
/// Active profiles ordered by name, for assignee pickers.
pub async fn list_profiles(
    State(state): State<AppState>,
    identity: Identity,
) -> AppResult<Json<Vec<Profile>>> {
    authorize(&identity, Action::Read, Resource::ProfileDirectory)?;
    Ok(Json(ProfileRepo::list_directory(&state.pool).await?))
}

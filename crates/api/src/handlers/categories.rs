//! Handlers for the `/categories` resource.

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use taskboard_core::authz::{Action, Identity, Resource};
use taskboard_db::models::category::{Category, CreateCategory};
use taskboard_db::repositories::CategoryRepo;
use validator::Validate;

use crate::error::AppResult;
use crate::extract::AppJson;
use crate::middleware::rbac::authorize;
use crate::state::AppState;

/// GET /api/v1/categories
pub async fn list_categories(
    State(state): State<AppState>,
    identity: Identity,
) -> AppResult<Json<Vec<Category>>> {
    authorize(&identity, Action::Read, Resource::Category)?;
    Ok(Json(CategoryRepo::list(&state.pool).await?))
}

/// POST /api/v1/categories
///
/// Admin only. A duplicate name is rejected with 409 by the unique constraint.
pub async fn create_category(
    State(state): State<AppState>,
    identity: Identity,
    AppJson(input): AppJson<CreateCategory>,
) -> AppResult<(StatusCode, Json<Category>)> {
    authorize(&identity, Action::Create, Resource::Category)?;
    input.validate()?;

    let category = CategoryRepo::create(&state.pool, &input, identity.user_id).await?;
    tracing::info!(category_id = category.id, name = %category.name, "Category created");

    Ok((StatusCode::CREATED, Json(category)))
}

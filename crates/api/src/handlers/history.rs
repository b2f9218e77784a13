//! Handler for `/tasks/{id}/history`.

use axum::extract::{Path, State};
use axum::Json;
use taskboard_core::authz::{Action, Identity, Resource};
use taskboard_core::types::DbId;
use taskboard_db::models::task_history::HistoryDetail;
use taskboard_db::repositories::TaskHistoryRepo;

use crate::error::AppResult;
use crate::middleware::rbac::authorize;
use crate::state::AppState;

/// GET /api/v1/tasks/{id}/history
///
/// Newest first, each with the acting user as `changer`. Still readable
/// after the task has been deleted.
pub async fn list_history(
    State(state): State<AppState>,
    identity: Identity,
    Path(task_id): Path<DbId>,
) -> AppResult<Json<Vec<HistoryDetail>>> {
    authorize(&identity, Action::Read, Resource::History)?;

    let history = TaskHistoryRepo::list_by_task(&state.pool, task_id).await?;
    Ok(Json(history))
}

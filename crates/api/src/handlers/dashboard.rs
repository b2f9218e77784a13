//! Handler for the `/dashboard` summary.

use axum::extract::State;
use axum::Json;
use chrono::Utc;
use serde::Serialize;
use taskboard_core::authz::{Action, Identity, Resource};
use taskboard_db::models::task::TaskDetail;
use taskboard_db::repositories::task_repo::RECENT_TASK_LIMIT;
use taskboard_db::repositories::{ProfileRepo, TaskRepo};

use crate::error::AppResult;
use crate::middleware::rbac::authorize;
use crate::state::AppState;

/// Response body of `GET /dashboard`.
#[derive(Debug, Serialize)]
pub struct DashboardResponse {
    pub total_tasks: i64,
    pub completed_tasks: i64,
    pub in_progress_tasks: i64,
    pub overdue_tasks: i64,
    /// Number of profiles; always 0 for non-admin callers.
    pub total_users: i64,
    pub recent_tasks: Vec<TaskDetail>,
}

/// GET /api/v1/dashboard
pub async fn get_dashboard(
    State(state): State<AppState>,
    identity: Identity,
) -> AppResult<Json<DashboardResponse>> {
    authorize(&identity, Action::Read, Resource::Dashboard)?;

    let counts = TaskRepo::counts(&state.pool, Utc::now()).await?;
    let recent_tasks = TaskRepo::list_recent(&state.pool, RECENT_TASK_LIMIT).await?;
    let total_users = if identity.is_admin() {
        ProfileRepo::count(&state.pool).await?
    } else {
        0
    };

    Ok(Json(DashboardResponse {
        total_tasks: counts.total_tasks,
        completed_tasks: counts.completed_tasks,
        in_progress_tasks: counts.in_progress_tasks,
        overdue_tasks: counts.overdue_tasks,
        total_users,
        recent_tasks,
    }))
}

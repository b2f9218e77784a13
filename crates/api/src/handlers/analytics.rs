//! Handler for `/admin/analytics`.

use axum::extract::State;
use axum::Json;
use chrono::Utc;
use taskboard_core::analytics::{aggregate, AnalyticsTask, TaskAnalytics};
use taskboard_core::authz::{Action, Identity, Resource};
use taskboard_db::repositories::TaskRepo;

use crate::error::AppResult;
use crate::middleware::rbac::authorize;
use crate::state::AppState;

/// GET /api/v1/admin/analytics
///
/// Admin only. Aggregates every non-deleted task in a single pass.
pub async fn get_analytics(
    State(state): State<AppState>,
    identity: Identity,
) -> AppResult<Json<TaskAnalytics>> {
    authorize(&identity, Action::Read, Resource::Analytics)?;

    let tasks: Vec<AnalyticsTask> = TaskRepo::list_for_analytics(&state.pool)
        .await?
        .into_iter()
        .map(AnalyticsTask::from)
        .collect();

    let analytics = aggregate(&tasks, Utc::now());
    tracing::debug!(
        total_tasks = analytics.total_tasks,
        completion_rate = analytics.completion_rate,
        "Computed analytics",
    );
    Ok(Json(analytics))
}

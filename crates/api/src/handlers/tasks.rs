//! Handlers for the `/tasks` resource.
//!
//! Every mutation goes through the same sequence: authorize, validate, one
//! write statement, then one history insert attributed to the caller, then
//! the joined response. A failed history insert is logged and does not fail
//! the request.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use chrono::Utc;
use taskboard_core::authz::{Action, Identity, Resource};
use taskboard_core::error::CoreError;
use taskboard_core::tasks::{plan_update, validate_title, FieldChange, TaskPatch};
use taskboard_core::types::DbId;
use taskboard_db::models::task::{CreateTask, TaskDetail};
use taskboard_db::repositories::{TaskHistoryRepo, TaskRepo};

use crate::error::{AppError, AppResult};
use crate::extract::AppJson;
use crate::middleware::rbac::authorize;
use crate::query::TaskListParams;
use crate::response::{MessageResponse, Patched};
use crate::state::AppState;

/// GET /api/v1/tasks
///
/// Non-deleted tasks matching the query filters, joined with creator,
/// assignee and category.
pub async fn list_tasks(
    State(state): State<AppState>,
    identity: Identity,
    Query(params): Query<TaskListParams>,
) -> AppResult<Json<Vec<TaskDetail>>> {
    authorize(&identity, Action::Read, Resource::Task)?;
    let filter = params.into_filter()?;

    let tasks = TaskRepo::list(&state.pool, &filter).await?;
    tracing::debug!(count = tasks.len(), user_id = identity.user_id, "Listed tasks");

    Ok(Json(tasks))
}

/// POST /api/v1/tasks
pub async fn create_task(
    State(state): State<AppState>,
    identity: Identity,
    AppJson(input): AppJson<CreateTask>,
) -> AppResult<(StatusCode, Json<TaskDetail>)> {
    authorize(&identity, Action::Create, Resource::Task)?;
    validate_title(&input.title)?;

    let task = TaskRepo::create(&state.pool, identity.user_id, &input, Utc::now()).await?;
    tracing::info!(task_id = task.id, user_id = identity.user_id, "Task created");

    record_history(
        &state,
        task.id,
        identity.user_id,
        &[FieldChange::created(&task.title)],
    )
    .await;

    let detail = TaskRepo::attach_relations(&state.pool, vec![task])
        .await?
        .pop()
        .ok_or_else(|| AppError::InternalError("Created task vanished".into()))?;

    Ok((StatusCode::CREATED, Json(detail)))
}

/// GET /api/v1/tasks/{id}
pub async fn get_task(
    State(state): State<AppState>,
    identity: Identity,
    Path(id): Path<DbId>,
) -> AppResult<Json<TaskDetail>> {
    authorize(&identity, Action::Read, Resource::Task)?;

    let task = TaskRepo::find_detail(&state.pool, id)
        .await?
        .ok_or_else(|| task_not_found(id))?;
    Ok(Json(task))
}

/// PATCH /api/v1/tasks/{id}
///
/// Applies only the allow-listed fields that actually differ from the stored
/// values and records one history entry per changed field. A request that
/// changes nothing returns `{"message": "No changes"}` without writing.
pub async fn update_task(
    State(state): State<AppState>,
    identity: Identity,
    Path(id): Path<DbId>,
    AppJson(patch): AppJson<TaskPatch>,
) -> AppResult<Json<Patched<TaskDetail>>> {
    authorize(&identity, Action::Update, Resource::Task)?;

    let current = TaskRepo::find_active_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| task_not_found(id))?;

    let plan = plan_update(&current.state(), &patch, Utc::now())?;
    if plan.is_noop() {
        return Ok(Json(Patched::unchanged()));
    }

    let updated = TaskRepo::apply_update(&state.pool, id, &plan.update)
        .await?
        .ok_or_else(|| task_not_found(id))?;
    tracing::info!(
        task_id = id,
        user_id = identity.user_id,
        changed_fields = plan.changes.len(),
        "Task updated",
    );

    // Recorded before the relation join: once the row has changed, a failed
    // join must not leave the change without its history.
    record_history(&state, id, identity.user_id, &plan.changes).await;

    let detail = TaskRepo::attach_relations(&state.pool, vec![updated])
        .await?
        .pop()
        .ok_or_else(|| task_not_found(id))?;

    Ok(Json(Patched::Updated(detail)))
}

/// DELETE /api/v1/tasks/{id}
///
/// Soft-delete: the row stays, flagged `is_deleted`, and vanishes from every
/// listing. Deleting a task that is already deleted is a 404.
pub async fn delete_task(
    State(state): State<AppState>,
    identity: Identity,
    Path(id): Path<DbId>,
) -> AppResult<Json<MessageResponse>> {
    authorize(&identity, Action::Delete, Resource::Task)?;

    if !TaskRepo::soft_delete(&state.pool, id).await? {
        return Err(task_not_found(id));
    }
    tracing::info!(task_id = id, user_id = identity.user_id, "Task deleted");

    record_history(&state, id, identity.user_id, &[FieldChange::deleted()]).await;

    Ok(Json(MessageResponse {
        message: "Task deleted",
    }))
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn task_not_found(id: DbId) -> AppError {
    AppError::Core(CoreError::NotFound { entity: "Task", id })
}

/// Append history rows, logging rather than propagating a failure. The task
/// write has already happened and is not rolled back.
async fn record_history(state: &AppState, task_id: DbId, user_id: DbId, changes: &[FieldChange]) {
    if let Err(e) = TaskHistoryRepo::append(&state.pool, task_id, user_id, changes).await {
        tracing::error!(
            error = %e,
            task_id,
            user_id,
            entries = changes.len(),
            "Failed to record task history",
        );
    }
}

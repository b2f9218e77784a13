//! Handlers for `/tasks/{id}/comments`.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use taskboard_core::authz::{Action, Identity, Resource};
use taskboard_core::comments::normalize_comment_text;
use taskboard_core::error::CoreError;
use taskboard_core::types::DbId;
use taskboard_db::models::comment::{CommentDetail, CreateComment};
use taskboard_db::repositories::{CommentRepo, TaskRepo};

use crate::error::{AppError, AppResult};
use crate::extract::AppJson;
use crate::middleware::rbac::authorize;
use crate::state::AppState;

/// GET /api/v1/tasks/{id}/comments
///
/// Oldest first, each with its author as `user`.
pub async fn list_comments(
    State(state): State<AppState>,
    identity: Identity,
    Path(task_id): Path<DbId>,
) -> AppResult<Json<Vec<CommentDetail>>> {
    authorize(&identity, Action::Read, Resource::Comment)?;

    let comments = CommentRepo::list_by_task(&state.pool, task_id).await?;
    tracing::debug!(task_id, count = comments.len(), "Listed comments");
    Ok(Json(comments))
}

/// POST /api/v1/tasks/{id}/comments
///
/// The text is trimmed before storage; blank text is rejected. The parent
/// task must exist and not be deleted.
pub async fn create_comment(
    State(state): State<AppState>,
    identity: Identity,
    Path(task_id): Path<DbId>,
    AppJson(input): AppJson<CreateComment>,
) -> AppResult<(StatusCode, Json<CommentDetail>)> {
    authorize(&identity, Action::Create, Resource::Comment)?;
    let text = normalize_comment_text(&input.comment_text)?;

    if !TaskRepo::exists_active(&state.pool, task_id).await? {
        return Err(AppError::Core(CoreError::NotFound {
            entity: "Task",
            id: task_id,
        }));
    }

    let comment = CommentRepo::create(&state.pool, task_id, identity.user_id, &text).await?;
    tracing::info!(
        comment_id = comment.id,
        task_id,
        user_id = identity.user_id,
        "Comment added",
    );

    let detail = CommentRepo::attach_authors(&state.pool, vec![comment])
        .await?
        .pop()
        .ok_or_else(|| AppError::InternalError("Created comment vanished".into()))?;

    Ok((StatusCode::CREATED, Json(detail)))
}

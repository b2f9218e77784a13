//! Route definitions for the `/tasks` resource and its threads.

use axum::routing::get;
use axum::Router;

use crate::handlers::{comments, history, tasks};
use crate::state::AppState;

/// Routes mounted at `/tasks`.
///
/// ```text
/// GET, POST           /                -> list_tasks, create_task
/// GET, PATCH, DELETE  /{id}            -> get_task, update_task, delete_task
/// GET, POST           /{id}/comments   -> list_comments, create_comment
/// GET                 /{id}/history    -> list_history
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(tasks::list_tasks).post(tasks::create_task))
        .route(
            "/{id}",
            get(tasks::get_task)
                .patch(tasks::update_task)
                .delete(tasks::delete_task),
        )
        .route(
            "/{id}/comments",
            get(comments::list_comments).post(comments::create_comment),
        )
        .route("/{id}/history", get(history::list_history))
}

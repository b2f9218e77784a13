pub mod admin;
pub mod auth;
pub mod categories;
pub mod health;
pub mod tasks;

use axum::routing::get;
use axum::Router;

use crate::handlers;
use crate::state::AppState;

/// Build the `/api/v1` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /auth/signup                  signup (public)
/// /auth/login                   login (public)
/// /auth/me                      current profile
///
/// /tasks                        list, create
/// /tasks/{id}                   get, update, delete (soft)
/// /tasks/{id}/comments          list, create
/// /tasks/{id}/history           list
///
/// /categories                   list, create (create is admin only)
/// /profiles                     active profile directory
/// /dashboard                    summary counts and recent tasks
///
/// /admin/analytics              task analytics (admin only)
/// /admin/users                  list (admin only)
/// /admin/users/{id}             update role / active flag (admin only)
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .nest("/auth", auth::router())
        .nest("/tasks", tasks::router())
        .nest("/categories", categories::router())
        .route("/profiles", get(handlers::profiles::list_profiles))
        .route("/dashboard", get(handlers::dashboard::get_dashboard))
        .nest("/admin", admin::router())
}

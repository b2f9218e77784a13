//! Route definitions for the `/admin` resource.

use axum::routing::{get, patch};
use axum::Router;

use crate::handlers::{admin, analytics};
use crate::state::AppState;

/// Routes mounted at `/admin`. Every handler checks for the admin role.
///
/// ```text
/// GET    /analytics     -> get_analytics
/// GET    /users         -> list_users
/// PATCH  /users/{id}    -> update_user
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/analytics", get(analytics::get_analytics))
        .route("/users", get(admin::list_users))
        .route("/users/{id}", patch(admin::update_user))
}

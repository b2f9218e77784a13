//! HTTP-level integration tests for the task endpoints: creation,
//! listing filters, partial updates with history, and soft deletion.

mod common;

use axum::http::StatusCode;
use common::{
    body_json, create_task, delete_auth, get, get_auth, patch_json_auth, post_json_auth, signed_in,
};
use serde_json::json;
use sqlx::PgPool;
use taskboard_core::roles::UserRole;

async fn history(app: axum::Router, token: &str, task_id: i64) -> Vec<serde_json::Value> {
    let response = get_auth(app, &format!("/api/v1/tasks/{task_id}/history"), token).await;
    assert_eq!(response.status(), StatusCode::OK);
    body_json(response).await.as_array().cloned().unwrap()
}

async fn task_count(pool: &PgPool) -> i64 {
    sqlx::query_scalar("SELECT COUNT(*) FROM tasks")
        .fetch_one(pool)
        .await
        .unwrap()
}

// ---------------------------------------------------------------------------
// Creation
// ---------------------------------------------------------------------------

/// The worked example: create "Ship v1", then complete it.
#[sqlx::test(migrations = "../../db/migrations")]
async fn test_ship_v1_lifecycle(pool: PgPool) {
    let (user, token) = signed_in(&pool, "Shipper", UserRole::User).await;
    let app = common::build_test_app(pool);

    let task = create_task(
        app.clone(),
        &token,
        json!({ "title": "Ship v1", "priority": "high" }),
    )
    .await;
    let id = task["id"].as_i64().unwrap();

    assert_eq!(task["status"], "todo");
    assert_eq!(task["priority"], "high");
    assert!(task["completed_at"].is_null());
    assert_eq!(task["creator"]["id"], user.id);
    assert!(task["assignee"].is_null());
    assert!(task["creator"].get("password_hash").is_none());

    let entries = history(app.clone(), &token, id).await;
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0]["field_name"], "created");
    assert!(entries[0]["old_value"].is_null());
    assert_eq!(entries[0]["new_value"], "Ship v1");
    assert_eq!(entries[0]["changer"]["id"], user.id);

    let response = patch_json_auth(
        app.clone(),
        &format!("/api/v1/tasks/{id}"),
        json!({ "status": "completed" }),
        &token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let updated = body_json(response).await;
    assert_eq!(updated["status"], "completed");
    assert!(updated["completed_at"].is_string());

    let entries = history(app, &token, id).await;
    assert_eq!(entries.len(), 2);
    assert_eq!(entries[0]["field_name"], "status");
    assert_eq!(entries[0]["old_value"], "todo");
    assert_eq!(entries[0]["new_value"], "completed");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_short_title_rejected_without_write(pool: PgPool) {
    let (_user, token) = signed_in(&pool, "Brief", UserRole::User).await;
    let app = common::build_test_app(pool.clone());

    let response = post_json_auth(app, "/api/v1/tasks", json!({ "title": "ab" }), &token).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = body_json(response).await;
    assert_eq!(json["code"], "VALIDATION_ERROR");

    assert_eq!(task_count(&pool).await, 0);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_unknown_priority_is_bad_request(pool: PgPool) {
    let (_user, token) = signed_in(&pool, "Picky", UserRole::User).await;
    let app = common::build_test_app(pool.clone());

    let response = post_json_auth(
        app,
        "/api/v1/tasks",
        json!({ "title": "Valid title", "priority": "critical" }),
        &token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(task_count(&pool).await, 0);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_create_completed_task_sets_completed_at(pool: PgPool) {
    let (_user, token) = signed_in(&pool, "Finisher", UserRole::User).await;
    let app = common::build_test_app(pool);

    let task = create_task(
        app,
        &token,
        json!({ "title": "Done already", "status": "completed" }),
    )
    .await;
    assert!(task["completed_at"].is_string());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_unknown_category_is_bad_request(pool: PgPool) {
    let (_user, token) = signed_in(&pool, "Sorter", UserRole::User).await;
    let app = common::build_test_app(pool);

    let response = post_json_auth(
        app,
        "/api/v1/tasks",
        json!({ "title": "Misfiled", "category_id": 999999 }),
        &token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

// ---------------------------------------------------------------------------
// Updates
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_equal_value_patch_is_noop(pool: PgPool) {
    let (_user, token) = signed_in(&pool, "Steady", UserRole::User).await;
    let app = common::build_test_app(pool);

    let task = create_task(
        app.clone(),
        &token,
        json!({ "title": "Unchanging", "priority": "low" }),
    )
    .await;
    let id = task["id"].as_i64().unwrap();

    let response = patch_json_auth(
        app.clone(),
        &format!("/api/v1/tasks/{id}"),
        json!({ "title": "Unchanging", "priority": "low", "is_deleted": true }),
        &token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await, json!({ "message": "No changes" }));

    assert_eq!(history(app.clone(), &token, id).await.len(), 1);

    // The unknown key was ignored, not applied.
    let response = get_auth(app, &format!("/api/v1/tasks/{id}"), &token).await;
    assert_eq!(response.status(), StatusCode::OK);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_resent_due_date_is_noop_at_stored_precision(pool: PgPool) {
    let (_user, token) = signed_in(&pool, "Precise", UserRole::User).await;
    let app = common::build_test_app(pool.clone());

    let task = create_task(app.clone(), &token, json!({ "title": "Deadline" })).await;
    let id = task["id"].as_i64().unwrap();
    let uri = format!("/api/v1/tasks/{id}");
    let body = json!({ "due_date": "2026-04-01T00:00:00.1234567Z" });

    let response = patch_json_auth(app.clone(), &uri, body.clone(), &token).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert!(body_json(response).await["due_date"].is_string());

    let response = patch_json_auth(app.clone(), &uri, body, &token).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await, json!({ "message": "No changes" }));

    let rows: Vec<(Option<String>, Option<String>)> = sqlx::query_as(
        "SELECT old_value, new_value FROM task_history
         WHERE task_id = $1 AND field_name = 'due_date'",
    )
    .bind(id)
    .fetch_all(&pool)
    .await
    .unwrap();
    assert_eq!(
        rows,
        vec![(None, Some("2026-04-01T00:00:00.123456+00:00".to_string()))]
    );
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_created_due_date_matches_resent_value(pool: PgPool) {
    let (_user, token) = signed_in(&pool, "Planner", UserRole::User).await;
    let app = common::build_test_app(pool);

    let task = create_task(
        app.clone(),
        &token,
        json!({ "title": "Planned", "due_date": "2026-05-01T08:30:00.9999999Z" }),
    )
    .await;
    let id = task["id"].as_i64().unwrap();

    let response = patch_json_auth(
        app.clone(),
        &format!("/api/v1/tasks/{id}"),
        json!({ "due_date": "2026-05-01T08:30:00.9999999Z" }),
        &token,
    )
    .await;
    assert_eq!(body_json(response).await, json!({ "message": "No changes" }));
    assert_eq!(history(app, &token, id).await.len(), 1);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_patch_records_one_entry_per_changed_field(pool: PgPool) {
    let (user, token) = signed_in(&pool, "Editor", UserRole::User).await;
    let (helper, _) = signed_in(&pool, "Helper", UserRole::User).await;
    let app = common::build_test_app(pool);

    let task = create_task(
        app.clone(),
        &token,
        json!({ "title": "Original", "description": "" }),
    )
    .await;
    let id = task["id"].as_i64().unwrap();

    let response = patch_json_auth(
        app.clone(),
        &format!("/api/v1/tasks/{id}"),
        json!({
            "title": "Renamed",
            "description": "",
            "assigned_to": helper.id,
            "status": "in_progress",
        }),
        &token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let updated = body_json(response).await;
    assert_eq!(updated["title"], "Renamed");
    assert_eq!(updated["assignee"]["id"], helper.id);
    assert!(updated["completed_at"].is_null());

    let entries = history(app, &token, id).await;
    let mut fields: Vec<&str> = entries[..3]
        .iter()
        .map(|e| e["field_name"].as_str().unwrap())
        .collect();
    fields.sort_unstable();
    assert_eq!(fields, vec!["assigned_to", "status", "title"]);
    assert_eq!(entries.len(), 4);

    let assignment = entries
        .iter()
        .find(|e| e["field_name"] == "assigned_to")
        .unwrap();
    assert!(assignment["old_value"].is_null());
    assert_eq!(assignment["new_value"], helper.id.to_string());
    assert_eq!(assignment["changed_by"], user.id);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_leaving_completed_clears_completed_at(pool: PgPool) {
    let (_user, token) = signed_in(&pool, "Reopener", UserRole::User).await;
    let app = common::build_test_app(pool);

    let task = create_task(
        app.clone(),
        &token,
        json!({ "title": "Reopen me", "status": "completed" }),
    )
    .await;
    let id = task["id"].as_i64().unwrap();

    let response = patch_json_auth(
        app,
        &format!("/api/v1/tasks/{id}"),
        json!({ "status": "on_hold" }),
        &token,
    )
    .await;
    let updated = body_json(response).await;
    assert_eq!(updated["status"], "on_hold");
    assert!(updated["completed_at"].is_null());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_patch_short_title_rejected(pool: PgPool) {
    let (_user, token) = signed_in(&pool, "Trimmer", UserRole::User).await;
    let app = common::build_test_app(pool);

    let task = create_task(app.clone(), &token, json!({ "title": "Long enough" })).await;
    let id = task["id"].as_i64().unwrap();

    let response = patch_json_auth(
        app.clone(),
        &format!("/api/v1/tasks/{id}"),
        json!({ "title": "no" }),
        &token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(history(app, &token, id).await.len(), 1);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_patch_missing_task_is_404(pool: PgPool) {
    let (_user, token) = signed_in(&pool, "Seeker", UserRole::User).await;
    let app = common::build_test_app(pool);

    let response = patch_json_auth(
        app,
        "/api/v1/tasks/424242",
        json!({ "title": "Whatever" }),
        &token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

// ---------------------------------------------------------------------------
// History write ordering
// ---------------------------------------------------------------------------

async fn status_history_rows(pool: &PgPool, task_id: i64) -> i64 {
    sqlx::query_scalar(
        "SELECT COUNT(*) FROM task_history WHERE task_id = $1 AND field_name = 'status'",
    )
    .bind(task_id)
    .fetch_one(pool)
    .await
    .unwrap()
}

async fn stored_status(pool: &PgPool, task_id: i64) -> String {
    sqlx::query_scalar("SELECT status FROM tasks WHERE id = $1")
        .bind(task_id)
        .fetch_one(pool)
        .await
        .unwrap()
}

/// The update commits before relations are joined; a failing join still
/// leaves the change recorded in history.
#[sqlx::test(migrations = "../../db/migrations")]
async fn test_history_recorded_when_relation_join_fails(pool: PgPool) {
    let (_user, token) = signed_in(&pool, "Joiner", UserRole::User).await;
    let category_id: i64 =
        sqlx::query_scalar("SELECT id FROM task_categories ORDER BY id LIMIT 1")
            .fetch_one(&pool)
            .await
            .unwrap();
    let app = common::build_test_app(pool.clone());

    let task = create_task(
        app.clone(),
        &token,
        json!({ "title": "Categorised", "category_id": category_id }),
    )
    .await;
    let id = task["id"].as_i64().unwrap();

    sqlx::query("ALTER TABLE task_categories RENAME TO task_categories_offline")
        .execute(&pool)
        .await
        .unwrap();

    let response = patch_json_auth(
        app,
        &format!("/api/v1/tasks/{id}"),
        json!({ "status": "completed" }),
        &token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

    assert_eq!(stored_status(&pool, id).await, "completed");
    assert_eq!(status_history_rows(&pool, id).await, 1);
}

/// A failed history insert is logged, not surfaced: the update still
/// succeeds and stays committed.
#[sqlx::test(migrations = "../../db/migrations")]
async fn test_update_succeeds_when_history_insert_fails(pool: PgPool) {
    let (_user, token) = signed_in(&pool, "Unlogged", UserRole::User).await;
    let app = common::build_test_app(pool.clone());

    let task = create_task(app.clone(), &token, json!({ "title": "Off the record" })).await;
    let id = task["id"].as_i64().unwrap();

    sqlx::query("ALTER TABLE task_history RENAME TO task_history_offline")
        .execute(&pool)
        .await
        .unwrap();

    let response = patch_json_auth(
        app,
        &format!("/api/v1/tasks/{id}"),
        json!({ "status": "in_progress" }),
        &token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await["status"], "in_progress");
    assert_eq!(stored_status(&pool, id).await, "in_progress");

    sqlx::query("ALTER TABLE task_history_offline RENAME TO task_history")
        .execute(&pool)
        .await
        .unwrap();
    assert_eq!(status_history_rows(&pool, id).await, 0);
}

// ---------------------------------------------------------------------------
// Deletion
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_delete_hides_task_and_records_history(pool: PgPool) {
    let (_user, token) = signed_in(&pool, "Remover", UserRole::User).await;
    let app = common::build_test_app(pool);

    let keep = create_task(app.clone(), &token, json!({ "title": "Keep this" })).await;
    let drop = create_task(app.clone(), &token, json!({ "title": "Drop this" })).await;
    let drop_id = drop["id"].as_i64().unwrap();

    let response = delete_auth(app.clone(), &format!("/api/v1/tasks/{drop_id}"), &token).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await, json!({ "message": "Task deleted" }));

    let listed = body_json(get_auth(app.clone(), "/api/v1/tasks", &token).await).await;
    let ids: Vec<i64> = listed
        .as_array()
        .unwrap()
        .iter()
        .map(|t| t["id"].as_i64().unwrap())
        .collect();
    assert_eq!(ids, vec![keep["id"].as_i64().unwrap()]);

    let entries = history(app.clone(), &token, drop_id).await;
    assert_eq!(entries[0]["field_name"], "deleted");
    assert_eq!(entries[0]["old_value"], "false");
    assert_eq!(entries[0]["new_value"], "true");
    assert_eq!(entries.len(), 2);

    let response = get_auth(app.clone(), &format!("/api/v1/tasks/{drop_id}"), &token).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let response = patch_json_auth(
        app.clone(),
        &format!("/api/v1/tasks/{drop_id}"),
        json!({ "title": "Resurrected" }),
        &token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let response = delete_auth(app.clone(), &format!("/api/v1/tasks/{drop_id}"), &token).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    // No extra history from the rejected calls.
    assert_eq!(history(app, &token, drop_id).await.len(), 2);
}

// ---------------------------------------------------------------------------
// Listing
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_list_filters_and_sort(pool: PgPool) {
    let (_user, token) = signed_in(&pool, "Lister", UserRole::User).await;
    let (helper, _) = signed_in(&pool, "Helper", UserRole::User).await;
    let app = common::build_test_app(pool);

    create_task(
        app.clone(),
        &token,
        json!({ "title": "Write docs", "priority": "low" }),
    )
    .await;
    create_task(
        app.clone(),
        &token,
        json!({ "title": "Fix login bug", "priority": "urgent", "assigned_to": helper.id }),
    )
    .await;
    create_task(
        app.clone(),
        &token,
        json!({ "title": "Fix typo", "priority": "medium", "status": "in_progress" }),
    )
    .await;

    let titles = |json: serde_json::Value| -> Vec<String> {
        json.as_array()
            .unwrap()
            .iter()
            .map(|t| t["title"].as_str().unwrap().to_string())
            .collect()
    };

    let response = get_auth(
        app.clone(),
        "/api/v1/tasks?search=fix&sort_by=priority&sort_order=asc",
        &token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(titles(body_json(response).await), vec!["Fix typo", "Fix login bug"]);

    let response = get_auth(
        app.clone(),
        &format!("/api/v1/tasks?assigned_to={}", helper.id),
        &token,
    )
    .await;
    assert_eq!(titles(body_json(response).await), vec!["Fix login bug"]);

    let response = get_auth(app.clone(), "/api/v1/tasks?status=in_progress&priority=", &token).await;
    assert_eq!(titles(body_json(response).await), vec!["Fix typo"]);

    let response = get_auth(app.clone(), "/api/v1/tasks?sort_by=title&sort_order=asc", &token).await;
    assert_eq!(
        titles(body_json(response).await),
        vec!["Fix login bug", "Fix typo", "Write docs"]
    );

    let response = get_auth(app, "/api/v1/tasks?sort_by=password_hash", &token).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_tasks_require_authentication(pool: PgPool) {
    let app = common::build_test_app(pool);

    let response = get(app.clone(), "/api/v1/tasks").await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let response = get_auth(app, "/api/v1/tasks", "not-a-token").await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

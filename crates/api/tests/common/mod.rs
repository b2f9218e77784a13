//! Shared helpers for HTTP-level integration tests.
//!
//! Every test builds the production router via [`build_test_app`] and drives
//! it with `tower::ServiceExt::oneshot`, so the full middleware stack is
//! exercised.

#![allow(dead_code)]

use std::sync::Arc;

use axum::body::Body;
use axum::http::{header, Method, Request, Response};
use axum::Router;
use http_body_util::BodyExt;
use serde_json::Value;
use sqlx::PgPool;
use tower::ServiceExt;

use taskboard_api::auth::jwt::{issue_access_token, JwtConfig};
use taskboard_api::auth::password::hash_password;
use taskboard_api::config::ServerConfig;
use taskboard_api::router::build_app_router;
use taskboard_api::state::AppState;
use taskboard_core::roles::UserRole;
use taskboard_db::models::profile::{CreateProfile, Profile};
use taskboard_db::repositories::ProfileRepo;

/// Password used for every profile created through [`create_profile`].
pub const TEST_PASSWORD: &str = "test_password_123!";

/// Build a test `ServerConfig` with safe defaults.
pub fn test_config() -> ServerConfig {
    ServerConfig {
        database_url: String::new(),
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec!["http://localhost:5173".to_string()],
        request_timeout_secs: 30,
        jwt: JwtConfig {
            secret: "integration-test-secret-long-enough-for-hmac".to_string(),
            access_token_expiry_mins: 60,
        },
        seed_admin: None,
    }
}

/// Build the full application router with all middleware layers, using the
/// given database pool.
pub fn build_test_app(pool: PgPool) -> Router {
    let state = AppState {
        pool,
        config: Arc::new(test_config()),
    };
    build_app_router(state)
}

/// Insert a profile directly, with [`TEST_PASSWORD`] as its password.
pub async fn create_profile(pool: &PgPool, name: &str, role: UserRole) -> Profile {
    let input = CreateProfile {
        full_name: name.to_string(),
        email: format!("{}@test.com", name.to_lowercase().replace(' ', ".")),
        password_hash: hash_password(TEST_PASSWORD).expect("hashing should succeed"),
        role,
    };
    ProfileRepo::create(pool, &input)
        .await
        .expect("profile creation should succeed")
}

/// Mint an access token for `profile` with the test secret.
pub fn token_for(profile: &Profile) -> String {
    issue_access_token(profile, &test_config().jwt)
        .expect("token generation should succeed")
}

/// Create a profile and return it with a valid token.
pub async fn signed_in(pool: &PgPool, name: &str, role: UserRole) -> (Profile, String) {
    let profile = create_profile(pool, name, role).await;
    let token = token_for(&profile);
    (profile, token)
}

/// Collect a response body and parse it as JSON.
pub async fn body_json(response: Response<Body>) -> Value {
    let bytes = response
        .into_body()
        .collect()
        .await
        .expect("body should be readable")
        .to_bytes();
    serde_json::from_slice(&bytes).expect("body should be JSON")
}

async fn send(
    app: Router,
    method: Method,
    uri: &str,
    token: Option<&str>,
    body: Option<Value>,
) -> Response<Body> {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
    }
    let request = match body {
        Some(json) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(json.to_string())),
        None => builder.body(Body::empty()),
    }
    .expect("request should build");

    app.oneshot(request).await.expect("request should complete")
}

pub async fn get(app: Router, uri: &str) -> Response<Body> {
    send(app, Method::GET, uri, None, None).await
}

pub async fn get_auth(app: Router, uri: &str, token: &str) -> Response<Body> {
    send(app, Method::GET, uri, Some(token), None).await
}

pub async fn post_json(app: Router, uri: &str, body: Value) -> Response<Body> {
    send(app, Method::POST, uri, None, Some(body)).await
}

pub async fn post_json_auth(app: Router, uri: &str, body: Value, token: &str) -> Response<Body> {
    send(app, Method::POST, uri, Some(token), Some(body)).await
}

pub async fn patch_json_auth(app: Router, uri: &str, body: Value, token: &str) -> Response<Body> {
    send(app, Method::PATCH, uri, Some(token), Some(body)).await
}

pub async fn delete_auth(app: Router, uri: &str, token: &str) -> Response<Body> {
    send(app, Method::DELETE, uri, Some(token), None).await
}

/// Create a task through the API and return its JSON.
pub async fn create_task(app: Router, token: &str, body: Value) -> Value {
    let response = post_json_auth(app, "/api/v1/tasks", body, token).await;
    assert_eq!(response.status(), axum::http::StatusCode::CREATED);
    body_json(response).await
}

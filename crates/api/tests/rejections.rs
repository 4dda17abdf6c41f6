//! Requests the API rejects before touching the database: authentication,
//! role gates and payload validation. These run against a lazy pool.

mod common;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use common::{
    assert_error, delete_auth, get, get_auth, lazy_pool, patch_json_auth, post_json,
    post_json_auth, token_for,
};
use evidencias_core::roles::UserRole;
use serde_json::json;
use tower::ServiceExt;
use uuid::Uuid;

// ---------------------------------------------------------------------------
// Authentication
// ---------------------------------------------------------------------------

#[tokio::test]
async fn test_missing_authorization_header() {
    let app = common::build_test_app(lazy_pool());
    let json = assert_error(get(app, "/api/v1/events").await, StatusCode::UNAUTHORIZED, "UNAUTHORIZED").await;
    assert_eq!(json["error"], "Missing Authorization header");
}

#[tokio::test]
async fn test_non_bearer_authorization_is_rejected() {
    let app = common::build_test_app(lazy_pool());
    let request = Request::builder()
        .uri("/api/v1/events")
        .header("authorization", "Basic dXNlcjpwYXNz")
        .body(Body::empty())
        .unwrap();
    let response = app.oneshot(request).await.unwrap();
    assert_error(response, StatusCode::UNAUTHORIZED, "UNAUTHORIZED").await;
}

#[tokio::test]
async fn test_garbage_token_is_rejected() {
    let app = common::build_test_app(lazy_pool());
    let response = get_auth(app, "/api/v1/auth/me", "not.a.jwt").await;
    let json = assert_error(response, StatusCode::UNAUTHORIZED, "UNAUTHORIZED").await;
    assert_eq!(json["error"], "Invalid or expired token");
}

// ---------------------------------------------------------------------------
// Role gates
// ---------------------------------------------------------------------------

#[tokio::test]
async fn test_user_admin_routes_require_admin() {
    let token = token_for(Uuid::new_v4(), UserRole::TecFormacao);

    let app = common::build_test_app(lazy_pool());
    assert_error(get_auth(app, "/api/v1/users", &token).await, StatusCode::FORBIDDEN, "FORBIDDEN").await;

    let app = common::build_test_app(lazy_pool());
    let uri = format!("/api/v1/users/{}/deactivate", Uuid::new_v4());
    let response = patch_json_auth(app, &uri, &token, json!({})).await;
    assert_error(response, StatusCode::FORBIDDEN, "FORBIDDEN").await;

    let app = common::build_test_app(lazy_pool());
    let response = get_auth(app, "/api/v1/audit-logs", &token).await;
    assert_error(response, StatusCode::FORBIDDEN, "FORBIDDEN").await;
}

#[tokio::test]
async fn test_only_admin_deletes_events() {
    let token = token_for(Uuid::new_v4(), UserRole::TecAcompanhamento);
    let app = common::build_test_app(lazy_pool());
    let uri = format!("/api/v1/events/{}", Uuid::new_v4());
    assert_error(delete_auth(app, &uri, &token).await, StatusCode::FORBIDDEN, "FORBIDDEN").await;
}

// ---------------------------------------------------------------------------
// Validation
// ---------------------------------------------------------------------------

#[tokio::test]
async fn test_event_with_short_title_is_rejected() {
    let token = token_for(Uuid::new_v4(), UserRole::TecFormacao);
    let app = common::build_test_app(lazy_pool());
    let body = json!({
        "title": "ab",
        "type": "FORMACAO",
        "start_at": "2024-03-10T09:00:00Z",
    });
    let response = post_json_auth(app, "/api/v1/events", &token, body).await;
    assert_error(response, StatusCode::BAD_REQUEST, "VALIDATION_ERROR").await;
}

#[tokio::test]
async fn test_event_ending_before_start_is_rejected() {
    let token = token_for(Uuid::new_v4(), UserRole::TecFormacao);
    let app = common::build_test_app(lazy_pool());
    let body = json!({
        "title": "Encontro regional",
        "type": "ENCONTRO",
        "start_at": "2024-03-10T09:00:00Z",
        "end_at": "2024-03-09T09:00:00Z",
    });
    let response = post_json_auth(app, "/api/v1/events", &token, body).await;
    let json = assert_error(response, StatusCode::BAD_REQUEST, "VALIDATION_ERROR").await;
    assert!(json["error"].as_str().unwrap().contains("end_at"));
}

#[tokio::test]
async fn test_register_with_short_password_is_rejected() {
    let app = common::build_test_app(lazy_pool());
    let body = json!({ "name": "Maria Clara", "email": "maria@escola.org", "password": "1234" });
    let response = post_json(app, "/api/v1/auth/register", body).await;
    assert_error(response, StatusCode::BAD_REQUEST, "VALIDATION_ERROR").await;
}

#[tokio::test]
async fn test_unknown_event_type_is_a_client_error() {
    let token = token_for(Uuid::new_v4(), UserRole::Admin);
    let app = common::build_test_app(lazy_pool());
    let body = json!({ "title": "Visita", "type": "VISITA", "start_at": "2024-03-10T09:00:00Z" });
    let response = post_json_auth(app, "/api/v1/events", &token, body).await;
    assert!(response.status().is_client_error());
}

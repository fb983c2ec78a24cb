//! Router tests that need no database: auth guards, envelopes and input validation

mod common;

use axum::http::{Method, StatusCode};
use serde_json::json;

use bookshelf_server::models::user::Role;
use common::{offline_app, request, send, token};

#[tokio::test]
async fn test_health_check_uses_envelope() {
    let (status, body) = send(offline_app(), request(Method::GET, "/api/health", None, None)).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["code"], 200);
    assert_eq!(body["msg"], "success");
    assert_eq!(body["data"]["status"], "healthy");
    assert!(body.get("pagination").is_none());
}

#[tokio::test]
async fn test_profile_requires_token() {
    let (status, body) = send(
        offline_app(),
        request(Method::GET, "/api/users/profile", None, None),
    )
    .await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["code"], 401);
    assert!(body["data"].is_null());
}

#[tokio::test]
async fn test_invalid_token_is_rejected() {
    let (status, body) = send(
        offline_app(),
        request(Method::GET, "/api/users/profile", Some("not-a-jwt"), None),
    )
    .await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["msg"], "Invalid or expired token");
}

#[tokio::test]
async fn test_reader_cannot_reach_admin_routes() {
    let reader = token(5, Role::Reader);
    for uri in [
        "/api/admin/users",
        "/api/admin/logs",
        "/api/admin/statistics/overview",
        "/api/admin/export/users",
    ] {
        let (status, body) = send(offline_app(), request(Method::GET, uri, Some(&reader), None)).await;
        assert_eq!(status, StatusCode::FORBIDDEN, "{}", uri);
        assert_eq!(body["code"], 403);
    }
}

#[tokio::test]
async fn test_reader_cannot_create_books() {
    let reader = token(5, Role::Reader);
    let (status, _) = send(
        offline_app(),
        common::multipart("/api/books", &reader, &[("isbn", "1"), ("title", "t")]),
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_register_rejects_short_password() {
    let (status, body) = send(
        offline_app(),
        request(
            Method::POST,
            "/api/users/register",
            None,
            Some(json!({ "username": "abc", "password": "123" })),
        ),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], 400);
}

#[tokio::test]
async fn test_login_requires_both_fields() {
    let (status, body) = send(
        offline_app(),
        request(
            Method::POST,
            "/api/users/login",
            None,
            Some(json!({ "username": "", "password": "" })),
        ),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["msg"], "Username and password are required");
}

#[tokio::test]
async fn test_malformed_json_uses_error_envelope() {
    let app = offline_app();
    let req = axum::http::Request::builder()
        .method(Method::POST)
        .uri("/api/users/login")
        .header("content-type", "application/json")
        .body(axum::body::Body::from("{not json"))
        .unwrap();
    let (status, body) = send(app, req).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], 400);
}

#[tokio::test]
async fn test_non_numeric_id_is_bad_request() {
    let reader = token(5, Role::Reader);
    let (status, body) = send(
        offline_app(),
        request(Method::POST, "/api/borrows/abc", Some(&reader), None),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], 400);
}

#[tokio::test]
async fn test_unknown_borrow_filter_is_bad_request() {
    let reader = token(5, Role::Reader);
    let (status, _) = send(
        offline_app(),
        request(
            Method::GET,
            "/api/borrows/my-records?status=lost",
            Some(&reader),
            None,
        ),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_openapi_document_is_served() {
    let (status, body) = send(
        offline_app(),
        request(Method::GET, "/api-docs/openapi.json", None, None),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert!(body["paths"]["/books"].is_object());
}

//! Shared helpers for router-level tests

#![allow(dead_code)]

use axum::{
    body::Body,
    http::{header, Method, Request, StatusCode},
    Router,
};
use chrono::Utc;
use http_body_util::BodyExt;
use serde_json::Value;
use sqlx::{postgres::PgPoolOptions, PgPool};
use tower::ServiceExt;

use bookshelf_server::{
    api,
    config::AppConfig,
    models::user::{Role, UserClaims},
    AppState,
};

pub fn test_config() -> AppConfig {
    let mut config = AppConfig::default();
    config.auth.jwt_secret = "router-test-secret".to_string();
    config.uploads.directory = std::env::temp_dir()
        .join("bookshelf-test-uploads")
        .to_string_lossy()
        .into_owned();
    config
}

/// Router over a pool that never connects; only usable for paths that fail
/// before touching the database.
pub fn offline_app() -> Router {
    let config = test_config();
    let pool = PgPoolOptions::new()
        .connect_lazy(&config.database.url)
        .expect("lazy pool");
    api::create_router(AppState::new(config, pool))
}

pub fn app(pool: PgPool) -> Router {
    api::create_router(AppState::new(test_config(), pool))
}

pub fn token(user_id: i32, role: Role) -> String {
    let now = Utc::now().timestamp();
    let claims = UserClaims {
        sub: format!("user{}", user_id),
        user_id,
        role,
        exp: now + 3600,
        iat: now,
    };
    claims
        .create_token(&test_config().auth.jwt_secret)
        .expect("token")
}

pub async fn send(app: Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = app.oneshot(request).await.expect("response");
    let status = response.status();
    let bytes = response
        .into_body()
        .collect()
        .await
        .expect("body")
        .to_bytes();
    let json = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or(Value::Null)
    };
    (status, json)
}

pub fn request(method: Method, uri: &str, token: Option<&str>, body: Option<Value>) -> Request<Body> {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
    }
    match body {
        Some(json) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(json.to_string()))
            .expect("request"),
        None => builder.body(Body::empty()).expect("request"),
    }
}

/// `multipart/form-data` POST made of text fields only
pub fn multipart(uri: &str, token: &str, fields: &[(&str, &str)]) -> Request<Body> {
    multipart_with_file(Method::POST, uri, token, fields, None)
}

/// `multipart/form-data` request with text fields and an optional `cover` file
/// given as `(file_name, bytes)`
pub fn multipart_with_file(
    method: Method,
    uri: &str,
    token: &str,
    fields: &[(&str, &str)],
    cover: Option<(&str, &[u8])>,
) -> Request<Body> {
    const BOUNDARY: &str = "bookshelf-test-boundary";
    let mut body: Vec<u8> = Vec::new();
    for (name, value) in fields {
        body.extend_from_slice(
            format!(
                "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"{name}\"\r\n\r\n{value}\r\n"
            )
            .as_bytes(),
        );
    }
    if let Some((file_name, data)) = cover {
        body.extend_from_slice(
            format!(
                "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"cover\"; filename=\"{file_name}\"\r\nContent-Type: application/octet-stream\r\n\r\n"
            )
            .as_bytes(),
        );
        body.extend_from_slice(data);
        body.extend_from_slice(b"\r\n");
    }
    body.extend_from_slice(format!("--{BOUNDARY}--\r\n").as_bytes());

    Request::builder()
        .method(method)
        .uri(uri)
        .header(header::AUTHORIZATION, format!("Bearer {}", token))
        .header(
            header::CONTENT_TYPE,
            format!("multipart/form-data; boundary={BOUNDARY}"),
        )
        .body(Body::from(body))
        .expect("request")
}

/// Local file behind a cover URL produced by the test config
pub fn cover_path(url: &str) -> std::path::PathBuf {
    let config = test_config();
    let name = url.rsplit('/').next().unwrap_or_default();
    std::path::Path::new(&config.uploads.directory)
        .join("covers")
        .join(name)
}

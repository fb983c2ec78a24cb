//! API handlers for Bookshelf REST endpoints

pub mod admin;
pub mod books;
pub mod borrows;
pub mod comments;
pub mod extract;
pub mod health;
pub mod notifications;
pub mod openapi;
pub mod reservations;
pub mod response;
pub mod stats;
pub mod users;

use std::{convert::Infallible, net::SocketAddr};

use axum::{
    async_trait,
    extract::{ConnectInfo, DefaultBodyLimit, FromRequestParts},
    http::{header::AUTHORIZATION, request::Parts, HeaderValue, Method},
    routing::{get, post, put},
    Router,
};
use tower_http::{
    compression::CompressionLayer,
    cors::{AllowOrigin, Any, CorsLayer},
    services::ServeDir,
    trace::TraceLayer,
};

use crate::{config::CorsConfig, error::AppError, models::user::UserClaims, AppState};

/// Extractor for authenticated user from JWT token
pub struct AuthenticatedUser(pub UserClaims);

#[async_trait]
impl FromRequestParts<AppState> for AuthenticatedUser {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let auth_header = parts
            .headers
            .get(AUTHORIZATION)
            .and_then(|value| value.to_str().ok())
            .ok_or_else(|| AppError::Authentication("Missing authorization header".to_string()))?;

        let token = auth_header
            .strip_prefix("Bearer ")
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .ok_or_else(|| {
                AppError::Authentication("Invalid authorization header format".to_string())
            })?;

        let claims = UserClaims::from_token(token, &state.config.auth.jwt_secret).map_err(|e| {
            tracing::debug!("Token rejected: {}", e);
            AppError::Authentication("Invalid or expired token".to_string())
        })?;

        Ok(AuthenticatedUser(claims))
    }
}

/// Authenticated user holding the admin role
pub struct AdminUser(pub UserClaims);

#[async_trait]
impl FromRequestParts<AppState> for AdminUser {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let AuthenticatedUser(claims) = AuthenticatedUser::from_request_parts(parts, state).await?;
        claims.require_admin()?;
        Ok(AdminUser(claims))
    }
}

/// Client address: first `X-Forwarded-For` hop, then `X-Real-IP`, then the peer address
pub struct ClientIp(pub Option<String>);

#[async_trait]
impl<S: Send + Sync> FromRequestParts<S> for ClientIp {
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let header = |name: &str| {
            parts
                .headers
                .get(name)
                .and_then(|v| v.to_str().ok())
                .and_then(|v| v.split(',').next())
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };

        let ip = header("x-forwarded-for")
            .or_else(|| header("x-real-ip"))
            .or_else(|| {
                parts
                    .extensions
                    .get::<ConnectInfo<SocketAddr>>()
                    .map(|ConnectInfo(addr)| addr.ip().to_string())
            });

        Ok(ClientIp(ip))
    }
}

fn cors_layer(config: &CorsConfig) -> CorsLayer {
    let methods = [
        Method::GET,
        Method::POST,
        Method::PUT,
        Method::DELETE,
        Method::OPTIONS,
    ];

    if config.allowed_origins.iter().any(|o| o == "*") {
        return CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(methods)
            .allow_headers(Any);
    }

    let origins: Vec<HeaderValue> = config
        .allowed_origins
        .iter()
        .filter_map(|o| match o.parse() {
            Ok(v) => Some(v),
            Err(_) => {
                tracing::warn!(origin = %o, "Ignoring invalid CORS origin");
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_methods(methods)
        .allow_headers([AUTHORIZATION, axum::http::header::CONTENT_TYPE])
        .allow_credentials(true)
}

/// Create the application router with all routes
pub fn create_router(state: AppState) -> Router {
    let config = state.config.clone();

    let api = Router::new()
        // Health check
        .route("/health", get(health::health_check))
        .route("/ready", get(health::readiness_check))
        // Users
        .route("/users/register", post(users::register))
        .route("/users/login", post(users::login))
        .route("/users/profile", get(users::get_profile).put(users::update_profile))
        .route("/users/change-password", post(users::change_password))
        // Catalog
        .route("/books", get(books::list_books).post(books::create_book))
        .route("/books/popular", get(books::popular_books))
        .route("/books/top-rated", get(books::top_rated_books))
        .route(
            "/books/categories",
            get(books::list_categories).post(books::create_category),
        )
        .route(
            "/books/:id",
            get(books::get_book)
                .put(books::update_book)
                .delete(books::delete_book),
        )
        // Borrowing
        .route("/borrows/my-records", get(borrows::my_records))
        .route("/borrows/overdue", get(borrows::my_overdue))
        .route("/borrows/:id", post(borrows::borrow_book))
        .route("/borrows/:id/return", post(borrows::return_book))
        .route("/borrows/:id/renew", post(borrows::renew_book))
        // Reservations
        .route(
            "/reservations/my-reservations",
            get(reservations::my_reservations),
        )
        .route("/reservations/queue/:id", get(reservations::book_queue))
        .route("/reservations/:id", post(reservations::reserve_book))
        .route("/reservations/:id/cancel", post(reservations::cancel_reservation))
        // Comments
        .route("/comments/book/:id", get(comments::list_book_comments))
        .route(
            "/comments/:id",
            post(comments::upsert_comment).delete(comments::delete_comment),
        )
        // Notifications
        .route("/notifications", get(notifications::list_notifications))
        .route("/notifications/unread-count", get(notifications::unread_count))
        .route("/notifications/read-all", put(notifications::mark_all_read))
        .route("/notifications/:id/read", put(notifications::mark_read))
        // Administration
        .route("/admin/users", get(admin::list_users))
        .route("/admin/users/:id/freeze", post(admin::freeze_user))
        .route("/admin/users/:id/unfreeze", post(admin::unfreeze_user))
        .route("/admin/logs", get(admin::list_logs))
        .route("/admin/export/users", get(admin::export_users))
        .route("/admin/export/borrow-records", get(admin::export_borrow_records))
        // Statistics
        .route("/admin/statistics/overview", get(stats::overview))
        .route("/admin/statistics/top-books", get(stats::top_books))
        .route("/admin/statistics/user-activity", get(stats::user_activity))
        .route(
            "/admin/statistics/category-distribution",
            get(stats::category_distribution),
        )
        .route(
            "/admin/statistics/borrow-return-rate",
            get(stats::borrow_return_rate),
        )
        .route("/admin/statistics/overdue-report", get(stats::overdue_report))
        .layer(DefaultBodyLimit::max(config.uploads.max_size_bytes))
        .with_state(state);

    Router::new()
        .nest("/api", api)
        .nest_service(&config.uploads.url_prefix, ServeDir::new(&config.uploads.directory))
        .merge(openapi::create_openapi_router())
        .layer(CompressionLayer::new())
        .layer(TraceLayer::new_for_http())
        .layer(cors_layer(&config.cors))
}

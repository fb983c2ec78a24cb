//! OpenAPI documentation

use axum::Router;
use utoipa::{
    openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme},
    Modify, OpenApi,
};
use utoipa_swagger_ui::SwaggerUi;

use crate::api::{
    admin, books, borrows, comments, health, notifications, reservations, stats, users,
};

/// Registers the JWT bearer scheme referenced by `security(("bearer_auth" = []))`
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .build(),
                ),
            );
        }
    }
}

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Bookshelf API",
        version = "0.3.0",
        description = "Library management REST API: catalog, loans, reservations and reviews"
    ),
    servers(
        (url = "/api", description = "API")
    ),
    modifiers(&SecurityAddon),
    paths(
        // Health
        health::health_check,
        health::readiness_check,
        // Users
        users::register,
        users::login,
        users::get_profile,
        users::update_profile,
        users::change_password,
        // Catalog
        books::list_books,
        books::get_book,
        books::popular_books,
        books::top_rated_books,
        books::list_categories,
        books::create_category,
        books::create_book,
        books::update_book,
        books::delete_book,
        // Borrowing
        borrows::borrow_book,
        borrows::return_book,
        borrows::renew_book,
        borrows::my_records,
        borrows::my_overdue,
        // Reservations
        reservations::reserve_book,
        reservations::cancel_reservation,
        reservations::my_reservations,
        reservations::book_queue,
        // Comments
        comments::upsert_comment,
        comments::delete_comment,
        comments::list_book_comments,
        // Notifications
        notifications::list_notifications,
        notifications::unread_count,
        notifications::mark_read,
        notifications::mark_all_read,
        // Administration
        admin::list_users,
        admin::freeze_user,
        admin::unfreeze_user,
        admin::list_logs,
        admin::export_users,
        admin::export_borrow_records,
        // Statistics
        stats::overview,
        stats::top_books,
        stats::user_activity,
        stats::category_distribution,
        stats::borrow_return_rate,
        stats::overdue_report,
    ),
    components(
        schemas(
            // Users
            crate::models::user::User,
            crate::models::user::Role,
            crate::models::user::UserStatus,
            crate::models::user::RegisterRequest,
            crate::models::user::LoginRequest,
            crate::models::user::UpdateProfile,
            crate::models::user::ChangePassword,
            users::LoginResponse,
            // Catalog
            crate::models::book::Book,
            crate::models::book::BookDetails,
            crate::models::book::BookUpload,
            crate::models::category::BookCategory,
            crate::models::category::CreateCategory,
            // Borrowing
            crate::models::borrow::BorrowRecord,
            crate::models::borrow::BorrowRecordView,
            crate::models::borrow::BorrowStatus,
            // Reservations
            crate::models::reservation::Reservation,
            crate::models::reservation::ReservationStatus,
            crate::models::reservation::ReservationTicket,
            crate::models::reservation::QueueEntry,
            // Comments
            crate::models::comment::BookComment,
            crate::models::comment::CommentRequest,
            // Notifications
            crate::models::notification::Notification,
            crate::models::notification::NotificationType,
            crate::models::notification::UnreadCount,
            notifications::MarkAllReadResponse,
            // Administration
            crate::models::operation_log::OperationLog,
            admin::UserExport,
            admin::BorrowRecordExport,
            // Statistics
            stats::OverviewStats,
            stats::TopBook,
            stats::DailyActivity,
            stats::CategoryCount,
            stats::BorrowReturnRate,
            stats::OverdueEntry,
            // Envelope
            super::response::Pagination,
            // Health
            health::HealthResponse,
            // Errors
            crate::error::ErrorResponse,
        )
    ),
    tags(
        (name = "health", description = "Health check endpoints"),
        (name = "users", description = "Registration, login and profile"),
        (name = "books", description = "Catalog and categories"),
        (name = "borrows", description = "Borrow, return and renew"),
        (name = "reservations", description = "Reservation queues"),
        (name = "comments", description = "Ratings and comments"),
        (name = "notifications", description = "User notifications"),
        (name = "admin", description = "User administration, audit log and exports"),
        (name = "stats", description = "Statistics")
    )
)]
pub struct ApiDoc;

/// Create the OpenAPI documentation router
pub fn create_openapi_router() -> Router {
    Router::new()
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
}

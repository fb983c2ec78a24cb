//! Statistics endpoints (admin)

use axum::extract::State;
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::{IntoParams, ToSchema};

use super::{extract::Query, response::ApiResponse, AdminUser};
use crate::{error::AppResult, models::clamp_limit, services::stats::activity_days};

const DEFAULT_TOP_BOOKS: i64 = 10;

/// Library-wide counters
#[derive(Debug, Serialize, ToSchema)]
pub struct OverviewStats {
    pub total_users: i64,
    pub total_books: i64,
    /// Loans not yet returned
    pub currently_borrowed: i64,
    pub waiting_reservations: i64,
    /// Loans past their due date
    pub overdue_books: i64,
}

#[derive(Debug, Serialize, FromRow, ToSchema)]
pub struct TopBook {
    pub book_id: i32,
    pub title: String,
    pub author: Option<String>,
    pub borrow_count: i64,
}

/// Borrow activity of one day
#[derive(Debug, Serialize, FromRow, ToSchema)]
pub struct DailyActivity {
    pub date: NaiveDate,
    pub borrow_count: i64,
    /// Distinct users who borrowed that day
    pub active_users: i64,
}

/// Number of books in a category; `category_id` is null for uncategorised books
#[derive(Debug, Serialize, FromRow, ToSchema)]
pub struct CategoryCount {
    pub category_id: Option<i32>,
    pub category: Option<String>,
    pub book_count: i64,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct BorrowReturnRate {
    pub total_borrowed: i64,
    pub total_returned: i64,
    pub currently_borrowed: i64,
    /// Percentage of borrows already returned
    pub return_rate: f64,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct OverdueEntry {
    pub record_id: i32,
    pub user_id: i32,
    pub username: String,
    pub book_id: i32,
    pub book_title: String,
    pub borrow_time: DateTime<Utc>,
    pub due_time: DateTime<Utc>,
    /// Whole days past the due date
    pub overdue_days: i64,
}

#[derive(Debug, Deserialize, IntoParams)]
pub struct TopBooksQuery {
    /// Number of books (default 10, max 100)
    pub limit: Option<i64>,
}

#[derive(Debug, Deserialize, IntoParams)]
pub struct ActivityQuery {
    /// Window size in days (default 30, 1 to 365)
    pub days: Option<i64>,
}

/// Library overview counters
#[utoipa::path(
    get,
    path = "/admin/statistics/overview",
    tag = "stats",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Overview", body = OverviewStats),
        (status = 403, description = "Administrator privileges required", body = crate::error::ErrorResponse)
    )
)]
pub async fn overview(
    State(state): State<crate::AppState>,
    _admin: AdminUser,
) -> AppResult<ApiResponse<OverviewStats>> {
    let stats = state.services.stats.overview().await?;
    Ok(ApiResponse::ok(stats))
}

/// Most borrowed books
#[utoipa::path(
    get,
    path = "/admin/statistics/top-books",
    tag = "stats",
    security(("bearer_auth" = [])),
    params(TopBooksQuery),
    responses((status = 200, description = "Books by borrow records", body = Vec<TopBook>))
)]
pub async fn top_books(
    State(state): State<crate::AppState>,
    _admin: AdminUser,
    Query(query): Query<TopBooksQuery>,
) -> AppResult<ApiResponse<Vec<TopBook>>> {
    let limit = clamp_limit(query.limit, DEFAULT_TOP_BOOKS);
    let books = state.services.stats.top_books(limit).await?;
    Ok(ApiResponse::ok(books))
}

/// Daily borrow activity over the last N days
#[utoipa::path(
    get,
    path = "/admin/statistics/user-activity",
    tag = "stats",
    security(("bearer_auth" = [])),
    params(ActivityQuery),
    responses((status = 200, description = "One entry per day, oldest first", body = Vec<DailyActivity>))
)]
pub async fn user_activity(
    State(state): State<crate::AppState>,
    _admin: AdminUser,
    Query(query): Query<ActivityQuery>,
) -> AppResult<ApiResponse<Vec<DailyActivity>>> {
    let days = activity_days(query.days);
    let activity = state.services.stats.user_activity(days).await?;
    Ok(ApiResponse::ok(activity))
}

#[utoipa::path(
    get,
    path = "/admin/statistics/category-distribution",
    tag = "stats",
    security(("bearer_auth" = [])),
    responses((status = 200, description = "Book count per category", body = Vec<CategoryCount>))
)]
pub async fn category_distribution(
    State(state): State<crate::AppState>,
    _admin: AdminUser,
) -> AppResult<ApiResponse<Vec<CategoryCount>>> {
    let counts = state.services.stats.category_distribution().await?;
    Ok(ApiResponse::ok(counts))
}

#[utoipa::path(
    get,
    path = "/admin/statistics/borrow-return-rate",
    tag = "stats",
    security(("bearer_auth" = [])),
    responses((status = 200, description = "Borrow and return totals", body = BorrowReturnRate))
)]
pub async fn borrow_return_rate(
    State(state): State<crate::AppState>,
    _admin: AdminUser,
) -> AppResult<ApiResponse<BorrowReturnRate>> {
    let rate = state.services.stats.borrow_return_rate().await?;
    Ok(ApiResponse::ok(rate))
}

/// Overdue loans, oldest due date first
#[utoipa::path(
    get,
    path = "/admin/statistics/overdue-report",
    tag = "stats",
    security(("bearer_auth" = [])),
    responses((status = 200, description = "Overdue loans", body = Vec<OverdueEntry>))
)]
pub async fn overdue_report(
    State(state): State<crate::AppState>,
    _admin: AdminUser,
) -> AppResult<ApiResponse<Vec<OverdueEntry>>> {
    let report = state.services.stats.overdue_report().await?;
    Ok(ApiResponse::ok(report))
}

//! Borrow, return and renew endpoints

use axum::extract::State;

use super::{
    extract::{Path, Query},
    response::ApiResponse,
    AuthenticatedUser, ClientIp,
};
use crate::{
    error::AppResult,
    models::{
        borrow::{BorrowFilter, BorrowQuery, BorrowRecordView},
        NewOperationLog,
    },
    services::audit::actions,
};

/// Borrow a book for the loan period
#[utoipa::path(
    post,
    path = "/borrows/{book_id}",
    tag = "borrows",
    security(("bearer_auth" = [])),
    params(("book_id" = i32, Path, description = "Book ID")),
    responses(
        (status = 200, description = "Book borrowed", body = BorrowRecordView),
        (status = 400, description = "Out of stock or already borrowed", body = crate::error::ErrorResponse),
        (status = 403, description = "Account is frozen", body = crate::error::ErrorResponse),
        (status = 404, description = "Book not found", body = crate::error::ErrorResponse)
    )
)]
pub async fn borrow_book(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    ClientIp(ip): ClientIp,
    Path(book_id): Path<i32>,
) -> AppResult<ApiResponse<BorrowRecordView>> {
    let record = state.services.borrows.borrow(claims.user_id, book_id).await?;

    state
        .services
        .audit
        .record(
            NewOperationLog::new(actions::BORROW_BOOK, "borrow_records")
                .by(claims.user_id)
                .record(record.record.id)
                .from_ip(ip)
                .new_value(&record.record),
        )
        .await;

    Ok(ApiResponse::ok(record).msg("Book borrowed"))
}

/// Return a borrowed book
#[utoipa::path(
    post,
    path = "/borrows/{record_id}/return",
    tag = "borrows",
    security(("bearer_auth" = [])),
    params(("record_id" = i32, Path, description = "Borrow record ID")),
    responses(
        (status = 200, description = "Book returned", body = BorrowRecordView),
        (status = 400, description = "Already returned", body = crate::error::ErrorResponse),
        (status = 403, description = "Record belongs to another user", body = crate::error::ErrorResponse),
        (status = 404, description = "Record not found", body = crate::error::ErrorResponse)
    )
)]
pub async fn return_book(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    ClientIp(ip): ClientIp,
    Path(record_id): Path<i32>,
) -> AppResult<ApiResponse<BorrowRecordView>> {
    let record = state.services.borrows.return_book(record_id, claims.user_id).await?;

    state
        .services
        .audit
        .record(
            NewOperationLog::new(actions::RETURN_BOOK, "borrow_records")
                .by(claims.user_id)
                .record(record_id)
                .from_ip(ip),
        )
        .await;

    Ok(ApiResponse::ok(record).msg("Book returned"))
}

/// Renew an active loan
#[utoipa::path(
    post,
    path = "/borrows/{record_id}/renew",
    tag = "borrows",
    security(("bearer_auth" = [])),
    params(("record_id" = i32, Path, description = "Borrow record ID")),
    responses(
        (status = 200, description = "Loan renewed", body = BorrowRecordView),
        (status = 400, description = "Not active or renewal limit reached", body = crate::error::ErrorResponse),
        (status = 403, description = "Record belongs to another user or account is frozen", body = crate::error::ErrorResponse),
        (status = 404, description = "Record not found", body = crate::error::ErrorResponse)
    )
)]
pub async fn renew_book(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    ClientIp(ip): ClientIp,
    Path(record_id): Path<i32>,
) -> AppResult<ApiResponse<BorrowRecordView>> {
    let record = state.services.borrows.renew(record_id, claims.user_id).await?;

    state
        .services
        .audit
        .record(
            NewOperationLog::new(actions::RENEW_BOOK, "borrow_records")
                .by(claims.user_id)
                .record(record_id)
                .from_ip(ip)
                .new_value(&serde_json::json!({
                    "due_time": record.record.due_time,
                    "renewal_count": record.record.renewal_count,
                })),
        )
        .await;

    Ok(ApiResponse::ok(record).msg("Loan renewed"))
}

/// Current user's borrow records, newest first
#[utoipa::path(
    get,
    path = "/borrows/my-records",
    tag = "borrows",
    security(("bearer_auth" = [])),
    params(BorrowQuery),
    responses(
        (status = 200, description = "Borrow records", body = Vec<BorrowRecordView>),
        (status = 400, description = "Unknown status filter", body = crate::error::ErrorResponse)
    )
)]
pub async fn my_records(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Query(query): Query<BorrowQuery>,
) -> AppResult<ApiResponse<Vec<BorrowRecordView>>> {
    let filter = BorrowFilter::from_param(query.status.as_deref())?;
    let records = state.services.borrows.my_records(claims.user_id, filter).await?;
    Ok(ApiResponse::ok(records))
}

/// Current user's overdue loans
#[utoipa::path(
    get,
    path = "/borrows/overdue",
    tag = "borrows",
    security(("bearer_auth" = [])),
    responses((status = 200, description = "Overdue loans", body = Vec<BorrowRecordView>))
)]
pub async fn my_overdue(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
) -> AppResult<ApiResponse<Vec<BorrowRecordView>>> {
    let records = state.services.borrows.my_overdue(claims.user_id).await?;
    Ok(ApiResponse::ok(records))
}

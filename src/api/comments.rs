//! Comment and rating endpoints

use axum::extract::State;

use super::{
    extract::{Json, Path, Query},
    response::ApiResponse,
    AuthenticatedUser,
};
use crate::{
    error::AppResult,
    models::{
        comment::{BookComment, CommentQuery, CommentRequest},
        Page,
    },
};

/// Create or replace own comment on a book
#[utoipa::path(
    post,
    path = "/comments/{book_id}",
    tag = "comments",
    security(("bearer_auth" = [])),
    params(("book_id" = i32, Path, description = "Book ID")),
    request_body = CommentRequest,
    responses(
        (status = 200, description = "Comment saved", body = BookComment),
        (status = 400, description = "Rating out of range", body = crate::error::ErrorResponse),
        (status = 403, description = "Account is frozen", body = crate::error::ErrorResponse),
        (status = 404, description = "Book not found", body = crate::error::ErrorResponse)
    )
)]
pub async fn upsert_comment(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path(book_id): Path<i32>,
    Json(request): Json<CommentRequest>,
) -> AppResult<ApiResponse<BookComment>> {
    let comment = state
        .services
        .comments
        .upsert(claims.user_id, book_id, request)
        .await?;
    Ok(ApiResponse::ok(comment).msg("Comment saved"))
}

/// Delete a comment (author or admin)
#[utoipa::path(
    delete,
    path = "/comments/{id}",
    tag = "comments",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "Comment ID")),
    responses(
        (status = 200, description = "Comment deleted"),
        (status = 403, description = "Not the author", body = crate::error::ErrorResponse),
        (status = 404, description = "Comment not found", body = crate::error::ErrorResponse)
    )
)]
pub async fn delete_comment(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path(id): Path<i32>,
) -> AppResult<ApiResponse<()>> {
    state.services.comments.delete(id, &claims).await?;
    Ok(ApiResponse::message("Comment deleted"))
}

/// Approved comments of a book, newest first
#[utoipa::path(
    get,
    path = "/comments/book/{book_id}",
    tag = "comments",
    params(
        ("book_id" = i32, Path, description = "Book ID"),
        CommentQuery
    ),
    responses(
        (status = 200, description = "Page of comments", body = Vec<BookComment>),
        (status = 404, description = "Book not found", body = crate::error::ErrorResponse)
    )
)]
pub async fn list_book_comments(
    State(state): State<crate::AppState>,
    Path(book_id): Path<i32>,
    Query(query): Query<CommentQuery>,
) -> AppResult<ApiResponse<Vec<BookComment>>> {
    let page = Page::new(query.page, query.per_page);
    let (comments, total) = state.services.comments.for_book(book_id, page).await?;
    Ok(ApiResponse::paginated(comments, page, total))
}

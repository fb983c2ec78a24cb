//! Notification endpoints

use axum::extract::State;
use serde::Serialize;
use utoipa::ToSchema;

use super::{
    extract::{Path, Query},
    response::ApiResponse,
    AuthenticatedUser,
};
use crate::{
    error::AppResult,
    models::notification::{Notification, NotificationQuery, UnreadCount},
};

#[derive(Serialize, ToSchema)]
pub struct MarkAllReadResponse {
    /// Number of notifications marked as read
    pub updated: u64,
}

/// Current user's notifications, newest first
#[utoipa::path(
    get,
    path = "/notifications",
    tag = "notifications",
    security(("bearer_auth" = [])),
    params(NotificationQuery),
    responses((status = 200, description = "Notifications", body = Vec<Notification>))
)]
pub async fn list_notifications(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Query(query): Query<NotificationQuery>,
) -> AppResult<ApiResponse<Vec<Notification>>> {
    let notifications = state
        .services
        .notifications
        .list(claims.user_id, query.is_read)
        .await?;
    Ok(ApiResponse::ok(notifications))
}

/// Number of unread notifications
#[utoipa::path(
    get,
    path = "/notifications/unread-count",
    tag = "notifications",
    security(("bearer_auth" = [])),
    responses((status = 200, description = "Unread count", body = UnreadCount))
)]
pub async fn unread_count(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
) -> AppResult<ApiResponse<UnreadCount>> {
    let unread_count = state.services.notifications.unread_count(claims.user_id).await?;
    Ok(ApiResponse::ok(UnreadCount { unread_count }))
}

/// Mark one notification as read
#[utoipa::path(
    put,
    path = "/notifications/{id}/read",
    tag = "notifications",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "Notification ID")),
    responses(
        (status = 200, description = "Marked as read", body = Notification),
        (status = 403, description = "Belongs to another user", body = crate::error::ErrorResponse),
        (status = 404, description = "Not found", body = crate::error::ErrorResponse)
    )
)]
pub async fn mark_read(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path(id): Path<i32>,
) -> AppResult<ApiResponse<Notification>> {
    let notification = state.services.notifications.mark_read(id, claims.user_id).await?;
    Ok(ApiResponse::ok(notification))
}

/// Mark all of the current user's notifications as read
#[utoipa::path(
    put,
    path = "/notifications/read-all",
    tag = "notifications",
    security(("bearer_auth" = [])),
    responses((status = 200, description = "All marked as read", body = MarkAllReadResponse))
)]
pub async fn mark_all_read(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
) -> AppResult<ApiResponse<MarkAllReadResponse>> {
    let updated = state.services.notifications.mark_all_read(claims.user_id).await?;
    Ok(ApiResponse::ok(MarkAllReadResponse { updated }))
}

//! Administration endpoints: users, audit log and exports

use axum::extract::State;
use serde::Serialize;
use utoipa::ToSchema;

use super::{
    extract::{Path, Query},
    response::ApiResponse,
    AdminUser, ClientIp,
};
use crate::{
    error::AppResult,
    models::{
        borrow::BorrowRecordView,
        operation_log::{LogQuery, OperationLog},
        user::{User, UserQuery, UserStatus},
        NewOperationLog, Page,
    },
    services::audit::actions,
};

/// Full dump of the users table
#[derive(Serialize, ToSchema)]
pub struct UserExport {
    pub total: usize,
    pub items: Vec<User>,
}

/// Full dump of the borrow records table
#[derive(Serialize, ToSchema)]
pub struct BorrowRecordExport {
    pub total: usize,
    pub items: Vec<BorrowRecordView>,
}

/// Search users by username or real name
#[utoipa::path(
    get,
    path = "/admin/users",
    tag = "admin",
    security(("bearer_auth" = [])),
    params(UserQuery),
    responses(
        (status = 200, description = "Page of users", body = Vec<User>),
        (status = 403, description = "Administrator privileges required", body = crate::error::ErrorResponse)
    )
)]
pub async fn list_users(
    State(state): State<crate::AppState>,
    _admin: AdminUser,
    Query(query): Query<UserQuery>,
) -> AppResult<ApiResponse<Vec<User>>> {
    let page = Page::new(query.page, query.per_page);
    let (users, total) = state.services.users.search(query.keyword.as_deref(), page).await?;
    Ok(ApiResponse::paginated(users, page, total))
}

async fn change_status(
    state: &crate::AppState,
    actor_id: i32,
    target_id: i32,
    status: UserStatus,
    ip: Option<String>,
) -> AppResult<User> {
    let user = state.services.users.set_status(actor_id, target_id, status).await?;

    let action = match status {
        UserStatus::Frozen => actions::FREEZE_USER,
        UserStatus::Active => actions::UNFREEZE_USER,
    };
    state
        .services
        .audit
        .record(
            NewOperationLog::new(action, "users")
                .by(actor_id)
                .record(target_id)
                .from_ip(ip)
                .new_value(&serde_json::json!({ "status": status })),
        )
        .await;

    Ok(user)
}

/// Freeze a user account
#[utoipa::path(
    post,
    path = "/admin/users/{id}/freeze",
    tag = "admin",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "User ID")),
    responses(
        (status = 200, description = "User frozen", body = User),
        (status = 400, description = "Cannot freeze yourself", body = crate::error::ErrorResponse),
        (status = 404, description = "User not found", body = crate::error::ErrorResponse)
    )
)]
pub async fn freeze_user(
    State(state): State<crate::AppState>,
    AdminUser(claims): AdminUser,
    ClientIp(ip): ClientIp,
    Path(id): Path<i32>,
) -> AppResult<ApiResponse<User>> {
    let user = change_status(&state, claims.user_id, id, UserStatus::Frozen, ip).await?;
    Ok(ApiResponse::ok(user).msg("User frozen"))
}

/// Reactivate a frozen user account
#[utoipa::path(
    post,
    path = "/admin/users/{id}/unfreeze",
    tag = "admin",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "User ID")),
    responses(
        (status = 200, description = "User reactivated", body = User),
        (status = 404, description = "User not found", body = crate::error::ErrorResponse)
    )
)]
pub async fn unfreeze_user(
    State(state): State<crate::AppState>,
    AdminUser(claims): AdminUser,
    ClientIp(ip): ClientIp,
    Path(id): Path<i32>,
) -> AppResult<ApiResponse<User>> {
    let user = change_status(&state, claims.user_id, id, UserStatus::Active, ip).await?;
    Ok(ApiResponse::ok(user).msg("User reactivated"))
}

/// Operation log, newest first
#[utoipa::path(
    get,
    path = "/admin/logs",
    tag = "admin",
    security(("bearer_auth" = [])),
    params(LogQuery),
    responses((status = 200, description = "Page of log entries", body = Vec<OperationLog>))
)]
pub async fn list_logs(
    State(state): State<crate::AppState>,
    _admin: AdminUser,
    Query(query): Query<LogQuery>,
) -> AppResult<ApiResponse<Vec<OperationLog>>> {
    let page = Page::new(query.page, query.per_page);
    let (logs, total) = state.services.audit.list(query.action.as_deref(), page).await?;
    Ok(ApiResponse::paginated(logs, page, total))
}

#[utoipa::path(
    get,
    path = "/admin/export/users",
    tag = "admin",
    security(("bearer_auth" = [])),
    responses((status = 200, description = "All users", body = UserExport))
)]
pub async fn export_users(
    State(state): State<crate::AppState>,
    _admin: AdminUser,
) -> AppResult<ApiResponse<UserExport>> {
    let users = state.services.users.export().await?;
    Ok(ApiResponse::ok(UserExport {
        total: users.len(),
        items: users,
    }))
}

#[utoipa::path(
    get,
    path = "/admin/export/borrow-records",
    tag = "admin",
    security(("bearer_auth" = [])),
    responses((status = 200, description = "All borrow records", body = BorrowRecordExport))
)]
pub async fn export_borrow_records(
    State(state): State<crate::AppState>,
    _admin: AdminUser,
) -> AppResult<ApiResponse<BorrowRecordExport>> {
    let records = state.services.borrows.export().await?;
    Ok(ApiResponse::ok(BorrowRecordExport {
        total: records.len(),
        items: records,
    }))
}

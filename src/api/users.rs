//! Registration, login and own-profile endpoints

use axum::extract::State;
use serde::Serialize;
use utoipa::ToSchema;

use super::{
    extract::Json,
    response::ApiResponse,
    AuthenticatedUser,
};
use crate::{
    error::AppResult,
    models::user::{ChangePassword, LoginRequest, RegisterRequest, UpdateProfile, User},
};

/// Login response
#[derive(Serialize, ToSchema)]
pub struct LoginResponse {
    /// JWT bearer token
    pub token: String,
    pub user: User,
}

/// Register a new reader account
#[utoipa::path(
    post,
    path = "/users/register",
    tag = "users",
    request_body = RegisterRequest,
    responses(
        (status = 201, description = "Account created", body = User),
        (status = 400, description = "Invalid input or username taken", body = crate::error::ErrorResponse)
    )
)]
pub async fn register(
    State(state): State<crate::AppState>,
    Json(request): Json<RegisterRequest>,
) -> AppResult<ApiResponse<User>> {
    let user = state.services.users.register(request).await?;
    Ok(ApiResponse::created(user).msg("Registration successful"))
}

/// Log in with username and password
#[utoipa::path(
    post,
    path = "/users/login",
    tag = "users",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Login successful", body = LoginResponse),
        (status = 400, description = "Missing credentials", body = crate::error::ErrorResponse),
        (status = 401, description = "Invalid username or password", body = crate::error::ErrorResponse),
        (status = 403, description = "Account frozen", body = crate::error::ErrorResponse)
    )
)]
pub async fn login(
    State(state): State<crate::AppState>,
    Json(request): Json<LoginRequest>,
) -> AppResult<ApiResponse<LoginResponse>> {
    let (token, user) = state
        .services
        .users
        .authenticate(&request.username, &request.password)
        .await?;
    Ok(ApiResponse::ok(LoginResponse { token, user }).msg("Login successful"))
}

/// Current user's profile
#[utoipa::path(
    get,
    path = "/users/profile",
    tag = "users",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Profile", body = User),
        (status = 401, description = "Not authenticated", body = crate::error::ErrorResponse)
    )
)]
pub async fn get_profile(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
) -> AppResult<ApiResponse<User>> {
    let user = state.services.users.get_by_id(claims.user_id).await?;
    Ok(ApiResponse::ok(user))
}

/// Update current user's profile
#[utoipa::path(
    put,
    path = "/users/profile",
    tag = "users",
    security(("bearer_auth" = [])),
    request_body = UpdateProfile,
    responses(
        (status = 200, description = "Profile updated", body = User),
        (status = 400, description = "Invalid input", body = crate::error::ErrorResponse)
    )
)]
pub async fn update_profile(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Json(profile): Json<UpdateProfile>,
) -> AppResult<ApiResponse<User>> {
    let user = state.services.users.update_profile(claims.user_id, profile).await?;
    Ok(ApiResponse::ok(user).msg("Profile updated"))
}

/// Change current user's password
#[utoipa::path(
    post,
    path = "/users/change-password",
    tag = "users",
    security(("bearer_auth" = [])),
    request_body = ChangePassword,
    responses(
        (status = 200, description = "Password changed"),
        (status = 400, description = "Old password incorrect or new password too short", body = crate::error::ErrorResponse)
    )
)]
pub async fn change_password(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Json(request): Json<ChangePassword>,
) -> AppResult<ApiResponse<()>> {
    state.services.users.change_password(claims.user_id, request).await?;
    Ok(ApiResponse::message("Password changed"))
}

//! JSON envelope shared by every endpoint: `{code, msg, data, pagination?}`

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use utoipa::ToSchema;

use crate::models::Page;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
pub struct Pagination {
    pub page: i64,
    pub per_page: i64,
    pub total: i64,
    pub pages: i64,
}

impl Pagination {
    pub fn new(page: Page, total: i64) -> Self {
        Self {
            page: page.page,
            per_page: page.per_page,
            total,
            pages: page.pages(total),
        }
    }
}

/// Successful response envelope. `code` mirrors the HTTP status.
#[derive(Debug, Serialize)]
pub struct ApiResponse<T> {
    #[serde(skip)]
    status: StatusCode,
    pub code: u16,
    pub msg: String,
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pagination: Option<Pagination>,
}

impl<T: Serialize> ApiResponse<T> {
    pub fn ok(data: T) -> Self {
        Self::with_status(StatusCode::OK, data)
    }

    pub fn created(data: T) -> Self {
        Self::with_status(StatusCode::CREATED, data)
    }

    pub fn paginated(data: T, page: Page, total: i64) -> Self {
        Self {
            pagination: Some(Pagination::new(page, total)),
            ..Self::ok(data)
        }
    }

    fn with_status(status: StatusCode, data: T) -> Self {
        Self {
            status,
            code: status.as_u16(),
            msg: "success".to_string(),
            data: Some(data),
            pagination: None,
        }
    }

    pub fn msg(mut self, msg: impl Into<String>) -> Self {
        self.msg = msg.into();
        self
    }
}

impl ApiResponse<()> {
    /// Envelope with a message and `data: null`
    pub fn message(msg: impl Into<String>) -> Self {
        Self {
            status: StatusCode::OK,
            code: StatusCode::OK.as_u16(),
            msg: msg.into(),
            data: None,
            pagination: None,
        }
    }
}

impl<T: Serialize> IntoResponse for ApiResponse<T> {
    fn into_response(self) -> Response {
        (self.status, Json(self)).into_response()
    }
}

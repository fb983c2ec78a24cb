//! Catalog endpoints: books and categories

use axum::extract::State;
use axum_extra::extract::{multipart::MultipartRejection, Multipart};

use super::{
    extract::{Json, Path, Query},
    response::ApiResponse,
    AdminUser, ClientIp,
};
use crate::{
    error::{AppError, AppResult},
    models::{
        book::{Book, BookDetails, BookForm, BookQuery, BookUpload, LimitQuery},
        category::{BookCategory, CreateCategory},
        clamp_limit, NewOperationLog,
    },
    services::{audit::actions, storage::UploadedFile},
};

const DEFAULT_TOP_LIMIT: i64 = 10;

/// Collect the text fields and the optional `cover` file of a book form
async fn read_book_form(
    multipart: Result<Multipart, MultipartRejection>,
) -> AppResult<(BookForm, Option<UploadedFile>)> {
    let mut multipart = multipart.map_err(|e| AppError::Validation(e.body_text()))?;
    let mut form = BookForm::default();
    let mut cover = None;

    while let Some(field) = multipart.next_field().await? {
        let name = field.name().unwrap_or("").to_string();
        if name == "cover" {
            let file_name = field.file_name().unwrap_or("").to_string();
            let data = field.bytes().await?;
            // browsers send an empty part when no file is picked
            if !file_name.is_empty() || !data.is_empty() {
                cover = Some(UploadedFile {
                    file_name,
                    data: data.to_vec(),
                });
            }
        } else {
            let value = field.text().await?;
            if !form.set(&name, value) {
                tracing::debug!(field = %name, "Ignoring unknown book form field");
            }
        }
    }

    Ok((form, cover))
}

/// List books with search, filter, sort and pagination
#[utoipa::path(
    get,
    path = "/books",
    tag = "books",
    params(BookQuery),
    responses(
        (status = 200, description = "Page of books", body = Vec<Book>)
    )
)]
pub async fn list_books(
    State(state): State<crate::AppState>,
    Query(query): Query<BookQuery>,
) -> AppResult<ApiResponse<Vec<Book>>> {
    let (books, total, page) = state.services.catalog.search_books(&query).await?;
    Ok(ApiResponse::paginated(books, page, total))
}

/// Get book details with approved comments
#[utoipa::path(
    get,
    path = "/books/{id}",
    tag = "books",
    params(("id" = i32, Path, description = "Book ID")),
    responses(
        (status = 200, description = "Book details", body = BookDetails),
        (status = 404, description = "Book not found", body = crate::error::ErrorResponse)
    )
)]
pub async fn get_book(
    State(state): State<crate::AppState>,
    Path(id): Path<i32>,
) -> AppResult<ApiResponse<BookDetails>> {
    let book = state.services.catalog.get_book(id).await?;
    Ok(ApiResponse::ok(book))
}

/// Most borrowed books
#[utoipa::path(
    get,
    path = "/books/popular",
    tag = "books",
    params(LimitQuery),
    responses((status = 200, description = "Books by borrow count", body = Vec<Book>))
)]
pub async fn popular_books(
    State(state): State<crate::AppState>,
    Query(query): Query<LimitQuery>,
) -> AppResult<ApiResponse<Vec<Book>>> {
    let limit = clamp_limit(query.limit, DEFAULT_TOP_LIMIT);
    let books = state.services.catalog.popular(limit).await?;
    Ok(ApiResponse::ok(books))
}

/// Best rated books
#[utoipa::path(
    get,
    path = "/books/top-rated",
    tag = "books",
    params(LimitQuery),
    responses((status = 200, description = "Books by average rating", body = Vec<Book>))
)]
pub async fn top_rated_books(
    State(state): State<crate::AppState>,
    Query(query): Query<LimitQuery>,
) -> AppResult<ApiResponse<Vec<Book>>> {
    let limit = clamp_limit(query.limit, DEFAULT_TOP_LIMIT);
    let books = state.services.catalog.top_rated(limit).await?;
    Ok(ApiResponse::ok(books))
}

/// List categories
#[utoipa::path(
    get,
    path = "/books/categories",
    tag = "books",
    responses((status = 200, description = "All categories", body = Vec<BookCategory>))
)]
pub async fn list_categories(
    State(state): State<crate::AppState>,
) -> AppResult<ApiResponse<Vec<BookCategory>>> {
    let categories = state.services.catalog.categories().await?;
    Ok(ApiResponse::ok(categories))
}

/// Create a category (admin)
#[utoipa::path(
    post,
    path = "/books/categories",
    tag = "books",
    security(("bearer_auth" = [])),
    request_body = CreateCategory,
    responses(
        (status = 201, description = "Category created", body = BookCategory),
        (status = 400, description = "Invalid or duplicate name", body = crate::error::ErrorResponse),
        (status = 403, description = "Administrator privileges required", body = crate::error::ErrorResponse)
    )
)]
pub async fn create_category(
    State(state): State<crate::AppState>,
    AdminUser(claims): AdminUser,
    ClientIp(ip): ClientIp,
    Json(request): Json<CreateCategory>,
) -> AppResult<ApiResponse<BookCategory>> {
    let category = state.services.catalog.create_category(request).await?;

    state
        .services
        .audit
        .record(
            NewOperationLog::new(actions::CREATE_CATEGORY, "book_categories")
                .by(claims.user_id)
                .record(category.id)
                .from_ip(ip)
                .new_value(&category),
        )
        .await;

    Ok(ApiResponse::created(category))
}

/// Create a book (admin, multipart with optional `cover` file)
#[utoipa::path(
    post,
    path = "/books",
    tag = "books",
    security(("bearer_auth" = [])),
    request_body(content = BookUpload, content_type = "multipart/form-data"),
    responses(
        (status = 201, description = "Book created", body = Book),
        (status = 400, description = "Invalid input or duplicate ISBN", body = crate::error::ErrorResponse),
        (status = 403, description = "Administrator privileges required", body = crate::error::ErrorResponse)
    )
)]
pub async fn create_book(
    State(state): State<crate::AppState>,
    AdminUser(claims): AdminUser,
    ClientIp(ip): ClientIp,
    multipart: Result<Multipart, MultipartRejection>,
) -> AppResult<ApiResponse<Book>> {
    let (form, cover) = read_book_form(multipart).await?;
    let book = state.services.catalog.create_book(form, cover).await?;

    state
        .services
        .audit
        .record(
            NewOperationLog::new(actions::CREATE_BOOK, "books")
                .by(claims.user_id)
                .record(book.id)
                .from_ip(ip)
                .new_value(&book),
        )
        .await;

    Ok(ApiResponse::created(book))
}

/// Update a book (admin, multipart; any subset of fields)
#[utoipa::path(
    put,
    path = "/books/{id}",
    tag = "books",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "Book ID")),
    request_body(content = BookUpload, content_type = "multipart/form-data"),
    responses(
        (status = 200, description = "Book updated", body = Book),
        (status = 400, description = "Invalid input or duplicate ISBN", body = crate::error::ErrorResponse),
        (status = 404, description = "Book not found", body = crate::error::ErrorResponse)
    )
)]
pub async fn update_book(
    State(state): State<crate::AppState>,
    AdminUser(claims): AdminUser,
    ClientIp(ip): ClientIp,
    Path(id): Path<i32>,
    multipart: Result<Multipart, MultipartRejection>,
) -> AppResult<ApiResponse<Book>> {
    let (form, cover) = read_book_form(multipart).await?;
    let book = state.services.catalog.update_book(id, form, cover).await?;

    state
        .services
        .audit
        .record(
            NewOperationLog::new(actions::UPDATE_BOOK, "books")
                .by(claims.user_id)
                .record(id)
                .from_ip(ip)
                .new_value(&book),
        )
        .await;

    Ok(ApiResponse::ok(book))
}

/// Delete a book (admin). Refused while copies are on loan.
#[utoipa::path(
    delete,
    path = "/books/{id}",
    tag = "books",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "Book ID")),
    responses(
        (status = 200, description = "Book deleted"),
        (status = 400, description = "Book has active loans", body = crate::error::ErrorResponse),
        (status = 404, description = "Book not found", body = crate::error::ErrorResponse)
    )
)]
pub async fn delete_book(
    State(state): State<crate::AppState>,
    AdminUser(claims): AdminUser,
    ClientIp(ip): ClientIp,
    Path(id): Path<i32>,
) -> AppResult<ApiResponse<()>> {
    let deleted = state.services.catalog.delete_book(id).await?;

    state
        .services
        .audit
        .record(
            NewOperationLog::new(actions::DELETE_BOOK, "books")
                .by(claims.user_id)
                .record(id)
                .from_ip(ip)
                .old_value(&deleted),
        )
        .await;

    Ok(ApiResponse::message("Book deleted"))
}

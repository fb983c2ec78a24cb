//! Book model, catalog queries and multipart book forms

use std::str::FromStr;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

use super::comment::BookComment;
use crate::error::{AppError, AppResult};

/// Book row joined with its category name
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Book {
    pub id: i32,
    pub isbn: String,
    pub title: String,
    pub author: Option<String>,
    pub publisher: Option<String>,
    #[serde(with = "rust_decimal::serde::float")]
    #[schema(value_type = f64)]
    pub price: Decimal,
    pub description: Option<String>,
    pub category_id: Option<i32>,
    /// Category name
    pub category: Option<String>,
    pub location: Option<String>,
    pub cover_url: Option<String>,
    /// Copies currently on the shelf
    pub stock: i32,
    /// Copies owned by the library
    pub total: i32,
    /// Number of loans ever made
    pub borrowed_count: i32,
    #[serde(with = "rust_decimal::serde::float")]
    #[schema(value_type = f64)]
    pub avg_rating: Decimal,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Book with its approved comments
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct BookDetails {
    #[serde(flatten)]
    pub book: Book,
    pub comments: Vec<BookComment>,
}

/// Catalog search query
#[derive(Debug, Default, Deserialize, IntoParams, ToSchema)]
pub struct BookQuery {
    /// Matches title or author (case-insensitive) or ISBN
    pub keyword: Option<String>,
    pub category_id: Option<i32>,
    /// `created_at` (default), `borrowed_count` or `avg_rating`
    pub sort_by: Option<String>,
    pub page: Option<i64>,
    pub per_page: Option<i64>,
}

/// Query for top-N book listings
#[derive(Debug, Deserialize, IntoParams)]
pub struct LimitQuery {
    pub limit: Option<i64>,
}

/// Catalog sort order, always descending
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BookSort {
    #[default]
    CreatedAt,
    BorrowedCount,
    AvgRating,
}

impl BookSort {
    /// Unknown or missing values fall back to `CreatedAt`
    pub fn from_param(value: Option<&str>) -> Self {
        match value.map(str::trim) {
            Some("borrowed_count") => BookSort::BorrowedCount,
            Some("avg_rating") => BookSort::AvgRating,
            _ => BookSort::CreatedAt,
        }
    }

    pub fn order_by(&self) -> &'static str {
        match self {
            BookSort::CreatedAt => "b.created_at DESC, b.id DESC",
            BookSort::BorrowedCount => "b.borrowed_count DESC, b.id DESC",
            BookSort::AvgRating => "b.avg_rating DESC, b.id DESC",
        }
    }
}

/// Validated fields for a new book
#[derive(Debug, Clone, Validate)]
pub struct NewBook {
    #[validate(length(min = 1, max = 20, message = "ISBN must be 1 to 20 characters"))]
    pub isbn: String,
    #[validate(length(min = 1, max = 128, message = "Title must be 1 to 128 characters"))]
    pub title: String,
    #[validate(length(max = 64, message = "Author is too long"))]
    pub author: Option<String>,
    #[validate(length(max = 64, message = "Publisher is too long"))]
    pub publisher: Option<String>,
    pub price: Decimal,
    pub description: Option<String>,
    pub category_id: Option<i32>,
    #[validate(length(max = 64, message = "Location is too long"))]
    pub location: Option<String>,
    #[validate(range(min = 0, message = "Stock cannot be negative"))]
    pub stock: i32,
    #[validate(range(min = 0, message = "Total cannot be negative"))]
    pub total: i32,
    pub cover_url: Option<String>,
}

/// Partial book update; `None` leaves the column untouched
#[derive(Debug, Clone, Default, Validate)]
pub struct BookChanges {
    #[validate(length(min = 1, max = 20, message = "ISBN must be 1 to 20 characters"))]
    pub isbn: Option<String>,
    #[validate(length(min = 1, max = 128, message = "Title must be 1 to 128 characters"))]
    pub title: Option<String>,
    #[validate(length(max = 64, message = "Author is too long"))]
    pub author: Option<String>,
    #[validate(length(max = 64, message = "Publisher is too long"))]
    pub publisher: Option<String>,
    pub price: Option<Decimal>,
    pub description: Option<String>,
    pub category_id: Option<i32>,
    #[validate(length(max = 64, message = "Location is too long"))]
    pub location: Option<String>,
    #[validate(range(min = 0, message = "Stock cannot be negative"))]
    pub stock: Option<i32>,
    #[validate(range(min = 0, message = "Total cannot be negative"))]
    pub total: Option<i32>,
    pub cover_url: Option<String>,
}

impl BookChanges {
    pub fn is_empty(&self) -> bool {
        self.isbn.is_none()
            && self.title.is_none()
            && self.author.is_none()
            && self.publisher.is_none()
            && self.price.is_none()
            && self.description.is_none()
            && self.category_id.is_none()
            && self.location.is_none()
            && self.stock.is_none()
            && self.total.is_none()
            && self.cover_url.is_none()
    }

    /// Check `stock <= total` once merged with the stored book
    pub fn check_against(&self, current: &Book) -> AppResult<()> {
        check_stock(
            self.stock.unwrap_or(current.stock),
            self.total.unwrap_or(current.total),
        )
    }
}

fn check_stock(stock: i32, total: i32) -> AppResult<()> {
    if stock > total {
        return Err(AppError::Validation(
            "Stock cannot exceed total copies".to_string(),
        ));
    }
    Ok(())
}

/// Raw text fields of a multipart book form
#[derive(Debug, Default, Clone)]
pub struct BookForm {
    pub isbn: Option<String>,
    pub title: Option<String>,
    pub author: Option<String>,
    pub publisher: Option<String>,
    pub price: Option<String>,
    pub description: Option<String>,
    pub category_id: Option<String>,
    pub location: Option<String>,
    pub stock: Option<String>,
    pub total: Option<String>,
}

impl BookForm {
    /// Record a text field. Returns false for unknown field names.
    pub fn set(&mut self, name: &str, value: String) -> bool {
        let slot = match name {
            "isbn" => &mut self.isbn,
            "title" => &mut self.title,
            "author" => &mut self.author,
            "publisher" => &mut self.publisher,
            "price" => &mut self.price,
            "description" => &mut self.description,
            "category_id" => &mut self.category_id,
            "location" => &mut self.location,
            "stock" => &mut self.stock,
            "total" => &mut self.total,
            _ => return false,
        };
        *slot = Some(value);
        true
    }

    pub fn into_new_book(self) -> AppResult<NewBook> {
        let isbn = non_empty(self.isbn)
            .ok_or_else(|| AppError::Validation("ISBN is required".to_string()))?;
        let title = non_empty(self.title)
            .ok_or_else(|| AppError::Validation("Title is required".to_string()))?;

        let book = NewBook {
            isbn,
            title,
            author: non_empty(self.author),
            publisher: non_empty(self.publisher),
            price: parse_price(self.price)?.unwrap_or(Decimal::ZERO),
            description: non_empty(self.description),
            category_id: parse_field("category_id", self.category_id)?,
            location: non_empty(self.location),
            stock: parse_field("stock", self.stock)?.unwrap_or(1),
            total: parse_field("total", self.total)?.unwrap_or(1),
            cover_url: None,
        };
        book.validate()?;
        check_stock(book.stock, book.total)?;
        Ok(book)
    }

    pub fn into_changes(self) -> AppResult<BookChanges> {
        let changes = BookChanges {
            isbn: non_empty(self.isbn),
            title: non_empty(self.title),
            author: non_empty(self.author),
            publisher: non_empty(self.publisher),
            price: parse_price(self.price)?,
            description: non_empty(self.description),
            category_id: parse_field("category_id", self.category_id)?,
            location: non_empty(self.location),
            stock: parse_field("stock", self.stock)?,
            total: parse_field("total", self.total)?,
            cover_url: None,
        };
        changes.validate()?;
        Ok(changes)
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn parse_field<T: FromStr>(name: &str, value: Option<String>) -> AppResult<Option<T>> {
    match non_empty(value) {
        None => Ok(None),
        Some(raw) => raw
            .parse::<T>()
            .map(Some)
            .map_err(|_| AppError::Validation(format!("Invalid value for {}: {}", name, raw))),
    }
}

fn parse_price(value: Option<String>) -> AppResult<Option<Decimal>> {
    let price: Option<Decimal> = parse_field("price", value)?;
    match price {
        Some(p) if p.is_sign_negative() => {
            Err(AppError::Validation("Price cannot be negative".to_string()))
        }
        Some(p) if p >= Decimal::new(1_000_000, 0) => {
            Err(AppError::Validation("Price is too large".to_string()))
        }
        other => Ok(other.map(|p| p.round_dp(2))),
    }
}

/// Multipart body accepted by book create/update (documentation only)
#[allow(dead_code)]
#[derive(ToSchema)]
pub struct BookUpload {
    pub isbn: Option<String>,
    pub title: Option<String>,
    pub author: Option<String>,
    pub publisher: Option<String>,
    pub price: Option<String>,
    pub description: Option<String>,
    pub category_id: Option<i32>,
    pub location: Option<String>,
    pub stock: Option<i32>,
    pub total: Option<i32>,
    /// Cover image (png, jpg, jpeg, gif, webp)
    #[schema(value_type = Option<String>, format = Binary)]
    pub cover: Option<Vec<u8>>,
}

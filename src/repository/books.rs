//! Books repository for database operations

use sqlx::{Pool, Postgres};

use super::{keyword, like_pattern};
use crate::{
    error::{AppError, AppResult},
    models::{
        book::{Book, BookChanges, BookSort, NewBook},
        Page,
    },
};

/// Book columns joined with the category name
const BOOK_SELECT: &str = r#"
    SELECT b.id, b.isbn, b.title, b.author, b.publisher, b.price, b.description,
           b.category_id, c.name AS category, b.location, b.cover_url,
           b.stock, b.total, b.borrowed_count, b.avg_rating,
           b.created_at, b.updated_at
    FROM books b
    LEFT JOIN book_categories c ON c.id = b.category_id
"#;

/// Catalog search filter
#[derive(Debug, Default, Clone)]
pub struct BookFilter<'a> {
    pub keyword: Option<&'a str>,
    pub category_id: Option<i32>,
    pub sort: BookSort,
}

#[derive(Clone)]
pub struct BooksRepository {
    pool: Pool<Postgres>,
}

impl BooksRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    /// Get book by ID
    pub async fn get_by_id(&self, id: i32) -> AppResult<Book> {
        sqlx::query_as::<_, Book>(&format!("{} WHERE b.id = $1", BOOK_SELECT))
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Book with id {} not found", id)))
    }

    /// Search books with pagination
    pub async fn search(&self, filter: &BookFilter<'_>, page: Page) -> AppResult<(Vec<Book>, i64)> {
        let pattern = keyword(filter.keyword).map(like_pattern);

        let mut conditions: Vec<String> = Vec::new();
        let mut param_idx = 1;

        if pattern.is_some() {
            conditions.push(format!(
                "(b.title ILIKE ${0} OR b.author ILIKE ${0} OR b.isbn LIKE ${0})",
                param_idx
            ));
            param_idx += 1;
        }
        if filter.category_id.is_some() {
            conditions.push(format!("b.category_id = ${}", param_idx));
            param_idx += 1;
        }

        let where_clause = if conditions.is_empty() {
            String::new()
        } else {
            format!("WHERE {}", conditions.join(" AND "))
        };

        let count_query = format!("SELECT COUNT(*) FROM books b {}", where_clause);
        let mut count_builder = sqlx::query_scalar::<_, i64>(&count_query);
        if let Some(ref p) = pattern {
            count_builder = count_builder.bind(p);
        }
        if let Some(category_id) = filter.category_id {
            count_builder = count_builder.bind(category_id);
        }
        let total = count_builder.fetch_one(&self.pool).await?;

        let query = format!(
            "{} {} ORDER BY {} LIMIT ${} OFFSET ${}",
            BOOK_SELECT,
            where_clause,
            filter.sort.order_by(),
            param_idx,
            param_idx + 1
        );
        let mut builder = sqlx::query_as::<_, Book>(&query);
        if let Some(ref p) = pattern {
            builder = builder.bind(p);
        }
        if let Some(category_id) = filter.category_id {
            builder = builder.bind(category_id);
        }
        let books = builder
            .bind(page.per_page)
            .bind(page.offset())
            .fetch_all(&self.pool)
            .await?;

        Ok((books, total))
    }

    /// First `limit` books in `sort` order
    pub async fn top(&self, sort: BookSort, limit: i64) -> AppResult<Vec<Book>> {
        let query = format!("{} ORDER BY {} LIMIT $1", BOOK_SELECT, sort.order_by());
        let books = sqlx::query_as::<_, Book>(&query)
            .bind(limit)
            .fetch_all(&self.pool)
            .await?;
        Ok(books)
    }

    /// Whether `isbn` is used by a book other than `exclude_id`
    pub async fn isbn_taken(&self, isbn: &str, exclude_id: Option<i32>) -> AppResult<bool> {
        let taken: bool = sqlx::query_scalar(
            "SELECT EXISTS(SELECT 1 FROM books WHERE isbn = $1 AND ($2::INT IS NULL OR id <> $2))",
        )
        .bind(isbn)
        .bind(exclude_id)
        .fetch_one(&self.pool)
        .await?;
        Ok(taken)
    }

    pub async fn create(&self, book: &NewBook) -> AppResult<Book> {
        let id: i32 = sqlx::query_scalar(
            r#"
            INSERT INTO books (isbn, title, author, publisher, price, description,
                               category_id, location, cover_url, stock, total)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)
            RETURNING id
            "#,
        )
        .bind(&book.isbn)
        .bind(&book.title)
        .bind(&book.author)
        .bind(&book.publisher)
        .bind(book.price)
        .bind(&book.description)
        .bind(book.category_id)
        .bind(&book.location)
        .bind(&book.cover_url)
        .bind(book.stock)
        .bind(book.total)
        .fetch_one(&self.pool)
        .await?;

        self.get_by_id(id).await
    }

    /// Apply a partial update
    pub async fn update(&self, id: i32, data: &BookChanges) -> AppResult<Book> {
        let mut sets = vec!["updated_at = NOW()".to_string()];
        let mut param_idx = 1;

        macro_rules! add_f {
            ($field:expr, $name:expr) => {
                if $field.is_some() {
                    sets.push(format!("{} = ${}", $name, param_idx));
                    param_idx += 1;
                }
            };
        }

        add_f!(data.isbn, "isbn");
        add_f!(data.title, "title");
        add_f!(data.author, "author");
        add_f!(data.publisher, "publisher");
        add_f!(data.price, "price");
        add_f!(data.description, "description");
        add_f!(data.category_id, "category_id");
        add_f!(data.location, "location");
        add_f!(data.stock, "stock");
        add_f!(data.total, "total");
        add_f!(data.cover_url, "cover_url");

        let query = format!(
            "UPDATE books SET {} WHERE id = ${}",
            sets.join(", "),
            param_idx
        );
        let mut builder = sqlx::query(&query);

        macro_rules! bind_f {
            ($field:expr) => {
                if let Some(ref val) = $field {
                    builder = builder.bind(val);
                }
            };
        }

        bind_f!(data.isbn);
        bind_f!(data.title);
        bind_f!(data.author);
        bind_f!(data.publisher);
        bind_f!(data.price);
        bind_f!(data.description);
        bind_f!(data.category_id);
        bind_f!(data.location);
        bind_f!(data.stock);
        bind_f!(data.total);
        bind_f!(data.cover_url);

        let result = builder.bind(id).execute(&self.pool).await?;
        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!("Book with id {} not found", id)));
        }

        self.get_by_id(id).await
    }

    /// Delete a book that has no active loan. Returns the deleted book.
    pub async fn delete(&self, id: i32) -> AppResult<Book> {
        let mut tx = self.pool.begin().await?;

        let book = sqlx::query_as::<_, Book>(&format!("{} WHERE b.id = $1 FOR UPDATE OF b", BOOK_SELECT))
            .bind(id)
            .fetch_optional(&mut *tx)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Book with id {} not found", id)))?;

        let active_loans: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM borrow_records WHERE book_id = $1 AND status = 'borrowed'",
        )
        .bind(id)
        .fetch_one(&mut *tx)
        .await?;

        if active_loans > 0 {
            return Err(AppError::Conflict(format!(
                "Book has {} copies on loan and cannot be deleted",
                active_loans
            )));
        }

        sqlx::query("DELETE FROM books WHERE id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(book)
    }
}

//! Repository layer for database operations

pub mod books;
pub mod borrows;
pub mod categories;
pub mod comments;
pub mod notifications;
pub mod operation_logs;
pub mod reservations;
pub mod users;

use sqlx::{Pool, Postgres};

/// Main repository struct holding database connection pool
#[derive(Clone)]
pub struct Repository {
    pub pool: Pool<Postgres>,
    pub users: users::UsersRepository,
    pub categories: categories::CategoriesRepository,
    pub books: books::BooksRepository,
    pub borrows: borrows::BorrowsRepository,
    pub reservations: reservations::ReservationsRepository,
    pub comments: comments::CommentsRepository,
    pub notifications: notifications::NotificationsRepository,
    pub operation_logs: operation_logs::OperationLogsRepository,
}

impl Repository {
    /// Create a new repository with the given database pool
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self {
            users: users::UsersRepository::new(pool.clone()),
            categories: categories::CategoriesRepository::new(pool.clone()),
            books: books::BooksRepository::new(pool.clone()),
            borrows: borrows::BorrowsRepository::new(pool.clone()),
            reservations: reservations::ReservationsRepository::new(pool.clone()),
            comments: comments::CommentsRepository::new(pool.clone()),
            notifications: notifications::NotificationsRepository::new(pool.clone()),
            operation_logs: operation_logs::OperationLogsRepository::new(pool.clone()),
            pool,
        }
    }
}

/// `%keyword%` pattern for LIKE/ILIKE with wildcards in the keyword escaped
pub(crate) fn like_pattern(keyword: &str) -> String {
    let escaped = keyword
        .replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_");
    format!("%{}%", escaped)
}

/// Trimmed keyword, `None` when blank
pub(crate) fn keyword(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|k| !k.is_empty())
}

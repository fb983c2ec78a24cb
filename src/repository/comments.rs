//! Book comments repository; keeps `books.avg_rating` in step with the ratings

use sqlx::{PgConnection, Pool, Postgres};

use super::reservations::lock_book;
use crate::{
    error::{AppError, AppResult},
    models::{
        comment::{mean_rating, BookComment},
        Page,
    },
};

const COMMENT_SELECT: &str = r#"
    SELECT c.id, c.user_id, u.username, c.book_id, c.rating, c.comment,
           c.is_approved, c.created_at, c.updated_at
    FROM book_comments c
    JOIN users u ON u.id = c.user_id
"#;

/// Recompute a book's average rating from its stored comments
async fn refresh_avg_rating(conn: &mut PgConnection, book_id: i32) -> AppResult<()> {
    let ratings: Vec<i16> = sqlx::query_scalar("SELECT rating FROM book_comments WHERE book_id = $1")
        .bind(book_id)
        .fetch_all(&mut *conn)
        .await?;

    sqlx::query("UPDATE books SET avg_rating = $1, updated_at = NOW() WHERE id = $2")
        .bind(mean_rating(&ratings))
        .bind(book_id)
        .execute(conn)
        .await?;
    Ok(())
}

#[derive(Clone)]
pub struct CommentsRepository {
    pool: Pool<Postgres>,
}

impl CommentsRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    pub async fn get_by_id(&self, id: i32) -> AppResult<BookComment> {
        sqlx::query_as::<_, BookComment>(&format!("{} WHERE c.id = $1", COMMENT_SELECT))
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Comment with id {} not found", id)))
    }

    /// All approved comments of a book, newest first
    pub async fn approved_for_book(&self, book_id: i32) -> AppResult<Vec<BookComment>> {
        let comments = sqlx::query_as::<_, BookComment>(&format!(
            "{} WHERE c.book_id = $1 AND c.is_approved ORDER BY c.created_at DESC, c.id DESC",
            COMMENT_SELECT
        ))
        .bind(book_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(comments)
    }

    /// One page of approved comments, newest first
    pub async fn page_for_book(&self, book_id: i32, page: Page) -> AppResult<(Vec<BookComment>, i64)> {
        let total: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM book_comments WHERE book_id = $1 AND is_approved",
        )
        .bind(book_id)
        .fetch_one(&self.pool)
        .await?;

        let comments = sqlx::query_as::<_, BookComment>(&format!(
            "{} WHERE c.book_id = $1 AND c.is_approved ORDER BY c.created_at DESC, c.id DESC LIMIT $2 OFFSET $3",
            COMMENT_SELECT
        ))
        .bind(book_id)
        .bind(page.per_page)
        .bind(page.offset())
        .fetch_all(&self.pool)
        .await?;

        Ok((comments, total))
    }

    /// Insert or overwrite the user's comment on a book
    pub async fn upsert(
        &self,
        user_id: i32,
        book_id: i32,
        rating: i16,
        comment: Option<&str>,
    ) -> AppResult<BookComment> {
        let mut tx = self.pool.begin().await?;

        lock_book(&mut *tx, book_id).await?;

        let id: i32 = sqlx::query_scalar(
            r#"
            INSERT INTO book_comments (user_id, book_id, rating, comment)
            VALUES ($1, $2, $3, $4)
            ON CONFLICT (user_id, book_id)
            DO UPDATE SET rating = EXCLUDED.rating, comment = EXCLUDED.comment, updated_at = NOW()
            RETURNING id
            "#,
        )
        .bind(user_id)
        .bind(book_id)
        .bind(rating)
        .bind(comment)
        .fetch_one(&mut *tx)
        .await?;

        refresh_avg_rating(&mut *tx, book_id).await?;

        let saved = sqlx::query_as::<_, BookComment>(&format!("{} WHERE c.id = $1", COMMENT_SELECT))
            .bind(id)
            .fetch_one(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(saved)
    }

    pub async fn delete(&self, comment: &BookComment) -> AppResult<()> {
        let mut tx = self.pool.begin().await?;

        lock_book(&mut *tx, comment.book_id).await?;

        let result = sqlx::query("DELETE FROM book_comments WHERE id = $1")
            .bind(comment.id)
            .execute(&mut *tx)
            .await?;
        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!("Comment with id {} not found", comment.id)));
        }

        refresh_avg_rating(&mut *tx, comment.book_id).await?;

        tx.commit().await?;
        Ok(())
    }
}

//! Reservations repository: the per-book waiting queue

use sqlx::{PgConnection, Pool, Postgres};

use super::notifications::insert_with;
use crate::{
    error::{AppError, AppResult},
    models::{
        notification::NewNotification,
        reservation::{next_queue_position, QueueEntry, Reservation, ReservationStatus},
    },
};

const RESERVATION_SELECT: &str = r#"
    SELECT r.id, r.user_id, r.book_id, b.title AS book_title, r.queue_position,
           r.reserve_time, r.status, r.created_at
    FROM reservations r
    JOIN books b ON b.id = r.book_id
"#;

/// Lock a book row for the rest of the transaction and return its title
pub(crate) async fn lock_book(conn: &mut PgConnection, book_id: i32) -> AppResult<String> {
    sqlx::query_scalar::<_, String>("SELECT title FROM books WHERE id = $1 FOR UPDATE")
        .bind(book_id)
        .fetch_optional(conn)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Book with id {} not found", book_id)))
}

/// Move the head of a book's waiting queue to `notified` and tell its owner.
/// Returns the promoted reservation id, if any. Caller must hold the book lock.
pub(crate) async fn promote_next_waiting(
    conn: &mut PgConnection,
    book_id: i32,
    book_title: &str,
) -> AppResult<Option<i32>> {
    let head: Option<(i32, i32)> = sqlx::query_as(
        r#"
        SELECT id, user_id FROM reservations
        WHERE book_id = $1 AND status = 'waiting'
        ORDER BY queue_position
        LIMIT 1
        "#,
    )
    .bind(book_id)
    .fetch_optional(&mut *conn)
    .await?;

    let Some((reservation_id, user_id)) = head else {
        return Ok(None);
    };

    sqlx::query("UPDATE reservations SET status = $1 WHERE id = $2")
        .bind(ReservationStatus::Notified)
        .bind(reservation_id)
        .execute(&mut *conn)
        .await?;

    insert_with(conn, &NewNotification::available(user_id, book_title)).await?;

    tracing::debug!(book_id, reservation_id, user_id, "Reservation promoted to notified");
    Ok(Some(reservation_id))
}

#[derive(Clone)]
pub struct ReservationsRepository {
    pool: Pool<Postgres>,
}

impl ReservationsRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    /// Join the queue for a book. Returns the reservation and its current rank.
    pub async fn reserve(&self, user_id: i32, book_id: i32) -> AppResult<(Reservation, i64)> {
        let mut tx = self.pool.begin().await?;

        let title = lock_book(&mut *tx, book_id).await?;

        let already_queued: bool = sqlx::query_scalar(
            r#"
            SELECT EXISTS(
                SELECT 1 FROM reservations
                WHERE user_id = $1 AND book_id = $2 AND status IN ('waiting', 'notified')
            )
            "#,
        )
        .bind(user_id)
        .bind(book_id)
        .fetch_one(&mut *tx)
        .await?;

        if already_queued {
            return Err(AppError::Conflict(
                "You already have an active reservation for this book".to_string(),
            ));
        }

        let current_max: Option<i32> =
            sqlx::query_scalar("SELECT MAX(queue_position) FROM reservations WHERE book_id = $1")
                .bind(book_id)
                .fetch_one(&mut *tx)
                .await?;
        let position = next_queue_position(current_max);

        let id: i32 = sqlx::query_scalar(
            r#"
            INSERT INTO reservations (user_id, book_id, queue_position, status)
            VALUES ($1, $2, $3, $4)
            RETURNING id
            "#,
        )
        .bind(user_id)
        .bind(book_id)
        .bind(position)
        .bind(ReservationStatus::Waiting)
        .fetch_one(&mut *tx)
        .await?;

        let rank: i64 = sqlx::query_scalar(
            r#"
            SELECT COUNT(*) FROM reservations
            WHERE book_id = $1 AND status IN ('waiting', 'notified') AND queue_position <= $2
            "#,
        )
        .bind(book_id)
        .bind(position)
        .fetch_one(&mut *tx)
        .await?;

        insert_with(&mut *tx, &NewNotification::reserved(user_id, &title, position, rank)).await?;

        let reservation = sqlx::query_as::<_, Reservation>(&format!("{} WHERE r.id = $1", RESERVATION_SELECT))
            .bind(id)
            .fetch_one(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok((reservation, rank))
    }

    /// Cancel the caller's active reservation. Cancelling a notified
    /// reservation hands the book to the next waiting reader.
    pub async fn cancel(&self, id: i32, user_id: i32) -> AppResult<Reservation> {
        let mut tx = self.pool.begin().await?;

        let book_id: i32 = sqlx::query_scalar("SELECT book_id FROM reservations WHERE id = $1")
            .bind(id)
            .fetch_optional(&mut *tx)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Reservation with id {} not found", id)))?;

        let title = lock_book(&mut *tx, book_id).await?;

        let reservation = sqlx::query_as::<_, Reservation>(&format!(
            "{} WHERE r.id = $1 FOR UPDATE OF r",
            RESERVATION_SELECT
        ))
        .bind(id)
        .fetch_one(&mut *tx)
        .await?;

        reservation.ensure_owned_by(user_id)?;
        reservation.ensure_cancellable()?;

        sqlx::query("UPDATE reservations SET status = $1 WHERE id = $2")
            .bind(ReservationStatus::Cancelled)
            .bind(id)
            .execute(&mut *tx)
            .await?;

        if reservation.status == ReservationStatus::Notified {
            promote_next_waiting(&mut *tx, book_id, &title).await?;
        }

        let cancelled = sqlx::query_as::<_, Reservation>(&format!("{} WHERE r.id = $1", RESERVATION_SELECT))
            .bind(id)
            .fetch_one(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(cancelled)
    }

    /// Caller's reservations ordered by queue position
    pub async fn list_for_user(
        &self,
        user_id: i32,
        status: Option<ReservationStatus>,
    ) -> AppResult<Vec<Reservation>> {
        let reservations = sqlx::query_as::<_, Reservation>(&format!(
            "{} WHERE r.user_id = $1 AND ($2::TEXT IS NULL OR r.status = $2) ORDER BY r.queue_position, r.id",
            RESERVATION_SELECT
        ))
        .bind(user_id)
        .bind(status)
        .fetch_all(&self.pool)
        .await?;
        Ok(reservations)
    }

    /// Active queue of a book, head first
    pub async fn queue(&self, book_id: i32) -> AppResult<Vec<QueueEntry>> {
        let exists: bool = sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM books WHERE id = $1)")
            .bind(book_id)
            .fetch_one(&self.pool)
            .await?;
        if !exists {
            return Err(AppError::NotFound(format!("Book with id {} not found", book_id)));
        }

        let entries = sqlx::query_as::<_, QueueEntry>(
            r#"
            SELECT r.id, r.user_id, u.username, r.queue_position,
                   ROW_NUMBER() OVER (ORDER BY r.queue_position) AS rank,
                   r.status, r.reserve_time
            FROM reservations r
            JOIN users u ON u.id = r.user_id
            WHERE r.book_id = $1 AND r.status IN ('waiting', 'notified')
            ORDER BY r.queue_position
            "#,
        )
        .bind(book_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(entries)
    }
}

//! Borrow records repository: borrow, return and renew transactions

use chrono::Utc;
use sqlx::{PgConnection, Pool, Postgres};

use super::{
    notifications::insert_with,
    reservations::{lock_book, promote_next_waiting},
};
use crate::{
    error::{AppError, AppResult},
    models::{
        borrow::{due_after, BorrowFilter, BorrowRecord, BorrowStatus},
        notification::NewNotification,
        reservation::ReservationStatus,
    },
};

const RECORD_SELECT: &str = r#"
    SELECT r.id, r.user_id, u.username, r.book_id, b.title AS book_title,
           r.borrow_time, r.due_time, r.return_time, r.status, r.renewal_count, r.created_at
    FROM borrow_records r
    JOIN users u ON u.id = r.user_id
    JOIN books b ON b.id = r.book_id
"#;

/// Fetch a record on an open connection, locking it when `for_update` is set
async fn fetch_record(conn: &mut PgConnection, id: i32, for_update: bool) -> AppResult<BorrowRecord> {
    let lock = if for_update { " FOR UPDATE OF r" } else { "" };
    sqlx::query_as::<_, BorrowRecord>(&format!("{} WHERE r.id = $1{}", RECORD_SELECT, lock))
        .bind(id)
        .fetch_optional(conn)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Borrow record with id {} not found", id)))
}

#[derive(Clone)]
pub struct BorrowsRepository {
    pool: Pool<Postgres>,
}

impl BorrowsRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    /// Lend one copy of a book for `loan_days`
    pub async fn borrow(&self, user_id: i32, book_id: i32, loan_days: i64) -> AppResult<BorrowRecord> {
        let mut tx = self.pool.begin().await?;

        let title = lock_book(&mut *tx, book_id).await?;

        let stock: i32 = sqlx::query_scalar("SELECT stock FROM books WHERE id = $1")
            .bind(book_id)
            .fetch_one(&mut *tx)
            .await?;
        if stock <= 0 {
            return Err(AppError::Conflict("Book out of stock".to_string()));
        }

        let already_borrowed: bool = sqlx::query_scalar(
            r#"
            SELECT EXISTS(
                SELECT 1 FROM borrow_records
                WHERE user_id = $1 AND book_id = $2 AND status = 'borrowed'
            )
            "#,
        )
        .bind(user_id)
        .bind(book_id)
        .fetch_one(&mut *tx)
        .await?;
        if already_borrowed {
            return Err(AppError::Conflict(
                "You already borrowed this book, please return it first".to_string(),
            ));
        }

        let now = Utc::now();
        let due_time = due_after(now, loan_days);

        let id: i32 = sqlx::query_scalar(
            r#"
            INSERT INTO borrow_records (user_id, book_id, borrow_time, due_time, status)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id
            "#,
        )
        .bind(user_id)
        .bind(book_id)
        .bind(now)
        .bind(due_time)
        .bind(BorrowStatus::Borrowed)
        .fetch_one(&mut *tx)
        .await?;

        sqlx::query(
            r#"
            UPDATE books
            SET stock = stock - 1, borrowed_count = borrowed_count + 1, updated_at = NOW()
            WHERE id = $1
            "#,
        )
        .bind(book_id)
        .execute(&mut *tx)
        .await?;

        // The borrower no longer needs a place in the queue
        sqlx::query(
            r#"
            UPDATE reservations SET status = $1
            WHERE user_id = $2 AND book_id = $3 AND status IN ('waiting', 'notified')
            "#,
        )
        .bind(ReservationStatus::Finished)
        .bind(user_id)
        .bind(book_id)
        .execute(&mut *tx)
        .await?;

        insert_with(&mut *tx, &NewNotification::borrowed(user_id, &title, due_time)).await?;

        let record = fetch_record(&mut *tx, id, false).await?;
        tx.commit().await?;
        Ok(record)
    }

    /// Return a loan and hand the copy to the head of the waiting queue
    pub async fn return_book(&self, record_id: i32, user_id: i32) -> AppResult<BorrowRecord> {
        let mut tx = self.pool.begin().await?;

        let book_id: i32 = sqlx::query_scalar("SELECT book_id FROM borrow_records WHERE id = $1")
            .bind(record_id)
            .fetch_optional(&mut *tx)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Borrow record with id {} not found", record_id)))?;

        let title = lock_book(&mut *tx, book_id).await?;
        let record = fetch_record(&mut *tx, record_id, true).await?;
        record.ensure_owned_by(user_id)?;
        record.ensure_active()?;

        sqlx::query("UPDATE borrow_records SET status = $1, return_time = NOW() WHERE id = $2")
            .bind(BorrowStatus::Returned)
            .bind(record_id)
            .execute(&mut *tx)
            .await?;

        sqlx::query(
            "UPDATE books SET stock = LEAST(stock + 1, total), updated_at = NOW() WHERE id = $1",
        )
        .bind(book_id)
        .execute(&mut *tx)
        .await?;

        insert_with(&mut *tx, &NewNotification::returned(user_id, &title)).await?;
        promote_next_waiting(&mut *tx, book_id, &title).await?;

        let returned = fetch_record(&mut *tx, record_id, false).await?;
        tx.commit().await?;
        Ok(returned)
    }

    /// Extend an active loan by `renewal_days`
    pub async fn renew(
        &self,
        record_id: i32,
        user_id: i32,
        renewal_days: i64,
        max_renewals: i32,
    ) -> AppResult<BorrowRecord> {
        let mut tx = self.pool.begin().await?;

        let record = fetch_record(&mut *tx, record_id, true).await?;
        record.ensure_owned_by(user_id)?;
        record.ensure_renewable(max_renewals)?;

        sqlx::query(
            "UPDATE borrow_records SET due_time = $1, renewal_count = renewal_count + 1 WHERE id = $2",
        )
        .bind(due_after(record.due_time, renewal_days))
        .bind(record_id)
        .execute(&mut *tx)
        .await?;

        let renewed = fetch_record(&mut *tx, record_id, false).await?;
        tx.commit().await?;
        Ok(renewed)
    }

    /// User's records, newest first
    pub async fn list_for_user(&self, user_id: i32, filter: Option<BorrowFilter>) -> AppResult<Vec<BorrowRecord>> {
        let condition = match filter {
            None => "",
            Some(BorrowFilter::Status(_)) => "AND r.status = $2",
            Some(BorrowFilter::Overdue) => "AND r.status = 'borrowed' AND r.due_time < NOW()",
        };
        let query = format!(
            "{} WHERE r.user_id = $1 {} ORDER BY r.borrow_time DESC, r.id DESC",
            RECORD_SELECT, condition
        );

        let mut builder = sqlx::query_as::<_, BorrowRecord>(&query).bind(user_id);
        if let Some(BorrowFilter::Status(status)) = filter {
            builder = builder.bind(status);
        }
        let records = builder.fetch_all(&self.pool).await?;
        Ok(records)
    }

    /// Every overdue loan, oldest due date first
    pub async fn overdue(&self) -> AppResult<Vec<BorrowRecord>> {
        let records = sqlx::query_as::<_, BorrowRecord>(&format!(
            "{} WHERE r.status = 'borrowed' AND r.due_time < NOW() ORDER BY r.due_time, r.id",
            RECORD_SELECT
        ))
        .fetch_all(&self.pool)
        .await?;
        Ok(records)
    }

    /// Every record, newest first
    pub async fn list_all(&self) -> AppResult<Vec<BorrowRecord>> {
        let records = sqlx::query_as::<_, BorrowRecord>(&format!(
            "{} ORDER BY r.borrow_time DESC, r.id DESC",
            RECORD_SELECT
        ))
        .fetch_all(&self.pool)
        .await?;
        Ok(records)
    }
}

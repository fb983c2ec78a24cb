//! Notifications repository

use sqlx::{PgConnection, Pool, Postgres};

use crate::{
    error::{AppError, AppResult},
    models::notification::{NewNotification, Notification},
};

/// Insert a notification on an open connection, typically inside the
/// transaction of the operation that triggered it
pub async fn insert_with(conn: &mut PgConnection, notification: &NewNotification) -> AppResult<()> {
    sqlx::query("INSERT INTO notifications (user_id, title, content, type) VALUES ($1, $2, $3, $4)")
        .bind(notification.user_id)
        .bind(&notification.title)
        .bind(&notification.content)
        .bind(notification.kind)
        .execute(conn)
        .await?;
    Ok(())
}

#[derive(Clone)]
pub struct NotificationsRepository {
    pool: Pool<Postgres>,
}

impl NotificationsRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    pub async fn get_by_id(&self, id: i32) -> AppResult<Notification> {
        sqlx::query_as::<_, Notification>("SELECT * FROM notifications WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Notification with id {} not found", id)))
    }

    /// User's notifications, newest first
    pub async fn list_for_user(&self, user_id: i32, is_read: Option<bool>) -> AppResult<Vec<Notification>> {
        let notifications = sqlx::query_as::<_, Notification>(
            r#"
            SELECT * FROM notifications
            WHERE user_id = $1 AND ($2::BOOLEAN IS NULL OR is_read = $2)
            ORDER BY created_at DESC, id DESC
            "#,
        )
        .bind(user_id)
        .bind(is_read)
        .fetch_all(&self.pool)
        .await?;
        Ok(notifications)
    }

    pub async fn mark_read(&self, id: i32) -> AppResult<Notification> {
        sqlx::query_as::<_, Notification>(
            "UPDATE notifications SET is_read = TRUE WHERE id = $1 RETURNING *",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Notification with id {} not found", id)))
    }

    /// Returns the number of notifications changed
    pub async fn mark_all_read(&self, user_id: i32) -> AppResult<u64> {
        let result = sqlx::query(
            "UPDATE notifications SET is_read = TRUE WHERE user_id = $1 AND is_read = FALSE",
        )
        .bind(user_id)
        .execute(&self.pool)
        .await?;
        Ok(result.rows_affected())
    }

    pub async fn unread_count(&self, user_id: i32) -> AppResult<i64> {
        let count: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM notifications WHERE user_id = $1 AND is_read = FALSE",
        )
        .bind(user_id)
        .fetch_one(&self.pool)
        .await?;
        Ok(count)
    }
}

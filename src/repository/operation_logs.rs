//! Operation (audit) log repository

use sqlx::{Pool, Postgres};

use crate::{
    error::AppResult,
    models::{
        operation_log::{NewOperationLog, OperationLog},
        Page,
    },
};

#[derive(Clone)]
pub struct OperationLogsRepository {
    pool: Pool<Postgres>,
}

impl OperationLogsRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    pub async fn insert(&self, log: &NewOperationLog) -> AppResult<()> {
        sqlx::query(
            r#"
            INSERT INTO operation_logs
                (user_id, action, table_name, record_id, old_value, new_value, ip_address)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            "#,
        )
        .bind(log.user_id)
        .bind(log.action)
        .bind(log.table_name)
        .bind(log.record_id)
        .bind(&log.old_value)
        .bind(&log.new_value)
        .bind(&log.ip_address)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    /// Newest first, optionally restricted to one action
    pub async fn list(&self, action: Option<&str>, page: Page) -> AppResult<(Vec<OperationLog>, i64)> {
        let total: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM operation_logs WHERE ($1::TEXT IS NULL OR action = $1)",
        )
        .bind(action)
        .fetch_one(&self.pool)
        .await?;

        let logs = sqlx::query_as::<_, OperationLog>(
            r#"
            SELECT l.id, l.user_id, u.username, l.action, l.table_name, l.record_id,
                   l.old_value, l.new_value, l.ip_address, l.created_at
            FROM operation_logs l
            LEFT JOIN users u ON u.id = l.user_id
            WHERE ($1::TEXT IS NULL OR l.action = $1)
            ORDER BY l.created_at DESC, l.id DESC
            LIMIT $2 OFFSET $3
            "#,
        )
        .bind(action)
        .bind(page.per_page)
        .bind(page.offset())
        .fetch_all(&self.pool)
        .await?;

        Ok((logs, total))
    }
}

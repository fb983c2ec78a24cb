//! Statistics service

use chrono::Utc;

use crate::{
    api::stats::{
        BorrowReturnRate, CategoryCount, DailyActivity, OverdueEntry, OverviewStats, TopBook,
    },
    error::AppResult,
    repository::Repository,
};

pub const DEFAULT_ACTIVITY_DAYS: i64 = 30;
pub const MAX_ACTIVITY_DAYS: i64 = 365;

#[derive(Clone)]
pub struct StatsService {
    repository: Repository,
}

impl StatsService {
    pub fn new(repository: Repository) -> Self {
        Self { repository }
    }

    pub async fn overview(&self) -> AppResult<OverviewStats> {
        let pool = &self.repository.pool;

        let total_users: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM users")
            .fetch_one(pool)
            .await?;
        let total_books: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM books")
            .fetch_one(pool)
            .await?;
        let currently_borrowed: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM borrow_records WHERE status = 'borrowed'")
                .fetch_one(pool)
                .await?;
        let waiting_reservations: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM reservations WHERE status = 'waiting'")
                .fetch_one(pool)
                .await?;
        let overdue_books: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM borrow_records WHERE status = 'borrowed' AND due_time < NOW()",
        )
        .fetch_one(pool)
        .await?;

        Ok(OverviewStats {
            total_users,
            total_books,
            currently_borrowed,
            waiting_reservations,
            overdue_books,
        })
    }

    /// Books ranked by number of borrow records
    pub async fn top_books(&self, limit: i64) -> AppResult<Vec<TopBook>> {
        let books = sqlx::query_as::<_, TopBook>(
            r#"
            SELECT b.id AS book_id, b.title, b.author, COUNT(r.id) AS borrow_count
            FROM books b
            JOIN borrow_records r ON r.book_id = b.id
            GROUP BY b.id, b.title, b.author
            ORDER BY borrow_count DESC, b.id
            LIMIT $1
            "#,
        )
        .bind(limit)
        .fetch_all(&self.repository.pool)
        .await?;
        Ok(books)
    }

    /// One row per day for the last `days` days, today included
    pub async fn user_activity(&self, days: i64) -> AppResult<Vec<DailyActivity>> {
        let rows = sqlx::query_as::<_, DailyActivity>(
            r#"
            SELECT d::date AS date,
                   COUNT(r.id) AS borrow_count,
                   COUNT(DISTINCT r.user_id) AS active_users
            FROM generate_series(CURRENT_DATE - ($1::INT - 1), CURRENT_DATE, INTERVAL '1 day') AS d
            LEFT JOIN borrow_records r ON r.borrow_time::date = d::date
            GROUP BY d
            ORDER BY d
            "#,
        )
        .bind(days as i32)
        .fetch_all(&self.repository.pool)
        .await?;
        Ok(rows)
    }

    pub async fn category_distribution(&self) -> AppResult<Vec<CategoryCount>> {
        let rows = sqlx::query_as::<_, CategoryCount>(
            r#"
            SELECT c.id AS category_id, c.name AS category, COUNT(b.id) AS book_count
            FROM book_categories c
            LEFT JOIN books b ON b.category_id = c.id
            GROUP BY c.id, c.name
            UNION ALL
            SELECT NULL::INT, NULL::VARCHAR, COUNT(*)
            FROM books
            WHERE category_id IS NULL
            HAVING COUNT(*) > 0
            ORDER BY book_count DESC
            "#,
        )
        .fetch_all(&self.repository.pool)
        .await?;
        Ok(rows)
    }

    pub async fn borrow_return_rate(&self) -> AppResult<BorrowReturnRate> {
        let (total_borrowed, total_returned): (i64, i64) = sqlx::query_as(
            r#"
            SELECT COUNT(*),
                   COUNT(*) FILTER (WHERE status = 'returned')
            FROM borrow_records
            "#,
        )
        .fetch_one(&self.repository.pool)
        .await?;

        Ok(BorrowReturnRate {
            total_borrowed,
            total_returned,
            currently_borrowed: total_borrowed - total_returned,
            return_rate: percentage(total_returned, total_borrowed),
        })
    }

    /// Overdue loans, oldest due date first
    pub async fn overdue_report(&self) -> AppResult<Vec<OverdueEntry>> {
        let now = Utc::now();
        let records = self.repository.borrows.overdue().await?;
        Ok(records
            .into_iter()
            .map(|r| OverdueEntry {
                record_id: r.id,
                user_id: r.user_id,
                username: r.username,
                book_id: r.book_id,
                book_title: r.book_title,
                borrow_time: r.borrow_time,
                due_time: r.due_time,
                overdue_days: (now - r.due_time).num_days(),
            })
            .collect())
    }
}

/// `part / whole` as a percentage rounded to 2 decimals, 0 when `whole` is 0
pub fn percentage(part: i64, whole: i64) -> f64 {
    if whole == 0 {
        return 0.0;
    }
    (part as f64 * 10_000.0 / whole as f64).round() / 100.0
}

/// Window for the activity report: default 30 days, clamped to 1..=365
pub fn activity_days(days: Option<i64>) -> i64 {
    days.unwrap_or(DEFAULT_ACTIVITY_DAYS)
        .clamp(1, MAX_ACTIVITY_DAYS)
}

//! Borrow records and the loan lifecycle rules

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::{IntoParams, ToSchema};

use crate::error::{AppError, AppResult};

text_enum! {
    /// Stored loan state. Overdue is derived from `due_time`, never stored.
    BorrowStatus {
        Borrowed => "borrowed",
        Returned => "returned",
    }
}

const SECONDS_PER_DAY: i64 = 86_400;

/// Borrow record joined with the borrower's username and the book title
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct BorrowRecord {
    pub id: i32,
    pub user_id: i32,
    pub username: String,
    pub book_id: i32,
    pub book_title: String,
    pub borrow_time: DateTime<Utc>,
    pub due_time: DateTime<Utc>,
    pub return_time: Option<DateTime<Utc>>,
    pub status: BorrowStatus,
    pub renewal_count: i32,
    pub created_at: DateTime<Utc>,
}

impl BorrowRecord {
    pub fn ensure_owned_by(&self, user_id: i32) -> AppResult<()> {
        if self.user_id != user_id {
            return Err(AppError::Authorization(
                "This borrow record belongs to another user".to_string(),
            ));
        }
        Ok(())
    }

    pub fn ensure_active(&self) -> AppResult<()> {
        if self.status != BorrowStatus::Borrowed {
            return Err(AppError::Conflict("Book has already been returned".to_string()));
        }
        Ok(())
    }

    pub fn ensure_renewable(&self, max_renewals: i32) -> AppResult<()> {
        self.ensure_active()?;
        if self.renewal_count >= max_renewals {
            return Err(AppError::Conflict(format!(
                "A loan can be renewed at most {} times",
                max_renewals
            )));
        }
        Ok(())
    }

    pub fn is_overdue(&self, now: DateTime<Utc>) -> bool {
        self.status == BorrowStatus::Borrowed && now > self.due_time
    }

    /// Days until due, counting a started day as a whole one; negative once overdue.
    /// `None` for returned loans.
    pub fn days_left(&self, now: DateTime<Utc>) -> Option<i64> {
        match self.status {
            BorrowStatus::Borrowed => {
                let seconds = (self.due_time - now).num_seconds();
                Some(if seconds > 0 {
                    (seconds + SECONDS_PER_DAY - 1) / SECONDS_PER_DAY
                } else {
                    seconds.div_euclid(SECONDS_PER_DAY)
                })
            }
            BorrowStatus::Returned => None,
        }
    }

    pub fn into_view(self, now: DateTime<Utc>) -> BorrowRecordView {
        BorrowRecordView {
            is_overdue: self.is_overdue(now),
            days_left: self.days_left(now),
            record: self,
        }
    }
}

/// Borrow record as returned by the API, with derived overdue fields
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct BorrowRecordView {
    #[serde(flatten)]
    pub record: BorrowRecord,
    pub is_overdue: bool,
    pub days_left: Option<i64>,
}

/// Due date `days` after `from`
pub fn due_after(from: DateTime<Utc>, days: i64) -> DateTime<Utc> {
    from + Duration::days(days)
}

/// Filter for the caller's borrow records
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BorrowFilter {
    Status(BorrowStatus),
    /// Borrowed and past due
    Overdue,
}

impl BorrowFilter {
    /// Empty or missing means no filter
    pub fn from_param(value: Option<&str>) -> AppResult<Option<Self>> {
        match value.map(str::trim).filter(|v| !v.is_empty()) {
            None => Ok(None),
            Some("overdue") => Ok(Some(BorrowFilter::Overdue)),
            Some(other) => other
                .parse::<BorrowStatus>()
                .map(|s| Some(BorrowFilter::Status(s)))
                .map_err(AppError::Validation),
        }
    }
}

#[derive(Debug, Deserialize, IntoParams)]
pub struct BorrowQuery {
    /// `borrowed`, `returned` or `overdue`
    pub status: Option<String>,
}

//! User notifications

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::{IntoParams, ToSchema};

use crate::error::{AppError, AppResult};

text_enum! {
    NotificationType {
        Borrow => "borrow",
        Return => "return",
        Reservation => "reservation",
        Overdue => "overdue",
        System => "system",
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Notification {
    pub id: i32,
    pub user_id: i32,
    pub title: String,
    pub content: String,
    #[sqlx(rename = "type")]
    #[serde(rename = "type")]
    pub kind: NotificationType,
    pub is_read: bool,
    pub created_at: DateTime<Utc>,
}

impl Notification {
    pub fn ensure_owned_by(&self, user_id: i32) -> AppResult<()> {
        if self.user_id != user_id {
            return Err(AppError::Authorization(
                "This notification belongs to another user".to_string(),
            ));
        }
        Ok(())
    }
}

/// Notification to insert
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewNotification {
    pub user_id: i32,
    pub title: String,
    pub content: String,
    pub kind: NotificationType,
}

impl NewNotification {
    pub fn borrowed(user_id: i32, book_title: &str, due_time: DateTime<Utc>) -> Self {
        Self {
            user_id,
            title: "Book borrowed".to_string(),
            content: format!(
                "You borrowed \"{}\". Please return it by {}.",
                book_title,
                due_time.format("%Y-%m-%d")
            ),
            kind: NotificationType::Borrow,
        }
    }

    pub fn returned(user_id: i32, book_title: &str) -> Self {
        Self {
            user_id,
            title: "Book returned".to_string(),
            content: format!("You returned \"{}\".", book_title),
            kind: NotificationType::Return,
        }
    }

    pub fn reserved(user_id: i32, book_title: &str, queue_position: i32, rank: i64) -> Self {
        Self {
            user_id,
            title: "Reservation placed".to_string(),
            content: format!(
                "You reserved \"{}\". Queue number {}, currently {} in line.",
                book_title, queue_position, rank
            ),
            kind: NotificationType::Reservation,
        }
    }

    pub fn available(user_id: i32, book_title: &str) -> Self {
        Self {
            user_id,
            title: "Reserved book available".to_string(),
            content: format!(
                "\"{}\" is now available. Please come and borrow it.",
                book_title
            ),
            kind: NotificationType::Reservation,
        }
    }
}

#[derive(Debug, Deserialize, IntoParams)]
pub struct NotificationQuery {
    /// Filter on the read flag
    pub is_read: Option<bool>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct UnreadCount {
    pub unread_count: i64,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_borrowed_message_carries_due_date() {
        let due = Utc.with_ymd_and_hms(2026, 3, 9, 12, 0, 0).unwrap();
        let n = NewNotification::borrowed(1, "Dune", due);
        assert_eq!(n.kind, NotificationType::Borrow);
        assert!(n.content.contains("2026-03-09"));
        assert!(n.content.contains("Dune"));
    }

    #[test]
    fn test_reserved_message_reports_number_and_rank() {
        let n = NewNotification::reserved(1, "Dune", 7, 2);
        assert_eq!(n.kind, NotificationType::Reservation);
        assert!(n.content.contains("Queue number 7"));
        assert!(n.content.contains("currently 2 in line"));
    }

    #[test]
    fn test_type_serialized_as_type() {
        let n = Notification {
            id: 1,
            user_id: 1,
            title: "t".to_string(),
            content: "c".to_string(),
            kind: NotificationType::Overdue,
            is_read: false,
            created_at: Utc::now(),
        };
        let json = serde_json::to_value(&n).unwrap();
        assert_eq!(json["type"], "overdue");
    }
}

//! Reservation queue model

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::{IntoParams, ToSchema};

use crate::error::{AppError, AppResult};

text_enum! {
    /// Reservation lifecycle: waiting -> notified -> finished, or cancelled
    ReservationStatus {
        Waiting => "waiting",
        Notified => "notified",
        Cancelled => "cancelled",
        Finished => "finished",
    }
}

impl ReservationStatus {
    /// Waiting or notified reservations still hold a place in the queue
    pub fn is_active(&self) -> bool {
        matches!(self, ReservationStatus::Waiting | ReservationStatus::Notified)
    }
}

/// Reservation joined with the book title
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Reservation {
    pub id: i32,
    pub user_id: i32,
    pub book_id: i32,
    pub book_title: String,
    pub queue_position: i32,
    pub reserve_time: DateTime<Utc>,
    pub status: ReservationStatus,
    pub created_at: DateTime<Utc>,
}

impl Reservation {
    pub fn ensure_owned_by(&self, user_id: i32) -> AppResult<()> {
        if self.user_id != user_id {
            return Err(AppError::Authorization(
                "This reservation belongs to another user".to_string(),
            ));
        }
        Ok(())
    }

    pub fn ensure_cancellable(&self) -> AppResult<()> {
        if !self.status.is_active() {
            return Err(AppError::Conflict(format!(
                "Reservation is already {}",
                self.status
            )));
        }
        Ok(())
    }
}

/// One entry of a book's public queue
#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
pub struct QueueEntry {
    pub id: i32,
    pub user_id: i32,
    pub username: String,
    pub queue_position: i32,
    /// 1-based place among active reservations
    pub rank: i64,
    pub status: ReservationStatus,
    pub reserve_time: DateTime<Utc>,
}

/// Result of a successful reservation
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct ReservationTicket {
    #[serde(flatten)]
    pub reservation: Reservation,
    /// Current place in line among active reservations
    pub rank: i64,
}

#[derive(Debug, Deserialize, IntoParams)]
pub struct ReservationQuery {
    pub status: Option<ReservationStatus>,
}

/// Next queue number for a book. Numbers are never reused, even after cancellations.
pub fn next_queue_position(current_max: Option<i32>) -> i32 {
    current_max.unwrap_or(0) + 1
}

#[cfg(test)]
mod tests {
    use super::*;

    fn reservation(status: ReservationStatus) -> Reservation {
        Reservation {
            id: 1,
            user_id: 5,
            book_id: 8,
            book_title: "Dune".to_string(),
            queue_position: 2,
            reserve_time: Utc::now(),
            status,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_next_queue_position() {
        assert_eq!(next_queue_position(None), 1);
        assert_eq!(next_queue_position(Some(1)), 2);
        // cancelled entries keep their numbers, so the max is not the active count
        assert_eq!(next_queue_position(Some(7)), 8);
    }

    #[test]
    fn test_active_statuses() {
        assert!(ReservationStatus::Waiting.is_active());
        assert!(ReservationStatus::Notified.is_active());
        assert!(!ReservationStatus::Cancelled.is_active());
        assert!(!ReservationStatus::Finished.is_active());
    }

    #[test]
    fn test_cancel_rules() {
        assert!(reservation(ReservationStatus::Waiting).ensure_cancellable().is_ok());
        assert!(reservation(ReservationStatus::Notified).ensure_cancellable().is_ok());
        assert!(matches!(
            reservation(ReservationStatus::Cancelled).ensure_cancellable(),
            Err(AppError::Conflict(_))
        ));
        assert!(matches!(
            reservation(ReservationStatus::Finished).ensure_cancellable(),
            Err(AppError::Conflict(_))
        ));
        assert!(matches!(
            reservation(ReservationStatus::Waiting).ensure_owned_by(6),
            Err(AppError::Authorization(_))
        ));
    }
}

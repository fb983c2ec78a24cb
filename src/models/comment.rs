//! Book comments and the rating aggregate

use chrono::{DateTime, Utc};
use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

use crate::error::{AppError, AppResult};

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct BookComment {
    pub id: i32,
    pub user_id: i32,
    pub username: String,
    pub book_id: i32,
    pub rating: i16,
    pub comment: Option<String>,
    pub is_approved: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl BookComment {
    /// Only the author or an administrator may delete a comment
    pub fn ensure_deletable_by(&self, user_id: i32, is_admin: bool) -> AppResult<()> {
        if is_admin || self.user_id == user_id {
            Ok(())
        } else {
            Err(AppError::Authorization(
                "You can only delete your own comments".to_string(),
            ))
        }
    }
}

/// Create or replace the caller's comment on a book
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CommentRequest {
    #[validate(range(min = 1, max = 5, message = "Rating must be between 1 and 5"))]
    pub rating: i16,
    #[validate(length(max = 2000, message = "Comment is too long"))]
    pub comment: Option<String>,
}

/// Comment listing query
#[derive(Debug, Deserialize, IntoParams)]
pub struct CommentQuery {
    pub page: Option<i64>,
    pub per_page: Option<i64>,
}

/// Arithmetic mean of `ratings` rounded half away from zero to 2 decimals, 0 when empty
pub fn mean_rating(ratings: &[i16]) -> Decimal {
    if ratings.is_empty() {
        return Decimal::ZERO;
    }
    let sum: i64 = ratings.iter().map(|r| i64::from(*r)).sum();
    (Decimal::from(sum) / Decimal::from(ratings.len() as i64))
        .round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
}

//! Book category model

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use validator::Validate;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct BookCategory {
    pub id: i32,
    pub name: String,
    pub description: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Create category request
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateCategory {
    #[validate(length(min = 1, max = 32, message = "Category name must be 1 to 32 characters"))]
    pub name: String,
    #[validate(length(max = 256, message = "Description is too long"))]
    pub description: Option<String>,
}

impl CreateCategory {
    pub fn normalized(self) -> Self {
        Self {
            name: self.name.trim().to_string(),
            description: self
                .description
                .map(|d| d.trim().to_string())
                .filter(|d| !d.is_empty()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_blank_name_rejected_after_trim() {
        let req = CreateCategory {
            name: "   ".to_string(),
            description: Some(" ".to_string()),
        }
        .normalized();
        assert!(req.description.is_none());
        assert!(req.validate().is_err());
    }
}

//! Audit trail entries

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::{IntoParams, ToSchema};

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct OperationLog {
    pub id: i32,
    pub user_id: Option<i32>,
    pub username: Option<String>,
    pub action: String,
    pub table_name: String,
    pub record_id: Option<i32>,
    pub old_value: Option<String>,
    pub new_value: Option<String>,
    pub ip_address: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Audit entry to append
#[derive(Debug, Clone)]
pub struct NewOperationLog {
    pub user_id: Option<i32>,
    pub action: &'static str,
    pub table_name: &'static str,
    pub record_id: Option<i32>,
    pub old_value: Option<String>,
    pub new_value: Option<String>,
    pub ip_address: Option<String>,
}

impl NewOperationLog {
    pub fn new(action: &'static str, table_name: &'static str) -> Self {
        Self {
            user_id: None,
            action,
            table_name,
            record_id: None,
            old_value: None,
            new_value: None,
            ip_address: None,
        }
    }

    pub fn by(mut self, user_id: i32) -> Self {
        self.user_id = Some(user_id);
        self
    }

    pub fn record(mut self, record_id: i32) -> Self {
        self.record_id = Some(record_id);
        self
    }

    pub fn from_ip(mut self, ip: Option<String>) -> Self {
        self.ip_address = ip;
        self
    }

    /// Store `value` as JSON text; serialization failures leave the column empty
    pub fn new_value<T: Serialize>(mut self, value: &T) -> Self {
        self.new_value = serde_json::to_string(value).ok();
        self
    }

    pub fn old_value<T: Serialize>(mut self, value: &T) -> Self {
        self.old_value = serde_json::to_string(value).ok();
        self
    }
}

#[derive(Debug, Deserialize, IntoParams)]
pub struct LogQuery {
    /// Exact action name, e.g. `borrow_book`
    pub action: Option<String>,
    pub page: Option<i64>,
    pub per_page: Option<i64>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder() {
        let log = NewOperationLog::new("freeze_user", "users")
            .by(1)
            .record(42)
            .from_ip(Some("10.0.0.1".to_string()))
            .new_value(&serde_json::json!({ "status": "frozen" }));
        assert_eq!(log.user_id, Some(1));
        assert_eq!(log.record_id, Some(42));
        assert_eq!(log.new_value.as_deref(), Some(r#"{"status":"frozen"}"#));
        assert!(log.old_value.is_none());
    }
}

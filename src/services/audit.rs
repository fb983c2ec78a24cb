//! Audit trail of state-changing operations

use crate::{
    error::AppResult,
    models::{operation_log::OperationLog, NewOperationLog, Page},
    repository::Repository,
};

/// Action names written to `operation_logs.action`
pub mod actions {
    pub const BORROW_BOOK: &str = "borrow_book";
    pub const RETURN_BOOK: &str = "return_book";
    pub const RENEW_BOOK: &str = "renew_book";
    pub const RESERVE_BOOK: &str = "reserve_book";
    pub const CANCEL_RESERVATION: &str = "cancel_reservation";
    pub const CREATE_BOOK: &str = "create_book";
    pub const UPDATE_BOOK: &str = "update_book";
    pub const DELETE_BOOK: &str = "delete_book";
    pub const CREATE_CATEGORY: &str = "create_category";
    pub const FREEZE_USER: &str = "freeze_user";
    pub const UNFREEZE_USER: &str = "unfreeze_user";
}

#[derive(Clone)]
pub struct AuditService {
    repository: Repository,
}

impl AuditService {
    pub fn new(repository: Repository) -> Self {
        Self { repository }
    }

    /// Append an entry. The audited operation has already succeeded, so a
    /// failure here is only logged.
    pub async fn record(&self, entry: NewOperationLog) {
        if let Err(e) = self.repository.operation_logs.insert(&entry).await {
            tracing::warn!(
                action = entry.action,
                table = entry.table_name,
                record_id = ?entry.record_id,
                "Failed to write operation log: {}",
                e
            );
        }
    }

    pub async fn list(&self, action: Option<&str>, page: Page) -> AppResult<(Vec<OperationLog>, i64)> {
        let action = action.map(str::trim).filter(|a| !a.is_empty());
        self.repository.operation_logs.list(action, page).await
    }
}

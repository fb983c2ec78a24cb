//! Borrow / return / renew lifecycle

use chrono::Utc;

use crate::{
    config::LendingConfig,
    error::AppResult,
    models::borrow::{BorrowFilter, BorrowRecordView},
    repository::Repository,
};

#[derive(Clone)]
pub struct BorrowsService {
    repository: Repository,
    config: LendingConfig,
}

impl BorrowsService {
    pub fn new(repository: Repository, config: LendingConfig) -> Self {
        Self { repository, config }
    }

    pub async fn borrow(&self, user_id: i32, book_id: i32) -> AppResult<BorrowRecordView> {
        self.repository.users.ensure_active(user_id).await?;
        let record = self
            .repository
            .borrows
            .borrow(user_id, book_id, self.config.loan_days)
            .await?;
        tracing::info!(user_id, book_id, record_id = record.id, due = %record.due_time, "Book borrowed");
        Ok(record.into_view(Utc::now()))
    }

    pub async fn return_book(&self, record_id: i32, user_id: i32) -> AppResult<BorrowRecordView> {
        let record = self.repository.borrows.return_book(record_id, user_id).await?;
        tracing::info!(user_id, book_id = record.book_id, record_id, "Book returned");
        Ok(record.into_view(Utc::now()))
    }

    pub async fn renew(&self, record_id: i32, user_id: i32) -> AppResult<BorrowRecordView> {
        self.repository.users.ensure_active(user_id).await?;
        let record = self
            .repository
            .borrows
            .renew(
                record_id,
                user_id,
                self.config.renewal_days,
                self.config.max_renewals,
            )
            .await?;
        tracing::info!(
            user_id,
            record_id,
            renewals = record.renewal_count,
            due = %record.due_time,
            "Loan renewed"
        );
        Ok(record.into_view(Utc::now()))
    }

    pub async fn my_records(&self, user_id: i32, filter: Option<BorrowFilter>) -> AppResult<Vec<BorrowRecordView>> {
        let now = Utc::now();
        let records = self.repository.borrows.list_for_user(user_id, filter).await?;
        Ok(records.into_iter().map(|r| r.into_view(now)).collect())
    }

    pub async fn my_overdue(&self, user_id: i32) -> AppResult<Vec<BorrowRecordView>> {
        self.my_records(user_id, Some(BorrowFilter::Overdue)).await
    }

    pub async fn export(&self) -> AppResult<Vec<BorrowRecordView>> {
        let now = Utc::now();
        let records = self.repository.borrows.list_all().await?;
        Ok(records.into_iter().map(|r| r.into_view(now)).collect())
    }
}

//! User notifications

use crate::{error::AppResult, models::notification::Notification, repository::Repository};

#[derive(Clone)]
pub struct NotificationsService {
    repository: Repository,
}

impl NotificationsService {
    pub fn new(repository: Repository) -> Self {
        Self { repository }
    }

    pub async fn list(&self, user_id: i32, is_read: Option<bool>) -> AppResult<Vec<Notification>> {
        self.repository.notifications.list_for_user(user_id, is_read).await
    }

    pub async fn mark_read(&self, id: i32, user_id: i32) -> AppResult<Notification> {
        let notification = self.repository.notifications.get_by_id(id).await?;
        notification.ensure_owned_by(user_id)?;
        self.repository.notifications.mark_read(id).await
    }

    pub async fn mark_all_read(&self, user_id: i32) -> AppResult<u64> {
        self.repository.notifications.mark_all_read(user_id).await
    }

    pub async fn unread_count(&self, user_id: i32) -> AppResult<i64> {
        self.repository.notifications.unread_count(user_id).await
    }
}

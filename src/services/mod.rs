//! Business logic services

pub mod audit;
pub mod borrows;
pub mod catalog;
pub mod comments;
pub mod notifications;
pub mod reservations;
pub mod stats;
pub mod storage;
pub mod users;

use crate::{config::AppConfig, error::AppResult, repository::Repository};

/// Container for all services
#[derive(Clone)]
pub struct Services {
    pub users: users::UsersService,
    pub catalog: catalog::CatalogService,
    pub borrows: borrows::BorrowsService,
    pub reservations: reservations::ReservationsService,
    pub comments: comments::CommentsService,
    pub notifications: notifications::NotificationsService,
    pub stats: stats::StatsService,
    pub audit: audit::AuditService,
    repository: Repository,
}

impl Services {
    /// Create all services with the given repository
    pub fn new(repository: Repository, config: &AppConfig) -> Self {
        let storage = storage::CoverStorage::new(&config.uploads);
        Self {
            users: users::UsersService::new(repository.clone(), config.auth.clone()),
            catalog: catalog::CatalogService::new(repository.clone(), storage),
            borrows: borrows::BorrowsService::new(repository.clone(), config.lending.clone()),
            reservations: reservations::ReservationsService::new(repository.clone()),
            comments: comments::CommentsService::new(repository.clone()),
            notifications: notifications::NotificationsService::new(repository.clone()),
            stats: stats::StatsService::new(repository.clone()),
            audit: audit::AuditService::new(repository.clone()),
            repository,
        }
    }

    /// Round trip to the database
    pub async fn ping(&self) -> AppResult<()> {
        sqlx::query("SELECT 1").execute(&self.repository.pool).await?;
        Ok(())
    }
}

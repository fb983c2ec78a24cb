//! Reservation queue service

use crate::{
    error::AppResult,
    models::reservation::{QueueEntry, Reservation, ReservationStatus, ReservationTicket},
    repository::Repository,
};

#[derive(Clone)]
pub struct ReservationsService {
    repository: Repository,
}

impl ReservationsService {
    pub fn new(repository: Repository) -> Self {
        Self { repository }
    }

    pub async fn reserve(&self, user_id: i32, book_id: i32) -> AppResult<ReservationTicket> {
        self.repository.users.ensure_active(user_id).await?;
        let (reservation, rank) = self.repository.reservations.reserve(user_id, book_id).await?;
        tracing::info!(
            user_id,
            book_id,
            queue_position = reservation.queue_position,
            rank,
            "Book reserved"
        );
        Ok(ReservationTicket { reservation, rank })
    }

    pub async fn cancel(&self, reservation_id: i32, user_id: i32) -> AppResult<Reservation> {
        let reservation = self.repository.reservations.cancel(reservation_id, user_id).await?;
        tracing::info!(user_id, reservation_id, "Reservation cancelled");
        Ok(reservation)
    }

    pub async fn my_reservations(
        &self,
        user_id: i32,
        status: Option<ReservationStatus>,
    ) -> AppResult<Vec<Reservation>> {
        self.repository.reservations.list_for_user(user_id, status).await
    }

    pub async fn queue(&self, book_id: i32) -> AppResult<Vec<QueueEntry>> {
        self.repository.reservations.queue(book_id).await
    }
}

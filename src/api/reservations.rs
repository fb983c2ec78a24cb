//! Reservation queue endpoints

use axum::extract::State;

use super::{
    extract::{Path, Query},
    response::ApiResponse,
    AuthenticatedUser, ClientIp,
};
use crate::{
    error::AppResult,
    models::{
        reservation::{QueueEntry, Reservation, ReservationQuery, ReservationTicket},
        NewOperationLog,
    },
    services::audit::actions,
};

/// Join the waiting queue of a book
#[utoipa::path(
    post,
    path = "/reservations/{book_id}",
    tag = "reservations",
    security(("bearer_auth" = [])),
    params(("book_id" = i32, Path, description = "Book ID")),
    responses(
        (status = 200, description = "Reservation placed", body = ReservationTicket),
        (status = 400, description = "Already reserved", body = crate::error::ErrorResponse),
        (status = 403, description = "Account is frozen", body = crate::error::ErrorResponse),
        (status = 404, description = "Book not found", body = crate::error::ErrorResponse)
    )
)]
pub async fn reserve_book(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    ClientIp(ip): ClientIp,
    Path(book_id): Path<i32>,
) -> AppResult<ApiResponse<ReservationTicket>> {
    let ticket = state.services.reservations.reserve(claims.user_id, book_id).await?;

    state
        .services
        .audit
        .record(
            NewOperationLog::new(actions::RESERVE_BOOK, "reservations")
                .by(claims.user_id)
                .record(ticket.reservation.id)
                .from_ip(ip)
                .new_value(&ticket.reservation),
        )
        .await;

    let msg = format!(
        "Reservation placed, queue number {}, currently {} in line",
        ticket.reservation.queue_position, ticket.rank
    );
    Ok(ApiResponse::ok(ticket).msg(msg))
}

/// Cancel own reservation
#[utoipa::path(
    post,
    path = "/reservations/{id}/cancel",
    tag = "reservations",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "Reservation ID")),
    responses(
        (status = 200, description = "Reservation cancelled", body = Reservation),
        (status = 400, description = "Already cancelled or finished", body = crate::error::ErrorResponse),
        (status = 403, description = "Reservation belongs to another user", body = crate::error::ErrorResponse),
        (status = 404, description = "Reservation not found", body = crate::error::ErrorResponse)
    )
)]
pub async fn cancel_reservation(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    ClientIp(ip): ClientIp,
    Path(id): Path<i32>,
) -> AppResult<ApiResponse<Reservation>> {
    let reservation = state.services.reservations.cancel(id, claims.user_id).await?;

    state
        .services
        .audit
        .record(
            NewOperationLog::new(actions::CANCEL_RESERVATION, "reservations")
                .by(claims.user_id)
                .record(id)
                .from_ip(ip),
        )
        .await;

    Ok(ApiResponse::ok(reservation).msg("Reservation cancelled"))
}

/// Current user's reservations ordered by queue position
#[utoipa::path(
    get,
    path = "/reservations/my-reservations",
    tag = "reservations",
    security(("bearer_auth" = [])),
    params(ReservationQuery),
    responses((status = 200, description = "Reservations", body = Vec<Reservation>))
)]
pub async fn my_reservations(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Query(query): Query<ReservationQuery>,
) -> AppResult<ApiResponse<Vec<Reservation>>> {
    let reservations = state
        .services
        .reservations
        .my_reservations(claims.user_id, query.status)
        .await?;
    Ok(ApiResponse::ok(reservations))
}

/// Active waiting queue of a book
#[utoipa::path(
    get,
    path = "/reservations/queue/{book_id}",
    tag = "reservations",
    params(("book_id" = i32, Path, description = "Book ID")),
    responses(
        (status = 200, description = "Queue, head first", body = Vec<QueueEntry>),
        (status = 404, description = "Book not found", body = crate::error::ErrorResponse)
    )
)]
pub async fn book_queue(
    State(state): State<crate::AppState>,
    Path(book_id): Path<i32>,
) -> AppResult<ApiResponse<Vec<QueueEntry>>> {
    let queue = state.services.reservations.queue(book_id).await?;
    Ok(ApiResponse::ok(queue))
}

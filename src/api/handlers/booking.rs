use axum::{extract::{State, Path}, response::IntoResponse, Json};
use crate::state::AppState;
use crate::api::dtos::requests::CreateBookingRequest;
use crate::api::dtos::responses::{BookingCreatedResponse, BookingEnvelope, BookingListResponse, BookingView};
use crate::domain::models::booking::{Booking, BookingRequest, PaymentStatus};
use crate::domain::services::lifecycle::{can_cancel, is_bookable, show_start, today_in};
use crate::error::AppError;
use std::collections::HashSet;
use std::sync::Arc;
use chrono::Utc;
use tracing::{info, warn};

fn normalize_seat_codes(raw: &[String]) -> Vec<String> {
    let mut seen = HashSet::new();
    raw.iter()
        .map(|code| code.trim().to_ascii_uppercase())
        .filter(|code| !code.is_empty() && seen.insert(code.clone()))
        .collect()
}

async fn with_seats(state: &AppState, booking: Booking) -> Result<BookingView, AppError> {
    let seats = state.booking_repo.seat_codes(&booking.id).await?;
    Ok(BookingView { booking, seats })
}

pub async fn create_booking(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<CreateBookingRequest>,
) -> Result<impl IntoResponse, AppError> {
    let customer_id = payload.customer_id.trim();
    if customer_id.is_empty() {
        return Err(AppError::Validation("customerId is required".into()));
    }
    let seat_codes = normalize_seat_codes(&payload.seat_numbers);
    if seat_codes.is_empty() {
        return Err(AppError::Validation("At least one seat is required".into()));
    }

    let showtime = state.showtime_repo.find_by_id(&payload.showtime_id).await?
        .ok_or(AppError::NotFound("Showtime not found".into()))?;
    let movie = state.movie_repo.find_by_id(&showtime.movie_id).await?
        .ok_or(AppError::Internal)?;

    let tz = state.config.timezone;
    let now = Utc::now();
    if !is_bookable(&movie, today_in(tz, now)) {
        return Err(AppError::Validation("Movie is not currently bookable".into()));
    }
    let starts_at = show_start(tz, showtime.show_date, showtime.start_time)
        .ok_or(AppError::Validation("Showtime does not exist in the cinema timezone".into()))?;
    if starts_at <= now {
        return Err(AppError::Validation("Showtime has already started".into()));
    }

    let request = BookingRequest {
        customer_id: customer_id.to_string(),
        showtime_id: showtime.id.clone(),
        seat_codes,
        payment_method: payload.payment_method.trim().to_string(),
        status: PaymentStatus::parse_or_default(payload.payment_status.as_deref()),
    };

    let created = state.booking_repo.create_with_tickets(&request).await.inspect_err(|e| {
        if let AppError::Conflict(msg) = e {
            warn!(showtime_id = %request.showtime_id, "Booking rejected: {}", msg);
        }
    })?;
    info!(booking_id = %created.id, showtime_id = %created.showtime_id, seats = request.seat_codes.len(), "Booking created");

    Ok(Json(BookingCreatedResponse {
        success: true,
        booking_id: created.id,
        booking_code: created.booking_code,
        total_amount: created.total_amount,
        seats: request.seat_codes,
        status: created.status,
    }))
}

pub async fn get_booking(
    State(state): State<Arc<AppState>>,
    Path(booking_id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let booking = state.booking_repo.find_by_id(&booking_id).await?
        .ok_or(AppError::NotFound("Booking not found".into()))?;
    Ok(Json(BookingEnvelope { success: true, booking: with_seats(&state, booking).await? }))
}

pub async fn cancel_booking(
    State(state): State<Arc<AppState>>,
    Path(booking_id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let booking = state.booking_repo.find_by_id(&booking_id).await?
        .ok_or(AppError::NotFound("Booking not found".into()))?;

    if booking.is_cancelled() {
        return Ok(Json(BookingEnvelope { success: true, booking: with_seats(&state, booking).await? }));
    }

    let showtime = state.showtime_repo.find_by_id(&booking.showtime_id).await?
        .ok_or(AppError::Internal)?;
    let starts_at = show_start(state.config.timezone, showtime.show_date, showtime.start_time)
        .ok_or(AppError::Internal)?;
    if !can_cancel(starts_at, Utc::now()) {
        return Err(AppError::Policy("Cannot cancel within 24 hours".into()));
    }

    let cancelled = state.booking_repo.cancel(&booking).await?;
    info!(booking_id = %cancelled.id, "Booking cancelled");
    Ok(Json(BookingEnvelope { success: true, booking: with_seats(&state, cancelled).await? }))
}

pub async fn list_customer_bookings(
    State(state): State<Arc<AppState>>,
    Path(customer_id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let bookings = state.booking_repo.list_by_customer(&customer_id).await?;
    let mut views = Vec::with_capacity(bookings.len());
    for booking in bookings {
        views.push(with_seats(&state, booking).await?);
    }
    Ok(Json(BookingListResponse { success: true, bookings: views }))
}

use axum::{extract::{State, Path, Query}, response::IntoResponse, Json};
use crate::state::AppState;
use crate::api::extractors::operator::OperatorKey;
use crate::api::dtos::requests::ShowtimeListQuery;
use crate::api::dtos::responses::{
    AdminShowtimesResponse, AvailabilityResponse, SeatMapResponse, SeatMapRow, SeatState,
    ShowtimeListResponse, ShowtimeTime,
};
use crate::api::handlers::parse_date;
use crate::domain::services::lifecycle::{is_bookable, today_in};
use crate::domain::services::seat_map::layout;
use crate::error::AppError;
use chrono::Utc;
use std::collections::HashSet;
use std::sync::Arc;

pub async fn list_movie_showtimes(
    State(state): State<Arc<AppState>>,
    Path(movie_id): Path<String>,
    Query(query): Query<ShowtimeListQuery>,
) -> Result<impl IntoResponse, AppError> {
    let date = parse_date(&query.date, "date")?;
    let movie = state.movie_repo.find_by_id(&movie_id).await?
        .ok_or(AppError::NotFound("Movie not found".into()))?;
    let screen = state.theater_repo.find_screen_ref(query.theater_id, query.screen_number).await?
        .ok_or(AppError::NotFound("Screen not found".into()))?;

    if !is_bookable(&movie, today_in(state.config.timezone, Utc::now())) {
        return Ok(Json(ShowtimeListResponse { success: true, times: vec![] }));
    }

    let times = state.showtime_repo.list_occupancy(&movie.id, screen.screen_id, date).await?
        .into_iter()
        .map(|o| ShowtimeTime {
            available: o.sold < o.capacity as i64,
            time: o.start_time.format("%H:%M").to_string(),
            id: o.id,
        })
        .collect();

    Ok(Json(ShowtimeListResponse { success: true, times }))
}

pub async fn list_admin_showtimes(
    State(state): State<Arc<AppState>>,
    _operator: OperatorKey,
    Path(movie_id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    state.movie_repo.find_by_id(&movie_id).await?
        .ok_or(AppError::NotFound("Movie not found".into()))?;
    let showtimes = state.showtime_repo.list_by_movie(&movie_id).await?;
    Ok(Json(AdminShowtimesResponse { success: true, movie_id, showtimes }))
}

pub async fn get_availability(
    State(state): State<Arc<AppState>>,
    Path(showtime_id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    state.showtime_repo.find_by_id(&showtime_id).await?
        .ok_or(AppError::NotFound("Showtime not found".into()))?;
    let unavailable_seats = state.booking_repo.unavailable_seats(&showtime_id).await?;
    Ok(Json(AvailabilityResponse { success: true, unavailable_seats }))
}

pub async fn get_seat_map(
    State(state): State<Arc<AppState>>,
    Path(showtime_id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let showtime = state.showtime_repo.find_by_id(&showtime_id).await?
        .ok_or(AppError::NotFound("Showtime not found".into()))?;
    let screen = state.theater_repo.find_screen(showtime.screen_id).await?
        .ok_or(AppError::Internal)?;
    let taken: HashSet<String> = state.booking_repo.unavailable_seats(&showtime_id).await?
        .into_iter()
        .collect();

    let rows = layout(screen.row_count, &screen.sections)
        .into_iter()
        .map(|row| SeatMapRow {
            row: row.row,
            sections: row.sections
                .into_iter()
                .map(|section| {
                    section
                        .into_iter()
                        .map(|code| SeatState { available: !taken.contains(&code), code })
                        .collect()
                })
                .collect(),
        })
        .collect();

    Ok(Json(SeatMapResponse { success: true, showtime_id, rows }))
}

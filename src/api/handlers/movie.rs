use axum::{extract::{State, Path}, response::IntoResponse, Json};
use crate::state::AppState;
use crate::api::extractors::operator::OperatorKey;
use crate::api::dtos::requests::{CreateMovieRequest, SetPublishedRequest};
use crate::api::dtos::responses::MovieView;
use crate::api::handlers::parse_date;
use crate::domain::models::movie::{Movie, NewMovieParams};
use crate::domain::services::lifecycle::{is_bookable, today_in};
use crate::error::AppError;
use chrono::{NaiveDate, Utc};
use serde_json::json;
use std::sync::Arc;
use tracing::info;

pub const MAX_DURATION_MIN: i32 = 1439;
pub const MAX_SHOWING_DAYS: i32 = 366;
/// Per-seat price ceiling in minor currency units.
pub const MAX_BASE_PRICE: i64 = 100_000_000;

fn view(movie: Movie, today: NaiveDate) -> MovieView {
    MovieView {
        showing_until: movie.showing_until().format("%Y-%m-%d").to_string(),
        bookable: is_bookable(&movie, today),
        movie,
    }
}

pub(crate) fn validate_run(duration_min: i32, showing_days: i32) -> Result<(), AppError> {
    if duration_min < 1 || duration_min > MAX_DURATION_MIN {
        return Err(AppError::Validation(format!("Duration must be between 1 and {} minutes", MAX_DURATION_MIN)));
    }
    if showing_days < 1 || showing_days > MAX_SHOWING_DAYS {
        return Err(AppError::Validation(format!("Showing days must be between 1 and {}", MAX_SHOWING_DAYS)));
    }
    Ok(())
}

/// Movies a customer can book today. Expired and unpublished movies are
/// filtered out here rather than flagged in storage.
pub async fn list_movies(
    State(state): State<Arc<AppState>>,
) -> Result<impl IntoResponse, AppError> {
    let today = today_in(state.config.timezone, Utc::now());
    let movies: Vec<MovieView> = state.movie_repo.list().await?
        .into_iter()
        .filter(|m| is_bookable(m, today))
        .map(|m| view(m, today))
        .collect();
    Ok(Json(movies))
}

pub async fn get_movie(
    State(state): State<Arc<AppState>>,
    Path(movie_id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let movie = state.movie_repo.find_by_id(&movie_id).await?
        .ok_or(AppError::NotFound("Movie not found".into()))?;
    Ok(Json(view(movie, today_in(state.config.timezone, Utc::now()))))
}

pub async fn create_movie(
    State(state): State<Arc<AppState>>,
    _operator: OperatorKey,
    Json(payload): Json<CreateMovieRequest>,
) -> Result<impl IntoResponse, AppError> {
    let title = payload.title.trim();
    if title.is_empty() {
        return Err(AppError::Validation("Title is required".into()));
    }
    validate_run(payload.duration_minutes, payload.showing_days)?;
    if payload.base_price < 0 || payload.base_price > MAX_BASE_PRICE {
        return Err(AppError::Validation(format!("Base price must be between 0 and {}", MAX_BASE_PRICE)));
    }
    let release_date = parse_date(&payload.release_date, "releaseDate")?;

    let movie = Movie::new(NewMovieParams {
        title: title.to_string(),
        duration_min: payload.duration_minutes,
        release_date,
        showing_days: payload.showing_days,
        base_price: payload.base_price,
        published: payload.published.unwrap_or(true),
    });
    let created = state.movie_repo.create(&movie).await?;
    info!(movie_id = %created.id, "Movie created");
    Ok(Json(created))
}

pub async fn set_published(
    State(state): State<Arc<AppState>>,
    _operator: OperatorKey,
    Path(movie_id): Path<String>,
    Json(payload): Json<SetPublishedRequest>,
) -> Result<impl IntoResponse, AppError> {
    let updated = state.movie_repo.set_published(&movie_id, payload.published).await?;
    info!(movie_id = %movie_id, published = payload.published, "Movie visibility changed");
    Ok(Json(updated))
}

pub async fn delete_movie(
    State(state): State<Arc<AppState>>,
    _operator: OperatorKey,
    Path(movie_id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    state.movie_repo.delete(&movie_id).await?;
    info!(movie_id = %movie_id, "Movie deleted");
    Ok(Json(json!({ "success": true })))
}

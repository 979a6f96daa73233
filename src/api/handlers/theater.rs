use axum::{extract::{State, Path}, response::IntoResponse, Json};
use crate::state::AppState;
use crate::api::extractors::operator::OperatorKey;
use crate::api::dtos::requests::{CreateScreenRequest, CreateTheaterRequest};
use crate::api::dtos::responses::ScreenLayoutResponse;
use crate::domain::models::theater::{NewScreen, TheaterWithScreens};
use crate::domain::services::seat_map::{layout, seat_specs, validate_layout};
use crate::error::{is_unique_violation, AppError};
use std::sync::Arc;
use tracing::info;

pub async fn list_theaters(
    State(state): State<Arc<AppState>>,
) -> Result<impl IntoResponse, AppError> {
    let theaters = state.theater_repo.list().await?;
    let mut result = Vec::with_capacity(theaters.len());
    for theater in theaters {
        let screens = state.theater_repo.list_screens(theater.id).await?;
        result.push(TheaterWithScreens { theater, screens });
    }
    Ok(Json(result))
}

pub async fn create_theater(
    State(state): State<Arc<AppState>>,
    _operator: OperatorKey,
    Json(payload): Json<CreateTheaterRequest>,
) -> Result<impl IntoResponse, AppError> {
    let name = payload.name.trim();
    if name.is_empty() {
        return Err(AppError::Validation("Theater name is required".into()));
    }
    let created = state.theater_repo.create(name, payload.location.trim()).await?;
    info!(theater_id = created.id, "Theater created");
    Ok(Json(created))
}

pub async fn create_screen(
    State(state): State<Arc<AppState>>,
    _operator: OperatorKey,
    Path(theater_id): Path<i64>,
    Json(payload): Json<CreateScreenRequest>,
) -> Result<impl IntoResponse, AppError> {
    state.theater_repo.find_by_id(theater_id).await?
        .ok_or(AppError::NotFound("Theater not found".into()))?;

    if payload.screen_number < 1 {
        return Err(AppError::Validation("Screen number must be positive".into()));
    }
    validate_layout(payload.rows, &payload.sections).map_err(AppError::Validation)?;

    let screen = NewScreen {
        theater_id,
        screen_number: payload.screen_number,
        row_count: payload.rows,
        sections: payload.sections,
    };
    let seats = seat_specs(screen.row_count, &screen.sections);

    let created = state.theater_repo.create_screen(&screen, &seats).await.map_err(|e| match e {
        AppError::Database(ref db) if is_unique_violation(db) => AppError::Conflict(format!(
            "Screen {} already exists in this theater",
            screen.screen_number
        )),
        other => other,
    })?;

    info!(theater_id, screen_id = created.id, seats = seats.len(), "Screen created");
    Ok(Json(created))
}

pub async fn screen_layout(
    State(state): State<Arc<AppState>>,
    Path(screen_id): Path<i64>,
) -> Result<impl IntoResponse, AppError> {
    let screen = state.theater_repo.find_screen(screen_id).await?
        .ok_or(AppError::NotFound("Screen not found".into()))?;

    Ok(Json(ScreenLayoutResponse {
        success: true,
        screen_id: screen.id,
        capacity: screen.capacity,
        rows: layout(screen.row_count, &screen.sections),
    }))
}

use axum::{extract::State, response::IntoResponse, Json};
use crate::state::AppState;
use crate::api::extractors::operator::OperatorKey;
use crate::api::dtos::requests::ScheduleRequest;
use crate::api::dtos::responses::ScheduleResponse;
use crate::api::handlers::{movie::validate_run, parse_date};
use crate::domain::models::showtime::SchedulePlan;
use crate::domain::services::scheduling::{generate_candidates, parse_start_times};
use crate::error::AppError;
use std::collections::HashSet;
use std::sync::Arc;
use tracing::{debug, info};

/// Regenerates a movie's whole schedule. Every (theater, screen, time, day)
/// combination is conflict-checked and the batch commits all-or-nothing.
pub async fn create_schedule(
    State(state): State<Arc<AppState>>,
    _operator: OperatorKey,
    Json(payload): Json<ScheduleRequest>,
) -> Result<impl IntoResponse, AppError> {
    validate_run(payload.duration_minutes, payload.showing_days)?;
    let release_date = parse_date(&payload.release_date, "releaseDate")?;
    let times = parse_start_times(&payload.times).map_err(AppError::Validation)?;

    let mut seen_theaters = HashSet::new();
    let theater_ids: Vec<i64> = payload.theater_ids.iter().copied().filter(|id| seen_theaters.insert(*id)).collect();
    let mut seen_screens = HashSet::new();
    let screen_numbers: Vec<i32> = payload.screen_numbers.iter().copied().filter(|n| seen_screens.insert(*n)).collect();

    let mut screens = Vec::new();
    for theater_id in theater_ids {
        state.theater_repo.find_by_id(theater_id).await?
            .ok_or_else(|| AppError::NotFound(format!("Theater {} not found", theater_id)))?;

        for screen_number in &screen_numbers {
            match state.theater_repo.find_screen_ref(theater_id, *screen_number).await? {
                Some(screen) => screens.push(screen),
                None => debug!(theater_id, screen_number, "Screen not present in theater, skipping"),
            }
        }
    }

    let candidates = generate_candidates(&screens, &times, release_date, payload.showing_days, payload.duration_minutes)
        .map_err(AppError::Validation)?;
    let plan = SchedulePlan {
        movie_id: payload.movie_id.clone(),
        duration_min: payload.duration_minutes,
        release_date,
        showing_days: payload.showing_days,
        candidates,
    };

    let outcome = state.showtime_repo.replace_for_movie(&plan).await?;
    info!(
        movie_id = %plan.movie_id,
        created = outcome.created,
        kept = outcome.kept,
        removed = outcome.removed,
        "Schedule committed"
    );

    Ok(Json(ScheduleResponse {
        success: true,
        movie_id: plan.movie_id,
        created: outcome.created,
        kept: outcome.kept,
        removed: outcome.removed,
    }))
}

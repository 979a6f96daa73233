use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;
use tracing::error;
use crate::domain::services::scheduling::ScheduleConflict;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
    #[error("Resource not found: {0}")]
    NotFound(String),
    #[error("Unauthorized")]
    Unauthorized,
    #[error("Conflict: {0}")]
    Conflict(String),
    #[error("Schedule conflict: {}", .0.message())]
    ScheduleConflict(ScheduleConflict),
    #[error("Invalid input: {0}")]
    Validation(String),
    #[error("Policy violation: {0}")]
    Policy(String),
    #[error("Internal server error")]
    Internal,
}

impl AppError {
    pub fn seat_taken(code: &str) -> Self {
        AppError::Conflict(format!("Seat '{}' was already booked", code))
    }
}

// 2067 = SQLite unique constraint, 23505 = PostgreSQL unique violation
pub fn is_unique_violation(err: &sqlx::Error) -> bool {
    err.as_database_error()
        .and_then(|db_err| db_err.code())
        .is_some_and(|code| code == "2067" || code == "23505")
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            AppError::Database(e) => {
                if is_unique_violation(e) {
                    return (
                        StatusCode::CONFLICT,
                        Json(json!({ "success": false, "message": "Resource already exists (duplicate entry)" }))
                    ).into_response();
                }

                error!("Database error: {:?}", e);
                (StatusCode::INTERNAL_SERVER_ERROR, "Internal server error".to_string())
            }
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, msg.clone()),
            AppError::Unauthorized => (StatusCode::UNAUTHORIZED, "Unauthorized".to_string()),
            AppError::Conflict(msg) => (StatusCode::CONFLICT, msg.clone()),
            AppError::ScheduleConflict(conflict) => {
                return (
                    StatusCode::CONFLICT,
                    Json(json!({
                        "success": false,
                        "code": "SCHEDULE_CONFLICT",
                        "message": conflict.message(),
                        "conflict": conflict,
                    }))
                ).into_response();
            }
            AppError::Validation(msg) => (StatusCode::BAD_REQUEST, msg.clone()),
            AppError::Policy(msg) => (StatusCode::UNPROCESSABLE_ENTITY, msg.clone()),
            AppError::Internal => (StatusCode::INTERNAL_SERVER_ERROR, "Internal error".to_string()),
        };

        let body = Json(json!({
            "success": false,
            "message": message
        }));

        (status, body).into_response()
    }
}

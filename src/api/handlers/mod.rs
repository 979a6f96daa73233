pub mod booking;
pub mod health;
pub mod movie;
pub mod schedule;
pub mod showtime;
pub mod theater;

use crate::error::AppError;
use chrono::NaiveDate;

pub(crate) fn parse_date(raw: &str, field: &str) -> Result<NaiveDate, AppError> {
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d")
        .map_err(|_| AppError::Validation(format!("Invalid {} (expected YYYY-MM-DD)", field)))
}

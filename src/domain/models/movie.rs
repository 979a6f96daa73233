use serde::{Deserialize, Serialize};
use chrono::{DateTime, Duration, NaiveDate, Utc};
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, Serialize, Deserialize, FromRow, Clone)]
#[serde(rename_all = "camelCase")]
pub struct Movie {
    pub id: String,
    pub title: String,
    pub duration_min: i32,
    pub release_date: NaiveDate,
    pub showing_days: i32,
    pub base_price: i64,
    pub published: bool,
    pub created_at: DateTime<Utc>,
}

pub struct NewMovieParams {
    pub title: String,
    pub duration_min: i32,
    pub release_date: NaiveDate,
    pub showing_days: i32,
    pub base_price: i64,
    pub published: bool,
}

impl Movie {
    pub fn new(params: NewMovieParams) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            title: params.title,
            duration_min: params.duration_min,
            release_date: params.release_date,
            showing_days: params.showing_days,
            base_price: params.base_price,
            published: params.published,
            created_at: Utc::now(),
        }
    }

    /// Last calendar day on which the movie still counts as showing.
    /// Saturates at `NaiveDate::MAX` for runs stored past the calendar range.
    pub fn showing_until(&self) -> NaiveDate {
        self.release_date
            .checked_add_signed(Duration::days(self.showing_days as i64))
            .unwrap_or(NaiveDate::MAX)
    }
}

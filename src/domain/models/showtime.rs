use serde::{Deserialize, Serialize};
use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, Serialize, Deserialize, FromRow, Clone)]
#[serde(rename_all = "camelCase")]
pub struct Showtime {
    pub id: String,
    pub movie_id: String,
    pub screen_id: i64,
    pub show_date: NaiveDate,
    pub start_time: NaiveTime,
    pub end_time: NaiveTime,
    #[serde(skip)]
    pub revision: i64,
    pub created_at: DateTime<Utc>,
}

impl Showtime {
    pub fn from_candidate(movie_id: &str, candidate: &ShowtimeCandidate) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            movie_id: movie_id.to_string(),
            screen_id: candidate.screen.screen_id,
            show_date: candidate.show_date,
            start_time: candidate.start_time,
            end_time: candidate.end_time,
            revision: 0,
            created_at: Utc::now(),
        }
    }
}

/// One generated (screen, date, time) instance waiting for the conflict check.
#[derive(Debug, Clone)]
pub struct ShowtimeCandidate {
    pub screen: super::theater::ScreenRef,
    pub show_date: NaiveDate,
    pub start_time: NaiveTime,
    pub end_time: NaiveTime,
}

/// A showtime already occupying a screen, joined with the labels a conflict
/// report needs.
#[derive(Debug, Clone, FromRow)]
pub struct ShowtimeSlot {
    pub movie_title: String,
    pub theater_name: String,
    pub screen_number: i32,
    pub screen_id: i64,
    pub show_date: NaiveDate,
    pub start_time: NaiveTime,
    pub end_time: NaiveTime,
}

/// Everything the store needs to commit a movie's schedule in one transaction.
#[derive(Debug, Clone)]
pub struct SchedulePlan {
    pub movie_id: String,
    pub duration_min: i32,
    pub release_date: NaiveDate,
    pub showing_days: i32,
    pub candidates: Vec<ShowtimeCandidate>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ScheduleOutcome {
    pub created: usize,
    pub kept: usize,
    pub removed: usize,
}

#[derive(Debug, Clone, FromRow)]
pub struct ShowtimeOccupancy {
    pub id: String,
    pub start_time: NaiveTime,
    pub capacity: i32,
    pub sold: i64,
}

use serde::{Deserialize, Serialize};
use chrono::{DateTime, Utc};
use sqlx::types::Json;
use sqlx::FromRow;

#[derive(Debug, Serialize, Deserialize, FromRow, Clone)]
#[serde(rename_all = "camelCase")]
pub struct Theater {
    pub id: i64,
    pub name: String,
    pub location: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Serialize, Deserialize, FromRow, Clone)]
#[serde(rename_all = "camelCase")]
pub struct Screen {
    pub id: i64,
    pub theater_id: i64,
    pub screen_number: i32,
    pub row_count: i32,
    pub sections: Json<Vec<i32>>,
    pub capacity: i32,
    pub created_at: DateTime<Utc>,
}

/// Screen fields needed before the row exists.
pub struct NewScreen {
    pub theater_id: i64,
    pub screen_number: i32,
    pub row_count: i32,
    pub sections: Vec<i32>,
}

impl NewScreen {
    pub fn capacity(&self) -> i32 {
        self.row_count * self.sections.iter().sum::<i32>()
    }
}

/// A screen resolved from a (theater, screen number) pair, carrying the
/// labels a schedule conflict has to report.
#[derive(Debug, Clone, FromRow)]
pub struct ScreenRef {
    pub screen_id: i64,
    pub screen_number: i32,
    pub theater_id: i64,
    pub theater_name: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TheaterWithScreens {
    #[serde(flatten)]
    pub theater: Theater,
    pub screens: Vec<Screen>,
}

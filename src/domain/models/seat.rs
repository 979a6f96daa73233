use serde::{Deserialize, Serialize};
use sqlx::FromRow;

#[derive(Debug, Serialize, Deserialize, FromRow, Clone)]
#[serde(rename_all = "camelCase")]
pub struct Seat {
    pub id: i64,
    pub screen_id: i64,
    pub code: String,
    pub row_label: String,
    pub seat_number: i32,
}

/// A seat before it is persisted; produced by the seat map.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SeatSpec {
    pub code: String,
    pub row_label: String,
    pub seat_number: i32,
}

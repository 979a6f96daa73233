use crate::domain::models::{booking::Booking, movie::Movie, showtime::Showtime};
use crate::domain::services::seat_map::SeatRow;
use serde::Serialize;

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MovieView {
    #[serde(flatten)]
    pub movie: Movie,
    pub showing_until: String,
    pub bookable: bool,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ScheduleResponse {
    pub success: bool,
    pub movie_id: String,
    pub created: usize,
    pub kept: usize,
    pub removed: usize,
}

#[derive(Serialize)]
pub struct ShowtimeTime {
    pub id: String,
    pub time: String,
    pub available: bool,
}

#[derive(Serialize)]
pub struct ShowtimeListResponse {
    pub success: bool,
    pub times: Vec<ShowtimeTime>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AdminShowtimesResponse {
    pub success: bool,
    pub movie_id: String,
    pub showtimes: Vec<Showtime>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AvailabilityResponse {
    pub success: bool,
    pub unavailable_seats: Vec<String>,
}

#[derive(Serialize)]
pub struct SeatState {
    pub code: String,
    pub available: bool,
}

#[derive(Serialize)]
pub struct SeatMapRow {
    pub row: String,
    pub sections: Vec<Vec<SeatState>>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SeatMapResponse {
    pub success: bool,
    pub showtime_id: String,
    pub rows: Vec<SeatMapRow>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BookingCreatedResponse {
    pub success: bool,
    pub booking_id: String,
    pub booking_code: String,
    pub total_amount: i64,
    pub seats: Vec<String>,
    pub status: String,
}

#[derive(Serialize)]
pub struct BookingView {
    #[serde(flatten)]
    pub booking: Booking,
    pub seats: Vec<String>,
}

#[derive(Serialize)]
pub struct BookingEnvelope {
    pub success: bool,
    pub booking: BookingView,
}

#[derive(Serialize)]
pub struct BookingListResponse {
    pub success: bool,
    pub bookings: Vec<BookingView>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ScreenLayoutResponse {
    pub success: bool,
    pub screen_id: i64,
    pub capacity: i32,
    pub rows: Vec<SeatRow>,
}

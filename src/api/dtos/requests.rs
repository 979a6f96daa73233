use serde::Deserialize;

#[derive(Deserialize)]
pub struct CreateTheaterRequest {
    pub name: String,
    pub location: String,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateScreenRequest {
    pub screen_number: i32,
    pub rows: i32,
    pub sections: Vec<i32>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateMovieRequest {
    pub title: String,
    pub duration_minutes: i32,
    pub release_date: String,
    pub showing_days: i32,
    pub base_price: i64,
    pub published: Option<bool>,
}

#[derive(Deserialize)]
pub struct SetPublishedRequest {
    pub published: bool,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScheduleRequest {
    pub movie_id: String,
    pub duration_minutes: i32,
    pub theater_ids: Vec<i64>,
    pub screen_numbers: Vec<i32>,
    pub times: Vec<String>,
    pub release_date: String,
    pub showing_days: i32,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShowtimeListQuery {
    pub theater_id: i64,
    pub screen_number: i32,
    pub date: String,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateBookingRequest {
    pub customer_id: String,
    pub showtime_id: String,
    pub seat_numbers: Vec<String>,
    pub payment_method: String,
    pub payment_status: Option<String>,
}

use std::sync::Arc;
use crate::domain::ports::{BookingRepository, MovieRepository, ShowtimeRepository, TheaterRepository};
use crate::config::Config;

#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    pub theater_repo: Arc<dyn TheaterRepository>,
    pub movie_repo: Arc<dyn MovieRepository>,
    pub showtime_repo: Arc<dyn ShowtimeRepository>,
    pub booking_repo: Arc<dyn BookingRepository>,
}

use crate::domain::models::{
    booking::{Booking, BookingRequest},
    movie::Movie,
    seat::{Seat, SeatSpec},
    showtime::{SchedulePlan, ScheduleOutcome, Showtime, ShowtimeOccupancy},
    theater::{NewScreen, Screen, ScreenRef, Theater},
};
use crate::error::AppError;
use async_trait::async_trait;
use chrono::NaiveDate;

#[async_trait]
pub trait TheaterRepository: Send + Sync {
    async fn create(&self, name: &str, location: &str) -> Result<Theater, AppError>;
    async fn find_by_id(&self, id: i64) -> Result<Option<Theater>, AppError>;
    async fn list(&self) -> Result<Vec<Theater>, AppError>;
    /// Persists the screen and its full seat inventory together.
    async fn create_screen(&self, screen: &NewScreen, seats: &[SeatSpec]) -> Result<Screen, AppError>;
    async fn find_screen(&self, screen_id: i64) -> Result<Option<Screen>, AppError>;
    async fn find_screen_ref(&self, theater_id: i64, screen_number: i32) -> Result<Option<ScreenRef>, AppError>;
    async fn list_screens(&self, theater_id: i64) -> Result<Vec<Screen>, AppError>;
    async fn list_seats(&self, screen_id: i64) -> Result<Vec<Seat>, AppError>;
}

#[async_trait]
pub trait MovieRepository: Send + Sync {
    async fn create(&self, movie: &Movie) -> Result<Movie, AppError>;
    async fn find_by_id(&self, id: &str) -> Result<Option<Movie>, AppError>;
    async fn list(&self) -> Result<Vec<Movie>, AppError>;
    async fn set_published(&self, id: &str, published: bool) -> Result<Movie, AppError>;
    /// Removes the movie and its showtimes; refused while any booking references them.
    async fn delete(&self, id: &str) -> Result<(), AppError>;
}

#[async_trait]
pub trait ShowtimeRepository: Send + Sync {
    /// Conflict-checks and commits a movie's whole schedule atomically.
    async fn replace_for_movie(&self, plan: &SchedulePlan) -> Result<ScheduleOutcome, AppError>;
    async fn find_by_id(&self, id: &str) -> Result<Option<Showtime>, AppError>;
    async fn list_by_movie(&self, movie_id: &str) -> Result<Vec<Showtime>, AppError>;
    async fn list_occupancy(&self, movie_id: &str, screen_id: i64, date: NaiveDate) -> Result<Vec<ShowtimeOccupancy>, AppError>;
}

#[async_trait]
pub trait BookingRepository: Send + Sync {
    /// Books every requested seat or none of them.
    async fn create_with_tickets(&self, request: &BookingRequest) -> Result<Booking, AppError>;
    async fn find_by_id(&self, id: &str) -> Result<Option<Booking>, AppError>;
    async fn list_by_customer(&self, customer_id: &str) -> Result<Vec<Booking>, AppError>;
    async fn seat_codes(&self, booking_id: &str) -> Result<Vec<String>, AppError>;
    async fn cancel(&self, booking: &Booking) -> Result<Booking, AppError>;
    /// Seat codes held by confirmed tickets for the showtime.
    async fn unavailable_seats(&self, showtime_id: &str) -> Result<Vec<String>, AppError>;
}

pub mod sqlite_theater_repo;
pub mod sqlite_movie_repo;
pub mod sqlite_showtime_repo;
pub mod sqlite_booking_repo;

pub mod postgres_theater_repo;
pub mod postgres_movie_repo;
pub mod postgres_showtime_repo;
pub mod postgres_booking_repo;

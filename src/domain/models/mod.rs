pub mod booking;
pub mod movie;
pub mod seat;
pub mod showtime;
pub mod theater;

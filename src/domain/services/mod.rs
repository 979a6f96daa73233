pub mod lifecycle;
pub mod scheduling;
pub mod seat_map;

use chrono::{DateTime, Duration, NaiveDate, NaiveTime, TimeZone, Utc};
use chrono_tz::Tz;
use crate::domain::models::movie::Movie;

pub const CANCELLATION_CUTOFF_HOURS: i64 = 24;

/// Bookable means published and not past `release_date + showing_days`.
/// Derived on every read; nothing is ever written back.
pub fn is_bookable(movie: &Movie, today: NaiveDate) -> bool {
    movie.published && today <= movie.showing_until()
}

pub fn today_in(tz: Tz, now: DateTime<Utc>) -> NaiveDate {
    now.with_timezone(&tz).date_naive()
}

/// Local show date and time resolved to an instant. A wall-clock time skipped
/// by a DST jump has no instant.
pub fn show_start(tz: Tz, date: NaiveDate, time: NaiveTime) -> Option<DateTime<Utc>> {
    tz.from_local_datetime(&date.and_time(time))
        .earliest()
        .map(|dt| dt.with_timezone(&Utc))
}

pub fn can_cancel(show_start: DateTime<Utc>, now: DateTime<Utc>) -> bool {
    show_start - now > Duration::hours(CANCELLATION_CUTOFF_HOURS)
}

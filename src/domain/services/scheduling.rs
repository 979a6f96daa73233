use chrono::{Duration, NaiveDate, NaiveTime, Timelike};
use serde::Serialize;
use std::collections::HashSet;
use crate::domain::models::showtime::{Showtime, ShowtimeCandidate, ShowtimeSlot};
use crate::domain::models::theater::ScreenRef;

/// Minimum turnover gap between two showings on one screen.
pub const CONFLICT_BUFFER_MIN: i64 = 30;
const MINUTES_PER_DAY: i64 = 1440;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ScheduleConflict {
    pub movie: String,
    pub screen: i32,
    pub theater: String,
    pub date: String,
    pub time: String,
}

impl ScheduleConflict {
    pub fn from_slot(slot: &ShowtimeSlot) -> Self {
        Self {
            movie: slot.movie_title.clone(),
            screen: slot.screen_number,
            theater: slot.theater_name.clone(),
            date: slot.show_date.format("%Y-%m-%d").to_string(),
            time: format!("{}-{}", slot.start_time.format("%H:%M"), slot.end_time.format("%H:%M")),
        }
    }

    pub fn message(&self) -> String {
        format!(
            "Conflicts with '{}' on screen {} at {} on {} ({})",
            self.movie, self.screen, self.theater, self.date, self.time
        )
    }
}

pub fn parse_start_times(raw: &[String]) -> Result<Vec<NaiveTime>, String> {
    let mut seen = HashSet::new();
    let mut times = Vec::with_capacity(raw.len());
    for value in raw {
        let time = NaiveTime::parse_from_str(value.trim(), "%H:%M")
            .map_err(|_| format!("Invalid time '{}' (expected HH:MM)", value))?;
        if seen.insert(time) {
            times.push(time);
        }
    }
    Ok(times)
}

/// Minutes since midnight for start and end; an end earlier than its start
/// belongs to the following morning.
fn window(start: NaiveTime, end: NaiveTime) -> (i64, i64) {
    let s = (start.hour() * 60 + start.minute()) as i64;
    let mut e = (end.hour() * 60 + end.minute()) as i64;
    if e <= s {
        e += MINUTES_PER_DAY;
    }
    (s, e)
}

pub fn windows_collide(a_start: NaiveTime, a_end: NaiveTime, b_start: NaiveTime, b_end: NaiveTime) -> bool {
    let (cs, ce) = window(a_start, a_end);
    let (es, ee) = window(b_start, b_end);
    cs < ee + CONFLICT_BUFFER_MIN && ce > es - CONFLICT_BUFFER_MIN
}

/// Returns the first showing on the candidate's screen and date that sits
/// closer than the buffer to it.
pub fn find_conflict<'a>(candidate: &ShowtimeCandidate, existing: &'a [ShowtimeSlot]) -> Option<&'a ShowtimeSlot> {
    existing.iter().find(|slot| {
        slot.screen_id == candidate.screen.screen_id
            && slot.show_date == candidate.show_date
            && windows_collide(candidate.start_time, candidate.end_time, slot.start_time, slot.end_time)
    })
}

/// Every screen × start time × day offset, in that nesting order.
pub fn generate_candidates(
    screens: &[ScreenRef],
    times: &[NaiveTime],
    release_date: NaiveDate,
    showing_days: i32,
    duration_min: i32,
) -> Result<Vec<ShowtimeCandidate>, String> {
    let mut days = Vec::new();
    for offset in 0..showing_days {
        let day = release_date
            .checked_add_signed(Duration::days(offset as i64))
            .ok_or_else(|| format!("Showing run from {} leaves the supported calendar range", release_date))?;
        days.push(day);
    }

    let mut candidates = Vec::new();
    for screen in screens {
        for start in times {
            let end = *start + Duration::minutes(duration_min as i64);
            for day in &days {
                candidates.push(ShowtimeCandidate {
                    screen: screen.clone(),
                    show_date: *day,
                    start_time: *start,
                    end_time: end,
                });
            }
        }
    }
    Ok(candidates)
}

impl ShowtimeCandidate {
    pub fn as_slot(&self, movie_title: &str) -> ShowtimeSlot {
        ShowtimeSlot {
            movie_title: movie_title.to_string(),
            theater_name: self.screen.theater_name.clone(),
            screen_number: self.screen.screen_number,
            screen_id: self.screen.screen_id,
            show_date: self.show_date,
            start_time: self.start_time,
            end_time: self.end_time,
        }
    }

    pub fn matches(&self, showtime: &Showtime) -> bool {
        showtime.screen_id == self.screen.screen_id
            && showtime.show_date == self.show_date
            && showtime.start_time == self.start_time
            && showtime.end_time == self.end_time
    }
}

#[derive(Debug)]
pub struct ScheduleDiff<'a> {
    pub kept: Vec<&'a Showtime>,
    pub stale: Vec<&'a Showtime>,
    pub fresh: Vec<&'a ShowtimeCandidate>,
}

/// Splits a movie's committed showtimes against a new candidate set. Identical
/// showings are kept so their bookings survive a resync.
pub fn diff_schedule<'a>(existing: &'a [Showtime], candidates: &'a [ShowtimeCandidate]) -> ScheduleDiff<'a> {
    let mut kept = Vec::new();
    let mut stale = Vec::new();
    for showtime in existing {
        if candidates.iter().any(|c| c.matches(showtime)) {
            kept.push(showtime);
        } else {
            stale.push(showtime);
        }
    }
    let fresh = candidates
        .iter()
        .filter(|c| !existing.iter().any(|s| c.matches(s)))
        .collect();
    ScheduleDiff { kept, stale, fresh }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Datelike, Utc};

    fn screen(id: i64) -> ScreenRef {
        ScreenRef { screen_id: id, screen_number: id as i32, theater_id: 1, theater_name: "Downtown".into() }
    }

    fn t(s: &str) -> NaiveTime {
        NaiveTime::parse_from_str(s, "%H:%M").unwrap()
    }

    fn d(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    fn slot(screen_id: i64, date: &str, start: &str, end: &str) -> ShowtimeSlot {
        ShowtimeSlot {
            movie_title: "Existing".into(),
            theater_name: "Downtown".into(),
            screen_number: screen_id as i32,
            screen_id,
            show_date: d(date),
            start_time: t(start),
            end_time: t(end),
        }
    }

    fn candidate(screen_id: i64, date: &str, start: &str, duration: i32) -> ShowtimeCandidate {
        generate_candidates(&[screen(screen_id)], &[t(start)], d(date), 1, duration).unwrap().remove(0)
    }

    #[test]
    fn test_candidate_end_is_start_plus_duration() {
        let c = candidate(1, "2030-05-01", "10:00", 120);
        assert_eq!(c.start_time, t("10:00"));
        assert_eq!(c.end_time, t("12:00"));
    }

    #[test]
    fn test_rejects_inside_buffer_after_existing() {
        let existing = vec![slot(1, "2030-05-01", "10:00", "12:00")];
        let c = candidate(1, "2030-05-01", "12:15", 90);
        let hit = find_conflict(&c, &existing).expect("12:15 is inside the buffer");
        let detail = ScheduleConflict::from_slot(hit);
        assert_eq!(detail.time, "10:00-12:00");
        assert_eq!(detail.date, "2030-05-01");
    }

    #[test]
    fn test_exact_buffer_gap_is_allowed() {
        let existing = vec![slot(1, "2030-05-01", "10:00", "12:00")];
        assert!(find_conflict(&candidate(1, "2030-05-01", "12:30", 60), &existing).is_none());
        // candidate 08:00-09:30 ends exactly 30 minutes before 10:00
        assert!(find_conflict(&candidate(1, "2030-05-01", "08:00", 90), &existing).is_none());
        assert!(find_conflict(&candidate(1, "2030-05-01", "08:00", 91), &existing).is_some());
    }

    #[test]
    fn test_other_screen_or_date_never_conflicts() {
        let existing = vec![slot(1, "2030-05-01", "10:00", "12:00")];
        assert!(find_conflict(&candidate(2, "2030-05-01", "10:00", 120), &existing).is_none());
        assert!(find_conflict(&candidate(1, "2030-05-02", "10:00", 120), &existing).is_none());
    }

    #[test]
    fn test_late_show_wrapping_midnight() {
        let existing = vec![slot(1, "2030-05-01", "22:00", "00:30")];
        assert!(find_conflict(&candidate(1, "2030-05-01", "23:30", 60), &existing).is_some());
        assert!(find_conflict(&candidate(1, "2030-05-01", "19:00", 120), &existing).is_none());
    }

    #[test]
    fn test_generation_count_one_per_day() {
        let candidates = generate_candidates(&[screen(1)], &[t("10:00")], d("2030-05-01"), 7, 100).unwrap();
        assert_eq!(candidates.len(), 7);
        for (i, c) in candidates.iter().enumerate() {
            assert_eq!(c.show_date, d("2030-05-01") + Duration::days(i as i64));
        }
    }

    #[test]
    fn test_generation_cross_product() {
        let candidates = generate_candidates(&[screen(1), screen(2)], &[t("10:00"), t("14:00"), t("18:00")], d("2030-05-01"), 4, 100).unwrap();
        assert_eq!(candidates.len(), 2 * 3 * 4);
    }

    #[test]
    fn test_generation_past_calendar_end_is_an_error() {
        let last_year = NaiveDate::MAX.with_day(1).unwrap();
        assert!(generate_candidates(&[screen(1)], &[t("10:00")], last_year, 366, 100).is_err());
    }

    #[test]
    fn test_parse_start_times_dedupes_and_rejects_garbage() {
        let times = parse_start_times(&["10:00".into(), "10:00".into(), "14:30".into()]).unwrap();
        assert_eq!(times, vec![t("10:00"), t("14:30")]);
        assert!(parse_start_times(&["25:00".into()]).is_err());
        assert!(parse_start_times(&["ten".into()]).is_err());
    }

    #[test]
    fn test_diff_keeps_identical_showings() {
        let candidates = generate_candidates(&[screen(1)], &[t("10:00")], d("2030-05-01"), 2, 120).unwrap();
        let keep = Showtime::from_candidate("m1", &candidates[0]);
        let mut gone = Showtime::from_candidate("m1", &candidates[1]);
        gone.start_time = t("09:00");
        gone.created_at = Utc::now();
        let existing = vec![keep, gone];
        let diff = diff_schedule(&existing, &candidates);
        assert_eq!(diff.kept.len(), 1);
        assert_eq!(diff.stale.len(), 1);
        assert_eq!(diff.fresh.len(), 1);
        assert_eq!(diff.fresh[0].show_date, d("2030-05-02"));
    }
}

//! # Availability Generator
//!
//! Produces the two calendars the booking wizard offers: a window of days and
//! the fixed list of half-hour slots. Availability is not random; it is a pure
//! function of calendar fields so the same date always shows the same state.
//!
//! - A day is open when `(day_of_month + month_index) % 10 < 7`, with
//!   `month_index` counted from 0 for January.
//! - A slot is open when its "HHMM" number satisfies `HHMM % 10 < 6`.

use chrono::{DateTime, Datelike, Days, NaiveDate, Utc};

use crate::models::{DaySlot, TimeSlot};

/// Default number of days offered by the calendar.
pub const DEFAULT_WINDOW_DAYS: u32 = 30;

/// Bookable slot starts: the morning block then the afternoon block.
pub const SLOT_TIMES: [&str; 16] = [
    "09:00", "09:30", "10:00", "10:30", "11:00", "11:30", "14:00", "14:30", "15:00", "15:30",
    "16:00", "16:30", "17:00", "17:30", "18:00", "18:30",
];

/// Deterministic day availability keyed on day of month and month index.
pub fn day_is_open(date: NaiveDate) -> bool {
    (date.day() + date.month0()) % 10 < 7
}

/// Numeric encoding of an "HH:MM" string, e.g. "09:30" becomes 930.
pub fn time_seed(time: &str) -> Option<u32> {
    let (hours, minutes) = time.split_once(':')?;
    if hours.len() != 2 || minutes.len() != 2 {
        return None;
    }
    let hours: u32 = hours.parse().ok()?;
    let minutes: u32 = minutes.parse().ok()?;
    if hours > 23 || minutes > 59 {
        return None;
    }
    Some(hours * 100 + minutes)
}

/// Deterministic slot availability keyed on the numeric time.
pub fn time_is_open(time: &str) -> bool {
    time_seed(time).is_some_and(|seed| seed % 10 < 6)
}

/// Returns `window_size` consecutive days starting at `start`, flagged against
/// `today`.
pub fn list_days(start: NaiveDate, window_size: u32, today: NaiveDate) -> Vec<DaySlot> {
    (0..window_size)
        .filter_map(|offset| start.checked_add_days(Days::new(u64::from(offset))))
        .map(|date| DaySlot {
            date,
            is_past: date < today,
            is_available: day_is_open(date),
        })
        .collect()
}

/// Returns the booking window starting on `reference_now`'s date, inclusive.
pub fn list_upcoming_days(window_size: u32, reference_now: DateTime<Utc>) -> Vec<DaySlot> {
    let today = reference_now.date_naive();
    list_days(today, window_size, today)
}

/// Returns the 16 half-hour slots, identical for every day.
pub fn list_time_slots() -> Vec<TimeSlot> {
    SLOT_TIMES
        .iter()
        .map(|time| TimeSlot {
            time: (*time).to_string(),
            is_available: time_is_open(time),
        })
        .collect()
}

/// Looks up a day of the window generated for `reference_now`.
pub fn find_day(
    date: NaiveDate,
    window_size: u32,
    reference_now: DateTime<Utc>,
) -> Option<DaySlot> {
    list_upcoming_days(window_size, reference_now)
        .into_iter()
        .find(|day| day.date == date)
}

/// Looks up one of the fixed slots by its "HH:MM" start.
pub fn find_time_slot(time: &str) -> Option<TimeSlot> {
    list_time_slots().into_iter().find(|slot| slot.time == time)
}

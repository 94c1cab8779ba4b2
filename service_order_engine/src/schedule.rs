//! Shift length calculation.
//!
//! Converts the start and end times entered on an order, plus the
//! unpaid lunch break, into the paid hours of one work day.

use crate::error::OrderError;
use chrono::NaiveTime;

const SECONDS_PER_DAY: i64 = 24 * 60 * 60;

/// Parses a time of day written as `HH:MM` or `HH:MM:SS`.
pub fn parse_time(value: &str) -> Result<NaiveTime, OrderError> {
    let value = value.trim();
    NaiveTime::parse_from_str(value, "%H:%M")
        .or_else(|_| NaiveTime::parse_from_str(value, "%H:%M:%S"))
        .map_err(|_| OrderError::InvalidTime(value.to_string()))
}

/// Returns the paid hours between `start` and `end` after removing the
/// lunch break.
///
/// An `end` at or before `start` is taken to be on the following day,
/// so a 22:00 to 06:00 night shift is eight hours long.  The result
/// never goes below zero.
pub fn calculate_hours(start: NaiveTime, end: NaiveTime, lunch_break_minutes: u32) -> f64 {
    let mut seconds = (end - start).num_seconds();
    if seconds <= 0 {
        seconds += SECONDS_PER_DAY;
    }
    let paid = (seconds - i64::from(lunch_break_minutes) * 60).max(0);
    paid as f64 / 3600.0
}

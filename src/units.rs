//! Shared time constants and conversion helpers.

use chrono::{NaiveDate, NaiveDateTime};

/// Seconds per mean solar day.
pub const SECONDS_PER_DAY: f64 = 86_400.0;

/// Length of a sidereal day in seconds (23h 56m 4.1s).
pub const SIDEREAL_DAY_SECONDS: f64 = 86_164.1;

/// Length of a sidereal year in seconds (365d 6h 9m 9.54s).
pub const SIDEREAL_YEAR_SECONDS: f64 = 31_558_149.54;

/// Convert a days/hours/minutes/seconds duration to seconds.
#[inline]
pub fn dhms_to_seconds(days: f64, hours: f64, minutes: f64, seconds: f64) -> f64 {
    ((days * 24.0 + hours) * 60.0 + minutes) * 60.0 + seconds
}

/// Reference instant simulated time is measured from: 2013-06-21 00:00.
pub fn reference_epoch() -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2013, 6, 21)
        .expect("reference date is valid")
        .and_hms_opt(0, 0, 0)
        .expect("reference time is valid")
}

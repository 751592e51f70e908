//! Calendar sanity checks shared by every date input path.
//!
//! Birthdays travel without a year, so a bare (day, month) pair is checked
//! against a fixed non-leap reference year. That rejects Feb 30 and Apr 31
//! and, deliberately, Feb 29.

use chrono::NaiveDate;

/// Non-leap year used to validate a bare (day, month) pair.
pub const NON_LEAP_REFERENCE_YEAR: i32 = 2023;

/// Leap year used where a stored record may legitimately hold Feb 29.
pub const LEAP_REFERENCE_YEAR: i32 = 2024;

/// Smallest accepted year for birthdays and hire dates.
pub const MIN_YEAR: i32 = 1900;

/// Largest accepted year for birthdays and hire dates.
pub const MAX_YEAR: i32 = 3000;

/// Whether `(day, month)` is a real date in a non-leap year.
pub fn is_valid_day_month(day: u32, month: u32) -> bool {
    NaiveDate::from_ymd_opt(NON_LEAP_REFERENCE_YEAR, month, day).is_some()
}

/// Whether `(day, month)` is a real date in at least one year (Feb 29 passes).
pub fn is_valid_day_month_in_leap_year(day: u32, month: u32) -> bool {
    NaiveDate::from_ymd_opt(LEAP_REFERENCE_YEAR, month, day).is_some()
}

/// Whether `year` is inside the accepted range.
pub fn is_valid_year(year: i32) -> bool {
    (MIN_YEAR..=MAX_YEAR).contains(&year)
}

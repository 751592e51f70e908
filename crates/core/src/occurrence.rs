//! Next-occurrence and anniversary arithmetic.

use chrono::{Datelike, Days, NaiveDate};

use crate::types::Timestamp;

/// Truncate a UTC instant to its calendar day.
pub fn reference_date(now: Timestamp) -> NaiveDate {
    now.date_naive()
}

/// Next date on or after `reference` that falls on `(month, day)`.
///
/// An occurrence equal to `reference` counts (today is due, not skipped).
/// Day values past the end of the month roll forward into the next month,
/// so Feb 29 lands on Mar 1 in non-leap years.
pub fn next_occurrence(reference: NaiveDate, month: u32, day: u32) -> NaiveDate {
    let candidate = project(reference.year(), month, day);
    if candidate < reference {
        project(reference.year() + 1, month, day)
    } else {
        candidate
    }
}

/// Whole years between a hire year and the year an anniversary falls in.
pub fn years_elapsed(occurrence_year: i32, hire_year: i32) -> i32 {
    occurrence_year - hire_year
}

fn project(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month.clamp(1, 12), 1)
        .and_then(|first| first.checked_add_days(Days::new(u64::from(day.max(1) - 1))))
        .unwrap_or(NaiveDate::MAX)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn today_counts_as_due() {
        let mut day = date(2023, 1, 1);
        while day.year() == 2023 {
            assert_eq!(next_occurrence(day, day.month(), day.day()), day);
            day = day.succ_opt().unwrap();
        }
    }

    #[test]
    fn never_before_reference_and_within_a_year() {
        let references = [
            date(2023, 1, 1),
            date(2023, 6, 15),
            date(2023, 12, 31),
            date(2024, 2, 29),
            date(2024, 3, 1),
        ];
        for reference in references {
            for month in 1..=12 {
                for day in 1..=31 {
                    let next = next_occurrence(reference, month, day);
                    assert!(next >= reference, "{next} before {reference}");
                    assert!(
                        (next - reference).num_days() <= 366,
                        "{next} too far from {reference}"
                    );
                }
            }
        }
    }

    #[test]
    fn past_date_advances_one_year() {
        assert_eq!(next_occurrence(date(2024, 6, 1), 3, 25), date(2025, 3, 25));
    }

    #[test]
    fn future_date_stays_in_reference_year() {
        assert_eq!(next_occurrence(date(2024, 6, 1), 12, 24), date(2024, 12, 24));
    }

    #[test]
    fn feb_29_rolls_to_march_first_in_non_leap_year() {
        assert_eq!(next_occurrence(date(2025, 1, 10), 2, 29), date(2025, 3, 1));
        assert_eq!(next_occurrence(date(2024, 1, 10), 2, 29), date(2024, 2, 29));
    }

    #[test]
    fn reference_date_truncates_time() {
        let now = chrono::Utc.with_ymd_and_hms(2024, 5, 17, 23, 59, 59).unwrap();
        assert_eq!(reference_date(now), date(2024, 5, 17));
    }

    #[test]
    fn years_elapsed_subtracts_years() {
        assert_eq!(years_elapsed(2026, 2020), 6);
        assert_eq!(years_elapsed(2024, 2024), 0);
    }
}

//! Person record rules shared by the dashboard and inbound DM paths.

use serde::{Deserialize, Serialize};

use crate::calendar;
use crate::error::CoreError;

/// How a person wants to be reminded about their own celebrations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RemindersMode {
    None,
    #[default]
    SameDay,
    DayBefore,
}

impl RemindersMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::None => "none",
            Self::SameDay => "same_day",
            Self::DayBefore => "day_before",
        }
    }

    /// Parse a stored or submitted value. Blank means the default.
    pub fn parse(value: &str) -> Result<Self, CoreError> {
        match value.trim() {
            "" | "same_day" => Ok(Self::SameDay),
            "none" => Ok(Self::None),
            "day_before" => Ok(Self::DayBefore),
            other => Err(CoreError::Validation(format!(
                "reminders_mode must be one of none, same_day, day_before (got '{other}')"
            ))),
        }
    }
}

/// Validate stored birthday columns.
///
/// Day and month travel together. Unlike free-text input, a stored Feb 29
/// is accepted; it simply never matches in non-leap years.
pub fn validate_birthday_fields(
    day: Option<i16>,
    month: Option<i16>,
    year: Option<i16>,
) -> Result<(), CoreError> {
    match (day, month) {
        (None, None) => {
            if year.is_some() {
                return Err(CoreError::Validation(
                    "birthday_year requires birthday_day and birthday_month".to_string(),
                ));
            }
            Ok(())
        }
        (Some(day), Some(month)) => {
            if !(1..=31).contains(&day) {
                return Err(CoreError::Validation("birthday_day must be 1-31".to_string()));
            }
            if !(1..=12).contains(&month) {
                return Err(CoreError::Validation("birthday_month must be 1-12".to_string()));
            }
            // Both ranges checked above, so the casts are lossless.
            if !calendar::is_valid_day_month_in_leap_year(day as u32, month as u32) {
                return Err(CoreError::Validation(format!(
                    "birthday {day}/{month} is not a calendar date"
                )));
            }
            if let Some(year) = year {
                if !calendar::is_valid_year(i32::from(year)) {
                    return Err(CoreError::Validation(format!(
                        "birthday_year must be between {} and {}",
                        calendar::MIN_YEAR,
                        calendar::MAX_YEAR
                    )));
                }
            }
            Ok(())
        }
        _ => Err(CoreError::Validation(
            "birthday_day and birthday_month must both be set or both be empty".to_string(),
        )),
    }
}

/// First value that is non-blank after trimming, or `""`.
pub fn first_non_blank<'a>(values: &[&'a str]) -> &'a str {
    values
        .iter()
        .map(|v| v.trim())
        .find(|v| !v.is_empty())
        .unwrap_or("")
}

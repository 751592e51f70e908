//! Posting schedule and template validation for celebration channels.
//!
//! A channel posts once per local day at an exact `HH:MM` in its own IANA
//! timezone. There is no grace window: a poll that misses the minute misses
//! the day.

use std::fmt;

use chrono::{NaiveDate, NaiveTime, Timelike};
use chrono_tz::Tz;

use crate::error::CoreError;
use crate::types::Timestamp;

/// Default posting time for new channels.
pub const DEFAULT_POSTING_TIME: &str = "09:00";

/// Default timezone for new workspaces and channels.
pub const DEFAULT_TIMEZONE: &str = "UTC";

/// Wall-clock hour and minute, independent of any timezone.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PostingTime {
    hour: u32,
    minute: u32,
}

impl PostingTime {
    /// Parse `HH:MM` (24-hour).
    pub fn parse(value: &str) -> Result<Self, CoreError> {
        let time = NaiveTime::parse_from_str(value.trim(), "%H:%M").map_err(|_| {
            CoreError::Validation(format!("posting_time must be HH:MM, got '{value}'"))
        })?;
        Ok(Self {
            hour: time.hour(),
            minute: time.minute(),
        })
    }

    /// Exact hour and minute equality; seconds are ignored.
    pub fn matches(&self, local: NaiveTime) -> bool {
        local.hour() == self.hour && local.minute() == self.minute
    }
}

impl fmt::Display for PostingTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}:{:02}", self.hour, self.minute)
    }
}

/// Resolve an IANA timezone name such as `America/New_York`.
pub fn parse_timezone(name: &str) -> Result<Tz, CoreError> {
    name.trim()
        .parse::<Tz>()
        .map_err(|_| CoreError::Validation(format!("invalid timezone '{name}'")))
}

/// An instant seen from a channel's timezone.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LocalSlot {
    pub date: NaiveDate,
    pub time: NaiveTime,
}

/// Convert `now` into local date and time for `tz`.
pub fn local_slot(now: Timestamp, tz: Tz) -> LocalSlot {
    let local = now.with_timezone(&tz);
    LocalSlot {
        date: local.date_naive(),
        time: local.time(),
    }
}

/// Both templates must contain something other than whitespace.
pub fn validate_templates(birthday: &str, anniversary: &str) -> Result<(), CoreError> {
    if birthday.trim().is_empty() || anniversary.trim().is_empty() {
        return Err(CoreError::Validation(
            "birthday_template and anniversary_template are required".to_string(),
        ));
    }
    Ok(())
}

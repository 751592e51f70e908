//! Free-text birthday / hire-date parser for direct-message replies.
//!
//! Grammars are tried in order and the first one that recognises the
//! message structurally wins:
//!
//! 1. Named dates, one per line: `march 25` sets the birthday and
//!    `january 23, 2024` sets the hire date. A leading `/` is accepted.
//!    Once any line matches, every other non-blank line must match too.
//! 2. Legacy tokens: `birthday: 14/06[/1990]`, `hire_date: 2024-01-23`
//!    (also `start_date` / `work_start`), or a message consisting of just
//!    one of those date tokens.
//!
//! Calendar validation is shared by both grammars (see [`validate_date_parts`]).

use std::sync::LazyLock;

use chrono::NaiveDate;
use regex::{Captures, Regex};

use crate::calendar;

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

/// A birthday as typed by the person. The year is optional.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BirthdayInput {
    pub day: u32,
    pub month: u32,
    pub year: Option<i32>,
}

/// Result of a successful parse. At least one field is always set.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParsedProfileInput {
    pub birthday: Option<BirthdayInput>,
    pub hire_date: Option<NaiveDate>,
}

impl ParsedProfileInput {
    pub fn has_birthday(&self) -> bool {
        self.birthday.is_some()
    }

    pub fn has_hire_date(&self) -> bool {
        self.hire_date.is_some()
    }

    fn is_empty(&self) -> bool {
        self.birthday.is_none() && self.hire_date.is_none()
    }
}

/// Why a message could not be turned into a profile update.
///
/// Always recoverable: the caller replies with a help message.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ParseError {
    #[error("no birthday or hire date found")]
    NothingFound,

    #[error("multiple birthday lines provided")]
    MultipleBirthdays,

    #[error("multiple hire date lines provided")]
    MultipleHireDates,

    #[error("invalid date line format")]
    InvalidLineFormat,

    #[error("invalid month name")]
    InvalidMonthName,

    #[error("invalid month value")]
    InvalidMonth,

    #[error("invalid day value")]
    InvalidDay,

    #[error("invalid calendar date")]
    InvalidCalendarDate,

    #[error("invalid year value")]
    InvalidYear,

    #[error("invalid hire date format (use YYYY-MM-DD)")]
    InvalidHireDateFormat,
}

// ---------------------------------------------------------------------------
// Grammar dispatch
// ---------------------------------------------------------------------------

/// Outcome of a single grammar attempt.
#[derive(Debug)]
enum GrammarMatch {
    /// The grammar does not recognise the message; try the next one.
    NoMatch,
    Matched(ParsedProfileInput),
    /// The grammar recognised the message but it is invalid. Stops the search.
    Failed(ParseError),
}

type Grammar = fn(&str) -> GrammarMatch;

/// Grammars in priority order.
const GRAMMARS: [Grammar; 2] = [parse_named_dates, parse_legacy_tokens];

/// Parse a direct-message reply into a birthday and/or hire date.
pub fn parse(text: &str) -> Result<ParsedProfileInput, ParseError> {
    let clean = text.trim();
    for grammar in GRAMMARS {
        match grammar(clean) {
            GrammarMatch::NoMatch => continue,
            GrammarMatch::Matched(parsed) => return Ok(parsed),
            GrammarMatch::Failed(err) => return Err(err),
        }
    }
    Err(ParseError::NothingFound)
}

// ---------------------------------------------------------------------------
// Shared validation
// ---------------------------------------------------------------------------

/// Calendar sanity for any (day, month[, year]) regardless of grammar.
///
/// The (day, month) pair is projected onto a non-leap reference year, so
/// Feb 29 is rejected even when a year accompanies it.
pub fn validate_date_parts(day: u32, month: u32, year: Option<i32>) -> Result<(), ParseError> {
    if !(1..=12).contains(&month) {
        return Err(ParseError::InvalidMonth);
    }
    if !(1..=31).contains(&day) {
        return Err(ParseError::InvalidDay);
    }
    if !calendar::is_valid_day_month(day, month) {
        return Err(ParseError::InvalidCalendarDate);
    }
    if let Some(year) = year {
        if !calendar::is_valid_year(year) {
            return Err(ParseError::InvalidYear);
        }
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Named-date grammar
// ---------------------------------------------------------------------------

static NAMED_DATE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^/?\s*([a-z]+)\.?\s+(\d{1,2})(?:\s*,\s*(\d{4}))?$").expect("valid regex")
});

fn parse_named_dates(text: &str) -> GrammarMatch {
    let mut parsed = ParsedProfileInput::default();
    let mut matched_any = false;
    let mut saw_foreign_line = false;

    for line in text.lines().map(str::trim).filter(|l| !l.is_empty()) {
        let Some(caps) = NAMED_DATE_RE.captures(line) else {
            saw_foreign_line = true;
            continue;
        };
        matched_any = true;

        let (month, day, year) = match named_line_parts(&caps) {
            Ok(parts) => parts,
            Err(err) => return GrammarMatch::Failed(err),
        };

        match year {
            None => {
                if parsed.birthday.is_some() {
                    return GrammarMatch::Failed(ParseError::MultipleBirthdays);
                }
                parsed.birthday = Some(BirthdayInput {
                    day,
                    month,
                    year: None,
                });
            }
            Some(year) => {
                if parsed.hire_date.is_some() {
                    return GrammarMatch::Failed(ParseError::MultipleHireDates);
                }
                let Some(date) = NaiveDate::from_ymd_opt(year, month, day) else {
                    return GrammarMatch::Failed(ParseError::InvalidCalendarDate);
                };
                parsed.hire_date = Some(date);
            }
        }
    }

    if !matched_any {
        return GrammarMatch::NoMatch;
    }
    if saw_foreign_line {
        return GrammarMatch::Failed(ParseError::InvalidLineFormat);
    }
    GrammarMatch::Matched(parsed)
}

fn named_line_parts(caps: &Captures<'_>) -> Result<(u32, u32, Option<i32>), ParseError> {
    let month = month_from_name(&caps[1]).ok_or(ParseError::InvalidMonthName)?;
    let day: u32 = caps[2].parse().map_err(|_| ParseError::InvalidDay)?;
    let year = caps
        .get(3)
        .map(|m| m.as_str().parse::<i32>().map_err(|_| ParseError::InvalidYear))
        .transpose()?;

    validate_date_parts(day, month, year)?;
    Ok((month, day, year))
}

/// English month name or common abbreviation, case-insensitive.
fn month_from_name(name: &str) -> Option<u32> {
    let month = match name.to_ascii_lowercase().as_str() {
        "jan" | "january" => 1,
        "feb" | "february" => 2,
        "mar" | "march" => 3,
        "apr" | "april" => 4,
        "may" => 5,
        "jun" | "june" => 6,
        "jul" | "july" => 7,
        "aug" | "august" => 8,
        "sep" | "sept" | "september" => 9,
        "oct" | "october" => 10,
        "nov" | "november" => 11,
        "dec" | "december" => 12,
        _ => return None,
    };
    Some(month)
}

// ---------------------------------------------------------------------------
// Legacy token grammar
// ---------------------------------------------------------------------------

static BIRTHDAY_KEYWORD_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\bbirthday\b\s*[:=-]?\s*([0-3]?\d)[/.-]([01]?\d)(?:[/.-](\d{4}))?")
        .expect("valid regex")
});

static HIRE_KEYWORD_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)\b(?:hire[_ ]?date|start[_ ]?date|work[_ ]?start)\b\s*[:=-]?\s*(\d{4}-\d{2}-\d{2})",
    )
    .expect("valid regex")
});

static BARE_BIRTHDAY_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^([0-3]?\d)[/.-]([01]?\d)(?:[/.-](\d{4}))?$").expect("valid regex")
});

static BARE_HIRE_DATE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(\d{4}-\d{2}-\d{2})$").expect("valid regex"));

fn parse_legacy_tokens(text: &str) -> GrammarMatch {
    let mut parsed = ParsedProfileInput::default();

    let birthday_caps = BIRTHDAY_KEYWORD_RE
        .captures(text)
        .or_else(|| BARE_BIRTHDAY_RE.captures(text));
    if let Some(caps) = birthday_caps {
        match legacy_birthday(&caps) {
            Ok(birthday) => parsed.birthday = Some(birthday),
            Err(err) => return GrammarMatch::Failed(err),
        }
    }

    let hire_caps = HIRE_KEYWORD_RE
        .captures(text)
        .or_else(|| BARE_HIRE_DATE_RE.captures(text));
    if let Some(caps) = hire_caps {
        match legacy_hire_date(&caps[1]) {
            Ok(date) => parsed.hire_date = Some(date),
            Err(err) => return GrammarMatch::Failed(err),
        }
    }

    if parsed.is_empty() {
        GrammarMatch::NoMatch
    } else {
        GrammarMatch::Matched(parsed)
    }
}

fn legacy_birthday(caps: &Captures<'_>) -> Result<BirthdayInput, ParseError> {
    let day: u32 = caps[1].parse().map_err(|_| ParseError::InvalidDay)?;
    let month: u32 = caps[2].parse().map_err(|_| ParseError::InvalidMonth)?;
    let year = caps
        .get(3)
        .map(|m| m.as_str().parse::<i32>().map_err(|_| ParseError::InvalidYear))
        .transpose()?;

    validate_date_parts(day, month, year)?;
    Ok(BirthdayInput { day, month, year })
}

fn legacy_hire_date(token: &str) -> Result<NaiveDate, ParseError> {
    let date = NaiveDate::parse_from_str(token, "%Y-%m-%d")
        .map_err(|_| ParseError::InvalidHireDateFormat)?;
    let (year, month, day) = {
        use chrono::Datelike;
        (date.year(), date.month(), date.day())
    };

    validate_date_parts(day, month, Some(year))?;
    Ok(date)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

//! Upcoming celebrations for the dashboard.

use chrono::{Datelike, Days, NaiveDate};
use cheers_core::error::CoreError;
use cheers_core::occurrence::{next_occurrence, reference_date, years_elapsed};
use cheers_core::types::{DbId, Timestamp};
use cheers_db::models::person::Person;
use cheers_db::repositories::PersonRepo;
use cheers_db::DbPool;
use serde::Serialize;

/// Window used when the caller asks for zero or negative days.
pub const DEFAULT_OVERVIEW_DAYS: i64 = 30;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CelebrationFilter {
    #[default]
    All,
    Birthdays,
    Anniversaries,
}

impl CelebrationFilter {
    /// Blank means [`CelebrationFilter::All`].
    pub fn parse(value: &str) -> Result<Self, CoreError> {
        match value.trim().to_ascii_lowercase().as_str() {
            "" | "all" => Ok(Self::All),
            "birthdays" => Ok(Self::Birthdays),
            "anniversaries" => Ok(Self::Anniversaries),
            other => Err(CoreError::Validation(format!(
                "type must be one of all, birthdays, anniversaries (got '{other}')"
            ))),
        }
    }

    fn birthdays(self) -> bool {
        matches!(self, Self::All | Self::Birthdays)
    }

    fn anniversaries(self) -> bool {
        matches!(self, Self::All | Self::Anniversaries)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CelebrationKind {
    Birthday,
    Anniversary,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UpcomingCelebration {
    pub date: NaiveDate,
    #[serde(rename = "type")]
    pub kind: CelebrationKind,
    pub user_id: String,
    pub slack_user: String,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub years: Option<i32>,
}

/// Celebrations whose next occurrence falls within `days` of `today`,
/// both ends inclusive, ordered by date then name.
///
/// Opt-in is not applied here: the dashboard shows everyone on record.
pub fn upcoming_celebrations(
    people: &[Person],
    today: NaiveDate,
    days: i64,
    filter: CelebrationFilter,
) -> Vec<UpcomingCelebration> {
    let days = if days <= 0 { DEFAULT_OVERVIEW_DAYS } else { days };
    let end = today
        .checked_add_days(Days::new(days.unsigned_abs()))
        .unwrap_or(NaiveDate::MAX);

    let mut items = Vec::new();
    for person in people {
        if filter.birthdays() {
            if let (Some(day), Some(month)) = (person.birthday_day, person.birthday_month) {
                let date = next_occurrence(today, month as u32, day as u32);
                if date <= end {
                    items.push(item(person, date, CelebrationKind::Birthday, None));
                }
            }
        }

        if filter.anniversaries() {
            if let Some(hire_date) = person.hire_date {
                let date = next_occurrence(today, hire_date.month(), hire_date.day());
                if date <= end {
                    let years = years_elapsed(date.year(), hire_date.year());
                    items.push(item(person, date, CelebrationKind::Anniversary, Some(years)));
                }
            }
        }
    }

    items.sort_by(|a, b| a.date.cmp(&b.date).then_with(|| a.name.cmp(&b.name)));
    items
}

fn item(
    person: &Person,
    date: NaiveDate,
    kind: CelebrationKind,
    years: Option<i32>,
) -> UpcomingCelebration {
    UpcomingCelebration {
        date,
        kind,
        user_id: person.slack_user_id.clone(),
        slack_user: person.slack_handle.clone(),
        name: person.display_name.clone(),
        years,
    }
}

/// Load a workspace's people and compute the overview from `now`'s UTC date.
pub async fn overview(
    pool: &DbPool,
    workspace_id: DbId,
    now: Timestamp,
    days: i64,
    filter: CelebrationFilter,
) -> Result<Vec<UpcomingCelebration>, sqlx::Error> {
    let people = PersonRepo::list_by_workspace(pool, workspace_id).await?;
    Ok(upcoming_celebrations(&people, reference_date(now), days, filter))
}

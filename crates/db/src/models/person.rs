//! Person model and DTOs.

use chrono::NaiveDate;
use cheers_core::person::RemindersMode;
use cheers_core::types::{DbId, Timestamp};
use serde::Serialize;
use sqlx::FromRow;

/// A row from the `people` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Person {
    pub id: DbId,
    pub workspace_id: DbId,
    pub slack_user_id: String,
    pub slack_handle: String,
    pub display_name: String,
    pub avatar_url: String,
    pub birthday_day: Option<i16>,
    pub birthday_month: Option<i16>,
    pub birthday_year: Option<i16>,
    pub hire_date: Option<NaiveDate>,
    pub public_celebration_opt_in: bool,
    pub reminders_mode: String,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl Person {
    /// Stored reminders mode; unknown values read as the default.
    pub fn reminders_mode(&self) -> RemindersMode {
        RemindersMode::parse(&self.reminders_mode).unwrap_or_default()
    }
}

/// Person matched for a work anniversary, with whole years elapsed.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct AnniversaryPerson {
    #[sqlx(flatten)]
    #[serde(flatten)]
    pub person: Person,
    pub years: i32,
}

/// Every editable column of a person, written as a whole.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpsertPerson {
    pub slack_user_id: String,
    pub slack_handle: String,
    pub display_name: String,
    pub avatar_url: String,
    pub birthday_day: Option<i16>,
    pub birthday_month: Option<i16>,
    pub birthday_year: Option<i16>,
    pub hire_date: Option<NaiveDate>,
    pub public_celebration_opt_in: bool,
    pub reminders_mode: RemindersMode,
}

impl UpsertPerson {
    /// Defaults for a member seen for the first time.
    pub fn new(slack_user_id: impl Into<String>) -> Self {
        Self {
            slack_user_id: slack_user_id.into(),
            slack_handle: String::new(),
            display_name: String::new(),
            avatar_url: String::new(),
            birthday_day: None,
            birthday_month: None,
            birthday_year: None,
            hire_date: None,
            public_celebration_opt_in: true,
            reminders_mode: RemindersMode::SameDay,
        }
    }

    /// Carry every stored column over unchanged.
    pub fn from_person(person: &Person) -> Self {
        Self {
            slack_user_id: person.slack_user_id.clone(),
            slack_handle: person.slack_handle.clone(),
            display_name: person.display_name.clone(),
            avatar_url: person.avatar_url.clone(),
            birthday_day: person.birthday_day,
            birthday_month: person.birthday_month,
            birthday_year: person.birthday_year,
            hire_date: person.hire_date,
            public_celebration_opt_in: person.public_celebration_opt_in,
            reminders_mode: person.reminders_mode(),
        }
    }
}

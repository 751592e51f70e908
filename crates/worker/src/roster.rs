//! Workspace roster: stored people merged with the live member directory.

use std::collections::HashMap;

use chrono::NaiveDate;
use cheers_core::messaging::{DirectoryMember, MemberDirectory, MessagingError};
use cheers_core::person::{first_non_blank, RemindersMode};
use cheers_core::types::DbId;
use cheers_db::models::person::Person;
use cheers_db::repositories::PersonRepo;
use cheers_db::DbPool;
use serde::Serialize;

use crate::error::RosterError;

/// One row of the people list. `id` is `None` for directory members that
/// have never been saved.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RosterEntry {
    pub id: Option<DbId>,
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
    pub reminders_mode: RemindersMode,
}

impl RosterEntry {
    fn from_person(person: Person) -> Self {
        let reminders_mode = person.reminders_mode();
        Self {
            id: Some(person.id),
            workspace_id: person.workspace_id,
            slack_user_id: person.slack_user_id,
            slack_handle: person.slack_handle,
            display_name: person.display_name,
            avatar_url: person.avatar_url,
            birthday_day: person.birthday_day,
            birthday_month: person.birthday_month,
            birthday_year: person.birthday_year,
            hire_date: person.hire_date,
            public_celebration_opt_in: person.public_celebration_opt_in,
            reminders_mode,
        }
    }

    fn from_member(workspace_id: DbId, member: &DirectoryMember) -> Self {
        Self {
            id: None,
            workspace_id,
            slack_user_id: member.user_id.clone(),
            slack_handle: member.handle.clone(),
            display_name: member.display_name.clone(),
            avatar_url: member.avatar_url.clone(),
            birthday_day: None,
            birthday_month: None,
            birthday_year: None,
            hire_date: None,
            public_celebration_opt_in: true,
            reminders_mode: RemindersMode::SameDay,
        }
    }

    fn fill_blanks_from(&mut self, member: &DirectoryMember) {
        fill_if_blank(&mut self.slack_handle, &member.handle);
        fill_if_blank(&mut self.display_name, &member.display_name);
        fill_if_blank(&mut self.avatar_url, &member.avatar_url);
    }

    fn sort_key(&self) -> (String, String) {
        let label = first_non_blank(&[&self.display_name, &self.slack_handle, &self.slack_user_id]);
        (label.to_lowercase(), self.slack_user_id.to_lowercase())
    }
}

fn fill_if_blank(field: &mut String, value: &str) {
    if field.trim().is_empty() {
        *field = value.to_string();
    }
}

/// Merge stored people with directory members.
///
/// Stored values win; only blank handle, display name and avatar are
/// filled in. Members never saved appear with default preferences, and
/// stored people missing from the directory are kept. The result is sorted
/// by display label (case-insensitive), then by user id.
pub fn merge_with_directory(
    workspace_id: DbId,
    existing: Vec<Person>,
    members: &[DirectoryMember],
) -> Vec<RosterEntry> {
    let mut stored: HashMap<String, RosterEntry> = existing
        .into_iter()
        .map(|p| (p.slack_user_id.clone(), RosterEntry::from_person(p)))
        .collect();

    let mut merged = Vec::with_capacity(stored.len() + members.len());
    for member in members {
        match stored.remove(&member.user_id) {
            Some(mut entry) => {
                entry.fill_blanks_from(member);
                merged.push(entry);
            }
            None => merged.push(RosterEntry::from_member(workspace_id, member)),
        }
    }
    merged.extend(stored.into_values());

    merged.sort_by_cached_key(RosterEntry::sort_key);
    merged
}

/// People list for the dashboard.
///
/// Without a usable bot token only stored people are returned. Other
/// directory failures are returned to the caller.
pub async fn list_people(
    pool: &DbPool,
    directory: &dyn MemberDirectory,
    workspace_id: DbId,
) -> Result<Vec<RosterEntry>, RosterError> {
    let existing = PersonRepo::list_by_workspace(pool, workspace_id).await?;

    let members = match directory.list_members(workspace_id).await {
        Ok(members) => members,
        Err(MessagingError::MissingToken) => Vec::new(),
        Err(e) => return Err(e.into()),
    };

    Ok(merge_with_directory(workspace_id, existing, &members))
}

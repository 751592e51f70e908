//! Inbound direct-message handling.
//!
//! A member replies to the bot with their birthday and/or hire date. The
//! text is parsed, merged over any stored record and saved; the member gets
//! either an acknowledgement or a help message back. Outbound DM failures
//! are logged and never fail the event.

use std::sync::Arc;

use cheers_core::messages::{profile_input_help, save_acknowledgement};
use cheers_core::messaging::{DirectoryProfile, MemberDirectory, Messenger};
use cheers_core::person::{first_non_blank, RemindersMode};
use cheers_core::profile_input::{self, ParseError, ParsedProfileInput};
use cheers_core::types::DbId;
use cheers_db::models::person::{Person, UpsertPerson};
use cheers_db::repositories::{PersonRepo, WorkspaceRepo};
use cheers_db::DbPool;
use serde::Deserialize;

// ---------------------------------------------------------------------------
// Event payload
// ---------------------------------------------------------------------------

/// Outer Events API envelope. Unknown fields are ignored.
#[derive(Debug, Default, Deserialize)]
pub struct EventEnvelope {
    #[serde(default, rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub team_id: String,
    #[serde(default)]
    pub event: MessageEvent,
}

#[derive(Debug, Default, Deserialize)]
pub struct MessageEvent {
    #[serde(default, rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub subtype: String,
    #[serde(default)]
    pub bot_id: String,
    #[serde(default)]
    pub user: String,
    #[serde(default)]
    pub text: String,
    #[serde(default)]
    pub channel_type: String,
}

/// A human-authored direct message to the bot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InboundMessage {
    pub slack_team_id: String,
    pub slack_user_id: String,
    pub text: String,
}

impl EventEnvelope {
    /// The direct message carried by this envelope, if it is one we act on.
    ///
    /// Only plain `message` events in an `im` channel from a user count;
    /// edits, joins and anything posted by a bot carry a subtype or bot id
    /// and are ignored.
    pub fn direct_message(&self) -> Option<InboundMessage> {
        if self.kind != "event_callback" {
            return None;
        }
        let ev = &self.event;
        let user = ev.user.trim();
        if ev.kind != "message" || ev.channel_type != "im" || user.is_empty() {
            return None;
        }
        if !ev.subtype.trim().is_empty() || !ev.bot_id.trim().is_empty() {
            return None;
        }

        Some(InboundMessage {
            slack_team_id: self.team_id.trim().to_string(),
            slack_user_id: user.to_string(),
            text: ev.text.clone(),
        })
    }
}

// ---------------------------------------------------------------------------
// Merge
// ---------------------------------------------------------------------------

/// Build the full replacement row for a parsed DM.
///
/// Handle and display name prefer the fresh profile, then the stored value,
/// then the Slack user id. The avatar prefers the profile, then the stored
/// value. Opt-in and reminders mode are never changed here. A parsed
/// birthday replaces all three birthday columns, including clearing a
/// stored year the member left out.
pub fn merge_person_update(
    slack_user_id: &str,
    existing: Option<&Person>,
    parsed: &ParsedProfileInput,
    profile: Option<&DirectoryProfile>,
) -> UpsertPerson {
    let mut merged = match existing {
        Some(person) => UpsertPerson::from_person(person),
        None => UpsertPerson::new(slack_user_id),
    };

    let (p_handle, p_display, p_avatar) = profile
        .map(|p| (p.handle.as_str(), p.display_name.as_str(), p.avatar_url.as_str()))
        .unwrap_or(("", "", ""));
    let (e_handle, e_display, e_avatar) = existing
        .map(|p| (p.slack_handle.as_str(), p.display_name.as_str(), p.avatar_url.as_str()))
        .unwrap_or(("", "", ""));

    merged.slack_handle = first_non_blank(&[p_handle, e_handle, slack_user_id]).to_string();
    merged.display_name = first_non_blank(&[p_display, e_display, slack_user_id]).to_string();
    merged.avatar_url = first_non_blank(&[p_avatar, e_avatar]).to_string();

    if existing.is_none() {
        merged.public_celebration_opt_in = true;
        merged.reminders_mode = RemindersMode::SameDay;
    }

    if let Some(birthday) = parsed.birthday {
        // The parser bounds day, month and year well inside i16.
        merged.birthday_day = Some(birthday.day as i16);
        merged.birthday_month = Some(birthday.month as i16);
        merged.birthday_year = birthday.year.map(|y| y as i16);
    }
    if let Some(hire_date) = parsed.hire_date {
        merged.hire_date = Some(hire_date);
    }

    merged
}

/// Merge a parsed DM over the stored record and save it.
pub async fn apply_parsed_input(
    pool: &DbPool,
    workspace_id: DbId,
    slack_user_id: &str,
    parsed: &ParsedProfileInput,
    profile: Option<&DirectoryProfile>,
) -> Result<Person, sqlx::Error> {
    let existing = PersonRepo::find_by_workspace_and_user(pool, workspace_id, slack_user_id).await?;
    let input = merge_person_update(slack_user_id, existing.as_ref(), parsed, profile);
    PersonRepo::upsert(pool, workspace_id, &input).await
}

// ---------------------------------------------------------------------------
// Handler
// ---------------------------------------------------------------------------

/// What happened to one inbound direct message.
#[derive(Debug)]
pub enum InboundOutcome {
    /// Not a message we act on.
    Ignored,
    /// No workspace is installed for the event's team id.
    UnknownWorkspace,
    /// The text did not parse; a help message was sent.
    HelpSent(ParseError),
    Saved(Person),
}

#[derive(Clone)]
pub struct InboundEventHandler {
    pool: DbPool,
    messenger: Arc<dyn Messenger>,
    directory: Arc<dyn MemberDirectory>,
}

impl InboundEventHandler {
    pub fn new(
        pool: DbPool,
        messenger: Arc<dyn Messenger>,
        directory: Arc<dyn MemberDirectory>,
    ) -> Self {
        Self {
            pool,
            messenger,
            directory,
        }
    }

    /// Handle a decoded Events API envelope.
    pub async fn handle_event(&self, envelope: &EventEnvelope) -> Result<InboundOutcome, sqlx::Error> {
        match envelope.direct_message() {
            Some(message) => self.handle_direct_message(&message).await,
            None => Ok(InboundOutcome::Ignored),
        }
    }

    pub async fn handle_direct_message(
        &self,
        message: &InboundMessage,
    ) -> Result<InboundOutcome, sqlx::Error> {
        let Some(workspace) = WorkspaceRepo::find_by_team_id(&self.pool, &message.slack_team_id).await?
        else {
            tracing::warn!(
                slack_team_id = %message.slack_team_id,
                "Direct message for unknown workspace"
            );
            return Ok(InboundOutcome::UnknownWorkspace);
        };
        let user_id = message.slack_user_id.as_str();

        let parsed = match profile_input::parse(&message.text) {
            Ok(parsed) => parsed,
            Err(reason) => {
                tracing::debug!(user_id, reason = %reason, "Unparseable profile reply");
                let help = profile_input_help(&reason.to_string());
                if let Err(e) = self
                    .messenger
                    .send_direct_message(workspace.id, user_id, &help)
                    .await
                {
                    tracing::warn!(user_id, error = %e, "Failed to send profile input help");
                }
                return Ok(InboundOutcome::HelpSent(reason));
            }
        };

        let profile = match self.directory.user_profile(workspace.id, user_id).await {
            Ok(profile) => Some(profile),
            Err(e) => {
                tracing::warn!(user_id, error = %e, "Failed to fetch Slack user profile");
                None
            }
        };

        let person =
            apply_parsed_input(&self.pool, workspace.id, user_id, &parsed, profile.as_ref()).await?;

        tracing::info!(
            workspace_id = workspace.id,
            user_id,
            birthday = parsed.has_birthday(),
            hire_date = parsed.has_hire_date(),
            "Saved profile dates from direct message"
        );

        if let Err(e) = self
            .messenger
            .send_direct_message(workspace.id, user_id, save_acknowledgement(&parsed))
            .await
        {
            tracing::warn!(user_id, error = %e, "Failed to send save acknowledgement");
        }

        Ok(InboundOutcome::Saved(person))
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

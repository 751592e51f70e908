//! Workspace channel model.

use cheers_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A row from the `workspace_channels` table.
///
/// `posting_time` is selected as `HH24:MI` text.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct WorkspaceChannel {
    pub id: DbId,
    pub workspace_id: DbId,
    pub slack_channel_id: String,
    pub slack_channel_name: String,
    pub posting_time: String,
    pub timezone: String,
    pub birthdays_enabled: bool,
    pub anniversaries_enabled: bool,
    pub birthday_template: String,
    pub anniversary_template: String,
    pub branding_emoji: Option<String>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for `PUT .../channels/{channel}/settings`.
#[derive(Debug, Clone, Deserialize)]
pub struct UpdateChannelSettings {
    pub posting_time: String,
    pub timezone: String,
    pub birthdays_enabled: bool,
    pub anniversaries_enabled: bool,
}

/// DTO for `PUT .../channels/{channel}/templates`.
#[derive(Debug, Clone, Deserialize)]
pub struct UpdateChannelTemplates {
    pub birthday_template: String,
    pub anniversary_template: String,
    pub branding_emoji: Option<String>,
}

//! Workspace (Slack team installation) model.

use cheers_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A row from the `workspaces` table.
///
/// The bot token is never serialized.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Workspace {
    pub id: DbId,
    pub slack_team_id: String,
    pub name: String,
    pub timezone: String,
    #[serde(skip_serializing)]
    pub slack_bot_token: Option<String>,
    pub slack_bot_user_id: Option<String>,
    pub installed_by_user_id: Option<String>,
    pub installed_scopes: Option<String>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for creating or refreshing a workspace keyed by team id.
#[derive(Debug, Clone, Deserialize)]
pub struct UpsertWorkspace {
    pub slack_team_id: String,
    pub name: String,
    pub timezone: String,
}

/// Bot credentials recorded on install.
#[derive(Debug, Clone, Deserialize)]
pub struct SaveInstallation {
    pub slack_team_id: String,
    pub name: String,
    pub bot_token: String,
    pub bot_user_id: String,
    pub installed_by_user_id: Option<String>,
    pub scopes: Option<String>,
}

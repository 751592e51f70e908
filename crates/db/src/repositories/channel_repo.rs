//! Repository for the `workspace_channels` and `celebration_dispatch_log`
//! tables.
//!
//! The dispatch log is the only guard against posting twice for the same
//! channel and local date, so [`ChannelRepo::mark_dispatched`] is an
//! insert-if-absent.

use chrono::NaiveDate;
use cheers_core::render::{DEFAULT_ANNIVERSARY_TEMPLATE, DEFAULT_BIRTHDAY_TEMPLATE};
use cheers_core::types::DbId;
use sqlx::PgPool;

use crate::models::channel::{UpdateChannelSettings, UpdateChannelTemplates, WorkspaceChannel};
use crate::models::dispatch_log::DispatchLogEntry;

/// Column list for `workspace_channels` queries.
const COLUMNS: &str = "\
    id, workspace_id, slack_channel_id, slack_channel_name, \
    to_char(posting_time, 'HH24:MI') AS posting_time, timezone, \
    birthdays_enabled, anniversaries_enabled, \
    birthday_template, anniversary_template, branding_emoji, \
    created_at, updated_at";

const LOG_COLUMNS: &str = "id, workspace_channel_id, dispatch_date, created_at";

/// Provides data access for celebration channels and their dispatch log.
pub struct ChannelRepo;

impl ChannelRepo {
    /// Create a channel or refresh its name, schedule and timezone.
    ///
    /// New channels start with the default templates; existing templates are
    /// left alone. `posting_time` must already be validated as `HH:MM`.
    pub async fn upsert_default(
        pool: &PgPool,
        workspace_id: DbId,
        slack_channel_id: &str,
        slack_channel_name: &str,
        timezone: &str,
        posting_time: &str,
    ) -> Result<WorkspaceChannel, sqlx::Error> {
        let query = format!(
            "INSERT INTO workspace_channels \
                 (workspace_id, slack_channel_id, slack_channel_name, posting_time, timezone, \
                  birthday_template, anniversary_template) \
             VALUES ($1, $2, $3, $4::time, $5, $6, $7) \
             ON CONFLICT (workspace_id, slack_channel_id) DO UPDATE SET \
                 slack_channel_name = EXCLUDED.slack_channel_name, \
                 posting_time = EXCLUDED.posting_time, \
                 timezone = EXCLUDED.timezone, \
                 updated_at = NOW() \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, WorkspaceChannel>(&query)
            .bind(workspace_id)
            .bind(slack_channel_id)
            .bind(slack_channel_name)
            .bind(posting_time)
            .bind(timezone)
            .bind(DEFAULT_BIRTHDAY_TEMPLATE)
            .bind(DEFAULT_ANNIVERSARY_TEMPLATE)
            .fetch_one(pool)
            .await
    }

    /// Channels of one workspace ordered by name.
    pub async fn list_by_workspace(
        pool: &PgPool,
        workspace_id: DbId,
    ) -> Result<Vec<WorkspaceChannel>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM workspace_channels \
             WHERE workspace_id = $1 \
             ORDER BY slack_channel_name, id"
        );
        sqlx::query_as::<_, WorkspaceChannel>(&query)
            .bind(workspace_id)
            .fetch_all(pool)
            .await
    }

    /// Every channel across all workspaces, in id order.
    pub async fn list_all(pool: &PgPool) -> Result<Vec<WorkspaceChannel>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM workspace_channels ORDER BY id");
        sqlx::query_as::<_, WorkspaceChannel>(&query)
            .fetch_all(pool)
            .await
    }

    /// Look up a channel by numeric id or Slack channel id within a workspace.
    pub async fn find_for_workspace(
        pool: &PgPool,
        workspace_id: DbId,
        channel_key: &str,
    ) -> Result<Option<WorkspaceChannel>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM workspace_channels \
             WHERE workspace_id = $1 AND (id::text = $2 OR slack_channel_id = $2) \
             ORDER BY id \
             LIMIT 1"
        );
        sqlx::query_as::<_, WorkspaceChannel>(&query)
            .bind(workspace_id)
            .bind(channel_key)
            .fetch_optional(pool)
            .await
    }

    /// Replace schedule and enable flags. `posting_time` must be `HH:MM`.
    pub async fn update_settings(
        pool: &PgPool,
        id: DbId,
        input: &UpdateChannelSettings,
    ) -> Result<WorkspaceChannel, sqlx::Error> {
        let query = format!(
            "UPDATE workspace_channels SET \
                 posting_time = $2::time, \
                 timezone = $3, \
                 birthdays_enabled = $4, \
                 anniversaries_enabled = $5, \
                 updated_at = NOW() \
             WHERE id = $1 \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, WorkspaceChannel>(&query)
            .bind(id)
            .bind(input.posting_time.trim())
            .bind(input.timezone.trim())
            .bind(input.birthdays_enabled)
            .bind(input.anniversaries_enabled)
            .fetch_one(pool)
            .await
    }

    /// Replace both templates and the branding suffix (blank clears it).
    pub async fn update_templates(
        pool: &PgPool,
        id: DbId,
        input: &UpdateChannelTemplates,
    ) -> Result<WorkspaceChannel, sqlx::Error> {
        let branding = input
            .branding_emoji
            .as_deref()
            .map(str::trim)
            .filter(|b| !b.is_empty());
        let query = format!(
            "UPDATE workspace_channels SET \
                 birthday_template = $2, \
                 anniversary_template = $3, \
                 branding_emoji = $4, \
                 updated_at = NOW() \
             WHERE id = $1 \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, WorkspaceChannel>(&query)
            .bind(id)
            .bind(input.birthday_template.trim())
            .bind(input.anniversary_template.trim())
            .bind(branding)
            .fetch_one(pool)
            .await
    }

    // -----------------------------------------------------------------------
    // Dispatch log
    // -----------------------------------------------------------------------

    /// Whether the channel was already handled for `local_date`.
    pub async fn is_dispatched(
        pool: &PgPool,
        channel_id: DbId,
        local_date: NaiveDate,
    ) -> Result<bool, sqlx::Error> {
        sqlx::query_scalar(
            "SELECT EXISTS (\
                 SELECT 1 FROM celebration_dispatch_log \
                 WHERE workspace_channel_id = $1 AND dispatch_date = $2)",
        )
        .bind(channel_id)
        .bind(local_date)
        .fetch_one(pool)
        .await
    }

    /// Record that the channel was handled for `local_date`.
    ///
    /// Returns `None` when the date was already recorded.
    pub async fn mark_dispatched(
        pool: &PgPool,
        channel_id: DbId,
        local_date: NaiveDate,
    ) -> Result<Option<DispatchLogEntry>, sqlx::Error> {
        let query = format!(
            "INSERT INTO celebration_dispatch_log (workspace_channel_id, dispatch_date) \
             VALUES ($1, $2) \
             ON CONFLICT (workspace_channel_id, dispatch_date) DO NOTHING \
             RETURNING {LOG_COLUMNS}"
        );
        sqlx::query_as::<_, DispatchLogEntry>(&query)
            .bind(channel_id)
            .bind(local_date)
            .fetch_optional(pool)
            .await
    }
}

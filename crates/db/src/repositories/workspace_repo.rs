//! Repository for the `workspaces` table.

use cheers_core::types::DbId;
use sqlx::PgPool;

use crate::models::workspace::{SaveInstallation, UpsertWorkspace, Workspace};

/// Column list for `workspaces` queries.
const COLUMNS: &str = "\
    id, slack_team_id, name, timezone, slack_bot_token, slack_bot_user_id, \
    installed_by_user_id, installed_scopes, created_at, updated_at";

/// Provides data access for workspaces.
pub struct WorkspaceRepo;

impl WorkspaceRepo {
    /// Create a workspace or refresh its name and timezone, keyed by team id.
    pub async fn upsert(pool: &PgPool, input: &UpsertWorkspace) -> Result<Workspace, sqlx::Error> {
        let query = format!(
            "INSERT INTO workspaces (slack_team_id, name, timezone) \
             VALUES ($1, $2, $3) \
             ON CONFLICT (slack_team_id) DO UPDATE SET \
                 name = EXCLUDED.name, \
                 timezone = EXCLUDED.timezone, \
                 updated_at = NOW() \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Workspace>(&query)
            .bind(&input.slack_team_id)
            .bind(&input.name)
            .bind(&input.timezone)
            .fetch_one(pool)
            .await
    }

    /// Record bot credentials for a team, creating the workspace if needed.
    ///
    /// A re-install replaces the token but keeps the stored timezone.
    pub async fn save_installation(
        pool: &PgPool,
        input: &SaveInstallation,
    ) -> Result<Workspace, sqlx::Error> {
        let query = format!(
            "INSERT INTO workspaces \
                 (slack_team_id, name, slack_bot_token, slack_bot_user_id, \
                  installed_by_user_id, installed_scopes) \
             VALUES ($1, $2, $3, $4, $5, $6) \
             ON CONFLICT (slack_team_id) DO UPDATE SET \
                 name = EXCLUDED.name, \
                 slack_bot_token = EXCLUDED.slack_bot_token, \
                 slack_bot_user_id = EXCLUDED.slack_bot_user_id, \
                 installed_by_user_id = EXCLUDED.installed_by_user_id, \
                 installed_scopes = EXCLUDED.installed_scopes, \
                 updated_at = NOW() \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Workspace>(&query)
            .bind(&input.slack_team_id)
            .bind(&input.name)
            .bind(&input.bot_token)
            .bind(&input.bot_user_id)
            .bind(&input.installed_by_user_id)
            .bind(&input.scopes)
            .fetch_one(pool)
            .await
    }

    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Workspace>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM workspaces WHERE id = $1");
        sqlx::query_as::<_, Workspace>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    pub async fn find_by_team_id(
        pool: &PgPool,
        slack_team_id: &str,
    ) -> Result<Option<Workspace>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM workspaces WHERE slack_team_id = $1");
        sqlx::query_as::<_, Workspace>(&query)
            .bind(slack_team_id)
            .fetch_optional(pool)
            .await
    }

    /// Stored bot token for a workspace, if one was installed.
    ///
    /// Blank tokens are reported as `None`.
    pub async fn bot_token(pool: &PgPool, id: DbId) -> Result<Option<String>, sqlx::Error> {
        let row: Option<(Option<String>,)> =
            sqlx::query_as("SELECT slack_bot_token FROM workspaces WHERE id = $1")
                .bind(id)
                .fetch_optional(pool)
                .await?;
        Ok(row
            .and_then(|(token,)| token)
            .filter(|token| !token.trim().is_empty()))
    }
}

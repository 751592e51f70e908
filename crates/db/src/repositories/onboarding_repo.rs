//! Repository for the `onboarding_dm_log` table.

use std::collections::HashSet;

use cheers_core::types::DbId;
use sqlx::PgPool;

use crate::models::onboarding::OnboardingDmRecord;

const COLUMNS: &str = "id, workspace_id, slack_user_id, sent_at";

/// Tracks which members already received the onboarding DM.
pub struct OnboardingRepo;

impl OnboardingRepo {
    /// Slack user ids already messaged in a workspace.
    pub async fn sent_user_ids(
        pool: &PgPool,
        workspace_id: DbId,
    ) -> Result<HashSet<String>, sqlx::Error> {
        let ids: Vec<String> =
            sqlx::query_scalar("SELECT slack_user_id FROM onboarding_dm_log WHERE workspace_id = $1")
                .bind(workspace_id)
                .fetch_all(pool)
                .await?;
        Ok(ids.into_iter().collect())
    }

    /// Record a sent DM. A forced re-send refreshes `sent_at`.
    pub async fn mark_sent(
        pool: &PgPool,
        workspace_id: DbId,
        slack_user_id: &str,
    ) -> Result<OnboardingDmRecord, sqlx::Error> {
        let query = format!(
            "INSERT INTO onboarding_dm_log (workspace_id, slack_user_id) \
             VALUES ($1, $2) \
             ON CONFLICT (workspace_id, slack_user_id) DO UPDATE SET sent_at = NOW() \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, OnboardingDmRecord>(&query)
            .bind(workspace_id)
            .bind(slack_user_id)
            .fetch_one(pool)
            .await
    }
}

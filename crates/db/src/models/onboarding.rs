use cheers_core::types::{DbId, Timestamp};
use serde::Serialize;
use sqlx::FromRow;

/// A row from the `onboarding_dm_log` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct OnboardingDmRecord {
    pub id: DbId,
    pub workspace_id: DbId,
    pub slack_user_id: String,
    pub sent_at: Timestamp,
}

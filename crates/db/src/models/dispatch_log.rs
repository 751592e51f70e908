use chrono::NaiveDate;
use cheers_core::types::{DbId, Timestamp};
use serde::Serialize;
use sqlx::FromRow;

/// A row from the `celebration_dispatch_log` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct DispatchLogEntry {
    pub id: DbId,
    pub workspace_channel_id: DbId,
    pub dispatch_date: NaiveDate,
    pub created_at: Timestamp,
}

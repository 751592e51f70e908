//! Due-channel selection.
//!
//! A channel is due when `now`, seen in the channel's timezone, falls in its
//! posting minute and no dispatch is logged for that local date. There is
//! no catch-up: a tick that misses the minute skips the day.

use chrono::NaiveDate;
use cheers_core::channel_settings::{local_slot, parse_timezone, PostingTime};
use cheers_core::error::CoreError;
use cheers_core::types::Timestamp;
use cheers_db::models::channel::WorkspaceChannel;
use cheers_db::repositories::ChannelRepo;
use cheers_db::DbPool;

/// Local date the channel would dispatch for, if `now` is in its posting
/// minute. Errors on an unparseable timezone or posting time.
pub fn posting_date(channel: &WorkspaceChannel, now: Timestamp) -> Result<Option<NaiveDate>, CoreError> {
    let tz = parse_timezone(&channel.timezone)?;
    let posting_time = PostingTime::parse(&channel.posting_time)?;
    let slot = local_slot(now, tz);
    Ok(posting_time.matches(slot.time).then_some(slot.date))
}

/// Channels due at `now`, in id order.
///
/// Channels with a broken schedule are logged and left out; they never
/// abort the selection.
pub async fn list_due_channels(
    pool: &DbPool,
    now: Timestamp,
) -> Result<Vec<WorkspaceChannel>, sqlx::Error> {
    let channels = ChannelRepo::list_all(pool).await?;
    let mut due = Vec::new();

    for channel in channels {
        let local_date = match posting_date(&channel, now) {
            Ok(Some(date)) => date,
            Ok(None) => continue,
            Err(e) => {
                tracing::warn!(
                    channel_id = channel.id,
                    workspace_id = channel.workspace_id,
                    error = %e,
                    "Skipping channel with invalid schedule"
                );
                continue;
            }
        };

        if ChannelRepo::is_dispatched(pool, channel.id, local_date).await? {
            continue;
        }
        due.push(channel);
    }

    Ok(due)
}

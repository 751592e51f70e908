//! Celebration dispatch.
//!
//! [`CelebrationDispatcher`] runs one pass per channel: find today's
//! birthdays and work anniversaries in the channel's timezone, post one
//! message per kind, then record the local date in the dispatch log. The
//! log entry is written even when nothing was posted, and never when a step
//! before it failed.

use std::sync::Arc;

use chrono::{Datelike, NaiveDate};
use cheers_core::channel_settings::{local_slot, parse_timezone};
use cheers_core::messaging::Messenger;
use cheers_core::render;
use cheers_core::types::{DbId, Timestamp};
use cheers_db::models::channel::WorkspaceChannel;
use cheers_db::repositories::{ChannelRepo, PersonRepo};
use cheers_db::DbPool;
use serde::Serialize;

use crate::error::DispatchError;
use crate::selector;

// ---------------------------------------------------------------------------
// Results
// ---------------------------------------------------------------------------

/// What one channel pass found and posted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DispatchOutcome {
    pub local_date: NaiveDate,
    pub birthdays: usize,
    pub anniversaries: usize,
    pub birthday_posted: bool,
    pub anniversary_posted: bool,
}

impl DispatchOutcome {
    fn new(local_date: NaiveDate) -> Self {
        Self {
            local_date,
            birthdays: 0,
            anniversaries: 0,
            birthday_posted: false,
            anniversary_posted: false,
        }
    }
}

/// Per-channel entry of a manual workspace dispatch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChannelDispatchResult {
    pub channel_id: DbId,
    pub slack_channel_id: String,
    pub birthdays: usize,
    pub anniversaries: usize,
    pub birthday_posted: bool,
    pub anniversary_posted: bool,
    /// Already dispatched for the channel's local date; nothing was posted.
    pub skipped: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ChannelDispatchResult {
    fn for_channel(channel: &WorkspaceChannel) -> Self {
        Self {
            channel_id: channel.id,
            slack_channel_id: channel.slack_channel_id.clone(),
            birthdays: 0,
            anniversaries: 0,
            birthday_posted: false,
            anniversary_posted: false,
            skipped: false,
            error: None,
        }
    }
}

/// Totals for one scheduler tick.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TickSummary {
    pub due: usize,
    pub dispatched: usize,
    pub failed: usize,
}

// ---------------------------------------------------------------------------
// Dispatcher
// ---------------------------------------------------------------------------

/// Posts birthday and anniversary messages for celebration channels.
#[derive(Clone)]
pub struct CelebrationDispatcher {
    pool: DbPool,
    messenger: Arc<dyn Messenger>,
}

impl CelebrationDispatcher {
    pub fn new(pool: DbPool, messenger: Arc<dyn Messenger>) -> Self {
        Self { pool, messenger }
    }

    /// Dispatch every channel that is due at `now`, one at a time.
    ///
    /// A failing channel is logged and counted; it never stops the others.
    /// Only the due-channel query itself can fail the whole tick.
    pub async fn run_due_celebrations(&self, now: Timestamp) -> Result<TickSummary, sqlx::Error> {
        let channels = selector::list_due_channels(&self.pool, now).await?;
        let mut summary = TickSummary {
            due: channels.len(),
            ..TickSummary::default()
        };

        for channel in &channels {
            match self.dispatch_channel(channel, now).await {
                Ok(_) => summary.dispatched += 1,
                Err(e) => {
                    summary.failed += 1;
                    tracing::error!(
                        channel_id = channel.id,
                        workspace_id = channel.workspace_id,
                        error = %e,
                        "Channel celebration dispatch failed"
                    );
                }
            }
        }

        if summary.due > 0 {
            tracing::info!(
                due = summary.due,
                dispatched = summary.dispatched,
                failed = summary.failed,
                "Processed due celebration channels"
            );
        }

        Ok(summary)
    }

    /// Dispatch every channel of a workspace now, ignoring posting times.
    ///
    /// Channels already logged for their local date are reported as skipped
    /// so a manual run never repeats a scheduled one. Per-channel failures
    /// are reported in the result, not returned.
    pub async fn dispatch_workspace_now(
        &self,
        workspace_id: DbId,
        now: Timestamp,
    ) -> Result<Vec<ChannelDispatchResult>, sqlx::Error> {
        let channels = ChannelRepo::list_by_workspace(&self.pool, workspace_id).await?;
        let mut results = Vec::with_capacity(channels.len());

        for channel in &channels {
            let mut result = ChannelDispatchResult::for_channel(channel);

            match self.already_dispatched(channel, now).await {
                Ok(true) => {
                    result.skipped = true;
                    results.push(result);
                    continue;
                }
                Ok(false) => {}
                Err(e) => {
                    result.error = Some(e.to_string());
                    results.push(result);
                    continue;
                }
            }

            match self.dispatch_channel(channel, now).await {
                Ok(outcome) => {
                    result.birthdays = outcome.birthdays;
                    result.anniversaries = outcome.anniversaries;
                    result.birthday_posted = outcome.birthday_posted;
                    result.anniversary_posted = outcome.anniversary_posted;
                }
                Err(e) => {
                    tracing::error!(
                        channel_id = channel.id,
                        workspace_id,
                        error = %e,
                        "Manual celebration dispatch failed"
                    );
                    result.error = Some(e.to_string());
                }
            }
            results.push(result);
        }

        Ok(results)
    }

    /// One dispatch pass for `channel` at `now`.
    ///
    /// Does not check the dispatch log; callers decide whether the channel
    /// is eligible. The final mark is idempotent, so a repeated pass still
    /// leaves a single log row.
    pub async fn dispatch_channel(
        &self,
        channel: &WorkspaceChannel,
        now: Timestamp,
    ) -> Result<DispatchOutcome, DispatchError> {
        let local_date = channel_local_date(channel, now)?;
        let (month, day, year) = (local_date.month(), local_date.day(), local_date.year());
        let branding = channel.branding_emoji.as_deref();
        let mut outcome = DispatchOutcome::new(local_date);

        if channel.birthdays_enabled {
            let people =
                PersonRepo::find_birthdays(&self.pool, channel.workspace_id, month, day).await?;
            outcome.birthdays = people.len();

            if !people.is_empty() {
                let mentions = render::mention_list(people.iter().map(|p| p.slack_user_id.as_str()));
                let text = render::render_birthday(&channel.birthday_template, &mentions, branding);
                let avatars = render::avatar_refs(people.iter().map(|p| p.avatar_url.as_str()));

                self.messenger
                    .post_message(channel.workspace_id, &channel.slack_channel_id, &text, &avatars)
                    .await?;
                outcome.birthday_posted = true;
            }
        }

        if channel.anniversaries_enabled {
            let people =
                PersonRepo::find_anniversaries(&self.pool, channel.workspace_id, month, day, year)
                    .await?;
            outcome.anniversaries = people.len();

            if !people.is_empty() {
                let mentions =
                    render::mention_list(people.iter().map(|a| a.person.slack_user_id.as_str()));
                let years: Vec<i32> = people.iter().map(|a| a.years).collect();
                let text = render::render_anniversary(
                    &channel.anniversary_template,
                    &mentions,
                    &years,
                    branding,
                );
                let avatars =
                    render::avatar_refs(people.iter().map(|a| a.person.avatar_url.as_str()));

                self.messenger
                    .post_message(channel.workspace_id, &channel.slack_channel_id, &text, &avatars)
                    .await?;
                outcome.anniversary_posted = true;
            }
        }

        ChannelRepo::mark_dispatched(&self.pool, channel.id, local_date).await?;

        tracing::info!(
            channel_id = channel.id,
            workspace_id = channel.workspace_id,
            %local_date,
            birthdays = outcome.birthdays,
            anniversaries = outcome.anniversaries,
            "Channel celebration dispatched"
        );

        Ok(outcome)
    }

    async fn already_dispatched(
        &self,
        channel: &WorkspaceChannel,
        now: Timestamp,
    ) -> Result<bool, DispatchError> {
        let local_date = channel_local_date(channel, now)?;
        Ok(ChannelRepo::is_dispatched(&self.pool, channel.id, local_date).await?)
    }
}

fn channel_local_date(channel: &WorkspaceChannel, now: Timestamp) -> Result<NaiveDate, DispatchError> {
    let tz = parse_timezone(&channel.timezone)
        .map_err(|_| DispatchError::InvalidTimezone(channel.timezone.clone()))?;
    Ok(local_slot(now, tz).date)
}

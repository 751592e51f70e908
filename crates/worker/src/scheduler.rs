//! Background celebration scheduler.
//!
//! [`CelebrationScheduler`] wakes up on a fixed interval and hands the
//! current instant to [`CelebrationDispatcher::run_due_celebrations`].
//! Due-ness is decided per channel from the wall clock, so a tick that runs
//! late simply finds nothing due for the minute it missed.

use std::time::Duration;

use chrono::Utc;
use cheers_core::types::Timestamp;
use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;

use crate::dispatcher::{CelebrationDispatcher, TickSummary};

// ---------------------------------------------------------------------------
// CelebrationScheduler
// ---------------------------------------------------------------------------

pub struct CelebrationScheduler {
    dispatcher: CelebrationDispatcher,
    poll_interval: Duration,
}

impl CelebrationScheduler {
    pub fn new(dispatcher: CelebrationDispatcher, poll_interval: Duration) -> Self {
        Self {
            dispatcher,
            poll_interval,
        }
    }

    /// Run the scheduler loop until `cancel` fires.
    ///
    /// The first tick runs immediately. A tick already in progress finishes
    /// before cancellation is observed.
    pub async fn run(&self, cancel: CancellationToken) {
        let mut interval = tokio::time::interval(self.poll_interval);
        interval.set_missed_tick_behavior(MissedTickBehavior::Delay);

        tracing::info!(
            poll_interval_secs = self.poll_interval.as_secs(),
            "Celebration scheduler started"
        );

        loop {
            tokio::select! {
                biased;
                _ = cancel.cancelled() => {
                    tracing::info!("Celebration scheduler cancelled");
                    break;
                }
                _ = interval.tick() => {
                    self.run_tick(Utc::now()).await;
                }
            }
        }
    }

    /// One scheduler pass at `now`. Errors are logged, never propagated.
    pub async fn run_tick(&self, now: Timestamp) -> Option<TickSummary> {
        match self.dispatcher.run_due_celebrations(now).await {
            Ok(summary) => Some(summary),
            Err(e) => {
                tracing::error!(error = %e, "Failed to list due celebration channels");
                None
            }
        }
    }
}

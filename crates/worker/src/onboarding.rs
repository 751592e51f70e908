//! Onboarding DMs asking members for their dates.

use std::collections::{BTreeMap, HashSet};
use std::sync::Arc;

use cheers_core::messages::onboarding_message;
use cheers_core::messaging::{MemberDirectory, Messenger};
use cheers_core::types::DbId;
use cheers_db::repositories::OnboardingRepo;
use cheers_db::DbPool;
use serde::Serialize;

use crate::error::OnboardingError;

/// Totals for one onboarding run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct OnboardingReport {
    pub total_members: usize,
    pub sent: usize,
    pub skipped: usize,
    pub failed: usize,
    /// Sorted Slack user ids that could not be messaged or recorded.
    pub failed_users: Vec<String>,
    pub failed_details: BTreeMap<String, String>,
}

impl OnboardingReport {
    fn record_failure(&mut self, user_id: &str, reason: String) {
        self.failed += 1;
        self.failed_users.push(user_id.to_string());
        self.failed_details.insert(user_id.to_string(), reason);
    }
}

#[derive(Clone)]
pub struct OnboardingService {
    pool: DbPool,
    messenger: Arc<dyn Messenger>,
    directory: Arc<dyn MemberDirectory>,
}

impl OnboardingService {
    pub fn new(
        pool: DbPool,
        messenger: Arc<dyn Messenger>,
        directory: Arc<dyn MemberDirectory>,
    ) -> Self {
        Self {
            pool,
            messenger,
            directory,
        }
    }

    /// DM every human member who has not been onboarded yet.
    ///
    /// With `force`, members already in the onboarding log are messaged
    /// again. A member counts as sent only once the DM went out and the log
    /// row was written; either failure is reported per member.
    pub async fn send_onboarding_dms(
        &self,
        workspace_id: DbId,
        force: bool,
    ) -> Result<OnboardingReport, OnboardingError> {
        let members = self.directory.list_members(workspace_id).await?;
        let already_sent = if force {
            HashSet::new()
        } else {
            OnboardingRepo::sent_user_ids(&self.pool, workspace_id).await?
        };

        let mut report = OnboardingReport {
            total_members: members.len(),
            ..OnboardingReport::default()
        };

        for member in &members {
            if already_sent.contains(&member.user_id) {
                report.skipped += 1;
                continue;
            }

            let text = onboarding_message(&member.display_name);
            if let Err(e) = self
                .messenger
                .send_direct_message(workspace_id, &member.user_id, &text)
                .await
            {
                report.record_failure(&member.user_id, e.to_string());
                continue;
            }

            if let Err(e) = OnboardingRepo::mark_sent(&self.pool, workspace_id, &member.user_id).await
            {
                report.record_failure(&member.user_id, e.to_string());
                continue;
            }

            report.sent += 1;
        }

        report.failed_users.sort();

        tracing::info!(
            workspace_id,
            force,
            total = report.total_members,
            sent = report.sent,
            skipped = report.skipped,
            failed = report.failed,
            "Onboarding DMs dispatched"
        );

        Ok(report)
    }
}

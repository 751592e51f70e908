use async_trait::async_trait;
use cheers_core::messaging::{
    DirectoryMember, DirectoryProfile, MemberDirectory, MessagingError, Messenger,
};
use cheers_core::types::DbId;

/// Logs outbound messages instead of sending them. The directory is empty.
#[derive(Debug, Clone, Default)]
pub struct NoopMessenger;

#[async_trait]
impl Messenger for NoopMessenger {
    async fn post_message(
        &self,
        workspace_id: DbId,
        channel_id: &str,
        text: &str,
        avatar_urls: &[String],
    ) -> Result<(), MessagingError> {
        tracing::info!(
            workspace_id,
            channel_id,
            avatars = avatar_urls.len(),
            text,
            "Noop Slack post"
        );
        Ok(())
    }

    async fn send_direct_message(
        &self,
        workspace_id: DbId,
        user_id: &str,
        text: &str,
    ) -> Result<(), MessagingError> {
        tracing::info!(workspace_id, slack_user_id = user_id, text, "Noop Slack DM");
        Ok(())
    }
}

#[async_trait]
impl MemberDirectory for NoopMessenger {
    async fn user_profile(
        &self,
        _workspace_id: DbId,
        _user_id: &str,
    ) -> Result<DirectoryProfile, MessagingError> {
        Ok(DirectoryProfile::default())
    }

    async fn list_members(&self, _workspace_id: DbId) -> Result<Vec<DirectoryMember>, MessagingError> {
        Ok(Vec::new())
    }
}

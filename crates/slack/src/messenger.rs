//! Workspace-aware Slack messenger.

use async_trait::async_trait;
use cheers_core::messaging::{
    DirectoryMember, DirectoryProfile, MemberDirectory, MessagingError, Messenger,
};
use cheers_core::types::DbId;
use cheers_db::repositories::WorkspaceRepo;
use sqlx::PgPool;

use crate::web_api::SlackWebApi;

/// Posts through the Slack Web API using each workspace's installed bot
/// token, or the configured default token when none is stored.
#[derive(Debug, Clone)]
pub struct SlackMessenger {
    api: SlackWebApi,
    pool: PgPool,
    default_token: Option<String>,
}

impl SlackMessenger {
    pub fn new(api: SlackWebApi, pool: PgPool, default_token: Option<String>) -> Self {
        Self {
            api,
            pool,
            default_token: default_token
                .map(|t| t.trim().to_string())
                .filter(|t| !t.is_empty()),
        }
    }

    /// Stored installation token first, then the default.
    pub async fn resolve_token(&self, workspace_id: DbId) -> Result<String, MessagingError> {
        let stored = WorkspaceRepo::bot_token(&self.pool, workspace_id)
            .await
            .map_err(|e| MessagingError::TokenLookup(e.to_string()))?;

        stored
            .or_else(|| self.default_token.clone())
            .ok_or(MessagingError::MissingToken)
    }
}

#[async_trait]
impl Messenger for SlackMessenger {
    async fn post_message(
        &self,
        workspace_id: DbId,
        channel_id: &str,
        text: &str,
        avatar_urls: &[String],
    ) -> Result<(), MessagingError> {
        let token = self.resolve_token(workspace_id).await?;
        self.api
            .post_message(&token, channel_id, text, avatar_urls)
            .await
            .inspect_err(|e| {
                tracing::error!(workspace_id, channel_id, error = %e, "Slack post message failed");
            })
    }

    async fn send_direct_message(
        &self,
        workspace_id: DbId,
        user_id: &str,
        text: &str,
    ) -> Result<(), MessagingError> {
        let token = self.resolve_token(workspace_id).await?;
        self.api.send_direct_message(&token, user_id, text).await
    }
}

#[async_trait]
impl MemberDirectory for SlackMessenger {
    async fn user_profile(
        &self,
        workspace_id: DbId,
        user_id: &str,
    ) -> Result<DirectoryProfile, MessagingError> {
        let token = self.resolve_token(workspace_id).await?;
        self.api.user_profile(&token, user_id).await
    }

    async fn list_members(&self, workspace_id: DbId) -> Result<Vec<DirectoryMember>, MessagingError> {
        let token = self.resolve_token(workspace_id).await?;
        self.api.list_members(&token).await
    }
}

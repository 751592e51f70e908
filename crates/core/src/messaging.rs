//! Outbound messaging port.
//!
//! The dispatch and inbound flows depend only on these traits. Concrete
//! implementations (Slack Web API, no-op logger) live in `cheers-slack`.

use async_trait::async_trait;
use serde::Serialize;

use crate::types::DbId;

/// Failure of a single outbound call.
#[derive(Debug, thiserror::Error)]
pub enum MessagingError {
    /// Network failure, timeout or unreadable response.
    #[error("slack transport error: {0}")]
    Transport(String),

    /// The remote API answered `ok=false`.
    #[error("slack api error: {error}{hint}")]
    Api { error: String, hint: String },

    /// Neither the workspace installation nor the default config has a token.
    #[error("no Slack bot token configured")]
    MissingToken,

    /// The stored installation could not be read.
    #[error("resolve workspace bot token: {0}")]
    TokenLookup(String),

    /// `conversations.open` succeeded without returning a channel id.
    #[error("slack api error: missing dm channel id")]
    MissingDmChannel,
}

/// Posting capability consumed by the celebration and inbound flows.
#[async_trait]
pub trait Messenger: Send + Sync {
    /// Post `text` to a channel, attaching avatar images in order.
    async fn post_message(
        &self,
        workspace_id: DbId,
        channel_id: &str,
        text: &str,
        avatar_urls: &[String],
    ) -> Result<(), MessagingError>;

    /// Send a direct message to a workspace member.
    async fn send_direct_message(
        &self,
        workspace_id: DbId,
        user_id: &str,
        text: &str,
    ) -> Result<(), MessagingError>;
}

/// Profile fields looked up for a single member.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct DirectoryProfile {
    pub handle: String,
    pub display_name: String,
    pub avatar_url: String,
}

/// One human member from a workspace listing.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct DirectoryMember {
    pub user_id: String,
    pub handle: String,
    pub display_name: String,
    pub avatar_url: String,
}

/// Read-only member lookups against the workspace directory.
#[async_trait]
pub trait MemberDirectory: Send + Sync {
    async fn user_profile(
        &self,
        workspace_id: DbId,
        user_id: &str,
    ) -> Result<DirectoryProfile, MessagingError>;

    /// Human members only: bots, app users, deleted users and Slackbot are
    /// filtered out.
    async fn list_members(&self, workspace_id: DbId) -> Result<Vec<DirectoryMember>, MessagingError>;
}

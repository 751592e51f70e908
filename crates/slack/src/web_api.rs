//! Thin Slack Web API client.
//!
//! Every call takes an explicit bot token; resolving which token belongs to
//! which workspace is [`crate::messenger::SlackMessenger`]'s job.

use std::time::Duration;

use cheers_core::messaging::{DirectoryMember, DirectoryProfile, MessagingError};
use cheers_core::render::MAX_AVATAR_BLOCKS;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::{json, Value};

/// Page size requested from `users.list`.
pub const USERS_PAGE_LIMIT: u32 = 200;

/// Upper bound on `users.list` pages fetched for one listing.
pub const MAX_USER_PAGES: usize = 10;

const SLACKBOT_USER_ID: &str = "USLACKBOT";

// ---------------------------------------------------------------------------
// Response shapes
// ---------------------------------------------------------------------------

/// Fields every Web API response carries.
#[derive(Debug, Default, Deserialize)]
struct ApiStatus {
    #[serde(default)]
    ok: bool,
    #[serde(default)]
    error: String,
    #[serde(default)]
    needed: String,
    #[serde(default)]
    provided: String,
}

impl ApiStatus {
    fn into_result(self, fallback_error: &str) -> Result<(), MessagingError> {
        if self.ok {
            return Ok(());
        }
        let error = match self.error.trim() {
            "" => fallback_error.to_string(),
            e => e.to_string(),
        };
        Err(MessagingError::Api {
            error,
            hint: scope_hint(&self.needed, &self.provided),
        })
    }
}

#[derive(Debug, Deserialize)]
struct StatusOnly {
    #[serde(flatten)]
    status: ApiStatus,
}

#[derive(Debug, Deserialize)]
struct ConversationsOpen {
    #[serde(flatten)]
    status: ApiStatus,
    #[serde(default)]
    channel: Option<ChannelRef>,
}

#[derive(Debug, Deserialize)]
struct ChannelRef {
    #[serde(default)]
    id: String,
}

#[derive(Debug, Deserialize)]
struct UsersInfo {
    #[serde(flatten)]
    status: ApiStatus,
    #[serde(default)]
    user: Option<SlackUser>,
}

#[derive(Debug, Deserialize)]
struct UsersList {
    #[serde(flatten)]
    status: ApiStatus,
    #[serde(default)]
    members: Vec<SlackUser>,
    #[serde(default)]
    response_metadata: Option<ResponseMetadata>,
}

#[derive(Debug, Deserialize)]
struct ResponseMetadata {
    #[serde(default)]
    next_cursor: String,
}

#[derive(Debug, Default, Deserialize)]
struct SlackUser {
    #[serde(default)]
    id: String,
    #[serde(default)]
    name: String,
    #[serde(default)]
    deleted: bool,
    #[serde(default)]
    is_bot: bool,
    #[serde(default)]
    is_app_user: bool,
    #[serde(default)]
    profile: SlackProfile,
}

#[derive(Debug, Default, Deserialize)]
struct SlackProfile {
    #[serde(default)]
    display_name: String,
    #[serde(default)]
    real_name: String,
    #[serde(default)]
    image_192: String,
}

impl SlackUser {
    /// Bots, app users, deleted accounts and Slackbot are not people.
    fn is_human(&self) -> bool {
        !self.id.is_empty()
            && !self.deleted
            && !self.is_bot
            && !self.is_app_user
            && self.id != SLACKBOT_USER_ID
            && !self.name.trim().eq_ignore_ascii_case("slackbot")
    }

    fn display_name(&self) -> &str {
        [&self.profile.display_name, &self.profile.real_name]
            .into_iter()
            .map(|v| v.trim())
            .find(|v| !v.is_empty())
            .unwrap_or("")
    }
}

// ---------------------------------------------------------------------------
// Client
// ---------------------------------------------------------------------------

/// HTTP client for the handful of Web API methods the service uses.
#[derive(Debug, Clone)]
pub struct SlackWebApi {
    client: reqwest::Client,
    base_url: String,
}

impl SlackWebApi {
    /// Build a client whose every request is bounded by `timeout`.
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self, reqwest::Error> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    /// `chat.postMessage` with optional avatar image blocks.
    pub async fn post_message(
        &self,
        token: &str,
        channel: &str,
        text: &str,
        avatar_urls: &[String],
    ) -> Result<(), MessagingError> {
        let mut payload = json!({ "channel": channel, "text": text });
        if let Some(blocks) = message_blocks(text, avatar_urls) {
            payload["blocks"] = Value::Array(blocks);
        }

        let resp: StatusOnly = self.post_json(token, "chat.postMessage", &payload).await?;
        resp.status.into_result("unknown_error")
    }

    /// `conversations.open` for a single user; returns the DM channel id.
    pub async fn open_direct_channel(
        &self,
        token: &str,
        user_id: &str,
    ) -> Result<String, MessagingError> {
        let resp: ConversationsOpen = self
            .post_json(token, "conversations.open", &json!({ "users": user_id }))
            .await?;
        resp.status.into_result("unknown_error")?;

        resp.channel
            .map(|c| c.id.trim().to_string())
            .filter(|id| !id.is_empty())
            .ok_or(MessagingError::MissingDmChannel)
    }

    /// Open a DM channel and post plain text into it.
    pub async fn send_direct_message(
        &self,
        token: &str,
        user_id: &str,
        text: &str,
    ) -> Result<(), MessagingError> {
        let channel = self.open_direct_channel(token, user_id).await?;
        self.post_message(token, &channel, text, &[]).await
    }

    /// `users.info`: handle, display name (falling back to real name) and
    /// the 192px avatar.
    pub async fn user_profile(
        &self,
        token: &str,
        user_id: &str,
    ) -> Result<DirectoryProfile, MessagingError> {
        let resp: UsersInfo = self
            .get(token, "users.info", &[("user", user_id.to_string())])
            .await?;
        resp.status.into_result("users.info failed")?;

        let user = resp.user.unwrap_or_default();
        Ok(DirectoryProfile {
            handle: user.name.trim().to_string(),
            display_name: user.display_name().to_string(),
            avatar_url: user.profile.image_192.trim().to_string(),
        })
    }

    /// Human members of the workspace, following cursors for at most
    /// [`MAX_USER_PAGES`] pages.
    pub async fn list_members(&self, token: &str) -> Result<Vec<DirectoryMember>, MessagingError> {
        let mut members = Vec::new();
        let mut cursor = String::new();

        for _ in 0..MAX_USER_PAGES {
            let mut query = vec![("limit", USERS_PAGE_LIMIT.to_string())];
            if !cursor.is_empty() {
                query.push(("cursor", cursor.clone()));
            }

            let page: UsersList = self.get(token, "users.list", &query).await?;
            page.status.into_result("users.list failed")?;

            members.extend(page.members.iter().filter(|u| u.is_human()).map(|u| {
                let display_name = match u.display_name() {
                    "" => u.name.trim(),
                    name => name,
                };
                DirectoryMember {
                    user_id: u.id.clone(),
                    handle: u.name.trim().to_string(),
                    display_name: display_name.to_string(),
                    avatar_url: u.profile.image_192.trim().to_string(),
                }
            }));

            cursor = page
                .response_metadata
                .map(|m| m.next_cursor.trim().to_string())
                .unwrap_or_default();
            if cursor.is_empty() {
                break;
            }
        }

        Ok(members)
    }

    // -- transport ----------------------------------------------------------

    fn url(&self, method: &str) -> String {
        format!("{}/{method}", self.base_url)
    }

    async fn post_json<T: DeserializeOwned>(
        &self,
        token: &str,
        method: &str,
        payload: &Value,
    ) -> Result<T, MessagingError> {
        let resp = self
            .client
            .post(self.url(method))
            .bearer_auth(token)
            .json(payload)
            .send()
            .await
            .map_err(|e| MessagingError::Transport(format!("call {method}: {e}")))?;
        decode(method, resp).await
    }

    async fn get<T: DeserializeOwned>(
        &self,
        token: &str,
        method: &str,
        query: &[(&str, String)],
    ) -> Result<T, MessagingError> {
        let resp = self
            .client
            .get(self.url(method))
            .bearer_auth(token)
            .query(query)
            .send()
            .await
            .map_err(|e| MessagingError::Transport(format!("call {method}: {e}")))?;
        decode(method, resp).await
    }
}

async fn decode<T: DeserializeOwned>(
    method: &str,
    resp: reqwest::Response,
) -> Result<T, MessagingError> {
    let status = resp.status();
    resp.json::<T>().await.map_err(|e| {
        MessagingError::Transport(format!("decode {method} response (HTTP {status}): {e}"))
    })
}

/// A `section` block with the text followed by one `image` block per
/// non-blank avatar among the first [`MAX_AVATAR_BLOCKS`].
///
/// Returns `None` when there would be no image, so plain text is sent.
pub fn message_blocks(text: &str, avatar_urls: &[String]) -> Option<Vec<Value>> {
    let images: Vec<Value> = avatar_urls
        .iter()
        .take(MAX_AVATAR_BLOCKS)
        .map(|url| url.trim())
        .filter(|url| !url.is_empty())
        .map(|url| {
            json!({
                "type": "image",
                "image_url": url,
                "alt_text": "celebrant_avatar",
            })
        })
        .collect();

    if images.is_empty() {
        return None;
    }

    let mut blocks = Vec::with_capacity(images.len() + 1);
    blocks.push(json!({
        "type": "section",
        "text": { "type": "mrkdwn", "text": text },
    }));
    blocks.extend(images);
    Some(blocks)
}

/// ` (needed=X provided=Y)` suffix for missing-scope errors.
pub fn scope_hint(needed: &str, provided: &str) -> String {
    match (needed.trim(), provided.trim()) {
        ("", "") => String::new(),
        (needed, "") => format!(" (needed={needed})"),
        ("", provided) => format!(" (provided={provided})"),
        (needed, provided) => format!(" (needed={needed} provided={provided})"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scope_hint_variants() {
        assert_eq!(scope_hint("", " "), "");
        assert_eq!(scope_hint("chat:write", ""), " (needed=chat:write)");
        assert_eq!(scope_hint("", "im:write"), " (provided=im:write)");
        assert_eq!(
            scope_hint("chat:write", "im:write"),
            " (needed=chat:write provided=im:write)"
        );
    }

    #[test]
    fn no_blocks_without_avatars() {
        assert!(message_blocks("hi", &[]).is_none());
        assert!(message_blocks("hi", &["  ".to_string()]).is_none());
    }

    #[test]
    fn blocks_cap_images() {
        let urls: Vec<String> = (0..10).map(|i| format!("https://img/{i}")).collect();
        let blocks = message_blocks("hi", &urls).unwrap();
        assert_eq!(blocks.len(), 1 + MAX_AVATAR_BLOCKS);
        assert_eq!(blocks[0]["type"], "section");
        assert_eq!(blocks[0]["text"]["text"], "hi");
        assert_eq!(blocks[1]["alt_text"], "celebrant_avatar");
    }

    #[test]
    fn human_filter() {
        let human = SlackUser {
            id: "U1".into(),
            name: "ada".into(),
            ..Default::default()
        };
        assert!(human.is_human());

        let slackbot = SlackUser {
            id: "USLACKBOT".into(),
            ..Default::default()
        };
        let bot = SlackUser {
            id: "U2".into(),
            is_bot: true,
            ..Default::default()
        };
        let named_slackbot = SlackUser {
            id: "U3".into(),
            name: "Slackbot".into(),
            ..Default::default()
        };
        assert!(!slackbot.is_human());
        assert!(!bot.is_human());
        assert!(!named_slackbot.is_human());
    }
}

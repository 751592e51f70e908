//! Shared fixtures for worker integration tests.

#![allow(dead_code)]

use std::sync::Mutex;

use async_trait::async_trait;
use chrono::NaiveDate;
use cheers_core::messaging::{
    DirectoryMember, DirectoryProfile, MemberDirectory, MessagingError, Messenger,
};
use cheers_core::types::DbId;
use cheers_db::models::channel::WorkspaceChannel;
use cheers_db::models::person::{Person, UpsertPerson};
use cheers_db::models::workspace::{UpsertWorkspace, Workspace};
use cheers_db::repositories::{ChannelRepo, PersonRepo, WorkspaceRepo};
use sqlx::PgPool;

// ---------------------------------------------------------------------------
// Recording Slack double
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Posted {
    pub workspace_id: DbId,
    pub channel_id: String,
    pub text: String,
    pub avatar_urls: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DirectMessage {
    pub workspace_id: DbId,
    pub user_id: String,
    pub text: String,
}

/// Records every outbound call. Users listed in `failing_users` get a DM
/// error; `fail_posts` makes every channel post fail.
#[derive(Default)]
pub struct RecordingMessenger {
    pub posts: Mutex<Vec<Posted>>,
    pub dms: Mutex<Vec<DirectMessage>>,
    pub failing_users: Vec<String>,
    pub fail_posts: bool,
    pub profile: Option<DirectoryProfile>,
    pub members: Vec<DirectoryMember>,
    pub directory_error: bool,
}

impl RecordingMessenger {
    pub fn posts(&self) -> Vec<Posted> {
        self.posts.lock().unwrap().clone()
    }

    pub fn dms(&self) -> Vec<DirectMessage> {
        self.dms.lock().unwrap().clone()
    }
}

#[async_trait]
impl Messenger for RecordingMessenger {
    async fn post_message(
        &self,
        workspace_id: DbId,
        channel_id: &str,
        text: &str,
        avatar_urls: &[String],
    ) -> Result<(), MessagingError> {
        if self.fail_posts {
            return Err(MessagingError::Api {
                error: "channel_not_found".into(),
                hint: String::new(),
            });
        }
        self.posts.lock().unwrap().push(Posted {
            workspace_id,
            channel_id: channel_id.to_string(),
            text: text.to_string(),
            avatar_urls: avatar_urls.to_vec(),
        });
        Ok(())
    }

    async fn send_direct_message(
        &self,
        workspace_id: DbId,
        user_id: &str,
        text: &str,
    ) -> Result<(), MessagingError> {
        if self.failing_users.iter().any(|u| u == user_id) {
            return Err(MessagingError::Api {
                error: "cannot_dm_bot".into(),
                hint: String::new(),
            });
        }
        self.dms.lock().unwrap().push(DirectMessage {
            workspace_id,
            user_id: user_id.to_string(),
            text: text.to_string(),
        });
        Ok(())
    }
}

#[async_trait]
impl MemberDirectory for RecordingMessenger {
    async fn user_profile(
        &self,
        _workspace_id: DbId,
        _user_id: &str,
    ) -> Result<DirectoryProfile, MessagingError> {
        if self.directory_error {
            return Err(MessagingError::Transport("timeout".into()));
        }
        self.profile.clone().ok_or(MessagingError::Api {
            error: "user_not_found".into(),
            hint: String::new(),
        })
    }

    async fn list_members(&self, _workspace_id: DbId) -> Result<Vec<DirectoryMember>, MessagingError> {
        if self.directory_error {
            return Err(MessagingError::Transport("timeout".into()));
        }
        Ok(self.members.clone())
    }
}

pub fn member(user_id: &str, name: &str) -> DirectoryMember {
    DirectoryMember {
        user_id: user_id.to_string(),
        handle: name.to_lowercase(),
        display_name: name.to_string(),
        avatar_url: format!("https://img/{user_id}"),
    }
}

// ---------------------------------------------------------------------------
// Seed helpers
// ---------------------------------------------------------------------------

pub async fn seed_workspace(pool: &PgPool, team_id: &str) -> Workspace {
    WorkspaceRepo::upsert(
        pool,
        &UpsertWorkspace {
            slack_team_id: team_id.to_string(),
            name: format!("Team {team_id}"),
            timezone: "UTC".to_string(),
        },
    )
    .await
    .unwrap()
}

pub async fn seed_channel(
    pool: &PgPool,
    workspace_id: DbId,
    slack_channel_id: &str,
    timezone: &str,
    posting_time: &str,
) -> WorkspaceChannel {
    ChannelRepo::upsert_default(
        pool,
        workspace_id,
        slack_channel_id,
        "celebrations",
        timezone,
        posting_time,
    )
    .await
    .unwrap()
}

pub async fn seed_birthday(
    pool: &PgPool,
    workspace_id: DbId,
    user_id: &str,
    name: &str,
    (day, month): (i16, i16),
) -> Person {
    let mut input = UpsertPerson::new(user_id);
    input.display_name = name.to_string();
    input.slack_handle = name.to_lowercase();
    input.avatar_url = format!("https://img/{user_id}");
    input.birthday_day = Some(day);
    input.birthday_month = Some(month);
    PersonRepo::upsert(pool, workspace_id, &input).await.unwrap()
}

pub async fn seed_hire_date(
    pool: &PgPool,
    workspace_id: DbId,
    user_id: &str,
    name: &str,
    hire_date: NaiveDate,
) -> Person {
    let mut input = UpsertPerson::new(user_id);
    input.display_name = name.to_string();
    input.hire_date = Some(hire_date);
    PersonRepo::upsert(pool, workspace_id, &input).await.unwrap()
}

pub fn utc(y: i32, m: u32, d: u32, h: u32, min: u32) -> cheers_core::types::Timestamp {
    use chrono::TimeZone;
    chrono::Utc.with_ymd_and_hms(y, m, d, h, min, 0).unwrap()
}

pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

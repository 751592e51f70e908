#![allow(dead_code)]

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use axum::body::Body;
use axum::http::{Method, Request, Response};
use axum::Router;
use http_body_util::BodyExt;
use sqlx::PgPool;
use tower::ServiceExt;

use cheers_api::config::ServerConfig;
use cheers_api::router::build_app_router;
use cheers_api::state::AppState;
use cheers_core::messaging::{
    DirectoryMember, DirectoryProfile, MemberDirectory, MessagingError, Messenger,
};
use cheers_core::signature::compute_signature;
use cheers_core::types::DbId;
use cheers_slack::SlackClients;

pub const SIGNING_SECRET: &str = "test-signing-secret";

/// Records outbound Slack traffic instead of sending it.
#[derive(Default)]
pub struct FakeSlack {
    pub posts: Mutex<Vec<(String, String)>>,
    pub dms: Mutex<Vec<(String, String)>>,
    pub members: Vec<DirectoryMember>,
    /// Behave like a workspace with no bot token at all.
    pub disconnected: bool,
}

impl FakeSlack {
    pub fn dms(&self) -> Vec<(String, String)> {
        self.dms.lock().unwrap().clone()
    }

    pub fn posts(&self) -> Vec<(String, String)> {
        self.posts.lock().unwrap().clone()
    }
}

#[async_trait]
impl Messenger for FakeSlack {
    async fn post_message(
        &self,
        _workspace_id: DbId,
        channel_id: &str,
        text: &str,
        _avatar_urls: &[String],
    ) -> Result<(), MessagingError> {
        self.posts
            .lock()
            .unwrap()
            .push((channel_id.to_string(), text.to_string()));
        Ok(())
    }

    async fn send_direct_message(
        &self,
        _workspace_id: DbId,
        user_id: &str,
        text: &str,
    ) -> Result<(), MessagingError> {
        self.dms
            .lock()
            .unwrap()
            .push((user_id.to_string(), text.to_string()));
        Ok(())
    }
}

#[async_trait]
impl MemberDirectory for FakeSlack {
    async fn user_profile(
        &self,
        _workspace_id: DbId,
        user_id: &str,
    ) -> Result<DirectoryProfile, MessagingError> {
        if self.disconnected {
            return Err(MessagingError::MissingToken);
        }
        Ok(DirectoryProfile {
            handle: user_id.to_lowercase(),
            display_name: format!("Member {user_id}"),
            avatar_url: String::new(),
        })
    }

    async fn list_members(&self, _workspace_id: DbId) -> Result<Vec<DirectoryMember>, MessagingError> {
        if self.disconnected {
            return Err(MessagingError::MissingToken);
        }
        Ok(self.members.clone())
    }
}

/// Defaults plus a known signing secret; the scheduler never runs in tests.
pub fn test_config() -> ServerConfig {
    let mut config = ServerConfig::from_lookup(|_| None);
    config.scheduler.enabled = false;
    config.slack.signing_secret = Some(SIGNING_SECRET.to_string());
    config
}

/// Build the full application router around `slack`.
pub fn build_test_app(pool: PgPool, slack: Arc<FakeSlack>) -> Router {
    let clients = SlackClients {
        messenger: slack.clone(),
        directory: slack,
    };
    build_app_router(AppState::new(pool, test_config(), clients))
}

// ---------------------------------------------------------------------------
// Request helpers
// ---------------------------------------------------------------------------

pub async fn get(app: Router, uri: &str) -> Response<Body> {
    let request = Request::builder()
        .method(Method::GET)
        .uri(uri)
        .body(Body::empty())
        .unwrap();
    app.oneshot(request).await.unwrap()
}

pub async fn send_json(app: Router, method: Method, uri: &str, body: serde_json::Value) -> Response<Body> {
    let request = Request::builder()
        .method(method)
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap();
    app.oneshot(request).await.unwrap()
}

pub async fn post_json(app: Router, uri: &str, body: serde_json::Value) -> Response<Body> {
    send_json(app, Method::POST, uri, body).await
}

pub async fn put_json(app: Router, uri: &str, body: serde_json::Value) -> Response<Body> {
    send_json(app, Method::PUT, uri, body).await
}

/// POST a Slack event signed with [`SIGNING_SECRET`] at `timestamp`.
pub async fn post_slack_event(app: Router, body: &str, timestamp: i64) -> Response<Body> {
    let ts = timestamp.to_string();
    let signature = compute_signature(SIGNING_SECRET, &ts, body.as_bytes());
    let request = Request::builder()
        .method(Method::POST)
        .uri("/slack/events")
        .header("content-type", "application/json")
        .header("x-slack-request-timestamp", ts)
        .header("x-slack-signature", signature)
        .body(Body::from(body.to_string()))
        .unwrap();
    app.oneshot(request).await.unwrap()
}

pub async fn body_json(response: Response<Body>) -> serde_json::Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

/// Bootstrap a workspace with one `09:00` UTC channel; returns the
/// workspace id.
pub async fn bootstrap(app: Router, team_id: &str, channel_id: &str) -> i64 {
    let response = post_json(
        app,
        "/api/workspaces/bootstrap",
        serde_json::json!({
            "slack_team_id": team_id,
            "name": "Acme",
            "timezone": "UTC",
            "channel_id": channel_id,
            "channel_name": "celebrations",
            "posting_time": "09:00",
        }),
    )
    .await;
    assert_eq!(response.status(), 201);
    body_json(response).await["workspace"]["id"].as_i64().unwrap()
}

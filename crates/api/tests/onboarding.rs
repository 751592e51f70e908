mod common;

use std::sync::Arc;

use cheers_core::messaging::DirectoryMember;
use serde_json::json;
use sqlx::PgPool;

use common::{body_json, bootstrap, build_test_app, post_json, FakeSlack};

fn member(user_id: &str) -> DirectoryMember {
    DirectoryMember {
        user_id: user_id.to_string(),
        handle: user_id.to_lowercase(),
        display_name: format!("Member {user_id}"),
        avatar_url: String::new(),
    }
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn onboarding_messages_each_member_once(pool: PgPool) {
    let slack = Arc::new(FakeSlack {
        members: vec![member("U1"), member("U2")],
        ..FakeSlack::default()
    });
    let app = build_test_app(pool, slack.clone());
    let ws = bootstrap(app.clone(), "T1", "C1").await;
    let uri = format!("/api/workspaces/{ws}/onboarding/dm");

    let body = body_json(post_json(app.clone(), &uri, json!({})).await).await;
    assert_eq!(body["total_members"], 2);
    assert_eq!(body["sent"], 2);
    assert_eq!(body["skipped"], 0);
    assert_eq!(slack.dms().len(), 2);

    let body = body_json(post_json(app.clone(), &uri, json!({})).await).await;
    assert_eq!(body["sent"], 0);
    assert_eq!(body["skipped"], 2);

    let body = body_json(post_json(app, &format!("{uri}?force=true"), json!({})).await).await;
    assert_eq!(body["sent"], 2);
    assert_eq!(slack.dms().len(), 4);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn onboarding_without_slack_token_is_a_conflict(pool: PgPool) {
    let slack = Arc::new(FakeSlack {
        disconnected: true,
        ..FakeSlack::default()
    });
    let app = build_test_app(pool, slack);
    let ws = bootstrap(app.clone(), "T1", "C1").await;

    let response = post_json(app, &format!("/api/workspaces/{ws}/onboarding/dm"), json!({})).await;
    assert_eq!(response.status(), 409);
    assert_eq!(body_json(response).await["code"], "SLACK_NOT_CONNECTED");
}

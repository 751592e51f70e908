mod common;

use std::sync::Arc;

use chrono::{Datelike, Utc};
use serde_json::json;
use sqlx::PgPool;

use common::{body_json, bootstrap, build_test_app, post_json, put_json, FakeSlack};

#[sqlx::test(migrations = "../../db/migrations")]
async fn manual_dispatch_posts_once_per_day(pool: PgPool) {
    let slack = Arc::new(FakeSlack::default());
    let app = build_test_app(pool, slack.clone());
    let ws = bootstrap(app.clone(), "T1", "C1").await;

    let today = Utc::now().date_naive();
    put_json(
        app.clone(),
        &format!("/api/workspaces/{ws}/people/U1"),
        json!({
            "slack_handle": "ann",
            "display_name": "Ann",
            "birthday_day": today.day(),
            "birthday_month": today.month(),
        }),
    )
    .await;

    let uri = format!("/api/workspaces/{ws}/celebrations/dispatch");
    let response = post_json(app.clone(), &uri, json!({})).await;
    assert_eq!(response.status(), 200);

    let body = body_json(response).await;
    let channels = body["channels"].as_array().unwrap();
    assert_eq!(channels.len(), 1);
    assert_eq!(channels[0]["slack_channel_id"], "C1");
    assert_eq!(channels[0]["birthdays"], 1);
    assert_eq!(channels[0]["birthday_posted"], true);
    assert_eq!(channels[0]["skipped"], false);

    let posts = slack.posts();
    assert_eq!(posts.len(), 1);
    assert_eq!(posts[0].0, "C1");
    assert!(posts[0].1.contains("<@U1>"));

    let body = body_json(post_json(app, &uri, json!({})).await).await;
    assert_eq!(body["channels"][0]["skipped"], true);
    assert_eq!(slack.posts().len(), 1);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn manual_dispatch_for_unknown_workspace_is_404(pool: PgPool) {
    let app = build_test_app(pool, Arc::new(FakeSlack::default()));

    let response = post_json(app, "/api/workspaces/42/celebrations/dispatch", json!({})).await;
    assert_eq!(response.status(), 404);
}

use axum::routing::post;
use axum::Router;

use crate::handlers::slack_events;
use crate::state::AppState;

/// Slack callbacks, mounted at the root so the URL configured in the Slack
/// app stays `/slack/events`.
pub fn router() -> Router<AppState> {
    Router::new().route("/slack/events", post(slack_events::handle_event))
}

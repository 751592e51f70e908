use axum::routing::{get, post, put};
use axum::Router;

use crate::handlers::{celebration, onboarding, workspace};
use crate::state::AppState;

/// Workspace routes mounted at `/api/workspaces`.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/bootstrap", post(workspace::bootstrap))
        .route("/{id}/channels", get(workspace::list_channels))
        .route(
            "/{id}/channels/{channel}/settings",
            put(workspace::update_channel_settings),
        )
        .route(
            "/{id}/channels/{channel}/templates",
            put(workspace::update_channel_templates),
        )
        .route("/{id}/people", get(workspace::list_people))
        .route("/{id}/people/{slack_user_id}", put(workspace::upsert_person))
        .route("/{id}/overview", get(workspace::overview))
        .route("/{id}/celebrations/dispatch", post(celebration::dispatch_now))
        .route("/{id}/onboarding/dm", post(onboarding::send_dms))
}

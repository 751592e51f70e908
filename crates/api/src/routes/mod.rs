pub mod health;
pub mod slack;
pub mod workspace;

use axum::Router;

use crate::state::AppState;

/// Build the `/api` route tree.
///
/// ```text
/// /workspaces/bootstrap                                POST  bootstrap
/// /workspaces/{id}/channels                            GET   list channels
/// /workspaces/{id}/channels/{channel}/settings         PUT   schedule + flags
/// /workspaces/{id}/channels/{channel}/templates        PUT   templates + branding
/// /workspaces/{id}/people                              GET   stored + directory
/// /workspaces/{id}/people/{slack_user_id}              PUT   full replace
/// /workspaces/{id}/overview                            GET   upcoming celebrations
/// /workspaces/{id}/celebrations/dispatch               POST  manual dispatch
/// /workspaces/{id}/onboarding/dm                       POST  onboarding DMs
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new().nest("/workspaces", workspace::router())
}
